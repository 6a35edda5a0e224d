//! SolidScript Runtime Value Library
//!
//! This crate provides the dynamic value system underlying the SolidScript
//! interpreter. It includes:
//!
//! - `Value` enum for the tagged-union runtime value
//! - Vector, object, range, string and function payload types
//! - Operator dispatch over runtime type pairs
//! - Number and value formatting
//! - Session-scoped resource accounting
//! - `RuntimeError` for the guarded traversal failures
//!
//! Invalid operations are not errors: they evaluate to an undefined
//! `Value` carrying a diagnostic reason, and callers check the
//! discriminant. The only `Err`s this crate produces are the print-depth
//! guard and the range iteration cap.

pub mod builtins;
pub mod error;
pub mod formatting;
pub mod ops;
pub mod session;
pub mod value;

/// Prelude module for convenient imports
///
/// # Example
/// ```
/// use solidscript_runtime::prelude::*;
/// ```
pub mod prelude {
    pub use super::error::{RuntimeError, RuntimeResult};
    pub use super::formatting::{format_number, MAX_PRINT_DEPTH};
    pub use super::ops::{apply_binop, apply_unop, BinOp, UnOp};
    pub use super::session::{EvaluationSession, SessionRef};
    pub use super::value::{
        EmbeddedVectorValue, FunctionValue, ObjectValue, RangeValue, UndefValue, Utf8String,
        Value, ValueType, VectorValue, MAX_RANGE_STEPS,
    };
}

pub use prelude::*;
