//! Value module - the runtime value types.
//!
//! # Module Organization
//!
//! - `function.rs`: FunctionValue opaque closure handle
//! - `object.rs`: ObjectValue ordered string-keyed map
//! - `range.rs`: RangeValue lazy arithmetic progression
//! - `string.rs`: Utf8String code-point-indexable text
//! - `undef.rs`: UndefValue diagnostic reason stack
//! - `value_enum.rs`: the Value enum and ValueType tag
//! - `vector.rs`: VectorValue shared embeddable sequence

mod function;
mod object;
mod range;
mod string;
mod undef;
mod value_enum;
mod vector;

pub use function::FunctionValue;
pub use object::ObjectValue;
pub use range::{RangeValue, RangeValues, MAX_RANGE_STEPS};
pub use string::Utf8String;
pub use undef::UndefValue;
pub use value_enum::{Value, ValueType};
pub use vector::{EmbeddedVectorValue, VectorIter, VectorValue};
