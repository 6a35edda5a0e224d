//! FunctionValue - opaque shared handle to a closure.
//!
//! The value runtime never calls functions; it only stores them, prints
//! them, and compares them by identity. The evaluator supplies the display
//! text (typically `function(params) body`) when it builds the handle.

use std::rc::Rc;

#[derive(Debug)]
struct FunctionData {
    repr: String,
}

/// Shared closure handle; cloning aliases the same function.
#[derive(Debug, Clone)]
pub struct FunctionValue {
    inner: Rc<FunctionData>,
}

impl FunctionValue {
    pub fn new(repr: impl Into<String>) -> Self {
        Self {
            inner: Rc::new(FunctionData { repr: repr.into() }),
        }
    }

    /// The evaluator-supplied display text.
    pub fn repr(&self) -> &str {
        &self.inner.repr
    }

    /// Identity comparison: two handles are equal only when they alias the
    /// same underlying closure.
    pub fn ptr_eq(&self, other: &FunctionValue) -> bool {
        Rc::ptr_eq(&self.inner, &other.inner)
    }
}

impl std::fmt::Display for FunctionValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.repr())
    }
}
