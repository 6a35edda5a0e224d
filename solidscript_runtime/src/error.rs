//! Abnormal-control-flow errors for the value runtime.
//!
//! Ordinary invalid operations (bad operand types, out-of-bounds indices,
//! malformed matrix shapes) never produce an `Err`: they evaluate to an
//! undefined [`Value`](crate::Value) carrying a diagnostic reason, and
//! callers check the discriminant. `RuntimeError` is reserved for the few
//! conditions that must abort a whole traversal and be caught at a coarse
//! grain, such as echoing a value.

use thiserror::Error;

/// Errors raised by guarded traversals of the value graph.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    /// A value is nested deeper than the stringifier is willing to recurse.
    /// Caught at the echo boundary and rendered as a placeholder.
    #[error("recursion detected: value nested deeper than {max_depth} levels")]
    TooDeeplyNested { max_depth: usize },

    /// A range was asked to iterate although its element count is at or
    /// above the iteration cap. Iteration is refused outright rather than
    /// truncated.
    #[error("range has too many elements ({count})")]
    RangeTooManyElements { count: u32 },
}

/// Result alias for guarded traversals.
pub type RuntimeResult<T> = Result<T, RuntimeError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_too_deeply_nested_display() {
        let err = RuntimeError::TooDeeplyNested { max_depth: 256 };
        assert_eq!(
            format!("{}", err),
            "recursion detected: value nested deeper than 256 levels"
        );
    }

    #[test]
    fn test_error_range_too_many_elements_display() {
        let err = RuntimeError::RangeTooManyElements { count: u32::MAX };
        assert_eq!(
            format!("{}", err),
            format!("range has too many elements ({})", u32::MAX)
        );
    }

    #[test]
    fn test_error_clone_and_eq() {
        let err = RuntimeError::TooDeeplyNested { max_depth: 8 };
        assert_eq!(err.clone(), err);
    }
}
