use slate_dispatch::UndefinedCallableError;
use slate_interop::HostError;

/// Error type for guest evaluation failures.
///
/// Errors raised while a guest function runs travel through call sites
/// unchanged, so the variant seen by the caller is the one raised at the
/// point of failure.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// The called value could not be invoked.
    #[error(transparent)]
    UndefinedCallable(#[from] UndefinedCallableError),
    /// An operator was applied to operands it is not defined for.
    #[error("type error: operation `{operation}` not defined for {operands}")]
    TypeError {
        operation: &'static str,
        operands: String,
    },
    /// Integer arithmetic left the range of `i64`.
    #[error("arithmetic overflow in `{operation}`")]
    Overflow { operation: &'static str },
    /// A builtin was called with the wrong number of arguments.
    #[error("{function} expects {expected} arguments, got {got}")]
    ArityMismatch {
        function: String,
        expected: usize,
        got: usize,
    },
    /// A global name was read that was never exported.
    #[error("undefined global '{0}'")]
    UndefinedGlobal(String),
    /// Step fuel has been exhausted.
    #[error("step fuel exhausted")]
    FuelExhausted,
    /// Call depth exceeded the configured maximum.
    #[error("call depth exceeded maximum")]
    MaxDepthExceeded,
    /// An exception thrown by host code called from the guest.
    #[error(transparent)]
    Host(#[from] HostError),
    /// User-defined error.
    #[error(transparent)]
    Custom(Box<dyn std::error::Error + Send + Sync>),
}

impl RuntimeError {
    /// Wrap an arbitrary error as [`RuntimeError::Custom`].
    pub fn custom(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        RuntimeError::Custom(Box::new(error))
    }

    pub(crate) fn type_error<'a>(
        operation: &'static str,
        operands: impl IntoIterator<Item = &'a crate::Value>,
    ) -> Self {
        let operands = operands
            .into_iter()
            .map(|value| value.type_name())
            .collect::<Vec<_>>()
            .join(", ");
        RuntimeError::TypeError {
            operation,
            operands,
        }
    }
}
