/// Raised when a dispatched value cannot be invoked.
///
/// Covers values that are neither native callables nor executable foreign
/// values, native callables whose binding is undefined, and every failure the
/// foreign bridge reports while marshalling or executing a call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("undefined function: {callee}")]
pub struct UndefinedCallableError {
    callee: String,
}

impl UndefinedCallableError {
    pub fn new(callee: impl std::fmt::Display) -> Self {
        Self {
            callee: callee.to_string(),
        }
    }

    /// Rendering of the value that was called.
    pub fn callee(&self) -> &str {
        &self.callee
    }
}

/// Why the foreign domain refused to execute a value.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ForeignDispatchFailure {
    #[error("foreign arity mismatch: expected {expected} arguments, got {got}")]
    ArityMismatch { expected: usize, got: usize },
    #[error("argument {index} has no foreign representation")]
    UnsupportedType { index: usize },
    #[error("foreign value is not executable")]
    NotExecutable,
}

/// Outcome of a failed foreign call.
///
/// [`Failure`](Self::Failure) is a protocol-level refusal and is reported to
/// the guest as [`UndefinedCallableError`]. [`Raised`](Self::Raised) carries
/// an error thrown by the foreign code itself and propagates unchanged.
#[derive(Debug, thiserror::Error)]
pub enum ForeignCallError<E> {
    #[error(transparent)]
    Failure(#[from] ForeignDispatchFailure),
    #[error("{0}")]
    Raised(E),
}
