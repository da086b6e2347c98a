/// Failure reported by host code.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("expected {expected} arguments, got {got}")]
    Arity { expected: usize, got: usize },
    /// Argument at `index` has a type the host object cannot accept.
    #[error("unsupported argument type at position {index}")]
    UnsupportedType { index: usize },
    /// The object does not understand the requested message.
    #[error("unsupported message")]
    UnsupportedMessage,
    /// An exception thrown by host code while it was running.
    #[error("host exception: {0}")]
    Raised(String),
}
