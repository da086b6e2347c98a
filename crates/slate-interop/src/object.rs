use std::fmt;

use crate::{HostError, HostValue};

/// An object owned by the host.
///
/// Objects answer messages; the only one this crate models is `execute`.
pub trait HostObject: fmt::Debug + Send + Sync {
    /// Name used when the object is rendered or reported in errors.
    fn display_name(&self) -> String;

    fn is_executable(&self) -> bool {
        false
    }

    fn execute(&self, args: &[HostValue]) -> Result<HostValue, HostError> {
        let _ = args;
        Err(HostError::UnsupportedMessage)
    }
}
