//! Host objects for exercising the foreign bridge end to end.

use std::sync::atomic::{AtomicUsize, Ordering};

use slate_interop::{HostError, HostObject, HostValue};

/// Executable host object that returns a fixed value and counts its calls.
#[derive(Debug)]
pub struct CountingHost {
    name: String,
    result: HostValue,
    calls: AtomicUsize,
}

impl CountingHost {
    pub fn new(name: &str, result: HostValue) -> Self {
        Self {
            name: name.to_owned(),
            result,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl HostObject for CountingHost {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn is_executable(&self) -> bool {
        true
    }

    fn execute(&self, _args: &[HostValue]) -> Result<HostValue, HostError> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        Ok(self.result.clone())
    }
}

/// Host object that answers no messages.
#[derive(Debug)]
pub struct InertHost(pub &'static str);

impl HostObject for InertHost {
    fn display_name(&self) -> String {
        self.0.to_owned()
    }
}
