//! Shared fixtures for the slate test suites.

mod context;
mod function;

#[cfg(feature = "interop")]
pub mod host;

pub use context::{MockBridge, MockContext, MockError, MockForeign, MockValue};
pub use function::{MockFunction, MockOutcome, MockTarget};

/// Cache limits the parameterized suites sweep over.
pub const LIMITS: std::ops::RangeInclusive<usize> = 1..=4;

/// Run `f` once per limit in [`LIMITS`].
pub fn for_each_limit(mut f: impl FnMut(usize)) {
    for limit in LIMITS {
        f(limit);
    }
}
