//! Call-site inline caching for guest-language calls.
//!
//! A [`DispatchNode`] memoizes the code bound to the callables seen at one
//! call site. Entries are guarded by callable identity and by a [`Stability`]
//! snapshot that stops matching once the callable is redefined. A site that
//! observes more distinct callables than its cache limit collapses to generic
//! dispatch for good. Values outside the native callable representation are
//! routed through a [`ForeignBridge`] and never touch the cache.

mod callable;
mod config;
mod entry;
mod error;
mod node;
mod profile;
mod site;

pub use callable::{
    Callable, CalleeKind, DispatchContext, ForeignBridge, InvocationTarget, Stability, TargetOf,
};
pub use config::{DispatchConfig, INLINE_CACHE_SIZE};
pub use entry::CacheEntry;
pub use error::{ForeignCallError, ForeignDispatchFailure, UndefinedCallableError};
pub use node::{Classification, DispatchMode, DispatchNode};
pub use profile::DispatchProfile;
pub use site::CallSite;

pub use smallvec::{self, SmallVec};

#[cfg(test)]
mod tests;
