use std::fmt;
use std::sync::{Arc, Weak};

use crate::{Callable, Stability};

/// One memoized `callable -> target` association of a call site.
///
/// Entries are immutable. When the guarded callable is redefined the entry
/// is thrown away and a fresh one is resolved in its place.
pub struct CacheEntry<C: Callable> {
    guard: Weak<C>,
    target: C::Target,
    stability: Stability,
}

impl<C: Callable> CacheEntry<C> {
    /// Resolve the current binding of `callable` and guard it.
    pub fn resolve(callable: &Arc<C>) -> Self {
        let (target, stability) = callable.current_target();
        Self {
            guard: Arc::downgrade(callable),
            target,
            stability,
        }
    }

    /// Identity and stability both have to hold.
    pub fn matches(&self, callee: &Arc<C>) -> bool {
        self.is_guarding(callee) && callee.is_stable(self.stability)
    }

    /// Identity half of the guard, ignoring redefinitions.
    ///
    /// The guard is weak but still pins the allocation, so the address
    /// cannot be reused by another callable while the entry exists.
    pub fn is_guarding(&self, callee: &Arc<C>) -> bool {
        std::ptr::eq(self.guard.as_ptr(), Arc::as_ptr(callee))
    }

    pub fn target(&self) -> &C::Target {
        &self.target
    }

    pub fn stability(&self) -> Stability {
        self.stability
    }
}

impl<C> fmt::Debug for CacheEntry<C>
where
    C: Callable,
    C::Target: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CacheEntry")
            .field("target", &self.target)
            .field("stability", &self.stability)
            .finish_non_exhaustive()
    }
}
