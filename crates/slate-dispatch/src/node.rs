use std::fmt;
use std::sync::Arc;

use smallvec::SmallVec;

use crate::{
    CacheEntry, Callable, CalleeKind, DispatchConfig, DispatchContext, DispatchProfile,
    ForeignBridge, ForeignCallError, INLINE_CACHE_SIZE, TargetOf, UndefinedCallableError,
};

/// Whether a call site is still building its inline cache.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DispatchMode {
    /// Callables are memoized in the entry chain.
    Specializing,
    /// Too many distinct callables were seen. Every call looks its target up
    /// directly. This mode is terminal.
    Generic,
}

/// Call-site shape by the number of distinct callables observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Classification {
    Uninitialized,
    Monomorphic,
    Polymorphic,
    Megamorphic,
}

/// Per-call-site inline cache.
///
/// # State machine
///
/// While [`DispatchMode::Specializing`], each native call is checked against
/// the entry chain, newest entry first:
///
/// 1. a matching entry is a hit and its cached target is invoked;
/// 2. on a miss with room left, the callee's current target is resolved,
///    guarded and pushed to the front of the chain;
/// 3. on a miss with a full chain, the node drops every entry, switches to
///    [`DispatchMode::Generic`] and never specializes again.
///
/// An entry whose callable was redefined no longer matches. It is evicted on
/// the miss it causes, so the fresh entry replaces it instead of sitting next
/// to it.
///
/// Foreign callees go through the [`ForeignBridge`] and non-callable values
/// fail with [`UndefinedCallableError`], in either mode and without touching
/// the chain.
pub struct DispatchNode<C: Callable> {
    entries: SmallVec<[CacheEntry<C>; INLINE_CACHE_SIZE]>,
    limit: usize,
    mode: DispatchMode,
    profile: DispatchProfile,
}

pub(crate) enum Plan<T> {
    Invoke(T),
    Foreign,
    Undefined,
}

impl<C: Callable> DispatchNode<C> {
    pub fn new(config: DispatchConfig) -> Self {
        Self::with_limit(config.cache_limit())
    }

    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: SmallVec::new(),
            limit,
            mode: DispatchMode::Specializing,
            profile: DispatchProfile::default(),
        }
    }

    /// Invoke `callee` with `args`.
    ///
    /// Errors raised by the invoked code are returned unchanged.
    pub fn dispatch<X>(
        &mut self,
        cx: &mut X,
        callee: &X::Value,
        args: &[X::Value],
    ) -> Result<X::Value, X::Error>
    where
        X: DispatchContext<Callable = C>,
    {
        let plan = self.plan(&*cx, callee);
        execute(plan, cx, callee, args)
    }

    pub(crate) fn plan<X>(&mut self, cx: &X, callee: &X::Value) -> Plan<C::Target>
    where
        X: DispatchContext<Callable = C>,
    {
        match CalleeKind::classify(cx, callee) {
            CalleeKind::Native(callable) => Plan::Invoke(self.select(callable)),
            CalleeKind::Foreign(_) => {
                self.profile.foreign += 1;
                Plan::Foreign
            }
            CalleeKind::NotCallable => Plan::Undefined,
        }
    }

    /// Pick the target to run for a native callee, updating the cache.
    pub fn select(&mut self, callee: &Arc<C>) -> C::Target {
        if self.mode == DispatchMode::Generic {
            debug_assert!(self.entries.is_empty());
            self.profile.generic += 1;
            return callee.current_target().0;
        }

        if let Some(entry) = self.entries.iter().find(|entry| entry.matches(callee)) {
            self.profile.hits += 1;
            return entry.target().clone();
        }
        self.profile.misses += 1;

        // Any entry still guarding this callee failed the stability check.
        let before = self.entries.len();
        self.entries.retain(|entry| !entry.is_guarding(callee));
        let evicted = before - self.entries.len();
        if evicted > 0 {
            self.profile.invalidations += evicted as u64;
            tracing::trace!(evicted, "evicted inline cache entry of a redefined callable");
        }

        if self.entries.len() < self.limit {
            let entry = CacheEntry::resolve(callee);
            let target = entry.target().clone();
            self.entries.insert(0, entry);
            debug_assert!(self.entries.len() <= self.limit);
            tracing::trace!(
                entries = self.entries.len(),
                limit = self.limit,
                "inline cache miss"
            );
            target
        } else {
            self.collapse();
            callee.current_target().0
        }
    }

    /// Drop every cache entry without changing the mode.
    ///
    /// Entries own their targets, so an owner of call sites clears them to
    /// release targets that refer back to itself.
    pub fn clear_entries(&mut self) {
        self.entries.clear();
    }

    fn collapse(&mut self) {
        tracing::debug!(
            limit = self.limit,
            "call site went megamorphic, switching to generic dispatch"
        );
        self.entries.clear();
        self.mode = DispatchMode::Generic;
    }

    pub fn mode(&self) -> DispatchMode {
        self.mode
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Number of cache entries in the chain.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// The entry chain, newest first.
    pub fn entries(&self) -> &[CacheEntry<C>] {
        &self.entries
    }

    pub fn profile(&self) -> DispatchProfile {
        self.profile
    }

    pub fn classification(&self) -> Classification {
        match (self.mode, self.entries.len()) {
            (DispatchMode::Generic, _) => Classification::Megamorphic,
            (DispatchMode::Specializing, 0) => Classification::Uninitialized,
            (DispatchMode::Specializing, 1) => Classification::Monomorphic,
            (DispatchMode::Specializing, _) => Classification::Polymorphic,
        }
    }
}

impl<C: Callable> Default for DispatchNode<C> {
    fn default() -> Self {
        Self::new(DispatchConfig::default())
    }
}

impl<C> fmt::Debug for DispatchNode<C>
where
    C: Callable,
    C::Target: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DispatchNode")
            .field("mode", &self.mode)
            .field("limit", &self.limit)
            .field("entries", &self.entries)
            .field("profile", &self.profile)
            .finish()
    }
}

pub(crate) fn execute<X>(
    plan: Plan<TargetOf<X::Callable>>,
    cx: &mut X,
    callee: &X::Value,
    args: &[X::Value],
) -> Result<X::Value, X::Error>
where
    X: DispatchContext,
{
    match plan {
        Plan::Invoke(target) => cx.invoke(&target, args),
        Plan::Foreign => match cx.foreign_bridge().invoke_foreign(callee, args) {
            Ok(value) => Ok(value),
            Err(ForeignCallError::Failure(_)) => Err(UndefinedCallableError::new(callee).into()),
            Err(ForeignCallError::Raised(error)) => Err(error),
        },
        Plan::Undefined => Err(UndefinedCallableError::new(callee).into()),
    }
}
