use std::fmt;

/// Counters describing how a call site has been dispatching.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct DispatchProfile {
    /// Native calls answered by a cache entry.
    pub hits: u64,
    /// Native calls that had to resolve the callee while specializing,
    /// including the one that collapsed the site.
    pub misses: u64,
    /// Native calls dispatched after the site went generic.
    pub generic: u64,
    /// Calls routed through the foreign bridge.
    pub foreign: u64,
    /// Entries dropped because their callable was redefined.
    pub invalidations: u64,
}

impl DispatchProfile {
    pub fn native_calls(&self) -> u64 {
        self.hits + self.misses + self.generic
    }

    /// Share of native calls served from the cache, in percent.
    pub fn hit_rate(&self) -> f32 {
        let total = self.native_calls();
        if total == 0 {
            0.0
        } else {
            (self.hits as f32) / (total as f32) * 100.0
        }
    }
}

impl fmt::Display for DispatchProfile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "hits={} misses={} generic={} foreign={} invalidations={}",
            self.hits, self.misses, self.generic, self.foreign, self.invalidations
        )
    }
}
