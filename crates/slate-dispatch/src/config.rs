/// Default number of callables a call site caches before going generic.
pub const INLINE_CACHE_SIZE: usize = 2;

/// Tuning knobs shared by every call site of an interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DispatchConfig {
    cache_limit: usize,
}

#[bon::bon]
impl DispatchConfig {
    #[builder]
    pub fn new(cache_limit: Option<usize>) -> Self {
        Self {
            cache_limit: cache_limit.unwrap_or(INLINE_CACHE_SIZE),
        }
    }
}

impl DispatchConfig {
    /// Maximum number of cache entries a call site holds while specializing.
    ///
    /// A limit of zero disables specialization: the first native call
    /// collapses the site to generic dispatch.
    pub fn cache_limit(&self) -> usize {
        self.cache_limit
    }
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}
