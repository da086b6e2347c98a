use std::cell::Cell;
use std::sync::Arc;

use crate::*;

// ---------------------------------------------------------------------------
// Single-threaded stub callable
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct Stub {
    returns: Cell<i64>,
    generation: Cell<u64>,
}

#[derive(Clone, Debug, PartialEq)]
struct Returns(i64);

impl InvocationTarget for Returns {}

impl Stub {
    fn new(returns: i64) -> Arc<Self> {
        Arc::new(Stub {
            returns: Cell::new(returns),
            generation: Cell::new(0),
        })
    }

    fn redefine(&self, returns: i64) {
        self.returns.set(returns);
        self.generation.set(self.generation.get() + 1);
    }
}

impl Callable for Stub {
    type Target = Returns;

    fn current_target(&self) -> (Returns, Stability) {
        (
            Returns(self.returns.get()),
            Stability::new(self.generation.get()),
        )
    }

    fn is_stable(&self, snapshot: Stability) -> bool {
        self.generation.get() == snapshot.generation()
    }
}

// ---------------------------------------------------------------------------
// Cache entries
// ---------------------------------------------------------------------------

#[test]
fn test_entry_guard_requires_identity() {
    let f = Stub::new(1);
    let look_alike = Stub::new(1);

    let entry = CacheEntry::resolve(&f);
    assert!(entry.matches(&f));
    assert!(entry.matches(&f.clone()));
    assert!(!entry.matches(&look_alike));
    assert_eq!(entry.target(), &Returns(1));
}

#[test]
fn test_entry_guard_fails_after_redefinition() {
    let f = Stub::new(1);
    let entry = CacheEntry::resolve(&f);
    assert_eq!(entry.stability(), Stability::new(0));

    f.redefine(2);
    assert!(entry.is_guarding(&f));
    assert!(!entry.matches(&f));
    // the cached target is untouched, it is just no longer applicable
    assert_eq!(entry.target(), &Returns(1));
}

// ---------------------------------------------------------------------------
// Target selection
// ---------------------------------------------------------------------------

#[test]
fn test_select_grows_then_collapses() {
    let a = Stub::new(1);
    let b = Stub::new(2);
    let c = Stub::new(3);
    let mut node: DispatchNode<Stub> = DispatchNode::with_limit(2);
    assert_eq!(node.classification(), Classification::Uninitialized);

    assert_eq!(node.select(&a), Returns(1));
    assert_eq!(node.classification(), Classification::Monomorphic);
    assert_eq!(node.select(&b), Returns(2));
    assert_eq!(node.classification(), Classification::Polymorphic);
    assert_eq!(node.select(&a), Returns(1));
    assert_eq!(node.len(), 2);

    assert_eq!(node.select(&c), Returns(3));
    assert_eq!(node.mode(), DispatchMode::Generic);
    assert_eq!(node.classification(), Classification::Megamorphic);
    assert!(node.is_empty());
}

#[test]
fn test_select_newest_entry_first() {
    let a = Stub::new(1);
    let b = Stub::new(2);
    let mut node: DispatchNode<Stub> = DispatchNode::with_limit(3);
    node.select(&a);
    node.select(&b);

    let order: Vec<Returns> = node.entries().iter().map(|e| e.target().clone()).collect();
    assert_eq!(order, vec![Returns(2), Returns(1)]);
}

#[test]
fn test_select_replaces_stale_entry() {
    let f = Stub::new(1);
    let g = Stub::new(5);
    let mut node: DispatchNode<Stub> = DispatchNode::with_limit(2);
    node.select(&f);
    node.select(&g);

    f.redefine(2);
    // a full chain would collapse on a plain miss; the stale slot is reused instead
    assert_eq!(node.select(&f), Returns(2));
    assert_eq!(node.mode(), DispatchMode::Specializing);
    assert_eq!(node.len(), 2);
    assert_eq!(node.profile().invalidations, 1);
}

#[test]
fn test_zero_limit_is_generic_from_the_start() {
    let f = Stub::new(7);
    let mut node: DispatchNode<Stub> = DispatchNode::with_limit(0);
    assert_eq!(node.select(&f), Returns(7));
    assert_eq!(node.mode(), DispatchMode::Generic);
    assert_eq!(node.select(&f), Returns(7));
    insta::assert_snapshot!(
        node.profile(),
        @"hits=0 misses=1 generic=1 foreign=0 invalidations=0"
    );
}

#[test]
fn test_clear_entries_keeps_mode() {
    let a = Stub::new(1);
    let b = Stub::new(2);
    let mut node: DispatchNode<Stub> = DispatchNode::with_limit(2);
    node.select(&a);
    node.select(&b);
    node.clear_entries();
    assert!(node.is_empty());
    assert_eq!(node.mode(), DispatchMode::Specializing);
    // the next call is a plain miss
    assert_eq!(node.select(&a), Returns(1));
    assert_eq!(node.len(), 1);
    assert_eq!(node.profile().misses, 3);

    let mut generic: DispatchNode<Stub> = DispatchNode::with_limit(0);
    generic.select(&a);
    generic.clear_entries();
    assert_eq!(generic.mode(), DispatchMode::Generic);
}

// ---------------------------------------------------------------------------
// Configuration
// ---------------------------------------------------------------------------

#[test]
fn test_config_defaults_to_inline_cache_size() {
    assert_eq!(DispatchConfig::default().cache_limit(), INLINE_CACHE_SIZE);
    let config = DispatchConfig::builder().cache_limit(5).build();
    assert_eq!(config.cache_limit(), 5);
    assert_eq!(DispatchNode::<Stub>::new(config).limit(), 5);
}

#[test]
fn test_profile_hit_rate() {
    let profile = DispatchProfile {
        hits: 3,
        misses: 1,
        ..Default::default()
    };
    assert_eq!(profile.native_calls(), 4);
    assert_eq!(profile.hit_rate(), 75.0);
    assert_eq!(DispatchProfile::default().hit_rate(), 0.0);
}
