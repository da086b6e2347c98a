use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::Mutex;
use slate_dispatch::{Callable, InvocationTarget, Stability};

/// What a [`MockTarget`] does when invoked.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum MockOutcome {
    Return(i64),
    /// Fail with [`crate::MockError::Guest`].
    Raise(String),
    /// Fail with an undefined-function error.
    Undefined,
    /// Re-enter the context's reentry site with `n - 1` until `n` is zero,
    /// returning the recursion depth.
    Countdown,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MockTarget {
    pub label: String,
    pub outcome: MockOutcome,
}

impl MockTarget {
    pub fn new(label: impl Into<String>, outcome: MockOutcome) -> Self {
        Self {
            label: label.into(),
            outcome,
        }
    }

    pub fn returning(label: impl Into<String>, value: i64) -> Self {
        Self::new(label, MockOutcome::Return(value))
    }
}

impl InvocationTarget for MockTarget {}

/// Redefinable callable with a generation counter.
#[derive(Debug)]
pub struct MockFunction {
    name: String,
    binding: Mutex<(MockTarget, u64)>,
    generation: AtomicU64,
}

impl MockFunction {
    pub fn new(name: &str, target: MockTarget) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            binding: Mutex::new((target, 0)),
            generation: AtomicU64::new(0),
        })
    }

    /// A function whose target is labelled with its own name.
    pub fn returning(name: &str, value: i64) -> Arc<Self> {
        Self::new(name, MockTarget::returning(name, value))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn redefine(&self, target: MockTarget) {
        let mut binding = self.binding.lock();
        binding.0 = target;
        binding.1 += 1;
        self.generation.store(binding.1, Ordering::Release);
    }
}

impl Callable for MockFunction {
    type Target = MockTarget;

    fn current_target(&self) -> (MockTarget, Stability) {
        let binding = self.binding.lock();
        (binding.0.clone(), Stability::new(binding.1))
    }

    fn is_stable(&self, snapshot: Stability) -> bool {
        self.generation.load(Ordering::Acquire) == snapshot.generation()
    }
}
