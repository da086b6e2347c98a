use std::fmt;
use std::sync::Arc;

use crate::{ForeignCallError, UndefinedCallableError};

/// Snapshot of a callable's binding generation.
///
/// A callable bumps its generation every time its binding is redefined, so a
/// snapshot taken when a target was resolved stays valid exactly until the
/// next redefinition and never becomes valid again afterwards.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Stability(u64);

impl Stability {
    pub const fn new(generation: u64) -> Self {
        Self(generation)
    }

    pub fn generation(self) -> u64 {
        self.0
    }
}

/// Executable code resolved from a [`Callable`].
pub trait InvocationTarget: Clone {
    /// Number of arguments the target declares, if it declares one.
    fn arity(&self) -> Option<usize> {
        None
    }
}

/// A guest object whose bound code may be redefined while it is alive.
///
/// Callables are shared through [`Arc`] and identified by allocation: two
/// callables that would compare equal structurally are still distinct if
/// they are distinct objects.
pub trait Callable {
    type Target: InvocationTarget;

    /// The currently bound target together with the stability snapshot it
    /// was read under. Both must come from the same binding.
    fn current_target(&self) -> (Self::Target, Stability);

    /// `true` while no redefinition happened since `snapshot` was taken.
    ///
    /// Implementations must observe redefinitions made on other threads,
    /// i.e. read the generation with at least acquire ordering.
    fn is_stable(&self, snapshot: Stability) -> bool;
}

pub type TargetOf<C> = <C as Callable>::Target;

/// Invocation path for values that live outside the native callable
/// representation.
pub trait ForeignBridge<V> {
    type Error;

    fn is_foreign_callable(&self, value: &V) -> bool;

    /// Marshal `args`, execute `value` in the foreign domain and convert the
    /// result back into a native value.
    fn invoke_foreign(&self, value: &V, args: &[V]) -> Result<V, ForeignCallError<Self::Error>>;
}

/// The interpreter side of a dispatch.
pub trait DispatchContext {
    type Value: fmt::Display;
    type Callable: Callable;
    type Error: From<UndefinedCallableError>;
    type Bridge: ForeignBridge<Self::Value, Error = Self::Error>;

    /// View `value` as a native callable, if it is one.
    fn as_callable<'v>(&self, value: &'v Self::Value) -> Option<&'v Arc<Self::Callable>>;

    fn foreign_bridge(&self) -> &Self::Bridge;

    /// Run `target` with `args`. Guest errors are returned as-is.
    fn invoke(
        &mut self,
        target: &TargetOf<Self::Callable>,
        args: &[Self::Value],
    ) -> Result<Self::Value, Self::Error>;
}

/// Shape of a callee, resolved once per dispatch.
#[derive(Debug)]
pub enum CalleeKind<'v, C, V> {
    Native(&'v Arc<C>),
    Foreign(&'v V),
    NotCallable,
}

impl<'v, C, V> CalleeKind<'v, C, V> {
    pub fn classify<X>(cx: &X, value: &'v V) -> Self
    where
        X: DispatchContext<Callable = C, Value = V>,
    {
        if let Some(callable) = cx.as_callable(value) {
            CalleeKind::Native(callable)
        } else if cx.foreign_bridge().is_foreign_callable(value) {
            CalleeKind::Foreign(value)
        } else {
            CalleeKind::NotCallable
        }
    }
}
