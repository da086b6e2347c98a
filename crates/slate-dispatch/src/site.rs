use std::fmt;

use parking_lot::Mutex;

use crate::node::{Plan, execute};
use crate::{
    Callable, Classification, DispatchConfig, DispatchContext, DispatchMode, DispatchNode,
    DispatchProfile,
};

/// A [`DispatchNode`] owned by one static call expression.
///
/// The node sits behind a lock so call expressions can be shared with other
/// threads. The lock only covers target selection; the selected target runs
/// after it is released, which keeps recursive calls through the same site
/// from deadlocking.
pub struct CallSite<C: Callable> {
    node: Mutex<DispatchNode<C>>,
}

impl<C: Callable> CallSite<C> {
    pub fn new(config: DispatchConfig) -> Self {
        Self {
            node: Mutex::new(DispatchNode::new(config)),
        }
    }

    pub fn dispatch<X>(
        &self,
        cx: &mut X,
        callee: &X::Value,
        args: &[X::Value],
    ) -> Result<X::Value, X::Error>
    where
        X: DispatchContext<Callable = C>,
    {
        let plan: Plan<C::Target> = self.node.lock().plan(&*cx, callee);
        execute(plan, cx, callee, args)
    }

    /// See [`DispatchNode::clear_entries`].
    pub fn clear_entries(&self) {
        self.node.lock().clear_entries();
    }

    /// Run `f` against the node while holding its lock.
    pub fn inspect<R>(&self, f: impl FnOnce(&DispatchNode<C>) -> R) -> R {
        f(&self.node.lock())
    }

    pub fn mode(&self) -> DispatchMode {
        self.inspect(|node| node.mode())
    }

    pub fn len(&self) -> usize {
        self.inspect(|node| node.len())
    }

    pub fn is_empty(&self) -> bool {
        self.inspect(|node| node.is_empty())
    }

    pub fn classification(&self) -> Classification {
        self.inspect(|node| node.classification())
    }

    pub fn profile(&self) -> DispatchProfile {
        self.inspect(|node| node.profile())
    }
}

impl<C> fmt::Debug for CallSite<C>
where
    C: Callable,
    C::Target: fmt::Debug,
{
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CallSite")
            .field("node", &*self.node.lock())
            .finish()
    }
}
