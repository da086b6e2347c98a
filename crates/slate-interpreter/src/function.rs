use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use parking_lot::RwLock;
use slate_dispatch::{Callable, InvocationTarget, Stability};

use crate::{Body, Builtin};

/// Code a [`Function`] can be bound to.
#[derive(Clone)]
pub enum CallTarget {
    /// Placeholder for a name that was referenced before it was defined.
    /// Invoking it fails with an undefined-function error.
    Undefined(Arc<str>),
    Body(Arc<Body>),
    Builtin(Builtin),
}

impl CallTarget {
    pub fn is_defined(&self) -> bool {
        !matches!(self, CallTarget::Undefined(_))
    }
}

impl InvocationTarget for CallTarget {
    fn arity(&self) -> Option<usize> {
        match self {
            CallTarget::Undefined(_) => None,
            CallTarget::Body(body) => Some(body.params()),
            CallTarget::Builtin(builtin) => Some(builtin.arity()),
        }
    }
}

impl fmt::Debug for CallTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CallTarget::Undefined(name) => f.debug_tuple("Undefined").field(name).finish(),
            CallTarget::Body(body) => f
                .debug_struct("Body")
                .field("params", &body.params())
                .field("nodes", &body.len())
                .finish(),
            CallTarget::Builtin(builtin) => f.debug_tuple("Builtin").field(&builtin.name()).finish(),
        }
    }
}

struct Binding {
    target: CallTarget,
    generation: u64,
}

/// A named guest function.
///
/// The function object keeps its identity for as long as the name exists,
/// while the code it is bound to can be replaced with [`Function::redefine`].
/// Every redefinition bumps a generation counter; call sites compare the
/// generation they cached against the current one to notice the change.
pub struct Function {
    name: Arc<str>,
    binding: RwLock<Binding>,
    generation: AtomicU64,
}

impl Function {
    pub fn new(name: &str, target: CallTarget) -> Self {
        Self {
            name: Arc::from(name),
            binding: RwLock::new(Binding {
                target,
                generation: 0,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// A function whose name is known but whose code is not.
    pub fn undefined(name: &str) -> Self {
        Self::new(name, CallTarget::Undefined(Arc::from(name)))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn target(&self) -> CallTarget {
        self.binding.read().target.clone()
    }

    pub fn is_defined(&self) -> bool {
        self.binding.read().target.is_defined()
    }

    pub fn generation(&self) -> u64 {
        self.generation.load(Ordering::Acquire)
    }

    /// Bind the function to `target`, invalidating every cached binding.
    pub fn redefine(&self, target: CallTarget) {
        let previous = {
            let mut binding = self.binding.write();
            let previous = std::mem::replace(&mut binding.target, target);
            binding.generation += 1;
            self.generation.store(binding.generation, Ordering::Release);
            tracing::debug!(
                function = %self.name,
                generation = binding.generation,
                "function redefined"
            );
            previous
        };
        previous.release();
    }
}

impl CallTarget {
    /// Break the cycles a body forms through its own call sites.
    fn release(&self) {
        if let CallTarget::Body(body) = self {
            body.clear_call_sites();
        }
    }
}

impl Drop for Function {
    fn drop(&mut self) {
        self.binding.get_mut().target.release();
    }
}

impl fmt::Debug for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Function")
            .field("name", &self.name)
            .field("generation", &self.generation())
            .finish_non_exhaustive()
    }
}

impl Callable for Function {
    type Target = CallTarget;

    fn current_target(&self) -> (CallTarget, Stability) {
        let binding = self.binding.read();
        (binding.target.clone(), Stability::new(binding.generation))
    }

    fn is_stable(&self, snapshot: Stability) -> bool {
        self.generation() == snapshot.generation()
    }
}
