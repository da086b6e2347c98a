use std::sync::Arc;

use rustc_hash::FxHashMap;
use slate_dispatch::DispatchConfig;

use crate::{Builtin, CallTarget, FunctionRegistry, HostBridge, Value};

/// Global state shared by everything an [`crate::Interpreter`] runs.
#[derive(Debug, Default)]
pub struct Context {
    registry: FunctionRegistry,
    globals: FxHashMap<Arc<str>, Value>,
    bridge: HostBridge,
    config: DispatchConfig,
}

impl Context {
    /// A context with the standard builtins installed.
    pub fn new(config: DispatchConfig) -> Self {
        let mut context = Self {
            config,
            ..Self::default()
        };
        context.install_builtins(Builtin::standard());
        context
    }

    pub fn install_builtins(&mut self, builtins: impl IntoIterator<Item = Builtin>) {
        for builtin in builtins {
            self.registry
                .register(builtin.name(), CallTarget::Builtin(builtin));
        }
    }

    pub fn registry(&self) -> &FunctionRegistry {
        &self.registry
    }

    pub fn registry_mut(&mut self) -> &mut FunctionRegistry {
        &mut self.registry
    }

    /// Make `value` readable from guest code as a global named `name`.
    pub fn export(&mut self, name: &str, value: Value) -> Option<Value> {
        self.globals.insert(Arc::from(name), value)
    }

    pub fn global(&self, name: &str) -> Option<&Value> {
        self.globals.get(name)
    }

    pub fn bridge(&self) -> &HostBridge {
        &self.bridge
    }

    pub fn dispatch_config(&self) -> DispatchConfig {
        self.config
    }

    /// Only affects call sites created afterwards.
    pub fn set_dispatch_config(&mut self, config: DispatchConfig) {
        self.config = config;
    }
}
