use std::sync::Arc;

use rustc_hash::FxHashMap;

use crate::{CallTarget, Function};

/// Name to function mapping of a guest program.
///
/// A name resolves to the same [`Function`] object for the lifetime of the
/// registry; defining a name again rebinds that object rather than replacing
/// it, so references taken earlier observe the new code.
#[derive(Debug, Default)]
pub struct FunctionRegistry {
    functions: FxHashMap<Arc<str>, Arc<Function>>,
}

impl FunctionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Look `name` up, creating an undefined function for it when asked to.
    pub fn lookup(&mut self, name: &str, create_if_missing: bool) -> Option<Arc<Function>> {
        if create_if_missing {
            Some(self.get_or_create(name))
        } else {
            self.get(name)
        }
    }

    /// The function for `name`, undefined if the name is new.
    pub fn get_or_create(&mut self, name: &str) -> Arc<Function> {
        self.functions
            .entry(Arc::from(name))
            .or_insert_with(|| Arc::new(Function::undefined(name)))
            .clone()
    }

    pub fn get(&self, name: &str) -> Option<Arc<Function>> {
        self.functions.get(name).cloned()
    }

    /// Bind `name` to `target`, creating the function if needed.
    pub fn register(&mut self, name: &str, target: CallTarget) -> Arc<Function> {
        let function = self.get_or_create(name);
        function.redefine(target);
        function
    }

    /// All functions, sorted by name.
    pub fn functions(&self) -> Vec<Arc<Function>> {
        let mut functions: Vec<_> = self.functions.values().cloned().collect();
        functions.sort_by(|a, b| a.name().cmp(b.name()));
        functions
    }

    pub fn len(&self) -> usize {
        self.functions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.functions.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Builtin;

    #[test]
    fn test_lookup_is_stable_per_name() {
        let mut registry = FunctionRegistry::new();
        assert!(registry.lookup("f", false).is_none());

        let f = registry.lookup("f", true).unwrap();
        let again = registry.lookup("f", false).unwrap();
        assert!(Arc::ptr_eq(&f, &again));
        assert!(!f.is_defined());
    }

    #[test]
    fn test_register_rebinds_existing_function() {
        let mut registry = FunctionRegistry::new();
        let early = registry.lookup("typeOf", true).unwrap();
        let [type_of, ..] = Builtin::standard();

        let registered = registry.register("typeOf", CallTarget::Builtin(type_of));
        assert!(Arc::ptr_eq(&early, &registered));
        assert!(early.is_defined());
        assert_eq!(early.generation(), 1);
    }

    #[test]
    fn test_functions_are_sorted() {
        let mut registry = FunctionRegistry::new();
        for name in ["b", "c", "a"] {
            registry.lookup(name, true);
        }
        let names: Vec<String> = registry
            .functions()
            .iter()
            .map(|f| f.name().to_owned())
            .collect();
        assert_eq!(names, ["a", "b", "c"]);
        assert_eq!(registry.len(), 3);
    }
}
