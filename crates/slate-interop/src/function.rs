use std::fmt;

use crate::{HostError, HostObject, HostValue};

type HostFn = dyn Fn(&[HostValue]) -> Result<HostValue, HostError> + Send + Sync;

/// Executable host object backed by a Rust closure.
///
/// The declared arity is checked before the closure runs.
pub struct HostFunction {
    name: String,
    arity: usize,
    body: Box<HostFn>,
}

impl HostFunction {
    pub fn new(
        name: impl Into<String>,
        arity: usize,
        body: impl Fn(&[HostValue]) -> Result<HostValue, HostError> + Send + Sync + 'static,
    ) -> Self {
        Self {
            name: name.into(),
            arity,
            body: Box::new(body),
        }
    }

    pub fn arity(&self) -> usize {
        self.arity
    }
}

impl fmt::Debug for HostFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HostFunction")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish_non_exhaustive()
    }
}

impl HostObject for HostFunction {
    fn display_name(&self) -> String {
        self.name.clone()
    }

    fn is_executable(&self) -> bool {
        true
    }

    fn execute(&self, args: &[HostValue]) -> Result<HostValue, HostError> {
        if args.len() != self.arity {
            return Err(HostError::Arity {
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.body)(args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn add() -> HostFunction {
        HostFunction::new("add", 2, |args| match args {
            [HostValue::I64(a), HostValue::I64(b)] => Ok(HostValue::I64(a + b)),
            [HostValue::I64(_), _] => Err(HostError::UnsupportedType { index: 1 }),
            _ => Err(HostError::UnsupportedType { index: 0 }),
        })
    }

    #[test]
    fn test_host_function_executes() {
        let f = add();
        assert!(f.is_executable());
        assert_eq!(f.arity(), 2);
        assert_eq!(f.execute(&[HostValue::I64(1), HostValue::I64(2)]), Ok(HostValue::I64(3)));
    }

    #[test]
    fn test_host_function_checks_arity_first() {
        let err = add().execute(&[HostValue::I64(1)]).unwrap_err();
        assert_eq!(err, HostError::Arity { expected: 2, got: 1 });
        insta::assert_snapshot!(err, @"expected 2 arguments, got 1");
    }

    #[test]
    fn test_host_function_rejects_types() {
        let err = add().execute(&[HostValue::I64(1), "x".into()]).unwrap_err();
        assert_eq!(err, HostError::UnsupportedType { index: 1 });
    }

    #[derive(Debug)]
    struct Inert;

    impl HostObject for Inert {
        fn display_name(&self) -> String {
            "inert".to_owned()
        }
    }

    #[test]
    fn test_default_object_is_not_executable() {
        let value = HostValue::object(Inert);
        assert!(!value.is_executable());
        let HostValue::Object(object) = &value else {
            unreachable!()
        };
        assert_eq!(object.execute(&[]), Err(HostError::UnsupportedMessage));
        assert_eq!(value.to_string(), "inert");
        assert_eq!(value.type_name(), "object");
    }

    #[test]
    fn test_objects_compare_by_identity() {
        let a = HostValue::object(Inert);
        let b = HostValue::object(Inert);
        assert_eq!(a, a.clone());
        assert_ne!(a, b);
        assert_ne!(HostValue::I32(1), HostValue::I64(1));
    }
}
