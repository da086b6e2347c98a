use std::fmt;

use crate::{RuntimeError, Value};

pub type BuiltinFn = fn(&[Value]) -> Result<Value, RuntimeError>;

/// A function implemented in Rust and installed into the guest namespace.
#[derive(Clone, Copy)]
pub struct Builtin {
    name: &'static str,
    arity: usize,
    body: BuiltinFn,
}

impl Builtin {
    pub const fn new(name: &'static str, arity: usize, body: BuiltinFn) -> Self {
        Self { name, arity, body }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn arity(&self) -> usize {
        self.arity
    }

    pub fn call(&self, args: &[Value]) -> Result<Value, RuntimeError> {
        if args.len() != self.arity {
            return Err(RuntimeError::ArityMismatch {
                function: self.name.to_owned(),
                expected: self.arity,
                got: args.len(),
            });
        }
        (self.body)(args)
    }

    /// Builtins every [`crate::Context`] starts with.
    pub fn standard() -> [Builtin; 4] {
        [
            Builtin::new("typeOf", 1, type_of),
            Builtin::new("isExecutable", 1, is_executable),
            Builtin::new("isNull", 1, is_null),
            Builtin::new("concat", 2, concat),
        ]
    }
}

impl fmt::Debug for Builtin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Builtin")
            .field("name", &self.name)
            .field("arity", &self.arity)
            .finish()
    }
}

fn type_of(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::str(args[0].type_name()))
}

fn is_executable(args: &[Value]) -> Result<Value, RuntimeError> {
    let executable = match &args[0] {
        Value::Function(_) => true,
        Value::Host(object) => object.is_executable(),
        _ => false,
    };
    Ok(Value::Bool(executable))
}

fn is_null(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::Bool(args[0].is_null()))
}

fn concat(args: &[Value]) -> Result<Value, RuntimeError> {
    Ok(Value::str(&format!("{}{}", args[0], args[1])))
}
