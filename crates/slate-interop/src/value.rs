use std::fmt;
use std::sync::Arc;

use crate::HostObject;

/// A value in the host domain.
#[derive(Clone, Debug)]
pub enum HostValue {
    Unit,
    Bool(bool),
    I32(i32),
    I64(i64),
    F64(f64),
    Char(char),
    Str(String),
    Object(Arc<dyn HostObject>),
}

impl HostValue {
    pub fn object(object: impl HostObject + 'static) -> Self {
        HostValue::Object(Arc::new(object))
    }

    pub fn is_executable(&self) -> bool {
        matches!(self, HostValue::Object(object) if object.is_executable())
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            HostValue::Unit => "unit",
            HostValue::Bool(_) => "bool",
            HostValue::I32(_) => "i32",
            HostValue::I64(_) => "i64",
            HostValue::F64(_) => "f64",
            HostValue::Char(_) => "char",
            HostValue::Str(_) => "str",
            HostValue::Object(_) => "object",
        }
    }
}

impl PartialEq for HostValue {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (HostValue::Unit, HostValue::Unit) => true,
            (HostValue::Bool(a), HostValue::Bool(b)) => a == b,
            (HostValue::I32(a), HostValue::I32(b)) => a == b,
            (HostValue::I64(a), HostValue::I64(b)) => a == b,
            (HostValue::F64(a), HostValue::F64(b)) => a == b,
            (HostValue::Char(a), HostValue::Char(b)) => a == b,
            (HostValue::Str(a), HostValue::Str(b)) => a == b,
            // objects compare by identity
            (HostValue::Object(a), HostValue::Object(b)) => Arc::ptr_eq(a, b),
            _ => false,
        }
    }
}

impl fmt::Display for HostValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HostValue::Unit => write!(f, "()"),
            HostValue::Bool(v) => write!(f, "{v}"),
            HostValue::I32(v) => write!(f, "{v}"),
            HostValue::I64(v) => write!(f, "{v}"),
            HostValue::F64(v) => write!(f, "{v}"),
            HostValue::Char(v) => write!(f, "{v}"),
            HostValue::Str(v) => write!(f, "{v}"),
            HostValue::Object(object) => write!(f, "{}", object.display_name()),
        }
    }
}

impl From<i64> for HostValue {
    fn from(v: i64) -> Self {
        HostValue::I64(v)
    }
}

impl From<i32> for HostValue {
    fn from(v: i32) -> Self {
        HostValue::I32(v)
    }
}

impl From<bool> for HostValue {
    fn from(v: bool) -> Self {
        HostValue::Bool(v)
    }
}

impl From<&str> for HostValue {
    fn from(v: &str) -> Self {
        HostValue::Str(v.to_owned())
    }
}
