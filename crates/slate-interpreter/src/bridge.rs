use slate_dispatch::{ForeignBridge, ForeignCallError, ForeignDispatchFailure};
use slate_interop::{HostError, HostValue};

use crate::{RuntimeError, Value};

/// Foreign bridge between guest values and host objects.
///
/// Every [`Value::Host`] belongs to the host domain and is routed here. The
/// bridge converts arguments to [`HostValue`]s, asks the object to execute,
/// and converts the result back. Protocol failures are reported as
/// [`ForeignDispatchFailure`]; exceptions thrown by host code come back as
/// [`RuntimeError::Host`].
#[derive(Debug, Default, Clone, Copy)]
pub struct HostBridge;

impl HostBridge {
    /// Guest to host. Guest functions have no host representation.
    pub fn marshal(value: &Value) -> Option<HostValue> {
        let host = match value {
            Value::Null => HostValue::Unit,
            Value::Bool(v) => HostValue::Bool(*v),
            Value::Int(v) => HostValue::I64(*v),
            Value::Float(v) => HostValue::F64(*v),
            Value::Str(v) => HostValue::Str(v.to_string()),
            Value::Host(object) => HostValue::Object(object.clone()),
            Value::Function(_) => return None,
        };
        Some(host)
    }

    /// Host to guest. Narrow integers widen, characters become strings.
    pub fn unmarshal(value: HostValue) -> Value {
        match value {
            HostValue::Unit => Value::Null,
            HostValue::Bool(v) => Value::Bool(v),
            HostValue::I32(v) => Value::Int(v.into()),
            HostValue::I64(v) => Value::Int(v),
            HostValue::F64(v) => Value::Float(v),
            HostValue::Char(c) => Value::str(c.encode_utf8(&mut [0; 4])),
            HostValue::Str(s) => Value::str(&s),
            HostValue::Object(object) => Value::Host(object),
        }
    }
}

impl ForeignBridge<Value> for HostBridge {
    type Error = RuntimeError;

    fn is_foreign_callable(&self, value: &Value) -> bool {
        matches!(value, Value::Host(_))
    }

    fn invoke_foreign(
        &self,
        value: &Value,
        args: &[Value],
    ) -> Result<Value, ForeignCallError<RuntimeError>> {
        let Value::Host(object) = value else {
            return Err(ForeignDispatchFailure::NotExecutable.into());
        };
        if !object.is_executable() {
            return Err(ForeignDispatchFailure::NotExecutable.into());
        }

        let host_args = args
            .iter()
            .enumerate()
            .map(|(index, arg)| {
                Self::marshal(arg).ok_or(ForeignDispatchFailure::UnsupportedType { index })
            })
            .collect::<Result<Vec<_>, _>>()?;

        match object.execute(&host_args) {
            Ok(result) => Ok(Self::unmarshal(result)),
            Err(HostError::Arity { expected, got }) => {
                Err(ForeignDispatchFailure::ArityMismatch { expected, got }.into())
            }
            Err(HostError::UnsupportedType { index }) => {
                Err(ForeignDispatchFailure::UnsupportedType { index }.into())
            }
            Err(HostError::UnsupportedMessage) => Err(ForeignDispatchFailure::NotExecutable.into()),
            Err(raised @ HostError::Raised(_)) => Err(ForeignCallError::Raised(raised.into())),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use slate_interop::HostFunction;

    use super::*;
    use crate::Function;

    #[test]
    fn test_unmarshal_widens_and_stringifies() {
        assert_eq!(HostBridge::unmarshal(HostValue::I32(7)), Value::Int(7));
        assert_eq!(HostBridge::unmarshal(HostValue::Char('x')), Value::str("x"));
        assert_eq!(HostBridge::unmarshal(HostValue::Unit), Value::Null);
    }

    #[test]
    fn test_functions_do_not_marshal() {
        let f = Value::Function(Arc::new(Function::undefined("f")));
        assert!(HostBridge::marshal(&f).is_none());
        assert_eq!(HostBridge::marshal(&Value::Int(2)), Some(HostValue::I64(2)));
    }

    #[test]
    fn test_invoke_reports_argument_position() {
        let id = Value::host(HostFunction::new("id", 2, |args| Ok(args[0].clone())));
        let f = Value::Function(Arc::new(Function::undefined("f")));
        let err = HostBridge
            .invoke_foreign(&id, &[Value::Int(1), f])
            .unwrap_err();
        assert!(matches!(
            err,
            ForeignCallError::Failure(ForeignDispatchFailure::UnsupportedType { index: 1 })
        ));
    }

    #[test]
    fn test_host_exceptions_are_raised_not_refused() {
        let boom = Value::host(HostFunction::new("boom", 0, |_| {
            Err(HostError::Raised("boom".to_owned()))
        }));
        let err = HostBridge.invoke_foreign(&boom, &[]).unwrap_err();
        assert!(matches!(
            err,
            ForeignCallError::Raised(RuntimeError::Host(HostError::Raised(_)))
        ));
    }
}
