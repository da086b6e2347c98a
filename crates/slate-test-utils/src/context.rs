use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use slate_dispatch::{
    CallSite, DispatchContext, ForeignBridge, ForeignCallError, ForeignDispatchFailure,
    UndefinedCallableError,
};

use crate::{MockFunction, MockOutcome, MockTarget};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MockError {
    #[error(transparent)]
    Undefined(#[from] UndefinedCallableError),
    #[error("guest error: {0}")]
    Guest(String),
}

/// A value of the foreign domain.
#[derive(Debug)]
pub struct MockForeign {
    pub name: String,
    pub outcome: Result<i64, ForeignCallError<MockError>>,
}

impl MockForeign {
    pub fn returning(name: &str, value: i64) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            outcome: Ok(value),
        })
    }

    pub fn refusing(name: &str, failure: ForeignDispatchFailure) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            outcome: Err(ForeignCallError::Failure(failure)),
        })
    }

    pub fn raising(name: &str, message: &str) -> Arc<Self> {
        Arc::new(Self {
            name: name.to_owned(),
            outcome: Err(ForeignCallError::Raised(MockError::Guest(message.to_owned()))),
        })
    }
}

#[derive(Debug, Clone)]
pub enum MockValue {
    Int(i64),
    Function(Arc<MockFunction>),
    Foreign(Arc<MockForeign>),
    /// Neither native nor foreign.
    Opaque(String),
}

impl MockValue {
    pub fn function(function: &Arc<MockFunction>) -> Self {
        MockValue::Function(function.clone())
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            MockValue::Int(v) => Some(*v),
            _ => None,
        }
    }
}

impl fmt::Display for MockValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MockValue::Int(v) => write!(f, "{v}"),
            MockValue::Function(function) => f.write_str(function.name()),
            MockValue::Foreign(foreign) => write!(f, "foreign {}", foreign.name),
            MockValue::Opaque(name) => f.write_str(name),
        }
    }
}

/// Counts every foreign invocation it performs.
#[derive(Debug, Default)]
pub struct MockBridge {
    calls: AtomicUsize,
}

impl MockBridge {
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::Relaxed)
    }
}

impl ForeignBridge<MockValue> for MockBridge {
    type Error = MockError;

    fn is_foreign_callable(&self, value: &MockValue) -> bool {
        matches!(value, MockValue::Foreign(_))
    }

    fn invoke_foreign(
        &self,
        value: &MockValue,
        _args: &[MockValue],
    ) -> Result<MockValue, ForeignCallError<MockError>> {
        self.calls.fetch_add(1, Ordering::Relaxed);
        let MockValue::Foreign(foreign) = value else {
            return Err(ForeignDispatchFailure::NotExecutable.into());
        };
        match &foreign.outcome {
            Ok(value) => Ok(MockValue::Int(*value)),
            Err(ForeignCallError::Failure(failure)) => {
                Err(ForeignCallError::Failure(failure.clone()))
            }
            Err(ForeignCallError::Raised(error)) => Err(ForeignCallError::Raised(error.clone())),
        }
    }
}

/// Records the label of every target it invokes.
#[derive(Debug, Default)]
pub struct MockContext {
    pub bridge: MockBridge,
    pub invoked: Vec<String>,
    reentry: Option<(Arc<CallSite<MockFunction>>, MockValue)>,
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Site and callee that [`MockOutcome::Countdown`] targets dispatch to.
    pub fn with_reentry(mut self, site: Arc<CallSite<MockFunction>>, callee: MockValue) -> Self {
        self.reentry = Some((site, callee));
        self
    }
}

impl DispatchContext for MockContext {
    type Value = MockValue;
    type Callable = MockFunction;
    type Error = MockError;
    type Bridge = MockBridge;

    fn as_callable<'v>(&self, value: &'v MockValue) -> Option<&'v Arc<MockFunction>> {
        match value {
            MockValue::Function(function) => Some(function),
            _ => None,
        }
    }

    fn foreign_bridge(&self) -> &MockBridge {
        &self.bridge
    }

    fn invoke(&mut self, target: &MockTarget, args: &[MockValue]) -> Result<MockValue, MockError> {
        self.invoked.push(target.label.clone());
        match &target.outcome {
            MockOutcome::Return(value) => Ok(MockValue::Int(*value)),
            MockOutcome::Raise(message) => Err(MockError::Guest(message.clone())),
            MockOutcome::Undefined => Err(UndefinedCallableError::new(&target.label).into()),
            MockOutcome::Countdown => {
                let n = args.first().and_then(MockValue::as_int).unwrap_or(0);
                if n <= 0 {
                    return Ok(MockValue::Int(0));
                }
                let Some((site, callee)) = self.reentry.clone() else {
                    return Err(MockError::Guest("no reentry site".to_owned()));
                };
                let depth = site.dispatch(self, &callee, &[MockValue::Int(n - 1)])?;
                Ok(MockValue::Int(depth.as_int().unwrap_or(0) + 1))
            }
        }
    }
}
