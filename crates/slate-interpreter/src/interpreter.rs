use std::sync::Arc;

use slate_dispatch::{DispatchConfig, DispatchContext, UndefinedCallableError};
use smallvec::SmallVec;

use crate::{
    BinaryOp, Body, BodyBuilder, CallTarget, Context, Expr, ExprId, Function, GuestCallSite,
    HostBridge, RuntimeError, Value,
};

/// Guest call depth allowed unless [`Interpreter::with_max_depth`] says
/// otherwise. Each guest call uses several native frames, so this stays well
/// below what a default thread stack holds.
pub const DEFAULT_MAX_DEPTH: usize = 128;

/// Tree-walking evaluator for guest bodies.
///
/// Every call expression dispatches through the [`GuestCallSite`] its body
/// created for it. Calls made from the host with [`Interpreter::call`] go
/// through a dedicated entry site owned by the interpreter.
///
/// # Error type
///
/// All failures are [`RuntimeError`]s. Errors raised inside a callee are
/// returned to the caller exactly as they were raised.
#[derive(Debug)]
pub struct Interpreter {
    context: Context,
    entry: Arc<GuestCallSite>,
    fuel: Option<u64>,
    max_depth: Option<usize>,
    depth: usize,
}

// -- Constructors -----------------------------------------------------------

impl Interpreter {
    pub fn new() -> Self {
        Self::with_context(Context::new(DispatchConfig::default()))
    }

    pub fn with_context(context: Context) -> Self {
        let entry = Arc::new(GuestCallSite::new(context.dispatch_config()));
        Self {
            context,
            entry,
            fuel: None,
            max_depth: Some(DEFAULT_MAX_DEPTH),
            depth: 0,
        }
    }
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

// -- Builder methods --------------------------------------------------------

impl Interpreter {
    /// Set a step budget for evaluation.
    ///
    /// Each evaluated expression consumes one unit. Exceeding the budget
    /// returns [`RuntimeError::FuelExhausted`].
    pub fn with_fuel(mut self, fuel: u64) -> Self {
        self.fuel = Some(fuel);
        self
    }

    /// Set the maximum guest call depth.
    ///
    /// Entering a body beyond this limit returns
    /// [`RuntimeError::MaxDepthExceeded`].
    pub fn with_max_depth(mut self, depth: usize) -> Self {
        self.max_depth = Some(depth);
        self
    }

    /// Remove the call depth limit. Deep guest recursion can then exhaust
    /// the native stack.
    pub fn without_max_depth(mut self) -> Self {
        self.max_depth = None;
        self
    }

    /// Dispatch configuration for the entry site and for bodies built with
    /// [`Interpreter::body`] from now on.
    pub fn with_dispatch_config(mut self, config: DispatchConfig) -> Self {
        self.context.set_dispatch_config(config);
        self.entry = Arc::new(GuestCallSite::new(config));
        self
    }
}

// -- Program setup ----------------------------------------------------------

impl Interpreter {
    pub fn context(&self) -> &Context {
        &self.context
    }

    pub fn context_mut(&mut self) -> &mut Context {
        &mut self.context
    }

    /// A builder whose call sites use this interpreter's dispatch config.
    pub fn body(&self, params: usize) -> BodyBuilder {
        BodyBuilder::new(params).with_dispatch_config(self.context.dispatch_config())
    }

    /// The function registered under `name`, created undefined if needed.
    pub fn function(&mut self, name: &str) -> Arc<Function> {
        self.context.registry_mut().get_or_create(name)
    }

    /// Define or redefine the guest function `name`.
    pub fn define(&mut self, name: &str, body: Body) -> Arc<Function> {
        self.context
            .registry_mut()
            .register(name, CallTarget::Body(Arc::new(body)))
    }

    pub fn export(&mut self, name: &str, value: Value) {
        self.context.export(name, value);
    }

    /// The call site used by [`Interpreter::call`].
    pub fn entry_site(&self) -> &GuestCallSite {
        &self.entry
    }

    pub fn remaining_fuel(&self) -> Option<u64> {
        self.fuel
    }

    pub fn max_depth(&self) -> Option<usize> {
        self.max_depth
    }
}

// -- Evaluation -------------------------------------------------------------

impl Interpreter {
    /// Call `callee` from the host.
    pub fn call(&mut self, callee: &Value, args: &[Value]) -> Result<Value, RuntimeError> {
        let entry = self.entry.clone();
        entry.dispatch(self, callee, args)
    }

    /// Call the function registered under `name`.
    pub fn call_by_name(&mut self, name: &str, args: &[Value]) -> Result<Value, RuntimeError> {
        let function = self
            .context
            .registry()
            .get(name)
            .ok_or_else(|| UndefinedCallableError::new(name))?;
        self.call(&Value::Function(function), args)
    }

    /// Run `body` with `args` as a new guest frame.
    pub fn eval(&mut self, body: &Body, args: &[Value]) -> Result<Value, RuntimeError> {
        if self.max_depth.is_some_and(|max| self.depth >= max) {
            return Err(RuntimeError::MaxDepthExceeded);
        }
        self.depth += 1;
        let result = self.eval_expr(body, body.root(), args);
        self.depth -= 1;
        result
    }

    fn consume_fuel(&mut self) -> Result<(), RuntimeError> {
        if let Some(fuel) = self.fuel.as_mut() {
            if *fuel == 0 {
                return Err(RuntimeError::FuelExhausted);
            }
            *fuel -= 1;
        }
        Ok(())
    }

    fn eval_expr(
        &mut self,
        body: &Body,
        expr: ExprId,
        args: &[Value],
    ) -> Result<Value, RuntimeError> {
        self.consume_fuel()?;
        match body.expr(expr) {
            Expr::Literal(value) => Ok(value.clone()),
            Expr::Arg(index) => Ok(args.get(*index).cloned().unwrap_or(Value::Null)),
            Expr::FunctionRef { name, function } => function
                .upgrade()
                .map(Value::Function)
                .ok_or_else(|| UndefinedCallableError::new(name).into()),
            Expr::Global(name) => self
                .context
                .global(name)
                .cloned()
                .ok_or_else(|| RuntimeError::UndefinedGlobal(name.to_string())),
            Expr::Binary { op, lhs, rhs } => {
                let lhs = self.eval_expr(body, *lhs, args)?;
                let rhs = self.eval_expr(body, *rhs, args)?;
                binary(*op, &lhs, &rhs)
            }
            Expr::If {
                cond,
                then,
                otherwise,
            } => match self.eval_expr(body, *cond, args)? {
                Value::Bool(true) => self.eval_expr(body, *then, args),
                Value::Bool(false) => self.eval_expr(body, *otherwise, args),
                other => Err(RuntimeError::type_error("if", [&other])),
            },
            Expr::Seq(exprs) => {
                let mut last = Value::Null;
                for expr in exprs {
                    last = self.eval_expr(body, *expr, args)?;
                }
                Ok(last)
            }
            Expr::Call {
                site,
                callee,
                args: arg_exprs,
            } => {
                let callee = self.eval_expr(body, *callee, args)?;
                let mut values: SmallVec<[Value; 4]> = SmallVec::with_capacity(arg_exprs.len());
                for arg in arg_exprs {
                    values.push(self.eval_expr(body, *arg, args)?);
                }
                body.call_site(*site).dispatch(self, &callee, values.as_slice())
            }
        }
    }
}

fn binary(op: BinaryOp, lhs: &Value, rhs: &Value) -> Result<Value, RuntimeError> {
    let overflow = || RuntimeError::Overflow {
        operation: op.symbol(),
    };
    match (op, lhs, rhs) {
        (BinaryOp::Eq, _, _) => Ok(Value::Bool(lhs == rhs)),
        (BinaryOp::Add, Value::Str(_), _) | (BinaryOp::Add, _, Value::Str(_)) => {
            Ok(Value::str(&format!("{lhs}{rhs}")))
        }
        (BinaryOp::Add, Value::Int(a), Value::Int(b)) => {
            a.checked_add(*b).map(Value::Int).ok_or_else(overflow)
        }
        (BinaryOp::Sub, Value::Int(a), Value::Int(b)) => {
            a.checked_sub(*b).map(Value::Int).ok_or_else(overflow)
        }
        (BinaryOp::Mul, Value::Int(a), Value::Int(b)) => {
            a.checked_mul(*b).map(Value::Int).ok_or_else(overflow)
        }
        (BinaryOp::Lt, Value::Int(a), Value::Int(b)) => Ok(Value::Bool(a < b)),
        _ => match (as_float(lhs), as_float(rhs)) {
            (Some(a), Some(b)) => Ok(match op {
                BinaryOp::Add => Value::Float(a + b),
                BinaryOp::Sub => Value::Float(a - b),
                BinaryOp::Mul => Value::Float(a * b),
                BinaryOp::Lt => Value::Bool(a < b),
                BinaryOp::Eq => Value::Bool(a == b),
            }),
            _ => Err(RuntimeError::type_error(op.symbol(), [lhs, rhs])),
        },
    }
}

fn as_float(value: &Value) -> Option<f64> {
    match value {
        Value::Int(v) => Some(*v as f64),
        Value::Float(v) => Some(*v),
        _ => None,
    }
}

// -- Dispatch ---------------------------------------------------------------

impl DispatchContext for Interpreter {
    type Value = Value;
    type Callable = Function;
    type Error = RuntimeError;
    type Bridge = HostBridge;

    fn as_callable<'v>(&self, value: &'v Value) -> Option<&'v Arc<Function>> {
        value.as_function()
    }

    fn foreign_bridge(&self) -> &HostBridge {
        self.context.bridge()
    }

    fn invoke(&mut self, target: &CallTarget, args: &[Value]) -> Result<Value, RuntimeError> {
        match target {
            CallTarget::Undefined(name) => Err(UndefinedCallableError::new(name).into()),
            CallTarget::Builtin(builtin) => builtin.call(args),
            CallTarget::Body(body) => self.eval(body, args),
        }
    }
}
