use std::fmt;
use std::sync::{Arc, Weak};

use slate_arena::Arena;
use slate_dispatch::DispatchConfig;
use smallvec::SmallVec;

use crate::{Function, GuestCallSite, Value};

slate_arena::identifier! {
    /// An expression node inside a [`Body`].
    struct ExprId
}

slate_arena::identifier! {
    /// The dispatch site of one call expression inside a [`Body`].
    struct CallSiteId
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Lt,
    Eq,
}

impl BinaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            BinaryOp::Add => "+",
            BinaryOp::Sub => "-",
            BinaryOp::Mul => "*",
            BinaryOp::Lt => "<",
            BinaryOp::Eq => "==",
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

#[derive(Debug, Clone)]
pub enum Expr {
    Literal(Value),
    /// Positional argument of the enclosing body; reads `Null` when the
    /// caller passed fewer arguments.
    Arg(usize),
    /// A guest function by identity. Survives redefinition of the function.
    ///
    /// The reference is weak so a recursive body does not keep its own
    /// function alive; whoever defines the function owns it.
    FunctionRef {
        name: Arc<str>,
        function: Weak<Function>,
    },
    /// A value exported into the context under a name.
    Global(Arc<str>),
    Binary {
        op: BinaryOp,
        lhs: ExprId,
        rhs: ExprId,
    },
    If {
        cond: ExprId,
        then: ExprId,
        otherwise: ExprId,
    },
    /// Evaluate in order, yield the last value (`Null` when empty).
    Seq(Vec<ExprId>),
    Call {
        site: CallSiteId,
        callee: ExprId,
        args: SmallVec<[ExprId; 4]>,
    },
}

/// A function body: an expression tree plus one call site per call
/// expression.
///
/// Call sites live and die with the body, so redefining a function drops
/// the inline caches of its previous body.
pub struct Body {
    params: usize,
    exprs: Arena<ExprId, Expr>,
    sites: Arena<CallSiteId, GuestCallSite>,
    root: ExprId,
}

impl Body {
    /// Declared number of parameters.
    pub fn params(&self) -> usize {
        self.params
    }

    pub fn root(&self) -> ExprId {
        self.root
    }

    pub fn expr(&self, id: ExprId) -> &Expr {
        &self.exprs[id]
    }

    /// Number of expression nodes.
    pub fn len(&self) -> usize {
        self.exprs.len()
    }

    pub fn is_empty(&self) -> bool {
        self.exprs.is_empty()
    }

    pub fn call_site(&self, id: CallSiteId) -> &GuestCallSite {
        &self.sites[id]
    }

    pub fn call_sites(&self) -> impl Iterator<Item = (CallSiteId, &GuestCallSite)> {
        self.sites.iter()
    }

    /// Empty the inline caches of every call site in this body.
    ///
    /// Cached targets are strong, so a recursive body caches itself. The
    /// owning function clears the caches once it lets go of the body.
    pub fn clear_call_sites(&self) {
        for (_, site) in self.sites.iter() {
            site.clear_entries();
        }
    }
}

impl fmt::Debug for Body {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Body")
            .field("params", &self.params)
            .field("exprs", &self.exprs)
            .field("sites", &self.sites.len())
            .field("root", &self.root)
            .finish()
    }
}

/// Incremental constructor for a [`Body`].
///
/// Children have to be built before their parents, so every id handed out
/// refers to an existing node. Call sites are created together with their
/// call expression.
///
/// ```ignore
/// let mut b = BodyBuilder::new(1);
/// let x = b.arg(0);
/// let one = b.literal(1);
/// let root = b.add(x, one);
/// let body = b.finish(root);
/// ```
pub struct BodyBuilder {
    params: usize,
    config: DispatchConfig,
    exprs: Arena<ExprId, Expr>,
    sites: Arena<CallSiteId, GuestCallSite>,
}

impl BodyBuilder {
    pub fn new(params: usize) -> Self {
        Self {
            params,
            config: DispatchConfig::default(),
            exprs: Arena::default(),
            sites: Arena::default(),
        }
    }

    /// Configuration applied to the call sites created from now on.
    pub fn with_dispatch_config(mut self, config: DispatchConfig) -> Self {
        self.config = config;
        self
    }

    pub fn expr(&mut self, expr: Expr) -> ExprId {
        self.exprs.alloc(expr)
    }

    pub fn literal(&mut self, value: impl Into<Value>) -> ExprId {
        self.expr(Expr::Literal(value.into()))
    }

    pub fn null(&mut self) -> ExprId {
        self.expr(Expr::Literal(Value::Null))
    }

    pub fn arg(&mut self, index: usize) -> ExprId {
        self.expr(Expr::Arg(index))
    }

    pub fn function(&mut self, function: &Arc<Function>) -> ExprId {
        self.expr(Expr::FunctionRef {
            name: Arc::from(function.name()),
            function: Arc::downgrade(function),
        })
    }

    pub fn global(&mut self, name: &str) -> ExprId {
        self.expr(Expr::Global(Arc::from(name)))
    }

    pub fn binary(&mut self, op: BinaryOp, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.expr(Expr::Binary { op, lhs, rhs })
    }

    pub fn add(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Add, lhs, rhs)
    }

    pub fn sub(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Sub, lhs, rhs)
    }

    pub fn mul(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Mul, lhs, rhs)
    }

    pub fn lt(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Lt, lhs, rhs)
    }

    pub fn eq(&mut self, lhs: ExprId, rhs: ExprId) -> ExprId {
        self.binary(BinaryOp::Eq, lhs, rhs)
    }

    pub fn cond(&mut self, cond: ExprId, then: ExprId, otherwise: ExprId) -> ExprId {
        self.expr(Expr::If {
            cond,
            then,
            otherwise,
        })
    }

    pub fn seq(&mut self, exprs: impl IntoIterator<Item = ExprId>) -> ExprId {
        self.expr(Expr::Seq(exprs.into_iter().collect()))
    }

    /// A call expression with a fresh call site.
    pub fn call(&mut self, callee: ExprId, args: impl IntoIterator<Item = ExprId>) -> ExprId {
        let site = self.sites.alloc(GuestCallSite::new(self.config));
        self.expr(Expr::Call {
            site,
            callee,
            args: args.into_iter().collect(),
        })
    }

    /// Call a guest function by identity.
    pub fn call_function(
        &mut self,
        function: &Arc<Function>,
        args: impl IntoIterator<Item = ExprId>,
    ) -> ExprId {
        let callee = self.function(function);
        self.call(callee, args)
    }

    pub fn finish(self, root: ExprId) -> Body {
        debug_assert!(self.exprs.get(root).is_some(), "root {root} not in body");
        Body {
            params: self.params,
            exprs: self.exprs,
            sites: self.sites,
            root,
        }
    }
}
