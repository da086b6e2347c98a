//! A small tree-walking guest interpreter whose call expressions dispatch
//! through `slate_dispatch` inline caches.

mod body;
mod bridge;
mod builtins;
mod context;
mod error;
mod function;
mod interpreter;
mod registry;
mod value;

pub use body::{BinaryOp, Body, BodyBuilder, CallSiteId, Expr, ExprId};
pub use bridge::HostBridge;
pub use builtins::{Builtin, BuiltinFn};
pub use context::Context;
pub use error::RuntimeError;
pub use function::{CallTarget, Function};
pub use interpreter::{DEFAULT_MAX_DEPTH, Interpreter};
pub use registry::FunctionRegistry;
pub use value::Value;

/// Call site specialized on guest functions.
pub type GuestCallSite = slate_dispatch::CallSite<Function>;
