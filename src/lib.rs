pub use slate_dispatch as dispatch;

#[cfg(feature = "interpret")]
pub use slate_interop as interop;
#[cfg(feature = "interpret")]
pub use slate_interpreter as interpreter;

pub mod prelude {
    pub use slate_dispatch::{
        CallSite, Callable, Classification, DispatchConfig, DispatchContext, DispatchMode,
        UndefinedCallableError,
    };

    #[cfg(feature = "interpret")]
    pub use slate_interop::{HostFunction, HostObject, HostValue};
    #[cfg(feature = "interpret")]
    pub use slate_interpreter::{Interpreter, RuntimeError, Value};
}
