//! Value model of the host domain guest code can call into.
//!
//! Host values are what foreign code accepts and returns. Guest runtimes
//! translate their own values to and from [`HostValue`] at the boundary and
//! drive execution through [`HostObject::execute`].

mod error;
mod function;
mod object;
mod value;

pub use error::HostError;
pub use function::HostFunction;
pub use object::HostObject;
pub use value::HostValue;
