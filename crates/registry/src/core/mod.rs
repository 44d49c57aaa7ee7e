//! Dynamic object model shared by declarations, the registry, and the skeleton protocol.

pub mod error;
pub mod linearize;
pub mod namespace;
pub mod object;
pub mod ordered;
pub mod signature;
pub mod types;
pub mod value;

pub use error::{BindError, CallError, DeclareError, RegistryError};
pub use linearize::LinearizeError;
pub use namespace::{Member, Method, Namespace, NativeFn};
pub use object::{Invocation, Object, Receiver};
pub use ordered::LastOrderedSet;
pub use signature::{Args, BoundArgs, Param, ParamKind, Signature};
pub use types::{LogicalName, ModuleId, TypeHandle, TypeKind};
pub use value::Value;
