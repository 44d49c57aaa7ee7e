//! Extendable classes assembled from fragments declared across modules.
//!
//! Modules declare class bodies with [`ClassBuilder`]. Each declaration yields a
//! skeleton type and records a [`ClassFragment`] in a [`FragmentStore`]. A
//! [`Registry`] later merges the fragments of a selection of modules by logical name
//! and synthesizes one aggregate type per name, with the extensions layered in merge
//! order. Once the registry is installed in the [`context`], skeletons construct
//! aggregates and forward their class methods to them.
//!
//! # Modules
//!
//! - [`core`] - Values, signatures, types, instances, and errors
//! - [`fragments`] - Fragment declaration and the ordered store
//! - [`db`] - Registry merge and synthesis, module filter, build listeners
//! - [`context`] - Thread-local ambient registry
//! - [`protocol`] - Skeleton construction, forwarding, and subclass checks
//!
//! # Declaring modules at link time
//!
//! ```ignore
//! fn declare(scope: &ModuleScope<'_>) -> Result<(), DeclareError> {
//! 	scope.class("Base").attr("value", 1).declare(scope)?;
//! 	Ok(())
//! }
//!
//! extendable_registry::declare_module!("app.base", 0, declare);
//! ```

pub mod context;
pub mod core;
pub mod db;
pub mod fragments;
pub mod protocol;

pub use crate::core::{
	Args, BindError, BoundArgs, CallError, DeclareError, Invocation, LogicalName, Member, Method, ModuleId,
	Namespace, Object, Param, ParamKind, Receiver, RegistryError, Signature, TypeHandle, TypeKind, Value,
};
pub use context::RegistryGuard;
pub use db::{AfterBuild, BeforeBuild, BuildOptions, ModuleIndex, Registry, RegistryListener};
pub use fragments::{ClassBuilder, ClassFragment, FragmentHierarchy, FragmentStore, ModuleDecl, ModuleScope};
pub use protocol::Resolvable;

#[doc(hidden)]
pub mod __private {
	pub use inventory;
}
