//! Skeleton type protocol: construction, class-level forwarding and structural checks.
//!
//! Skeleton types never produce instances of their own. Constructing one resolves the
//! aggregate for its logical name in the ambient registry and constructs that instead.
//! Class methods declared on a skeleton are stored as forwarding members; calling one
//! binds the arguments against the authored signature, then redirects to the
//! aggregate when a ready registry knows the name, or runs the authored body on the
//! skeleton otherwise.

use std::sync::Arc;

use crate::context;
use crate::core::object::invoke;
use crate::core::{
	Args, CallError, Invocation, LogicalName, Method, Object, Receiver, RegistryError, Signature, TypeHandle,
	Value,
};
use crate::db::Registry;

/// Something that names an aggregate and can be resolved to it.
pub trait Resolvable {
	/// Logical name to look up; `None` when the value resolves to itself.
	fn logical_name(&self) -> Option<&LogicalName>;

	/// Resolves against an explicit registry.
	fn resolve_in(&self, registry: &Registry) -> Result<TypeHandle, RegistryError>;

	/// Resolves against the registry installed for this thread.
	fn resolve(&self) -> Result<TypeHandle, RegistryError> {
		let registry = context::current()?;
		self.resolve_in(&registry)
	}
}

impl Resolvable for TypeHandle {
	fn logical_name(&self) -> Option<&LogicalName> {
		TypeHandle::logical_name(self)
	}

	fn resolve_in(&self, registry: &Registry) -> Result<TypeHandle, RegistryError> {
		match TypeHandle::logical_name(self) {
			Some(name) => registry.resolve(name.as_str()),
			None => Ok(self.clone()),
		}
	}

	fn resolve(&self) -> Result<TypeHandle, RegistryError> {
		match TypeHandle::logical_name(self) {
			Some(name) => context::resolve(name.as_str()),
			None => Ok(self.clone()),
		}
	}
}

impl Resolvable for LogicalName {
	fn logical_name(&self) -> Option<&LogicalName> {
		Some(self)
	}

	fn resolve_in(&self, registry: &Registry) -> Result<TypeHandle, RegistryError> {
		registry.resolve(self.as_str())
	}
}

impl TypeHandle {
	/// Creates an instance.
	///
	/// A skeleton constructs its aggregate from the ambient registry. Any other type
	/// allocates an instance of itself and runs the first `__init__` on its resolution
	/// order; without one, `args` must be empty.
	pub fn construct(&self, args: Args) -> Result<Object, CallError> {
		if self.is_skeleton() {
			let target = Resolvable::resolve(self)?;
			tracing::trace!(skeleton = %self.qualname(), target = %target.name(), "Constructing aggregate");
			return target.construct(args);
		}

		let obj = Object::alloc(self.clone());
		match self.lookup("__init__") {
			Some((owner, member)) => {
				invoke(&Receiver::Instance(obj.clone()), owner, member, "__init__", args)?;
			}
			None => {
				Signature::new()
					.bind(&args)
					.map_err(|source| CallError::ArgumentBinding {
						callable: self.name_arc(),
						source,
					})?;
			}
		}
		Ok(obj)
	}

	/// Calls a class-level member with this type as receiver.
	pub fn call_class_method(&self, name: &str, args: Args) -> Result<Value, CallError> {
		let (owner, member) = self.lookup(name).ok_or_else(|| CallError::AttributeNotFound {
			type_name: self.name_arc(),
			attr: Arc::from(name),
		})?;
		invoke(&Receiver::Class(self.clone()), owner, member, name, args)
	}

	/// Subclass check aware of logical names.
	///
	/// A skeleton answers through its aggregate when the ambient registry has built
	/// one. When a type carries recorded base names and `other` has a logical name,
	/// the answer is whether that name was recorded. Otherwise `other` must appear in
	/// the resolution order, directly or as the origin of an aggregate in it.
	pub fn is_subclass(&self, other: &TypeHandle) -> bool {
		if self.is_skeleton() {
			match Resolvable::resolve(self) {
				Ok(target) if target != *self => return target.is_subclass(other),
				Ok(_) => {}
				Err(e) => {
					tracing::trace!(class = %self.qualname(), reason = %e, "Structural subclass check");
				}
			}
		}
		if let (Some(name), Some(recorded)) = (TypeHandle::logical_name(other), self.recorded_base_names()) {
			return recorded.contains(name);
		}
		self.mro().any(|ty| ty == other || ty.origin() == Some(other))
	}
}

impl Object {
	/// [`TypeHandle::is_subclass`] applied to the instance's type.
	pub fn is_instance(&self, ty: &TypeHandle) -> bool {
		self.type_of().is_subclass(ty)
	}
}

/// Runs a forwarding class method reached through `cls`.
pub(crate) fn forward_class_call(
	cls: &TypeHandle,
	owner: &TypeHandle,
	method: &Method,
	args: Args,
) -> Result<Value, CallError> {
	method.bind(&args)?;

	match Resolvable::resolve(cls) {
		Ok(target) if target != *cls => {
			tracing::trace!(
				method = %method.name(),
				from = %cls.qualname(),
				to = %target.name(),
				"Forwarding class method to aggregate"
			);
			target.call_class_method(method.name(), args)
		}
		Ok(_) => call_original(cls, owner, method, args),
		Err(e @ (RegistryError::NotInitialized | RegistryError::UnknownName(_))) => {
			tracing::debug!(
				method = %method.name(),
				class = %cls.qualname(),
				reason = %e,
				"Class method runs on the skeleton"
			);
			call_original(cls, owner, method, args)
		}
		Err(e) => Err(e.into()),
	}
}

fn call_original(cls: &TypeHandle, owner: &TypeHandle, method: &Method, args: Args) -> Result<Value, CallError> {
	let receiver = Receiver::Class(cls.clone());
	method.call(&Invocation::new(&receiver, owner, method.name()), args)
}
