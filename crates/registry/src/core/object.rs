//! Instances and the method invocation context.

use std::fmt;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::FxHashMap;

use super::error::CallError;
use super::namespace::Member;
use super::signature::Args;
use super::types::TypeHandle;
use super::value::Value;

struct Instance {
	ty: TypeHandle,
	attrs: RwLock<FxHashMap<Arc<str>, Value>>,
}

/// Shared handle to an instance. Equality is identity.
#[derive(Clone)]
pub struct Object(Arc<Instance>);

impl Object {
	pub(crate) fn alloc(ty: TypeHandle) -> Self {
		Self(Arc::new(Instance {
			ty,
			attrs: RwLock::new(FxHashMap::default()),
		}))
	}

	/// Concrete type of the instance; an aggregate when built through a skeleton.
	pub fn type_of(&self) -> &TypeHandle {
		&self.0.ty
	}

	/// Reads an instance attribute, falling back to class attributes along the resolution order.
	pub fn get_attr(&self, name: &str) -> Result<Value, CallError> {
		if let Some(value) = self.0.attrs.read().get(name) {
			return Ok(value.clone());
		}
		self.type_of().get_attr(name)
	}

	pub fn set_attr(&self, name: &str, value: impl Into<Value>) {
		self.0.attrs.write().insert(Arc::from(name), value.into());
	}

	pub fn has_attr(&self, name: &str) -> bool {
		self.0.attrs.read().contains_key(name)
			|| matches!(self.type_of().lookup(name), Some((_, Member::Attr(_))))
	}

	/// Calls the first method named `name` along the instance's resolution order.
	pub fn call_method(&self, name: &str, args: Args) -> Result<Value, CallError> {
		let receiver = Receiver::Instance(self.clone());
		let (owner, member) = self.type_of().lookup(name).ok_or_else(|| CallError::AttributeNotFound {
			type_name: self.type_of().name_arc(),
			attr: Arc::from(name),
		})?;
		invoke(&receiver, owner, member, name, args)
	}

	pub fn ptr_eq(&self, other: &Object) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl PartialEq for Object {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for Object {}

impl fmt::Debug for Object {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "<{} object at {:p}>", self.type_of().name(), Arc::as_ptr(&self.0))
	}
}

impl TypeHandle {
	/// Reads a class attribute along the resolution order.
	pub fn get_attr(&self, name: &str) -> Result<Value, CallError> {
		match self.lookup(name) {
			Some((_, Member::Attr(value))) => Ok(value.clone()),
			_ => Err(CallError::AttributeNotFound {
				type_name: self.name_arc(),
				attr: Arc::from(name),
			}),
		}
	}
}

/// What a method body was invoked on.
#[derive(Clone, Debug)]
pub enum Receiver {
	Instance(Object),
	Class(TypeHandle),
}

impl Receiver {
	/// The receiver's class: the instance's type, or the class itself.
	pub fn class(&self) -> &TypeHandle {
		match self {
			Self::Instance(obj) => obj.type_of(),
			Self::Class(ty) => ty,
		}
	}
}

/// Context handed to a method body.
pub struct Invocation<'a> {
	receiver: &'a Receiver,
	owner: &'a TypeHandle,
	name: &'a str,
}

impl<'a> Invocation<'a> {
	pub(crate) fn new(receiver: &'a Receiver, owner: &'a TypeHandle, name: &'a str) -> Self {
		Self { receiver, owner, name }
	}

	pub fn receiver(&self) -> &Receiver {
		self.receiver
	}

	/// The instance for instance-method bodies.
	pub fn this(&self) -> Result<&Object, CallError> {
		match self.receiver {
			Receiver::Instance(obj) => Ok(obj),
			Receiver::Class(ty) => Err(CallError::NotCallable {
				type_name: ty.name_arc(),
				attr: Arc::from(self.name),
			}),
		}
	}

	pub fn cls(&self) -> &TypeHandle {
		self.receiver.class()
	}

	/// Type whose namespace holds the running body.
	pub fn owner(&self) -> &TypeHandle {
		self.owner
	}

	pub fn method_name(&self) -> &str {
		self.name
	}

	/// Reads an attribute of the receiver.
	pub fn get(&self, name: &str) -> Result<Value, CallError> {
		match self.receiver {
			Receiver::Instance(obj) => obj.get_attr(name),
			Receiver::Class(ty) => ty.get_attr(name),
		}
	}

	/// Sets an instance attribute on the receiver.
	pub fn set(&self, name: &str, value: impl Into<Value>) -> Result<(), CallError> {
		self.this()?.set_attr(name, value);
		Ok(())
	}

	/// Calls `name` on the receiver from the start of its resolution order.
	pub fn call_method(&self, name: &str, args: Args) -> Result<Value, CallError> {
		let (owner, member) = self.cls().lookup(name).ok_or_else(|| self.not_found(name))?;
		invoke(self.receiver, owner, member, name, args)
	}

	/// Calls the next implementation of the running method after the owner.
	pub fn super_call(&self, args: Args) -> Result<Value, CallError> {
		self.super_method(self.name, args)
	}

	/// Calls `name` starting after the owner in the receiver's resolution order.
	pub fn super_method(&self, name: &str, args: Args) -> Result<Value, CallError> {
		let (owner, member) = self
			.cls()
			.lookup_after(self.owner, name)
			.ok_or_else(|| self.not_found(name))?;
		invoke(self.receiver, owner, member, name, args)
	}

	fn not_found(&self, name: &str) -> CallError {
		CallError::AttributeNotFound {
			type_name: self.cls().name_arc(),
			attr: Arc::from(name),
		}
	}
}

/// Dispatches one resolved member against a receiver.
pub(crate) fn invoke(
	receiver: &Receiver,
	owner: &TypeHandle,
	member: &Member,
	name: &str,
	args: Args,
) -> Result<Value, CallError> {
	match (member, receiver) {
		(Member::Method(method), Receiver::Instance(_)) => {
			method.call(&Invocation::new(receiver, owner, name), args)
		}
		(Member::ClassMethod(method), _) => {
			let cls = Receiver::Class(receiver.class().clone());
			method.call(&Invocation::new(&cls, owner, name), args)
		}
		(Member::Forwarding(method), _) => {
			crate::protocol::forward_class_call(receiver.class(), owner, method, args)
		}
		(Member::Method(_), Receiver::Class(_)) | (Member::Attr(_), _) => Err(CallError::NotCallable {
			type_name: receiver.class().name_arc(),
			attr: Arc::from(name),
		}),
	}
}
