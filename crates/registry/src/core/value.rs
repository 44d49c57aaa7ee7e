use std::fmt;
use std::sync::Arc;

use super::error::CallError;
use super::object::Object;
use super::types::TypeHandle;

/// Dynamically typed value stored in namespaces, instance attributes, and call arguments.
#[derive(Clone, Default)]
pub enum Value {
	#[default]
	None,
	Bool(bool),
	Int(i64),
	Float(f64),
	Str(Arc<str>),
	List(Arc<[Value]>),
	Object(Object),
	Type(TypeHandle),
}

impl Value {
	/// Short name of the variant, used in mismatch errors.
	pub fn kind_name(&self) -> &'static str {
		match self {
			Self::None => "none",
			Self::Bool(_) => "bool",
			Self::Int(_) => "int",
			Self::Float(_) => "float",
			Self::Str(_) => "str",
			Self::List(_) => "list",
			Self::Object(_) => "object",
			Self::Type(_) => "type",
		}
	}

	pub fn is_none(&self) -> bool {
		matches!(self, Self::None)
	}

	pub fn as_bool(&self) -> Option<bool> {
		match self {
			Self::Bool(b) => Some(*b),
			_ => None,
		}
	}

	pub fn as_int(&self) -> Option<i64> {
		match self {
			Self::Int(i) => Some(*i),
			_ => None,
		}
	}

	pub fn as_float(&self) -> Option<f64> {
		match self {
			Self::Float(f) => Some(*f),
			Self::Int(i) => Some(*i as f64),
			_ => None,
		}
	}

	pub fn as_str(&self) -> Option<&str> {
		match self {
			Self::Str(s) => Some(s),
			_ => None,
		}
	}

	pub fn as_list(&self) -> Option<&[Value]> {
		match self {
			Self::List(items) => Some(items),
			_ => None,
		}
	}

	pub fn as_object(&self) -> Option<&Object> {
		match self {
			Self::Object(obj) => Some(obj),
			_ => None,
		}
	}

	pub fn as_type(&self) -> Option<&TypeHandle> {
		match self {
			Self::Type(ty) => Some(ty),
			_ => None,
		}
	}

	/// Returns the integer payload or a [`CallError::TypeMismatch`].
	pub fn try_int(&self) -> Result<i64, CallError> {
		self.as_int().ok_or_else(|| self.mismatch("int"))
	}

	/// Returns the float payload (ints widen) or a [`CallError::TypeMismatch`].
	pub fn try_float(&self) -> Result<f64, CallError> {
		self.as_float().ok_or_else(|| self.mismatch("float"))
	}

	/// Returns the string payload or a [`CallError::TypeMismatch`].
	pub fn try_str(&self) -> Result<&str, CallError> {
		self.as_str().ok_or_else(|| self.mismatch("str"))
	}

	/// Returns the object payload or a [`CallError::TypeMismatch`].
	pub fn try_object(&self) -> Result<&Object, CallError> {
		self.as_object().ok_or_else(|| self.mismatch("object"))
	}

	fn mismatch(&self, expected: &'static str) -> CallError {
		CallError::TypeMismatch {
			expected,
			found: self.kind_name(),
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Self::None, Self::None) => true,
			(Self::Bool(a), Self::Bool(b)) => a == b,
			(Self::Int(a), Self::Int(b)) => a == b,
			(Self::Float(a), Self::Float(b)) => a == b,
			(Self::Int(a), Self::Float(b)) | (Self::Float(b), Self::Int(a)) => (*a as f64) == *b,
			(Self::Str(a), Self::Str(b)) => a == b,
			(Self::List(a), Self::List(b)) => a == b,
			(Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
			(Self::Type(a), Self::Type(b)) => a == b,
			_ => false,
		}
	}
}

impl fmt::Debug for Value {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::None => write!(f, "None"),
			Self::Bool(b) => write!(f, "{b}"),
			Self::Int(i) => write!(f, "{i}"),
			Self::Float(x) => write!(f, "{x:?}"),
			Self::Str(s) => write!(f, "{s:?}"),
			Self::List(items) => f.debug_list().entries(items.iter()).finish(),
			Self::Object(obj) => write!(f, "{obj:?}"),
			Self::Type(ty) => write!(f, "{ty:?}"),
		}
	}
}

impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Self::Bool(b)
	}
}

impl From<i64> for Value {
	fn from(i: i64) -> Self {
		Self::Int(i)
	}
}

impl From<i32> for Value {
	fn from(i: i32) -> Self {
		Self::Int(i64::from(i))
	}
}

impl From<f64> for Value {
	fn from(x: f64) -> Self {
		Self::Float(x)
	}
}

impl From<&str> for Value {
	fn from(s: &str) -> Self {
		Self::Str(Arc::from(s))
	}
}

impl From<String> for Value {
	fn from(s: String) -> Self {
		Self::Str(Arc::from(s))
	}
}

impl From<Vec<Value>> for Value {
	fn from(items: Vec<Value>) -> Self {
		Self::List(Arc::from(items))
	}
}

impl From<Object> for Value {
	fn from(obj: Object) -> Self {
		Self::Object(obj)
	}
}

impl From<TypeHandle> for Value {
	fn from(ty: TypeHandle) -> Self {
		Self::Type(ty)
	}
}

impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(opt: Option<T>) -> Self {
		opt.map_or(Self::None, Into::into)
	}
}
