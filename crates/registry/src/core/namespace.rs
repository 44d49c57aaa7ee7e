use std::fmt;
use std::sync::Arc;

use indexmap::IndexMap;

use super::error::CallError;
use super::object::Invocation;
use super::signature::{Args, BoundArgs, Signature};
use super::value::Value;

/// Native body of a method or class method.
pub type NativeFn = dyn Fn(&Invocation<'_>, &BoundArgs) -> Result<Value, CallError> + Send + Sync;

/// A named callable with its authored signature.
#[derive(Clone)]
pub struct Method {
	name: Arc<str>,
	signature: Signature,
	func: Arc<NativeFn>,
}

impl Method {
	pub fn new<F>(name: &str, signature: Signature, func: F) -> Self
	where
		F: Fn(&Invocation<'_>, &BoundArgs) -> Result<Value, CallError> + Send + Sync + 'static,
	{
		Self {
			name: Arc::from(name),
			signature,
			func: Arc::new(func),
		}
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn signature(&self) -> &Signature {
		&self.signature
	}

	/// Binds `args` against the authored signature.
	pub fn bind(&self, args: &Args) -> Result<BoundArgs, CallError> {
		self.signature
			.bind(args)
			.map_err(|source| CallError::ArgumentBinding {
				callable: self.name.clone(),
				source,
			})
	}

	/// Binds and runs the body.
	pub fn call(&self, inv: &Invocation<'_>, args: Args) -> Result<Value, CallError> {
		let bound = self.bind(&args)?;
		(self.func)(inv, &bound)
	}
}

impl fmt::Debug for Method {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Method")
			.field("name", &self.name)
			.field("signature", &self.signature)
			.finish_non_exhaustive()
	}
}

/// One entry of a class namespace.
#[derive(Clone, Debug)]
pub enum Member {
	/// Plain class attribute.
	Attr(Value),
	/// Instance method.
	Method(Method),
	/// Class-level method, unwrapped.
	ClassMethod(Method),
	/// Class-level method on a skeleton, forwarding to the aggregate at call time.
	Forwarding(Method),
}

/// Ordered member table of a class body.
#[derive(Clone, Debug, Default)]
pub struct Namespace {
	members: IndexMap<Arc<str>, Member>,
}

impl Namespace {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn insert(&mut self, name: &str, member: Member) -> Option<Member> {
		self.members.insert(Arc::from(name), member)
	}

	pub fn get(&self, name: &str) -> Option<&Member> {
		self.members.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.members.contains_key(name)
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Member)> {
		self.members.iter().map(|(k, v)| (&**k, v))
	}

	pub fn len(&self) -> usize {
		self.members.len()
	}

	pub fn is_empty(&self) -> bool {
		self.members.is_empty()
	}

	/// Copy of this namespace with every class method turned into a forwarding member.
	pub(crate) fn wrap_class_methods(&self) -> Namespace {
		self.members
			.iter()
			.map(|(name, member)| {
				let wrapped = match member {
					Member::ClassMethod(method) => Member::Forwarding(method.clone()),
					other => other.clone(),
				};
				(name.clone(), wrapped)
			})
			.collect()
	}
}

impl FromIterator<(Arc<str>, Member)> for Namespace {
	fn from_iter<I: IntoIterator<Item = (Arc<str>, Member)>>(iter: I) -> Self {
		Self {
			members: iter.into_iter().collect(),
		}
	}
}
