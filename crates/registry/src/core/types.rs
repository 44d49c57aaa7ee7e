//! Type handles: the arena-style representation of plain, skeleton, and aggregate types.
//!
//! A [`TypeHandle`] is an `Arc`-backed, identity-compared reference to an immutable
//! type record. Records are produced by [`TypeHandle::create`], which computes the
//! resolution order eagerly so dispatch never walks the base graph.

use std::borrow::Borrow;
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::{Arc, OnceLock};

use rustc_hash::FxHashSet;

use super::linearize::{LinearizeError, c3_merge};
use super::namespace::{Member, Namespace};

/// Identifier of the module that declared a fragment.
pub type ModuleId = Arc<str>;

/// Aggregation key shared by every fragment of one extendable class.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LogicalName(Arc<str>);

impl LogicalName {
	pub fn new(name: impl Into<Arc<str>>) -> Self {
		Self(name.into())
	}

	pub fn as_str(&self) -> &str {
		&self.0
	}

	/// Last dotted path segment.
	pub fn simple_name(&self) -> &str {
		self.0.rsplit('.').next().unwrap_or(&self.0)
	}
}

impl Borrow<str> for LogicalName {
	fn borrow(&self) -> &str {
		&self.0
	}
}

impl fmt::Display for LogicalName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(&self.0)
	}
}

impl fmt::Debug for LogicalName {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(f, "{:?}", &*self.0)
	}
}

impl From<&str> for LogicalName {
	fn from(s: &str) -> Self {
		Self::new(s)
	}
}

/// Role of a type in the extension protocol.
#[derive(Clone, Debug)]
pub enum TypeKind {
	/// Ordinary type outside the registry.
	Plain,
	/// Type produced at declaration time; construction and class calls redirect.
	Skeleton { logical_name: LogicalName },
	/// Type synthesized by a registry build.
	Aggregate { logical_name: LogicalName, origin: TypeHandle },
}

pub(crate) struct TypeSpec {
	pub name: Arc<str>,
	pub qualname: Arc<str>,
	pub module: ModuleId,
	pub kind: TypeKind,
	pub bases: Vec<TypeHandle>,
	pub namespace: Namespace,
}

struct TypeRecord {
	name: Arc<str>,
	qualname: Arc<str>,
	module: ModuleId,
	kind: TypeKind,
	bases: Vec<TypeHandle>,
	/// Resolution order excluding the type itself.
	mro_tail: Vec<TypeHandle>,
	namespace: Namespace,
	all_base_names: OnceLock<FxHashSet<LogicalName>>,
}

/// Shared handle to a type record. Equality and hashing use identity.
#[derive(Clone)]
pub struct TypeHandle(Arc<TypeRecord>);

impl TypeHandle {
	pub(crate) fn create(spec: TypeSpec) -> Result<Self, LinearizeError> {
		let mro_tail = c3_merge(&spec.bases)?;
		Ok(Self(Arc::new(TypeRecord {
			name: spec.name,
			qualname: spec.qualname,
			module: spec.module,
			kind: spec.kind,
			bases: spec.bases,
			mro_tail,
			namespace: spec.namespace,
			all_base_names: OnceLock::new(),
		})))
	}

	pub fn name(&self) -> &str {
		&self.0.name
	}

	pub(crate) fn name_arc(&self) -> Arc<str> {
		self.0.name.clone()
	}

	pub fn qualname(&self) -> &str {
		&self.0.qualname
	}

	pub(crate) fn qualname_arc(&self) -> Arc<str> {
		self.0.qualname.clone()
	}

	pub fn module(&self) -> &str {
		&self.0.module
	}

	pub fn kind(&self) -> &TypeKind {
		&self.0.kind
	}

	/// Logical name of skeleton and aggregate types; `None` for plain types.
	pub fn logical_name(&self) -> Option<&LogicalName> {
		match &self.0.kind {
			TypeKind::Plain => None,
			TypeKind::Skeleton { logical_name } | TypeKind::Aggregate { logical_name, .. } => {
				Some(logical_name)
			}
		}
	}

	/// True for skeleton and aggregate types.
	pub fn is_extendable(&self) -> bool {
		self.logical_name().is_some()
	}

	pub fn is_skeleton(&self) -> bool {
		matches!(self.0.kind, TypeKind::Skeleton { .. })
	}

	pub fn is_aggregate(&self) -> bool {
		matches!(self.0.kind, TypeKind::Aggregate { .. })
	}

	/// Skeleton type an aggregate was synthesized from.
	pub fn origin(&self) -> Option<&TypeHandle> {
		match &self.0.kind {
			TypeKind::Aggregate { origin, .. } => Some(origin),
			_ => None,
		}
	}

	pub fn bases(&self) -> &[TypeHandle] {
		&self.0.bases
	}

	/// Method resolution order, starting with this type.
	pub fn mro(&self) -> impl Iterator<Item = &TypeHandle> + '_ {
		std::iter::once(self).chain(self.0.mro_tail.iter())
	}

	pub fn namespace(&self) -> &Namespace {
		&self.0.namespace
	}

	/// First member named `name` along the resolution order, with the type defining it.
	pub fn lookup(&self, name: &str) -> Option<(&TypeHandle, &Member)> {
		self.mro().find_map(|ty| ty.namespace().get(name).map(|m| (ty, m)))
	}

	/// Like [`Self::lookup`], starting after `owner` in the resolution order.
	pub fn lookup_after(&self, owner: &TypeHandle, name: &str) -> Option<(&TypeHandle, &Member)> {
		self.mro()
			.skip_while(|ty| *ty != owner)
			.skip(1)
			.find_map(|ty| ty.namespace().get(name).map(|m| (ty, m)))
	}

	/// Transitive logical base names recorded on the nearest aggregate in the resolution order.
	pub fn recorded_base_names(&self) -> Option<&FxHashSet<LogicalName>> {
		self.mro().find_map(|ty| ty.0.all_base_names.get())
	}

	pub(crate) fn record_base_names(&self, names: FxHashSet<LogicalName>) {
		if self.0.all_base_names.set(names).is_err() {
			tracing::warn!(ty = %self.qualname(), "base names already recorded");
		}
	}

	pub fn ptr_eq(&self, other: &TypeHandle) -> bool {
		Arc::ptr_eq(&self.0, &other.0)
	}
}

impl PartialEq for TypeHandle {
	fn eq(&self, other: &Self) -> bool {
		self.ptr_eq(other)
	}
}

impl Eq for TypeHandle {}

impl Hash for TypeHandle {
	fn hash<H: Hasher>(&self, state: &mut H) {
		std::ptr::hash(Arc::as_ptr(&self.0), state);
	}
}

impl fmt::Debug for TypeHandle {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match &self.0.kind {
			TypeKind::Plain => write!(f, "<class '{}'>", self.0.qualname),
			TypeKind::Skeleton { logical_name } => {
				write!(f, "<skeleton '{}' of {}>", self.0.qualname, logical_name)
			}
			TypeKind::Aggregate { logical_name, .. } => {
				write!(f, "<aggregate '{}' of {}>", self.0.name, logical_name)
			}
		}
	}
}
