use std::sync::Arc;

use super::{ClassFragment, FragmentStore};
use crate::core::types::TypeSpec;
use crate::core::{
	BoundArgs, CallError, DeclareError, Invocation, LogicalName, Member, Method, ModuleId, Namespace,
	Signature, TypeHandle, TypeKind, Value,
};

/// Declares one class body.
///
/// `declare` turns the body into a skeleton type plus a [`ClassFragment`];
/// `build_plain` produces an ordinary type that never takes part in aggregation.
pub struct ClassBuilder {
	module: ModuleId,
	qualname: Arc<str>,
	bases: Vec<TypeHandle>,
	extends: Option<TypeHandle>,
	namespace: Namespace,
}

impl ClassBuilder {
	pub fn new(module: &str, qualname: &str) -> Self {
		Self {
			module: ModuleId::from(module),
			qualname: Arc::from(qualname),
			bases: Vec::new(),
			extends: None,
			namespace: Namespace::new(),
		}
	}

	/// Appends a base type, in declaration order.
	pub fn base(mut self, base: &TypeHandle) -> Self {
		self.bases.push(base.clone());
		self
	}

	/// Makes this body an extension of `target`'s logical name.
	pub fn extends(mut self, target: &TypeHandle) -> Self {
		self.extends = Some(target.clone());
		self
	}

	pub fn attr(mut self, name: &str, value: impl Into<Value>) -> Self {
		self.namespace.insert(name, Member::Attr(value.into()));
		self
	}

	pub fn method<F>(mut self, name: &str, signature: Signature, func: F) -> Self
	where
		F: Fn(&Invocation<'_>, &BoundArgs) -> Result<Value, CallError> + Send + Sync + 'static,
	{
		self.namespace
			.insert(name, Member::Method(Method::new(name, signature, func)));
		self
	}

	pub fn class_method<F>(mut self, name: &str, signature: Signature, func: F) -> Self
	where
		F: Fn(&Invocation<'_>, &BoundArgs) -> Result<Value, CallError> + Send + Sync + 'static,
	{
		self.namespace
			.insert(name, Member::ClassMethod(Method::new(name, signature, func)));
		self
	}

	fn full_name(&self) -> Arc<str> {
		Arc::from(format!("{}.{}", self.module, self.qualname))
	}

	fn simple_name(&self) -> Arc<str> {
		Arc::from(self.qualname.rsplit('.').next().unwrap_or(&self.qualname))
	}

	/// Creates the skeleton type and records the fragment in `store`.
	pub fn declare(self, store: &FragmentStore) -> Result<TypeHandle, DeclareError> {
		let full_name = self.full_name();
		let logical_name = match &self.extends {
			Some(target) => target
				.logical_name()
				.cloned()
				.ok_or_else(|| DeclareError::InvalidExtendsTarget {
					qualname: full_name.clone(),
					target: target.qualname_arc(),
				})?,
			None => LogicalName::new(full_name.clone()),
		};

		let declared_base_names: Vec<LogicalName> = self
			.bases
			.iter()
			.filter_map(|b| b.logical_name().cloned())
			.collect();
		let other_bases: Vec<TypeHandle> = self
			.bases
			.iter()
			.filter(|b| !b.is_extendable())
			.cloned()
			.collect();

		let skeleton = TypeHandle::create(TypeSpec {
			name: self.simple_name(),
			qualname: full_name.clone(),
			module: self.module.clone(),
			kind: TypeKind::Skeleton {
				logical_name: logical_name.clone(),
			},
			bases: self.bases,
			namespace: self.namespace.wrap_class_methods(),
		})
		.map_err(|_| DeclareError::InconsistentHierarchy {
			qualname: full_name.clone(),
		})?;

		let fragment = ClassFragment {
			logical_name,
			module: self.module.clone(),
			qualname: full_name,
			declared_base_names,
			other_bases,
			namespace: self.namespace,
			skeleton: skeleton.clone(),
		};
		store.register(&self.module, fragment);
		Ok(skeleton)
	}

	/// Creates an ordinary type outside the registry.
	pub fn build_plain(self) -> Result<TypeHandle, DeclareError> {
		let full_name = self.full_name();
		if let Some(base) = self.bases.iter().find(|b| b.is_extendable()) {
			return Err(DeclareError::PlainSubclassOfExtendable {
				qualname: full_name,
				base: base.qualname_arc(),
			});
		}
		if let Some(target) = &self.extends {
			return Err(DeclareError::InvalidExtendsTarget {
				qualname: full_name,
				target: target.qualname_arc(),
			});
		}
		TypeHandle::create(TypeSpec {
			name: self.simple_name(),
			qualname: full_name.clone(),
			module: self.module,
			kind: TypeKind::Plain,
			bases: self.bases,
			namespace: self.namespace,
		})
		.map_err(|_| DeclareError::InconsistentHierarchy { qualname: full_name })
	}
}
