//! Class fragments and the ordered store they are declared into.
//!
//! # Mental Model
//!
//! 1. **Declaration:** [`ClassBuilder::declare`] produces a skeleton type and records a
//!    [`ClassFragment`] under its declaring module.
//! 2. **Storage:** [`FragmentStore`] keeps fragments grouped by module, modules in
//!    first-registration order. Appends publish a new snapshot; readers never block.
//! 3. **Consumption:** a [`crate::Registry`] clones the fragments of the modules it
//!    selects and merges them into [`FragmentHierarchy`] values.

mod builder;
mod hierarchy;

use std::ops::Deref;
use std::sync::{Arc, LazyLock};

use arc_swap::ArcSwap;
use indexmap::IndexMap;
use rustc_hash::FxHashMap;

pub use builder::ClassBuilder;
pub use hierarchy::FragmentHierarchy;

use crate::core::{DeclareError, LogicalName, ModuleId, Namespace, TypeHandle};

/// One declared class body.
#[derive(Clone, Debug)]
pub struct ClassFragment {
	pub(crate) logical_name: LogicalName,
	pub(crate) module: ModuleId,
	pub(crate) qualname: Arc<str>,
	pub(crate) declared_base_names: Vec<LogicalName>,
	pub(crate) other_bases: Vec<TypeHandle>,
	pub(crate) namespace: Namespace,
	pub(crate) skeleton: TypeHandle,
}

impl ClassFragment {
	pub fn logical_name(&self) -> &LogicalName {
		&self.logical_name
	}

	pub fn module(&self) -> &str {
		&self.module
	}

	/// `module.qualname` of the declaration.
	pub fn qualname(&self) -> &str {
		&self.qualname
	}

	pub fn declared_base_names(&self) -> &[LogicalName] {
		&self.declared_base_names
	}

	pub fn other_bases(&self) -> &[TypeHandle] {
		&self.other_bases
	}

	/// Members as authored, class methods unwrapped.
	pub fn namespace(&self) -> &Namespace {
		&self.namespace
	}

	pub fn skeleton(&self) -> &TypeHandle {
		&self.skeleton
	}
}

#[derive(Clone, Default)]
struct StoreSnapshot {
	by_module: IndexMap<ModuleId, Vec<Arc<ClassFragment>>>,
	skeletons: FxHashMap<Arc<str>, TypeHandle>,
}

/// Ordered table of class fragments keyed by declaring module.
#[derive(Default)]
pub struct FragmentStore {
	snap: ArcSwap<StoreSnapshot>,
}

static GLOBAL: LazyLock<Arc<FragmentStore>> = LazyLock::new(|| {
	let store = FragmentStore::new();
	let mut decls: Vec<&'static ModuleDecl> = inventory::iter::<ModuleDecl>.into_iter().collect();
	decls.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.module.cmp(b.module)));

	for decl in decls {
		let scope = ModuleScope::new(&store, decl.module);
		if let Err(e) = (decl.declare)(&scope) {
			tracing::error!(module = decl.module, "Module declaration failed: {}", e);
		}
	}
	Arc::new(store)
});

impl FragmentStore {
	pub fn new() -> Self {
		Self::default()
	}

	/// Process-wide store, populated from every submitted [`ModuleDecl`] on first access.
	pub fn global() -> Arc<FragmentStore> {
		GLOBAL.clone()
	}

	/// Appends `fragment` to the list of `module`, creating the list if absent.
	pub fn register(&self, module: &str, fragment: ClassFragment) {
		let fragment = Arc::new(fragment);
		let module = ModuleId::from(module);
		tracing::debug!(
			module = %module,
			name = %fragment.logical_name,
			qualname = %fragment.qualname,
			"Registered class fragment"
		);
		let prev = self.snap.rcu(|old| {
			let mut next = StoreSnapshot::clone(old);
			next.by_module
				.entry(module.clone())
				.or_default()
				.push(fragment.clone());
			next.skeletons
				.insert(fragment.qualname.clone(), fragment.skeleton.clone());
			next
		});
		if prev.skeletons.contains_key(&fragment.qualname) {
			tracing::debug!(qualname = %fragment.qualname, "Replaced skeleton; later declaration wins");
		}
	}

	/// Module ids in first-registration order.
	pub fn modules(&self) -> Vec<ModuleId> {
		self.snap.load().by_module.keys().cloned().collect()
	}

	/// Fragments of `module` in declaration order.
	pub fn fragments(&self, module: &str) -> Vec<Arc<ClassFragment>> {
		self.snap.load().by_module.get(module).cloned().unwrap_or_default()
	}

	/// Skeleton declared as `module.qualname`. A repeated declaration replaces the
	/// earlier skeleton; both fragments stay in the store.
	pub fn skeleton(&self, qualified_name: &str) -> Option<TypeHandle> {
		self.snap.load().skeletons.get(qualified_name).cloned()
	}

	pub fn len(&self) -> usize {
		self.snap.load().by_module.values().map(Vec::len).sum()
	}

	pub fn is_empty(&self) -> bool {
		self.len() == 0
	}
}

/// Declaration context for one module: a store plus the module id.
pub struct ModuleScope<'a> {
	store: &'a FragmentStore,
	module: ModuleId,
}

impl<'a> ModuleScope<'a> {
	pub fn new(store: &'a FragmentStore, module: &str) -> Self {
		Self {
			store,
			module: ModuleId::from(module),
		}
	}

	pub fn module(&self) -> &str {
		&self.module
	}

	/// Starts a class declaration in this module.
	pub fn class(&self, qualname: &str) -> ClassBuilder {
		ClassBuilder::new(&self.module, qualname)
	}

	/// Skeleton already declared as `module.qualname`, in any module.
	pub fn require(&self, qualified_name: &str) -> Result<TypeHandle, DeclareError> {
		self.store
			.skeleton(qualified_name)
			.ok_or_else(|| DeclareError::Undeclared {
				qualname: Arc::from(qualified_name),
			})
	}
}

impl Deref for ModuleScope<'_> {
	type Target = FragmentStore;

	fn deref(&self) -> &FragmentStore {
		self.store
	}
}

/// Link-time module declaration run when the global store is first accessed.
///
/// Declarations run sorted by `order`, then module id.
pub struct ModuleDecl {
	pub module: &'static str,
	pub order: i32,
	pub declare: fn(&ModuleScope<'_>) -> Result<(), DeclareError>,
}

inventory::collect!(ModuleDecl);

impl ModuleDecl {
	pub const fn new(
		module: &'static str,
		order: i32,
		declare: fn(&ModuleScope<'_>) -> Result<(), DeclareError>,
	) -> Self {
		Self { module, order, declare }
	}
}

/// Submits a [`ModuleDecl`] for the global fragment store.
#[macro_export]
macro_rules! declare_module {
	($module:expr, $order:expr, $declare:path $(,)?) => {
		$crate::__private::inventory::submit! {
			$crate::ModuleDecl::new($module, $order, $declare)
		}
	};
}
