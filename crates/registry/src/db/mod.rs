//! Registry construction: merging fragments by logical name and synthesizing aggregates.
//!
//! A [`Registry`] selects modules from a [`FragmentStore`], merges their fragments into
//! one [`FragmentHierarchy`] per logical name, then synthesizes the aggregate types
//! bottom-up. Once ready it is shared read-only, usually through [`crate::context`].

use std::fmt;
use std::sync::Arc;

use indexmap::map::Entry;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::FxHashMap as HashMap;

pub mod filter;
pub mod hooks;
pub mod options;
mod synth;

pub use filter::ModuleIndex;
pub use hooks::{AfterBuild, BeforeBuild, RegistryListener};
pub use options::BuildOptions;

use self::hooks::BuildHooks;
use crate::core::{LogicalName, ModuleId, RegistryError, TypeHandle};
use crate::fragments::{ClassFragment, FragmentHierarchy, FragmentStore};

/// Aggregated extendable classes built from a selection of modules.
pub struct Registry {
	store: Arc<FragmentStore>,
	aggregated_by_name: HashMap<LogicalName, TypeHandle>,
	hierarchies_by_name: IndexMap<LogicalName, FragmentHierarchy>,
	loaded_modules: IndexSet<ModuleId>,
	ready: bool,
	hooks: BuildHooks,
}

impl Default for Registry {
	fn default() -> Self {
		Self::new()
	}
}

impl Registry {
	/// Registry over the process-wide store.
	pub fn new() -> Self {
		Self::with_store(FragmentStore::global())
	}

	pub fn with_store(store: Arc<FragmentStore>) -> Self {
		Self {
			store,
			aggregated_by_name: HashMap::default(),
			hierarchies_by_name: IndexMap::new(),
			loaded_modules: IndexSet::new(),
			ready: false,
			hooks: BuildHooks::default(),
		}
	}

	pub fn store(&self) -> &Arc<FragmentStore> {
		&self.store
	}

	/// Merges every fragment declared by `module`. Loading a module twice is a no-op.
	pub fn load_fragments(&mut self, module: &str) -> Result<(), RegistryError> {
		if self.loaded_modules.contains(module) {
			return Ok(());
		}
		let fragments = self.store.fragments(module);
		tracing::debug!(module, fragments = fragments.len(), "Merging module fragments");
		for fragment in fragments {
			self.load_fragment(ClassFragment::clone(&fragment))?;
		}
		self.loaded_modules.insert(ModuleId::from(module));
		Ok(())
	}

	/// Merges one fragment into the hierarchy of its logical name.
	///
	/// A fragment without any base names under an already merged name is a second
	/// original declaration and is rejected.
	pub fn load_fragment(&mut self, fragment: ClassFragment) -> Result<(), RegistryError> {
		match self.hierarchies_by_name.entry(fragment.logical_name.clone()) {
			Entry::Occupied(_) if fragment.declared_base_names.is_empty() => {
				Err(RegistryError::DuplicateDefinition {
					name: fragment.logical_name,
					qualname: fragment.qualname,
				})
			}
			Entry::Occupied(mut entry) => {
				entry.get_mut().add_child(fragment);
				Ok(())
			}
			Entry::Vacant(entry) => {
				entry.insert(FragmentHierarchy::new(fragment));
				Ok(())
			}
		}
	}

	/// Synthesizes an aggregate for every merged hierarchy.
	///
	/// Aggregates are built into a fresh table that replaces the current one only
	/// when every hierarchy succeeded.
	pub fn build_all(&mut self) -> Result<(), RegistryError> {
		self.ready = false;
		for hierarchy in self.hierarchies_by_name.values() {
			if let Some(base) = hierarchy
				.base_names()
				.iter()
				.find(|b| !self.hierarchies_by_name.contains_key(*b))
			{
				return Err(RegistryError::UndefinedBase {
					name: hierarchy.name().clone(),
					base: base.clone(),
				});
			}
		}

		let mut built: HashMap<LogicalName, TypeHandle> = HashMap::default();
		let mut pending: Vec<&FragmentHierarchy> = self.hierarchies_by_name.values().collect();
		let mut pass = 0usize;
		while !pending.is_empty() {
			pass += 1;
			let before = pending.len();
			let mut remaining = Vec::new();
			for hierarchy in pending {
				let eligible = !hierarchy.has_mixed_bases()
					|| hierarchy.foreign_base_names().all(|b| built.contains_key(b));
				if eligible {
					synth::synthesize(hierarchy, &mut built)?;
				} else {
					remaining.push(hierarchy);
				}
			}
			tracing::debug!(pass, built = before - remaining.len(), deferred = remaining.len(), "Synthesis pass");
			if remaining.len() == before {
				return Err(RegistryError::CyclicOrUnresolvedBases {
					remaining: remaining.iter().map(|h| h.name().clone()).collect(),
				});
			}
			pending = remaining;
		}

		self.aggregated_by_name = built;
		self.ready = true;
		Ok(())
	}

	/// Selects modules by `patterns`, merges them in order, and builds every aggregate.
	///
	/// `None` or an empty list selects every declared module. Listeners run before the
	/// merge and after a successful build.
	pub fn init_registry(&mut self, patterns: Option<&[&str]>) -> Result<(), RegistryError> {
		self.ready = false;
		let modules = ModuleIndex::new(self.store.modules()).select(patterns.unwrap_or_default())?;
		tracing::debug!(modules = ?modules, "Initializing extendable registry");

		self.hooks.before_build(&modules);
		for module in &modules {
			self.load_fragments(module)?;
		}
		self.build_all()?;
		tracing::debug!(classes = self.aggregated_by_name.len(), "Extendable registry ready");

		let this: &Registry = self;
		this.hooks.after_build(this);
		Ok(())
	}

	/// [`Self::init_registry`] driven by deserialized options.
	pub fn init_with_options(&mut self, options: &BuildOptions) -> Result<(), RegistryError> {
		let patterns: Vec<&str> = options.modules.iter().map(String::as_str).collect();
		self.init_registry(Some(patterns.as_slice()))
	}

	/// Aggregate for `name`; fails unless the registry is ready.
	pub fn resolve(&self, name: &str) -> Result<TypeHandle, RegistryError> {
		if !self.ready {
			return Err(RegistryError::NotInitialized);
		}
		self.aggregated_by_name
			.get(name)
			.cloned()
			.ok_or_else(|| RegistryError::UnknownName(LogicalName::from(name)))
	}

	/// Aggregate for `name` from the last successful build, ready or not.
	pub fn get(&self, name: &str) -> Option<&TypeHandle> {
		self.aggregated_by_name.get(name)
	}

	pub fn contains(&self, name: &str) -> bool {
		self.aggregated_by_name.contains_key(name)
	}

	/// Built logical names, in merge order.
	pub fn names(&self) -> Vec<&LogicalName> {
		self.hierarchies_by_name
			.keys()
			.filter(|name| self.aggregated_by_name.contains_key(*name))
			.collect()
	}

	pub fn len(&self) -> usize {
		self.aggregated_by_name.len()
	}

	pub fn is_empty(&self) -> bool {
		self.aggregated_by_name.is_empty()
	}

	pub fn is_ready(&self) -> bool {
		self.ready
	}

	/// Merged modules, in merge order.
	pub fn loaded_modules(&self) -> impl Iterator<Item = &str> {
		self.loaded_modules.iter().map(|m| &**m)
	}

	pub fn hierarchy(&self, name: &str) -> Option<&FragmentHierarchy> {
		self.hierarchies_by_name.get(name)
	}

	/// Registers a closure run with the selected modules before merging.
	pub fn before_build<F>(&mut self, f: F)
	where
		F: Fn(&[ModuleId]) + Send + Sync + 'static,
	{
		self.add_listener(Arc::new(BeforeBuild(f)));
	}

	/// Registers a closure run once the registry is ready.
	pub fn after_build<F>(&mut self, f: F)
	where
		F: Fn(&Registry) + Send + Sync + 'static,
	{
		self.add_listener(Arc::new(AfterBuild(f)));
	}

	pub fn add_listener(&mut self, listener: Arc<dyn RegistryListener>) {
		self.hooks.push(listener);
	}
}

impl fmt::Debug for Registry {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("Registry")
			.field("ready", &self.ready)
			.field("classes", &self.names())
			.field("loaded_modules", &self.loaded_modules)
			.field("listeners", &self.hooks.len())
			.finish()
	}
}
