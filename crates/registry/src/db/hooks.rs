use std::fmt;
use std::sync::Arc;

use super::Registry;
use crate::core::ModuleId;

/// Observer of a registry's build.
pub trait RegistryListener: Send + Sync {
	/// Runs with the resolved module list before any fragment is merged.
	fn before_build(&self, _modules: &[ModuleId]) {}

	/// Runs once the registry is ready.
	fn on_registry_initialized(&self, _registry: &Registry) {}
}

/// Adapts a closure into a [`RegistryListener::before_build`] hook.
pub struct BeforeBuild<F>(pub F);

impl<F> RegistryListener for BeforeBuild<F>
where
	F: Fn(&[ModuleId]) + Send + Sync,
{
	fn before_build(&self, modules: &[ModuleId]) {
		(self.0)(modules)
	}
}

/// Adapts a closure into a [`RegistryListener::on_registry_initialized`] hook.
pub struct AfterBuild<F>(pub F);

impl<F> RegistryListener for AfterBuild<F>
where
	F: Fn(&Registry) + Send + Sync,
{
	fn on_registry_initialized(&self, registry: &Registry) {
		(self.0)(registry)
	}
}

/// Listeners of one registry, notified in registration order.
#[derive(Default, Clone)]
pub(crate) struct BuildHooks {
	listeners: Vec<Arc<dyn RegistryListener>>,
}

impl BuildHooks {
	pub(crate) fn push(&mut self, listener: Arc<dyn RegistryListener>) {
		self.listeners.push(listener);
	}

	pub(crate) fn len(&self) -> usize {
		self.listeners.len()
	}

	pub(crate) fn before_build(&self, modules: &[ModuleId]) {
		for listener in &self.listeners {
			listener.before_build(modules);
		}
	}

	pub(crate) fn after_build(&self, registry: &Registry) {
		for listener in &self.listeners {
			listener.on_registry_initialized(registry);
		}
	}
}

impl fmt::Debug for BuildHooks {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("BuildHooks")
			.field("listeners", &self.listeners.len())
			.finish()
	}
}
