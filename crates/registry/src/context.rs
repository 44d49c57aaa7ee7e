//! Ambient registry for the current thread.
//!
//! Skeleton types resolve their aggregate through the registry installed here.
//! Installs nest: dropping a [`RegistryGuard`] restores whatever was installed before.

use std::cell::RefCell;
use std::marker::PhantomData;
use std::sync::Arc;

use crate::core::{RegistryError, TypeHandle};
use crate::db::Registry;

thread_local! {
	static CURRENT: RefCell<Option<Arc<Registry>>> = const { RefCell::new(None) };
}

/// Restores the previously installed registry on drop.
#[must_use = "the registry is uninstalled when the guard is dropped"]
pub struct RegistryGuard {
	previous: Option<Arc<Registry>>,
	// Guards restore thread-local state and must stay on their thread.
	_not_send: PhantomData<*const ()>,
}

impl Drop for RegistryGuard {
	fn drop(&mut self) {
		let previous = self.previous.take();
		CURRENT.with(|cell| *cell.borrow_mut() = previous);
	}
}

/// Installs `registry` for the current thread until the guard drops.
pub fn install(registry: Arc<Registry>) -> RegistryGuard {
	let previous = CURRENT.with(|cell| cell.borrow_mut().replace(registry));
	RegistryGuard {
		previous,
		_not_send: PhantomData,
	}
}

/// The installed registry, ready or not.
pub fn current() -> Result<Arc<Registry>, RegistryError> {
	CURRENT
		.with(|cell| cell.borrow().clone())
		.ok_or(RegistryError::NotInitialized)
}

/// Removes the installed registry without restoring anything.
pub fn clear() {
	CURRENT.with(|cell| cell.borrow_mut().take());
}

/// Runs `f` with `registry` installed.
pub fn with_registry<R>(registry: Arc<Registry>, f: impl FnOnce() -> R) -> R {
	let _guard = install(registry);
	f()
}

/// Aggregate for `name` in the installed registry.
pub fn resolve(name: &str) -> Result<TypeHandle, RegistryError> {
	current()?.resolve(name)
}
