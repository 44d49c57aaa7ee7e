use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use extendable_registry::{Args, CallError, ModuleId, Registry, RegistryListener, Value};
use pretty_assertions::assert_eq;

use crate::common::{BASE, EXT1, EXT2, call, declare_modules, install, new_instance};

fn test_result(order: &[&str], patterns: Option<&[&str]>) -> (Value, Value) {
	let (store, base) = declare_modules(order);
	let (_reg, _guard) = install(store, patterns);
	let obj = new_instance(&base);
	(call(&obj, "test"), call(&obj, "value"))
}

#[test]
fn declaration_order_drives_default_build() {
	let (text, value) = test_result(&[EXT1, EXT2], None);
	assert_eq!(text, Value::from("mod2.mod1.base"));
	assert_eq!(value, Value::Int(13));

	let (text, value) = test_result(&[EXT2, EXT1], None);
	assert_eq!(text, Value::from("mod1.mod2.base"));
	assert_eq!(value, Value::Int(40));
}

#[test]
fn filtered_build_skips_unselected_modules() {
	let (text, _) = test_result(&[EXT2, EXT1], Some(&["tests.mod_base.*", "tests.mod_ext1.*"]));
	assert_eq!(text, Value::from("mod1.base"));

	let (text, value) = test_result(&[EXT1, EXT2], Some(&["tests.mod_base.*"]));
	assert_eq!(text, Value::from("base"));
	assert_eq!(value, Value::Int(1));
}

#[test]
fn wildcard_keeps_declaration_order() {
	let (text, _) = test_result(&[EXT2, EXT1], Some(&["tests.mod_*"]));
	assert_eq!(text, Value::from("mod1.mod2.base"));

	let (text, _) = test_result(&[EXT1, EXT2], Some(&["tests.mod_*"]));
	assert_eq!(text, Value::from("mod2.mod1.base"));
}

#[test]
fn pattern_order_overrides_declaration_order() {
	let (text, _) = test_result(
		&[EXT1, EXT2],
		Some(&["tests.mod_base.*", "tests.mod_ext2.*", "tests.mod_ext1.*"]),
	);
	assert_eq!(text, Value::from("mod1.mod2.base"));
}

#[test]
fn reloading_a_module_does_not_duplicate_members() {
	let (store, _) = declare_modules(&[EXT1]);
	let mut reg = Registry::with_store(store);
	reg.load_fragments(BASE).unwrap();
	reg.load_fragments(EXT1).unwrap();
	reg.load_fragments(EXT1).unwrap();
	reg.build_all().unwrap();

	let name = format!("{BASE}.Base");
	assert_eq!(reg.hierarchy(&name).unwrap().members().len(), 2);
	assert_eq!(reg.loaded_modules().collect::<Vec<_>>(), vec![BASE, EXT1]);
}

#[test]
fn extension_alone_builds_without_its_base() {
	let (store, base) = declare_modules(&[EXT1]);
	let (reg, _guard) = install(store, Some(&[EXT1]));

	assert_eq!(reg.loaded_modules().collect::<Vec<_>>(), vec![EXT1]);
	let obj = new_instance(&base);
	let err = obj.call_method("test", Args::new()).unwrap_err();
	assert!(matches!(err, CallError::AttributeNotFound { .. }));
}

struct CountingListener {
	before: AtomicUsize,
	after: AtomicUsize,
}

impl RegistryListener for CountingListener {
	fn before_build(&self, modules: &[ModuleId]) {
		assert!(!modules.is_empty());
		self.before.fetch_add(1, Ordering::SeqCst);
	}

	fn on_registry_initialized(&self, registry: &Registry) {
		assert!(registry.is_ready());
		self.after.fetch_add(1, Ordering::SeqCst);
	}
}

#[test]
fn listener_is_notified_on_each_build() {
	let (store, _) = declare_modules(&[EXT1, EXT2]);
	let listener = Arc::new(CountingListener {
		before: AtomicUsize::new(0),
		after: AtomicUsize::new(0),
	});

	let mut reg = Registry::with_store(store);
	reg.add_listener(listener.clone());
	reg.init_registry(None).unwrap();
	reg.init_registry(None).unwrap();

	assert_eq!(listener.before.load(Ordering::SeqCst), 2);
	assert_eq!(listener.after.load(Ordering::SeqCst), 2);
}

#[test]
fn built_registry_is_shared_across_threads() {
	let (store, base) = declare_modules(&[EXT1, EXT2]);
	let (reg, _guard) = install(store, None);

	let handles: Vec<_> = (0..4)
		.map(|_| {
			let reg = reg.clone();
			let base = base.clone();
			std::thread::spawn(move || {
				extendable_registry::context::with_registry(reg, || {
					let obj = new_instance(&base);
					call(&obj, "test")
				})
			})
		})
		.collect();

	for handle in handles {
		assert_eq!(handle.join().unwrap(), Value::from("mod2.mod1.base"));
	}
}
