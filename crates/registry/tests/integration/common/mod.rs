//! Shared fixtures for registry integration tests.

use std::sync::Arc;

use extendable_registry::{
	Args, BoundArgs, CallError, ClassBuilder, FragmentStore, Invocation, Object, Registry, RegistryGuard, Signature,
	TypeHandle, Value, context,
};

pub const BASE: &str = "tests.mod_base.base";
pub const EXT1: &str = "tests.mod_ext1.ext";
pub const EXT2: &str = "tests.mod_ext2.ext";

pub fn init_tracing() {
	let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

/// Builds a registry over `store` and installs it for the current thread.
pub fn install(store: Arc<FragmentStore>, patterns: Option<&[&str]>) -> (Arc<Registry>, RegistryGuard) {
	init_tracing();
	let mut reg = Registry::with_store(store);
	reg.init_registry(patterns)
		.unwrap_or_else(|e| panic!("registry build failed: {e}"));
	let reg = Arc::new(reg);
	let guard = context::install(reg.clone());
	(reg, guard)
}

pub fn new_instance(ty: &TypeHandle) -> Object {
	ty.construct(Args::new())
		.unwrap_or_else(|e| panic!("cannot construct {ty:?}: {e}"))
}

pub fn call(obj: &Object, name: &str) -> Value {
	obj.call_method(name, Args::new())
		.unwrap_or_else(|e| panic!("{name}() failed: {e}"))
}

/// `Base.test()` returns `"base"`.
pub fn declare_base(store: &FragmentStore) -> TypeHandle {
	ClassBuilder::new(BASE, "Base")
		.method("test", Signature::new(), |_, _| Ok(Value::from("base")))
		.method("value", Signature::new(), |_, _| Ok(Value::Int(1)))
		.declare(store)
		.unwrap()
}

/// Extension prefixing `test()` with `label` and applying `op` to `value()`.
pub fn declare_ext(
	store: &FragmentStore,
	module: &str,
	label: &'static str,
	base: &TypeHandle,
	op: fn(i64) -> i64,
) -> TypeHandle {
	ClassBuilder::new(module, "Base")
		.base(base)
		.extends(base)
		.method("test", Signature::new(), move |inv, _| {
			let inner = inv.super_call(Args::new())?;
			Ok(Value::from(format!("{label}.{}", inner.try_str()?)))
		})
		.method("value", Signature::new(), move |inv, _| {
			let inner = inv.super_call(Args::new())?;
			Ok(Value::Int(op(inner.try_int()?)))
		})
		.declare(store)
		.unwrap()
}

pub fn times_ten(v: i64) -> i64 {
	v * 10
}

pub fn plus_three(v: i64) -> i64 {
	v + 3
}

/// Declares base, then the extensions in the given order.
pub fn declare_modules(order: &[&str]) -> (Arc<FragmentStore>, TypeHandle) {
	let store = Arc::new(FragmentStore::new());
	let base = declare_base(&store);
	for module in order {
		match *module {
			EXT1 => declare_ext(&store, EXT1, "mod1", &base, times_ten),
			EXT2 => declare_ext(&store, EXT2, "mod2", &base, plus_three),
			other => panic!("unknown fixture module {other}"),
		};
	}
	(store, base)
}

/// Reads an attribute through an instance method body.
pub fn getter(name: &'static str) -> impl Fn(&Invocation<'_>, &BoundArgs) -> Result<Value, CallError> + Send + Sync + 'static {
	move |inv, _| inv.get(name)
}
