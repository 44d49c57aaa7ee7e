use std::sync::Arc;

use extendable_registry::{
	Args, BindError, CallError, ClassBuilder, FragmentStore, Registry, RegistryError, Signature, TypeHandle, Value,
	context,
};
use pretty_assertions::assert_eq;

use crate::common::{init_tracing, install};

/// `Model.create(label)` builds an instance through `cls`; `describe()` reports the class.
fn declare_model(store: &FragmentStore) -> TypeHandle {
	ClassBuilder::new("tests.forwarding", "Model")
		.attr("label", "unset")
		.class_method("create", Signature::new().param("label"), |inv, args| {
			let obj = inv.cls().construct(Args::new())?;
			obj.set_attr("label", args.value("label"));
			Ok(Value::from(obj))
		})
		.class_method("describe", Signature::new().keyword_only("verbose", Some(Value::Bool(false))), |inv, args| {
			let verbose = args.value("verbose").as_bool().unwrap_or(false);
			let name = inv.cls().name().to_string();
			Ok(Value::from(if verbose { format!("class {name}") } else { name }))
		})
		.declare(store)
		.unwrap()
}

#[test]
fn class_method_runs_on_skeleton_without_registry() {
	init_tracing();
	context::clear();
	let store = FragmentStore::new();
	let model = declare_model(&store);

	let out = model.call_class_method("describe", Args::new()).unwrap();
	assert_eq!(out, Value::from("Model"));
}

#[test]
fn factory_needs_a_registry_to_construct() {
	init_tracing();
	context::clear();
	let store = FragmentStore::new();
	let model = declare_model(&store);

	let err = model
		.call_class_method("create", Args::new().arg("x"))
		.unwrap_err();
	assert!(matches!(err, CallError::Registry(RegistryError::NotInitialized)));
}

#[test]
fn factory_builds_aggregate_once_ready() {
	let store = Arc::new(FragmentStore::new());
	let model = declare_model(&store);
	ClassBuilder::new("tests.forwarding_ext", "Model")
		.base(&model)
		.extends(&model)
		.attr("extended", true)
		.declare(&store)
		.unwrap();
	let (_reg, _guard) = install(store, None);

	let created = model
		.call_class_method("create", Args::new().kwarg("label", "made"))
		.unwrap();
	let obj = created.as_object().unwrap();
	assert_eq!(obj.type_of().name(), "Model1");
	assert_eq!(obj.get_attr("label").unwrap(), Value::from("made"));
	assert_eq!(obj.get_attr("extended").unwrap(), Value::Bool(true));
	assert!(obj.is_instance(&model));

	let out = model
		.call_class_method("describe", Args::new().kwarg("verbose", true))
		.unwrap();
	assert_eq!(out, Value::from("class Model1"));
}

#[test]
fn binding_errors_are_raised_in_every_registry_state() {
	init_tracing();
	let store = Arc::new(FragmentStore::new());
	let model = declare_model(&store);

	let expect_binding_error = |args: Args| {
		let err = model.call_class_method("describe", args).unwrap_err();
		match err {
			CallError::ArgumentBinding { callable, source } => {
				assert_eq!(&*callable, "describe");
				source
			}
			other => panic!("expected binding error, got {other}"),
		}
	};

	context::clear();
	assert_eq!(
		expect_binding_error(Args::new().arg(1)),
		BindError::TooManyPositional { expected: 0, given: 1 }
	);

	let unready = Arc::new(Registry::with_store(store.clone()));
	let guard = context::install(unready);
	assert_eq!(
		expect_binding_error(Args::new().kwarg("loud", true)),
		BindError::UnexpectedKeyword(Arc::from("loud"))
	);
	drop(guard);

	let (_reg, _guard) = install(store, None);
	assert_eq!(
		expect_binding_error(Args::new().arg(1)),
		BindError::TooManyPositional { expected: 0, given: 1 }
	);
}

#[test]
fn subclass_skeleton_forwards_to_its_own_aggregate() {
	let store = Arc::new(FragmentStore::new());
	let model = declare_model(&store);
	let special = ClassBuilder::new("tests.forwarding", "Special")
		.base(&model)
		.declare(&store)
		.unwrap();
	let (_reg, _guard) = install(store, None);

	let out = special.call_class_method("describe", Args::new()).unwrap();
	assert_eq!(out, Value::from("Special0"));
	let created = special.call_class_method("create", Args::new().arg("s")).unwrap();
	let obj = created.as_object().unwrap();
	assert!(obj.is_instance(&special));
	assert!(obj.is_instance(&model));
}

#[test]
fn unknown_name_falls_back_to_skeleton() {
	let store = Arc::new(FragmentStore::new());
	let model = declare_model(&store);
	ClassBuilder::new("tests.other", "Other").declare(&store).unwrap();
	let (_reg, _guard) = install(store, Some(&["tests.other"]));

	let out = model.call_class_method("describe", Args::new()).unwrap();
	assert_eq!(out, Value::from("Model"));
}
