use std::sync::Arc;

use extendable_registry::{Args, ClassBuilder, FragmentStore, LogicalName, Registry, RegistryError, Signature, Value};
use pretty_assertions::assert_eq;

use crate::common::{call, getter, install, new_instance};

fn test_method(builder: ClassBuilder, text: &'static str) -> ClassBuilder {
	builder.method("test", Signature::new(), move |_, _| Ok(Value::from(text)))
}

#[test]
fn simple_extends() {
	let store = Arc::new(FragmentStore::new());
	let m = "tests.simple";
	let a = ClassBuilder::new(m, "A")
		.attr("prop_a", 1)
		.method("sum", Signature::new(), getter("prop_a"))
		.class_method("cls_sum", Signature::new(), |_, _| Ok(Value::Int(2)))
		.declare(&store)
		.unwrap();
	let b = ClassBuilder::new(m, "B")
		.base(&a)
		.extends(&a)
		.attr("prop_b", 2)
		.method("sum", Signature::new(), |inv, _| {
			let s = inv.super_call(Args::new())?.try_int()?;
			Ok(Value::Int(s + inv.get("prop_b")?.try_int()?))
		})
		.class_method("cls_sum", Signature::new(), |inv, _| {
			Ok(Value::Int(inv.super_call(Args::new())?.try_int()? + 3))
		})
		.declare(&store)
		.unwrap();

	let (_reg, _guard) = install(store, None);

	let result = new_instance(&a);
	assert!(result.is_instance(&a));
	assert!(result.is_instance(&b));
	assert_eq!(result.get_attr("prop_b").unwrap(), Value::Int(2));
	assert_eq!(result.get_attr("prop_a").unwrap(), Value::Int(1));
	assert_eq!(call(&result, "sum"), Value::Int(3));
	assert_eq!(a.call_class_method("cls_sum", Args::new()).unwrap(), Value::Int(5));
	assert!(result.type_of().is_aggregate());
}

#[test]
fn extension_reaches_independent_subclass() {
	let store = Arc::new(FragmentStore::new());
	let m = "tests.new_model";
	let a = ClassBuilder::new(m, "A")
		.attr("value", 2)
		.method("method", Signature::new(), getter("value"))
		.declare(&store)
		.unwrap();
	let b = ClassBuilder::new(m, "B")
		.base(&a)
		.attr("value2", 3)
		.method("method", Signature::new(), |inv, _| {
			let inherited = inv.super_call(Args::new())?.try_int()?;
			Ok(Value::Int(inherited + inv.get("value2")?.try_int()?))
		})
		.declare(&store)
		.unwrap();
	ClassBuilder::new(m, "AExt")
		.base(&a)
		.extends(&a)
		.method("method", Signature::new(), |inv, _| {
			Ok(Value::Int(inv.super_call(Args::new())?.try_int()? + 1))
		})
		.declare(&store)
		.unwrap();

	let (_reg, _guard) = install(store, None);
	assert_eq!(call(&new_instance(&b), "method"), Value::Int(6));
	assert_eq!(call(&new_instance(&a), "method"), Value::Int(3));
}

#[test]
fn composite_extends() {
	let store = Arc::new(FragmentStore::new());
	let m = "tests.composite";
	let coordinate = ClassBuilder::new(m, "Coordinate")
		.attr("lat", 0.1)
		.attr("lng", 10.1)
		.declare(&store)
		.unwrap();
	let name = ClassBuilder::new(m, "Name")
		.attr("name", "name")
		.declare(&store)
		.unwrap();
	let location = ClassBuilder::new(m, "Location")
		.base(&coordinate)
		.base(&name)
		.declare(&store)
		.unwrap();
	let name_extended = ClassBuilder::new(m, "NameExtended")
		.base(&name)
		.extends(&name)
		.attr("alias", "alias")
		.declare(&store)
		.unwrap();
	let name_extended2 = ClassBuilder::new(m, "NameExtended2")
		.base(&name_extended)
		.extends(&name)
		.declare(&store)
		.unwrap();

	let (reg, _guard) = install(store, None);

	let loc = new_instance(&location);
	assert_eq!(loc.get_attr("alias").unwrap(), Value::from("alias"));
	assert_eq!(loc.get_attr("lat").unwrap(), Value::Float(0.1));
	for ty in [&name, &coordinate, &name_extended, &name_extended2, &location] {
		assert!(loc.is_instance(ty), "location should be an instance of {ty:?}");
	}

	let name_agg = reg.resolve("tests.composite.Name").unwrap();
	assert_eq!(name_agg.mro().map(|t| t.name()).collect::<Vec<_>>(), vec!["Name2", "Name1", "Name0"]);
	assert!(!name_agg.is_subclass(&location));
	assert!(loc.type_of().is_subclass(&name_agg));
}

#[test]
fn composite_mro_follows_base_order() {
	let store = Arc::new(FragmentStore::new());
	let m = "tests.composite_mro";
	let a = test_method(ClassBuilder::new(m, "A"), "A").declare(&store).unwrap();
	let b = test_method(ClassBuilder::new(m, "B"), "B").declare(&store).unwrap();
	let ab = ClassBuilder::new(m, "AB").base(&a).base(&b).declare(&store).unwrap();
	let ba = ClassBuilder::new(m, "BA").base(&b).base(&a).declare(&store).unwrap();

	let (_reg, _guard) = install(store, None);
	assert_eq!(call(&new_instance(&ab), "test"), Value::from("A"));
	assert_eq!(call(&new_instance(&ba), "test"), Value::from("B"));
}

#[test]
fn extended_composite_takes_new_base() {
	let store = Arc::new(FragmentStore::new());
	let m = "tests.extended_composite";
	let a = test_method(ClassBuilder::new(m, "A"), "A").declare(&store).unwrap();
	let b = test_method(ClassBuilder::new(m, "B"), "B").declare(&store).unwrap();
	let c = test_method(ClassBuilder::new(m, "C"), "C").declare(&store).unwrap();
	let ab = ClassBuilder::new(m, "AB").base(&a).base(&b).declare(&store).unwrap();
	ClassBuilder::new(m, "ABExt").base(&c).extends(&ab).declare(&store).unwrap();

	let (_reg, _guard) = install(store, None);
	let obj = new_instance(&ab);
	assert_eq!(call(&obj, "test"), Value::from("C"));
	assert!(obj.is_instance(&c));
}

#[test]
fn extension_skeleton_is_structural_subclass() {
	let store = Arc::new(FragmentStore::new());
	let m = "tests.symmetry";
	let a = ClassBuilder::new(m, "A").declare(&store).unwrap();
	let b = ClassBuilder::new(m, "B").base(&a).extends(&a).declare(&store).unwrap();

	let (_reg, _guard) = install(store, None);
	assert!(b.is_subclass(&a));
	assert!(new_instance(&a).is_instance(&b));
}

#[test]
fn missing_mixed_base_fails_the_build() {
	let store = Arc::new(FragmentStore::new());
	let a = ClassBuilder::new("tests.left", "A").declare(&store).unwrap();
	let b = ClassBuilder::new("tests.right", "B").declare(&store).unwrap();
	ClassBuilder::new("tests.mixed", "AB").base(&a).base(&b).declare(&store).unwrap();

	let mut reg = Registry::with_store(store);
	let err = reg
		.init_registry(Some(&["tests.left", "tests.mixed"]))
		.unwrap_err();
	assert_eq!(
		err,
		RegistryError::UndefinedBase {
			name: LogicalName::from("tests.mixed.AB"),
			base: LogicalName::from("tests.right.B"),
		}
	);
	assert!(!reg.is_ready());
	assert!(reg.get("tests.mixed.AB").is_none());
}
