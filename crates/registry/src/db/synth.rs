use std::sync::Arc;

use rustc_hash::{FxHashMap as HashMap, FxHashSet as HashSet};

use crate::core::types::TypeSpec;
use crate::core::{LastOrderedSet, LogicalName, RegistryError, TypeHandle, TypeKind};
use crate::fragments::FragmentHierarchy;

/// Synthesizes one aggregate per member of `hierarchy`, each inheriting from the previous.
///
/// Every intermediate aggregate is stored under the hierarchy's name in `built`,
/// so the returned type, the last one, is what the name resolves to afterwards.
pub(crate) fn synthesize(
	hierarchy: &FragmentHierarchy,
	built: &mut HashMap<LogicalName, TypeHandle>,
) -> Result<TypeHandle, RegistryError> {
	let name = hierarchy.name();
	let simple_name = name.simple_name();
	let mut last = None;

	for (idx, member) in hierarchy.members().iter().enumerate() {
		let mut bases = LastOrderedSet::new();
		for base_name in member.declared_base_names() {
			match built.get(base_name) {
				Some(base) => bases.insert(base.clone()),
				None if idx == 0 && base_name == name => {}
				None => {
					return Err(RegistryError::UndefinedBase {
						name: name.clone(),
						base: base_name.clone(),
					});
				}
			}
		}
		bases.extend(member.other_bases().iter().cloned());

		let ty = TypeHandle::create(TypeSpec {
			name: Arc::from(format!("{simple_name}{idx}")),
			qualname: Arc::from(member.qualname()),
			module: Arc::from(member.module()),
			kind: TypeKind::Aggregate {
				logical_name: name.clone(),
				origin: member.skeleton().clone(),
			},
			bases: bases.into_vec(),
			namespace: member.namespace().clone(),
		})
		.map_err(|_| RegistryError::InconsistentHierarchy { name: name.clone() })?;

		tracing::trace!(name = %name, ty = %ty.name(), "Synthesized aggregate");
		built.insert(name.clone(), ty.clone());
		last = Some(ty);
	}

	let Some(last) = last else {
		return Err(RegistryError::UnknownName(name.clone()));
	};

	let mut recorded: HashSet<LogicalName> = HashSet::default();
	recorded.insert(name.clone());
	for base_name in hierarchy.base_names() {
		recorded.insert(base_name.clone());
		if base_name == name {
			continue;
		}
		if let Some(inherited) = built.get(base_name).and_then(TypeHandle::recorded_base_names) {
			recorded.extend(inherited.iter().cloned());
		}
	}
	last.record_base_names(recorded);
	Ok(last)
}
