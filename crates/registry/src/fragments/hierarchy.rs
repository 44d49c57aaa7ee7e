use indexmap::IndexSet;

use super::ClassFragment;
use crate::core::LogicalName;

/// Ordered fragments sharing one logical name.
///
/// The first member is the original declaration; later members are extensions in
/// merge order and end up later in the synthesized chain.
#[derive(Clone, Debug)]
pub struct FragmentHierarchy {
	name: LogicalName,
	members: Vec<ClassFragment>,
	base_names: IndexSet<LogicalName>,
}

impl FragmentHierarchy {
	pub fn new(first: ClassFragment) -> Self {
		let mut hierarchy = Self {
			name: first.logical_name.clone(),
			members: Vec::new(),
			base_names: IndexSet::new(),
		};
		hierarchy.add_child(first);
		hierarchy
	}

	pub fn add_child(&mut self, fragment: ClassFragment) {
		self.base_names
			.extend(fragment.declared_base_names.iter().cloned());
		self.members.push(fragment);
	}

	/// True when the base names are anything other than exactly the own name.
	pub fn has_mixed_bases(&self) -> bool {
		!(self.base_names.len() == 1 && self.base_names.contains(&self.name))
	}

	pub fn name(&self) -> &LogicalName {
		&self.name
	}

	pub fn members(&self) -> &[ClassFragment] {
		&self.members
	}

	pub fn base_names(&self) -> &IndexSet<LogicalName> {
		&self.base_names
	}

	/// Base names other than the hierarchy's own.
	pub(crate) fn foreign_base_names(&self) -> impl Iterator<Item = &LogicalName> {
		self.base_names.iter().filter(move |b| **b != self.name)
	}
}
