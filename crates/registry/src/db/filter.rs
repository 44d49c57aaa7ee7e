use globset::{GlobBuilder, GlobMatcher};
use indexmap::IndexSet;

use crate::core::{ModuleId, RegistryError};

/// Expands module patterns against the declaration order of a store.
///
/// `*` is the only wildcard and matches any run of characters, dots included.
/// Matching ignores ASCII case. Every other character is literal.
#[derive(Debug, Clone)]
pub struct ModuleIndex {
	modules: Vec<ModuleId>,
}

impl ModuleIndex {
	pub fn new(modules: Vec<ModuleId>) -> Self {
		Self { modules }
	}

	/// Modules matched by `patterns`: patterns left to right, each in declaration order,
	/// first occurrence wins. No patterns means `["*"]`.
	pub fn select<S: AsRef<str>>(&self, patterns: &[S]) -> Result<Vec<ModuleId>, RegistryError> {
		let mut selected: IndexSet<ModuleId> = IndexSet::new();
		if patterns.is_empty() {
			selected.extend(self.modules.iter().cloned());
		}
		for pattern in patterns {
			selected.extend(self.matching(pattern.as_ref())?);
		}
		Ok(selected.into_iter().collect())
	}

	/// Modules matched by a single pattern, in declaration order.
	pub fn matching(&self, pattern: &str) -> Result<Vec<ModuleId>, RegistryError> {
		let matcher = compile(pattern)?;
		Ok(self
			.modules
			.iter()
			.filter(|&m| matcher.is_match(&**m))
			.cloned()
			.collect())
	}

	pub fn modules(&self) -> &[ModuleId] {
		&self.modules
	}
}

/// Every metacharacter but `*` is escaped and backslash is not an escape, so the
/// build is not expected to fail.
fn compile(pattern: &str) -> Result<GlobMatcher, RegistryError> {
	let escaped = pattern
		.split('*')
		.map(globset::escape)
		.collect::<Vec<_>>()
		.join("*");
	GlobBuilder::new(&escaped)
		.case_insensitive(true)
		.literal_separator(false)
		.backslash_escape(false)
		.build()
		.map(|glob| glob.compile_matcher())
		.map_err(|e| RegistryError::InvalidPattern {
			pattern: pattern.to_string(),
			reason: e.to_string(),
		})
}
