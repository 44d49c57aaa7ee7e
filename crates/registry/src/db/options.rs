use serde::{Deserialize, Serialize};

/// Build settings for [`super::Registry::init_with_options`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildOptions {
	/// Module patterns, merged left to right. Empty selects every module.
	pub modules: Vec<String>,
}

impl BuildOptions {
	pub fn new<I, S>(modules: I) -> Self
	where
		I: IntoIterator<Item = S>,
		S: Into<String>,
	{
		Self {
			modules: modules.into_iter().map(Into::into).collect(),
		}
	}
}
