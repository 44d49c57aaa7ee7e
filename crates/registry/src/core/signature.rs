//! Declared parameter lists and argument binding.
//!
//! Binding follows keyword-aware call semantics: positional arguments fill
//! positional-or-keyword parameters in order, surplus positionals go to a
//! variadic parameter, keywords match by name, defaults fill the gaps.

use std::sync::Arc;

use indexmap::IndexMap;

use super::error::BindError;
use super::value::Value;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
	PositionalOrKeyword,
	VarPositional,
	KeywordOnly,
	VarKeyword,
}

#[derive(Debug, Clone)]
pub struct Param {
	pub name: Arc<str>,
	pub kind: ParamKind,
	pub default: Option<Value>,
}

/// Parameter list of a callable, excluding the implicit receiver.
#[derive(Debug, Clone, Default)]
pub struct Signature {
	params: Vec<Param>,
}

impl Signature {
	/// An empty signature: the callable takes no arguments.
	pub fn new() -> Self {
		Self::default()
	}

	/// A signature accepting any arguments (`*args, **kwargs`).
	pub fn any() -> Self {
		Self::new().var_args("args").var_kwargs("kwargs")
	}

	/// Adds a required positional-or-keyword parameter.
	pub fn param(self, name: &str) -> Self {
		self.push(name, ParamKind::PositionalOrKeyword, None)
	}

	/// Adds a positional-or-keyword parameter with a default.
	pub fn param_default(self, name: &str, default: impl Into<Value>) -> Self {
		self.push(name, ParamKind::PositionalOrKeyword, Some(default.into()))
	}

	/// Adds the variadic positional parameter.
	pub fn var_args(self, name: &str) -> Self {
		self.push(name, ParamKind::VarPositional, None)
	}

	/// Adds a keyword-only parameter, optionally defaulted.
	pub fn keyword_only(self, name: &str, default: Option<Value>) -> Self {
		self.push(name, ParamKind::KeywordOnly, default)
	}

	/// Adds the variadic keyword parameter.
	pub fn var_kwargs(self, name: &str) -> Self {
		self.push(name, ParamKind::VarKeyword, None)
	}

	fn push(mut self, name: &str, kind: ParamKind, default: Option<Value>) -> Self {
		self.params.push(Param {
			name: Arc::from(name),
			kind,
			default,
		});
		self
	}

	pub fn params(&self) -> &[Param] {
		&self.params
	}

	/// Binds `args` to this signature without invoking anything.
	pub fn bind(&self, args: &Args) -> Result<BoundArgs, BindError> {
		let mut values: IndexMap<Arc<str>, Value> = IndexMap::with_capacity(self.params.len());
		let mut var_keywords = IndexMap::new();
		let mut rest = args.positional.iter();

		for param in &self.params {
			match param.kind {
				ParamKind::PositionalOrKeyword => {
					if let Some(value) = rest.next() {
						values.insert(param.name.clone(), value.clone());
					}
				}
				ParamKind::VarPositional => {
					let collected: Vec<Value> = rest.by_ref().cloned().collect();
					values.insert(param.name.clone(), Value::from(collected));
				}
				ParamKind::KeywordOnly | ParamKind::VarKeyword => {}
			}
		}

		if rest.next().is_some() {
			let expected = self
				.params
				.iter()
				.filter(|p| p.kind == ParamKind::PositionalOrKeyword)
				.count();
			return Err(BindError::TooManyPositional {
				expected,
				given: args.positional.len(),
			});
		}

		let accepts_var_keywords = self.params.iter().any(|p| p.kind == ParamKind::VarKeyword);
		for (key, value) in &args.keyword {
			let named = self.params.iter().find(|p| {
				p.name == *key
					&& matches!(p.kind, ParamKind::PositionalOrKeyword | ParamKind::KeywordOnly)
			});
			match named {
				Some(param) if values.contains_key(&param.name) => {
					return Err(BindError::MultipleValues(param.name.clone()));
				}
				Some(param) => {
					values.insert(param.name.clone(), value.clone());
				}
				None if accepts_var_keywords => {
					var_keywords.insert(key.clone(), value.clone());
				}
				None => return Err(BindError::UnexpectedKeyword(key.clone())),
			}
		}

		let mut ordered = IndexMap::with_capacity(values.len());
		for param in &self.params {
			if param.kind == ParamKind::VarKeyword {
				continue;
			}
			match values.swap_remove(&param.name) {
				Some(value) => {
					ordered.insert(param.name.clone(), value);
				}
				None => match &param.default {
					Some(default) => {
						ordered.insert(param.name.clone(), default.clone());
					}
					None => return Err(BindError::Missing(param.name.clone())),
				},
			}
		}

		Ok(BoundArgs {
			values: ordered,
			var_keywords,
		})
	}
}

/// Call-site arguments.
#[derive(Debug, Clone, Default)]
pub struct Args {
	pub positional: Vec<Value>,
	pub keyword: IndexMap<Arc<str>, Value>,
}

impl Args {
	pub fn new() -> Self {
		Self::default()
	}

	/// Appends a positional argument.
	pub fn arg(mut self, value: impl Into<Value>) -> Self {
		self.positional.push(value.into());
		self
	}

	/// Sets a keyword argument.
	pub fn kwarg(mut self, name: &str, value: impl Into<Value>) -> Self {
		self.keyword.insert(Arc::from(name), value.into());
		self
	}

	pub fn is_empty(&self) -> bool {
		self.positional.is_empty() && self.keyword.is_empty()
	}
}

impl<V: Into<Value>> FromIterator<V> for Args {
	fn from_iter<I: IntoIterator<Item = V>>(iter: I) -> Self {
		Self {
			positional: iter.into_iter().map(Into::into).collect(),
			keyword: IndexMap::new(),
		}
	}
}

/// Arguments bound to parameter names, defaults applied.
#[derive(Debug, Clone, Default)]
pub struct BoundArgs {
	values: IndexMap<Arc<str>, Value>,
	var_keywords: IndexMap<Arc<str>, Value>,
}

impl BoundArgs {
	pub fn get(&self, name: &str) -> Option<&Value> {
		self.values.get(name)
	}

	/// Returns the bound value, or `Value::None` when the name is not a parameter.
	pub fn value(&self, name: &str) -> Value {
		self.get(name).cloned().unwrap_or_default()
	}

	/// Keyword arguments captured by the variadic keyword parameter.
	pub fn var_keywords(&self) -> &IndexMap<Arc<str>, Value> {
		&self.var_keywords
	}

	pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
		self.values.iter().map(|(k, v)| (&**k, v))
	}

	pub fn len(&self) -> usize {
		self.values.len()
	}

	pub fn is_empty(&self) -> bool {
		self.values.is_empty()
	}
}
