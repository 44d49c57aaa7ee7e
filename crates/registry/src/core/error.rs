use std::sync::Arc;

use thiserror::Error;

use super::types::LogicalName;

/// Errors raised while assembling or querying a [`crate::Registry`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
	/// A second non-extending fragment was declared under an existing name.
	#[error("extendable '{name}' (in class def {qualname}) already exists")]
	DuplicateDefinition { name: LogicalName, qualname: Arc<str> },
	/// A hierarchy names a base that no loaded module declares.
	#[error("extendable class '{name}' inherits from undefined base '{base}'")]
	UndefinedBase { name: LogicalName, base: LogicalName },
	/// A synthesis pass made no progress with hierarchies left to build.
	#[error("cannot build extendable classes {remaining:?}: dependency cycle or unresolved bases")]
	CyclicOrUnresolvedBases { remaining: Vec<LogicalName> },
	/// The ordered bases of a synthesized type admit no consistent resolution order.
	#[error("cannot create a consistent method resolution order for '{name}'")]
	InconsistentHierarchy { name: LogicalName },
	/// A module pattern could not be compiled.
	#[error("invalid module pattern {pattern:?}: {reason}")]
	InvalidPattern { pattern: String, reason: String },
	/// No ready registry is installed for the current context.
	#[error("no initialized extendable registry in the current context")]
	NotInitialized,
	/// The registry holds no aggregate for the name.
	#[error("unknown extendable '{0}'")]
	UnknownName(LogicalName),
}

/// Errors raised when declaring a class fragment.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DeclareError {
	/// `extends` points at a type that carries no logical name.
	#[error("extendable class {qualname} extends a non extendable class {target}")]
	InvalidExtendsTarget { qualname: Arc<str>, target: Arc<str> },
	/// A plain type cannot inherit from a fragment-bearing type.
	#[error("plain class {qualname} inherits from extendable class {base}")]
	PlainSubclassOfExtendable { qualname: Arc<str>, base: Arc<str> },
	/// The declared bases admit no consistent resolution order.
	#[error("cannot create a consistent method resolution order for {qualname}")]
	InconsistentHierarchy { qualname: Arc<str> },
	/// A declaration refers to a type no module has declared yet.
	#[error("extendable class {qualname} is not declared")]
	Undeclared { qualname: Arc<str> },
}

/// Reasons an argument list fails to bind to a [`crate::Signature`].
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum BindError {
	#[error("takes {expected} positional arguments but {given} were given")]
	TooManyPositional { expected: usize, given: usize },
	#[error("got multiple values for argument '{0}'")]
	MultipleValues(Arc<str>),
	#[error("got an unexpected keyword argument '{0}'")]
	UnexpectedKeyword(Arc<str>),
	#[error("missing a required argument: '{0}'")]
	Missing(Arc<str>),
}

/// Errors raised by construction, attribute access, and method calls.
#[derive(Error, Debug, Clone)]
pub enum CallError {
	/// Arguments do not bind to the callable's declared signature.
	#[error("{callable}() {source}")]
	ArgumentBinding { callable: Arc<str>, source: BindError },
	#[error("'{type_name}' object has no attribute '{attr}'")]
	AttributeNotFound { type_name: Arc<str>, attr: Arc<str> },
	#[error("'{type_name}.{attr}' is not callable here")]
	NotCallable { type_name: Arc<str>, attr: Arc<str> },
	#[error("expected {expected}, found {found}")]
	TypeMismatch { expected: &'static str, found: &'static str },
	#[error(transparent)]
	Registry(#[from] RegistryError),
	/// Failure reported by a method body.
	#[error("{0}")]
	Custom(String),
}

impl CallError {
	/// Builds a [`CallError::Custom`] from any displayable message.
	pub fn custom(msg: impl std::fmt::Display) -> Self {
		Self::Custom(msg.to_string())
	}
}
