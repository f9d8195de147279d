use std::fmt;
use std::sync::Arc;

use crate::construct::{ContributionConstructor, InterceptorConstructor, ServiceConstructor};
use crate::location::Location;

/// One way of building a service point's core implementation.
///
/// `service_model` names the lifecycle model (`"singleton"`, `"threaded"`,
/// ...) the container realizes the service with; the name is looked up in the
/// container's pluggable model-factory table at first access.
#[derive(Clone)]
pub struct ImplementationDefinition {
	contributing_module: String,
	service_model: String,
	is_default: bool,
	constructor: Arc<dyn ServiceConstructor>,
	location: Location,
}

impl ImplementationDefinition {
	pub fn new(
		service_model: impl Into<String>,
		constructor: Arc<dyn ServiceConstructor>,
		location: Location,
	) -> Self {
		Self {
			contributing_module: String::new(),
			service_model: service_model.into(),
			is_default: false,
			constructor,
			location,
		}
	}

	/// Flags this implementation as the explicit default for its point.
	pub fn as_default(mut self) -> Self {
		self.is_default = true;
		self
	}

	pub fn contributing_module(&self) -> &str {
		&self.contributing_module
	}

	pub(crate) fn set_contributing_module(&mut self, module: &str) {
		self.contributing_module = module.to_owned();
	}

	pub fn service_model(&self) -> &str {
		&self.service_model
	}

	pub fn is_default(&self) -> bool {
		self.is_default
	}

	pub fn constructor(&self) -> Arc<dyn ServiceConstructor> {
		self.constructor.clone()
	}

	pub fn location(&self) -> &Location {
		&self.location
	}
}

impl fmt::Debug for ImplementationDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ImplementationDefinition")
			.field("contributing_module", &self.contributing_module)
			.field("service_model", &self.service_model)
			.field("is_default", &self.is_default)
			.field("location", &self.location)
			.finish_non_exhaustive()
	}
}

/// A named interceptor contribution against a service point.
///
/// `precedes` / `follows` are comma-separated interceptor names; `*` means
/// "all other interceptors". They drive the execution-order sort, not the
/// order of contribution.
#[derive(Clone)]
pub struct InterceptorDefinition {
	contributing_module: String,
	name: String,
	precedes: Option<String>,
	follows: Option<String>,
	constructor: Arc<dyn InterceptorConstructor>,
	location: Location,
}

impl InterceptorDefinition {
	pub fn new(
		name: impl Into<String>,
		constructor: Arc<dyn InterceptorConstructor>,
		location: Location,
	) -> Self {
		Self {
			contributing_module: String::new(),
			name: name.into(),
			precedes: None,
			follows: None,
			constructor,
			location,
		}
	}

	pub fn with_precedes(mut self, names: impl Into<String>) -> Self {
		self.precedes = Some(names.into());
		self
	}

	pub fn with_follows(mut self, names: impl Into<String>) -> Self {
		self.follows = Some(names.into());
		self
	}

	pub fn contributing_module(&self) -> &str {
		&self.contributing_module
	}

	pub(crate) fn set_contributing_module(&mut self, module: &str) {
		self.contributing_module = module.to_owned();
	}

	pub fn name(&self) -> &str {
		&self.name
	}

	pub fn precedes(&self) -> Option<&str> {
		self.precedes.as_deref()
	}

	pub fn follows(&self) -> Option<&str> {
		self.follows.as_deref()
	}

	pub fn constructor(&self) -> Arc<dyn InterceptorConstructor> {
		self.constructor.clone()
	}

	pub fn location(&self) -> &Location {
		&self.location
	}
}

impl fmt::Debug for InterceptorDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InterceptorDefinition")
			.field("contributing_module", &self.contributing_module)
			.field("name", &self.name)
			.field("precedes", &self.precedes)
			.field("follows", &self.follows)
			.field("location", &self.location)
			.finish_non_exhaustive()
	}
}

/// Configuration data contributed to a configuration point.
#[derive(Clone)]
pub struct ContributionDefinition {
	contributing_module: String,
	is_initial: bool,
	constructor: Arc<dyn ContributionConstructor>,
	location: Location,
}

impl ContributionDefinition {
	pub fn new(constructor: Arc<dyn ContributionConstructor>, location: Location) -> Self {
		Self {
			contributing_module: String::new(),
			is_initial: false,
			constructor,
			location,
		}
	}

	/// Flags this contribution as the initial one: its items lead the merged
	/// configuration regardless of contribution order.
	pub fn as_initial(mut self) -> Self {
		self.is_initial = true;
		self
	}

	pub fn contributing_module(&self) -> &str {
		&self.contributing_module
	}

	pub(crate) fn set_contributing_module(&mut self, module: &str) {
		self.contributing_module = module.to_owned();
	}

	pub fn is_initial(&self) -> bool {
		self.is_initial
	}

	pub fn constructor(&self) -> Arc<dyn ContributionConstructor> {
		self.constructor.clone()
	}

	pub fn location(&self) -> &Location {
		&self.location
	}
}

impl fmt::Debug for ContributionDefinition {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ContributionDefinition")
			.field("contributing_module", &self.contributing_module)
			.field("is_initial", &self.is_initial)
			.field("location", &self.location)
			.finish_non_exhaustive()
	}
}

/// Registers an input format a configuration point can be fed from.
///
/// Parsing itself lives outside the container; the definition only reserves
/// the format name (duplicates are an error).
#[derive(Debug, Clone)]
pub struct ParserDefinition {
	contributing_module: String,
	format: String,
	location: Location,
}

impl ParserDefinition {
	pub fn new(format: impl Into<String>, location: Location) -> Self {
		Self {
			contributing_module: String::new(),
			format: format.into(),
			location,
		}
	}

	pub fn contributing_module(&self) -> &str {
		&self.contributing_module
	}

	pub(crate) fn set_contributing_module(&mut self, module: &str) {
		self.contributing_module = module.to_owned();
	}

	pub fn format(&self) -> &str {
		&self.format
	}

	pub fn location(&self) -> &Location {
		&self.location
	}
}

/// An extension paired with the qualified id of the point it targets.
///
/// Consumed exactly once by the container's resolution pass, which either
/// attaches the extension or reports the target as missing / not visible.
#[derive(Debug, Clone)]
pub struct UnresolvedExtension<T> {
	target: String,
	extension: T,
}

impl<T> UnresolvedExtension<T> {
	pub fn new(target: impl Into<String>, extension: T) -> Self {
		Self {
			target: target.into(),
			extension,
		}
	}

	pub fn target(&self) -> &str {
		&self.target
	}

	pub fn extension(&self) -> &T {
		&self.extension
	}

	/// Splits the target at its last `.` into (module id, local point id).
	/// Module ids are dotted namespaces; local ids never contain dots.
	pub fn split_target(&self) -> Option<(&str, &str)> {
		self.target.rsplit_once('.')
	}

	pub fn into_parts(self) -> (String, T) {
		(self.target, self.extension)
	}
}
