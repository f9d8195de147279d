use std::fmt;

use indexmap::IndexMap;

use crate::error::ContainerError;
use crate::extensions::{ContributionDefinition, ImplementationDefinition, InterceptorDefinition, ParserDefinition};
use crate::location::Location;
use crate::occurrences::Occurrences;
use crate::service::ServiceInterface;

/// Who may extend an extension point.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Visibility {
	/// Any module may contribute and look the point up.
	#[default]
	Public,
	/// Only the defining module.
	Private,
}

impl fmt::Display for Visibility {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::Public => f.write_str("public"),
			Self::Private => f.write_str("private"),
		}
	}
}

/// Declares a service: an interface callers downcast to, plus the
/// implementations and interceptors contributed against it.
#[derive(Clone)]
pub struct ServicePointDefinition {
	id: String,
	visibility: Visibility,
	location: Location,
	interface: ServiceInterface,
	implementations: Vec<ImplementationDefinition>,
	interceptors: Vec<InterceptorDefinition>,
}

impl ServicePointDefinition {
	pub fn new(id: impl Into<String>, interface: ServiceInterface, location: Location) -> Self {
		Self {
			id: id.into(),
			visibility: Visibility::default(),
			location,
			interface,
			implementations: Vec::new(),
			interceptors: Vec::new(),
		}
	}

	pub fn with_visibility(mut self, visibility: Visibility) -> Self {
		self.visibility = visibility;
		self
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn visibility(&self) -> Visibility {
		self.visibility
	}

	pub fn location(&self) -> &Location {
		&self.location
	}

	pub fn interface(&self) -> ServiceInterface {
		self.interface
	}

	/// Adds an implementation declared inline with the point. At most one may
	/// carry the default flag.
	pub fn add_implementation(
		&mut self,
		definition: ImplementationDefinition,
	) -> Result<(), ContainerError> {
		if definition.is_default() && self.implementations.iter().any(|i| i.is_default()) {
			return Err(ContainerError::DuplicateDefaultImplementation {
				point: self.id.clone(),
				location: definition.location().clone(),
			});
		}
		self.implementations.push(definition);
		Ok(())
	}

	pub fn add_interceptor(&mut self, definition: InterceptorDefinition) {
		self.interceptors.push(definition);
	}

	pub fn implementations(&self) -> &[ImplementationDefinition] {
		&self.implementations
	}

	pub fn interceptors(&self) -> &[InterceptorDefinition] {
		&self.interceptors
	}

	/// The implementation flagged default, else the first one contributed.
	/// Never `None` while any implementation exists.
	pub fn default_implementation(&self) -> Option<&ImplementationDefinition> {
		self.implementations
			.iter()
			.find(|i| i.is_default())
			.or_else(|| self.implementations.first())
	}

	pub(crate) fn adopt(&mut self, module: &str) {
		for implementation in &mut self.implementations {
			implementation.set_contributing_module(module);
		}
		for interceptor in &mut self.interceptors {
			interceptor.set_contributing_module(module);
		}
	}
}

/// Declares a configuration point: an occurrence-constrained collection of
/// contributed items.
#[derive(Clone)]
pub struct ConfigurationPointDefinition {
	id: String,
	visibility: Visibility,
	location: Location,
	occurrences: Occurrences,
	contributions: Vec<ContributionDefinition>,
	parsers: IndexMap<String, ParserDefinition>,
}

impl ConfigurationPointDefinition {
	pub fn new(id: impl Into<String>, occurrences: Occurrences, location: Location) -> Self {
		Self {
			id: id.into(),
			visibility: Visibility::default(),
			location,
			occurrences,
			contributions: Vec::new(),
			parsers: IndexMap::new(),
		}
	}

	pub fn with_visibility(mut self, visibility: Visibility) -> Self {
		self.visibility = visibility;
		self
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn visibility(&self) -> Visibility {
		self.visibility
	}

	pub fn location(&self) -> &Location {
		&self.location
	}

	pub fn occurrences(&self) -> Occurrences {
		self.occurrences
	}

	/// Adds a contribution declared inline with the point. At most one may
	/// carry the initial flag.
	pub fn add_contribution(
		&mut self,
		definition: ContributionDefinition,
	) -> Result<(), ContainerError> {
		if definition.is_initial() && self.contributions.iter().any(|c| c.is_initial()) {
			return Err(ContainerError::DuplicateInitialContribution {
				point: self.id.clone(),
				location: definition.location().clone(),
			});
		}
		self.contributions.push(definition);
		Ok(())
	}

	/// Registers an input format; each format may be claimed once.
	pub fn add_parser(&mut self, definition: ParserDefinition) -> Result<(), ContainerError> {
		if self.parsers.contains_key(definition.format()) {
			return Err(ContainerError::DuplicateParserFormat {
				point: self.id.clone(),
				format: definition.format().to_owned(),
				location: definition.location().clone(),
			});
		}
		self.parsers.insert(definition.format().to_owned(), definition);
		Ok(())
	}

	pub fn contributions(&self) -> &[ContributionDefinition] {
		&self.contributions
	}

	pub fn parsers(&self) -> &IndexMap<String, ParserDefinition> {
		&self.parsers
	}

	pub(crate) fn adopt(&mut self, module: &str) {
		for contribution in &mut self.contributions {
			contribution.set_contributing_module(module);
		}
		for parser in self.parsers.values_mut() {
			parser.set_contributing_module(module);
		}
	}
}
