use indexmap::IndexMap;

use crate::error::ContainerError;
use crate::extensions::{
	ContributionDefinition, ImplementationDefinition, InterceptorDefinition, ParserDefinition,
	UnresolvedExtension,
};
use crate::location::Location;
use crate::points::{ConfigurationPointDefinition, ServicePointDefinition};

/// One module: the extension points it defines plus the extensions it
/// contributes to points elsewhere (held unresolved until the container's
/// resolution pass).
///
/// Service and configuration points share a single id namespace within the
/// module. Built once by a parser, then immutable input to the container.
pub struct ModuleDefinition {
	id: String,
	location: Location,
	service_points: IndexMap<String, ServicePointDefinition>,
	configuration_points: IndexMap<String, ConfigurationPointDefinition>,
	implementations: Vec<UnresolvedExtension<ImplementationDefinition>>,
	interceptors: Vec<UnresolvedExtension<InterceptorDefinition>>,
	contributions: Vec<UnresolvedExtension<ContributionDefinition>>,
	parsers: Vec<UnresolvedExtension<ParserDefinition>>,
}

impl ModuleDefinition {
	pub fn new(id: impl Into<String>, location: Location) -> Self {
		Self {
			id: id.into(),
			location,
			service_points: IndexMap::new(),
			configuration_points: IndexMap::new(),
			implementations: Vec::new(),
			interceptors: Vec::new(),
			contributions: Vec::new(),
			parsers: Vec::new(),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn location(&self) -> &Location {
		&self.location
	}

	pub fn add_service_point(
		&mut self,
		mut definition: ServicePointDefinition,
	) -> Result<(), ContainerError> {
		let id = definition.id().to_owned();
		if self.point_id_taken(&id) {
			return Err(ContainerError::DuplicateExtensionPoint {
				module: self.id.clone(),
				id,
				location: definition.location().clone(),
			});
		}
		definition.adopt(&self.id);
		self.service_points.insert(id, definition);
		Ok(())
	}

	pub fn add_configuration_point(
		&mut self,
		mut definition: ConfigurationPointDefinition,
	) -> Result<(), ContainerError> {
		let id = definition.id().to_owned();
		if self.point_id_taken(&id) {
			return Err(ContainerError::DuplicateExtensionPoint {
				module: self.id.clone(),
				id,
				location: definition.location().clone(),
			});
		}
		definition.adopt(&self.id);
		self.configuration_points.insert(id, definition);
		Ok(())
	}

	/// Contributes an implementation to the service point `target`.
	/// Unqualified targets resolve within this module.
	pub fn add_implementation(
		&mut self,
		target: impl Into<String>,
		mut definition: ImplementationDefinition,
	) {
		definition.set_contributing_module(&self.id);
		self.implementations
			.push(UnresolvedExtension::new(self.qualify(target.into()), definition));
	}

	pub fn add_interceptor(
		&mut self,
		target: impl Into<String>,
		mut definition: InterceptorDefinition,
	) {
		definition.set_contributing_module(&self.id);
		self.interceptors
			.push(UnresolvedExtension::new(self.qualify(target.into()), definition));
	}

	pub fn add_contribution(
		&mut self,
		target: impl Into<String>,
		mut definition: ContributionDefinition,
	) {
		definition.set_contributing_module(&self.id);
		self.contributions
			.push(UnresolvedExtension::new(self.qualify(target.into()), definition));
	}

	pub fn add_parser(&mut self, target: impl Into<String>, mut definition: ParserDefinition) {
		definition.set_contributing_module(&self.id);
		self.parsers
			.push(UnresolvedExtension::new(self.qualify(target.into()), definition));
	}

	pub fn service_points(&self) -> impl Iterator<Item = &ServicePointDefinition> {
		self.service_points.values()
	}

	pub fn configuration_points(&self) -> impl Iterator<Item = &ConfigurationPointDefinition> {
		self.configuration_points.values()
	}

	pub fn into_contents(self) -> ModuleContents {
		ModuleContents {
			id: self.id,
			location: self.location,
			service_points: self.service_points.into_values().collect(),
			configuration_points: self.configuration_points.into_values().collect(),
			implementations: self.implementations,
			interceptors: self.interceptors,
			contributions: self.contributions,
			parsers: self.parsers,
		}
	}

	fn point_id_taken(&self, id: &str) -> bool {
		self.service_points.contains_key(id) || self.configuration_points.contains_key(id)
	}

	fn qualify(&self, target: String) -> String {
		if target.contains('.') {
			target
		} else {
			format!("{}.{target}", self.id)
		}
	}
}

/// Decomposed [`ModuleDefinition`], consumed by the resolution pass.
pub struct ModuleContents {
	pub id: String,
	pub location: Location,
	pub service_points: Vec<ServicePointDefinition>,
	pub configuration_points: Vec<ConfigurationPointDefinition>,
	pub implementations: Vec<UnresolvedExtension<ImplementationDefinition>>,
	pub interceptors: Vec<UnresolvedExtension<InterceptorDefinition>>,
	pub contributions: Vec<UnresolvedExtension<ContributionDefinition>>,
	pub parsers: Vec<UnresolvedExtension<ParserDefinition>>,
}

/// All modules handed to the container, in contribution order.
#[derive(Default)]
pub struct RegistryDefinition {
	modules: IndexMap<String, ModuleDefinition>,
}

impl RegistryDefinition {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn add_module(&mut self, definition: ModuleDefinition) -> Result<(), ContainerError> {
		if self.modules.contains_key(definition.id()) {
			return Err(ContainerError::DuplicateModule {
				id: definition.id().to_owned(),
				location: definition.location().clone(),
			});
		}
		self.modules.insert(definition.id().to_owned(), definition);
		Ok(())
	}

	pub fn module(&self, id: &str) -> Option<&ModuleDefinition> {
		self.modules.get(id)
	}

	pub fn modules(&self) -> impl Iterator<Item = &ModuleDefinition> {
		self.modules.values()
	}

	pub fn into_modules(self) -> Vec<ModuleDefinition> {
		self.modules.into_values().collect()
	}
}
