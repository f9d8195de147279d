use std::sync::{Arc, Weak};

use hivemind_model::{
	ContainerError, ContributionDefinition, ImplementationDefinition, InterceptorDefinition,
	Location, ModuleContents, ModuleDefinition, Occurrences, RegistryDefinition, ServiceInterface,
	Visibility,
};
use hivemind_util::Orderer;
use rustc_hash::{FxHashMap, FxHashSet};

use crate::configuration::ConfigurationPoint;
use crate::handler::{ErrorHandler, StrictErrorHandler};
use crate::models::ServiceModelFactory;
use crate::module::Module;
use crate::registry::{Registry, RegistryRuntime};
use crate::service_point::ServicePoint;

/// Builds a [`Registry`] out of a [`RegistryDefinition`].
///
/// The build is two-pass: the definition graph is complete before resolution
/// starts, and resolution completes before anything is constructed. How
/// resolution problems are treated is the [`ErrorHandler`]'s call; the strict
/// default aborts on the first one.
pub struct RegistryBuilder {
	error_handler: Arc<dyn ErrorHandler>,
	models: ServiceModelFactory,
}

impl RegistryBuilder {
	pub fn new() -> Self {
		Self {
			error_handler: Arc::new(StrictErrorHandler),
			models: ServiceModelFactory::standard(),
		}
	}

	pub fn with_error_handler(mut self, handler: Arc<dyn ErrorHandler>) -> Self {
		self.error_handler = handler;
		self
	}

	pub fn with_model_factory(mut self, models: ServiceModelFactory) -> Self {
		self.models = models;
		self
	}

	/// Resolves every contributed extension against its target point and
	/// freezes the result into a runnable registry.
	pub fn build(self, definition: RegistryDefinition) -> Result<Registry, ContainerError> {
		let handler = self.error_handler;
		let modules: Vec<ModuleContents> = definition
			.into_modules()
			.into_iter()
			.map(ModuleDefinition::into_contents)
			.collect();

		let mut module_meta: Vec<(String, Location)> = Vec::with_capacity(modules.len());
		let mut module_ids: FxHashSet<String> = FxHashSet::default();
		let mut service_builds: FxHashMap<String, PointBuild<ServiceBody>> = FxHashMap::default();
		let mut configuration_builds: FxHashMap<String, PointBuild<ConfigurationBody>> =
			FxHashMap::default();
		let mut implementations = Vec::new();
		let mut interceptors = Vec::new();
		let mut contributions = Vec::new();
		let mut parsers = Vec::new();

		for contents in modules {
			module_ids.insert(contents.id.clone());
			module_meta.push((contents.id.clone(), contents.location.clone()));
			for point in contents.service_points {
				let qualified = format!("{}.{}", contents.id, point.id());
				service_builds.insert(
					qualified,
					PointBuild {
						module_id: contents.id.clone(),
						visibility: point.visibility(),
						location: point.location().clone(),
						body: ServiceBody {
							interface: point.interface(),
							implementations: point.implementations().to_vec(),
							interceptors: point.interceptors().to_vec(),
						},
					},
				);
			}
			for point in contents.configuration_points {
				let qualified = format!("{}.{}", contents.id, point.id());
				configuration_builds.insert(
					qualified,
					PointBuild {
						module_id: contents.id.clone(),
						visibility: point.visibility(),
						location: point.location().clone(),
						body: ConfigurationBody {
							occurrences: point.occurrences(),
							contributions: point.contributions().to_vec(),
							parser_formats: point
								.parsers()
								.keys()
								.cloned()
								.collect::<FxHashSet<String>>(),
						},
					},
				);
			}
			implementations.extend(contents.implementations);
			interceptors.extend(contents.interceptors);
			contributions.extend(contents.contributions);
			parsers.extend(contents.parsers);
		}

		for unresolved in implementations {
			let (target, extension) = unresolved.into_parts();
			let Some(build) = locate(
				&mut service_builds,
				&module_ids,
				&target,
				extension.location(),
				extension.contributing_module(),
				&*handler,
				missing_service,
			)?
			else {
				continue;
			};
			// One explicit default per point, counting inline and contributed
			// implementations together.
			if extension.is_default()
				&& build.body.implementations.iter().any(|i| i.is_default())
			{
				handler.error(ContainerError::DuplicateDefaultImplementation {
					point: target.clone(),
					location: extension.location().clone(),
				})?;
				continue;
			}
			build.body.implementations.push(extension);
		}

		for unresolved in interceptors {
			let (target, extension) = unresolved.into_parts();
			let Some(build) = locate(
				&mut service_builds,
				&module_ids,
				&target,
				extension.location(),
				extension.contributing_module(),
				&*handler,
				missing_service,
			)?
			else {
				continue;
			};
			build.body.interceptors.push(extension);
		}

		for unresolved in contributions {
			let (target, extension) = unresolved.into_parts();
			let Some(build) = locate(
				&mut configuration_builds,
				&module_ids,
				&target,
				extension.location(),
				extension.contributing_module(),
				&*handler,
				missing_configuration,
			)?
			else {
				continue;
			};
			if extension.is_initial() && build.body.contributions.iter().any(|c| c.is_initial()) {
				handler.error(ContainerError::DuplicateInitialContribution {
					point: target.clone(),
					location: extension.location().clone(),
				})?;
				continue;
			}
			build.body.contributions.push(extension);
		}

		for unresolved in parsers {
			let (target, extension) = unresolved.into_parts();
			let Some(build) = locate(
				&mut configuration_builds,
				&module_ids,
				&target,
				extension.location(),
				extension.contributing_module(),
				&*handler,
				missing_configuration,
			)?
			else {
				continue;
			};
			if !build
				.body
				.parser_formats
				.insert(extension.format().to_owned())
			{
				handler.error(ContainerError::DuplicateParserFormat {
					point: target.clone(),
					format: extension.format().to_owned(),
					location: extension.location().clone(),
				})?;
			}
			// Parsing itself happens outside the container; beyond the
			// format-uniqueness check the definitions carry no runtime state.
		}

		let mut resolved_services = Vec::with_capacity(service_builds.len());
		for (qualified, build) in service_builds {
			let mut orderer = Orderer::new(format!("interceptors of {qualified}"));
			for interceptor in build.body.interceptors {
				let name = interceptor.name().to_owned();
				let precedes = interceptor.precedes().map(str::to_owned);
				let follows = interceptor.follows().map(str::to_owned);
				orderer.add(interceptor, &name, precedes.as_deref(), follows.as_deref());
			}
			resolved_services.push(ResolvedServicePoint {
				id: qualified,
				module_id: build.module_id,
				visibility: build.visibility,
				location: build.location,
				interface: build.body.interface,
				implementations: build.body.implementations,
				interceptors: orderer.ordered(),
			});
		}

		let mut resolved_configurations = Vec::with_capacity(configuration_builds.len());
		for (qualified, build) in configuration_builds {
			let mut contributions = build.body.contributions;
			if !build.body.occurrences.in_range(contributions.len()) {
				handler.error(ContainerError::WrongContributionCount {
					point: qualified.clone(),
					expected: build.body.occurrences,
					actual: contributions.len(),
				})?;
			}
			if let Some(initial) = contributions.iter().position(ContributionDefinition::is_initial)
			{
				let initial = contributions.remove(initial);
				contributions.insert(0, initial);
			}
			resolved_configurations.push(ResolvedConfigurationPoint {
				id: qualified,
				module_id: build.module_id,
				visibility: build.visibility,
				location: build.location,
				occurrences: build.body.occurrences,
				contributions,
			});
		}

		let module_count = module_meta.len();
		let service_count = resolved_services.len();
		let configuration_count = resolved_configurations.len();
		let models = self.models;
		let runtime = Arc::new_cyclic(|weak: &Weak<RegistryRuntime>| {
			let modules = module_meta
				.into_iter()
				.map(|(id, location)| {
					let module = Arc::new(Module::new(id.clone(), location, weak.clone()));
					(id, module)
				})
				.collect();
			let service_points = resolved_services
				.into_iter()
				.map(|resolved| {
					let id = resolved.id.clone();
					(id, Arc::new(ServicePoint::new(resolved, weak.clone())))
				})
				.collect();
			let configuration_points = resolved_configurations
				.into_iter()
				.map(|resolved| {
					let id = resolved.id.clone();
					(id, Arc::new(ConfigurationPoint::new(resolved, weak.clone())))
				})
				.collect();
			RegistryRuntime::new(modules, service_points, configuration_points, models)
		});

		tracing::debug!(
			modules = module_count,
			services = service_count,
			configurations = configuration_count,
			"registry built"
		);
		Ok(Registry::from_runtime(runtime))
	}
}

impl Default for RegistryBuilder {
	fn default() -> Self {
		Self::new()
	}
}

struct PointBuild<B> {
	module_id: String,
	visibility: Visibility,
	location: Location,
	body: B,
}

struct ServiceBody {
	interface: ServiceInterface,
	implementations: Vec<ImplementationDefinition>,
	interceptors: Vec<InterceptorDefinition>,
}

struct ConfigurationBody {
	occurrences: Occurrences,
	contributions: Vec<ContributionDefinition>,
	parser_formats: FxHashSet<String>,
}

/// Finds the target point for one extension and checks visibility. `Ok(None)`
/// means the handler swallowed the problem and the extension is dropped.
fn locate<'a, B>(
	builds: &'a mut FxHashMap<String, PointBuild<B>>,
	module_ids: &FxHashSet<String>,
	target: &str,
	location: &Location,
	contributor: &str,
	handler: &dyn ErrorHandler,
	missing: fn(&str, &Location) -> ContainerError,
) -> Result<Option<&'a mut PointBuild<B>>, ContainerError> {
	let Some(build) = builds.get_mut(target) else {
		let error = match target.rsplit_once('.') {
			Some((module_id, _)) if !module_ids.contains(module_id) => {
				ContainerError::UnknownModule {
					id: module_id.to_owned(),
					location: location.clone(),
				}
			}
			_ => missing(target, location),
		};
		handler.error(error)?;
		return Ok(None);
	};
	if build.visibility == Visibility::Private && build.module_id != contributor {
		handler.error(ContainerError::NotVisible {
			point: target.to_owned(),
			module: contributor.to_owned(),
			location: location.clone(),
		})?;
		return Ok(None);
	}
	Ok(Some(build))
}

fn missing_service(target: &str, location: &Location) -> ContainerError {
	ContainerError::UnknownServicePoint {
		id: target.to_owned(),
		location: location.clone(),
	}
}

fn missing_configuration(target: &str, location: &Location) -> ContainerError {
	ContainerError::UnknownConfigurationPoint {
		id: target.to_owned(),
		location: location.clone(),
	}
}

/// Frozen output of resolution for one service point.
pub(crate) struct ResolvedServicePoint {
	pub(crate) id: String,
	pub(crate) module_id: String,
	pub(crate) visibility: Visibility,
	pub(crate) location: Location,
	pub(crate) interface: ServiceInterface,
	pub(crate) implementations: Vec<ImplementationDefinition>,
	pub(crate) interceptors: Vec<InterceptorDefinition>,
}

/// Frozen output of resolution for one configuration point; the initial
/// contribution, if any, is already first.
pub(crate) struct ResolvedConfigurationPoint {
	pub(crate) id: String,
	pub(crate) module_id: String,
	pub(crate) visibility: Visibility,
	pub(crate) location: Location,
	pub(crate) occurrences: Occurrences,
	pub(crate) contributions: Vec<ContributionDefinition>,
}
