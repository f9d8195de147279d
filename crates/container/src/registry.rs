use std::any::{Any, TypeId};
use std::sync::Arc;

use hivemind_model::{ContainerError, Location, ServiceObject, Visibility};
use rustc_hash::FxHashMap;

use crate::configuration::ConfigurationPoint;
use crate::models::ServiceModelFactory;
use crate::module::Module;
use crate::service_point::ServicePoint;
use crate::service_ref::ServiceRef;
use crate::shutdown::ShutdownCoordinator;
use crate::threads::ThreadEventNotifier;

/// Module id stamped on errors raised by direct facade lookups, which carry
/// no module identity of their own.
const APPLICATION: &str = "<application>";

/// Everything the built container owns. Modules and points hold `Weak`
/// back-references into this, so dropping the last [`Registry`] clone tears
/// the whole graph down.
pub(crate) struct RegistryRuntime {
	modules: FxHashMap<String, Arc<Module>>,
	service_points: FxHashMap<String, Arc<ServicePoint>>,
	configuration_points: FxHashMap<String, Arc<ConfigurationPoint>>,
	models: ServiceModelFactory,
	shutdown: ShutdownCoordinator,
	threads: ThreadEventNotifier,
}

impl RegistryRuntime {
	pub(crate) fn new(
		modules: FxHashMap<String, Arc<Module>>,
		service_points: FxHashMap<String, Arc<ServicePoint>>,
		configuration_points: FxHashMap<String, Arc<ConfigurationPoint>>,
		models: ServiceModelFactory,
	) -> Self {
		Self {
			modules,
			service_points,
			configuration_points,
			models,
			shutdown: ShutdownCoordinator::new(),
			threads: ThreadEventNotifier::new(),
		}
	}

	pub(crate) fn service_point(&self, id: &str) -> Option<Arc<ServicePoint>> {
		self.service_points.get(id).cloned()
	}

	pub(crate) fn configuration_point(&self, id: &str) -> Option<Arc<ConfigurationPoint>> {
		self.configuration_points.get(id).cloned()
	}

	pub(crate) fn service_points(&self) -> impl Iterator<Item = &Arc<ServicePoint>> {
		self.service_points.values()
	}

	pub(crate) fn module(
		&self,
		id: &str,
		location: &Location,
	) -> Result<Arc<Module>, ContainerError> {
		self.modules
			.get(id)
			.cloned()
			.ok_or_else(|| ContainerError::UnknownModule {
				id: id.to_owned(),
				location: location.clone(),
			})
	}

	pub(crate) fn models(&self) -> &ServiceModelFactory {
		&self.models
	}

	pub(crate) fn shutdown(&self) -> &ShutdownCoordinator {
		&self.shutdown
	}

	pub(crate) fn threads(&self) -> &ThreadEventNotifier {
		&self.threads
	}
}

/// The application's view of the container. Cheap to clone and safe to share
/// across threads.
///
/// Lookups take fully qualified point ids (`module.Point`) and see `Public`
/// points only; module-private points are reachable solely from constructors
/// running inside the owning module.
#[derive(Clone)]
pub struct Registry {
	runtime: Arc<RegistryRuntime>,
}

impl std::fmt::Debug for Registry {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Registry").finish_non_exhaustive()
	}
}

impl Registry {
	pub(crate) fn from_runtime(runtime: Arc<RegistryRuntime>) -> Self {
		Self { runtime }
	}

	fn live_runtime(&self) -> Result<&RegistryRuntime, ContainerError> {
		if self.runtime.shutdown().is_shutdown() {
			return Err(ContainerError::RegistryShutdown);
		}
		Ok(&self.runtime)
	}

	fn public_point(&self, id: &str) -> Result<Arc<ServicePoint>, ContainerError> {
		let runtime = self.live_runtime()?;
		let point =
			runtime
				.service_point(id)
				.ok_or_else(|| ContainerError::UnknownServicePoint {
					id: id.to_owned(),
					location: Location::resource_only(APPLICATION),
				})?;
		if point.visibility() == Visibility::Private {
			return Err(ContainerError::NotVisible {
				point: id.to_owned(),
				module: APPLICATION.to_owned(),
				location: point.location().clone(),
			});
		}
		Ok(point)
	}

	/// Resolves the service and clones its typed handle out, constructing if
	/// the point's model calls for it.
	pub fn service<H: Any + Clone>(&self, id: &str) -> Result<H, ContainerError> {
		self.service_ref(id)?.get()
	}

	/// A typed deferral handle; for deferred models nothing is constructed
	/// until the handle's first `get`.
	pub fn service_ref<H: Any + Clone>(&self, id: &str) -> Result<ServiceRef<H>, ContainerError> {
		self.public_point(id)?.service_ref()
	}

	/// The type-erased form of [`service`](Self::service).
	pub fn service_object(&self, id: &str) -> Result<ServiceObject, ContainerError> {
		self.public_point(id)?.service_object()
	}

	/// Resolves the single public service point whose declared interface is
	/// `H`. Zero or several matching points are errors.
	pub fn service_by_interface<H: Any + Clone>(&self) -> Result<H, ContainerError> {
		let runtime = self.live_runtime()?;
		let wanted = TypeId::of::<H>();
		let mut found: Option<Arc<ServicePoint>> = None;
		for point in runtime.service_points() {
			if point.visibility() == Visibility::Private || point.interface().type_id() != wanted {
				continue;
			}
			if found.is_some() {
				return Err(ContainerError::MultipleServicesForInterface {
					interface: std::any::type_name::<H>(),
				});
			}
			found = Some(point.clone());
		}
		let point = found.ok_or(ContainerError::NoServiceForInterface {
			interface: std::any::type_name::<H>(),
		})?;
		point.service_ref::<H>()?.get()
	}

	/// The assembled item list of a public configuration point.
	pub fn configuration(&self, id: &str) -> Result<Arc<Vec<ServiceObject>>, ContainerError> {
		let runtime = self.live_runtime()?;
		let point = runtime.configuration_point(id).ok_or_else(|| {
			ContainerError::UnknownConfigurationPoint {
				id: id.to_owned(),
				location: Location::resource_only(APPLICATION),
			}
		})?;
		if point.visibility() == Visibility::Private {
			return Err(ContainerError::NotVisible {
				point: id.to_owned(),
				module: APPLICATION.to_owned(),
				location: point.location().clone(),
			});
		}
		point.configuration()
	}

	/// Clones every configuration item out as `T`; any item of another type
	/// fails the whole call.
	pub fn configuration_as<T: Any + Clone>(&self, id: &str) -> Result<Vec<T>, ContainerError> {
		let items = self.configuration(id)?;
		items
			.iter()
			.map(|item| {
				item.downcast::<T>()
					.ok_or_else(|| ContainerError::ConfigurationItemMismatch {
						point: id.to_owned(),
						requested: std::any::type_name::<T>(),
					})
			})
			.collect()
	}

	/// Shuts the registry down: one-way and idempotent. Shutdown listeners
	/// fire exactly once; afterwards every facade lookup and every singleton
	/// access fails with [`ContainerError::RegistryShutdown`].
	pub fn shutdown(&self) {
		tracing::debug!("registry shutting down");
		self.runtime.shutdown().shutdown();
	}

	/// Declares the start of the calling thread's unit of work, clearing any
	/// thread-bound state a previous unit left behind.
	pub fn setup_thread(&self) {
		self.runtime.threads().fire_thread_cleanup();
	}

	/// Ends the calling thread's unit of work: threaded instances are
	/// discarded and pooled instances passivated and returned.
	pub fn cleanup_thread(&self) {
		self.runtime.threads().fire_thread_cleanup();
	}
}
