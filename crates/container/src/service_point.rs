use std::any::{Any, TypeId};
use std::sync::{Arc, Weak};

use hivemind_model::{
	ContainerError, ImplementationDefinition, InterceptorDefinition, Location, ServiceInterface,
	ServiceObject, Visibility,
};
use parking_lot::Mutex;

use crate::builder::ResolvedServicePoint;
use crate::models::ServiceModel;
use crate::registry::RegistryRuntime;
use crate::service_ref::ServiceRef;

/// A resolved service point, frozen after the registry build.
///
/// Holds everything needed to construct the service (implementations,
/// interceptors in execution order, declared interface) plus the lazily
/// created service model that owns the instance lifecycle.
pub struct ServicePoint {
	id: String,
	module_id: String,
	visibility: Visibility,
	location: Location,
	interface: ServiceInterface,
	implementations: Vec<ImplementationDefinition>,
	interceptors: Vec<InterceptorDefinition>,
	runtime: Weak<RegistryRuntime>,
	model: Mutex<Option<Arc<dyn ServiceModel>>>,
}

impl ServicePoint {
	pub(crate) fn new(resolved: ResolvedServicePoint, runtime: Weak<RegistryRuntime>) -> Self {
		Self {
			id: resolved.id,
			module_id: resolved.module_id,
			visibility: resolved.visibility,
			location: resolved.location,
			interface: resolved.interface,
			implementations: resolved.implementations,
			interceptors: resolved.interceptors,
			runtime,
			model: Mutex::new(None),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn module_id(&self) -> &str {
		&self.module_id
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

	/// The implementation flagged default, else the first one attached.
	pub fn default_implementation(&self) -> Option<&ImplementationDefinition> {
		self.implementations
			.iter()
			.find(|i| i.is_default())
			.or_else(|| self.implementations.first())
	}

	pub(crate) fn interceptors(&self) -> &[InterceptorDefinition] {
		&self.interceptors
	}

	pub(crate) fn visible_to(&self, module_id: &str) -> bool {
		self.visibility == Visibility::Public || self.module_id == module_id
	}

	pub(crate) fn runtime(&self) -> Result<Arc<RegistryRuntime>, ContainerError> {
		self.runtime.upgrade().ok_or(ContainerError::RegistryShutdown)
	}

	/// The point's service model, created at most once. The model name comes
	/// from the default implementation; an unknown name is fatal here, on
	/// first access.
	pub(crate) fn model(self: &Arc<Self>) -> Result<Arc<dyn ServiceModel>, ContainerError> {
		let mut slot = self.model.lock();
		if let Some(model) = slot.as_ref() {
			return Ok(model.clone());
		}

		let implementation =
			self.default_implementation()
				.ok_or_else(|| ContainerError::NoImplementation {
					point: self.id.clone(),
				})?;
		let model_name = implementation.service_model().to_owned();
		let runtime = self.runtime()?;
		let model = runtime.models().create(&model_name, self.clone())?;
		tracing::debug!(
			point = %self.id,
			model = %model_name,
			eager = model.constructs_at_lookup(),
			"service model created"
		);
		*slot = Some(model.clone());
		Ok(model)
	}

	pub(crate) fn service_object(self: &Arc<Self>) -> Result<ServiceObject, ContainerError> {
		self.model()?.get()
	}

	/// A typed deferral handle. The requested handle type must be the
	/// declared interface; checking here keeps every later `get` infallible
	/// on the type axis.
	pub(crate) fn service_ref<H: Any + Clone>(
		self: &Arc<Self>,
	) -> Result<ServiceRef<H>, ContainerError> {
		if self.interface.type_id() != TypeId::of::<H>() {
			return Err(ContainerError::InterfaceMismatch {
				point: self.id.clone(),
				declared: self.interface.name(),
				requested: std::any::type_name::<H>(),
			});
		}
		Ok(ServiceRef::new(self.clone(), self.model()?))
	}
}
