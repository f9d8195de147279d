use std::sync::{Arc, Weak};

use hivemind_model::{
	ConstructionContext, ContainerError, DeferredService, Location, ServiceObject,
};

use crate::models::ServiceModel;
use crate::registry::RegistryRuntime;

/// Runtime face of one module: the construction context handed to every
/// constructor the module contributed.
///
/// Lookups made through it carry the module's identity: unqualified ids
/// resolve within the module, and the module's own private points are
/// visible.
pub struct Module {
	id: String,
	location: Location,
	runtime: Weak<RegistryRuntime>,
}

impl Module {
	pub(crate) fn new(id: String, location: Location, runtime: Weak<RegistryRuntime>) -> Self {
		Self {
			id,
			location,
			runtime,
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	fn runtime(&self) -> Result<Arc<RegistryRuntime>, ContainerError> {
		self.runtime.upgrade().ok_or(ContainerError::RegistryShutdown)
	}

	fn qualify(&self, id: &str) -> String {
		if id.contains('.') {
			id.to_owned()
		} else {
			format!("{}.{id}", self.id)
		}
	}

	fn model_for(&self, id: &str) -> Result<Arc<dyn ServiceModel>, ContainerError> {
		let runtime = self.runtime()?;
		let qualified = self.qualify(id);
		let point = runtime.service_point(&qualified).ok_or_else(|| {
			ContainerError::UnknownServicePoint {
				id: qualified.clone(),
				location: self.location.clone(),
			}
		})?;
		if !point.visible_to(&self.id) {
			return Err(ContainerError::NotVisible {
				point: qualified,
				module: self.id.clone(),
				location: point.location().clone(),
			});
		}
		point.model()
	}
}

impl ConstructionContext for Module {
	fn module_id(&self) -> &str {
		&self.id
	}

	fn service(&self, id: &str) -> Result<ServiceObject, ContainerError> {
		self.model_for(id)?.get()
	}

	fn deferred_service(&self, id: &str) -> Result<Arc<dyn DeferredService>, ContainerError> {
		let model = self.model_for(id)?;
		Ok(Arc::new(DeferredHandle { model }))
	}

	fn configuration(&self, id: &str) -> Result<Arc<Vec<ServiceObject>>, ContainerError> {
		let runtime = self.runtime()?;
		let qualified = self.qualify(id);
		let point = runtime.configuration_point(&qualified).ok_or_else(|| {
			ContainerError::UnknownConfigurationPoint {
				id: qualified.clone(),
				location: self.location.clone(),
			}
		})?;
		if !point.visible_to(&self.id) {
			return Err(ContainerError::NotVisible {
				point: qualified,
				module: self.id.clone(),
				location: point.location().clone(),
			});
		}
		point.configuration()
	}
}

/// Untyped deferral handle: resolution has happened, construction has not.
struct DeferredHandle {
	model: Arc<dyn ServiceModel>,
}

impl DeferredService for DeferredHandle {
	fn get(&self) -> Result<ServiceObject, ContainerError> {
		self.model.get()
	}
}
