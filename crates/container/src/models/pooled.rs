use std::sync::Arc;

use hivemind_model::{ConstructedService, ContainerError, ServiceObject};
use parking_lot::Mutex;

use super::{ServiceModel, bind, bound_object, construct_core, next_model_id, unbind};
use crate::service_point::ServicePoint;
use crate::threads::ThreadCleanupListener;

/// One instance per thread, drawn from a shared pool.
///
/// A thread's first access checks an instance out of the free list (or
/// constructs a new one) and calls `activate_service`; thread cleanup calls
/// `passivate_service` and returns the instance for reuse. Between those
/// boundaries the instance is bound to the thread like a threaded service.
pub struct PooledModel {
	point: Arc<ServicePoint>,
	model_id: u64,
	free: Mutex<Vec<ConstructedService>>,
}

impl PooledModel {
	pub(crate) fn new(point: Arc<ServicePoint>) -> Self {
		Self {
			point,
			model_id: next_model_id(),
			free: Mutex::new(Vec::new()),
		}
	}
}

impl ServiceModel for PooledModel {
	fn get(&self) -> Result<ServiceObject, ContainerError> {
		if let Some(object) = bound_object(self.model_id) {
			return Ok(object);
		}
		let pooled = self.free.lock().pop();
		let constructed = match pooled {
			Some(constructed) => constructed,
			None => construct_core(&self.point)?,
		};
		if let Some(hook) = constructed.manageable() {
			hook.activate_service();
		}
		let object = constructed.object();
		bind(self.model_id, constructed);
		Ok(object)
	}
}

impl ThreadCleanupListener for PooledModel {
	fn thread_did_cleanup(&self) {
		if let Some(constructed) = unbind(self.model_id) {
			if let Some(hook) = constructed.manageable() {
				hook.passivate_service();
			}
			tracing::debug!(point = %self.point.id(), "pooled service returned");
			self.free.lock().push(constructed);
		}
	}
}
