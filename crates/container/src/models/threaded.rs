use std::sync::Arc;

use hivemind_model::{ContainerError, ServiceObject};

use super::{ServiceModel, bind, bound_object, construct_core, next_model_id, unbind};
use crate::service_point::ServicePoint;
use crate::threads::ThreadCleanupListener;

/// One instance per thread, constructed on the thread's first access and
/// discarded when the thread's unit of work ends.
///
/// Instances live in a `thread_local!` map keyed by model id; the model
/// registers itself as a thread-cleanup listener at creation.
pub struct ThreadedModel {
	point: Arc<ServicePoint>,
	model_id: u64,
}

impl ThreadedModel {
	pub(crate) fn new(point: Arc<ServicePoint>) -> Self {
		Self {
			point,
			model_id: next_model_id(),
		}
	}
}

impl ServiceModel for ThreadedModel {
	fn get(&self) -> Result<ServiceObject, ContainerError> {
		if let Some(object) = bound_object(self.model_id) {
			return Ok(object);
		}
		let constructed = construct_core(&self.point)?;
		let object = constructed.object();
		bind(self.model_id, constructed);
		Ok(object)
	}
}

impl ThreadCleanupListener for ThreadedModel {
	fn thread_did_cleanup(&self) {
		if let Some(constructed) = unbind(self.model_id) {
			if let Some(hook) = constructed.discardable() {
				hook.thread_did_discard_service();
			}
			tracing::debug!(point = %self.point.id(), "thread-bound service discarded");
		}
	}
}
