use std::sync::Arc;

use hivemind_model::{ContainerError, ServiceObject};
use parking_lot::Mutex;

use super::{ServiceModel, construct_core};
use crate::service_point::ServicePoint;

/// Constructs at lookup and hands out the raw object.
///
/// No deferral and no post-shutdown protection: handles obtained before
/// shutdown keep working. Construction still happens at most once, under the
/// cache lock; a failed construction leaves the cache empty so the next
/// lookup retries.
pub struct PrimitiveModel {
	point: Arc<ServicePoint>,
	cache: Mutex<Option<ServiceObject>>,
}

impl PrimitiveModel {
	pub(crate) fn new(point: Arc<ServicePoint>) -> Self {
		Self {
			point,
			cache: Mutex::new(None),
		}
	}
}

impl ServiceModel for PrimitiveModel {
	fn constructs_at_lookup(&self) -> bool {
		true
	}

	fn get(&self) -> Result<ServiceObject, ContainerError> {
		let mut cache = self.cache.lock();
		if let Some(object) = cache.as_ref() {
			return Ok(object.clone());
		}
		let object = construct_core(&self.point)?.object();
		*cache = Some(object.clone());
		Ok(object)
	}
}
