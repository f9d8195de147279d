use std::sync::Arc;

use hivemind_model::{ContainerError, ServiceObject};
use parking_lot::Mutex;

use super::{ServiceModel, construct_core};
use crate::service_point::ServicePoint;

/// One shared instance, constructed on first access.
///
/// The shutdown flag is checked on every access, so deferral handles
/// obtained before shutdown fail afterwards. Concurrent first accesses
/// serialize on the cache lock; exactly one constructs. A failed
/// construction leaves the cache empty so the next access retries.
pub struct SingletonModel {
	point: Arc<ServicePoint>,
	cache: Mutex<Option<ServiceObject>>,
}

impl SingletonModel {
	pub(crate) fn new(point: Arc<ServicePoint>) -> Self {
		Self {
			point,
			cache: Mutex::new(None),
		}
	}
}

impl ServiceModel for SingletonModel {
	fn get(&self) -> Result<ServiceObject, ContainerError> {
		let runtime = self.point.runtime()?;
		if runtime.shutdown().is_shutdown() {
			return Err(ContainerError::RegistryShutdown);
		}
		let mut cache = self.cache.lock();
		if let Some(object) = cache.as_ref() {
			return Ok(object.clone());
		}
		let object = construct_core(&self.point)?.object();
		*cache = Some(object.clone());
		Ok(object)
	}
}
