use std::any::Any;
use std::fmt;
use std::marker::PhantomData;
use std::sync::Arc;

use hivemind_model::ContainerError;

use crate::models::ServiceModel;
use crate::service_point::ServicePoint;

/// Typed, clonable handle to a service that may not be constructed yet.
///
/// Obtained from [`Registry::service_ref`](crate::Registry::service_ref) or a
/// construction context; [`get`](Self::get) resolves through the point's
/// service model, which for deferred models constructs on first use. Handing
/// one of these to a collaborator defers construction until the collaborator
/// actually calls.
pub struct ServiceRef<H> {
	point: Arc<ServicePoint>,
	model: Arc<dyn ServiceModel>,
	marker: PhantomData<fn() -> H>,
}

impl<H: Any + Clone> ServiceRef<H> {
	pub(crate) fn new(point: Arc<ServicePoint>, model: Arc<dyn ServiceModel>) -> Self {
		Self {
			point,
			model,
			marker: PhantomData,
		}
	}

	/// Resolves the service and clones its handle out.
	pub fn get(&self) -> Result<H, ContainerError> {
		let object = self.model.get()?;
		object
			.downcast::<H>()
			.ok_or_else(|| ContainerError::InterfaceMismatch {
				point: self.point.id().to_owned(),
				declared: self.point.interface().name(),
				requested: std::any::type_name::<H>(),
			})
	}

	pub fn point_id(&self) -> &str {
		self.point.id()
	}
}

impl<H> Clone for ServiceRef<H> {
	fn clone(&self) -> Self {
		Self {
			point: self.point.clone(),
			model: self.model.clone(),
			marker: PhantomData,
		}
	}
}

impl<H> fmt::Display for ServiceRef<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		write!(
			f,
			"<ServiceRef for {}({})>",
			self.point.id(),
			self.point.interface()
		)
	}
}

impl<H> fmt::Debug for ServiceRef<H> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServiceRef")
			.field("point", &self.point.id())
			.field("interface", &self.point.interface().name())
			.finish()
	}
}
