use std::any::{Any, TypeId};
use std::fmt;
use std::sync::Arc;

/// Type-erased, cloneable handle to a constructed service or a configuration
/// item.
///
/// The payload is stored by value behind an `Arc`, so the conventional shape
/// for a service is an `Arc<dyn ServiceTrait>` payload: cloning the
/// [`ServiceObject`] or [`downcast`](Self::downcast)ing it out hands every
/// caller the same underlying instance.
#[derive(Clone)]
pub struct ServiceObject {
	value: Arc<dyn Any + Send + Sync>,
}

impl ServiceObject {
	pub fn new<H: Any + Send + Sync>(value: H) -> Self {
		Self {
			value: Arc::new(value),
		}
	}

	/// Clones the payload out as `H`, if `H` is the stored type.
	pub fn downcast<H: Any + Clone>(&self) -> Option<H> {
		self.value.downcast_ref::<H>().cloned()
	}

	pub fn is<H: Any>(&self) -> bool {
		self.value_type_id() == TypeId::of::<H>()
	}

	/// Type id of the payload (not of the `Arc` wrapper).
	pub fn value_type_id(&self) -> TypeId {
		(&*self.value).type_id()
	}

	/// True when both handles share one underlying allocation.
	pub fn same_instance(&self, other: &ServiceObject) -> bool {
		Arc::ptr_eq(&self.value, &other.value)
	}
}

impl fmt::Debug for ServiceObject {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("ServiceObject").finish_non_exhaustive()
	}
}

/// The declared interface of a service point: the handle type callers
/// downcast the [`ServiceObject`] to, captured as a `TypeId` plus a name for
/// diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ServiceInterface {
	id: TypeId,
	name: &'static str,
}

impl ServiceInterface {
	/// Captures `H` as the declared interface, e.g.
	/// `ServiceInterface::of::<Arc<dyn Translator>>()`.
	pub fn of<H: Any>() -> Self {
		Self {
			id: TypeId::of::<H>(),
			name: std::any::type_name::<H>(),
		}
	}

	pub fn name(&self) -> &'static str {
		self.name
	}

	pub fn type_id(&self) -> TypeId {
		self.id
	}

	pub fn matches(&self, object: &ServiceObject) -> bool {
		object.value_type_id() == self.id
	}
}

impl fmt::Display for ServiceInterface {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.name)
	}
}

/// Lifecycle hooks for cores held by the pooled service model.
pub trait PoolManageable: Send + Sync {
	/// Called when the core is bound to a thread (pool checkout).
	fn activate_service(&self) {}

	/// Called when the core is returned to the pool (thread cleanup).
	fn passivate_service(&self) {}
}

/// Hook for cores held by the threaded service model; called when the owning
/// thread's unit of work ends and the instance is dropped.
pub trait Discardable: Send + Sync {
	fn thread_did_discard_service(&self) {}
}

/// Notified exactly once when the owning registry shuts down.
pub trait RegistryShutdownListener: Send + Sync {
	fn registry_did_shutdown(&self);
}

/// What a [`ServiceConstructor`](crate::ServiceConstructor) hands back: the
/// core object plus any lifecycle capabilities it wants the container to
/// drive.
///
/// Rust has no `instanceof` on type-erased payloads, so capabilities are
/// attached explicitly rather than discovered:
///
/// ```ignore
/// let core = Arc::new(MyService::new());
/// ConstructedService::new(ServiceObject::new(core.clone() as Arc<dyn Translator>))
///     .with_shutdown_listener(core)
/// ```
pub struct ConstructedService {
	object: ServiceObject,
	manageable: Option<Arc<dyn PoolManageable>>,
	discardable: Option<Arc<dyn Discardable>>,
	shutdown_listener: Option<Arc<dyn RegistryShutdownListener>>,
}

impl ConstructedService {
	pub fn new(object: ServiceObject) -> Self {
		Self {
			object,
			manageable: None,
			discardable: None,
			shutdown_listener: None,
		}
	}

	pub fn with_manageable(mut self, hook: Arc<dyn PoolManageable>) -> Self {
		self.manageable = Some(hook);
		self
	}

	pub fn with_discardable(mut self, hook: Arc<dyn Discardable>) -> Self {
		self.discardable = Some(hook);
		self
	}

	pub fn with_shutdown_listener(mut self, listener: Arc<dyn RegistryShutdownListener>) -> Self {
		self.shutdown_listener = Some(listener);
		self
	}

	pub fn object(&self) -> ServiceObject {
		self.object.clone()
	}

	pub fn manageable(&self) -> Option<Arc<dyn PoolManageable>> {
		self.manageable.clone()
	}

	pub fn discardable(&self) -> Option<Arc<dyn Discardable>> {
		self.discardable.clone()
	}

	pub fn shutdown_listener(&self) -> Option<Arc<dyn RegistryShutdownListener>> {
		self.shutdown_listener.clone()
	}
}
