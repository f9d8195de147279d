use std::cell::RefCell;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use hivemind_model::{ConstructedService, ContainerError, ServiceObject};
use rustc_hash::FxHashMap;

use crate::service_point::ServicePoint;

mod pooled;
mod primitive;
mod singleton;
mod threaded;

pub use pooled::PooledModel;
pub use primitive::PrimitiveModel;
pub use singleton::SingletonModel;
pub use threaded::ThreadedModel;

pub const PRIMITIVE_MODEL: &str = "primitive";
pub const SINGLETON_MODEL: &str = "singleton";
pub const THREADED_MODEL: &str = "threaded";
pub const POOLED_MODEL: &str = "pooled";

/// Owns the instance lifecycle of one service point.
pub trait ServiceModel: Send + Sync {
	/// True when a lookup itself constructs the service, leaving nothing
	/// deferred.
	fn constructs_at_lookup(&self) -> bool {
		false
	}

	/// Resolves the instance for the current caller, constructing if this
	/// model calls for it.
	fn get(&self) -> Result<ServiceObject, ContainerError>;
}

pub type ModelCreator =
	Arc<dyn Fn(Arc<ServicePoint>) -> Result<Arc<dyn ServiceModel>, ContainerError> + Send + Sync>;

/// Table of model creators, keyed by the model name carried on
/// implementation definitions.
///
/// The four standard models are registered out of the box; applications may
/// register additional ones before the registry is built.
pub struct ServiceModelFactory {
	creators: FxHashMap<String, ModelCreator>,
}

impl ServiceModelFactory {
	pub fn standard() -> Self {
		let mut factory = Self {
			creators: FxHashMap::default(),
		};
		factory.register(PRIMITIVE_MODEL, Arc::new(primitive_creator));
		factory.register(SINGLETON_MODEL, Arc::new(singleton_creator));
		factory.register(THREADED_MODEL, Arc::new(threaded_creator));
		factory.register(POOLED_MODEL, Arc::new(pooled_creator));
		factory
	}

	pub fn register(&mut self, name: impl Into<String>, creator: ModelCreator) {
		self.creators.insert(name.into(), creator);
	}

	pub(crate) fn create(
		&self,
		name: &str,
		point: Arc<ServicePoint>,
	) -> Result<Arc<dyn ServiceModel>, ContainerError> {
		match self.creators.get(name) {
			Some(creator) => creator(point),
			None => Err(ContainerError::UnknownServiceModel {
				point: point.id().to_owned(),
				model: name.to_owned(),
			}),
		}
	}
}

impl Default for ServiceModelFactory {
	fn default() -> Self {
		Self::standard()
	}
}

fn primitive_creator(point: Arc<ServicePoint>) -> Result<Arc<dyn ServiceModel>, ContainerError> {
	Ok(Arc::new(PrimitiveModel::new(point)))
}

fn singleton_creator(point: Arc<ServicePoint>) -> Result<Arc<dyn ServiceModel>, ContainerError> {
	Ok(Arc::new(SingletonModel::new(point)))
}

fn threaded_creator(point: Arc<ServicePoint>) -> Result<Arc<dyn ServiceModel>, ContainerError> {
	let runtime = point.runtime()?;
	let model = Arc::new(ThreadedModel::new(point));
	runtime.threads().add_listener(model.clone());
	Ok(model)
}

fn pooled_creator(point: Arc<ServicePoint>) -> Result<Arc<dyn ServiceModel>, ContainerError> {
	let runtime = point.runtime()?;
	let model = Arc::new(PooledModel::new(point));
	runtime.threads().add_listener(model.clone());
	Ok(model)
}

/// Builds one service core for `point`.
///
/// The construction context is the *defining* module of the implementation
/// (and of each interceptor), not the module that triggered construction.
/// The declared interface is re-checked after the raw construction and after
/// every interceptor wrap. An attached shutdown listener is registered as a
/// side effect.
pub(crate) fn construct_core(
	point: &Arc<ServicePoint>,
) -> Result<ConstructedService, ContainerError> {
	let runtime = point.runtime()?;
	let implementation =
		point
			.default_implementation()
			.ok_or_else(|| ContainerError::NoImplementation {
				point: point.id().to_owned(),
			})?;

	let module = runtime.module(implementation.contributing_module(), point.location())?;
	let constructed = implementation
		.constructor()
		.construct(&*module)
		.map_err(|source| construction_failure(point, source))?;

	let mut core = constructed.object();
	check_interface(point, &core)?;

	// Execution order has the outermost interceptor first, so wrapping runs
	// back to front.
	for interceptor in point.interceptors().iter().rev() {
		let module = runtime.module(interceptor.contributing_module(), interceptor.location())?;
		core = interceptor
			.constructor()
			.intercept(&*module, core)
			.map_err(|source| construction_failure(point, source))?;
		check_interface(point, &core)?;
	}

	if let Some(listener) = constructed.shutdown_listener() {
		runtime.shutdown().add_listener(listener);
	}
	tracing::debug!(point = %point.id(), "service core constructed");

	let mut result = ConstructedService::new(core);
	if let Some(hook) = constructed.manageable() {
		result = result.with_manageable(hook);
	}
	if let Some(hook) = constructed.discardable() {
		result = result.with_discardable(hook);
	}
	Ok(result)
}

fn construction_failure(point: &ServicePoint, source: ContainerError) -> ContainerError {
	ContainerError::UnableToConstructService {
		point: point.id().to_owned(),
		location: point.location().clone(),
		source: Box::new(source),
	}
}

fn check_interface(point: &ServicePoint, object: &ServiceObject) -> Result<(), ContainerError> {
	if point.interface().matches(object) {
		Ok(())
	} else {
		Err(ContainerError::WrongInterface {
			point: point.id().to_owned(),
			expected: point.interface().name(),
		})
	}
}

static NEXT_MODEL_ID: AtomicU64 = AtomicU64::new(0);

/// Allocates the key a thread-bound model uses in the per-thread instance
/// map. Globally unique across all registries in the process.
pub(crate) fn next_model_id() -> u64 {
	NEXT_MODEL_ID.fetch_add(1, Ordering::Relaxed)
}

thread_local! {
	static THREAD_BOUND: RefCell<FxHashMap<u64, ConstructedService>> =
		RefCell::new(FxHashMap::default());
}

pub(crate) fn bound_object(model_id: u64) -> Option<ServiceObject> {
	THREAD_BOUND.with_borrow(|bound| bound.get(&model_id).map(ConstructedService::object))
}

pub(crate) fn bind(model_id: u64, constructed: ConstructedService) {
	THREAD_BOUND.with_borrow_mut(|bound| {
		bound.insert(model_id, constructed);
	});
}

pub(crate) fn unbind(model_id: u64) -> Option<ConstructedService> {
	THREAD_BOUND.with_borrow_mut(|bound| bound.remove(&model_id))
}
