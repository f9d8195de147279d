//! The HiveMind services and configuration microkernel.
//!
//! A [`RegistryDefinition`] (built elsewhere, see `hivemind-model`) goes in;
//! a [`Registry`] comes out. In between, [`RegistryBuilder`] resolves every
//! contributed extension against its target point, after which services are
//! constructed lazily under one of four lifecycle models (`primitive`,
//! `singleton`, `threaded`, `pooled`) and configuration points merge their
//! contributions on first use.
//!
//! ```ignore
//! let registry = RegistryBuilder::new().build(definition)?;
//! let translator: Arc<dyn Translator> = registry.service("app.Translator")?;
//! ```

mod builder;
mod configuration;
mod handler;
mod models;
mod module;
mod registry;
mod service_point;
mod service_ref;
mod shutdown;
mod threads;

#[cfg(test)]
mod tests;

pub use builder::RegistryBuilder;
pub use configuration::ConfigurationPoint;
pub use handler::{ErrorHandler, LoggingErrorHandler, StrictErrorHandler};
pub use models::{
	ModelCreator, POOLED_MODEL, PRIMITIVE_MODEL, PooledModel, PrimitiveModel, SINGLETON_MODEL,
	ServiceModel, ServiceModelFactory, SingletonModel, THREADED_MODEL, ThreadedModel,
};
pub use module::Module;
pub use registry::Registry;
pub use service_point::ServicePoint;
pub use service_ref::ServiceRef;
pub use shutdown::ShutdownCoordinator;
pub use threads::{ThreadCleanupListener, ThreadEventNotifier};

pub use hivemind_model::{
	ConfigurationPointDefinition, ConstructedService, ConstructionContext, ContainerError,
	ContributionConstructor, ContributionDefinition, DeferredService, Discardable,
	ImplementationDefinition, InterceptorConstructor, InterceptorDefinition, Location,
	ModuleDefinition, Occurrences, ParserDefinition, PoolManageable, RegistryDefinition,
	RegistryShutdownListener, ServiceConstructor, ServiceInterface, ServiceObject,
	ServicePointDefinition, Visibility,
};
