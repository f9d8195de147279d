//! Definition model for the HiveMind container.
//!
//! External collaborators (descriptor parsers, annotation processors) build
//! [`RegistryDefinition`] / [`ModuleDefinition`] graphs out of these types and
//! hand them to `hivemind-container`, which resolves the cross-module
//! references and constructs services on demand. Nothing in this crate
//! constructs anything; it only describes what exists and how to build it.

mod construct;
mod error;
mod extensions;
mod location;
mod module;
mod occurrences;
mod points;
mod service;

pub use construct::{
	ConstructionContext, ContributionConstructor, DeferredService, InterceptorConstructor,
	ServiceConstructor,
};
pub use error::ContainerError;
pub use extensions::{
	ContributionDefinition, ImplementationDefinition, InterceptorDefinition, ParserDefinition,
	UnresolvedExtension,
};
pub use location::Location;
pub use module::{ModuleContents, ModuleDefinition, RegistryDefinition};
pub use occurrences::Occurrences;
pub use points::{ConfigurationPointDefinition, ServicePointDefinition, Visibility};
pub use service::{
	ConstructedService, Discardable, PoolManageable, RegistryShutdownListener, ServiceInterface,
	ServiceObject,
};
