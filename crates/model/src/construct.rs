use std::sync::Arc;

use crate::error::ContainerError;
use crate::service::{ConstructedService, ServiceObject};

/// What a constructor sees while it runs: the lookups of its *defining*
/// module (not of whichever module triggered construction), with that
/// module's visibility.
pub trait ConstructionContext: Send + Sync {
	/// Id of the module the running constructor is defined in.
	fn module_id(&self) -> &str;

	/// Resolves and constructs a service visible to the defining module.
	/// Unqualified ids are relative to the defining module.
	fn service(&self, id: &str) -> Result<ServiceObject, ContainerError>;

	/// Resolves a service without constructing it, so constructors can hold
	/// references into dependency cycles.
	fn deferred_service(&self, id: &str) -> Result<Arc<dyn DeferredService>, ContainerError>;

	/// Assembled configuration visible to the defining module.
	fn configuration(&self, id: &str) -> Result<Arc<Vec<ServiceObject>>, ContainerError>;
}

/// Lazy handle to a resolved-but-not-yet-constructed service.
pub trait DeferredService: Send + Sync {
	fn get(&self) -> Result<ServiceObject, ContainerError>;
}

/// Builds the core implementation of a service point.
pub trait ServiceConstructor: Send + Sync {
	fn construct(&self, ctx: &dyn ConstructionContext)
	-> Result<ConstructedService, ContainerError>;
}

impl<F> ServiceConstructor for F
where
	F: Fn(&dyn ConstructionContext) -> Result<ConstructedService, ContainerError> + Send + Sync,
{
	fn construct(
		&self,
		ctx: &dyn ConstructionContext,
	) -> Result<ConstructedService, ContainerError> {
		self(ctx)
	}
}

/// Wraps an already-constructed service in an interceptor.
///
/// The returned object must expose the same declared interface as `inner`;
/// the container re-checks after every wrap.
pub trait InterceptorConstructor: Send + Sync {
	fn intercept(
		&self,
		ctx: &dyn ConstructionContext,
		inner: ServiceObject,
	) -> Result<ServiceObject, ContainerError>;
}

impl<F> InterceptorConstructor for F
where
	F: Fn(&dyn ConstructionContext, ServiceObject) -> Result<ServiceObject, ContainerError>
		+ Send
		+ Sync,
{
	fn intercept(
		&self,
		ctx: &dyn ConstructionContext,
		inner: ServiceObject,
	) -> Result<ServiceObject, ContainerError> {
		self(ctx, inner)
	}
}

/// Produces the items one contribution adds to a configuration point.
pub trait ContributionConstructor: Send + Sync {
	fn contribute(&self, ctx: &dyn ConstructionContext)
	-> Result<Vec<ServiceObject>, ContainerError>;
}

impl<F> ContributionConstructor for F
where
	F: Fn(&dyn ConstructionContext) -> Result<Vec<ServiceObject>, ContainerError> + Send + Sync,
{
	fn contribute(
		&self,
		ctx: &dyn ConstructionContext,
	) -> Result<Vec<ServiceObject>, ContainerError> {
		self(ctx)
	}
}
