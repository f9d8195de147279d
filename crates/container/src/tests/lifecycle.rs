use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use hivemind_model::{
	ConstructedService, ConstructionContext, ContainerError, DeferredService,
	ImplementationDefinition, ModuleDefinition, RegistryShutdownListener, ServiceConstructor,
	ServiceObject, ServicePointDefinition,
};

use super::fixtures::{
	Greeter, GreeterHandle, Plain, build, counting_constructor, greeter_constructor,
	greeter_interface, greeter_module, loc,
};

#[test]
fn singletons_construct_once_and_share_the_instance() {
	let counter = Arc::new(AtomicUsize::new(0));
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"singleton",
		counting_constructor("one", counter.clone()),
	)]);

	let first = registry.service_object("hive.Greeter").unwrap();
	let second = registry.service_object("hive.Greeter").unwrap();
	assert!(first.same_instance(&second));
	assert_eq!(counter.load(Ordering::SeqCst), 1);
}

#[test]
fn failed_construction_is_retried_on_the_next_access() {
	let attempts = Arc::new(AtomicUsize::new(0));
	let fail_first = Arc::new(AtomicBool::new(true));
	let constructor: Arc<dyn ServiceConstructor> = {
		let attempts = attempts.clone();
		Arc::new(
			move |_: &dyn ConstructionContext| -> Result<ConstructedService, ContainerError> {
				attempts.fetch_add(1, Ordering::SeqCst);
				if fail_first.swap(false, Ordering::SeqCst) {
					return Err(ContainerError::failure("flaky dependency"));
				}
				let handle: GreeterHandle = Arc::new(Plain("recovered"));
				Ok(ConstructedService::new(ServiceObject::new(handle)))
			},
		)
	};
	let registry = build([greeter_module("hive", "Greeter", "singleton", constructor)]);

	let err = registry.service::<GreeterHandle>("hive.Greeter").unwrap_err();
	assert!(matches!(err, ContainerError::UnableToConstructService { .. }));

	let greeter: GreeterHandle = registry.service("hive.Greeter").unwrap();
	assert_eq!(greeter.greet(), "recovered");
	assert_eq!(attempts.load(Ordering::SeqCst), 2);
}

#[test]
fn shutdown_stops_facade_lookups() {
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"singleton",
		greeter_constructor("hi"),
	)]);
	registry.shutdown();

	assert!(matches!(
		registry.service::<GreeterHandle>("hive.Greeter"),
		Err(ContainerError::RegistryShutdown)
	));
	assert!(matches!(
		registry.service_object("hive.Greeter"),
		Err(ContainerError::RegistryShutdown)
	));
	assert!(matches!(
		registry.configuration("hive.Anything"),
		Err(ContainerError::RegistryShutdown)
	));
}

#[test]
fn singleton_refs_fail_after_shutdown() {
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"singleton",
		greeter_constructor("hi"),
	)]);
	let service_ref = registry.service_ref::<GreeterHandle>("hive.Greeter").unwrap();
	assert_eq!(service_ref.get().unwrap().greet(), "hi");

	registry.shutdown();
	assert!(matches!(service_ref.get(), Err(ContainerError::RegistryShutdown)));
}

#[test]
fn primitive_refs_keep_working_after_shutdown() {
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"primitive",
		greeter_constructor("raw"),
	)]);
	let service_ref = registry.service_ref::<GreeterHandle>("hive.Greeter").unwrap();
	assert_eq!(service_ref.get().unwrap().greet(), "raw");

	registry.shutdown();
	assert_eq!(service_ref.get().unwrap().greet(), "raw");
}

struct CountingListener {
	fired: AtomicUsize,
}

impl RegistryShutdownListener for CountingListener {
	fn registry_did_shutdown(&self) {
		self.fired.fetch_add(1, Ordering::SeqCst);
	}
}

#[test]
fn attached_shutdown_listeners_fire_exactly_once() {
	let listener = Arc::new(CountingListener {
		fired: AtomicUsize::new(0),
	});
	let constructor: Arc<dyn ServiceConstructor> = {
		let listener = listener.clone();
		Arc::new(
			move |_: &dyn ConstructionContext| -> Result<ConstructedService, ContainerError> {
				let handle: GreeterHandle = Arc::new(Plain("hi"));
				Ok(ConstructedService::new(ServiceObject::new(handle))
					.with_shutdown_listener(listener.clone()))
			},
		)
	};
	let registry = build([greeter_module("hive", "Greeter", "singleton", constructor)]);

	let _: GreeterHandle = registry.service("hive.Greeter").unwrap();
	registry.shutdown();
	registry.shutdown();
	assert_eq!(listener.fired.load(Ordering::SeqCst), 1);
}

/// Greets through a handle resolved only when first used, so its target can
/// depend back on this service's point.
struct Deferred {
	inner: Arc<dyn DeferredService>,
}

impl std::fmt::Debug for Deferred {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Deferred").finish_non_exhaustive()
	}
}

impl Greeter for Deferred {
	fn greet(&self) -> String {
		let inner: GreeterHandle = self
			.inner
			.get()
			.ok()
			.and_then(|object| object.downcast::<GreeterHandle>())
			.unwrap_or_else(|| Arc::new(Plain("unavailable")));
		format!("deferred({})", inner.greet())
	}
}

#[test]
fn deferred_refs_break_dependency_cycles() {
	let mut module = ModuleDefinition::new("hive", loc());

	// Front defers to Back; Back depends on Front directly. Without the
	// deferral this construction graph would deadlock.
	module
		.add_service_point(ServicePointDefinition::new("Front", greeter_interface(), loc()))
		.unwrap();
	let front: Arc<dyn ServiceConstructor> = Arc::new(
		|ctx: &dyn ConstructionContext| -> Result<ConstructedService, ContainerError> {
			let handle: GreeterHandle = Arc::new(Deferred {
				inner: ctx.deferred_service("Back")?,
			});
			Ok(ConstructedService::new(ServiceObject::new(handle)))
		},
	);
	module.add_implementation("Front", ImplementationDefinition::new("singleton", front, loc()));

	module
		.add_service_point(ServicePointDefinition::new("Back", greeter_interface(), loc()))
		.unwrap();
	let back: Arc<dyn ServiceConstructor> = Arc::new(
		|ctx: &dyn ConstructionContext| -> Result<ConstructedService, ContainerError> {
			// Front is already cached by the time anyone greets through Back.
			let _: ServiceObject = ctx.service("Front")?;
			let handle: GreeterHandle = Arc::new(Plain("back"));
			Ok(ConstructedService::new(ServiceObject::new(handle)))
		},
	);
	module.add_implementation("Back", ImplementationDefinition::new("singleton", back, loc()));

	let registry = build([module]);
	let front: GreeterHandle = registry.service("hive.Front").unwrap();
	assert_eq!(front.greet(), "deferred(back)");
}

#[test]
fn service_refs_render_their_point_and_interface() {
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"singleton",
		greeter_constructor("hi"),
	)]);
	let service_ref = registry.service_ref::<GreeterHandle>("hive.Greeter").unwrap();
	let rendered = service_ref.to_string();
	assert!(rendered.starts_with("<ServiceRef for hive.Greeter("), "{rendered}");
	assert!(rendered.ends_with(")>"), "{rendered}");
}
