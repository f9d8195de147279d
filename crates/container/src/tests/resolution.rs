use std::sync::Arc;

use hivemind_model::{
	ConstructedService, ConstructionContext, ContainerError, ImplementationDefinition,
	ModuleDefinition, RegistryDefinition, ServiceConstructor, ServiceObject,
	ServicePointDefinition, Visibility,
};

use super::fixtures::{
	GreeterHandle, Prefixed, build, greeter_constructor, greeter_interface, greeter_module, loc,
};
use crate::{LoggingErrorHandler, RegistryBuilder};

#[test]
fn typed_lookup_returns_the_handle() {
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"singleton",
		greeter_constructor("hello"),
	)]);
	let greeter: GreeterHandle = registry.service("hive.Greeter").unwrap();
	assert_eq!(greeter.greet(), "hello");
}

#[test]
fn lookup_of_unknown_point_fails() {
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"singleton",
		greeter_constructor("hello"),
	)]);
	let err = registry.service::<GreeterHandle>("hive.Missing").unwrap_err();
	assert!(matches!(err, ContainerError::UnknownServicePoint { .. }));
}

#[test]
fn foreign_default_implementation_wins() {
	let base = greeter_module("hive", "Greeter", "singleton", greeter_constructor("base"));

	let mut other = ModuleDefinition::new("other", loc());
	other.add_implementation(
		"hive.Greeter",
		ImplementationDefinition::new("singleton", greeter_constructor("override"), loc())
			.as_default(),
	);

	let registry = build([base, other]);
	let greeter: GreeterHandle = registry.service("hive.Greeter").unwrap();
	assert_eq!(greeter.greet(), "override");
}

#[test]
fn first_implementation_wins_without_a_default() {
	let base = greeter_module("hive", "Greeter", "singleton", greeter_constructor("first"));

	let mut other = ModuleDefinition::new("other", loc());
	other.add_implementation(
		"hive.Greeter",
		ImplementationDefinition::new("singleton", greeter_constructor("second"), loc()),
	);

	let registry = build([base, other]);
	let greeter: GreeterHandle = registry.service("hive.Greeter").unwrap();
	assert_eq!(greeter.greet(), "first");
}

#[test]
fn unknown_module_target_aborts_a_strict_build() {
	let mut module = greeter_module("hive", "Greeter", "singleton", greeter_constructor("hi"));
	module.add_implementation(
		"nowhere.Point",
		ImplementationDefinition::new("singleton", greeter_constructor("lost"), loc()),
	);

	let mut definition = RegistryDefinition::new();
	definition.add_module(module).unwrap();
	let err = RegistryBuilder::new().build(definition).unwrap_err();
	assert!(matches!(err, ContainerError::UnknownModule { .. }));
}

#[test]
fn unknown_point_target_aborts_a_strict_build() {
	let mut module = greeter_module("hive", "Greeter", "singleton", greeter_constructor("hi"));
	module.add_implementation(
		"hive.Missing",
		ImplementationDefinition::new("singleton", greeter_constructor("lost"), loc()),
	);

	let mut definition = RegistryDefinition::new();
	definition.add_module(module).unwrap();
	let err = RegistryBuilder::new().build(definition).unwrap_err();
	assert!(matches!(err, ContainerError::UnknownServicePoint { .. }));
}

#[test]
fn lenient_handler_drops_the_bad_extension_and_continues() {
	let mut module = greeter_module("hive", "Greeter", "singleton", greeter_constructor("hi"));
	module.add_implementation(
		"nowhere.Point",
		ImplementationDefinition::new("singleton", greeter_constructor("lost"), loc()),
	);

	let mut definition = RegistryDefinition::new();
	definition.add_module(module).unwrap();
	let registry = RegistryBuilder::new()
		.with_error_handler(Arc::new(LoggingErrorHandler))
		.build(definition)
		.unwrap();

	let greeter: GreeterHandle = registry.service("hive.Greeter").unwrap();
	assert_eq!(greeter.greet(), "hi");
}

fn private_point_modules() -> Vec<ModuleDefinition> {
	let mut owner = ModuleDefinition::new("hive", loc());
	owner
		.add_service_point(
			ServicePointDefinition::new("Secret", greeter_interface(), loc())
				.with_visibility(Visibility::Private),
		)
		.unwrap();
	owner.add_implementation(
		"Secret",
		ImplementationDefinition::new("singleton", greeter_constructor("secret"), loc()),
	);

	// A public point in the same module whose constructor pulls the private
	// one through its construction context.
	owner
		.add_service_point(ServicePointDefinition::new("Front", greeter_interface(), loc()))
		.unwrap();
	let front: Arc<dyn ServiceConstructor> = Arc::new(
		|ctx: &dyn ConstructionContext| -> Result<ConstructedService, ContainerError> {
			let inner: GreeterHandle = ctx
				.service("Secret")?
				.downcast()
				.ok_or_else(|| ContainerError::failure("unexpected payload"))?;
			let handle: GreeterHandle = Arc::new(Prefixed { tag: "front", inner });
			Ok(ConstructedService::new(ServiceObject::new(handle)))
		},
	);
	owner.add_implementation("Front", ImplementationDefinition::new("singleton", front, loc()));

	let mut outsider = ModuleDefinition::new("other", loc());
	outsider.add_implementation(
		"hive.Secret",
		ImplementationDefinition::new("singleton", greeter_constructor("stolen"), loc()).as_default(),
	);

	vec![owner, outsider]
}

#[test]
fn private_points_reject_foreign_extensions_under_the_strict_handler() {
	let mut definition = RegistryDefinition::new();
	for module in private_point_modules() {
		definition.add_module(module).unwrap();
	}
	let err = RegistryBuilder::new().build(definition).unwrap_err();
	assert!(matches!(err, ContainerError::NotVisible { .. }));
}

#[test]
fn private_points_stay_reachable_from_their_own_module() {
	let mut definition = RegistryDefinition::new();
	for module in private_point_modules() {
		definition.add_module(module).unwrap();
	}
	let registry = RegistryBuilder::new()
		.with_error_handler(Arc::new(LoggingErrorHandler))
		.build(definition)
		.unwrap();

	// The foreign default was dropped; the owning module's constructor still
	// sees its private point.
	let front: GreeterHandle = registry.service("hive.Front").unwrap();
	assert_eq!(front.greet(), "front(secret)");

	let err = registry.service::<GreeterHandle>("hive.Secret").unwrap_err();
	assert!(matches!(err, ContainerError::NotVisible { .. }));
}

#[test]
fn construction_checks_the_declared_interface() {
	let liar: Arc<dyn ServiceConstructor> = Arc::new(
		|_: &dyn ConstructionContext| -> Result<ConstructedService, ContainerError> {
			Ok(ConstructedService::new(ServiceObject::new(String::from("not a greeter"))))
		},
	);
	let registry = build([greeter_module("hive", "Greeter", "singleton", liar)]);
	let err = registry.service::<GreeterHandle>("hive.Greeter").unwrap_err();
	assert!(matches!(err, ContainerError::WrongInterface { .. }));
}

#[test]
fn unknown_service_model_fails_at_first_access() {
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"exotic",
		greeter_constructor("hi"),
	)]);
	let err = registry.service::<GreeterHandle>("hive.Greeter").unwrap_err();
	assert!(matches!(err, ContainerError::UnknownServiceModel { .. }));
}

#[test]
fn typed_accessor_must_match_the_declared_interface() {
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"singleton",
		greeter_constructor("hi"),
	)]);
	let err = registry.service::<Arc<str>>("hive.Greeter").unwrap_err();
	assert!(matches!(err, ContainerError::InterfaceMismatch { .. }));
}

#[test]
fn point_without_implementations_cannot_construct() {
	let mut module = ModuleDefinition::new("hive", loc());
	module
		.add_service_point(ServicePointDefinition::new("Greeter", greeter_interface(), loc()))
		.unwrap();
	let registry = build([module]);
	let err = registry.service::<GreeterHandle>("hive.Greeter").unwrap_err();
	assert!(matches!(err, ContainerError::NoImplementation { .. }));
}

#[test]
fn lookup_by_interface_requires_exactly_one_point() {
	let registry = build([greeter_module(
		"hive",
		"Greeter",
		"singleton",
		greeter_constructor("only"),
	)]);
	let greeter: GreeterHandle = registry.service_by_interface().unwrap();
	assert_eq!(greeter.greet(), "only");

	let err = registry.service_by_interface::<Arc<str>>().unwrap_err();
	assert!(matches!(err, ContainerError::NoServiceForInterface { .. }));

	let registry = build([
		greeter_module("hive", "Greeter", "singleton", greeter_constructor("a")),
		greeter_module("other", "Greeter", "singleton", greeter_constructor("b")),
	]);
	let err = registry.service_by_interface::<GreeterHandle>().unwrap_err();
	assert!(matches!(err, ContainerError::MultipleServicesForInterface { .. }));
}
