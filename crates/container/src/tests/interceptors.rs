use std::sync::Arc;

use hivemind_model::{
	ConstructionContext, ContainerError, InterceptorConstructor, InterceptorDefinition,
	ServiceObject,
};

use super::fixtures::{GreeterHandle, Prefixed, build, greeter_constructor, greeter_module};

fn tag_interceptor(tag: &'static str) -> Arc<dyn InterceptorConstructor> {
	Arc::new(
		move |_: &dyn ConstructionContext,
		      inner: ServiceObject|
		      -> Result<ServiceObject, ContainerError> {
			let inner: GreeterHandle = inner
				.downcast()
				.ok_or_else(|| ContainerError::failure("unexpected payload"))?;
			let wrapped: GreeterHandle = Arc::new(Prefixed { tag, inner });
			Ok(ServiceObject::new(wrapped))
		},
	)
}

fn interceptor(name: &str, constructor: Arc<dyn InterceptorConstructor>) -> InterceptorDefinition {
	InterceptorDefinition::new(name, constructor, super::fixtures::loc())
}

#[test]
fn contribution_order_is_execution_order_by_default() {
	let mut module = greeter_module("hive", "Greeter", "singleton", greeter_constructor("core"));
	module.add_interceptor("Greeter", interceptor("a", tag_interceptor("a")));
	module.add_interceptor("Greeter", interceptor("b", tag_interceptor("b")));

	let registry = build([module]);
	let greeter: GreeterHandle = registry.service("hive.Greeter").unwrap();
	// "a" executes first, so it is the outermost wrapper.
	assert_eq!(greeter.greet(), "a(b(core))");
}

#[test]
fn precede_and_follow_constraints_reorder_execution() {
	let mut module = greeter_module("hive", "Greeter", "singleton", greeter_constructor("core"));
	module.add_interceptor(
		"Greeter",
		interceptor("log", tag_interceptor("log")).with_follows("auth"),
	);
	module.add_interceptor(
		"Greeter",
		interceptor("auth", tag_interceptor("auth")).with_precedes("*"),
	);

	let registry = build([module]);
	let greeter: GreeterHandle = registry.service("hive.Greeter").unwrap();
	assert_eq!(greeter.greet(), "auth(log(core))");
}

#[test]
fn interceptors_may_come_from_other_modules() {
	let base = greeter_module("hive", "Greeter", "singleton", greeter_constructor("core"));
	let mut other = hivemind_model::ModuleDefinition::new("other", super::fixtures::loc());
	other.add_interceptor("hive.Greeter", interceptor("audit", tag_interceptor("audit")));

	let registry = build([base, other]);
	let greeter: GreeterHandle = registry.service("hive.Greeter").unwrap();
	assert_eq!(greeter.greet(), "audit(core)");
}

#[test]
fn interceptors_must_keep_the_declared_interface() {
	let mut module = greeter_module("hive", "Greeter", "singleton", greeter_constructor("core"));
	let breaking: Arc<dyn InterceptorConstructor> = Arc::new(
		|_: &dyn ConstructionContext, _inner: ServiceObject| -> Result<ServiceObject, ContainerError> {
			Ok(ServiceObject::new(String::from("stripped")))
		},
	);
	module.add_interceptor("Greeter", interceptor("breaker", breaking));

	let registry = build([module]);
	let err = registry.service::<GreeterHandle>("hive.Greeter").unwrap_err();
	assert!(matches!(err, ContainerError::WrongInterface { .. }));
}
