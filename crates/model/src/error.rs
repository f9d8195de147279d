use thiserror::Error;

use crate::location::Location;
use crate::occurrences::Occurrences;

/// Everything that can go wrong while defining, resolving, or constructing.
///
/// Definition-class variants (duplicates, unknown targets, visibility) are
/// routed through the container's `ErrorHandler` policy and may be dropped
/// under a lenient handler. Construction-class variants are always fatal for
/// the call that triggered construction.
#[derive(Debug, Error)]
pub enum ContainerError {
	#[error("module {id} is already defined")]
	DuplicateModule { id: String, location: Location },

	#[error("module {module} already defines an extension point {id} ({location})")]
	DuplicateExtensionPoint {
		module: String,
		id: String,
		location: Location,
	},

	#[error("service point {point} already has a default implementation ({location})")]
	DuplicateDefaultImplementation { point: String, location: Location },

	#[error("configuration point {point} already has an initial contribution ({location})")]
	DuplicateInitialContribution { point: String, location: Location },

	#[error("configuration point {point} already has a parser for format {format} ({location})")]
	DuplicateParserFormat {
		point: String,
		format: String,
		location: Location,
	},

	#[error("no module {id} is defined ({location})")]
	UnknownModule { id: String, location: Location },

	#[error("no service point {id} is defined ({location})")]
	UnknownServicePoint { id: String, location: Location },

	#[error("no configuration point {id} is defined ({location})")]
	UnknownConfigurationPoint { id: String, location: Location },

	#[error("{point} is private to its module and not visible to module {module} ({location})")]
	NotVisible {
		point: String,
		module: String,
		location: Location,
	},

	#[error("service point {point} names unknown service model {model}")]
	UnknownServiceModel { point: String, model: String },

	#[error("service point {point} has no implementations")]
	NoImplementation { point: String },

	#[error("implementation of service point {point} does not expose declared interface {expected}")]
	WrongInterface { point: String, expected: &'static str },

	#[error("service point {point} exposes {declared}, not the requested {requested}")]
	InterfaceMismatch {
		point: String,
		declared: &'static str,
		requested: &'static str,
	},

	#[error("configuration point {point} holds items of a different type than {requested}")]
	ConfigurationItemMismatch {
		point: String,
		requested: &'static str,
	},

	#[error("unable to construct service {point} ({location}): {source}")]
	UnableToConstructService {
		point: String,
		location: Location,
		#[source]
		source: Box<ContainerError>,
	},

	#[error("unable to construct configuration {point} ({location}): {source}")]
	UnableToConstructConfiguration {
		point: String,
		location: Location,
		#[source]
		source: Box<ContainerError>,
	},

	#[error("configuration point {point} expects {expected} contributions but has {actual}")]
	WrongContributionCount {
		point: String,
		expected: Occurrences,
		actual: usize,
	},

	#[error("the registry has been shut down")]
	RegistryShutdown,

	#[error("no service point exposes interface {interface}")]
	NoServiceForInterface { interface: &'static str },

	#[error("multiple service points expose interface {interface}")]
	MultipleServicesForInterface { interface: &'static str },

	/// Application-level failure raised inside a constructor.
	#[error("{0}")]
	Failure(String),
}

impl ContainerError {
	/// Shorthand for an application-level constructor failure.
	pub fn failure(message: impl Into<String>) -> Self {
		Self::Failure(message.into())
	}
}
