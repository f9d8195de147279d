use std::fmt;
use std::sync::Arc;

/// Where a definition came from, for diagnostics.
///
/// `resource` is typically a descriptor path or a type name; a line of zero
/// means "whole resource".
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
	resource: Arc<str>,
	line: u32,
	column: u32,
}

impl Location {
	pub fn new(resource: impl Into<Arc<str>>, line: u32, column: u32) -> Self {
		Self {
			resource: resource.into(),
			line,
			column,
		}
	}

	/// A location pointing at a whole resource.
	pub fn resource_only(resource: impl Into<Arc<str>>) -> Self {
		Self::new(resource, 0, 0)
	}

	pub fn resource(&self) -> &str {
		&self.resource
	}

	pub fn line(&self) -> u32 {
		self.line
	}

	pub fn column(&self) -> u32 {
		self.column
	}
}

impl fmt::Display for Location {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.line == 0 {
			write!(f, "{}", self.resource)
		} else if self.column == 0 {
			write!(f, "{}:{}", self.resource, self.line)
		} else {
			write!(f, "{}:{}:{}", self.resource, self.line, self.column)
		}
	}
}
