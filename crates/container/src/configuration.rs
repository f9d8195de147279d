use std::sync::{Arc, Weak};

use hivemind_model::{
	ContainerError, ContributionDefinition, Location, Occurrences, ServiceObject, Visibility,
};
use parking_lot::Mutex;

use crate::builder::ResolvedConfigurationPoint;
use crate::registry::RegistryRuntime;

/// A resolved configuration point: an ordered list of contributions, merged
/// into one item list the first time anyone asks.
///
/// Contributions are stored in resolution order with the initial one (if any)
/// already moved to the front.
pub struct ConfigurationPoint {
	id: String,
	module_id: String,
	visibility: Visibility,
	location: Location,
	occurrences: Occurrences,
	contributions: Vec<ContributionDefinition>,
	runtime: Weak<RegistryRuntime>,
	items: Mutex<Option<Arc<Vec<ServiceObject>>>>,
}

impl ConfigurationPoint {
	pub(crate) fn new(
		resolved: ResolvedConfigurationPoint,
		runtime: Weak<RegistryRuntime>,
	) -> Self {
		Self {
			id: resolved.id,
			module_id: resolved.module_id,
			visibility: resolved.visibility,
			location: resolved.location,
			occurrences: resolved.occurrences,
			contributions: resolved.contributions,
			runtime,
			items: Mutex::new(None),
		}
	}

	pub fn id(&self) -> &str {
		&self.id
	}

	pub fn module_id(&self) -> &str {
		&self.module_id
	}

	pub fn visibility(&self) -> Visibility {
		self.visibility
	}

	pub fn location(&self) -> &Location {
		&self.location
	}

	pub fn occurrences(&self) -> Occurrences {
		self.occurrences
	}

	pub(crate) fn visible_to(&self, module_id: &str) -> bool {
		self.visibility == Visibility::Public || self.module_id == module_id
	}

	/// Assembles the configuration at most once and returns the shared list.
	///
	/// Each contribution's constructor runs against its own defining module.
	/// A failing constructor leaves the cache empty, so a later call retries.
	pub(crate) fn configuration(&self) -> Result<Arc<Vec<ServiceObject>>, ContainerError> {
		let mut slot = self.items.lock();
		if let Some(items) = slot.as_ref() {
			return Ok(items.clone());
		}

		let runtime = self
			.runtime
			.upgrade()
			.ok_or(ContainerError::RegistryShutdown)?;
		let mut items = Vec::new();
		for contribution in &self.contributions {
			let module = runtime.module(contribution.contributing_module(), &self.location)?;
			let produced = contribution
				.constructor()
				.contribute(&*module)
				.map_err(|source| ContainerError::UnableToConstructConfiguration {
					point: self.id.clone(),
					location: contribution.location().clone(),
					source: Box::new(source),
				})?;
			items.extend(produced);
		}

		let items = Arc::new(items);
		tracing::debug!(point = %self.id, items = items.len(), "configuration assembled");
		*slot = Some(items.clone());
		Ok(items)
	}
}
