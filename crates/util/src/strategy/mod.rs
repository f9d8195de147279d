use std::any::TypeId;
use std::collections::VecDeque;
use std::sync::Arc;

use parking_lot::RwLock;
use rustc_hash::{FxHashMap, FxHashSet};
use thiserror::Error;


#[derive(Debug, Error)]
pub enum StrategyError {
	#[error("no strategy in {registry} applies to {subject}")]
	NotFound {
		registry: String,
		subject: &'static str,
	},
}

/// A node in an explicit type graph: a type plus its supertype link and the
/// interface types it exposes.
///
/// Rust has no runtime inheritance graph to walk, so subjects describe their
/// own lineage; the registry searches it the same way a reflective lookup
/// would.
#[derive(Debug, Clone)]
pub struct TypeEntry {
	id: TypeId,
	name: &'static str,
	supertype: Option<Arc<TypeEntry>>,
	interfaces: Vec<Arc<TypeEntry>>,
}

impl TypeEntry {
	pub fn of<T: 'static + ?Sized>() -> Self {
		Self {
			id: TypeId::of::<T>(),
			name: std::any::type_name::<T>(),
			supertype: None,
			interfaces: Vec::new(),
		}
	}

	pub fn with_supertype(mut self, supertype: Arc<TypeEntry>) -> Self {
		self.supertype = Some(supertype);
		self
	}

	pub fn with_interface(mut self, interface: Arc<TypeEntry>) -> Self {
		self.interfaces.push(interface);
		self
	}

	pub fn type_id(&self) -> TypeId {
		self.id
	}

	pub fn name(&self) -> &'static str {
		self.name
	}
}

/// Maps subject types to handler objects ("strategies").
///
/// Lookup order for a subject: its supertype chain (most specific first),
/// then a breadth-first walk of the interfaces reachable from that chain,
/// then the registered fallback. Hits and fallback results are cached per
/// subject type, so repeated lookups are a single map probe.
pub struct StrategyRegistry<S> {
	label: String,
	strategies: FxHashMap<TypeId, S>,
	fallback: Option<S>,
	cache: RwLock<FxHashMap<TypeId, S>>,
}

impl<S: Clone> StrategyRegistry<S> {
	/// `label` names the registry in error and log messages.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			strategies: FxHashMap::default(),
			fallback: None,
			cache: RwLock::new(FxHashMap::default()),
		}
	}

	pub fn register(&mut self, subject: &TypeEntry, strategy: S) {
		self.strategies.insert(subject.type_id(), strategy);
	}

	/// The strategy used when nothing in the subject's lineage matches;
	/// without one, misses are hard errors.
	pub fn register_fallback(&mut self, strategy: S) {
		self.fallback = Some(strategy);
	}

	pub fn strategy(&self, subject: &TypeEntry) -> Result<S, StrategyError> {
		if let Some(found) = self.cache.read().get(&subject.type_id()) {
			return Ok(found.clone());
		}

		match self.search(subject) {
			Some(found) => {
				self.cache.write().insert(subject.type_id(), found.clone());
				Ok(found)
			}
			None => Err(StrategyError::NotFound {
				registry: self.label.clone(),
				subject: subject.name(),
			}),
		}
	}

	fn search(&self, subject: &TypeEntry) -> Option<S> {
		let mut chain: Vec<&TypeEntry> = Vec::new();
		let mut current = Some(subject);
		while let Some(entry) = current {
			chain.push(entry);
			current = entry.supertype.as_deref();
		}

		for entry in &chain {
			if let Some(found) = self.strategies.get(&entry.id) {
				return Some(found.clone());
			}
		}

		let mut visited: FxHashSet<TypeId> = FxHashSet::default();
		let mut queue: VecDeque<&TypeEntry> = chain
			.iter()
			.flat_map(|entry| entry.interfaces.iter().map(Arc::as_ref))
			.collect();
		while let Some(interface) = queue.pop_front() {
			if !visited.insert(interface.id) {
				continue;
			}
			if let Some(found) = self.strategies.get(&interface.id) {
				return Some(found.clone());
			}
			queue.extend(interface.interfaces.iter().map(Arc::as_ref));
		}

		self.fallback.clone()
	}
}
