use rustc_hash::{FxHashMap, FxHashSet};

#[cfg(test)]
mod tests;

/// A precede/follow reference parsed out of a comma-separated name list.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Constraint {
	/// The `*` wildcard: all other items.
	All,
	Named(String),
}

struct Node<T> {
	item: T,
	name: String,
	precedes: Vec<Constraint>,
	follows: Vec<Constraint>,
}

/// Produces a deterministic total order for named, partially-ordered items.
///
/// Each item may name others it precedes or follows (comma-separated, `*`
/// meaning "all other items"). Items with no declared relationship keep
/// their insertion order. Problems degrade instead of failing: duplicate
/// names, references to unknown names, and dependency cycles are logged as
/// warnings, with the offending constraint dropped.
pub struct Orderer<T> {
	label: String,
	nodes: Vec<Node<T>>,
	by_name: FxHashMap<String, usize>,
}

impl<T> Orderer<T> {
	/// `label` names what is being ordered, for log messages only.
	pub fn new(label: impl Into<String>) -> Self {
		Self {
			label: label.into(),
			nodes: Vec::new(),
			by_name: FxHashMap::default(),
		}
	}

	pub fn add(&mut self, item: T, name: &str, precedes: Option<&str>, follows: Option<&str>) {
		let index = self.nodes.len();
		if self.by_name.contains_key(name) {
			tracing::warn!(
				label = %self.label,
				name,
				"duplicate name added to orderer; constraints will resolve to the first occurrence"
			);
		} else {
			self.by_name.insert(name.to_owned(), index);
		}
		self.nodes.push(Node {
			item,
			name: name.to_owned(),
			precedes: parse_name_list(precedes),
			follows: parse_name_list(follows),
		});
	}

	pub fn len(&self) -> usize {
		self.nodes.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	/// Consumes the orderer and returns the items in execution order.
	pub fn ordered(self) -> Vec<T> {
		let count = self.nodes.len();
		if count <= 1 {
			return self.nodes.into_iter().map(|n| n.item).collect();
		}

		let leaders: FxHashSet<usize> = self
			.nodes
			.iter()
			.enumerate()
			.filter(|(_, n)| n.precedes.contains(&Constraint::All))
			.map(|(i, _)| i)
			.collect();
		let trailers: FxHashSet<usize> = self
			.nodes
			.iter()
			.enumerate()
			.filter(|(_, n)| n.follows.contains(&Constraint::All))
			.map(|(i, _)| i)
			.collect();

		// edges[i] holds every j that must come after i
		let mut edges: Vec<FxHashSet<usize>> = vec![FxHashSet::default(); count];
		for (i, node) in self.nodes.iter().enumerate() {
			for constraint in &node.precedes {
				match constraint {
					Constraint::All => {
						for j in 0..count {
							if j != i && !leaders.contains(&j) {
								edges[i].insert(j);
							}
						}
					}
					Constraint::Named(name) => match self.by_name.get(name) {
						Some(&j) if j != i => {
							edges[i].insert(j);
						}
						Some(_) => {}
						None => self.warn_unknown(&node.name, name),
					},
				}
			}
			for constraint in &node.follows {
				match constraint {
					Constraint::All => {
						for j in 0..count {
							if j != i && !trailers.contains(&j) {
								edges[j].insert(i);
							}
						}
					}
					Constraint::Named(name) => match self.by_name.get(name) {
						Some(&j) if j != i => {
							edges[j].insert(i);
						}
						Some(_) => {}
						None => self.warn_unknown(&node.name, name),
					},
				}
			}
		}

		let mut indegree = vec![0usize; count];
		for targets in &edges {
			for &j in targets {
				indegree[j] += 1;
			}
		}

		// Kahn's algorithm; the ready node with the smallest insertion index
		// wins, which keeps unconstrained items in insertion order.
		let mut emitted = vec![false; count];
		let mut order = Vec::with_capacity(count);
		for _ in 0..count {
			let next = (0..count)
				.find(|&i| !emitted[i] && indegree[i] == 0)
				.unwrap_or_else(|| {
					// Every remaining node sits on a cycle; force the
					// earliest one out and drop its incoming edges.
					let forced = (0..count).find(|&i| !emitted[i]).expect("nodes remain");
					let remaining: Vec<&str> = (0..count)
						.filter(|&i| !emitted[i])
						.map(|i| self.nodes[i].name.as_str())
						.collect();
					tracing::warn!(
						label = %self.label,
						forced = %self.nodes[forced].name,
						?remaining,
						"dependency cycle among ordered items; dropping edges into the earliest item"
					);
					forced
				});
			emitted[next] = true;
			order.push(next);
			for &j in &edges[next] {
				if !emitted[j] && indegree[j] > 0 {
					indegree[j] -= 1;
				}
			}
		}

		let mut slots: Vec<Option<T>> = self.nodes.into_iter().map(|n| Some(n.item)).collect();
		order
			.into_iter()
			.map(|i| slots[i].take().expect("each index emitted once"))
			.collect()
	}

	fn warn_unknown(&self, from: &str, missing: &str) {
		tracing::warn!(
			label = %self.label,
			from,
			missing,
			"ordering constraint references an unknown name; ignored"
		);
	}
}

fn parse_name_list(list: Option<&str>) -> Vec<Constraint> {
	let Some(list) = list else {
		return Vec::new();
	};
	list.split(',')
		.map(str::trim)
		.filter(|name| !name.is_empty())
		.map(|name| {
			if name == "*" {
				Constraint::All
			} else {
				Constraint::Named(name.to_owned())
			}
		})
		.collect()
}
