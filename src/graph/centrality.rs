//! Degree centrality over the current edge set.

use std::collections::HashMap;

use super::types::Edge;

/// Incident-edge count per node id. Ids without edges read as zero.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DegreeTable {
	degrees: HashMap<String, usize>,
}

impl DegreeTable {
	pub fn get(&self, node_id: &str) -> usize {
		self.degrees.get(node_id).copied().unwrap_or(0)
	}

	pub fn max(&self) -> usize {
		self.degrees.values().copied().max().unwrap_or(0)
	}

	pub fn len(&self) -> usize {
		self.degrees.len()
	}

	pub fn is_empty(&self) -> bool {
		self.degrees.is_empty()
	}
}

/// One pass over `edges`; a self-loop counts twice for its node.
///
/// Always recomputed from scratch since edge removal is not tracked.
pub fn compute_degrees<'a>(edges: impl IntoIterator<Item = &'a Edge>) -> DegreeTable {
	let mut degrees: HashMap<String, usize> = HashMap::new();
	for edge in edges {
		*degrees.entry(edge.source_id.clone()).or_insert(0) += 1;
		*degrees.entry(edge.target_id.clone()).or_insert(0) += 1;
	}
	DegreeTable { degrees }
}
