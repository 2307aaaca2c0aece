//! Canonical registry of the nodes and edges currently on screen.
//!
//! Nodes and edges are keyed by id and kept in arrival order so the canvas
//! seeds its initial layout deterministically. Edges may arrive before their
//! endpoints; such dangling edges are held back from snapshots until the
//! missing node shows up, and the held-back set is bounded.

use indexmap::IndexMap;
use log::warn;

use super::types::{Edge, GraphSnapshot, Node, Position};

/// Default bound on retained dangling edges.
pub const DEFAULT_DANGLING_EDGE_LIMIT: usize = 512;

#[derive(Clone, Debug)]
pub struct GraphDataStore {
	nodes: IndexMap<String, Node>,
	edges: IndexMap<String, Edge>,
	dangling_edge_limit: usize,
}

impl Default for GraphDataStore {
	fn default() -> Self {
		Self::new(DEFAULT_DANGLING_EDGE_LIMIT)
	}
}

impl GraphDataStore {
	pub fn new(dangling_edge_limit: usize) -> Self {
		Self {
			nodes: IndexMap::new(),
			edges: IndexMap::new(),
			dangling_edge_limit,
		}
	}

	/// Discard everything and ingest a fresh graph.
	pub fn replace(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
		self.clear();
		self.merge(nodes, edges);
	}

	pub fn clear(&mut self) {
		self.nodes.clear();
		self.edges.clear();
	}

	/// Insert-or-overwrite by id. Merging the same payload twice is a no-op.
	///
	/// A node's `type` never changes once stored, and a known position
	/// survives an incoming node that has none.
	pub fn merge(&mut self, nodes: Vec<Node>, edges: Vec<Edge>) {
		for mut node in nodes {
			if let Some(existing) = self.nodes.get(&node.id) {
				node.kind = existing.kind;
				if node.position.is_none() {
					node.position = existing.position;
				}
			}
			self.nodes.insert(node.id.clone(), node);
		}
		for edge in edges {
			self.edges.insert(edge.id.clone(), edge);
		}

		let dangling = self.dangling_edge_count();
		if dangling > self.dangling_edge_limit {
			warn!(
				"crm-graph: pruning {} dangling edges (limit {})",
				dangling, self.dangling_edge_limit
			);
			self.prune_dangling();
		}
	}

	/// Owned copy of the renderable graph; dangling edges are left out.
	pub fn snapshot(&self) -> GraphSnapshot {
		GraphSnapshot {
			nodes: self.nodes.values().cloned().collect(),
			edges: self.renderable_edges().cloned().collect(),
		}
	}

	/// Engine write-back. Unknown ids are ignored.
	pub fn record_positions<'a>(&mut self, positions: impl IntoIterator<Item = (&'a str, Position)>) {
		for (id, position) in positions {
			if let Some(node) = self.nodes.get_mut(id) {
				node.position = Some(position);
			}
		}
	}

	/// Positions of all placed nodes, for carrying a layout across a rebuild.
	pub fn positions(&self) -> Vec<(String, Position)> {
		self.nodes
			.values()
			.filter_map(|n| n.position.map(|p| (n.id.clone(), p)))
			.collect()
	}

	/// Edges whose endpoints are both present.
	pub fn renderable_edges(&self) -> impl Iterator<Item = &Edge> {
		self.edges.values().filter(|e| self.is_renderable(e))
	}

	pub fn dangling_edge_count(&self) -> usize {
		self.edges.values().filter(|e| !self.is_renderable(e)).count()
	}

	pub fn prune_dangling(&mut self) {
		let nodes = &self.nodes;
		self.edges
			.retain(|_, e| nodes.contains_key(&e.source_id) && nodes.contains_key(&e.target_id));
	}

	pub fn node(&self, id: &str) -> Option<&Node> {
		self.nodes.get(id)
	}

	pub fn contains_node(&self, id: &str) -> bool {
		self.nodes.contains_key(id)
	}

	pub fn contains_edge(&self, id: &str) -> bool {
		self.edges.contains_key(id)
	}

	pub fn node_count(&self) -> usize {
		self.nodes.len()
	}

	/// Includes dangling edges.
	pub fn edge_count(&self) -> usize {
		self.edges.len()
	}

	pub fn is_empty(&self) -> bool {
		self.nodes.is_empty()
	}

	fn is_renderable(&self, edge: &Edge) -> bool {
		self.nodes.contains_key(&edge.source_id) && self.nodes.contains_key(&edge.target_id)
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::NodeType;

	fn make_node(id: &str, kind: NodeType) -> Node {
		Node::new(id, kind)
	}

	fn make_edge(id: &str, source: &str, target: &str) -> Edge {
		Edge::new(id, source, target)
	}

	fn sample() -> (Vec<Node>, Vec<Edge>) {
		(
			vec![
				make_node("C1", NodeType::Customer),
				make_node("E1", NodeType::Employee),
				make_node("S1", NodeType::SalesActivity),
			],
			vec![make_edge("e1", "C1", "E1"), make_edge("e2", "C1", "S1")],
		)
	}

	#[test]
	fn test_merge_is_idempotent() {
		let (nodes, edges) = sample();
		let mut store = GraphDataStore::default();
		store.merge(nodes.clone(), edges.clone());
		let once = (store.node_count(), store.edge_count());
		store.merge(nodes, edges);
		assert_eq!((store.node_count(), store.edge_count()), once);
		assert_eq!(once, (3, 2));
	}

	#[test]
	fn test_merge_last_write_wins_but_type_is_fixed() {
		let mut store = GraphDataStore::default();
		store.merge(vec![make_node("C1", NodeType::Customer).with_label("Acme")], vec![]);
		store.merge(
			vec![make_node("C1", NodeType::CustomerInactive).with_label("Acme Ltd")],
			vec![],
		);

		let node = store.node("C1").unwrap();
		assert_eq!(node.label, "Acme Ltd");
		assert_eq!(node.kind, NodeType::Customer);
	}

	#[test]
	fn test_replace_discards_previous_content() {
		let (nodes, edges) = sample();
		let mut store = GraphDataStore::default();
		store.replace(nodes, edges);
		store.replace(vec![make_node("E9", NodeType::Employee)], vec![]);

		assert_eq!(store.node_count(), 1);
		assert_eq!(store.edge_count(), 0);
		assert!(!store.contains_node("C1"));

		store.replace(vec![], vec![]);
		assert!(store.is_empty());
	}

	#[test]
	fn test_dangling_edge_completes_when_node_arrives() {
		let mut store = GraphDataStore::default();
		store.merge(
			vec![make_node("E1", NodeType::Employee)],
			vec![make_edge("e1", "E1", "C7")],
		);
		assert_eq!(store.dangling_edge_count(), 1);
		assert!(store.snapshot().edges.is_empty());

		store.merge(vec![make_node("C7", NodeType::Customer)], vec![]);
		assert_eq!(store.dangling_edge_count(), 0);
		assert_eq!(store.snapshot().edges.len(), 1);
	}

	#[test]
	fn test_dangling_edges_pruned_beyond_limit() {
		let mut store = GraphDataStore::new(2);
		store.merge(
			vec![make_node("E1", NodeType::Employee), make_node("C1", NodeType::Customer)],
			vec![
				make_edge("ok", "E1", "C1"),
				make_edge("d1", "E1", "X1"),
				make_edge("d2", "E1", "X2"),
			],
		);
		assert_eq!(store.edge_count(), 3);

		store.merge(vec![], vec![make_edge("d3", "E1", "X3")]);
		assert_eq!(store.dangling_edge_count(), 0);
		assert_eq!(store.edge_count(), 1);
		assert!(store.contains_edge("ok"));
	}

	#[test]
	fn test_positions_survive_merge_and_snapshot_is_a_copy() {
		let mut store = GraphDataStore::default();
		store.merge(vec![make_node("C1", NodeType::Customer)], vec![]);
		store.record_positions([("C1", Position { x: 4.0, y: -2.0 }), ("ghost", Position { x: 0.0, y: 0.0 })]);

		store.merge(vec![make_node("C1", NodeType::Customer).with_label("Acme")], vec![]);
		assert_eq!(store.node("C1").unwrap().position, Some(Position { x: 4.0, y: -2.0 }));

		let mut snapshot = store.snapshot();
		snapshot.nodes[0].label = "mutated".to_string();
		assert_eq!(store.node("C1").unwrap().label, "Acme");
		assert_eq!(store.positions().len(), 1);
	}
}
