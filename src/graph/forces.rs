//! Per-node and per-link simulation knobs.
//!
//! One global force configuration looks wrong at both ends of the scale: a
//! handful of nodes wants strong separation while hundreds of nodes want
//! tight packing. Every knob is therefore a function of the view mode, the
//! node type and (in the roster view) the node's degree.

use std::collections::HashMap;

use super::centrality::DegreeTable;
use super::mode::ViewMode;
use super::store::GraphDataStore;
use super::types::{Edge, NodeType};

const INACTIVE_CHARGE: f64 = -10.0;
const ROSTER_BASE_CHARGE: f64 = -30.0;
const ROSTER_CHARGE_PER_DEGREE: f64 = 3.0;
const INACTIVE_LINK_DISTANCE: f64 = 250.0;
const ROSTER_BASE_LINK_DISTANCE: f64 = 20.0;
const ROSTER_LINK_DEGREE_CAP: usize = 50;

/// Knobs applied to a single node.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NodeForces {
	pub collision_radius: f64,
	/// Negative values repel.
	pub charge: f64,
}

/// Pull towards the canvas center.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RadialForce {
	pub strength: f64,
	pub radius: f64,
}

/// Everything the force engine needs for one graph revision.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ForceLayout {
	pub nodes: HashMap<String, NodeForces>,
	/// Keyed by edge id.
	pub links: HashMap<String, f64>,
	pub radial: Option<RadialForce>,
}

impl ForceLayout {
	pub fn node(&self, id: &str) -> Option<NodeForces> {
		self.nodes.get(id).copied()
	}

	pub fn link_distance(&self, edge_id: &str) -> Option<f64> {
		self.links.get(edge_id).copied()
	}
}

pub fn collision_radius(mode: ViewMode, kind: NodeType) -> f64 {
	let base = match kind {
		NodeType::Customer => 15.0,
		NodeType::CustomerInactive => 5.0,
		_ => 10.0,
	};
	let buffer = match mode {
		ViewMode::AllEmployees => 1.2,
		ViewMode::AllCustomers => 1.5,
		ViewMode::Customer => 3.0,
	};
	base * buffer
}

pub fn charge(mode: ViewMode, kind: NodeType, degree: usize) -> f64 {
	if kind == NodeType::CustomerInactive {
		return INACTIVE_CHARGE;
	}
	match mode {
		ViewMode::AllEmployees => ROSTER_BASE_CHARGE - ROSTER_CHARGE_PER_DEGREE * degree as f64,
		ViewMode::AllCustomers => -100.0,
		ViewMode::Customer => -300.0,
	}
}

/// `target_kind` is `None` when the target node is not (yet) known.
pub fn link_distance(
	mode: ViewMode,
	target_kind: Option<NodeType>,
	source_degree: usize,
	target_degree: usize,
) -> f64 {
	if target_kind == Some(NodeType::CustomerInactive) {
		return INACTIVE_LINK_DISTANCE;
	}
	match mode {
		ViewMode::AllEmployees => {
			let hub = source_degree.max(target_degree).min(ROSTER_LINK_DEGREE_CAP);
			ROSTER_BASE_LINK_DISTANCE + hub as f64
		}
		ViewMode::AllCustomers => 40.0,
		ViewMode::Customer => 60.0,
	}
}

pub fn radial_force(mode: ViewMode) -> Option<RadialForce> {
	match mode {
		ViewMode::AllEmployees => Some(RadialForce {
			strength: 0.08,
			radius: 0.0,
		}),
		_ => None,
	}
}

pub fn edge_distance(mode: ViewMode, edge: &Edge, store: &GraphDataStore, degrees: &DegreeTable) -> f64 {
	link_distance(
		mode,
		store.node(&edge.target_id).map(|n| n.kind),
		degrees.get(&edge.source_id),
		degrees.get(&edge.target_id),
	)
}

/// Knobs for every node and renderable link in `store`.
pub fn layout(mode: ViewMode, store: &GraphDataStore, degrees: &DegreeTable) -> ForceLayout {
	let snapshot = store.snapshot();
	let nodes = snapshot
		.nodes
		.iter()
		.map(|n| {
			let forces = NodeForces {
				collision_radius: collision_radius(mode, n.kind),
				charge: charge(mode, n.kind, degrees.get(&n.id)),
			};
			(n.id.clone(), forces)
		})
		.collect();
	let links = snapshot
		.edges
		.iter()
		.map(|e| (e.id.clone(), edge_distance(mode, e, store, degrees)))
		.collect();

	ForceLayout {
		nodes,
		links,
		radial: radial_force(mode),
	}
}
