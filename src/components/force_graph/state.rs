//! Graph simulation state and interaction tracking.
//!
//! Wraps the `force_graph` physics simulation with per-node CRM metadata,
//! view transforms for pan/zoom, and highlight state for hover effects with
//! smooth intensity transitions. The per-node knobs computed by
//! [`crate::graph::forces`] are applied here: charge becomes node mass, while
//! link distance, collision radius and radial centering run as a constraint
//! pass after each integration step.

use std::collections::{HashMap, HashSet};
use std::f64::consts::PI;

use force_graph::{DefaultNodeIdx, EdgeData, ForceGraph, NodeData, SimulationParameters};

use super::scale::{ScaleConfig, ScaledValues};
use super::theme::Theme;
use crate::graph::{
	Edge, ExplorerFrame, NodeType, Position, RadialForce, ViewMode, compute_highlight, lod,
};

/// Fraction of each constraint violation corrected per frame.
const CONSTRAINT_RATE: f64 = 0.1;
/// Charge magnitude that maps onto the default node mass.
const REFERENCE_CHARGE: f64 = 100.0;
const REFERENCE_MASS: f64 = 10.0;

/// Per-node display metadata attached to each node in the simulation.
#[derive(Clone, Debug, Default)]
pub struct NodeInfo {
	pub id: String,
	pub label: String,
	pub kind: NodeType,
	pub color: String,
	/// Size multiplier (1.0 = normal, >1.0 = larger/more important)
	pub size: f64,
	pub collision_radius: f64,
}

/// Pan and zoom transform applied to the entire graph view.
#[derive(Clone, Debug, Default)]
pub struct ViewTransform {
	pub x: f64,
	pub y: f64,
	/// Zoom factor (1.0 = 100%, clamped to 0.1..10.0).
	pub k: f64,
}

/// Tracks an in-progress node drag operation.
#[derive(Clone, Debug, Default)]
pub struct DragState {
	pub active: bool,
	/// False until the pointer moves; a drag that never moved is a click.
	pub moved: bool,
	pub node_idx: Option<DefaultNodeIdx>,
	pub start_x: f64,
	pub start_y: f64,
	pub node_start_x: f32,
	pub node_start_y: f32,
}

/// Tracks an in-progress canvas pan operation.
#[derive(Clone, Debug, Default)]
pub struct PanState {
	pub active: bool,
	pub start_x: f64,
	pub start_y: f64,
	pub transform_start_x: f64,
	pub transform_start_y: f64,
}

/// Smooth highlight transitions with per-node intensity tracking.
///
/// Membership comes from [`compute_highlight`]; this type only animates it.
/// Each node's intensity eases towards 1.0 while it is in the target set and
/// decays towards 0.0 afterwards, with a short hold time so skimming past a
/// node does not flash.
#[derive(Clone, Debug, Default)]
pub struct HighlightState {
	pub hovered_node: Option<DefaultNodeIdx>,
	/// Node whose incident edges glow; kept after hover ends so edges fade out.
	edge_focus: Option<DefaultNodeIdx>,
	target_set: HashSet<DefaultNodeIdx>,
	node_intensity: HashMap<DefaultNodeIdx, f64>,
	hover_ring_intensity: HashMap<DefaultNodeIdx, f64>,
	hold_timer: HashMap<DefaultNodeIdx, f64>,
	cached_max: f64,
}

/// Minimum time (seconds) a highlight must be held before it can fade out.
const MIN_HOLD_TIME: f64 = 0.12;

impl HighlightState {
	/// Replace the target set. No-op when the hovered node did not change.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>, targets: HashSet<DefaultNodeIdx>) {
		if self.hovered_node == node {
			return;
		}

		self.hovered_node = node;
		if node.is_some() {
			self.edge_focus = node;
		}
		self.target_set = targets;
		for &idx in &self.target_set {
			self.hold_timer.insert(idx, MIN_HOLD_TIME);
		}
	}

	/// Exponential smoothing: value += (target - value) * (1 - e^(-speed * dt))
	pub fn tick(&mut self, dt: f64) {
		const FADE_IN_SPEED: f64 = 6.0; // ~150ms to 95%
		const FADE_OUT_SPEED: f64 = 4.0; // ~250ms to 95%

		let fade_in_factor = 1.0 - (-FADE_IN_SPEED * dt).exp();
		let fade_out_decay = (-FADE_OUT_SPEED * dt).exp();

		for &idx in &self.target_set {
			let intensity = self.node_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in_factor;
		}

		if let Some(idx) = self.hovered_node {
			let intensity = self.hover_ring_intensity.entry(idx).or_insert(0.0);
			*intensity += (1.0 - *intensity) * fade_in_factor;
		}

		let mut new_max: f64 = 0.0;

		self.hold_timer.retain(|idx, timer| {
			if self.target_set.contains(idx) {
				true
			} else {
				*timer -= dt;
				*timer > 0.0
			}
		});

		self.node_intensity.retain(|idx, intensity| {
			if !self.target_set.contains(idx)
				&& self.hold_timer.get(idx).copied().unwrap_or(0.0) <= 0.0
			{
				*intensity *= fade_out_decay;
			}
			new_max = new_max.max(*intensity);
			*intensity > 0.005
		});

		self.hover_ring_intensity.retain(|idx, intensity| {
			if self.hovered_node != Some(*idx)
				&& self.hold_timer.get(idx).copied().unwrap_or(0.0) <= 0.0
			{
				*intensity *= fade_out_decay;
			}
			*intensity > 0.005
		});

		if new_max <= 0.005 && self.hovered_node.is_none() {
			self.edge_focus = None;
		}
		self.cached_max = new_max;
	}

	pub fn node_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.node_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	pub fn hover_ring_intensity(&self, idx: DefaultNodeIdx) -> f64 {
		self.hover_ring_intensity.get(&idx).copied().unwrap_or(0.0)
	}

	/// Only edges incident to the focused node light up.
	pub fn edge_intensity(&self, idx1: DefaultNodeIdx, idx2: DefaultNodeIdx) -> f64 {
		match self.edge_focus {
			Some(focus) if focus == idx1 || focus == idx2 => {
				(self.node_intensity(idx1) * self.node_intensity(idx2)).sqrt()
			}
			_ => 0.0,
		}
	}

	/// Highlighted or hovered right now; labels of these always render.
	pub fn is_emphasized(&self, idx: DefaultNodeIdx) -> bool {
		self.hovered_node == Some(idx) || self.target_set.contains(&idx)
	}

	/// Maximum intensity of any node, used to dim everything else.
	pub fn max_intensity(&self) -> f64 {
		self.cached_max
	}
}

struct Link {
	source: DefaultNodeIdx,
	target: DefaultNodeIdx,
	distance: f64,
}

/// Core graph state combining physics simulation with interaction and highlight tracking.
///
/// Created when the canvas mounts and rebuilt by [`ForceGraphState::reload`]
/// whenever the explorer publishes a new frame; node positions carry over by id.
pub struct ForceGraphState {
	pub graph: ForceGraph<NodeInfo, ()>,
	pub transform: ViewTransform,
	pub drag: DragState,
	pub pan: PanState,
	pub highlight: HighlightState,
	pub width: f64,
	pub height: f64,
	pub animation_running: bool,
	pub mode: ViewMode,
	revision: u64,
	edges: Vec<Edge>,
	links: Vec<Link>,
	radial: Option<RadialForce>,
	id_to_idx: HashMap<String, DefaultNodeIdx>,
	idx_to_id: HashMap<DefaultNodeIdx, String>,
}

impl ForceGraphState {
	pub fn new(frame: &ExplorerFrame, width: f64, height: f64, theme: &Theme) -> Self {
		let mut state = Self {
			graph: ForceGraph::new(simulation_parameters()),
			transform: ViewTransform {
				x: width / 2.0,
				y: height / 2.0,
				k: 1.0,
			},
			drag: DragState::default(),
			pan: PanState::default(),
			highlight: HighlightState::default(),
			width,
			height,
			animation_running: true,
			mode: frame.mode,
			revision: 0,
			edges: Vec::new(),
			links: Vec::new(),
			radial: None,
			id_to_idx: HashMap::new(),
			idx_to_id: HashMap::new(),
		};
		state.rebuild(frame, theme, &HashMap::new());
		state
	}

	/// Swap in a new frame, keeping the positions of nodes that survive.
	pub fn reload(&mut self, frame: &ExplorerFrame, theme: &Theme) {
		if frame.revision == self.revision {
			return;
		}
		let seeds: HashMap<String, Position> = self.positions().into_iter().collect();
		self.drag = DragState::default();
		self.highlight = HighlightState::default();
		self.rebuild(frame, theme, &seeds);
	}

	fn rebuild(&mut self, frame: &ExplorerFrame, theme: &Theme, seeds: &HashMap<String, Position>) {
		let mut graph = ForceGraph::new(simulation_parameters());
		let mut id_to_idx = HashMap::new();
		let mut idx_to_id = HashMap::new();

		let max_degree = frame.degrees.max().max(1);
		let count = frame.snapshot.nodes.len().max(1);

		for (i, node) in frame.snapshot.nodes.iter().enumerate() {
			let angle = (i as f64) * 2.0 * PI / count as f64;
			// Live engine positions beat the last write-back stored on the node.
			let position = seeds
				.get(&node.id)
				.copied()
				.or(node.position)
				.unwrap_or(Position {
					x: 100.0 * angle.cos(),
					y: 100.0 * angle.sin(),
				});

			// Hubs (many relationships) render larger; sqrt for softer scaling.
			let edge_factor = (frame.degrees.get(&node.id) as f64 / max_degree as f64).sqrt();
			let size = node.size.unwrap_or_else(|| base_size(node.kind) + 0.6 * edge_factor);

			let forces = frame.layout.node(&node.id);
			let mass = forces
				.map(|f| REFERENCE_MASS * (f.charge.abs() / REFERENCE_CHARGE).sqrt())
				.unwrap_or(REFERENCE_MASS);

			let idx = graph.add_node(NodeData {
				x: position.x as f32,
				y: position.y as f32,
				mass: mass as f32,
				is_anchor: false,
				user_data: NodeInfo {
					id: node.id.clone(),
					label: node.label.clone(),
					kind: node.kind,
					color: theme.node_color(node.kind, node.color.as_deref()).to_css(),
					size,
					collision_radius: forces.map(|f| f.collision_radius).unwrap_or(0.0),
				},
			});
			id_to_idx.insert(node.id.clone(), idx);
			idx_to_id.insert(idx, node.id.clone());
		}

		let mut links = Vec::new();
		for edge in &frame.snapshot.edges {
			if let (Some(&source), Some(&target)) =
				(id_to_idx.get(&edge.source_id), id_to_idx.get(&edge.target_id))
			{
				// Self-loops still count towards degree and highlight, but the
				// engine cannot integrate a spring from a node to itself.
				if source == target {
					continue;
				}
				graph.add_edge(source, target, EdgeData::default());
				if let Some(distance) = frame.layout.link_distance(&edge.id) {
					links.push(Link {
						source,
						target,
						distance,
					});
				}
			}
		}

		self.graph = graph;
		self.links = links;
		self.edges = frame.snapshot.edges.clone();
		self.radial = frame.layout.radial;
		self.mode = frame.mode;
		self.revision = frame.revision;
		self.id_to_idx = id_to_idx;
		self.idx_to_id = idx_to_id;
	}

	/// Current engine positions, keyed by node id.
	pub fn positions(&self) -> Vec<(String, Position)> {
		let mut out = Vec::new();
		self.graph.visit_nodes(|node| {
			out.push((
				node.data.user_data.id.clone(),
				Position {
					x: node.x() as f64,
					y: node.y() as f64,
				},
			));
		});
		out
	}

	pub fn screen_to_graph(&self, sx: f64, sy: f64) -> (f64, f64) {
		(
			(sx - self.transform.x) / self.transform.k,
			(sy - self.transform.y) / self.transform.k,
		)
	}

	pub fn node_at_position(
		&self,
		sx: f64,
		sy: f64,
		config: &ScaleConfig,
	) -> Option<DefaultNodeIdx> {
		let (gx, gy) = self.screen_to_graph(sx, sy);
		let scale = ScaledValues::new(config, self.transform.k);
		let mut found = None;
		self.graph.visit_nodes(|node| {
			let (dx, dy) = (node.x() as f64 - gx, node.y() as f64 - gy);
			let node_hit_radius = scale.hit_radius * node.data.user_data.size;
			if (dx * dx + dy * dy).sqrt() < node_hit_radius {
				found = Some(node.index());
			}
		});
		found
	}

	pub fn node_id(&self, idx: DefaultNodeIdx) -> Option<&str> {
		self.idx_to_id.get(&idx).map(String::as_str)
	}

	/// Highlight the hovered node and its direct neighbors.
	pub fn set_hover(&mut self, node: Option<DefaultNodeIdx>) {
		if self.highlight.hovered_node == node {
			return;
		}
		let focused = node.and_then(|idx| self.node_id(idx));
		let set = compute_highlight(focused, &self.edges);
		let targets = set
			.nodes
			.iter()
			.filter_map(|id| self.id_to_idx.get(id).copied())
			.collect();
		self.highlight.set_hover(node, targets);
	}

	/// LOD decision for one node at the current zoom.
	pub fn show_label(&self, node: &force_graph::Node<NodeInfo>) -> bool {
		lod::should_show_label(
			node.data.user_data.kind,
			self.mode,
			self.transform.k,
			self.highlight.is_emphasized(node.index()),
		)
	}

	pub fn tick(&mut self, dt: f32) {
		self.graph.update(dt);
		self.apply_constraints();
		self.highlight.tick(dt as f64);
	}

	pub fn resize(&mut self, width: f64, height: f64) {
		self.width = width;
		self.height = height;
	}

	/// Link rest lengths, collision separation and radial pull towards the origin.
	fn apply_constraints(&mut self) {
		let mut nodes: Vec<(DefaultNodeIdx, f64, f64, f64)> = Vec::new();
		self.graph.visit_nodes(|node| {
			nodes.push((
				node.index(),
				node.x() as f64,
				node.y() as f64,
				node.data.user_data.collision_radius,
			));
		});
		let index: HashMap<DefaultNodeIdx, usize> =
			nodes.iter().enumerate().map(|(i, n)| (n.0, i)).collect();
		let mut delta = vec![(0.0_f64, 0.0_f64); nodes.len()];

		for link in &self.links {
			let (Some(&a), Some(&b)) = (index.get(&link.source), index.get(&link.target)) else {
				continue;
			};
			let (dx, dy) = (nodes[b].1 - nodes[a].1, nodes[b].2 - nodes[a].2);
			let len = (dx * dx + dy * dy).sqrt().max(0.001);
			let k = (len - link.distance) / len * CONSTRAINT_RATE * 0.5;
			delta[a].0 += dx * k;
			delta[a].1 += dy * k;
			delta[b].0 -= dx * k;
			delta[b].1 -= dy * k;
		}

		for a in 0..nodes.len() {
			for b in (a + 1)..nodes.len() {
				let min = nodes[a].3 + nodes[b].3;
				let (dx, dy) = (nodes[b].1 - nodes[a].1, nodes[b].2 - nodes[a].2);
				let len = (dx * dx + dy * dy).sqrt();
				if len >= min || len < 0.001 {
					continue;
				}
				let k = (min - len) / len * CONSTRAINT_RATE * 0.5;
				delta[a].0 -= dx * k;
				delta[a].1 -= dy * k;
				delta[b].0 += dx * k;
				delta[b].1 += dy * k;
			}
		}

		if let Some(radial) = self.radial {
			for (i, &(_, x, y, _)) in nodes.iter().enumerate() {
				let len = (x * x + y * y).sqrt();
				if len <= radial.radius || len < 0.001 {
					continue;
				}
				let k = (len - radial.radius) / len * radial.strength;
				delta[i].0 -= x * k;
				delta[i].1 -= y * k;
			}
		}

		self.graph.visit_nodes_mut(|node| {
			if node.data.is_anchor {
				return;
			}
			if let Some(&i) = index.get(&node.index()) {
				node.data.x += delta[i].0 as f32;
				node.data.y += delta[i].1 as f32;
			}
		});
	}
}

fn simulation_parameters() -> SimulationParameters {
	SimulationParameters {
		force_charge: 150.0,
		force_spring: 0.05,
		force_max: 100.0,
		node_speed: 3000.0,
		damping_factor: 0.9,
	}
}

fn base_size(kind: NodeType) -> f64 {
	match kind {
		NodeType::Customer => 1.4,
		NodeType::Employee => 1.3,
		NodeType::CustomerInactive => 0.6,
		_ => 0.8,
	}
}
