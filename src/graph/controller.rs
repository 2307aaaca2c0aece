//! View-mode orchestration.
//!
//! The controller is synchronous and ticket based. Every fetch it asks for is
//! described by a [`FetchTicket`] tagged with the generation it belongs to;
//! whoever runs the fetch hands the result back together with the ticket.
//! Switching mode (or refreshing) bumps the generation, so any response that
//! arrives afterwards for an older ticket is recognised as stale and dropped.
//!
//! Pointer hover is owned by the canvas, which runs [`compute_highlight`] and
//! the LOD table on its own copy of the edges every frame. The controller's
//! [`ViewModeController::highlight`] only reflects explicit
//! [`ViewModeController::focus_node`] calls.

use log::{debug, info, warn};
use serde_json::Value;

use super::centrality::{DegreeTable, compute_degrees};
use super::expansion::{ExpandRequest, ExpansionCache};
use super::forces::{self, ForceLayout};
use super::highlight::{HighlightSet, compute_highlight};
use super::lod;
use super::mode::{Focus, GraphRequest, ViewMode};
use super::store::GraphDataStore;
use super::types::{Edge, GraphPayload, GraphSnapshot, Node, NodeType, Position};
use crate::config::ExplorerConfig;
use crate::error::{ExplorerError, FetchError, Result};

/// Mode-level load state shown by the UI.
#[derive(Clone, Debug, Default, PartialEq)]
pub enum LoadStatus {
	#[default]
	Idle,
	Loading,
	Ready,
	/// Empty graph plus a message; the UI offers a retry.
	Failed(String),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TicketKind {
	/// Whole-graph load for the current mode.
	Mode,
	/// Subgraph for one employee in the roster view.
	Expansion(String),
}

/// An outstanding fetch, tagged with the state it was issued against.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FetchTicket {
	pub generation: u64,
	pub mode: ViewMode,
	pub kind: TicketKind,
	pub request: GraphRequest,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LoadOutcome {
	Applied,
	Failed,
	/// Issued before the last mode switch; discarded without merging.
	Stale,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ExpandAction {
	/// Cache hit; the visible graph was recomposed.
	Merged,
	Fetch(FetchTicket),
	InFlight,
	/// Not the roster view, or not an employee node.
	Ignored,
}

/// Everything the canvas needs to draw one revision of the graph.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ExplorerFrame {
	/// Bumped on every committed change.
	pub revision: u64,
	pub mode: ViewMode,
	pub snapshot: GraphSnapshot,
	pub layout: ForceLayout,
	pub degrees: DegreeTable,
	pub status: LoadStatus,
}

/// Tunables taken from [`ExplorerConfig`].
#[derive(Clone, Copy, Debug)]
pub struct ControllerSettings {
	pub expansion_capacity: usize,
	pub dangling_edge_limit: usize,
}

impl Default for ControllerSettings {
	fn default() -> Self {
		Self {
			expansion_capacity: super::expansion::DEFAULT_EXPANSION_CAPACITY,
			dangling_edge_limit: super::store::DEFAULT_DANGLING_EDGE_LIMIT,
		}
	}
}

pub struct ViewModeController {
	focus: Focus,
	mode: ViewMode,
	generation: u64,
	revision: u64,
	store: GraphDataStore,
	/// Roster payload the expansions are layered on.
	base: (Vec<Node>, Vec<Edge>),
	degrees: DegreeTable,
	layout: ForceLayout,
	highlight: HighlightSet,
	expansion: ExpansionCache,
	status: LoadStatus,
	insights: Option<Value>,
	employee_insights: Option<(String, Value)>,
}

impl ViewModeController {
	pub fn new(focus: Focus, initial_mode: ViewMode, settings: ControllerSettings) -> Self {
		Self {
			focus,
			mode: initial_mode,
			generation: 0,
			revision: 0,
			store: GraphDataStore::new(settings.dangling_edge_limit),
			base: (Vec::new(), Vec::new()),
			degrees: DegreeTable::default(),
			layout: ForceLayout::default(),
			highlight: HighlightSet::default(),
			expansion: ExpansionCache::new(settings.expansion_capacity),
			status: LoadStatus::Idle,
			insights: None,
			employee_insights: None,
		}
	}

	pub fn from_config(config: &ExplorerConfig) -> Self {
		Self::new(
			config.focus(),
			config.initial_mode,
			ControllerSettings {
				expansion_capacity: config.expansion_capacity,
				dangling_edge_limit: config.dangling_edge_limit,
			},
		)
	}

	/// First load for the initial mode.
	pub fn start(&mut self) -> Result<FetchTicket> {
		self.switch_mode(self.mode)
	}

	/// Discard graph, highlight and expansions, then ask for the new mode's graph.
	pub fn switch_mode(&mut self, mode: ViewMode) -> Result<FetchTicket> {
		info!("crm-graph: switching to {} view", mode);
		self.mode = mode;
		self.generation += 1;
		self.store.clear();
		self.base = (Vec::new(), Vec::new());
		self.highlight = HighlightSet::default();
		self.expansion.reset();
		self.insights = None;
		self.employee_insights = None;

		let request = GraphRequest::for_mode(mode, &self.focus);
		self.status = match request {
			Some(_) => LoadStatus::Loading,
			None => LoadStatus::Failed(ExplorerError::MissingFocus(mode).to_string()),
		};
		self.recompute();

		let request = request.ok_or(ExplorerError::MissingFocus(mode))?;
		Ok(self.ticket(TicketKind::Mode, request))
	}

	/// Reload the current mode from scratch.
	pub fn refresh(&mut self) -> Result<FetchTicket> {
		self.switch_mode(self.mode)
	}

	/// Point the explorer at another customer/employee. Takes effect on the next load.
	pub fn set_focus(&mut self, focus: Focus) {
		self.focus = focus;
	}

	pub fn is_current(&self, ticket: &FetchTicket) -> bool {
		ticket.generation == self.generation && ticket.mode == self.mode
	}

	pub fn complete_load(
		&mut self,
		ticket: &FetchTicket,
		result: std::result::Result<GraphPayload, FetchError>,
	) -> LoadOutcome {
		if !self.is_current(ticket) || ticket.kind != TicketKind::Mode {
			debug!("crm-graph: dropping stale {:?} response", ticket.request);
			return LoadOutcome::Stale;
		}

		match result {
			Ok(payload) => {
				info!(
					"crm-graph: loaded {} nodes, {} edges for {} view",
					payload.nodes.len(),
					payload.edges.len(),
					self.mode
				);
				self.insights = payload.insights;
				if self.mode == ViewMode::AllEmployees {
					self.base = (payload.nodes.clone(), payload.edges.clone());
				}
				self.store.replace(payload.nodes, payload.edges);
				self.status = LoadStatus::Ready;
				self.recompute();
				LoadOutcome::Applied
			}
			Err(e) => {
				warn!("crm-graph: failed to load {} view: {}", self.mode, e);
				self.store.clear();
				self.status = LoadStatus::Failed(e.to_string());
				self.recompute();
				LoadOutcome::Failed
			}
		}
	}

	/// Click on a node. Only employee nodes in the roster view expand.
	pub fn request_expand(&mut self, employee_id: &str) -> ExpandAction {
		if self.mode != ViewMode::AllEmployees || self.status != LoadStatus::Ready {
			return ExpandAction::Ignored;
		}
		if self.store.node(employee_id).map(|n| n.kind) != Some(NodeType::Employee) {
			return ExpandAction::Ignored;
		}

		match self.expansion.request_expand(employee_id) {
			ExpandRequest::Hit => {
				self.publish_employee_insights(employee_id);
				self.recompose();
				ExpandAction::Merged
			}
			ExpandRequest::Fetch => {
				debug!("crm-graph: expanding {}", employee_id);
				let request = GraphRequest::EmployeeCustomers(employee_id.to_string());
				ExpandAction::Fetch(self.ticket(TicketKind::Expansion(employee_id.to_string()), request))
			}
			ExpandRequest::InFlight => ExpandAction::InFlight,
		}
	}

	pub fn complete_expand(
		&mut self,
		ticket: &FetchTicket,
		result: std::result::Result<GraphPayload, FetchError>,
	) -> LoadOutcome {
		let TicketKind::Expansion(employee_id) = &ticket.kind else {
			return LoadOutcome::Stale;
		};
		if !self.is_current(ticket) {
			debug!("crm-graph: dropping stale expansion for {}", employee_id);
			return LoadOutcome::Stale;
		}

		match self.expansion.complete_fetch(employee_id, result) {
			Ok(evicted) => {
				if let Some(evicted) = evicted {
					info!("crm-graph: collapsed {} to stay within expansion limit", evicted);
				}
				self.publish_employee_insights(employee_id);
				self.recompose();
				LoadOutcome::Applied
			}
			Err(e) => {
				warn!("crm-graph: failed to expand {}: {}", employee_id, e);
				LoadOutcome::Failed
			}
		}
	}

	/// Engine write-back, so a recomposed graph keeps the layout on screen.
	///
	/// Positions are stored on the nodes without bumping the revision; unknown
	/// ids are ignored.
	pub fn record_positions(&mut self, positions: &[(String, Position)]) {
		self.store
			.record_positions(positions.iter().map(|(id, p)| (id.as_str(), *p)));
	}

	/// Replace the highlight with the neighborhood of `node_id`.
	pub fn focus_node(&mut self, node_id: Option<&str>) -> &HighlightSet {
		self.highlight = compute_highlight(node_id, self.store.renderable_edges());
		&self.highlight
	}

	pub fn show_label(&self, node_id: &str, zoom: f64) -> bool {
		let kind = self.store.node(node_id).map(|n| n.kind).unwrap_or_default();
		lod::should_show_label(kind, self.mode, zoom, self.highlight.is_emphasized(node_id))
	}

	pub fn frame(&self) -> ExplorerFrame {
		ExplorerFrame {
			revision: self.revision,
			mode: self.mode,
			snapshot: self.store.snapshot(),
			layout: self.layout.clone(),
			degrees: self.degrees.clone(),
			status: self.status.clone(),
		}
	}

	pub fn mode(&self) -> ViewMode {
		self.mode
	}

	pub fn status(&self) -> &LoadStatus {
		&self.status
	}

	pub fn store(&self) -> &GraphDataStore {
		&self.store
	}

	pub fn degrees(&self) -> &DegreeTable {
		&self.degrees
	}

	pub fn layout(&self) -> &ForceLayout {
		&self.layout
	}

	pub fn highlight(&self) -> &HighlightSet {
		&self.highlight
	}

	pub fn expansion(&self) -> &ExpansionCache {
		&self.expansion
	}

	/// Aggregate metrics of the last mode-level load.
	pub fn insights(&self) -> Option<&Value> {
		self.insights.as_ref()
	}

	/// Metrics of the most recently expanded (or re-clicked) employee.
	pub fn employee_insights(&self) -> Option<(&str, &Value)> {
		self.employee_insights
			.as_ref()
			.map(|(id, value)| (id.as_str(), value))
	}

	fn ticket(&self, kind: TicketKind, request: GraphRequest) -> FetchTicket {
		FetchTicket {
			generation: self.generation,
			mode: self.mode,
			kind,
			request,
		}
	}

	fn publish_employee_insights(&mut self, employee_id: &str) {
		self.employee_insights = self
			.expansion
			.entry(employee_id)
			.and_then(|entry| entry.insights.clone())
			.map(|insights| (employee_id.to_string(), insights));
	}

	/// Visible graph = roster base plus every active expansion.
	fn recompose(&mut self) {
		let positions = self.store.positions();
		self.store.replace(self.base.0.clone(), self.base.1.clone());
		for entry in self.expansion.active() {
			self.store.merge(entry.nodes.clone(), entry.edges.clone());
		}
		self.store
			.record_positions(positions.iter().map(|(id, p)| (id.as_str(), *p)));
		self.recompute();
	}

	fn recompute(&mut self) {
		self.degrees = compute_degrees(self.store.renderable_edges());
		self.layout = forces::layout(self.mode, &self.store, &self.degrees);
		let focused = self.highlight.focused.clone();
		self.highlight = compute_highlight(focused.as_deref(), self.store.renderable_edges());
		self.revision += 1;
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	fn focus() -> Focus {
		Focus {
			customer_id: Some("C1".into()),
			employee_id: Some("E1".into()),
		}
	}

	fn controller(mode: ViewMode) -> ViewModeController {
		ViewModeController::new(focus(), mode, ControllerSettings::default())
	}

	#[test]
	fn test_missing_focus_fails_mode() {
		let mut c = ViewModeController::new(Focus::default(), ViewMode::Customer, ControllerSettings::default());
		let err = c.start().unwrap_err();
		assert!(matches!(err, ExplorerError::MissingFocus(ViewMode::Customer)));
		assert!(matches!(c.status(), LoadStatus::Failed(_)));

		// The roster needs no focal id.
		assert!(c.switch_mode(ViewMode::AllEmployees).is_ok());
		assert_eq!(c.status(), &LoadStatus::Loading);
	}

	#[test]
	fn test_fetch_failure_leaves_empty_graph_with_error() {
		let mut c = controller(ViewMode::Customer);
		let ticket = c.start().unwrap();
		let outcome = c.complete_load(&ticket, Err(FetchError::Remote("boom".into())));
		assert_eq!(outcome, LoadOutcome::Failed);
		assert!(c.store().is_empty());
		assert_eq!(c.status(), &LoadStatus::Failed("data source reported: boom".into()));
	}

	#[test]
	fn test_expand_ignored_outside_roster() {
		let mut c = controller(ViewMode::AllCustomers);
		let ticket = c.start().unwrap();
		let payload = GraphPayload::new(vec![Node::new("E1", NodeType::Employee)], vec![]);
		c.complete_load(&ticket, Ok(payload));
		assert_eq!(c.request_expand("E1"), ExpandAction::Ignored);
	}

	#[test]
	fn test_mode_ticket_cannot_complete_expansion() {
		let mut c = controller(ViewMode::AllEmployees);
		let ticket = c.start().unwrap();
		assert_eq!(c.complete_expand(&ticket, Ok(GraphPayload::default())), LoadOutcome::Stale);
	}

	#[test]
	fn test_recorded_positions_survive_expansion() {
		let mut c = controller(ViewMode::AllEmployees);
		let ticket = c.start().unwrap();
		let roster = GraphPayload::new(
			vec![Node::new("E1", NodeType::Employee), Node::new("E2", NodeType::Employee)],
			vec![],
		);
		c.complete_load(&ticket, Ok(roster));

		let revision = c.frame().revision;
		c.record_positions(&[
			("E2".to_string(), Position { x: 12.0, y: -3.0 }),
			("ghost".to_string(), Position { x: 1.0, y: 1.0 }),
		]);
		assert_eq!(c.frame().revision, revision);

		let ExpandAction::Fetch(ticket) = c.request_expand("E1") else {
			panic!("expected a fetch");
		};
		let subgraph = GraphPayload::new(
			vec![Node::new("E1", NodeType::Employee), Node::new("C9", NodeType::Customer)],
			vec![Edge::new("e", "E1", "C9")],
		);
		c.complete_expand(&ticket, Ok(subgraph));

		let frame = c.frame();
		let e2 = frame.snapshot.nodes.iter().find(|n| n.id == "E2").unwrap();
		assert_eq!(e2.position, Some(Position { x: 12.0, y: -3.0 }));
		assert!(!c.store().contains_node("ghost"));
	}

	#[test]
	fn test_revision_advances_on_commit() {
		let mut c = controller(ViewMode::Customer);
		let before = c.frame().revision;
		let ticket = c.start().unwrap();
		c.complete_load(&ticket, Ok(GraphPayload::default()));
		assert!(c.frame().revision > before);
		assert_eq!(c.frame().status, LoadStatus::Ready);
	}
}
