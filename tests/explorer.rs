//! Explorer behavior driven through the public controller API.

use crm_graph::graph::controller::ControllerSettings;
use crm_graph::graph::{
	Edge, ExpandAction, FetchTicket, Focus, GraphDataStore, GraphPayload, LoadOutcome, LoadStatus,
	Node, NodeType, ViewMode, ViewModeController, compute_degrees,
};
use crm_graph::{ExplorerConfig, FetchError};
use serde_json::json;

fn focus() -> Focus {
	Focus {
		customer_id: Some("C1".into()),
		employee_id: Some("E1".into()),
	}
}

fn controller(mode: ViewMode) -> ViewModeController {
	ViewModeController::new(focus(), mode, ControllerSettings::default())
}

fn fetch_ticket(action: ExpandAction) -> FetchTicket {
	match action {
		ExpandAction::Fetch(ticket) => ticket,
		other => panic!("expected a fetch, got {other:?}"),
	}
}

fn roster(count: usize) -> GraphPayload {
	let nodes = (1..=count)
		.map(|i| Node::new(format!("E{i}"), NodeType::Employee))
		.collect();
	GraphPayload::new(nodes, Vec::new())
}

/// Subgraph of one employee: a private customer plus a customer everyone shares.
fn employee_subgraph(employee_id: &str) -> GraphPayload {
	let own = format!("{employee_id}-C");
	GraphPayload::new(
		vec![
			Node::new(employee_id, NodeType::Employee),
			Node::new(own.clone(), NodeType::Customer),
			Node::new("SHARED", NodeType::Customer),
		],
		vec![
			Edge::new(format!("{employee_id}-own"), employee_id, own),
			Edge::new(format!("{employee_id}-shared"), employee_id, "SHARED"),
		],
	)
}

fn roster_controller(count: usize) -> ViewModeController {
	let mut c = controller(ViewMode::AllEmployees);
	let ticket = c.start().unwrap();
	assert_eq!(c.complete_load(&ticket, Ok(roster(count))), LoadOutcome::Applied);
	c
}

#[test]
fn test_single_customer_end_to_end() {
	let mut c = controller(ViewMode::Customer);
	let ticket = c.start().unwrap();
	assert_eq!(ticket.request.path(), "/graph/customer/C1");

	let payload = GraphPayload::from_json(
		r#"{
			"nodes": [{"id": "C1", "type": "customer"}, {"id": "E1", "type": "employee"}],
			"edges": [{"id": "e1", "sourceId": "C1", "targetId": "E1", "label": "managed_by"}]
		}"#,
	)
	.unwrap();
	assert_eq!(c.complete_load(&ticket, Ok(payload)), LoadOutcome::Applied);

	assert_eq!(c.degrees().get("C1"), 1);
	assert_eq!(c.degrees().get("E1"), 1);

	let highlight = c.focus_node(Some("C1")).clone();
	assert_eq!(highlight.nodes.len(), 2);
	assert!(highlight.nodes.contains("C1") && highlight.nodes.contains("E1"));
	assert_eq!(highlight.edges.len(), 1);
	assert!(highlight.edges.contains("e1"));

	// Clear the focus so the always-show rule is what keeps the labels.
	c.focus_node(None);
	assert!(c.show_label("C1", 0.1));
	assert!(c.show_label("E1", 0.1));

	let frame = c.frame();
	assert_eq!(frame.status, LoadStatus::Ready);
	assert_eq!(frame.snapshot.nodes.len(), 2);
	assert_eq!(frame.layout.node("C1").map(|f| f.charge), Some(-300.0));
	assert_eq!(frame.layout.link_distance("e1"), Some(60.0));
}

#[test]
fn test_merge_twice_is_idempotent() {
	let payload = employee_subgraph("E1");
	let mut store = GraphDataStore::default();
	store.merge(payload.nodes.clone(), payload.edges.clone());
	let (nodes, edges) = (store.node_count(), store.edge_count());

	store.merge(payload.nodes, payload.edges);
	assert_eq!(store.node_count(), nodes);
	assert_eq!(store.edge_count(), edges);
}

#[test]
fn test_triangle_degrees() {
	let edges = [
		Edge::new("ab", "A", "B"),
		Edge::new("ac", "A", "C"),
		Edge::new("bc", "B", "C"),
	];
	let degrees = compute_degrees(&edges);
	for id in ["A", "B", "C"] {
		assert_eq!(degrees.get(id), 2);
	}
	assert_eq!(degrees.get("D"), 0);
}

#[test]
fn test_expansion_keeps_five_most_recent() {
	let mut c = roster_controller(6);
	for i in 1..=6 {
		let id = format!("E{i}");
		let ticket = fetch_ticket(c.request_expand(&id));
		assert_eq!(
			c.complete_expand(&ticket, Ok(employee_subgraph(&id))),
			LoadOutcome::Applied
		);
	}

	assert_eq!(c.expansion().len(), 5);
	assert_eq!(c.expansion().active_ids(), vec!["E2", "E3", "E4", "E5", "E6"]);
	// The roster node itself stays; only its expansion is gone.
	assert!(c.store().contains_node("E1"));
	assert!(!c.store().contains_node("E1-C"));
	assert!(!c.store().contains_edge("E1-own"));
	assert!(c.store().contains_node("E6-C"));
	assert!(c.store().contains_node("SHARED"));
}

#[test]
fn test_reclick_moves_employee_to_back() {
	let mut c = roster_controller(6);
	for i in 1..=5 {
		let id = format!("E{i}");
		let ticket = fetch_ticket(c.request_expand(&id));
		c.complete_expand(&ticket, Ok(employee_subgraph(&id)));
	}

	assert_eq!(c.request_expand("E1"), ExpandAction::Merged);
	let ticket = fetch_ticket(c.request_expand("E6"));
	c.complete_expand(&ticket, Ok(employee_subgraph("E6")));

	assert!(c.store().contains_node("E1-C"));
	assert!(!c.store().contains_node("E2-C"));
}

#[test]
fn test_duplicate_click_while_fetching() {
	let mut c = roster_controller(2);
	let _ticket = fetch_ticket(c.request_expand("E1"));
	assert_eq!(c.request_expand("E1"), ExpandAction::InFlight);
}

#[test]
fn test_failed_expansion_can_be_retried() {
	let mut c = roster_controller(2);
	let before = c.frame().snapshot;

	let ticket = fetch_ticket(c.request_expand("E1"));
	assert_eq!(
		c.complete_expand(&ticket, Err(FetchError::Status(500))),
		LoadOutcome::Failed
	);
	assert_eq!(c.frame().snapshot, before);
	assert_eq!(c.status(), &LoadStatus::Ready);

	let ticket = fetch_ticket(c.request_expand("E1"));
	assert_eq!(
		c.complete_expand(&ticket, Ok(employee_subgraph("E1"))),
		LoadOutcome::Applied
	);
	assert!(c.store().contains_node("E1-C"));
}

#[test]
fn test_response_after_mode_switch_is_discarded() {
	let mut c = controller(ViewMode::Customer);
	let customer_ticket = c.start().unwrap();
	let roster_ticket = c.switch_mode(ViewMode::AllEmployees).unwrap();

	let late = GraphPayload::new(vec![Node::new("C1", NodeType::Customer)], Vec::new());
	assert_eq!(c.complete_load(&customer_ticket, Ok(late)), LoadOutcome::Stale);
	assert!(c.store().is_empty());
	assert_eq!(c.status(), &LoadStatus::Loading);

	c.complete_load(&roster_ticket, Ok(roster(2)));
	assert!(!c.store().contains_node("C1"));
	assert_eq!(c.store().node_count(), 2);
}

#[test]
fn test_expansion_after_mode_switch_is_discarded() {
	let mut c = roster_controller(2);
	let ticket = fetch_ticket(c.request_expand("E1"));
	let customer_ticket = c.switch_mode(ViewMode::Customer).unwrap();
	c.complete_load(
		&customer_ticket,
		Ok(GraphPayload::new(vec![Node::new("C1", NodeType::Customer)], Vec::new())),
	);

	assert_eq!(
		c.complete_expand(&ticket, Ok(employee_subgraph("E1"))),
		LoadOutcome::Stale
	);
	assert!(!c.store().contains_node("E1-C"));
	assert!(c.expansion().is_empty());
}

#[test]
fn test_refresh_supersedes_outstanding_load() {
	let mut c = controller(ViewMode::AllCustomers);
	let first = c.start().unwrap();
	let second = c.refresh().unwrap();
	assert!(!c.is_current(&first));
	assert!(c.is_current(&second));
	assert_eq!(c.complete_load(&first, Ok(roster(1))), LoadOutcome::Stale);
}

#[test]
fn test_highlighted_labels_show_at_zero_zoom() {
	for mode in ViewMode::ALL {
		let mut c = controller(mode);
		let ticket = c.start().unwrap();
		c.complete_load(
			&ticket,
			Ok(GraphPayload::new(
				vec![
					Node::new("E1", NodeType::Employee),
					Node::new("S1", NodeType::SalesActivity),
					Node::new("X1", NodeType::CustomerInactive),
				],
				vec![Edge::new("s", "E1", "S1"), Edge::new("x", "S1", "X1")],
			)),
		);

		assert!(!c.show_label("S1", 0.0), "{mode}");
		c.focus_node(Some("S1"));
		for id in ["E1", "S1", "X1"] {
			assert!(c.show_label(id, 0.0), "{mode} {id}");
		}
	}
}

#[test]
fn test_dangling_edge_appears_once_endpoint_arrives() {
	let mut c = controller(ViewMode::AllEmployees);
	let ticket = c.start().unwrap();
	c.complete_load(
		&ticket,
		Ok(GraphPayload::new(
			vec![Node::new("E1", NodeType::Employee)],
			vec![Edge::new("late", "E1", "E1-C")],
		)),
	);
	assert!(c.frame().snapshot.edges.is_empty());
	assert_eq!(c.degrees().get("E1"), 0);

	let ticket = fetch_ticket(c.request_expand("E1"));
	c.complete_expand(
		&ticket,
		Ok(GraphPayload::new(vec![Node::new("E1-C", NodeType::Customer)], Vec::new())),
	);
	let frame = c.frame();
	assert!(frame.snapshot.edges.iter().any(|e| e.id == "late"));
	assert_eq!(frame.degrees.get("E1"), 1);
}

#[test]
fn test_remote_error_fails_the_mode() {
	let mut c = controller(ViewMode::Customer);
	let ticket = c.start().unwrap();
	let result = GraphPayload::from_json(r#"{"error": "customer not found"}"#);
	assert_eq!(c.complete_load(&ticket, result), LoadOutcome::Failed);
	assert!(c.frame().snapshot.nodes.is_empty());
	assert!(matches!(c.status(), LoadStatus::Failed(msg) if msg.contains("customer not found")));

	// Manual retry issues a fresh load.
	let retry = c.refresh().unwrap();
	assert_eq!(c.status(), &LoadStatus::Loading);
	assert!(c.is_current(&retry));
}

#[test]
fn test_insights_pass_through() {
	let mut c = roster_controller(1);
	let ticket = fetch_ticket(c.request_expand("E1"));
	let mut payload = employee_subgraph("E1");
	payload.insights = Some(json!({"total_customers": 2}));
	c.complete_expand(&ticket, Ok(payload));

	let (id, insights) = c.employee_insights().unwrap();
	assert_eq!(id, "E1");
	assert_eq!(insights["total_customers"], 2);
}

#[test]
fn test_controller_from_config() {
	let config = ExplorerConfig::from_json(
		r#"{"initial_mode": "all-employees", "expansion_capacity": 2}"#,
	)
	.unwrap();
	let mut c = ViewModeController::from_config(&config);
	assert_eq!(c.mode(), ViewMode::AllEmployees);
	assert_eq!(c.expansion().capacity(), 2);

	let ticket = c.start().unwrap();
	c.complete_load(&ticket, Ok(roster(3)));
	for id in ["E1", "E2", "E3"] {
		let ticket = fetch_ticket(c.request_expand(id));
		c.complete_expand(&ticket, Ok(employee_subgraph(id)));
	}
	assert_eq!(c.expansion().active_ids(), vec!["E2", "E3"]);
}
