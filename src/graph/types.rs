//! Node/edge records exchanged with the data source and the canvas.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::FetchError;

/// Display type of a node. Drives physics and label policy.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
	Customer,
	Employee,
	SalesActivity,
	Revenue,
	CustomerInactive,
	/// Anything the data source sends that we do not recognise.
	#[default]
	#[serde(other)]
	Other,
}

/// World-space position, owned by the force engine once placed.
#[derive(Clone, Copy, Debug, PartialEq, Deserialize, Serialize)]
pub struct Position {
	pub x: f64,
	pub y: f64,
}

/// A vertex of the relationship graph.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct Node {
	pub id: String,
	/// Display label; may span several lines.
	#[serde(default)]
	pub label: String,
	#[serde(rename = "type", default)]
	pub kind: NodeType,
	/// Opaque display metadata. Never inspected by graph logic.
	#[serde(default)]
	pub properties: Map<String, Value>,
	#[serde(default)]
	pub size: Option<f64>,
	#[serde(default)]
	pub color: Option<String>,
	/// Set by the engine; passed through untouched otherwise.
	#[serde(default)]
	pub position: Option<Position>,
}

impl Node {
	pub fn new(id: impl Into<String>, kind: NodeType) -> Self {
		let id = id.into();
		Self {
			label: id.clone(),
			id,
			kind,
			properties: Map::new(),
			size: None,
			color: None,
			position: None,
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}
}

/// A connection between two nodes.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Edge {
	pub id: String,
	#[serde(alias = "source")]
	pub source_id: String,
	#[serde(alias = "target")]
	pub target_id: String,
	#[serde(default)]
	pub label: String,
	#[serde(default)]
	pub properties: Map<String, Value>,
}

impl Edge {
	pub fn new(id: impl Into<String>, source: impl Into<String>, target: impl Into<String>) -> Self {
		Self {
			id: id.into(),
			source_id: source.into(),
			target_id: target.into(),
			label: String::new(),
			properties: Map::new(),
		}
	}

	pub fn with_label(mut self, label: impl Into<String>) -> Self {
		self.label = label.into();
		self
	}

	/// True when `node_id` is either endpoint.
	pub fn touches(&self, node_id: &str) -> bool {
		self.source_id == node_id || self.target_id == node_id
	}
}

/// Response body of the graph endpoints.
///
/// `insights` is an aggregate-metrics object passed through to display code.
/// A present `error` turns the whole response into a failed fetch.
#[derive(Clone, Debug, Default, Deserialize, Serialize)]
pub struct GraphPayload {
	#[serde(default)]
	pub nodes: Vec<Node>,
	#[serde(default)]
	pub edges: Vec<Edge>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub insights: Option<Value>,
	#[serde(default, skip_serializing_if = "Option::is_none")]
	pub error: Option<String>,
}

impl GraphPayload {
	pub fn new(nodes: Vec<Node>, edges: Vec<Edge>) -> Self {
		Self {
			nodes,
			edges,
			..Self::default()
		}
	}

	/// Parse a response body, mapping an `error` field to [`FetchError::Remote`].
	pub fn from_json(body: &str) -> Result<Self, FetchError> {
		let payload: GraphPayload = serde_json::from_str(body)?;
		payload.into_result()
	}

	pub fn into_result(self) -> Result<Self, FetchError> {
		match self.error {
			Some(message) => Err(FetchError::Remote(message)),
			None => Ok(self),
		}
	}
}

/// Owned copy of the renderable graph handed to the canvas.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct GraphSnapshot {
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_node_type_defaults_to_other() {
		let node: Node = serde_json::from_str(r#"{"id": "x"}"#).unwrap();
		assert_eq!(node.kind, NodeType::Other);

		let node: Node = serde_json::from_str(r#"{"id": "x", "type": "territory"}"#).unwrap();
		assert_eq!(node.kind, NodeType::Other);

		let node: Node =
			serde_json::from_str(r#"{"id": "x", "type": "customer_inactive"}"#).unwrap();
		assert_eq!(node.kind, NodeType::CustomerInactive);
	}

	#[test]
	fn test_edge_accepts_both_endpoint_spellings() {
		let a: Edge =
			serde_json::from_str(r#"{"id": "e1", "sourceId": "A", "targetId": "B"}"#).unwrap();
		let b: Edge = serde_json::from_str(r#"{"id": "e1", "source": "A", "target": "B"}"#).unwrap();
		assert_eq!(a, b);
	}

	#[test]
	fn test_payload_error_field_is_a_failure() {
		let err = GraphPayload::from_json(r#"{"error": "customer not found"}"#).unwrap_err();
		assert!(matches!(err, FetchError::Remote(ref m) if m == "customer not found"));
	}

	#[test]
	fn test_payload_keeps_insights_opaque() {
		let payload = GraphPayload::from_json(
			r#"{"nodes": [{"id": "C1", "type": "customer"}], "edges": [], "insights": {"revenue": 1200}}"#,
		)
		.unwrap();
		assert_eq!(payload.nodes.len(), 1);
		assert_eq!(payload.insights, Some(serde_json::json!({"revenue": 1200})));
	}

	#[test]
	fn test_malformed_payload_is_decode_error() {
		let err = GraphPayload::from_json("{nodes: ").unwrap_err();
		assert!(matches!(err, FetchError::Decode(_)));
	}
}
