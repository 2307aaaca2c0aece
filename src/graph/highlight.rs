//! Neighbor highlighting for the focused (hovered or clicked) node.

use std::collections::HashSet;

use super::types::Edge;

/// Nodes and edges to emphasize. Replaced wholesale on every focus change.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighlightSet {
	pub focused: Option<String>,
	pub nodes: HashSet<String>,
	pub edges: HashSet<String>,
}

impl HighlightSet {
	/// A non-empty set means "dim everything else".
	pub fn is_active(&self) -> bool {
		!self.nodes.is_empty()
	}

	/// Highlighted or focused; such labels are always drawn.
	pub fn is_emphasized(&self, node_id: &str) -> bool {
		self.focused.as_deref() == Some(node_id) || self.nodes.contains(node_id)
	}
}

/// Single scan over `edges`; the focused node is always in the node set.
pub fn compute_highlight<'a>(
	focused: Option<&str>,
	edges: impl IntoIterator<Item = &'a Edge>,
) -> HighlightSet {
	let Some(focused) = focused else {
		return HighlightSet::default();
	};

	let mut set = HighlightSet {
		focused: Some(focused.to_string()),
		..HighlightSet::default()
	};
	set.nodes.insert(focused.to_string());

	for edge in edges {
		if edge.touches(focused) {
			set.edges.insert(edge.id.clone());
			set.nodes.insert(edge.source_id.clone());
			set.nodes.insert(edge.target_id.clone());
		}
	}
	set
}
