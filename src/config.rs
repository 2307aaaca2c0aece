//! Explorer configuration.
//!
//! Read from an inline `<script id="explorer-config" type="application/json">`
//! element placed by the surrounding CRM page. Every field is optional.

use serde::Deserialize;

use crate::graph::expansion::DEFAULT_EXPANSION_CAPACITY;
use crate::graph::store::DEFAULT_DANGLING_EDGE_LIMIT;
use crate::graph::{Focus, ViewMode};

/// Top-level explorer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ExplorerConfig {
	/// Base URL of the graph endpoints (default: "/api").
	#[serde(default = "default_api_base")]
	pub api_base: String,

	/// Mode shown on first load.
	#[serde(default)]
	pub initial_mode: ViewMode,

	/// Customer the single-entity view centers on.
	#[serde(default)]
	pub focal_customer: Option<String>,

	/// Employee whose customers the all-customers view lists.
	#[serde(default)]
	pub focal_employee: Option<String>,

	/// Maximum number of simultaneously expanded employees.
	#[serde(default = "default_expansion_capacity")]
	pub expansion_capacity: usize,

	/// Dangling edges retained before they are pruned.
	#[serde(default = "default_dangling_edge_limit")]
	pub dangling_edge_limit: usize,

	/// Visual theme name: "default", "midnight" or "minimal".
	#[serde(default = "default_theme")]
	pub theme: String,
}

impl Default for ExplorerConfig {
	fn default() -> Self {
		Self {
			api_base: default_api_base(),
			initial_mode: ViewMode::default(),
			focal_customer: None,
			focal_employee: None,
			expansion_capacity: default_expansion_capacity(),
			dangling_edge_limit: default_dangling_edge_limit(),
			theme: default_theme(),
		}
	}
}

impl ExplorerConfig {
	pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
		serde_json::from_str(json)
	}

	pub fn focus(&self) -> Focus {
		Focus {
			customer_id: self.focal_customer.clone(),
			employee_id: self.focal_employee.clone(),
		}
	}
}

fn default_api_base() -> String {
	"/api".to_string()
}

fn default_expansion_capacity() -> usize {
	DEFAULT_EXPANSION_CAPACITY
}

fn default_dangling_edge_limit() -> usize {
	DEFAULT_DANGLING_EDGE_LIMIT
}

fn default_theme() -> String {
	"default".to_string()
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_empty_object_uses_defaults() {
		let config = ExplorerConfig::from_json("{}").unwrap();
		assert_eq!(config.api_base, "/api");
		assert_eq!(config.initial_mode, ViewMode::Customer);
		assert_eq!(config.expansion_capacity, 5);
		assert_eq!(config.dangling_edge_limit, 512);
		assert_eq!(config.theme, "default");
		assert_eq!(config.focus(), Focus::default());
	}

	#[test]
	fn test_overrides() {
		let config = ExplorerConfig::from_json(
			r#"{
				"api_base": "https://crm.example.com/api",
				"initial_mode": "all-employees",
				"focal_customer": "C1",
				"expansion_capacity": 3
			}"#,
		)
		.unwrap();
		assert_eq!(config.initial_mode, ViewMode::AllEmployees);
		assert_eq!(config.expansion_capacity, 3);
		assert_eq!(config.focus().customer_id.as_deref(), Some("C1"));
		assert_eq!(config.focus().employee_id, None);
	}
}
