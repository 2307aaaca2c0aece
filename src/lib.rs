//! crm-graph: Interactive relationship graph explorer for CRM pages.
//!
//! This crate provides a WASM-based explorer that fetches customer and
//! employee relationship graphs from the CRM backend and renders them with
//! physics-based layout, per-mode force tuning, neighbor highlighting,
//! zoom-dependent labels and on-demand expansion of employee subgraphs.
//!
//! The graph model in [`graph`] is plain Rust and has no browser
//! dependencies apart from [`graph::HttpSource`]; the Leptos components in
//! [`components`] drive it.

use leptos::prelude::*;
use leptos_meta::*;
use log::{Level, info, warn};
use wasm_bindgen::JsCast;
use web_sys::{HtmlScriptElement, Window};

pub mod components;
pub mod config;
pub mod error;
pub mod graph;

pub use components::explorer::RelationshipExplorer;
pub use components::force_graph::{ForceGraphCanvas, Theme};
pub use config::ExplorerConfig;
pub use error::{ExplorerError, FetchError};

/// Initialize logging and panic hooks for the WASM target.
pub fn init_logging() {
	let _ = console_log::init_with_level(Level::Debug);
	console_error_panic_hook::set_once();
	info!("crm-graph: logging initialized");
}

/// Load explorer settings from a script element with id="explorer-config".
/// Expected format: JSON object, every field optional.
fn load_explorer_config() -> Option<ExplorerConfig> {
	let window: Window = web_sys::window()?;
	let document = window.document()?;
	let element = document.get_element_by_id("explorer-config")?;
	let script: HtmlScriptElement = element.dyn_into().ok()?;
	let json_text = script.text().ok()?;

	match ExplorerConfig::from_json(&json_text) {
		Ok(config) => {
			info!(
				"crm-graph: explorer configured for {} view against {}",
				config.initial_mode, config.api_base
			);
			Some(config)
		}
		Err(e) => {
			warn!("crm-graph: failed to parse explorer config: {}", e);
			None
		}
	}
}

/// Main application component.
/// Reads the explorer configuration from the DOM and mounts the explorer.
#[component]
pub fn App() -> impl IntoView {
	provide_meta_context();

	let config = load_explorer_config().unwrap_or_default();

	view! {
		<Html attr:lang="en" attr:dir="ltr" attr:data-theme="dark" />
		<Title text="Relationship Explorer" />
		<Meta charset="UTF-8" />
		<Meta name="viewport" content="width=device-width, initial-scale=1.0" />

		<div class="fullscreen-graph">
			<RelationshipExplorer config=config />
			<div class="graph-overlay">
				<h1>"Relationships"</h1>
				<p class="subtitle">
					"Click an employee to expand their customers. Scroll to zoom. Drag background to pan."
				</p>
			</div>
		</div>
	}
}
