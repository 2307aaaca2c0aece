//! The relationship explorer panel: mode switcher, graph canvas and insights.
//!
//! All graph state lives in a [`ViewModeController`]; this component only runs
//! the fetches it asks for and republishes its frame after every change.
//! Responses that arrive after a mode switch are rejected by the controller.

use leptos::prelude::*;
use leptos::task::spawn_local;
use log::{debug, warn};

use super::force_graph::{ForceGraphCanvas, Theme};
use crate::config::ExplorerConfig;
use crate::error::Result;
use crate::graph::{
	ExpandAction, ExplorerFrame, FetchTicket, GraphSource, HttpSource, LoadStatus, Position,
	ViewMode, ViewModeController,
};

/// Pretty-printed mode insights, followed by those of the last expanded employee.
fn insights_text(controller: &ViewModeController) -> Option<String> {
	let mut sections = Vec::new();
	if let Some(insights) = controller.insights() {
		sections.push(serde_json::to_string_pretty(insights).ok()?);
	}
	if let Some((employee_id, insights)) = controller.employee_insights() {
		let body = serde_json::to_string_pretty(insights).ok()?;
		sections.push(format!("{employee_id}:\n{body}"));
	}
	(!sections.is_empty()).then(|| sections.join("\n\n"))
}

/// Interactive relationship graph for one CRM page.
#[component]
pub fn RelationshipExplorer(config: ExplorerConfig) -> impl IntoView {
	let theme = Theme::by_name(&config.theme);
	let source = StoredValue::new(HttpSource::new(&config.api_base));
	let controller = StoredValue::new(ViewModeController::from_config(&config));
	let frame: RwSignal<ExplorerFrame> = RwSignal::new(controller.with_value(|c| c.frame()));
	let insights: RwSignal<Option<String>> = RwSignal::new(None);

	let publish = move || {
		controller.try_with_value(|c| {
			frame.set(c.frame());
			insights.set(insights_text(c));
		});
	};

	let load = move |ticket: Option<Result<FetchTicket>>| {
		publish();
		match ticket {
			Some(Ok(ticket)) => spawn_local(async move {
				let result = source.get_value().fetch(&ticket.request).await;
				controller.try_update_value(|c| c.complete_load(&ticket, result));
				publish();
			}),
			Some(Err(e)) => warn!("crm-graph: cannot load graph: {}", e),
			None => {}
		}
	};

	let switch_mode = move |mode: ViewMode| load(controller.try_update_value(|c| c.switch_mode(mode)));
	let refresh = move || load(controller.try_update_value(|c| c.refresh()));

	let on_layout = Callback::new(move |positions: Vec<(String, Position)>| {
		controller.try_update_value(|c| c.record_positions(&positions));
	});

	let on_node_click = Callback::new(move |node_id: String| {
		match controller.try_update_value(|c| c.request_expand(&node_id)) {
			Some(ExpandAction::Fetch(ticket)) => spawn_local(async move {
				let result = source.get_value().fetch(&ticket.request).await;
				controller.try_update_value(|c| c.complete_expand(&ticket, result));
				publish();
			}),
			Some(ExpandAction::Merged) => publish(),
			Some(ExpandAction::InFlight) => debug!("crm-graph: {} is still loading", node_id),
			_ => {}
		}
	});

	load(controller.try_update_value(|c| c.start()));

	let status_overlay = move || match frame.with(|f| f.status.clone()) {
		LoadStatus::Loading => Some(view! { <div class="explorer-status">"Loading..."</div> }.into_any()),
		LoadStatus::Failed(message) => Some(
			view! {
				<div class="explorer-status explorer-error">
					<p>{message}</p>
					<button on:click=move |_| refresh()>"Retry"</button>
				</div>
			}
			.into_any(),
		),
		LoadStatus::Ready if frame.with(|f| f.snapshot.nodes.is_empty()) => Some(
			view! {
				<div class="explorer-status">
					<p>"No relationships to show."</p>
					<button on:click=move |_| refresh()>"Refresh"</button>
				</div>
			}
			.into_any(),
		),
		LoadStatus::Idle | LoadStatus::Ready => None,
	};

	view! {
		<div class="relationship-explorer">
			<nav class="explorer-modes">
				{ViewMode::ALL
					.into_iter()
					.map(move |mode| {
						view! {
							<button
								class:active=move || frame.with(|f| f.mode == mode)
								on:click=move |_| switch_mode(mode)
							>
								{mode.title()}
							</button>
						}
					})
					.collect_view()}
				<button class="explorer-refresh" on:click=move |_| refresh()>
					"Refresh"
				</button>
			</nav>
			<div class="explorer-canvas">
				<ForceGraphCanvas
					frame=frame
					theme=theme
					on_node_click=on_node_click
					on_layout=on_layout
				/>
				{status_overlay}
			</div>
			<Show when=move || insights.with(Option::is_some)>
				<pre class="explorer-insights">{move || insights.get().unwrap_or_default()}</pre>
			</Show>
		</div>
	}
}
