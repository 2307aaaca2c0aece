//! Force-directed relationship graph canvas.
//!
//! Renders an [`ExplorerFrame`](crate::graph::ExplorerFrame) on an HTML canvas with:
//! - Physics-based node positioning, tuned per node by the explorer's force layout
//! - Pan, zoom, node dragging and click-to-select interactions
//! - Smooth neighbor highlight transitions on hover
//! - Zoom-dependent label visibility and configurable theming
//!
//! # Example
//!
//! ```ignore
//! let frame = RwSignal::new(controller.frame());
//! let on_click = Callback::new(move |id: String| log::info!("clicked {id}"));
//!
//! view! { <ForceGraphCanvas frame=frame on_node_click=on_click fullscreen=true /> }
//! ```

mod component;
mod render;
pub mod scale;
mod state;
pub mod theme;

pub use component::ForceGraphCanvas;
pub use scale::ScaleConfig;
pub use theme::Theme;
