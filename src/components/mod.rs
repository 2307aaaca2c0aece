//! Leptos components.

pub mod explorer;
pub mod force_graph;
