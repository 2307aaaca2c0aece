//! Relationship graph core: data store, derived metrics and interaction policy.
//!
//! Everything here is plain Rust with no browser dependency except
//! [`source::HttpSource`], so it can be exercised by host tests. The canvas
//! component in [`crate::components`] plays the force engine and renderer.

pub mod centrality;
pub mod controller;
pub mod expansion;
pub mod forces;
pub mod highlight;
pub mod lod;
pub mod mode;
pub mod source;
pub mod store;
pub mod types;

pub use centrality::{DegreeTable, compute_degrees};
pub use controller::{
	ExpandAction, ExplorerFrame, FetchTicket, LoadOutcome, LoadStatus, TicketKind, ViewModeController,
};
pub use forces::{ForceLayout, NodeForces, RadialForce};
pub use highlight::{HighlightSet, compute_highlight};
pub use mode::{Focus, GraphRequest, ViewMode};
pub use source::{GraphSource, HttpSource};
pub use store::GraphDataStore;
pub use types::{Edge, GraphPayload, GraphSnapshot, Node, NodeType, Position};
