//! Error types for graph fetching and view-mode orchestration.

use thiserror::Error;

use crate::graph::ViewMode;

/// Failure of a single graph fetch.
///
/// All variants are resolved locally by the controller (empty graph or an
/// uncached expansion entry); none escape to the UI as panics.
#[derive(Error, Debug)]
pub enum FetchError {
	#[error("network error: {0}")]
	Network(String),

	#[error("unexpected HTTP status {0}")]
	Status(u16),

	#[error("data source reported: {0}")]
	Remote(String),

	#[error("malformed graph payload: {0}")]
	Decode(#[from] serde_json::Error),
}

/// Errors raised by the explorer itself.
#[derive(Error, Debug)]
pub enum ExplorerError {
	#[error("no focal entity configured for {0} mode")]
	MissingFocus(ViewMode),

	#[error(transparent)]
	Fetch(#[from] FetchError),
}

pub type Result<T> = std::result::Result<T, ExplorerError>;
