//! Per-employee subgraph cache for the roster view.
//!
//! Each employee moves through `Uncached -> Fetching -> Cached`. Cached
//! entries live in a bounded queue; once it holds more than `capacity`
//! entries the front is evicted and its subgraph dropped. A cache hit moves
//! the employee to the back of the queue, so eviction is least-recently
//! requested first.

use std::collections::{HashMap, HashSet, VecDeque};

use log::debug;
use serde_json::Value;

use super::types::{Edge, GraphPayload, Node};
use crate::error::FetchError;

pub const DEFAULT_EXPANSION_CAPACITY: usize = 5;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpansionState {
	Uncached,
	Fetching,
	Cached,
}

/// What the caller has to do after [`ExpansionCache::request_expand`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExpandRequest {
	/// Already cached; the entry was touched. Nothing to fetch.
	Hit,
	/// Issue one fetch and report back through `complete_fetch`.
	Fetch,
	/// A fetch for this employee is already outstanding.
	InFlight,
}

#[derive(Clone, Debug)]
pub struct ExpansionEntry {
	pub employee_id: String,
	pub nodes: Vec<Node>,
	pub edges: Vec<Edge>,
	pub insights: Option<Value>,
	/// Monotonic order of the last insert or touch.
	pub inserted_at: u64,
}

#[derive(Debug)]
pub struct ExpansionCache {
	capacity: usize,
	entries: HashMap<String, ExpansionEntry>,
	/// Front is evicted first.
	queue: VecDeque<String>,
	fetching: HashSet<String>,
	next_order: u64,
}

impl Default for ExpansionCache {
	fn default() -> Self {
		Self::new(DEFAULT_EXPANSION_CAPACITY)
	}
}

impl ExpansionCache {
	pub fn new(capacity: usize) -> Self {
		Self {
			capacity: capacity.max(1),
			entries: HashMap::new(),
			queue: VecDeque::new(),
			fetching: HashSet::new(),
			next_order: 0,
		}
	}

	pub fn capacity(&self) -> usize {
		self.capacity
	}

	pub fn state(&self, employee_id: &str) -> ExpansionState {
		if self.entries.contains_key(employee_id) {
			ExpansionState::Cached
		} else if self.fetching.contains(employee_id) {
			ExpansionState::Fetching
		} else {
			ExpansionState::Uncached
		}
	}

	pub fn request_expand(&mut self, employee_id: &str) -> ExpandRequest {
		match self.state(employee_id) {
			ExpansionState::Cached => {
				self.touch(employee_id);
				ExpandRequest::Hit
			}
			ExpansionState::Fetching => ExpandRequest::InFlight,
			ExpansionState::Uncached => {
				self.fetching.insert(employee_id.to_string());
				ExpandRequest::Fetch
			}
		}
	}

	/// Store a fetched subgraph, or roll back to `Uncached` on failure.
	///
	/// Returns the id evicted to make room, if any.
	pub fn complete_fetch(
		&mut self,
		employee_id: &str,
		result: Result<GraphPayload, FetchError>,
	) -> Result<Option<String>, FetchError> {
		self.fetching.remove(employee_id);
		let payload = result?;

		if self.entries.contains_key(employee_id) {
			// Refetched while cached; refresh content, keep the slot.
			self.queue.retain(|id| id != employee_id);
		}
		let entry = ExpansionEntry {
			employee_id: employee_id.to_string(),
			nodes: payload.nodes,
			edges: payload.edges,
			insights: payload.insights,
			inserted_at: self.bump_order(),
		};
		self.entries.insert(employee_id.to_string(), entry);
		self.queue.push_back(employee_id.to_string());

		if self.queue.len() > self.capacity {
			if let Some(evicted) = self.queue.pop_front() {
				self.entries.remove(&evicted);
				debug!("crm-graph: evicted expansion for {}", evicted);
				return Ok(Some(evicted));
			}
		}
		Ok(None)
	}

	/// Active entries, oldest first.
	pub fn active(&self) -> impl Iterator<Item = &ExpansionEntry> {
		self.queue.iter().filter_map(|id| self.entries.get(id))
	}

	pub fn active_ids(&self) -> Vec<String> {
		self.queue.iter().cloned().collect()
	}

	pub fn entry(&self, employee_id: &str) -> Option<&ExpansionEntry> {
		self.entries.get(employee_id)
	}

	pub fn len(&self) -> usize {
		self.queue.len()
	}

	pub fn is_empty(&self) -> bool {
		self.queue.is_empty()
	}

	/// Forget everything, including outstanding fetches.
	pub fn reset(&mut self) {
		self.entries.clear();
		self.queue.clear();
		self.fetching.clear();
	}

	fn touch(&mut self, employee_id: &str) {
		self.queue.retain(|id| id != employee_id);
		self.queue.push_back(employee_id.to_string());
		let order = self.bump_order();
		if let Some(entry) = self.entries.get_mut(employee_id) {
			entry.inserted_at = order;
		}
	}

	fn bump_order(&mut self) -> u64 {
		self.next_order += 1;
		self.next_order
	}
}

#[cfg(test)]
mod tests {
	use super::*;
	use crate::graph::types::NodeType;

	fn subgraph(employee: &str) -> GraphPayload {
		let customer = format!("{employee}-C");
		GraphPayload::new(
			vec![Node::new(employee, NodeType::Employee), Node::new(customer.clone(), NodeType::Customer)],
			vec![Edge::new(format!("{employee}-e"), employee, customer)],
		)
	}

	fn expand(cache: &mut ExpansionCache, id: &str) -> Option<String> {
		assert_eq!(cache.request_expand(id), ExpandRequest::Fetch);
		cache.complete_fetch(id, Ok(subgraph(id))).unwrap()
	}

	#[test]
	fn test_state_transitions() {
		let mut cache = ExpansionCache::default();
		assert_eq!(cache.state("E1"), ExpansionState::Uncached);
		assert_eq!(cache.request_expand("E1"), ExpandRequest::Fetch);
		assert_eq!(cache.state("E1"), ExpansionState::Fetching);
		assert_eq!(cache.request_expand("E1"), ExpandRequest::InFlight);

		cache.complete_fetch("E1", Ok(subgraph("E1"))).unwrap();
		assert_eq!(cache.state("E1"), ExpansionState::Cached);
		assert_eq!(cache.request_expand("E1"), ExpandRequest::Hit);
		assert_eq!(cache.entry("E1").unwrap().nodes.len(), 2);
	}

	#[test]
	fn test_failure_rolls_back_to_uncached() {
		let mut cache = ExpansionCache::default();
		cache.request_expand("E1");
		let err = cache
			.complete_fetch("E1", Err(FetchError::Status(503)))
			.unwrap_err();
		assert!(matches!(err, FetchError::Status(503)));
		assert_eq!(cache.state("E1"), ExpansionState::Uncached);
		assert!(cache.is_empty());

		// Retry is an ordinary fresh fetch.
		assert_eq!(cache.request_expand("E1"), ExpandRequest::Fetch);
	}

	#[test]
	fn test_capacity_evicts_oldest() {
		let mut cache = ExpansionCache::default();
		for i in 1..=5 {
			assert_eq!(expand(&mut cache, &format!("E{i}")), None);
		}
		assert_eq!(expand(&mut cache, "E6"), Some("E1".to_string()));
		assert_eq!(cache.len(), 5);
		assert_eq!(cache.state("E1"), ExpansionState::Uncached);
		assert_eq!(cache.active_ids(), vec!["E2", "E3", "E4", "E5", "E6"]);
	}

	#[test]
	fn test_hit_protects_from_eviction() {
		let mut cache = ExpansionCache::default();
		for i in 1..=5 {
			expand(&mut cache, &format!("E{i}"));
		}
		assert_eq!(cache.request_expand("E1"), ExpandRequest::Hit);
		assert_eq!(expand(&mut cache, "E6"), Some("E2".to_string()));
		assert_eq!(cache.state("E1"), ExpansionState::Cached);
		assert!(cache.entry("E1").unwrap().inserted_at > cache.entry("E3").unwrap().inserted_at);
	}

	#[test]
	fn test_reset_forgets_in_flight() {
		let mut cache = ExpansionCache::new(2);
		expand(&mut cache, "E1");
		cache.request_expand("E2");
		cache.reset();
		assert_eq!(cache.state("E1"), ExpansionState::Uncached);
		assert_eq!(cache.state("E2"), ExpansionState::Uncached);
		assert_eq!(cache.capacity(), 2);
	}
}
