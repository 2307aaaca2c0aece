//! View modes and the data-source requests they map to.

use std::fmt;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, utf8_percent_encode};
use serde::{Deserialize, Serialize};

/// The three display scopes, from narrowest to widest.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum ViewMode {
	/// One customer and its immediate relations.
	#[default]
	Customer,
	/// Every customer of the focal employee.
	AllCustomers,
	/// The full employee roster, expandable per employee.
	AllEmployees,
}

impl ViewMode {
	pub const ALL: [ViewMode; 3] = [ViewMode::Customer, ViewMode::AllCustomers, ViewMode::AllEmployees];

	pub fn title(self) -> &'static str {
		match self {
			ViewMode::Customer => "Customer",
			ViewMode::AllCustomers => "All customers",
			ViewMode::AllEmployees => "All employees",
		}
	}
}

impl fmt::Display for ViewMode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(match self {
			ViewMode::Customer => "customer",
			ViewMode::AllCustomers => "all-customers",
			ViewMode::AllEmployees => "all-employees",
		})
	}
}

/// Focal entities supplied by the surrounding CRM page.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Focus {
	pub customer_id: Option<String>,
	pub employee_id: Option<String>,
}

/// One of the three request shapes the data source understands.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum GraphRequest {
	/// Single-entity graph around a customer.
	Customer(String),
	/// "My customers" graph of an employee. Also used for expansion.
	EmployeeCustomers(String),
	/// Full roster, no focal id.
	EmployeeRoster,
}

impl GraphRequest {
	/// Request for `mode`, or `None` when the needed focal id is missing.
	pub fn for_mode(mode: ViewMode, focus: &Focus) -> Option<Self> {
		match mode {
			ViewMode::Customer => focus.customer_id.clone().map(GraphRequest::Customer),
			ViewMode::AllCustomers => focus.employee_id.clone().map(GraphRequest::EmployeeCustomers),
			ViewMode::AllEmployees => Some(GraphRequest::EmployeeRoster),
		}
	}

	/// Path relative to the API base.
	pub fn path(&self) -> String {
		match self {
			GraphRequest::Customer(id) => format!("/graph/customer/{}", encode_segment(id)),
			GraphRequest::EmployeeCustomers(id) => {
				format!("/graph/employee/{}/customers", encode_segment(id))
			}
			GraphRequest::EmployeeRoster => "/graph/employees".to_string(),
		}
	}
}

/// Everything outside the RFC 3986 unreserved set is escaped in path segments.
const SEGMENT: &AsciiSet = &NON_ALPHANUMERIC.remove(b'-').remove(b'_').remove(b'.').remove(b'~');

fn encode_segment(segment: &str) -> String {
	utf8_percent_encode(segment, SEGMENT).to_string()
}
