//! Label level-of-detail policy.
//!
//! A decision table rather than a formula: each view mode has its own notion
//! of which node types anchor the picture. Emphasis (highlighted or focused)
//! always wins and is checked first.
//!
//! | Mode            | Always shown         | Zoom-gated                               |
//! |-----------------|----------------------|------------------------------------------|
//! | `all-employees` | employee             | everything else at `k >= 1.5`            |
//! | `all-customers` | employee             | customer at `k >= 1.2`, rest at `k >= 2.5` |
//! | `customer`      | customer, employee   | inactive at `k >= 1.5`, rest at `k >= 1.0` |

use super::mode::ViewMode;
use super::types::NodeType;

pub fn should_show_label(kind: NodeType, mode: ViewMode, zoom: f64, emphasized: bool) -> bool {
	if emphasized {
		return true;
	}
	match mode {
		ViewMode::AllEmployees => match kind {
			NodeType::Employee => true,
			_ => zoom >= 1.5,
		},
		ViewMode::AllCustomers => match kind {
			NodeType::Employee => true,
			NodeType::Customer => zoom >= 1.2,
			_ => zoom >= 2.5,
		},
		ViewMode::Customer => match kind {
			NodeType::Customer | NodeType::Employee => true,
			NodeType::CustomerInactive => zoom >= 1.5,
			_ => zoom >= 1.0,
		},
	}
}
