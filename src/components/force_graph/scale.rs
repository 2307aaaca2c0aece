//! Zoom-dependent scaling of graph visuals.
//!
//! Sizes are either world-space (grow when zooming in), screen-space (fixed
//! pixel size, divided by `k` to counteract the canvas transform) or world-space
//! clamped to a screen-space range. Label *visibility* is not decided here;
//! that is the job of [`crate::graph::lod`].

/// Defines how a visual property scales with zoom level.
#[derive(Clone, Debug)]
pub enum ScaleBehavior {
	/// Constant screen-space size (pixels). Unaffected by zoom.
	Screen,
	/// World-space scaling, clamped to min/max screen-space bounds.
	Clamped { min_screen: f64, max_screen: f64 },
}

impl ScaleBehavior {
	/// World-space value for `base` at zoom `k`.
	pub fn apply(&self, base: f64, k: f64) -> f64 {
		match self {
			ScaleBehavior::Screen => base / k,
			ScaleBehavior::Clamped {
				min_screen,
				max_screen,
			} => base.clamp(min_screen / k, max_screen / k),
		}
	}
}

/// Node, label and hover-ring sizing.
#[derive(Clone, Debug)]
pub struct NodeScaleConfig {
	/// Base node radius in world units, before the per-node size factor.
	pub radius: f64,
	pub radius_behavior: ScaleBehavior,
	pub hit_radius: f64,
	pub hit_behavior: ScaleBehavior,
	/// Label font size in screen pixels.
	pub label_size: f64,
	/// Below this zoom the label font stops shrinking on screen.
	pub label_min_k: f64,
	/// Hover ring stroke width and offset in screen pixels.
	pub ring_width: f64,
	pub ring_offset: f64,
}

/// Edge and arrowhead sizing.
#[derive(Clone, Debug)]
pub struct EdgeScaleConfig {
	/// Line width in screen pixels.
	pub line_width: f64,
	pub arrow_size: f64,
	pub arrow_behavior: ScaleBehavior,
	/// Arrowheads fade in linearly up to this zoom.
	pub arrow_full_k: f64,
	/// Minimum arrow alpha worth drawing.
	pub arrow_cull_alpha: f64,
}

#[derive(Clone, Debug)]
pub struct ScaleConfig {
	pub node: NodeScaleConfig,
	pub edge: EdgeScaleConfig,
}

impl Default for ScaleConfig {
	fn default() -> Self {
		Self {
			node: NodeScaleConfig {
				radius: 5.0,
				radius_behavior: ScaleBehavior::Clamped {
					min_screen: 4.0,
					max_screen: f64::INFINITY,
				},
				hit_radius: 12.0,
				hit_behavior: ScaleBehavior::Clamped {
					min_screen: 5.0,
					max_screen: f64::INFINITY,
				},
				label_size: 11.0,
				label_min_k: 0.5,
				ring_width: 1.5,
				ring_offset: 2.0,
			},
			edge: EdgeScaleConfig {
				line_width: 1.2,
				arrow_size: 5.0,
				arrow_behavior: ScaleBehavior::Clamped {
					min_screen: 0.0,
					max_screen: 14.0,
				},
				arrow_full_k: 1.0,
				arrow_cull_alpha: 0.05,
			},
		}
	}
}

/// Scale values for one frame. All sizes are world-space.
#[derive(Clone, Debug)]
pub struct ScaledValues {
	pub k: f64,
	pub node_radius: f64,
	pub hit_radius: f64,
	/// e.g. "11px sans-serif"
	pub label_font: String,
	/// Distance between lines of a multi-line label.
	pub label_line_height: f64,
	pub edge_line_width: f64,
	pub arrow_size: f64,
	pub arrow_alpha: f64,
	pub cull_arrows: bool,
	pub ring_width: f64,
	pub ring_offset: f64,
}

impl ScaledValues {
	pub fn new(config: &ScaleConfig, k: f64) -> Self {
		let label_font_size = config.node.label_size / k.max(config.node.label_min_k);
		let arrow_alpha = (k / config.edge.arrow_full_k).clamp(0.0, 1.0);

		Self {
			k,
			node_radius: config.node.radius_behavior.apply(config.node.radius, k),
			hit_radius: config.node.hit_behavior.apply(config.node.hit_radius, k),
			label_font: format!("{}px sans-serif", label_font_size),
			label_line_height: label_font_size * 1.2,
			edge_line_width: ScaleBehavior::Screen.apply(config.edge.line_width, k),
			arrow_size: config.edge.arrow_behavior.apply(config.edge.arrow_size, k),
			arrow_alpha,
			cull_arrows: arrow_alpha < config.edge.arrow_cull_alpha,
			ring_width: config.node.ring_width / k,
			ring_offset: config.node.ring_offset / k,
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_clamped_keeps_minimum_screen_size() {
		let behavior = ScaleBehavior::Clamped {
			min_screen: 4.0,
			max_screen: f64::INFINITY,
		};
		// Zoomed far out, the world size grows so the node stays 4px on screen.
		assert_eq!(behavior.apply(5.0, 0.5), 8.0);
		assert_eq!(behavior.apply(5.0, 2.0), 5.0);
	}

	#[test]
	fn test_arrows_culled_when_zoomed_out() {
		let config = ScaleConfig::default();
		assert!(ScaledValues::new(&config, 0.01).cull_arrows);
		assert!(!ScaledValues::new(&config, 1.0).cull_arrows);
	}
}
