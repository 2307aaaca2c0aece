//! Visual theming for the relationship graph.
//!
//! Provides per-node-type colors, backgrounds and edge/node style configuration.

use crate::graph::NodeType;

/// RGBA color representation.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Color {
	pub r: u8,
	pub g: u8,
	pub b: u8,
	pub a: f64,
}

impl Color {
	pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
		Self { r, g, b, a: 1.0 }
	}

	pub const fn rgba(r: u8, g: u8, b: u8, a: f64) -> Self {
		Self { r, g, b, a }
	}

	pub fn with_alpha(self, a: f64) -> Self {
		Self { a, ..self }
	}

	/// Lighten the color by a factor (0.0 = unchanged, 1.0 = white)
	pub fn lighten(self, factor: f64) -> Self {
		let f = factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 + (255.0 - self.r as f64) * f) as u8,
			g: (self.g as f64 + (255.0 - self.g as f64) * f) as u8,
			b: (self.b as f64 + (255.0 - self.b as f64) * f) as u8,
			a: self.a,
		}
	}

	/// Darken the color by a factor (0.0 = unchanged, 1.0 = black)
	pub fn darken(self, factor: f64) -> Self {
		let f = 1.0 - factor.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * f) as u8,
			g: (self.g as f64 * f) as u8,
			b: (self.b as f64 * f) as u8,
			a: self.a,
		}
	}

	/// Linear interpolation between two colors
	pub fn lerp(self, other: Color, t: f64) -> Self {
		let t = t.clamp(0.0, 1.0);
		Self {
			r: (self.r as f64 * (1.0 - t) + other.r as f64 * t) as u8,
			g: (self.g as f64 * (1.0 - t) + other.g as f64 * t) as u8,
			b: (self.b as f64 * (1.0 - t) + other.b as f64 * t) as u8,
			a: self.a * (1.0 - t) + other.a * t,
		}
	}

	pub fn to_css(self) -> String {
		if (self.a - 1.0).abs() < 0.001 {
			format!("#{:02x}{:02x}{:02x}", self.r, self.g, self.b)
		} else {
			format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
		}
	}

	/// Parses `#RRGGBB` and `rgb()`/`rgba()` notation; anything else is mid gray.
	pub fn parse(color_str: &str) -> Color {
		if color_str.starts_with('#') && color_str.len() == 7 {
			// Hints come from the data source; a multi-byte char must not split a slice.
			let hex = |range: std::ops::Range<usize>| -> u8 {
				color_str
					.get(range)
					.and_then(|digits| u8::from_str_radix(digits, 16).ok())
					.unwrap_or(128)
			};
			Color::rgb(hex(1..3), hex(3..5), hex(5..7))
		} else if color_str.starts_with("rgb") {
			let nums: Vec<&str> = color_str
				.trim_start_matches("rgba(")
				.trim_start_matches("rgb(")
				.trim_end_matches(')')
				.split(',')
				.collect();
			let channel = |i: usize| -> u8 {
				nums.get(i)
					.and_then(|s| s.trim().parse().ok())
					.unwrap_or(128)
			};
			let a = nums
				.get(3)
				.and_then(|s| s.trim().parse().ok())
				.unwrap_or(1.0);
			Color::rgba(channel(0), channel(1), channel(2), a)
		} else {
			Color::rgb(128, 128, 128)
		}
	}
}

/// Node fill color per CRM entity type.
#[derive(Clone, Debug)]
pub struct TypePalette {
	pub customer: Color,
	pub customer_inactive: Color,
	pub employee: Color,
	pub sales_activity: Color,
	pub revenue: Color,
	pub other: Color,
}

impl TypePalette {
	/// Muted slate blues with a warm accent for revenue (default)
	pub fn slate() -> Self {
		Self {
			customer: Color::rgb(94, 129, 172),
			customer_inactive: Color::rgb(120, 126, 135),
			employee: Color::rgb(100, 148, 160),
			sales_activity: Color::rgb(143, 163, 180),
			revenue: Color::rgb(180, 145, 100),
			other: Color::rgb(122, 153, 168),
		}
	}

	/// Cool teals and purples
	pub fn aurora() -> Self {
		Self {
			customer: Color::rgb(115, 135, 155),
			customer_inactive: Color::rgb(110, 112, 120),
			employee: Color::rgb(130, 120, 150),
			sales_activity: Color::rgb(100, 145, 135),
			revenue: Color::rgb(185, 145, 110),
			other: Color::rgb(135, 140, 150),
		}
	}

	pub fn get(&self, kind: NodeType) -> Color {
		match kind {
			NodeType::Customer => self.customer,
			NodeType::CustomerInactive => self.customer_inactive,
			NodeType::Employee => self.employee,
			NodeType::SalesActivity => self.sales_activity,
			NodeType::Revenue => self.revenue,
			NodeType::Other => self.other,
		}
	}
}

/// Background style configuration.
#[derive(Clone, Debug)]
pub struct BackgroundStyle {
	/// Primary background color
	pub color: Color,
	/// Secondary color for gradients
	pub color_secondary: Color,
	/// Whether to use radial gradient
	pub use_gradient: bool,
	/// Vignette intensity (0.0 = none, 1.0 = strong)
	pub vignette: f64,
}

/// Edge visual style.
#[derive(Clone, Debug)]
pub struct EdgeStyle {
	pub color: Color,
	pub glow_color: Color,
	pub glow_intensity: f64,
	pub curved: bool,
	/// 0.0 = straight, 1.0 = very curved
	pub curve_tension: f64,
}

/// Node visual style.
#[derive(Clone, Debug)]
pub struct NodeStyle {
	/// Whether nodes have inner gradients
	pub use_gradient: bool,
	/// Border/stroke width (0 = no border)
	pub border_width: f64,
	pub border_color: Color,
	/// Label text color
	pub label_color: Color,
}

/// Complete visual theme.
#[derive(Clone, Debug)]
pub struct Theme {
	pub name: &'static str,
	pub background: BackgroundStyle,
	pub edge: EdgeStyle,
	pub node: NodeStyle,
	pub palette: TypePalette,
}

impl Theme {
	/// Clean modern theme with subtle effects (default)
	pub fn default_theme() -> Self {
		Self {
			name: "default",
			background: BackgroundStyle {
				color: Color::rgb(22, 27, 34),
				color_secondary: Color::rgb(30, 35, 42),
				use_gradient: true,
				vignette: 0.15,
			},
			edge: EdgeStyle {
				color: Color::rgba(140, 160, 180, 0.5),
				glow_color: Color::rgba(140, 160, 180, 0.1),
				glow_intensity: 0.0,
				curved: false,
				curve_tension: 0.0,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				label_color: Color::rgba(255, 255, 255, 0.85),
			},
			palette: TypePalette::slate(),
		}
	}

	/// Elegant dark theme with a soft edge glow
	pub fn midnight() -> Self {
		Self {
			name: "midnight",
			background: BackgroundStyle {
				color: Color::rgb(18, 20, 28),
				color_secondary: Color::rgb(25, 28, 38),
				use_gradient: true,
				vignette: 0.2,
			},
			edge: EdgeStyle {
				color: Color::rgba(100, 120, 150, 0.45),
				glow_color: Color::rgba(100, 120, 150, 0.1),
				glow_intensity: 0.3,
				curved: true,
				curve_tension: 0.2,
			},
			node: NodeStyle {
				use_gradient: true,
				border_width: 1.0,
				border_color: Color::rgba(255, 255, 255, 0.15),
				label_color: Color::rgba(230, 235, 245, 0.9),
			},
			palette: TypePalette::aurora(),
		}
	}

	/// Minimal, ultra-clean theme
	pub fn minimal() -> Self {
		Self {
			name: "minimal",
			background: BackgroundStyle {
				color: Color::rgb(25, 28, 35),
				color_secondary: Color::rgb(25, 28, 35),
				use_gradient: false,
				vignette: 0.0,
			},
			edge: EdgeStyle {
				color: Color::rgba(130, 145, 165, 0.4),
				glow_color: Color::rgba(130, 145, 165, 0.0),
				glow_intensity: 0.0,
				curved: false,
				curve_tension: 0.0,
			},
			node: NodeStyle {
				use_gradient: false,
				border_width: 0.0,
				border_color: Color::rgba(255, 255, 255, 0.0),
				label_color: Color::rgba(255, 255, 255, 0.85),
			},
			palette: TypePalette::slate(),
		}
	}

	/// Theme by configured name; unknown names fall back to the default.
	pub fn by_name(name: &str) -> Self {
		match name {
			"midnight" => Self::midnight(),
			"minimal" => Self::minimal(),
			_ => Self::default_theme(),
		}
	}

	/// Explicit color hint wins over the type palette.
	pub fn node_color(&self, kind: NodeType, hint: Option<&str>) -> Color {
		hint.map(Color::parse).unwrap_or_else(|| self.palette.get(kind))
	}
}

impl Default for Theme {
	fn default() -> Self {
		Self::default_theme()
	}
}
