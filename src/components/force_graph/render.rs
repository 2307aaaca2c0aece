//! Canvas rendering for the relationship graph.
//!
//! Rendering uses multiple passes for correct z-ordering:
//! 1. Background (screen space)
//! 2. Edge glows, then edge lines (world space)
//! 3. Non-highlighted nodes, then highlighted nodes on top
//!
//! Whether a label is drawn is decided per node by the LOD policy; highlight
//! intensity only controls how bright it is.

use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::scale::{ScaleConfig, ScaledValues};
use super::state::{ForceGraphState, NodeInfo};
use super::theme::{Color, Theme};

/// Attempt to smooth values that would otherwise cause abrupt visual changes.
fn smooth_step(t: f64) -> f64 {
	t * t * (3.0 - 2.0 * t)
}

/// Renders the complete graph to the canvas.
pub fn render(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	config: &ScaleConfig,
	theme: &Theme,
) {
	let scale = ScaledValues::new(config, state.transform.k);

	draw_background(state, ctx, theme);

	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);

	draw_edges(state, ctx, &scale, theme);
	draw_nodes(state, ctx, &scale, theme);

	ctx.restore();

	if theme.background.vignette > 0.0 {
		draw_vignette(state, ctx, theme);
	}
}

fn draw_background(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let gradient = theme
		.background
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(
				state.width / 2.0,
				state.height / 2.0,
				0.0,
				state.width / 2.0,
				state.height / 2.0,
				state.width.max(state.height) * 0.8,
			)
			.ok()
		})
		.flatten();

	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &theme.background.color_secondary.to_css());
			let _ = gradient.add_color_stop(1.0, &theme.background.color.to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&theme.background.color.to_css()),
	}

	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_vignette(state: &ForceGraphState, ctx: &CanvasRenderingContext2d, theme: &Theme) {
	let Ok(gradient) = ctx.create_radial_gradient(
		state.width / 2.0,
		state.height / 2.0,
		state.width.min(state.height) * 0.3,
		state.width / 2.0,
		state.height / 2.0,
		state.width.max(state.height) * 0.7,
	) else {
		return;
	};

	let _ = gradient.add_color_stop(0.0, "rgba(0, 0, 0, 0)");
	let _ = gradient.add_color_stop(
		1.0,
		&format!("rgba(0, 0, 0, {})", theme.background.vignette),
	);

	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
}

fn draw_edges(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	if theme.edge.glow_intensity > 0.0 {
		state.graph.visit_edges(|n1, n2, _| {
			draw_edge_glow(state, ctx, scale, theme, n1, n2);
		});
	}

	state.graph.visit_edges(|n1, n2, _| {
		draw_edge_main(state, ctx, scale, theme, n1, n2);
	});
}

fn draw_edge_glow(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	n1: &force_graph::Node<NodeInfo>,
	n2: &force_graph::Node<NodeInfo>,
) {
	let edge_t = state.highlight.edge_intensity(n1.index(), n2.index());
	if edge_t < 0.01 {
		return;
	}

	let glow_color = theme
		.edge
		.glow_color
		.with_alpha(theme.edge.glow_intensity * smooth_step(edge_t));
	ctx.set_stroke_style_str(&glow_color.to_css());
	ctx.set_line_width(scale.edge_line_width * 4.0);
	stroke_edge(ctx, scale, theme, n1, n2, scale.node_radius);
}

fn draw_edge_main(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	n1: &force_graph::Node<NodeInfo>,
	n2: &force_graph::Node<NodeInfo>,
) {
	let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}

	let edge_t = smooth_step(state.highlight.edge_intensity(n1.index(), n2.index()));
	let max_t = smooth_step(state.highlight.max_intensity());

	// Highlighted edges brighten; everything else dims while a highlight is active.
	let (edge_alpha, base_arrow_alpha, width) = if edge_t > 0.01 {
		(
			0.7 + 0.3 * edge_t,
			0.9 + 0.1 * edge_t,
			scale.edge_line_width * (1.0 + 0.4 * edge_t),
		)
	} else if max_t > 0.01 {
		(
			0.7 - 0.5 * max_t,
			0.9 - 0.6 * max_t,
			scale.edge_line_width * (1.0 - 0.3 * max_t),
		)
	} else {
		(0.7, 0.9, scale.edge_line_width)
	};

	let edge_color = theme.edge.color;
	ctx.set_stroke_style_str(&edge_color.with_alpha(edge_alpha * edge_color.a).to_css());
	ctx.set_line_width(width);
	let target_radius = scale.node_radius * n2.data.user_data.size;
	stroke_edge(ctx, scale, theme, n1, n2, target_radius + scale.arrow_size);

	let arrow_alpha = base_arrow_alpha * scale.arrow_alpha;
	if scale.cull_arrows || arrow_alpha <= 0.0 {
		return;
	}

	let (ux, uy) = (dx / dist, dy / dist);
	ctx.set_fill_style_str(&edge_color.with_alpha(arrow_alpha * edge_color.a).to_css());
	let (tip_x, tip_y) = (x2 - ux * target_radius, y2 - uy * target_radius);
	let (back_x, back_y) = (tip_x - ux * scale.arrow_size, tip_y - uy * scale.arrow_size);
	let (px, py) = (-uy * scale.arrow_size * 0.5, ux * scale.arrow_size * 0.5);

	ctx.begin_path();
	ctx.move_to(tip_x, tip_y);
	ctx.line_to(back_x + px, back_y + py);
	ctx.line_to(back_x - px, back_y - py);
	ctx.close_path();
	ctx.fill();
}

/// Straight or curved stroke from the source rim to `end_offset` before the target.
fn stroke_edge(
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
	n1: &force_graph::Node<NodeInfo>,
	n2: &force_graph::Node<NodeInfo>,
	end_offset: f64,
) {
	let (x1, y1, x2, y2) = (n1.x() as f64, n1.y() as f64, n2.x() as f64, n2.y() as f64);
	let (dx, dy) = (x2 - x1, y2 - y1);
	let dist = (dx * dx + dy * dy).sqrt();
	if dist < 0.001 {
		return;
	}
	let (ux, uy) = (dx / dist, dy / dist);
	let start_offset = scale.node_radius * n1.data.user_data.size;
	let (start_x, start_y) = (x1 + ux * start_offset, y1 + uy * start_offset);
	let (end_x, end_y) = (x2 - ux * end_offset, y2 - uy * end_offset);

	ctx.begin_path();
	ctx.move_to(start_x, start_y);
	if theme.edge.curved && dist > scale.node_radius * 4.0 {
		let curve_offset = dist * theme.edge.curve_tension * 0.3;
		let (mid_x, mid_y) = (
			(x1 + x2) / 2.0 - uy * curve_offset,
			(y1 + y2) / 2.0 + ux * curve_offset,
		);
		ctx.quadratic_curve_to(mid_x, mid_y, end_x, end_y);
	} else {
		ctx.line_to(end_x, end_y);
	}
	ctx.stroke();
}

fn draw_nodes(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	scale: &ScaledValues,
	theme: &Theme,
) {
	let max_t = smooth_step(state.highlight.max_intensity());
	let has_highlight = max_t > 0.01;
	let (dim_alpha, dim_radius) = if has_highlight {
		(1.0 - 0.7 * max_t, 1.0 - 0.15 * max_t)
	} else {
		(1.0, 1.0)
	};

	// Pass 1: non-highlighted nodes
	state.graph.visit_nodes(|node| {
		if state.highlight.node_intensity(node.index()) > 0.001 {
			return;
		}
		draw_node(state, ctx, node, scale, theme, dim_alpha, dim_radius);
	});

	// Pass 2: highlighted/transitioning nodes on top
	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let node_t = state.highlight.node_intensity(idx);
		if node_t <= 0.001 {
			return;
		}

		let eased_t = smooth_step(node_t);
		let hover_t = smooth_step(state.highlight.hover_ring_intensity(idx));

		let neighbor_radius = 1.0 + 0.25 * eased_t;
		let hovered_radius = 1.0 + 0.4 * eased_t;
		let highlight_radius = neighbor_radius + (hovered_radius - neighbor_radius) * hover_t;

		let alpha = dim_alpha + (1.0 - dim_alpha) * eased_t;
		let radius_mult = dim_radius + (highlight_radius - dim_radius) * eased_t;

		draw_node(state, ctx, node, scale, theme, alpha, radius_mult);

		if hover_t > 0.01 {
			let (x, y) = (node.x() as f64, node.y() as f64);
			let radius = scale.node_radius * radius_mult * node.data.user_data.size;
			ctx.begin_path();
			let _ = ctx.arc(x, y, radius + scale.ring_offset, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&format!("rgba(255, 255, 255, {})", 0.8 * hover_t));
			ctx.set_line_width(scale.ring_width);
			ctx.stroke();
		}
	});
}

fn draw_node(
	state: &ForceGraphState,
	ctx: &CanvasRenderingContext2d,
	node: &force_graph::Node<NodeInfo>,
	scale: &ScaledValues,
	theme: &Theme,
	alpha: f64,
	radius_mult: f64,
) {
	let (x, y) = (node.x() as f64, node.y() as f64);
	let info = &node.data.user_data;
	let radius = scale.node_radius * radius_mult * info.size;
	let base_color = Color::parse(&info.color);

	ctx.set_global_alpha(alpha);
	ctx.begin_path();
	let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);

	let gradient = theme
		.node
		.use_gradient
		.then(|| {
			ctx.create_radial_gradient(x - radius * 0.3, y - radius * 0.3, 0.0, x, y, radius)
				.ok()
		})
		.flatten();
	match gradient {
		Some(gradient) => {
			let _ = gradient.add_color_stop(0.0, &base_color.lighten(0.4).to_css());
			let _ = gradient.add_color_stop(0.7, &base_color.to_css());
			let _ = gradient.add_color_stop(1.0, &base_color.darken(0.2).to_css());
			#[allow(deprecated)]
			ctx.set_fill_style(&gradient);
		}
		None => ctx.set_fill_style_str(&info.color),
	}
	ctx.fill();

	if theme.node.border_width > 0.0 {
		ctx.set_stroke_style_str(&theme.node.border_color.to_css());
		ctx.set_line_width(theme.node.border_width / scale.k);
		ctx.stroke();
	}
	ctx.set_global_alpha(1.0);

	if !info.label.is_empty() && state.show_label(node) {
		let label_color = theme.node.label_color;
		ctx.set_fill_style_str(&label_color.with_alpha(label_color.a * alpha.max(0.5)).to_css());
		ctx.set_font(&scale.label_font);
		for (i, line) in info.label.lines().enumerate() {
			let _ = ctx.fill_text(
				line,
				x + radius + 4.0,
				y + 3.0 + i as f64 * scale.label_line_height,
			);
		}
	}
}
