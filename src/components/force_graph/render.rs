use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::{EdgeInfo, ForceGraphState, NODE_RADIUS};

const BACKGROUND: &str = "#ffffff";
const EDGE_RGB: &str = "43, 124, 233";
const NODE_BORDER: &str = "#2b7ce9";
const TEXT_RGB: &str = "52, 52, 52";

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str(BACKGROUND);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();
}

fn edge_alpha(state: &ForceGraphState, edge: &EdgeInfo, t: f64) -> f64 {
	if state.is_highlighted(edge.source) && state.is_highlighted(edge.target) {
		0.7 + 0.3 * t
	} else {
		0.7 - 0.55 * t
	}
}

fn draw_edges(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let arrow_size = 7.0 / k.max(0.5);
	let t = ease_out_cubic(state.hover.highlight_t);
	let positions = state.positions();

	for edge in &state.edges {
		let (Some(&(x1, y1)), Some(&(x2, y2))) =
			(positions.get(&edge.source), positions.get(&edge.target))
		else {
			continue;
		};
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 2.0 * NODE_RADIUS {
			continue;
		}

		let alpha = edge_alpha(state, edge, t);
		let color = format!("rgba({EDGE_RGB}, {alpha})");
		let (ux, uy) = (dx / dist, dy / dist);

		ctx.set_stroke_style_str(&color);
		ctx.set_line_width(edge.width / k.sqrt());
		ctx.begin_path();
		ctx.move_to(x1 + ux * NODE_RADIUS, y1 + uy * NODE_RADIUS);
		ctx.line_to(
			x2 - ux * (NODE_RADIUS + arrow_size),
			y2 - uy * (NODE_RADIUS + arrow_size),
		);
		ctx.stroke();

		let (tip_x, tip_y) = (x2 - ux * NODE_RADIUS, y2 - uy * NODE_RADIUS);
		let (back_x, back_y) = (tip_x - ux * arrow_size, tip_y - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.set_fill_style_str(&color);
		ctx.begin_path();
		ctx.move_to(tip_x, tip_y);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if !edge.label.is_empty() {
			draw_edge_label(ctx, edge, (x1 + x2) / 2.0, (y1 + y2) / 2.0, k, alpha);
		}
	}
}

fn draw_edge_label(
	ctx: &CanvasRenderingContext2d,
	edge: &EdgeInfo,
	x: f64,
	y: f64,
	k: f64,
	alpha: f64,
) {
	let size = 9.0 / k.max(0.5);
	let top = y - size * (edge.label.len() as f64 - 1.0) / 2.0;
	ctx.set_font(&format!("{size}px sans-serif"));
	ctx.set_text_align("center");
	ctx.set_fill_style_str(&format!("rgba({TEXT_RGB}, {alpha})"));
	for (i, line) in edge.label.iter().enumerate() {
		let _ = ctx.fill_text(line, x, top + size * i as f64);
	}
	ctx.set_text_align("start");
}

fn draw_nodes(state: &ForceGraphState, ctx: &CanvasRenderingContext2d) {
	let has_highlight = state.hover.node.is_some();
	let (t, k) = (ease_out_cubic(state.hover.highlight_t), state.transform.k);
	let font = format!("{}px sans-serif", 11.0 / k.max(0.5));

	state.graph.visit_nodes(|node| {
		let idx = node.index();
		let (x, y) = (node.x() as f64, node.y() as f64);
		let highlighted = has_highlight && state.is_highlighted(idx);
		let hovered = state.hover.node == Some(idx);

		let (alpha, radius) = match (has_highlight, highlighted) {
			(false, _) => (1.0, NODE_RADIUS),
			(true, true) if hovered => (1.0, NODE_RADIUS * (1.0 + 0.3 * t)),
			(true, true) => (1.0, NODE_RADIUS * (1.0 + 0.15 * t)),
			(true, false) => (1.0 - 0.7 * t, NODE_RADIUS * (1.0 - 0.15 * t)),
		};

		ctx.set_global_alpha(alpha);
		ctx.begin_path();
		let _ = ctx.arc(x, y, radius, 0.0, 2.0 * PI);
		ctx.set_fill_style_str(&node.data.user_data.color);
		ctx.fill();
		ctx.set_stroke_style_str(NODE_BORDER);
		ctx.set_line_width(if hovered { 2.0 / k } else { 1.0 / k });
		ctx.stroke();
		ctx.set_global_alpha(1.0);

		ctx.set_fill_style_str(&format!("rgba({TEXT_RGB}, {alpha})"));
		ctx.set_font(&font);
		let _ = ctx.fill_text(&node.data.user_data.label, x + radius + 3.0, y + 4.0);
	});
}
