use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::state::{GraphViewState, node_radius};
use super::types::{GraphNode, Point};

fn ease_out_cubic(t: f64) -> f64 {
	1.0 - (1.0 - t).powi(3)
}

pub fn render(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	ctx.set_fill_style_str("#0f172a");
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_edges(state, ctx);
	draw_nodes(state, ctx);
	ctx.restore();

	if state.is_settling() {
		ctx.set_fill_style_str("rgba(226, 232, 240, 0.6)");
		ctx.set_font("12px sans-serif");
		let _ = ctx.fill_text("laying out…", 12.0, state.height - 12.0);
	}
}

fn draw_edges(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let k = state.transform.k;
	let t = ease_out_cubic(state.hover.strength);
	let hovered = state.hover.shown().map(|h| h.node.as_str());
	let dashed = js_sys::Array::of2(&JsValue::from_f64(6.0 / k), &JsValue::from_f64(4.0 / k));
	let solid = js_sys::Array::new();

	for edge in &state.graph.edges {
		// Edges to nodes outside the current view are not drawn
		let (Some(p1), Some(p2)) = (state.position(&edge.source), state.position(&edge.target))
		else {
			continue;
		};
		if p1.distance(p2) < 0.001 {
			continue;
		}

		let touches_hover = hovered.is_some_and(|id| edge.source == id || edge.target == id);
		let base_width = (1.0 + 2.0 * edge.weight) / k;
		let (alpha, width) = if touches_hover {
			(0.5 + 0.5 * edge.weight * t, base_width * (1.0 + 0.5 * edge.weight * t))
		} else {
			(0.5 - 0.4 * t, base_width)
		};

		ctx.set_stroke_style_str(&format!("rgba(148, 163, 184, {alpha})"));
		ctx.set_line_width(width);
		let _ = ctx.set_line_dash(if edge.kind.is_dashed() { &dashed } else { &solid });
		ctx.begin_path();
		ctx.move_to(p1.x, p1.y);
		ctx.line_to(p2.x, p2.y);
		ctx.stroke();
	}
	let _ = ctx.set_line_dash(&solid);
}

/// `#rrggbb` with an alpha channel, as a canvas colour string. Anything else
/// is returned unchanged.
fn tint(color: &str, alpha: f64) -> String {
	let channel = |i: usize| {
		color
			.get(i..i + 2)
			.and_then(|hex| u8::from_str_radix(hex, 16).ok())
	};
	match (color.len(), channel(1), channel(3), channel(5)) {
		(7, Some(r), Some(g), Some(b)) if color.starts_with('#') => {
			format!("rgba({r}, {g}, {b}, {alpha})")
		}
		_ => color.to_string(),
	}
}

fn draw_label(ctx: &CanvasRenderingContext2d, text: &str, x: f64, y: f64, fill: &str, k: f64) {
	ctx.set_fill_style_str(fill);
	ctx.set_font(&format!("{}px sans-serif", 11.0 / k.max(0.5)));
	let _ = ctx.fill_text(text, x, y + 4.0);
}

fn fill_circle(ctx: &CanvasRenderingContext2d, p: Point, radius: f64, fill: &str) {
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, radius, 0.0, 2.0 * PI);
	ctx.set_fill_style_str(fill);
	ctx.fill();
}

/// Halo in the node's own colour, fading to transparent at `outer`.
fn draw_halo(
	ctx: &CanvasRenderingContext2d,
	node: &GraphNode,
	p: Point,
	inner: f64,
	outer: f64,
	alpha: f64,
) {
	let Ok(gradient) = ctx.create_radial_gradient(p.x, p.y, inner, p.x, p.y, outer) else {
		return;
	};
	let _ = gradient.add_color_stop(0.0, &tint(&node.color, alpha));
	let _ = gradient.add_color_stop(1.0, &tint(&node.color, 0.0));
	ctx.begin_path();
	let _ = ctx.arc(p.x, p.y, outer, 0.0, 2.0 * PI);
	#[allow(deprecated)]
	ctx.set_fill_style(&gradient);
	ctx.fill();
}

fn draw_nodes(state: &GraphViewState, ctx: &CanvasRenderingContext2d) {
	let has_highlight = state.has_active_highlight();
	let t = ease_out_cubic(state.hover.strength);
	let k = state.transform.k;

	for node in &state.graph.nodes {
		if has_highlight && state.is_highlighted(&node.id) {
			continue;
		}
		let Some(p) = state.position(&node.id) else {
			continue;
		};
		let alpha = 1.0 - 0.7 * t;
		let radius = node_radius(node);
		fill_circle(ctx, p, radius, &tint(&node.color, alpha));
		let fill = format!("rgba(226, 232, 240, {})", alpha * 0.85);
		draw_label(ctx, &node.label, p.x + radius + 4.0, p.y, &fill, k);
	}

	if !has_highlight {
		return;
	}

	// Highlighted nodes on top. The halo grows with the node's size hint:
	// the hovered node by how connected it is, neighbours by link weight.
	for node in &state.graph.nodes {
		if !state.is_highlighted(&node.id) {
			continue;
		}
		let Some(p) = state.position(&node.id) else {
			continue;
		};
		let base = node_radius(node);
		let hovered = state.is_hovered(&node.id);
		let emphasis = if hovered {
			1.0
		} else {
			state.link_weight(&node.id).unwrap_or(0.5)
		};
		let radius = base * (1.0 + 0.25 * emphasis * t);

		if t > 0.01 {
			let reach = if hovered {
				0.5 + 0.1 * node.connections.min(5) as f64
			} else {
				0.6 * emphasis
			};
			let outer = radius + node.size * reach * t;
			draw_halo(ctx, node, p, radius * 0.5, outer, 0.45 * emphasis * t);
		}
		fill_circle(ctx, p, radius, &node.color);

		let label = if hovered {
			ctx.begin_path();
			let _ = ctx.arc(p.x, p.y, radius + 2.0 / k, 0.0, 2.0 * PI);
			ctx.set_stroke_style_str(&tint(&node.color, 0.9 * t));
			ctx.set_line_width(2.0 / k);
			ctx.stroke();
			format!("{} · {}", node.label, node.connections)
		} else {
			node.label.clone()
		};
		draw_label(ctx, &label, p.x + radius + 4.0, p.y, "white", k);
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn tints_hex_colours() {
		assert_eq!(tint("#3b82f6", 0.5), "rgba(59, 130, 246, 0.5)");
		assert_eq!(tint("#000000", 0.0), "rgba(0, 0, 0, 0)");
	}

	#[test]
	fn leaves_other_colours_alone() {
		assert_eq!(tint("white", 0.3), "white");
		assert_eq!(tint("#fff", 0.3), "#fff");
		assert_eq!(tint("#zzzzzz", 0.3), "#zzzzzz");
	}

	#[test]
	fn easing_hits_endpoints() {
		assert_eq!(ease_out_cubic(0.0), 0.0);
		assert_eq!(ease_out_cubic(1.0), 1.0);
		assert!(ease_out_cubic(0.5) > 0.5);
	}
}
