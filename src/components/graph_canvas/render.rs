use std::f64::consts::PI;

use wasm_bindgen::JsValue;
use web_sys::CanvasRenderingContext2d;

use super::handles::edge_endpoints;
use super::state::{GraphCanvasState, NODE_HEIGHT, NODE_WIDTH};
use crate::chem::depiction_for;
use crate::selection::Selection;
use crate::theme::{ThemeTokens, element_color};

/// Below this zoom, cards show only their label.
const DETAIL_ZOOM: f64 = 0.3;
const CARD_RADIUS: f64 = 10.0;
const LABEL_BAND: f64 = 28.0;
const STRUCTURE_PADDING: f64 = 10.0;
/// Pixels per bond length cap, so tiny molecules don't balloon.
const MAX_BOND_PX: f64 = 30.0;
const GRID_STEP: f64 = 100.0;
const DIMMED: f64 = 0.18;

pub fn render(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d) {
	let tokens = state.theme.tokens();
	ctx.set_fill_style_str(tokens.background);
	ctx.fill_rect(0.0, 0.0, state.width, state.height);
	ctx.save();
	let _ = ctx.translate(state.transform.x, state.transform.y);
	let _ = ctx.scale(state.transform.k, state.transform.k);
	draw_grid(state, ctx, tokens);
	draw_edges(state, ctx, tokens);
	draw_nodes(state, ctx, tokens);
	ctx.restore();
}

fn draw_grid(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d, tokens: &ThemeTokens) {
	let k = state.transform.k;
	if k < DETAIL_ZOOM {
		return;
	}
	let (x0, y0) = state.screen_to_graph(0.0, 0.0);
	let (x1, y1) = state.screen_to_graph(state.width, state.height);
	ctx.set_fill_style_str(tokens.grid);
	let r = 1.5 / k;
	let mut gx = (x0 / GRID_STEP).floor() * GRID_STEP;
	while gx <= x1 {
		let mut gy = (y0 / GRID_STEP).floor() * GRID_STEP;
		while gy <= y1 {
			ctx.fill_rect(gx - r, gy - r, 2.0 * r, 2.0 * r);
			gy += GRID_STEP;
		}
		gx += GRID_STEP;
	}
}

fn draw_edges(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d, tokens: &ThemeTokens) {
	let k = state.transform.k;
	let (line_width, dash, gap, arrow_size) = (2.0 / k.max(0.5), 8.0 / k, 4.0 / k, 10.0 / k.max(0.5));
	let dash_offset = -(state.flow_time * 30.0) % (dash + gap);
	let centers = state.node_centers();
	let selected_edge = match &state.selection {
		Selection::Edge(id) => Some(id.as_str()),
		_ => None,
	};

	for edge in &state.edges {
		let (Some(&a), Some(&b)) = (centers.get(&edge.source), centers.get(&edge.target)) else {
			continue;
		};
		let ((x1, y1), (x2, y2)) = edge_endpoints(a, b, NODE_WIDTH, NODE_HEIGHT);
		let (dx, dy) = (x2 - x1, y2 - y1);
		let dist = (dx * dx + dy * dy).sqrt();
		if dist < 0.001 {
			continue;
		}

		let is_selected = selected_edge == Some(edge.id.as_str());
		let alpha = if state.highlight.shows_edge(&edge.id) {
			0.85
		} else {
			DIMMED
		};
		let rgb = edge.category.rgb().unwrap_or(tokens.edge_rgb);
		let color = format!("rgba({}, {})", rgb, alpha);
		let width = if is_selected { line_width * 2.0 } else { line_width };

		ctx.set_stroke_style_str(if is_selected { tokens.selected } else { color.as_str() });
		ctx.set_line_width(width);
		if state.highlight.active && alpha > DIMMED {
			let _ = ctx.set_line_dash(&js_sys::Array::of2(
				&JsValue::from_f64(dash),
				&JsValue::from_f64(gap),
			));
			ctx.set_line_dash_offset(dash_offset);
		}

		let (ux, uy) = (dx / dist, dy / dist);
		ctx.begin_path();
		ctx.move_to(x1, y1);
		ctx.line_to(x2 - ux * arrow_size, y2 - uy * arrow_size);
		ctx.stroke();
		let _ = ctx.set_line_dash(&js_sys::Array::new());

		ctx.set_fill_style_str(if is_selected { tokens.selected } else { color.as_str() });
		let (back_x, back_y) = (x2 - ux * arrow_size, y2 - uy * arrow_size);
		let (px, py) = (-uy * arrow_size * 0.5, ux * arrow_size * 0.5);
		ctx.begin_path();
		ctx.move_to(x2, y2);
		ctx.line_to(back_x + px, back_y + py);
		ctx.line_to(back_x - px, back_y - py);
		ctx.close_path();
		ctx.fill();

		if k >= DETAIL_ZOOM && !edge.label.is_empty() {
			draw_edge_label(ctx, tokens, &edge.label, (x1 + x2) / 2.0, (y1 + y2) / 2.0, alpha);
		}
	}
}

fn draw_edge_label(ctx: &CanvasRenderingContext2d, tokens: &ThemeTokens, label: &str, x: f64, y: f64, alpha: f64) {
	ctx.set_font("11px sans-serif");
	let w = ctx.measure_text(label).map(|m| m.width()).unwrap_or(label.len() as f64 * 6.0);
	ctx.set_global_alpha(alpha.max(0.35));
	ctx.set_fill_style_str(tokens.surface);
	rounded_rect(ctx, x - w / 2.0 - 5.0, y - 9.0, w + 10.0, 18.0, 4.0);
	ctx.fill();
	ctx.set_fill_style_str(tokens.text);
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	let _ = ctx.fill_text(label, x, y);
	ctx.set_global_alpha(1.0);
}

fn draw_nodes(state: &GraphCanvasState, ctx: &CanvasRenderingContext2d, tokens: &ThemeTokens) {
	let k = state.transform.k;
	let selected_node = match &state.selection {
		Selection::Node(id) => Some(id.as_str()),
		_ => None,
	};

	state.graph.visit_nodes(|node| {
		let info = &node.data.user_data;
		let (cx, cy) = (node.x() as f64, node.y() as f64);
		let (x, y) = (cx - NODE_WIDTH / 2.0, cy - NODE_HEIGHT / 2.0);
		let is_selected = selected_node == Some(info.id.as_str());
		let is_hovered = state.hover == Some(node.index());

		ctx.set_global_alpha(if state.highlight.shows_node(&info.id) { 1.0 } else { DIMMED });

		ctx.set_fill_style_str(tokens.surface);
		rounded_rect(ctx, x, y, NODE_WIDTH, NODE_HEIGHT, CARD_RADIUS);
		ctx.fill();
		let (border, border_width) = if is_selected {
			(tokens.selected, 3.0)
		} else if is_hovered {
			(tokens.accent, 2.0)
		} else {
			(tokens.surface_border, 1.0)
		};
		ctx.set_stroke_style_str(border);
		ctx.set_line_width(border_width / k.max(0.5));
		ctx.stroke();

		if k >= DETAIL_ZOOM && !info.smiles.trim().is_empty() {
			draw_structure(
				ctx,
				tokens,
				&info.smiles,
				(x, y, NODE_WIDTH, NODE_HEIGHT - LABEL_BAND),
			);
		}

		ctx.set_fill_style_str(tokens.text);
		// Labels keep a readable screen size once structures are hidden.
		let font_px = if k >= DETAIL_ZOOM { 13.0 } else { (4.0 / k).min(48.0) };
		ctx.set_font(&format!("bold {}px sans-serif", font_px));
		ctx.set_text_align("center");
		ctx.set_text_baseline("middle");
		let _ = ctx.fill_text_with_max_width(
			&info.label,
			cx,
			y + NODE_HEIGHT - LABEL_BAND / 2.0,
			NODE_WIDTH - 12.0,
		);
		ctx.set_global_alpha(1.0);
	});
}

/// The compound's skeletal structure, or its raw notation when unparseable.
fn draw_structure(
	ctx: &CanvasRenderingContext2d,
	tokens: &ThemeTokens,
	smiles: &str,
	(x, y, w, h): (f64, f64, f64, f64),
) {
	let drawn = depiction_for(smiles);
	let depiction = match drawn.as_ref() {
		Ok(d) if !d.is_empty() => d,
		_ => {
			ctx.set_fill_style_str(tokens.text_muted);
			ctx.set_font("11px monospace");
			ctx.set_text_align("center");
			ctx.set_text_baseline("middle");
			let _ = ctx.fill_text_with_max_width(smiles, x + w / 2.0, y + h / 2.0, w - 12.0);
			return;
		}
	};

	let (scale, ox, oy) = depiction.fit(w, h, STRUCTURE_PADDING, MAX_BOND_PX);
	let tx = |px: f64| x + ox + px * scale;
	let ty = |py: f64| y + oy + py * scale;

	ctx.set_stroke_style_str(tokens.bond);
	ctx.set_line_width(1.4);
	ctx.set_line_cap("round");
	ctx.begin_path();
	for bond in &depiction.bonds {
		for [p, q] in depiction.bond_segments(bond) {
			ctx.move_to(tx(p.0), ty(p.1));
			ctx.line_to(tx(q.0), ty(q.1));
		}
	}
	ctx.stroke();

	for ring in &depiction.aromatic_rings {
		ctx.begin_path();
		let _ = ctx.arc(tx(ring.cx), ty(ring.cy), ring.radius * scale, 0.0, 2.0 * PI);
		ctx.stroke();
	}

	let font_px = (scale * 0.45).clamp(7.0, 13.0);
	ctx.set_font(&format!("{}px sans-serif", font_px));
	ctx.set_text_align("center");
	ctx.set_text_baseline("middle");
	for atom in &depiction.atoms {
		if let Some(label) = &atom.label {
			ctx.set_fill_style_str(element_color(atom.element.symbol(), tokens));
			let _ = ctx.fill_text(label, tx(atom.x), ty(atom.y));
		}
	}
}

fn rounded_rect(ctx: &CanvasRenderingContext2d, x: f64, y: f64, w: f64, h: f64, r: f64) {
	ctx.begin_path();
	ctx.move_to(x + r, y);
	let _ = ctx.arc_to(x + w, y, x + w, y + h, r);
	let _ = ctx.arc_to(x + w, y + h, x, y + h, r);
	let _ = ctx.arc_to(x, y + h, x, y, r);
	let _ = ctx.arc_to(x, y, x + w, y, r);
	ctx.close_path();
}
