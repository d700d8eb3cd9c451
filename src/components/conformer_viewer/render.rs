use std::f64::consts::PI;

use web_sys::CanvasRenderingContext2d;

use super::state::ViewState;
use crate::chem::conformer::{Camera, Model, back_to_front};
use crate::theme::{ThemeTokens, element_color};

/// Sphere radius in pixels at scale 1 and no perspective.
const ATOM_RADIUS: f64 = 9.0;
const BOND_WIDTH: f64 = 3.0;
/// Pixel gap between the strokes of a multiple bond.
const BOND_GAP: f64 = 4.0;

pub fn render(
	model: &Model,
	view: &ViewState,
	tokens: &ThemeTokens,
	ctx: &CanvasRenderingContext2d,
	width: f64,
	height: f64,
) {
	ctx.set_fill_style_str(tokens.background);
	ctx.fill_rect(0.0, 0.0, width, height);

	let camera = Camera {
		scale: view.scale,
		pan_x: view.pan.0,
		pan_y: view.pan.1,
		width,
		height,
	};
	let points = model.project(view.rotation, &camera);

	ctx.set_line_cap("round");
	for i in back_to_front(&model.bonds, |b| (points[b.a].depth + points[b.b].depth) / 2.0) {
		let bond = &model.bonds[i];
		let (p, q) = (points[bond.a], points[bond.b]);
		let (dx, dy) = (q.x - p.x, q.y - p.y);
		let len = dx.hypot(dy);
		if len < 1e-6 {
			continue;
		}
		let (nx, ny) = (-dy / len, dx / len);
		let perspective = (p.perspective + q.perspective) / 2.0;

		let gradient = ctx.create_linear_gradient(p.x, p.y, q.x, q.y);
		let _ = gradient.add_color_stop(0.0, element_color(model.atoms[bond.a].element.symbol(), tokens));
		let _ = gradient.add_color_stop(1.0, element_color(model.atoms[bond.b].element.symbol(), tokens));
		ctx.set_stroke_style_canvas_gradient(&gradient);

		let lines = bond.order.lines();
		ctx.set_line_width(BOND_WIDTH * perspective * view.scale.sqrt() / lines as f64 * 1.4);
		for k in 0..lines {
			let offset = (k as f64 - (lines - 1) as f64 / 2.0) * BOND_GAP * perspective;
			ctx.begin_path();
			ctx.move_to(p.x + nx * offset, p.y + ny * offset);
			ctx.line_to(q.x + nx * offset, q.y + ny * offset);
			ctx.stroke();
		}
	}

	for i in back_to_front(&points, |p| p.depth) {
		let p = points[i];
		let atom = &model.atoms[i];
		let r = ATOM_RADIUS * atom.element.radius_scale() * p.perspective * view.scale.sqrt();
		let color = element_color(atom.element.symbol(), tokens);

		let Ok(gradient) = ctx.create_radial_gradient(p.x - r * 0.35, p.y - r * 0.35, r * 0.1, p.x, p.y, r) else {
			continue;
		};
		let _ = gradient.add_color_stop(0.0, "#ffffff");
		let _ = gradient.add_color_stop(0.35, color);
		let _ = gradient.add_color_stop(1.0, "rgba(0, 0, 0, 0.85)");
		ctx.set_fill_style_canvas_gradient(&gradient);
		ctx.begin_path();
		let _ = ctx.arc(p.x, p.y, r, 0.0, 2.0 * PI);
		ctx.fill();
	}
}
