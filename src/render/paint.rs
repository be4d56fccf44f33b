use crate::foundation::core::{Affine, BezPath, Point, Rect};
use crate::foundation::math::alpha_u8;
use kurbo::Shape;
use vello_cpu::peniko::{BlendMode, Color, Compose, Gradient, Mix};

/// Width of the logical drawing space every pass paints in.
pub const LOGICAL_WIDTH: f64 = 1280.0;
/// Height of the logical drawing space every pass paints in.
pub const LOGICAL_HEIGHT: f64 = 720.0;

const PATH_TOLERANCE: f64 = 0.1;

/// Straight-alpha color with a float opacity, as passes describe it.
pub fn rgba(r: u8, g: u8, b: u8, a: f64) -> Color {
    Color::from_rgba8(r, g, b, alpha_u8(a))
}

/// Opaque color from a `0xRRGGBB` literal.
pub fn hex(rgb: u32) -> Color {
    Color::from_rgba8((rgb >> 16) as u8, (rgb >> 8) as u8, rgb as u8, 255)
}

/// Two-stop linear gradient between `from` and `to` in logical space.
pub fn linear_gradient(from: Point, to: Point, start: Color, end: Color) -> Gradient {
    Gradient::new_linear(point_to_cpu(from), point_to_cpu(to)).with_stops([start, end])
}

/// Two-stop radial gradient centered at `center` in logical space.
pub fn radial_gradient(center: Point, radius: f64, inner: Color, outer: Color) -> Gradient {
    Gradient::new_radial(point_to_cpu(center), radius as f32).with_stops([inner, outer])
}

/// Drawing facade over a `vello_cpu` context.
///
/// Coordinates are logical (1280x720); the painter scales them to the surface resolution.
/// Local transforms nest through [`Painter::with_local`].
pub struct Painter<'a> {
    ctx: &'a mut vello_cpu::RenderContext,
    base: Affine,
    local: Affine,
}

impl<'a> Painter<'a> {
    pub(crate) fn new(ctx: &'a mut vello_cpu::RenderContext, base: Affine) -> Self {
        ctx.set_blend_mode(BlendMode::default());
        ctx.set_paint_transform(vello_cpu::kurbo::Affine::IDENTITY);
        Self {
            ctx,
            base,
            local: Affine::IDENTITY,
        }
    }

    /// Fill `shape` with a solid color.
    pub fn fill(&mut self, shape: &impl Shape, color: Color) {
        self.apply_transform();
        self.ctx.set_paint(color);
        self.ctx.fill_path(&shape_to_cpu(shape));
    }

    /// Fill `shape` with a gradient whose geometry is in the same space as the shape.
    pub fn fill_gradient(&mut self, shape: &impl Shape, gradient: Gradient) {
        self.apply_transform();
        self.ctx.set_paint(gradient);
        self.ctx.fill_path(&shape_to_cpu(shape));
    }

    /// Fill an axis-aligned rectangle with a solid color.
    pub fn fill_rect(&mut self, rect: Rect, color: Color) {
        self.apply_transform();
        self.ctx.set_paint(color);
        self.ctx.fill_rect(&rect_to_cpu(rect));
    }

    /// Stroke the outline of `shape`.
    pub fn stroke(&mut self, shape: &impl Shape, color: Color, width: f64) {
        self.apply_transform();
        self.ctx.set_paint(color);
        self.ctx.set_stroke(vello_cpu::kurbo::Stroke::new(width));
        self.ctx.stroke_path(&shape_to_cpu(shape));
    }

    /// Run `f` with `transform` applied on top of the current local transform.
    pub fn with_local<R>(&mut self, transform: Affine, f: impl FnOnce(&mut Self) -> R) -> R {
        let saved = self.local;
        self.local = saved * transform;
        let out = f(self);
        self.local = saved;
        out
    }

    /// Paint `f` into an isolated layer that is composited normally when it ends.
    ///
    /// Masked paint inside the layer only sees what was drawn inside the same layer.
    pub fn isolated<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.ctx.push_blend_layer(BlendMode::default());
        let out = f(self);
        self.ctx.pop_layer();
        out
    }

    /// Paint `f` with source-atop compositing: pixels only land where the backdrop already has
    /// coverage, weighted by the backdrop alpha.
    pub fn masked<R>(&mut self, f: impl FnOnce(&mut Self) -> R) -> R {
        self.ctx
            .push_blend_layer(BlendMode::new(Mix::Normal, Compose::SrcAtop));
        let out = f(self);
        self.ctx.pop_layer();
        out
    }

    fn apply_transform(&mut self) {
        self.ctx.set_transform(affine_to_cpu(self.base * self.local));
    }
}

fn shape_to_cpu(shape: &impl Shape) -> vello_cpu::kurbo::BezPath {
    bezpath_to_cpu(&shape.to_path(PATH_TOLERANCE))
}

fn point_to_cpu(p: Point) -> vello_cpu::kurbo::Point {
    vello_cpu::kurbo::Point::new(p.x, p.y)
}

fn rect_to_cpu(r: Rect) -> vello_cpu::kurbo::Rect {
    vello_cpu::kurbo::Rect::new(r.x0, r.y0, r.x1, r.y1)
}

pub(crate) fn affine_to_cpu(a: Affine) -> vello_cpu::kurbo::Affine {
    vello_cpu::kurbo::Affine::new(a.as_coeffs())
}

fn bezpath_to_cpu(path: &BezPath) -> vello_cpu::kurbo::BezPath {
    use kurbo::PathEl;

    let mut out = vello_cpu::kurbo::BezPath::new();
    for &el in path.elements() {
        match el {
            PathEl::MoveTo(p) => out.move_to(point_to_cpu(p)),
            PathEl::LineTo(p) => out.line_to(point_to_cpu(p)),
            PathEl::QuadTo(p1, p2) => out.quad_to(point_to_cpu(p1), point_to_cpu(p2)),
            PathEl::CurveTo(p1, p2, p3) => {
                out.curve_to(point_to_cpu(p1), point_to_cpu(p2), point_to_cpu(p3));
            }
            PathEl::ClosePath => out.close_path(),
        }
    }
    out
}

#[cfg(test)]
#[path = "../../tests/unit/render/paint.rs"]
mod tests;
