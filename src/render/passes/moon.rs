use crate::animation::ease::lerp;
use crate::animation::phase::PhaseWindow;
use crate::foundation::core::Point;
use crate::render::paint::{LOGICAL_HEIGHT, LOGICAL_WIDTH, Painter, hex, rgba};
use crate::render::passes::RenderPass;
use kurbo::Circle;

const RADIUS: f64 = 100.0;
const GROWTH: PhaseWindow = PhaseWindow::new(0.1, 0.25);
const HALO_RINGS: u32 = 4;

/// The primary body: a disc, a source-atop reveal and faint halo rings.
#[derive(Clone, Copy, Debug, Default)]
pub struct MoonPass;

impl MoonPass {
    /// Disc center in logical space.
    pub fn center() -> Point {
        Point::new(LOGICAL_WIDTH * 0.78, LOGICAL_HEIGHT * 0.24)
    }

    /// Eased growth progress at `t`.
    pub fn growth(t: f64) -> f64 {
        GROWTH.eased(t)
    }

    /// Reveal disc (center, radius) at `t`; it slides from +70px onto the body while growing.
    pub fn reveal(t: f64) -> (Point, f64) {
        let e = Self::growth(t);
        let c = Self::center();
        (
            Point::new(c.x + lerp(70.0, 0.0, e), c.y),
            RADIUS * (0.2 + 0.8 * e),
        )
    }
}

impl RenderPass for MoonPass {
    fn name(&self) -> &'static str {
        "moon"
    }

    fn paint(&self, painter: &mut Painter<'_>, t: f64) {
        let e = Self::growth(t);
        let center = Self::center();

        painter.isolated(|p| {
            p.fill(
                &Circle::new(center, RADIUS),
                rgba(245, 250, 255, 0.15 + 0.6 * e),
            );
            let (reveal_center, reveal_radius) = Self::reveal(t);
            p.masked(|p| {
                p.fill(&Circle::new(reveal_center, reveal_radius), hex(0xeef6ff));
            });
        });

        for i in 0..HALO_RINGS {
            let i = f64::from(i);
            painter.stroke(
                &Circle::new(center, RADIUS + 18.0 * i),
                rgba(190, 220, 255, 0.04 - 0.006 * i),
                6.0,
            );
        }
    }
}
