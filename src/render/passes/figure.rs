use crate::animation::phase::PhaseWindow;
use crate::foundation::core::{Affine, BezPath, Point, Vec2};
use crate::render::paint::{LOGICAL_HEIGHT, LOGICAL_WIDTH, Painter, rgba};
use crate::render::passes::RenderPass;
use kurbo::{Arc, Circle, Ellipse, Line, RoundedRect};
use std::f64::consts::PI;

const APPEAR: PhaseWindow = PhaseWindow::new(0.2, 0.6);
const ARMOR: PhaseWindow = PhaseWindow::new(0.5, 1.0);
const ARMOR_RINGS: u32 = 6;
const CLOAK_WIND_HZ: f64 = 0.8;
const CLOAK_WIND_PX: f64 = 8.0;

/// Eased progress of the two independent figure tracks.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FigureProgress {
    /// Body parts fade in over `[0.2, 0.6]`.
    pub appear: f64,
    /// Eyes, armor rings, emblem and highlights coalesce over `[0.5, 1.0]`.
    pub armor: f64,
}

impl FigureProgress {
    /// Progress of both tracks at `t`.
    pub fn at(t: f64) -> Self {
        Self {
            appear: APPEAR.eased(t),
            armor: ARMOR.eased(t),
        }
    }
}

/// The cloaked figure and its armor.
#[derive(Clone, Copy, Debug, Default)]
pub struct FigurePass;

impl FigurePass {
    /// Ground anchor of the figure in logical space.
    pub fn anchor() -> Point {
        Point::new(LOGICAL_WIDTH * 0.35, LOGICAL_HEIGHT * 0.62)
    }

    /// Horizontal cloak displacement at `t`; amplitude grows with appear progress.
    pub fn cloak_wave(t: f64) -> f64 {
        let appear = FigureProgress::at(t).appear;
        (t * PI * 2.0 * CLOAK_WIND_HZ).sin() * CLOAK_WIND_PX * (0.5 + 0.5 * appear)
    }

    fn cloak_path(wave: f64) -> BezPath {
        let mut path = BezPath::new();
        path.move_to((-20.0, -180.0));
        path.curve_to((-160.0 - wave, -120.0), (-180.0, -40.0), (-100.0, 10.0));
        path.curve_to((-40.0, 20.0), (-20.0, 30.0), (0.0, 0.0));
        path.close_path();
        path
    }

    fn paint_body(painter: &mut Painter<'_>, t: f64, appear: f64) {
        painter.fill(
            &Ellipse::new((0.0, 8.0), (120.0, 18.0), 0.0),
            rgba(0, 0, 0, 0.2 + 0.25 * appear),
        );
        painter.fill(
            &Self::cloak_path(Self::cloak_wave(t)),
            rgba(18, 24, 40, 0.8 * appear),
        );
        painter.fill(
            &RoundedRect::new(-28.0, -150.0, 28.0, -30.0, 12.0),
            rgba(15, 20, 32, 0.9 * appear),
        );
        painter.fill(&Circle::new((0.0, -174.0), 24.0), rgba(12, 16, 28, appear));

        let arms = rgba(12, 16, 28, 0.95 * appear);
        painter.fill(&RoundedRect::new(-58.0, -130.0, -28.0, -42.0, 14.0), arms);
        painter.fill(&RoundedRect::new(28.0, -130.0, 58.0, -42.0, 14.0), arms);
    }

    fn paint_armor(painter: &mut Painter<'_>, armor: f64) {
        let glow = 0.25 + 0.75 * armor;
        let eyes = rgba(255, 255, 255, 0.35 + 0.45 * glow);
        painter.fill(&Ellipse::new((-8.0, -176.0), (5.0, 3.0), 0.0), eyes);
        painter.fill(&Ellipse::new((8.0, -176.0), (5.0, 3.0), 0.0), eyes);

        let rings = rgba(230, 240, 255, 0.1 + 0.8 * armor);
        for i in 0..ARMOR_RINGS {
            let r = 26.0 + f64::from(i) * 12.0;
            let arc = Arc::new(
                (0.0, -108.0),
                Vec2::new(r, r),
                PI * 0.1,
                PI * (1.8 - 0.1),
                0.0,
            );
            painter.stroke(&arc, rings, 2.0);
        }

        // Chest emblem: ring outline with a crescent masked onto it.
        painter.isolated(|p| {
            p.stroke(
                &Circle::new((0.0, -92.0), 20.0),
                rgba(245, 250, 255, 0.2 + 0.8 * armor),
                2.0,
            );
            p.masked(|p| {
                p.fill(
                    &Circle::new((6.0, -92.0), 18.0),
                    rgba(245, 250, 255, 0.4 + 0.6 * armor),
                );
            });
        });

        let edges = rgba(200, 230, 255, 0.08 + 0.4 * armor);
        painter.stroke(&Line::new((-28.0, -150.0), (-28.0, -30.0)), edges, 3.0);
        painter.stroke(&Line::new((28.0, -150.0), (28.0, -30.0)), edges, 3.0);
    }
}

impl RenderPass for FigurePass {
    fn name(&self) -> &'static str {
        "figure"
    }

    fn paint(&self, painter: &mut Painter<'_>, t: f64) {
        let progress = FigureProgress::at(t);
        let anchor = Self::anchor();
        painter.with_local(Affine::translate(anchor.to_vec2()), |p| {
            Self::paint_body(p, t, progress.appear);
            Self::paint_armor(p, progress.armor);
        });
    }
}
