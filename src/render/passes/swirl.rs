use crate::animation::phase::PhaseWindow;
use crate::foundation::core::Point;
use crate::render::paint::{LOGICAL_HEIGHT, LOGICAL_WIDTH, Painter, radial_gradient, rgba};
use crate::render::passes::RenderPass;
use kurbo::Circle;
use std::f64::consts::TAU;

const RAMP: PhaseWindow = PhaseWindow::new(0.45, 0.70);
const PARTICLES: u32 = 28;
const ORBIT_SPEED: f64 = 4.0;
const JITTER_RATE: f64 = 5.0;
const JITTER_PX: f64 = 3.0;
const SQUASH: f64 = 0.6;
const BASE_ALPHA: f64 = 0.06;
const RAMP_ALPHA: f64 = 0.12;

/// Soft energy particles orbiting the figure once the armor starts forming.
#[derive(Clone, Copy, Debug, Default)]
pub struct SwirlPass;

/// Placement and look of one particle.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Particle {
    /// Center in logical space.
    pub center: Point,
    /// Radius of the radial falloff.
    pub radius: f64,
    /// Opacity at the particle center.
    pub alpha: f64,
}

impl SwirlPass {
    /// Orbit center in logical space.
    pub fn center() -> Point {
        Point::new(LOGICAL_WIDTH * 0.35, LOGICAL_HEIGHT * 0.48)
    }

    /// Number of particles painted per frame.
    pub fn particle_count() -> u32 {
        PARTICLES
    }

    /// Largest opacity any particle can reach.
    pub fn alpha_cap() -> f64 {
        BASE_ALPHA + RAMP_ALPHA
    }

    /// `true` once `t` is past the ramp start.
    pub fn is_active(t: f64) -> bool {
        RAMP.is_active(t)
    }

    /// Center opacity of particle `i`; outer particles are dimmer.
    pub fn particle_alpha(i: u32, t: f64) -> f64 {
        let e = RAMP.eased(t);
        let depth = f64::from(i) / f64::from(PARTICLES);
        BASE_ALPHA + RAMP_ALPHA * e * (1.0 - depth)
    }

    /// Particle `i` at time `t`.
    pub fn particle(i: u32, t: f64) -> Particle {
        let fi = f64::from(i);
        let angle = fi / f64::from(PARTICLES) * TAU + t * ORBIT_SPEED;
        let orbit = 40.0 + fi * 3.0 + (t * JITTER_RATE + fi).sin() * JITTER_PX;
        let c = Self::center();
        let size = f64::from(1 + i % 3);
        Particle {
            center: Point::new(c.x + angle.cos() * orbit, c.y + angle.sin() * orbit * SQUASH),
            radius: 16.0 + size * 4.0,
            alpha: Self::particle_alpha(i, t),
        }
    }
}

impl RenderPass for SwirlPass {
    fn name(&self) -> &'static str {
        "swirl"
    }

    fn paint(&self, painter: &mut Painter<'_>, t: f64) {
        if !Self::is_active(t) {
            return;
        }
        for i in 0..PARTICLES {
            let particle = Self::particle(i, t);
            painter.fill_gradient(
                &Circle::new(particle.center, particle.radius),
                radial_gradient(
                    particle.center,
                    particle.radius,
                    rgba(190, 220, 255, particle.alpha),
                    rgba(190, 220, 255, 0.0),
                ),
            );
        }
    }
}
