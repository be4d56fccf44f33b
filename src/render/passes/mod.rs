//! Ordered procedural render passes.
//!
//! Each pass is a pure function of normalized time: given the same `t` it paints the same
//! pixels. Passes are composed into a [`PassChain`] that runs them in a fixed order on every
//! frame, so they can also be exercised one at a time against fixed `t` values.

mod background;
mod figure;
mod moon;
mod swirl;

pub use background::{BackgroundPass, Star};
pub use figure::{FigurePass, FigureProgress};
pub use moon::MoonPass;
pub use swirl::{Particle, SwirlPass};

use crate::foundation::math::clamp01;
use crate::render::paint::Painter;
use crate::render::surface::DrawingSurface;

/// One layer of the procedural frame.
pub trait RenderPass: Send + Sync + std::fmt::Debug {
    /// Stable pass name used in logs and tests.
    fn name(&self) -> &'static str;

    /// Paint this pass for normalized time `t` in `[0, 1]`.
    fn paint(&self, painter: &mut Painter<'_>, t: f64);
}

/// Passes executed front-to-back in insertion order on every frame.
#[derive(Debug, Default)]
pub struct PassChain {
    passes: Vec<Box<dyn RenderPass>>,
}

impl PassChain {
    /// Chain without passes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The standard compositing order: background, moon, figure, swirl.
    pub fn standard() -> Self {
        Self::new()
            .with(BackgroundPass::default())
            .with(MoonPass)
            .with(FigurePass)
            .with(SwirlPass)
    }

    /// Append a pass; it will paint after every pass already in the chain.
    pub fn with(mut self, pass: impl RenderPass + 'static) -> Self {
        self.passes.push(Box::new(pass));
        self
    }

    /// Pass names in execution order.
    pub fn names(&self) -> Vec<&'static str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Number of passes in the chain.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Return `true` when the chain has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }

    /// Paint one full frame for `t` (clamped into `[0, 1]`).
    pub fn render(&self, surface: &mut DrawingSurface, t: f64) {
        let t = clamp01(t);
        surface.paint_frame(|painter| {
            for pass in &self.passes {
                pass.paint(painter, t);
            }
        });
    }
}

#[cfg(test)]
#[path = "../../../tests/unit/render/passes.rs"]
mod tests;
