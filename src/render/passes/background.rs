use crate::animation::field::ProceduralField;
use crate::foundation::core::{Point, Rect};
use crate::render::paint::{LOGICAL_HEIGHT, LOGICAL_WIDTH, Painter, hex, linear_gradient, rgba};
use crate::render::passes::RenderPass;

const SKY_TOP: u32 = 0x020615;
const SKY_BOTTOM: u32 = 0x00040c;
const STAR_COUNT: u64 = 220;
const STAR_BAND: f64 = 0.7;
const TWINKLE_RATE: f64 = 20.0;

/// Sky gradient, twinkling star field and horizon mist. Always fully repaints the frame.
#[derive(Clone, Copy, Debug)]
pub struct BackgroundPass {
    field: ProceduralField,
}

impl Default for BackgroundPass {
    fn default() -> Self {
        Self {
            field: ProceduralField::new(0x6d6f_6f6e),
        }
    }
}

/// One point light of the star field.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Star {
    /// Top-left corner of the 1x1 logical pixel.
    pub pos: Point,
    /// Time-invariant base brightness in `[0.4, 1.0)`.
    pub base: f64,
}

impl BackgroundPass {
    /// Background whose star placement is driven by `field`.
    pub fn with_field(field: ProceduralField) -> Self {
        Self { field }
    }

    /// Star `i`; position and base brightness depend only on the index.
    pub fn star(&self, i: u64) -> Star {
        let x = (self.field.sample(i, 0) * LOGICAL_WIDTH).floor();
        let y = (self.field.sample(i, 1) * LOGICAL_HEIGHT * STAR_BAND).floor();
        Star {
            pos: Point::new(x, y),
            base: self.field.range(i, 2, 0.4, 1.0),
        }
    }

    /// Opacity of star `i` at time `t`.
    pub fn star_alpha(&self, i: u64, t: f64) -> f64 {
        let twinkle = 0.5 + 0.5 * (t * TWINKLE_RATE + i as f64).sin();
        self.star(i).base * twinkle * 0.9
    }
}

impl RenderPass for BackgroundPass {
    fn name(&self) -> &'static str {
        "background"
    }

    fn paint(&self, painter: &mut Painter<'_>, t: f64) {
        let full = Rect::new(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT);
        painter.fill_gradient(
            &full,
            linear_gradient(
                Point::new(0.0, 0.0),
                Point::new(0.0, LOGICAL_HEIGHT),
                hex(SKY_TOP),
                hex(SKY_BOTTOM),
            ),
        );

        for i in 0..STAR_COUNT {
            let star = self.star(i);
            painter.fill_rect(
                Rect::new(star.pos.x, star.pos.y, star.pos.x + 1.0, star.pos.y + 1.0),
                rgba(200, 220, 255, self.star_alpha(i, t)),
            );
        }

        let mist = Rect::new(0.0, LOGICAL_HEIGHT * 0.55, LOGICAL_WIDTH, LOGICAL_HEIGHT);
        painter.fill_gradient(
            &mist,
            linear_gradient(
                Point::new(0.0, LOGICAL_HEIGHT * 0.6),
                Point::new(0.0, LOGICAL_HEIGHT),
                rgba(200, 220, 255, 0.0),
                rgba(150, 180, 255, 0.12),
            ),
        );
    }
}
