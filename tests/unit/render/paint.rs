use super::*;
use crate::foundation::core::Canvas;
use crate::render::surface::DrawingSurface;
use kurbo::Circle;

fn surface() -> DrawingSurface {
    DrawingSurface::new(Canvas {
        width: 128,
        height: 72,
    })
    .unwrap()
}

// Logical -> device scale is 0.1 for a 128x72 surface.
fn device(s: &DrawingSurface, lx: f64, ly: f64) -> [u8; 4] {
    s.pixel((lx * 0.1) as u32, (ly * 0.1) as u32).unwrap()
}

#[test]
fn rgba_quantizes_alpha() {
    let c = rgba(10, 20, 30, 0.5).to_rgba8();
    assert_eq!((c.r, c.g, c.b, c.a), (10, 20, 30, 128));
    let c = hex(0x0a141e).to_rgba8();
    assert_eq!((c.r, c.g, c.b, c.a), (10, 20, 30, 255));
}

#[test]
fn masked_paint_only_lands_on_existing_coverage() {
    let mut s = surface();
    s.paint_frame(|p| {
        p.isolated(|p| {
            p.fill(&Circle::new((300.0, 360.0), 200.0), hex(0x0000ff));
            p.masked(|p| {
                p.fill_rect(Rect::new(0.0, 0.0, LOGICAL_WIDTH, LOGICAL_HEIGHT), hex(0xff0000));
            });
        });
    });
    // Inside the base disc the red mask replaced the blue.
    assert_eq!(device(&s, 300.0, 360.0), [255, 0, 0, 255]);
    // Outside the disc nothing was painted at all.
    assert_eq!(device(&s, 1000.0, 360.0), [0, 0, 0, 0]);
}

#[test]
fn with_local_translates_and_restores() {
    let mut s = surface();
    s.paint_frame(|p| {
        p.with_local(Affine::translate((640.0, 0.0)), |p| {
            p.fill_rect(Rect::new(0.0, 0.0, 100.0, 100.0), hex(0x00ff00));
        });
        p.fill_rect(Rect::new(0.0, 600.0, 100.0, 700.0), hex(0x0000ff));
    });
    assert_eq!(device(&s, 690.0, 50.0), [0, 255, 0, 255]);
    assert_eq!(device(&s, 50.0, 50.0), [0, 0, 0, 0]);
    assert_eq!(device(&s, 50.0, 650.0), [0, 0, 255, 255]);
}

#[test]
fn stroke_leaves_interior_empty() {
    let mut s = surface();
    s.paint_frame(|p| {
        p.stroke(&Circle::new((640.0, 360.0), 300.0), hex(0xffffff), 20.0);
    });
    assert_eq!(device(&s, 640.0, 360.0), [0, 0, 0, 0]);
    assert!(device(&s, 940.0, 360.0)[3] > 200);
}
