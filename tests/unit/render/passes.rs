use super::*;
use crate::foundation::core::Canvas;

const SAMPLE_TIMES: [f64; 7] = [0.0, 0.1, 0.3, 0.5, 0.55, 0.8, 1.0];

fn canvas() -> Canvas {
    Canvas {
        width: 160,
        height: 90,
    }
}

fn render_single(pass: impl RenderPass + 'static, t: f64) -> Vec<u8> {
    let mut surface = DrawingSurface::new(canvas()).unwrap();
    PassChain::new().with(pass).render(&mut surface, t);
    surface.data().to_vec()
}

fn render_standard(t: f64) -> Vec<u8> {
    let mut surface = DrawingSurface::new(canvas()).unwrap();
    PassChain::standard().render(&mut surface, t);
    surface.data().to_vec()
}

#[test]
fn standard_chain_runs_in_fixed_order() {
    let chain = PassChain::standard();
    assert_eq!(chain.names(), vec!["background", "moon", "figure", "swirl"]);
    assert_eq!(chain.len(), 4);
    assert!(!chain.is_empty());
    assert!(PassChain::new().is_empty());
}

#[test]
fn every_pass_is_deterministic_per_time() {
    for t in SAMPLE_TIMES {
        assert_eq!(
            render_single(BackgroundPass::default(), t),
            render_single(BackgroundPass::default(), t),
            "background t={t}"
        );
        assert_eq!(render_single(MoonPass, t), render_single(MoonPass, t), "moon t={t}");
        assert_eq!(render_single(FigurePass, t), render_single(FigurePass, t), "figure t={t}");
        assert_eq!(render_single(SwirlPass, t), render_single(SwirlPass, t), "swirl t={t}");
    }
}

#[test]
fn repeated_and_non_monotonic_times_reproduce_frames() {
    let mut surface = DrawingSurface::new(canvas()).unwrap();
    let chain = PassChain::standard();
    chain.render(&mut surface, 0.7);
    let first = surface.data().to_vec();
    chain.render(&mut surface, 0.2);
    chain.render(&mut surface, 0.9);
    chain.render(&mut surface, 0.7);
    assert_eq!(surface.data(), first.as_slice());
}

#[test]
fn background_repaints_every_pixel_opaque() {
    let data = render_single(BackgroundPass::default(), 0.4);
    assert!(data.chunks_exact(4).all(|px| px[3] == 255));
}

#[test]
fn star_positions_ignore_time_but_brightness_twinkles() {
    let bg = BackgroundPass::default();
    for i in 0..220 {
        let s = bg.star(i);
        assert!((0.0..1280.0).contains(&s.pos.x));
        assert!((0.0..720.0 * 0.7).contains(&s.pos.y));
        assert!((0.4..1.0).contains(&s.base));
        assert_eq!(s, bg.star(i));
    }
    let moved = (0..220).filter(|&i| bg.star_alpha(i, 0.1) != bg.star_alpha(i, 0.2)).count();
    assert!(moved > 200);
}

#[test]
fn clamped_time_matches_endpoints() {
    assert_eq!(render_standard(1.5), render_standard(1.0));
    assert_eq!(render_standard(-0.5), render_standard(0.0));
}

#[test]
fn moon_reveal_converges_onto_disc() {
    assert_eq!(MoonPass::growth(0.0), 0.0);
    assert_eq!(MoonPass::growth(0.25), 1.0);
    let (c0, r0) = MoonPass::reveal(0.0);
    assert_eq!(c0.x, MoonPass::center().x + 70.0);
    assert_eq!(r0, 20.0);
    let (c1, r1) = MoonPass::reveal(1.0);
    assert_eq!(c1, MoonPass::center());
    assert_eq!(r1, 100.0);
}

#[test]
fn figure_tracks_are_independent_and_complete_at_end() {
    let early = FigureProgress::at(0.4);
    assert!(early.appear > 0.0);
    assert_eq!(early.armor, 0.0);
    let done = FigureProgress::at(1.0);
    assert_eq!(done.appear, 1.0);
    assert_eq!(done.armor, 1.0);
    assert_eq!(FigureProgress::at(0.0).appear, 0.0);
}

#[test]
fn cloak_wave_grows_with_appear_progress() {
    assert_eq!(FigurePass::cloak_wave(0.0), 0.0);
    for i in 0..=100 {
        assert!(FigurePass::cloak_wave(f64::from(i) / 100.0).abs() <= 8.0);
    }
    // A quarter of the 1.25 wind period puts the sine at its peak.
    let quarter = FigurePass::cloak_wave(0.3125);
    assert!(quarter > 4.0 && quarter <= 8.0);
}

#[test]
fn swirl_is_inert_before_its_window() {
    let with = render_standard(0.45);
    let without = {
        let mut surface = DrawingSurface::new(canvas()).unwrap();
        PassChain::new()
            .with(BackgroundPass::default())
            .with(MoonPass)
            .with(FigurePass)
            .render(&mut surface, 0.45);
        surface.data().to_vec()
    };
    assert_eq!(with, without);
    assert!(!SwirlPass::is_active(0.45));
    assert!(SwirlPass::is_active(0.46));
}

#[test]
fn swirl_opacity_respects_cap_and_dims_outward() {
    let cap = SwirlPass::alpha_cap();
    for t in [0.5, 0.7, 0.9, 1.0] {
        for i in 0..SwirlPass::particle_count() {
            assert!(SwirlPass::particle_alpha(i, t) <= cap + 1e-12);
        }
    }
    assert_eq!(SwirlPass::particle_alpha(0, 1.0), cap);
    assert!(SwirlPass::particle_alpha(27, 1.0) < SwirlPass::particle_alpha(1, 1.0));
    assert_eq!(SwirlPass::particle_alpha(0, 0.7), SwirlPass::particle_alpha(0, 1.0));
}

#[test]
fn swirl_particles_orbit_over_time() {
    let a = SwirlPass::particle(3, 0.6);
    let b = SwirlPass::particle(3, 0.8);
    assert_ne!(a.center, b.center);
    assert_eq!(a.radius, b.radius);
    assert_eq!(SwirlPass::particle(0, 0.6).radius, 20.0);
    assert_eq!(SwirlPass::particle(2, 0.6).radius, 28.0);
}
