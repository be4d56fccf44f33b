use moonrise::{Canvas, DrawingSurface, PassChain};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let chain = PassChain::standard();
    let mut surface = DrawingSurface::new(Canvas {
        width: 1280,
        height: 720,
    })?;

    std::fs::create_dir_all("target/stills")?;
    for t in [0.0, 0.25, 0.5, 0.75, 1.0] {
        chain.render(&mut surface, t);
        let png = surface.snapshot().to_png()?;
        let path = format!("target/stills/moonrise_{:03}.png", (t * 100.0) as u32);
        std::fs::write(&path, png)?;
        println!("t={t:.2} -> {path}");
    }

    Ok(())
}
