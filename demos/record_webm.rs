use moonrise::{FfmpegHost, Notification, Studio, StudioConfig, SystemClock};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt::init();

    let cfg = match std::env::args().nth(1) {
        Some(path) => StudioConfig::from_path(path)?,
        None => StudioConfig {
            width: 640,
            height: 360,
            frame_rate: 30,
            ..StudioConfig::default()
        },
    };

    let mut studio = Studio::new(cfg, FfmpegHost::default(), SystemClock::new())?;
    studio.record()?;
    studio.run_until_idle()?;

    for note in studio.drain_notifications() {
        match note {
            Notification::ArtifactReady(handle) => {
                let out = std::path::Path::new("target/moonrise.webm");
                handle.write_to(out)?;
                println!("{} ({} bytes) -> {}", handle.uri(), handle.len(), out.display());
            }
            Notification::EncodingUnsupported => {
                eprintln!("ffmpeg with libvpx-vp9 is required; played back without recording");
            }
            Notification::RecordingFailed { reason } => eprintln!("recording failed: {reason}"),
            Notification::RunCompleted { run, frames } => println!("run {run}: {frames} frames"),
        }
    }

    Ok(())
}
