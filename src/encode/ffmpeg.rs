use crate::encode::encoder::{
    ChunkSender, CodecPair, EncodeConfig, EncoderHost, FrameEncoder, validate_encode_config,
    validate_frame,
};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{MoonriseError, MoonriseResult};
use crate::render::surface::{FrameRGBA, flatten_premul_over_bg_to_opaque_rgba8};
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use std::process::{Child, Command, Stdio};
use std::sync::OnceLock;
use std::sync::mpsc::{SyncSender, sync_channel};
use std::thread::JoinHandle;

const STDOUT_CHUNK_BYTES: usize = 64 * 1024;
/// Frames buffered between the render loop and the stdin writer thread.
const FRAME_QUEUE_DEPTH: usize = 8;

/// Host backed by the system `ffmpeg` binary.
///
/// Supports WebM (`libvpx-vp9`/`libvpx` video, `libopus`/`libvorbis` audio) and fragmented MP4
/// (`libx264` video, `aac` audio). Availability is probed once per host.
#[derive(Debug)]
pub struct FfmpegHost {
    program: PathBuf,
    available: OnceLock<bool>,
}

impl Default for FfmpegHost {
    fn default() -> Self {
        Self::new("ffmpeg")
    }
}

impl FfmpegHost {
    /// Host invoking `program` (usually `ffmpeg` resolved through `PATH`).
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            available: OnceLock::new(),
        }
    }

    fn is_available(&self) -> bool {
        *self
            .available
            .get_or_init(|| is_program_runnable(&self.program))
    }
}

fn is_known_codec_pair(codec: &CodecPair) -> bool {
    match codec.container.as_str() {
        "webm" => {
            matches!(codec.video.as_str(), "libvpx-vp9" | "libvpx")
                && matches!(codec.audio.as_str(), "libopus" | "libvorbis")
        }
        "mp4" => codec.video == "libx264" && codec.audio == "aac",
        _ => false,
    }
}

impl EncoderHost for FfmpegHost {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    fn supports(&self, codec: &CodecPair) -> bool {
        is_known_codec_pair(codec) && self.is_available()
    }

    fn open(&self, codec: &CodecPair) -> MoonriseResult<Box<dyn FrameEncoder>> {
        if !is_known_codec_pair(codec) {
            return Err(MoonriseError::unsupported(format!(
                "ffmpeg host does not handle {}/{}/{}",
                codec.container, codec.video, codec.audio
            )));
        }
        if !self.is_available() {
            return Err(MoonriseError::unsupported(format!(
                "'{}' was not found or could not be run",
                self.program.display()
            )));
        }
        Ok(Box::new(FfmpegEncoder::new(self.program.clone())))
    }
}

/// Encoder that streams raw frames into `ffmpeg` and reads the muxed container from its stdout.
pub struct FfmpegEncoder {
    program: PathBuf,

    child: Option<Child>,
    frames: Option<SyncSender<Vec<u8>>>,
    stdin_writer: Option<JoinHandle<std::io::Result<()>>>,
    stdout_reader: Option<JoinHandle<std::io::Result<u64>>>,
    stderr_drain: Option<JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<EncodeConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegEncoder {
    /// Encoder invoking `program`.
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
            child: None,
            frames: None,
            stdin_writer: None,
            stdout_reader: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn build_command(&self, cfg: &EncodeConfig) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        // Input: frames are flattened to opaque RGBA8 before they reach stdin.
        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgba",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        if let Some(audio) = cfg.audio.as_ref() {
            cmd.args([
                "-f",
                "f32le",
                "-ar",
                &audio.sample_rate.to_string(),
                "-ac",
                &audio.channels.to_string(),
                "-i",
            ])
            .arg(&audio.path)
            .args(["-c:a", &cfg.codec.audio, "-shortest"]);
        } else {
            cmd.arg("-an");
        }

        cmd.args(["-c:v", &cfg.codec.video, "-pix_fmt", "yuv420p"]);
        push_realtime_args(&mut cmd, &cfg.codec.video);
        if cfg.codec.container == "mp4" {
            // A pipe cannot be seeked back into, so the moov atom has to come first.
            cmd.args(["-movflags", "frag_keyframe+empty_moov"]);
        }
        cmd.args(["-f", &cfg.codec.container, "pipe:1"]);
        cmd
    }

    fn join_threads(&mut self) -> (MoonriseResult<u64>, Vec<u8>) {
        let written = match self.stdin_writer.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| MoonriseError::encoder("ffmpeg stdin writer thread panicked"))
                .and_then(|r| {
                    r.map_err(|e| {
                        MoonriseError::encoder(format!("failed to write frame to ffmpeg stdin: {e}"))
                    })
                }),
            None => Ok(()),
        };
        let read = match self.stdout_reader.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| MoonriseError::encoder("ffmpeg stdout reader thread panicked"))
                .and_then(|r| {
                    r.map_err(|e| MoonriseError::encoder(format!("ffmpeg stdout read failed: {e}")))
                }),
            None => Ok(0),
        };
        let read = written.and(read);
        let stderr_bytes = self
            .stderr_drain
            .take()
            .and_then(|h| h.join().ok())
            .and_then(|r| r.ok())
            .unwrap_or_default();
        (read, stderr_bytes)
    }
}

impl FrameEncoder for FfmpegEncoder {
    fn begin(&mut self, cfg: EncodeConfig, mut chunks: ChunkSender) -> MoonriseResult<()> {
        validate_encode_config(&cfg)?;
        if self.child.is_some() {
            return Err(MoonriseError::encoder("ffmpeg encoder already started"));
        }

        let mut child = self.build_command(&cfg).spawn().map_err(|e| {
            MoonriseError::unsupported(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let mut stdin = child
            .stdin
            .take()
            .ok_or_else(|| MoonriseError::encoder("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stdout = child
            .stdout
            .take()
            .ok_or_else(|| MoonriseError::encoder("failed to open ffmpeg stdout (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| MoonriseError::encoder("failed to open ffmpeg stderr (unexpected)"))?;

        let stdout_reader = std::thread::spawn(move || {
            let mut total = 0u64;
            let mut buf = vec![0u8; STDOUT_CHUNK_BYTES];
            loop {
                let n = stdout.read(&mut buf)?;
                if n == 0 {
                    return Ok(total);
                }
                total += n as u64;
                if chunks.send(buf[..n].to_vec()).is_err() {
                    return Ok(total);
                }
            }
        });
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        let (frames, queued) = sync_channel::<Vec<u8>>(FRAME_QUEUE_DEPTH);
        let stdin_writer = std::thread::spawn(move || {
            for frame in queued {
                stdin.write_all(&frame)?;
            }
            stdin.flush()
        });

        self.child = Some(child);
        self.frames = Some(frames);
        self.stdin_writer = Some(stdin_writer);
        self.stdout_reader = Some(stdout_reader);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        tracing::debug!(program = %self.program.display(), "ffmpeg encoder started");
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> MoonriseResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| MoonriseError::encoder("ffmpeg encoder not started"))?;
        validate_frame(cfg, self.last_idx, idx, frame)?;
        self.last_idx = Some(idx);

        let opaque = if frame.premultiplied {
            let mut out = vec![0u8; frame.data.len()];
            flatten_premul_over_bg_to_opaque_rgba8(&mut out, &frame.data, cfg.bg_rgba)?;
            out
        } else {
            frame.data.clone()
        };

        let Some(frames) = self.frames.as_ref() else {
            return Err(MoonriseError::encoder("ffmpeg encoder is already finalized"));
        };
        // Only blocks once the writer has fallen `FRAME_QUEUE_DEPTH` frames behind.
        frames
            .send(opaque)
            .map_err(|_| MoonriseError::encoder("ffmpeg stdin writer stopped accepting frames"))
    }

    fn finish(&mut self) -> MoonriseResult<()> {
        drop(self.frames.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| MoonriseError::encoder("ffmpeg encoder not started"))?;

        let status = child.wait().map_err(|e| {
            MoonriseError::encoder(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let (read, stderr_bytes) = self.join_threads();

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(MoonriseError::encoder(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }
        let total = read?;
        tracing::debug!(bytes = total, "ffmpeg encoder finished");

        self.cfg = None;
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.frames.take());
        if let Some(mut child) = self.child.take() {
            let _ = child.kill();
            let _ = child.wait();
        }
        let _ = self.join_threads();
        self.cfg = None;
    }
}

impl Drop for FfmpegEncoder {
    fn drop(&mut self) {
        if self.child.is_some() {
            self.abort();
        }
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // For rawvideo input, `-r` goes before `-i`; rational rates are passed as `num/den`.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

fn push_realtime_args(cmd: &mut Command, video: &str) {
    // Keep the encoder at or above capture speed so frames do not back up behind stdin.
    match video {
        "libvpx-vp9" => {
            cmd.args(["-deadline", "realtime", "-cpu-used", "8", "-row-mt", "1"]);
        }
        "libvpx" => {
            cmd.args(["-deadline", "realtime", "-cpu-used", "8"]);
        }
        "libx264" => {
            cmd.args(["-preset", "ultrafast", "-tune", "zerolatency"]);
        }
        _ => {}
    }
}

fn is_program_runnable(program: &Path) -> bool {
    Command::new(program)
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    is_program_runnable(Path::new("ffmpeg"))
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> MoonriseResult<()> {
    if let Some(parent) = path.parent() {
        use anyhow::Context as _;
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/ffmpeg.rs"]
mod tests;
