use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{MoonriseError, MoonriseResult};
use crate::render::surface::FrameRGBA;
use std::path::PathBuf;
use std::sync::mpsc;

/// Container plus video and audio codec names, in `ffmpeg` vocabulary.
#[derive(Clone, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub struct CodecPair {
    /// Container format (`webm`, `mp4`).
    pub container: String,
    /// Video codec (`libvpx-vp9`).
    pub video: String,
    /// Audio codec, used only when an audio input is configured (`libopus`).
    pub audio: String,
}

impl Default for CodecPair {
    fn default() -> Self {
        Self {
            container: "webm".to_string(),
            video: "libvpx-vp9".to_string(),
            audio: "libopus".to_string(),
        }
    }
}

impl CodecPair {
    /// MIME type of the produced container.
    pub fn mime(&self) -> String {
        format!("video/{}", self.container)
    }
}

/// Raw PCM audio input muxed as the optional audio track.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct AudioInputConfig {
    /// Path to interleaved `f32le` PCM data.
    pub path: PathBuf,
    /// Sample rate in Hz.
    pub sample_rate: u32,
    /// Channel count.
    pub channels: u16,
}

/// Configuration handed to a [`FrameEncoder`] when a recording begins.
#[derive(Clone, Debug, PartialEq)]
pub struct EncodeConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Capture rate.
    pub fps: Fps,
    /// Output container and codecs.
    pub codec: CodecPair,
    /// Background used to flatten alpha (RGBA8, straight alpha).
    pub bg_rgba: [u8; 4],
    /// Optional audio track input.
    pub audio: Option<AudioInputConfig>,
}

/// One piece of encoded container output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EncodedChunk {
    /// Emission order on the sending side.
    pub seq: u64,
    /// Encoded bytes.
    pub bytes: Vec<u8>,
}

/// Producer half of the ordered chunk channel; owned by the encoder (or its reader thread).
#[derive(Debug)]
pub struct ChunkSender {
    tx: mpsc::Sender<EncodedChunk>,
    next_seq: u64,
}

impl ChunkSender {
    /// Emit `bytes` as the next chunk.
    pub fn send(&mut self, bytes: Vec<u8>) -> MoonriseResult<()> {
        let chunk = EncodedChunk {
            seq: self.next_seq,
            bytes,
        };
        self.next_seq += 1;
        self.tx
            .send(chunk)
            .map_err(|_| MoonriseError::encoder("chunk receiver was dropped"))
    }

    /// Number of chunks sent so far.
    pub fn sent(&self) -> u64 {
        self.next_seq
    }
}

/// Consumer half of the ordered chunk channel.
///
/// Chunks are kept in arrival order; empty chunks are skipped. Nothing is reordered or
/// deduplicated.
#[derive(Debug)]
pub struct ChunkQueue {
    rx: mpsc::Receiver<EncodedChunk>,
    chunks: Vec<EncodedChunk>,
    total_bytes: usize,
}

/// Create a connected sender/queue pair.
pub fn chunk_channel() -> (ChunkSender, ChunkQueue) {
    let (tx, rx) = mpsc::channel();
    (
        ChunkSender { tx, next_seq: 0 },
        ChunkQueue {
            rx,
            chunks: Vec::new(),
            total_bytes: 0,
        },
    )
}

impl ChunkQueue {
    /// Move every chunk that has already arrived into the queue without blocking.
    ///
    /// Returns the number of non-empty chunks appended.
    pub fn pump(&mut self) -> usize {
        let mut appended = 0;
        while let Ok(chunk) = self.rx.try_recv() {
            if chunk.bytes.is_empty() {
                continue;
            }
            self.total_bytes += chunk.bytes.len();
            self.chunks.push(chunk);
            appended += 1;
        }
        appended
    }

    /// Buffered chunks in arrival order.
    pub fn chunks(&self) -> &[EncodedChunk] {
        &self.chunks
    }

    /// Total buffered bytes.
    pub fn total_bytes(&self) -> usize {
        self.total_bytes
    }

    /// Concatenate the buffered chunks.
    pub fn concat(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(self.total_bytes);
        for chunk in &self.chunks {
            out.extend_from_slice(&chunk.bytes);
        }
        out
    }

    /// Discard every buffered chunk.
    pub fn clear(&mut self) {
        self.chunks.clear();
        self.total_bytes = 0;
    }
}

/// Stream encoder contract.
///
/// Ordering contract: `push_frame` is called with strictly increasing [`FrameIndex`] values
/// between `begin` and `finish`. Encoded output travels through the [`ChunkSender`] handed to
/// `begin`; every chunk must have been sent by the time `finish` returns.
pub trait FrameEncoder: Send {
    /// Start encoding.
    fn begin(&mut self, cfg: EncodeConfig, chunks: ChunkSender) -> MoonriseResult<()>;
    /// Encode one premultiplied frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> MoonriseResult<()>;
    /// Flush the encoder and close the chunk channel.
    fn finish(&mut self) -> MoonriseResult<()>;
    /// Stop immediately, discarding pending output.
    fn abort(&mut self);
}

/// Capability provider for stream encoding.
pub trait EncoderHost: Send + std::fmt::Debug {
    /// Short host name for logs.
    fn name(&self) -> &'static str;
    /// Return `true` when the host can encode `codec`.
    fn supports(&self, codec: &CodecPair) -> bool;
    /// Open an encoder bound to `codec`.
    fn open(&self, codec: &CodecPair) -> MoonriseResult<Box<dyn FrameEncoder>>;
}

/// Host without any encoding capability. Every recording falls back to playback.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoEncoderHost;

impl EncoderHost for NoEncoderHost {
    fn name(&self) -> &'static str {
        "none"
    }

    fn supports(&self, _codec: &CodecPair) -> bool {
        false
    }

    fn open(&self, codec: &CodecPair) -> MoonriseResult<Box<dyn FrameEncoder>> {
        Err(MoonriseError::unsupported(format!(
            "no encoder available for {}/{}",
            codec.container, codec.video
        )))
    }
}

/// Validate frame geometry shared by all encoders.
pub(crate) fn validate_encode_config(cfg: &EncodeConfig) -> MoonriseResult<()> {
    if cfg.fps.num == 0 || cfg.fps.den == 0 {
        return Err(MoonriseError::validation("fps must be non-zero"));
    }
    if cfg.width == 0 || cfg.height == 0 {
        return Err(MoonriseError::validation(
            "encoder width/height must be non-zero",
        ));
    }
    if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
        return Err(MoonriseError::validation(
            "encoder width/height must be even (required for yuv420p output)",
        ));
    }
    if let Some(audio) = cfg.audio.as_ref() {
        if audio.sample_rate == 0 {
            return Err(MoonriseError::validation(
                "audio sample_rate must be non-zero when audio is enabled",
            ));
        }
        if audio.channels == 0 {
            return Err(MoonriseError::validation(
                "audio channels must be non-zero when audio is enabled",
            ));
        }
    }
    Ok(())
}

/// Validate one frame against the active configuration and the previous index.
pub(crate) fn validate_frame(
    cfg: &EncodeConfig,
    last: Option<FrameIndex>,
    idx: FrameIndex,
    frame: &FrameRGBA,
) -> MoonriseResult<()> {
    if let Some(last) = last
        && idx.0 <= last.0
    {
        return Err(MoonriseError::encoder(
            "encoder received out-of-order frame index",
        ));
    }
    if frame.width != cfg.width || frame.height != cfg.height {
        return Err(MoonriseError::validation(format!(
            "frame size mismatch: got {}x{}, expected {}x{}",
            frame.width, frame.height, cfg.width, cfg.height
        )));
    }
    if frame.data.len() != (cfg.width as usize) * (cfg.height as usize) * 4 {
        return Err(MoonriseError::validation(
            "frame.data size mismatch with width*height*4",
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "../../tests/unit/encode/encoder.rs"]
mod tests;
