use crate::encode::encoder::{
    ChunkSender, CodecPair, EncodeConfig, EncoderHost, FrameEncoder, validate_encode_config,
    validate_frame,
};
use crate::foundation::core::FrameIndex;
use crate::foundation::error::{MoonriseError, MoonriseResult};
use crate::render::surface::FrameRGBA;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

const HEADER_TAG: &[u8; 4] = b"MRH0";
const FRAME_TAG: &[u8; 4] = b"MRF0";
const TRAILER_TAG: &[u8; 4] = b"MRE0";

/// Fault injection knobs for [`InMemoryHost`].
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InMemoryFaults {
    /// Fail `push_frame` when this frame index is reached.
    pub fail_at_frame: Option<u64>,
    /// Fail in `finish`.
    pub fail_on_finish: bool,
    /// Succeed without emitting any bytes.
    pub empty_output: bool,
}

/// Counters shared between an [`InMemoryHost`] and the encoders it opened.
#[derive(Debug, Default)]
pub struct InMemoryStats {
    opened: AtomicU64,
    frames: AtomicU64,
    finished: AtomicU64,
    aborted: AtomicU64,
}

impl InMemoryStats {
    /// Encoders opened.
    pub fn opened(&self) -> u64 {
        self.opened.load(Ordering::Relaxed)
    }

    /// Frames accepted across all encoders.
    pub fn frames(&self) -> u64 {
        self.frames.load(Ordering::Relaxed)
    }

    /// Encoders finished successfully.
    pub fn finished(&self) -> u64 {
        self.finished.load(Ordering::Relaxed)
    }

    /// Encoders aborted.
    pub fn aborted(&self) -> u64 {
        self.aborted.load(Ordering::Relaxed)
    }
}

/// Deterministic digest "encoder" for tests and debugging.
///
/// Emits a header chunk, one chunk per frame carrying the frame index and pixel fingerprint, and
/// a trailer chunk. Use [`InMemoryDigest::parse`] to read the output back.
#[derive(Clone, Debug)]
pub struct InMemoryHost {
    codecs: Vec<CodecPair>,
    faults: InMemoryFaults,
    stats: Arc<InMemoryStats>,
}

impl Default for InMemoryHost {
    fn default() -> Self {
        Self {
            codecs: vec![CodecPair::default()],
            faults: InMemoryFaults::default(),
            stats: Arc::default(),
        }
    }
}

impl InMemoryHost {
    /// Host that supports the default codec pair.
    pub fn new() -> Self {
        Self::default()
    }

    /// Host that supports exactly `codecs`.
    pub fn with_codecs(codecs: Vec<CodecPair>) -> Self {
        Self {
            codecs,
            ..Self::default()
        }
    }

    /// Inject faults into every encoder opened from now on.
    pub fn with_faults(mut self, faults: InMemoryFaults) -> Self {
        self.faults = faults;
        self
    }

    /// Shared counters.
    pub fn stats(&self) -> Arc<InMemoryStats> {
        Arc::clone(&self.stats)
    }
}

impl EncoderHost for InMemoryHost {
    fn name(&self) -> &'static str {
        "in-memory"
    }

    fn supports(&self, codec: &CodecPair) -> bool {
        self.codecs.contains(codec)
    }

    fn open(&self, codec: &CodecPair) -> MoonriseResult<Box<dyn FrameEncoder>> {
        if !self.supports(codec) {
            return Err(MoonriseError::unsupported(format!(
                "in-memory host does not support {}/{}",
                codec.container, codec.video
            )));
        }
        self.stats.opened.fetch_add(1, Ordering::Relaxed);
        Ok(Box::new(InMemoryEncoder {
            faults: self.faults,
            stats: Arc::clone(&self.stats),
            cfg: None,
            chunks: None,
            last_idx: None,
            frames: 0,
        }))
    }
}

struct InMemoryEncoder {
    faults: InMemoryFaults,
    stats: Arc<InMemoryStats>,
    cfg: Option<EncodeConfig>,
    chunks: Option<ChunkSender>,
    last_idx: Option<FrameIndex>,
    frames: u64,
}

impl InMemoryEncoder {
    fn emit(&mut self, bytes: Vec<u8>) -> MoonriseResult<()> {
        if self.faults.empty_output {
            return Ok(());
        }
        let chunks = self
            .chunks
            .as_mut()
            .ok_or_else(|| MoonriseError::encoder("in-memory encoder is not running"))?;
        chunks.send(bytes)
    }
}

impl FrameEncoder for InMemoryEncoder {
    fn begin(&mut self, cfg: EncodeConfig, chunks: ChunkSender) -> MoonriseResult<()> {
        validate_encode_config(&cfg)?;
        let mut header = HEADER_TAG.to_vec();
        header.extend_from_slice(&cfg.width.to_le_bytes());
        header.extend_from_slice(&cfg.height.to_le_bytes());
        header.extend_from_slice(&cfg.fps.num.to_le_bytes());
        header.extend_from_slice(&cfg.fps.den.to_le_bytes());

        self.cfg = Some(cfg);
        self.chunks = Some(chunks);
        self.last_idx = None;
        self.frames = 0;
        self.emit(header)
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &FrameRGBA) -> MoonriseResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| MoonriseError::encoder("in-memory encoder not started"))?;
        validate_frame(cfg, self.last_idx, idx, frame)?;
        if self.faults.fail_at_frame == Some(idx.0) {
            return Err(MoonriseError::encoder(format!(
                "injected fault at frame {}",
                idx.0
            )));
        }
        self.last_idx = Some(idx);

        let mut chunk = FRAME_TAG.to_vec();
        chunk.extend_from_slice(&idx.0.to_le_bytes());
        chunk.extend_from_slice(&frame.fingerprint().to_le_bytes());
        self.emit(chunk)?;
        self.frames += 1;
        self.stats.frames.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn finish(&mut self) -> MoonriseResult<()> {
        if self.cfg.is_none() {
            return Err(MoonriseError::encoder("in-memory encoder not started"));
        }
        if self.faults.fail_on_finish {
            self.chunks = None;
            return Err(MoonriseError::encoder("injected fault while finishing"));
        }
        let mut trailer = TRAILER_TAG.to_vec();
        trailer.extend_from_slice(&self.frames.to_le_bytes());
        self.emit(trailer)?;

        self.chunks = None;
        self.cfg = None;
        self.stats.finished.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }

    fn abort(&mut self) {
        self.chunks = None;
        self.cfg = None;
        self.stats.aborted.fetch_add(1, Ordering::Relaxed);
    }
}

/// Parsed output of the in-memory encoder.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InMemoryDigest {
    /// Frame width.
    pub width: u32,
    /// Frame height.
    pub height: u32,
    /// Capture rate as `(num, den)`.
    pub fps: (u32, u32),
    /// Encoded frames as `(index, pixel fingerprint)` in stream order.
    pub frames: Vec<(FrameIndex, u64)>,
}

impl InMemoryDigest {
    /// Parse a concatenated in-memory stream.
    pub fn parse(bytes: &[u8]) -> MoonriseResult<Self> {
        let mut r = Reader { bytes, pos: 0 };
        if r.tag()? != *HEADER_TAG {
            return Err(MoonriseError::validation("in-memory stream: missing header"));
        }
        let width = r.u32()?;
        let height = r.u32()?;
        let fps = (r.u32()?, r.u32()?);

        let mut frames = Vec::new();
        loop {
            let tag = r.tag()?;
            if tag == *FRAME_TAG {
                frames.push((FrameIndex(r.u64()?), r.u64()?));
            } else if tag == *TRAILER_TAG {
                let count = r.u64()?;
                if count != frames.len() as u64 {
                    return Err(MoonriseError::validation(
                        "in-memory stream: trailer frame count mismatch",
                    ));
                }
                break;
            } else {
                return Err(MoonriseError::validation("in-memory stream: unknown tag"));
            }
        }
        Ok(Self {
            width,
            height,
            fps,
            frames,
        })
    }
}

struct Reader<'a> {
    bytes: &'a [u8],
    pos: usize,
}

impl Reader<'_> {
    fn take<const N: usize>(&mut self) -> MoonriseResult<[u8; N]> {
        let end = self.pos + N;
        let out: [u8; N] = self
            .bytes
            .get(self.pos..end)
            .and_then(|s| s.try_into().ok())
            .ok_or_else(|| MoonriseError::validation("in-memory stream: truncated"))?;
        self.pos = end;
        Ok(out)
    }

    fn tag(&mut self) -> MoonriseResult<[u8; 4]> {
        self.take::<4>()
    }

    fn u32(&mut self) -> MoonriseResult<u32> {
        self.take::<4>().map(u32::from_le_bytes)
    }

    fn u64(&mut self) -> MoonriseResult<u64> {
        self.take::<8>().map(u64::from_le_bytes)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/encode/memory.rs"]
mod tests;
