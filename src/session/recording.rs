use crate::encode::artifact::{ArtifactHandle, ArtifactRegistry};
use crate::encode::encoder::{ChunkQueue, EncodeConfig, EncoderHost, FrameEncoder, chunk_channel};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{MoonriseError, MoonriseResult};
use crate::render::surface::FrameRGBA;
use crate::session::scheduler::HostTime;

/// Lifecycle of one recording.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum RecordingState {
    /// Created, not started.
    Idle,
    /// Capturing frames into the encoder.
    Recording,
    /// Flushing the encoder and assembling the artifact.
    Finalizing,
    /// Artifact minted and installed.
    Ready,
    /// The host cannot encode the configured codec pair.
    Unsupported,
    /// The encoder faulted; partial output was discarded.
    Failed,
}

/// Samples the live surface at a fixed capture rate.
///
/// Capture slots are derived from elapsed run time. A tick that lands in an already captured slot
/// is skipped; a tick that lands after a gap repeats the current frame once per missed slot so
/// the encoded timeline keeps wall-clock pacing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameStream {
    fps: Fps,
    next: FrameIndex,
    last_slot: Option<u64>,
}

impl FrameStream {
    /// Stream capturing at `fps`.
    pub fn new(fps: Fps) -> Self {
        Self {
            fps,
            next: FrameIndex(0),
            last_slot: None,
        }
    }

    /// Number of frames to emit for a tick at `elapsed_us`.
    pub fn admit(&mut self, elapsed_us: u64) -> u64 {
        let slot = self.fps.frame_at_us(elapsed_us).0;
        let copies = match self.last_slot {
            None => 1,
            Some(last) if slot <= last => 0,
            Some(last) => slot - last,
        };
        if copies > 0 {
            self.last_slot = Some(slot);
        }
        copies
    }

    /// Claim the next encoder frame index.
    fn next_index(&mut self) -> FrameIndex {
        let idx = self.next;
        self.next = FrameIndex(idx.0 + 1);
        idx
    }

    /// Frames emitted so far.
    pub fn emitted(&self) -> u64 {
        self.next.0
    }
}

/// Capture/encode pipeline for one run.
///
/// `Idle -> Recording -> Finalizing -> Ready`, `Idle -> Unsupported`, and `Failed` from
/// `Recording` or `Finalizing` when the encoder faults. Finalization happens at most once.
pub struct RecordingSession {
    run: u64,
    state: RecordingState,
    mime: String,
    encoder: Option<Box<dyn FrameEncoder>>,
    stream: Option<FrameStream>,
    chunks: Option<ChunkQueue>,
    watchdog: Option<HostTime>,
    failure: Option<String>,
}

impl std::fmt::Debug for RecordingSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecordingSession")
            .field("run", &self.run)
            .field("state", &self.state)
            .field("frames", &self.frames_captured())
            .field("watchdog", &self.watchdog)
            .finish_non_exhaustive()
    }
}

impl RecordingSession {
    /// Idle session for `run`.
    pub fn new(run: u64) -> Self {
        Self {
            run,
            state: RecordingState::Idle,
            mime: String::new(),
            encoder: None,
            stream: None,
            chunks: None,
            watchdog: None,
            failure: None,
        }
    }

    /// Open the encoder and start capturing.
    ///
    /// Any failure to obtain a running encoder leaves the session `Unsupported` and returns
    /// [`MoonriseError::EncodingUnsupported`]; the caller falls back to playback.
    pub fn begin(
        &mut self,
        host: &dyn EncoderHost,
        cfg: EncodeConfig,
        watchdog: HostTime,
    ) -> MoonriseResult<()> {
        if self.state != RecordingState::Idle {
            return Err(MoonriseError::validation("recording already started"));
        }
        if !host.supports(&cfg.codec) {
            self.state = RecordingState::Unsupported;
            return Err(MoonriseError::unsupported(format!(
                "host '{}' cannot encode {}/{}",
                host.name(),
                cfg.codec.container,
                cfg.codec.video
            )));
        }

        let mime = cfg.codec.mime();
        let fps = cfg.fps;
        let (tx, queue) = chunk_channel();
        let opened = host.open(&cfg.codec).and_then(|mut encoder| {
            encoder.begin(cfg, tx)?;
            Ok(encoder)
        });
        let encoder = match opened {
            Ok(encoder) => encoder,
            Err(e) => {
                self.state = RecordingState::Unsupported;
                return Err(match e {
                    MoonriseError::EncodingUnsupported(_) => e,
                    other => MoonriseError::unsupported(other.to_string()),
                });
            }
        };

        self.mime = mime;
        self.encoder = Some(encoder);
        self.stream = Some(FrameStream::new(fps));
        self.chunks = Some(queue);
        self.watchdog = Some(watchdog);
        self.state = RecordingState::Recording;
        Ok(())
    }

    /// Feed the frame painted at `elapsed_us` into the encoder.
    ///
    /// Returns the number of encoder frames emitted (0 outside `Recording`). An encoder error moves
    /// the session to `Failed`.
    pub fn capture_frame(&mut self, elapsed_us: u64, frame: &FrameRGBA) -> MoonriseResult<u64> {
        if self.state != RecordingState::Recording {
            return Ok(0);
        }
        let (Some(stream), Some(encoder)) = (self.stream.as_mut(), self.encoder.as_mut()) else {
            return Ok(0);
        };
        let copies = stream.admit(elapsed_us);
        for _ in 0..copies {
            let idx = stream.next_index();
            if let Err(e) = encoder.push_frame(idx, frame) {
                return Err(self.fail(e));
            }
        }
        Ok(copies)
    }

    /// Move chunks that already arrived into the ordered buffer.
    pub fn pump_chunks(&mut self) -> usize {
        self.chunks.as_mut().map_or(0, ChunkQueue::pump)
    }

    /// Flush the encoder and install the artifact in `registry`.
    ///
    /// No-op (returns `Ok(None)`) unless the session is `Recording`.
    pub fn finalize(
        &mut self,
        registry: &mut ArtifactRegistry,
    ) -> MoonriseResult<Option<ArtifactHandle>> {
        if self.state != RecordingState::Recording {
            return Ok(None);
        }
        self.state = RecordingState::Finalizing;
        self.watchdog = None;

        if let Some(mut encoder) = self.encoder.take()
            && let Err(e) = encoder.finish()
        {
            return Err(self.fail(e));
        }
        self.pump_chunks();

        let bytes = self.chunks.take().map(|q| q.concat()).unwrap_or_default();
        let handle = match registry.mint(&self.mime, bytes) {
            Ok(handle) => handle,
            Err(e) => return Err(self.fail(e)),
        };
        registry.install(handle.clone());
        self.state = RecordingState::Ready;
        Ok(Some(handle))
    }

    /// Stop without producing an artifact. Terminal states are left untouched.
    pub fn abort(&mut self) {
        if let Some(mut encoder) = self.encoder.take() {
            encoder.abort();
        }
        self.chunks = None;
        self.watchdog = None;
        if matches!(
            self.state,
            RecordingState::Recording | RecordingState::Finalizing
        ) {
            self.state = RecordingState::Idle;
        }
    }

    fn fail(&mut self, e: MoonriseError) -> MoonriseError {
        if let Some(mut encoder) = self.encoder.take() {
            encoder.abort();
        }
        self.chunks = None;
        self.watchdog = None;
        self.state = RecordingState::Failed;
        self.failure = Some(e.to_string());
        match e {
            MoonriseError::EncoderFault(_) => e,
            other => MoonriseError::encoder(other.to_string()),
        }
    }

    /// Run this recording belongs to.
    pub fn run(&self) -> u64 {
        self.run
    }

    /// Current state.
    pub fn state(&self) -> RecordingState {
        self.state
    }

    /// Watchdog deadline while recording.
    pub fn watchdog_deadline(&self) -> Option<HostTime> {
        self.watchdog
    }

    /// Encoder frames emitted so far.
    pub fn frames_captured(&self) -> u64 {
        self.stream.as_ref().map_or(0, FrameStream::emitted)
    }

    /// Chunks buffered so far.
    pub fn chunk_count(&self) -> usize {
        self.chunks.as_ref().map_or(0, |q| q.chunks().len())
    }

    /// Bytes buffered so far.
    pub fn buffered_bytes(&self) -> usize {
        self.chunks.as_ref().map_or(0, ChunkQueue::total_bytes)
    }

    /// Reason of the last failure.
    pub fn failure(&self) -> Option<&str> {
        self.failure.as_deref()
    }
}

impl Drop for RecordingSession {
    fn drop(&mut self) {
        self.abort();
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/recording.rs"]
mod tests;
