use crate::config::StudioConfig;
use crate::encode::artifact::{ArtifactHandle, ArtifactRegistry};
use crate::encode::encoder::EncoderHost;
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{MoonriseError, MoonriseResult};
use crate::render::passes::PassChain;
use crate::render::surface::DrawingSurface;
use crate::session::clock::{AnimationClock, ClockSample};
use crate::session::recording::{RecordingSession, RecordingState};
use crate::session::scheduler::{HostClock, HostTime, TimerEvent, TimerKind, TimerQueue};
use std::collections::VecDeque;

/// Outbound events for the embedding host.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Notification {
    /// A recording finished; the handle is now the live artifact.
    ArtifactReady(ArtifactHandle),
    /// Recording was requested but the host cannot encode; the run continues as playback.
    EncodingUnsupported,
    /// The encoder faulted; nothing was installed.
    RecordingFailed {
        /// Human-readable failure reason.
        reason: String,
    },
    /// The animation clock reached the end of the run.
    RunCompleted {
        /// Completed run.
        run: u64,
        /// Frames painted during the run.
        frames: u64,
    },
}

/// Clock and surface of the active run.
#[derive(Debug)]
pub struct AnimationSession {
    run: u64,
    clock: AnimationClock,
    surface: DrawingSurface,
    last: Option<ClockSample>,
}

impl AnimationSession {
    /// Run id.
    pub fn run(&self) -> u64 {
        self.run
    }

    /// The run's animation clock.
    pub fn clock(&self) -> &AnimationClock {
        &self.clock
    }

    /// The run's surface.
    pub fn surface(&self) -> &DrawingSurface {
        &self.surface
    }

    /// Frames painted during this run.
    pub fn frames_painted(&self) -> u64 {
        self.surface.frames_painted()
    }

    /// Most recent clock observation.
    pub fn last_sample(&self) -> Option<ClockSample> {
        self.last
    }

    /// `true` once the clock reported completion.
    pub fn is_finished(&self) -> bool {
        self.last.is_some_and(|s| s.finished)
    }
}

/// Serial driver for playback and recording runs.
///
/// Every `play`/`record` supersedes the previous run: its timers are purged, its recording is
/// discarded and the run id is bumped. Events are processed one at a time through [`Studio::step`].
pub struct Studio {
    cfg: StudioConfig,
    fps: Fps,
    host: Box<dyn EncoderHost>,
    clock: Box<dyn HostClock>,
    passes: PassChain,

    timers: TimerQueue,
    run: u64,
    session: Option<AnimationSession>,
    recording: Option<RecordingSession>,
    registry: ArtifactRegistry,
    notifications: VecDeque<Notification>,

    frames_suspended: bool,
    parked_tick: bool,
}

impl std::fmt::Debug for Studio {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Studio")
            .field("run", &self.run)
            .field("host", &self.host.name())
            .field("timers", &self.timers.len())
            .field("recording", &self.recording_state())
            .field("frames_suspended", &self.frames_suspended)
            .finish_non_exhaustive()
    }
}

impl Studio {
    /// Build a studio with the standard pass chain.
    pub fn new(
        cfg: StudioConfig,
        host: impl EncoderHost + 'static,
        clock: impl HostClock + 'static,
    ) -> MoonriseResult<Self> {
        cfg.validate()?;
        let fps = cfg.fps()?;
        Ok(Self {
            cfg,
            fps,
            host: Box::new(host),
            clock: Box::new(clock),
            passes: PassChain::standard(),
            timers: TimerQueue::new(),
            run: 0,
            session: None,
            recording: None,
            registry: ArtifactRegistry::new(),
            notifications: VecDeque::new(),
            frames_suspended: false,
            parked_tick: false,
        })
    }

    /// Replace the pass chain used for subsequent frames.
    pub fn with_passes(mut self, passes: PassChain) -> Self {
        self.passes = passes;
        self
    }

    /// Start a playback run from `t = 0`, discarding any in-flight run.
    #[tracing::instrument(skip(self))]
    pub fn play(&mut self) -> MoonriseResult<u64> {
        let run = self.supersede();
        self.start_session(run)?;
        tracing::info!(run, "playback started");
        Ok(run)
    }

    /// Start a recording run from `t = 0`, discarding any in-flight run.
    ///
    /// If the host cannot encode, an [`Notification::EncodingUnsupported`] is queued and the run
    /// continues as plain playback.
    #[tracing::instrument(skip(self))]
    pub fn record(&mut self) -> MoonriseResult<u64> {
        let encode = self.cfg.encode_config()?;
        let run = self.supersede();
        let now = self.clock.now();
        let deadline = now.after_us(self.cfg.watchdog_after_us());

        let mut recording = RecordingSession::new(run);
        match recording.begin(self.host.as_ref(), encode, deadline) {
            Ok(()) => {
                self.timers.schedule(deadline, run, TimerKind::Watchdog);
                tracing::info!(run, host = self.host.name(), "recording started");
            }
            Err(MoonriseError::EncodingUnsupported(reason)) => {
                tracing::warn!(run, %reason, "encoding unsupported; falling back to playback");
                self.notifications.push_back(Notification::EncodingUnsupported);
            }
            Err(e) => return Err(e),
        }
        self.recording = Some(recording);
        self.start_session(run)?;
        Ok(run)
    }

    /// Process the next timer, waiting on the host clock until it is due.
    ///
    /// Returns `false` when no timers remain.
    pub fn step(&mut self) -> MoonriseResult<bool> {
        self.pump_chunks();
        let Some(due) = self.timers.next_due() else {
            return Ok(false);
        };
        self.clock.wait_until(due);
        let Some(event) = self.timers.pop_due(self.clock.now()) else {
            return Ok(true);
        };
        self.pump_chunks();
        match self.dispatch(event) {
            Err(e) if e.is_stale() => {
                tracing::debug!(error = %e, "dropped stale event");
                Ok(true)
            }
            Err(e) => Err(e),
            Ok(()) => Ok(true),
        }
    }

    /// Process events until no timers remain; returns the number processed.
    pub fn run_until_idle(&mut self) -> MoonriseResult<u64> {
        let mut steps = 0;
        while self.step()? {
            steps += 1;
        }
        Ok(steps)
    }

    /// Stop delivering frame ticks (the host throttled rendering). Timers still fire.
    pub fn suspend_frames(&mut self) {
        self.frames_suspended = true;
    }

    /// Resume frame delivery; a tick parked during suspension is rescheduled immediately.
    pub fn resume_frames(&mut self) {
        self.frames_suspended = false;
        if std::mem::take(&mut self.parked_tick) && self.session.is_some() {
            let now = self.clock.now();
            self.timers.schedule(now, self.run, TimerKind::FrameTick);
        }
    }

    /// `true` while frame delivery is suspended.
    pub fn frames_suspended(&self) -> bool {
        self.frames_suspended
    }

    /// Finalize the active recording (no-op unless it is recording).
    ///
    /// Clock completion and the watchdog both end up here. Failures are reported as
    /// [`Notification::RecordingFailed`] rather than returned.
    pub fn finalize_recording(&mut self) -> Option<ArtifactHandle> {
        let recording = self.recording.as_mut()?;
        if recording.state() != RecordingState::Recording {
            return None;
        }
        self.timers.cancel(recording.run(), TimerKind::Watchdog);
        match recording.finalize(&mut self.registry) {
            Ok(Some(handle)) => {
                tracing::info!(
                    run = recording.run(),
                    uri = handle.uri(),
                    bytes = handle.len(),
                    frames = recording.frames_captured(),
                    "artifact ready"
                );
                self.notifications
                    .push_back(Notification::ArtifactReady(handle.clone()));
                Some(handle)
            }
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(run = recording.run(), error = %e, "recording failed");
                self.notifications.push_back(Notification::RecordingFailed {
                    reason: e.to_string(),
                });
                None
            }
        }
    }

    /// Pop the oldest pending notification.
    pub fn poll_notification(&mut self) -> Option<Notification> {
        self.notifications.pop_front()
    }

    /// Take every pending notification.
    pub fn drain_notifications(&mut self) -> Vec<Notification> {
        self.notifications.drain(..).collect()
    }

    /// Id of the current run (0 before the first command).
    pub fn current_run(&self) -> u64 {
        self.run
    }

    /// Active animation session.
    pub fn session(&self) -> Option<&AnimationSession> {
        self.session.as_ref()
    }

    /// Active recording.
    pub fn recording(&self) -> Option<&RecordingSession> {
        self.recording.as_ref()
    }

    /// State of the active recording (`Idle` when there is none).
    pub fn recording_state(&self) -> RecordingState {
        self.recording
            .as_ref()
            .map_or(RecordingState::Idle, RecordingSession::state)
    }

    /// The live artifact.
    pub fn live_artifact(&self) -> Option<&ArtifactHandle> {
        self.registry.live()
    }

    /// Artifact registry.
    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    /// Mutable artifact registry (for explicit releases).
    pub fn registry_mut(&mut self) -> &mut ArtifactRegistry {
        &mut self.registry
    }

    /// Frame ticks pending for the current run.
    pub fn pending_frame_ticks(&self) -> usize {
        self.timers.count(self.run, TimerKind::FrameTick)
    }

    /// Timers pending for any run.
    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Current host time.
    pub fn now(&self) -> HostTime {
        self.clock.now()
    }

    /// Active configuration.
    pub fn config(&self) -> &StudioConfig {
        &self.cfg
    }

    fn supersede(&mut self) -> u64 {
        let prev = self.run;
        let purged = self.timers.cancel_run(prev);
        if let Some(mut recording) = self.recording.take() {
            if recording.state() == RecordingState::Recording {
                tracing::debug!(run = prev, "discarding in-flight recording");
            }
            recording.abort();
        }
        self.parked_tick = false;
        self.run = prev + 1;
        tracing::debug!(prev, run = self.run, purged, "superseded run");
        self.run
    }

    /// Install the session for `run`, restarting the previous run's clock when there is one.
    fn start_session(&mut self, run: u64) -> MoonriseResult<()> {
        let clock = match self.session.take() {
            Some(prev) => {
                let mut clock = prev.clock;
                clock.restart();
                clock
            }
            None => AnimationClock::new(self.cfg.duration_ms)?,
        };
        self.session = Some(AnimationSession {
            run,
            clock,
            surface: DrawingSurface::new(self.cfg.canvas())?,
            last: None,
        });
        self.timers
            .schedule(self.clock.now(), run, TimerKind::FrameTick);
        Ok(())
    }

    fn dispatch(&mut self, event: TimerEvent) -> MoonriseResult<()> {
        if event.run != self.run {
            return Err(MoonriseError::StaleRunCancelled { run: event.run });
        }
        match event.kind {
            TimerKind::FrameTick => self.on_frame_tick(event.run),
            TimerKind::Watchdog => {
                if self.recording_state() == RecordingState::Recording {
                    tracing::warn!(run = event.run, "watchdog forced finalization");
                    self.finalize_recording();
                }
                Ok(())
            }
        }
    }

    fn on_frame_tick(&mut self, run: u64) -> MoonriseResult<()> {
        if self.frames_suspended {
            self.parked_tick = true;
            return Ok(());
        }
        let now = self.clock.now();
        let session = self
            .session
            .as_mut()
            .ok_or(MoonriseError::StaleRunCancelled { run })?;

        let sample = session.clock.tick(now);
        // Ticks are anchored to the run start so tick k always lands in capture slot k.
        let next_slot = FrameIndex(self.fps.frame_at_us(sample.elapsed_us).0 + 1);
        let next_due = session
            .clock
            .start()
            .unwrap_or(now)
            .after_us(self.fps.frame_start_us(next_slot));
        self.passes.render(&mut session.surface, sample.t);
        session.last = Some(sample);
        let frames = session.surface.frames_painted();

        if let Some(recording) = self.recording.as_mut()
            && recording.state() == RecordingState::Recording
        {
            let frame = session.surface.snapshot();
            if let Err(e) = recording.capture_frame(sample.elapsed_us, &frame) {
                tracing::warn!(run, error = %e, "recording failed");
                self.timers.cancel(run, TimerKind::Watchdog);
                self.notifications.push_back(Notification::RecordingFailed {
                    reason: e.to_string(),
                });
            }
        }

        if sample.finished {
            tracing::info!(run, frames, "run completed");
            self.notifications
                .push_back(Notification::RunCompleted { run, frames });
            self.finalize_recording();
        } else {
            self.timers
                .schedule(next_due, run, TimerKind::FrameTick);
        }
        Ok(())
    }

    fn pump_chunks(&mut self) {
        if let Some(recording) = self.recording.as_mut() {
            recording.pump_chunks();
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/studio.rs"]
mod tests;
