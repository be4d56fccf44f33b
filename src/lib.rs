//! moonrise renders a short, fully deterministic procedural animation (a night sky, a rising
//! moon, a cloaked figure whose armor coalesces and an energy swirl) and can capture it into an
//! encoded video artifact.
//!
//! The public API is command-oriented:
//!
//! - Configure a [`Studio`] with a [`StudioConfig`], an [`EncoderHost`] and a [`HostClock`]
//! - Issue [`Studio::play`] or [`Studio::record`]
//! - Drive the serial event loop with [`Studio::step`] / [`Studio::run_until_idle`]
//! - Consume [`Notification`]s; a finished recording arrives as an [`ArtifactHandle`]
//!
//! Every render pass is a pure function of normalized time, so any frame can also be painted on
//! its own through [`PassChain::render`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

/// Easing, phase windows and the procedural field.
pub mod animation;
/// Studio configuration.
pub mod config;
/// Encoder hosts, chunk channel and artifacts.
pub mod encode;
/// Surface, painter and render passes.
pub mod render;
/// Clock, scheduler, recording and the studio.
pub mod session;

pub use crate::foundation::core::{Affine, BezPath, Canvas, Fps, FrameIndex, Point, Rect, Vec2};
pub use crate::foundation::error::{MoonriseError, MoonriseResult};

pub use crate::animation::ease::{Ease, ease_in_out_cubic, lerp};
pub use crate::animation::field::ProceduralField;
pub use crate::animation::phase::PhaseWindow;
pub use crate::config::StudioConfig;
pub use crate::encode::artifact::{ArtifactHandle, ArtifactRegistry};
pub use crate::encode::encoder::{
    AudioInputConfig, ChunkQueue, ChunkSender, CodecPair, EncodeConfig, EncodedChunk,
    EncoderHost, FrameEncoder, NoEncoderHost, chunk_channel,
};
pub use crate::encode::ffmpeg::{FfmpegEncoder, FfmpegHost, is_ffmpeg_on_path};
pub use crate::encode::memory::{InMemoryDigest, InMemoryFaults, InMemoryHost, InMemoryStats};
pub use crate::render::passes::{
    BackgroundPass, FigurePass, FigureProgress, MoonPass, PassChain, RenderPass, SwirlPass,
};
pub use crate::render::surface::{DrawingSurface, FrameRGBA};
pub use crate::session::clock::{AnimationClock, ClockSample};
pub use crate::session::recording::{FrameStream, RecordingSession, RecordingState};
pub use crate::session::scheduler::{
    HostClock, HostTime, ManualClock, SystemClock, TimerEvent, TimerKind, TimerQueue,
};
pub use crate::session::studio::{AnimationSession, Notification, Studio};
