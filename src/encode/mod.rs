//! Stream encoding: encoder hosts, the ordered chunk channel and artifact handles.
//!
//! Encoders consume premultiplied frames in capture order and emit container bytes as chunks.
//! The recording session drains those chunks on the serial context and turns the concatenated
//! output into an [`artifact::ArtifactHandle`].

/// Artifact handles and the single-live-artifact registry.
pub mod artifact;
/// Encoder and host traits, configuration and the chunk channel.
pub mod encoder;
/// `ffmpeg`-based host (WebM/MP4 streamed through stdout).
pub mod ffmpeg;
/// Deterministic digest host for tests and debugging.
pub mod memory;
