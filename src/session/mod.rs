//! Serial run driver: animation clock, timer queue, recording pipeline and the studio.

/// Host time to normalized time mapping.
pub mod clock;
/// Capture/encode state machine.
pub mod recording;
/// Timer queue and host clocks.
pub mod scheduler;
/// `play`/`record` command interface.
pub mod studio;
