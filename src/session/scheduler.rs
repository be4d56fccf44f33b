use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::time::{Duration, Instant};

/// Host timestamp in microseconds since an arbitrary origin.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct HostTime(pub u64);

impl HostTime {
    /// Timestamp at `ms` milliseconds after the origin.
    pub const fn from_millis(ms: u64) -> Self {
        Self(ms.saturating_mul(1_000))
    }

    /// Microseconds since the origin.
    pub const fn as_micros(self) -> u64 {
        self.0
    }

    /// `self + us`, saturating.
    pub const fn after_us(self, us: u64) -> Self {
        Self(self.0.saturating_add(us))
    }

    /// Microseconds elapsed since `earlier` (zero if `earlier` is in the future).
    pub const fn since(self, earlier: HostTime) -> u64 {
        self.0.saturating_sub(earlier.0)
    }
}

/// Source of host time for the serial scheduler.
pub trait HostClock: Send + std::fmt::Debug {
    /// Current host time.
    fn now(&self) -> HostTime;

    /// Block (or jump) until `deadline` has been reached.
    fn wait_until(&mut self, deadline: HostTime);
}

/// Virtual clock: time only moves when asked to, and waiting jumps straight to the deadline.
#[derive(Clone, Copy, Debug, Default)]
pub struct ManualClock {
    now: HostTime,
}

impl ManualClock {
    /// Clock at the origin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Clock starting at `now`.
    pub fn starting_at(now: HostTime) -> Self {
        Self { now }
    }

    /// Move time forward by `us` microseconds.
    pub fn advance_us(&mut self, us: u64) {
        self.now = self.now.after_us(us);
    }

    /// Move time forward by `ms` milliseconds.
    pub fn advance_ms(&mut self, ms: u64) {
        self.advance_us(ms.saturating_mul(1_000));
    }
}

impl HostClock for ManualClock {
    fn now(&self) -> HostTime {
        self.now
    }

    fn wait_until(&mut self, deadline: HostTime) {
        self.now = self.now.max(deadline);
    }
}

/// Monotonic wall clock that sleeps the calling thread until deadlines.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    origin: Instant,
}

impl SystemClock {
    /// Clock whose origin is the moment of construction.
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
        }
    }
}

impl Default for SystemClock {
    fn default() -> Self {
        Self::new()
    }
}

impl HostClock for SystemClock {
    fn now(&self) -> HostTime {
        HostTime(u64::try_from(self.origin.elapsed().as_micros()).unwrap_or(u64::MAX))
    }

    fn wait_until(&mut self, deadline: HostTime) {
        let wait = deadline.since(self.now());
        if wait > 0 {
            std::thread::sleep(Duration::from_micros(wait));
        }
    }
}

/// What a timer does when it fires.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TimerKind {
    /// Advance the animation clock and paint one frame.
    FrameTick,
    /// Force finalization of a recording that has not completed in time.
    Watchdog,
}

/// A fired timer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimerEvent {
    /// Deadline the timer was scheduled for.
    pub due: HostTime,
    /// Run the timer belongs to.
    pub run: u64,
    /// Timer payload.
    pub kind: TimerKind,
}

#[derive(Debug, PartialEq, Eq)]
struct Entry {
    event: TimerEvent,
    seq: u64,
}

// Min-heap on (due, seq): earliest deadline first, FIFO among equal deadlines.
impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        other
            .event
            .due
            .cmp(&self.event.due)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Single-threaded timer queue shared by frame ticks and watchdogs.
#[derive(Debug, Default)]
pub struct TimerQueue {
    heap: BinaryHeap<Entry>,
    next_seq: u64,
}

impl TimerQueue {
    /// Empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Schedule `kind` for `run` at `due`.
    pub fn schedule(&mut self, due: HostTime, run: u64, kind: TimerKind) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.heap.push(Entry {
            event: TimerEvent { due, run, kind },
            seq,
        });
    }

    /// Earliest pending deadline.
    pub fn next_due(&self) -> Option<HostTime> {
        self.heap.peek().map(|e| e.event.due)
    }

    /// Pop the earliest timer if it is due at `now`.
    pub fn pop_due(&mut self, now: HostTime) -> Option<TimerEvent> {
        if self.next_due()? > now {
            return None;
        }
        self.heap.pop().map(|e| e.event)
    }

    /// Drop every timer of `run`; returns how many were removed.
    pub fn cancel_run(&mut self, run: u64) -> usize {
        let before = self.heap.len();
        self.heap.retain(|e| e.event.run != run);
        before - self.heap.len()
    }

    /// Drop the timers of `run` with the given `kind`; returns how many were removed.
    pub fn cancel(&mut self, run: u64, kind: TimerKind) -> usize {
        let before = self.heap.len();
        self.heap
            .retain(|e| !(e.event.run == run && e.event.kind == kind));
        before - self.heap.len()
    }

    /// Number of pending timers of `run` with the given `kind`.
    pub fn count(&self, run: u64, kind: TimerKind) -> usize {
        self.heap
            .iter()
            .filter(|e| e.event.run == run && e.event.kind == kind)
            .count()
    }

    /// Number of pending timers.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    /// Return `true` when no timers are pending.
    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/scheduler.rs"]
mod tests;
