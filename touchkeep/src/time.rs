//! Millisecond timestamps with wraparound-safe comparison.

use embassy_time::{Duration, Instant};

/// A point on the monotonic millisecond counter.
///
/// The counter is 32 bits wide and wraps after ~49.7 days. All comparisons go
/// through `wrapping_sub`, so a wrap between two timestamps is harmless as long
/// as they are less than `u32::MAX` ms apart.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Timestamp(u32);

impl Timestamp {
    pub const ZERO: Timestamp = Timestamp(0);

    pub const fn from_millis(ms: u32) -> Self {
        Self(ms)
    }

    /// Current time, read from the embassy time driver.
    pub fn now() -> Self {
        Self::from(Instant::now())
    }

    pub const fn as_millis(self) -> u32 {
        self.0
    }

    /// Milliseconds elapsed from `earlier` to `self`.
    pub const fn millis_since(self, earlier: Timestamp) -> u32 {
        self.0.wrapping_sub(earlier.0)
    }

    pub const fn wrapping_add_millis(self, ms: u32) -> Self {
        Self(self.0.wrapping_add(ms))
    }
}

impl From<Instant> for Timestamp {
    fn from(instant: Instant) -> Self {
        // Truncation is the wraparound
        Self(instant.as_millis() as u32)
    }
}

/// Convert a configured duration to the millisecond domain of [`Timestamp`].
pub(crate) fn duration_millis(duration: Duration) -> u32 {
    duration.as_millis().min(u32::MAX as u64) as u32
}

/// A deadline armed at `since`, due `after_ms` later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Deadline {
    since: Timestamp,
    after_ms: u32,
}

impl Deadline {
    pub const fn new(since: Timestamp, after: u32) -> Self {
        Self { since, after_ms: after }
    }

    pub fn after(since: Timestamp, duration: Duration) -> Self {
        Self::new(since, duration_millis(duration))
    }

    /// A deadline that is already due.
    pub const fn immediate(now: Timestamp) -> Self {
        Self::new(now, 0)
    }

    pub const fn is_elapsed(&self, now: Timestamp) -> bool {
        now.millis_since(self.since) >= self.after_ms
    }

    pub const fn since(&self) -> Timestamp {
        self.since
    }
}
