//! Repeat scheduling with collision-avoidance jitter.
//!
//! The scheduler decides when the next transmission window opens. Each time
//! a window is consumed the next one is placed `BASE_INTERVAL_US` plus a
//! jitter offset in the future. Offsets are taken cyclically from
//! [`JITTER_TABLE`] so that transmitters sharing a track drift apart.
//!
//! Timestamps are a wrapping 32-bit microsecond counter. A window is due when
//! `now - next_fire_at`, computed in `u32` and read as `i32`, is not negative,
//! which stays correct across the counter wrapping around.

use crate::consts::{
    BASE_INTERVAL_US, JITTER_TABLE, JITTER_TABLE_LEN, JITTER_UNIT_US, LOW_POWER_INTERVAL_US,
};

/// Timing state of the repeat scheduler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RepeatScheduler {
    next_fire_at: u32,
    jitter_index: usize,
}

impl RepeatScheduler {
    /// Creates a scheduler whose first window is immediately due.
    pub const fn new() -> Self {
        Self {
            next_fire_at: 0,
            jitter_index: 0,
        }
    }

    /// Creates a scheduler from a known window and jitter position.
    ///
    /// `jitter_index` is reduced modulo the table length.
    pub const fn with_state(next_fire_at: u32, jitter_index: usize) -> Self {
        Self {
            next_fire_at,
            jitter_index: jitter_index % JITTER_TABLE_LEN,
        }
    }

    /// Timestamp at which the next window opens.
    pub const fn next_fire_at(&self) -> u32 {
        self.next_fire_at
    }

    /// Position in [`JITTER_TABLE`] used by the next window.
    pub const fn jitter_index(&self) -> usize {
        self.jitter_index
    }

    /// Whether the window has opened at `now`.
    pub const fn is_due(&self, now: u32) -> bool {
        now.wrapping_sub(self.next_fire_at) as i32 >= 0
    }

    /// Consumes the current window and schedules the next one.
    ///
    /// With `low_power` set the next window is [`LOW_POWER_INTERVAL_US`] away
    /// and the jitter position is kept. Otherwise the next table entry is used
    /// and the position advances.
    ///
    /// # Returns
    /// The new `next_fire_at`.
    pub fn schedule_next(&mut self, now: u32, low_power: bool) -> u32 {
        let interval = if low_power {
            LOW_POWER_INTERVAL_US
        } else {
            let jitter = JITTER_UNIT_US * u32::from(JITTER_TABLE[self.jitter_index]);
            self.jitter_index = (self.jitter_index + 1) % JITTER_TABLE_LEN;
            BASE_INTERVAL_US + jitter
        };
        self.next_fire_at = now.wrapping_add(interval);
        self.next_fire_at
    }
}
