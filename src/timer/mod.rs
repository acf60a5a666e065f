//! Timing arithmetic and host-loop integration.
//!
//! The transponder needs two notions of time: the carrier timer that clocks
//! individual toggle slots out of the DMA buffer, and a free-running
//! microsecond counter against which the repeat scheduler places its
//! windows.
//!
//! Contains:
//! - `carrier_timing`: runtime mark/space calculator
//! - `const_carrier_timing`: compile-time mark/space calculator
//! - [`MonotonicClock`]: microsecond time source consumed by the poll loop
//! - `run_transponder_loop`: blocking poll loop over `DelayNs` (feature `delay-loop`)
//! - `global_transponder_tick`, `tick_transponder!()` and `TransferFlag`:
//!   interrupt-safe shared state (feature `timer-isr`)
//!
//! Carrier periods at common timer clocks (I-Lap, 460 750 Hz):
//!
//! | Timer clock | Period | Mark (50 %) |
//! |-------------|--------|-------------|
//! |      72 MHz |    156 |          78 |
//! |      48 MHz |    104 |          52 |
//! |      84 MHz |    182 |          91 |

use libm::round;

use crate::encoding::PulseTiming;

#[cfg(feature = "delay-loop")]
mod delay;
#[cfg_attr(feature = "delay-loop", allow(unused_imports))]
#[cfg(feature = "delay-loop")]
pub use delay::*;

#[cfg(feature = "timer-isr")]
mod isr;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use isr::*;

#[cfg(feature = "timer-isr")]
mod macros;
#[cfg_attr(feature = "timer-isr", allow(unused_imports))]
#[cfg(feature = "timer-isr")]
pub use macros::*;

/// Free-running microsecond counter.
///
/// The counter is expected to wrap at `u32::MAX`; the scheduler compares
/// timestamps with wrapping arithmetic.
pub trait MonotonicClock {
    /// Current time in microseconds.
    fn now_us(&mut self) -> u32;
}

/// Computes the carrier period and mark value for a timer clock.
///
/// # Arguments
/// - `timer_hz`: timer input clock in Hz
/// - `carrier_hz`: IR carrier frequency in Hz (e.g. [`ILAP_CARRIER_HZ`](crate::consts::ILAP_CARRIER_HZ))
///
/// # Returns
/// - Timer counts per carrier period (rounds to nearest integer)
/// - [`PulseTiming`] with a 50 % duty mark, or `None` if the mark does not fit
///   an 8-bit slot, rounds down to zero, or `carrier_hz` is zero
pub fn carrier_timing(timer_hz: u32, carrier_hz: u32) -> Option<(u16, PulseTiming)> {
    if carrier_hz == 0 {
        return None;
    }
    let period = round(f64::from(timer_hz) / f64::from(carrier_hz));
    if period > f64::from(u16::MAX) {
        return None;
    }
    let period = period as u16;
    let mark = u8::try_from(period / 2).ok()?;
    if mark == 0 {
        return None;
    }
    Some((period, PulseTiming { mark, space: 0 }))
}

/// Compile-time carrier period and mark calculator.
///
/// Same contract as [`carrier_timing`], using integer rounding.
pub const fn const_carrier_timing(timer_hz: u32, carrier_hz: u32) -> Option<(u16, PulseTiming)> {
    if carrier_hz == 0 {
        return None;
    }
    let period = (timer_hz as u64 + carrier_hz as u64 / 2) / carrier_hz as u64;
    if period > u16::MAX as u64 || period / 2 > u8::MAX as u64 || period / 2 == 0 {
        return None;
    }
    Some((
        period as u16,
        PulseTiming {
            mark: (period / 2) as u8,
            space: 0,
        },
    ))
}
