use crate::power::PowerSense;
use crate::timer::MonotonicClock;
use crate::transponder::Transponder;
use crate::transport::IrTransport;
use embedded_hal::delay::DelayNs;

/// Runs a blocking loop that repeatedly calls `tick()` on the provided transponder.
///
/// This is a simple polling loop for firmware without a task scheduler. The
/// repeat scheduler only needs to be polled more often than its shortest
/// interval (4.5 ms); a poll period of a few hundred microseconds keeps the
/// jitter pattern accurate.
///
/// # Arguments
/// - `transponder`: A mutable reference to a [`Transponder`] instance.
/// - `clock`: Source of the wrapping microsecond timestamp passed to `tick()`.
/// - `delay`: A delay provider implementing `DelayNs`, typically from the HAL.
/// - `poll_us`: The delay between each tick call, in microseconds.
///
/// # Notes
/// - This loop will never return; it is intended for single-purpose firmware.
/// - Transport errors are logged and the loop keeps polling; the next window
///   retries the transmission.
pub fn run_transponder_loop<T, P, C, D>(
    transponder: &mut Transponder<T, P>,
    clock: &mut C,
    delay: &mut D,
    poll_us: u32,
) -> !
where
    T: IrTransport,
    P: PowerSense,
    C: MonotonicClock,
    D: DelayNs,
{
    loop {
        let _ = poll_once(transponder, clock);
        delay.delay_us(poll_us);
    }
}

/// Same as [`run_transponder_loop`], but checks `keep_running` before each
/// poll and returns once it yields `false`.
///
/// # Returns
/// The number of transmissions triggered by the loop.
pub fn run_transponder_loop_while<T, P, C, D, F>(
    transponder: &mut Transponder<T, P>,
    clock: &mut C,
    delay: &mut D,
    poll_us: u32,
    mut keep_running: F,
) -> usize
where
    T: IrTransport,
    P: PowerSense,
    C: MonotonicClock,
    D: DelayNs,
    F: FnMut() -> bool,
{
    let mut sent = 0;
    while keep_running() {
        if poll_once(transponder, clock) {
            sent += 1;
        }
        delay.delay_us(poll_us);
    }
    sent
}

fn poll_once<T, P, C>(transponder: &mut Transponder<T, P>, clock: &mut C) -> bool
where
    T: IrTransport,
    P: PowerSense,
    C: MonotonicClock,
{
    match transponder.tick(clock.now_us()) {
        Ok(outcome) => outcome.transmitted(),
        Err(_) => {
            warn!("transponder tick failed");
            false
        }
    }
}
