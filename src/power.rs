//! Low-power condition sources.
//!
//! While a sensitive power condition is reported (typically a USB cable
//! plugged into the flight controller) the scheduler drops to a fixed 10 Hz
//! cadence to reduce current draw through the cable.

use embedded_hal::digital::InputPin;

/// Reports whether transmissions should be slowed down to save power.
pub trait PowerSense {
    /// `true` while the low-rate cadence should be used.
    fn low_power_requested(&mut self) -> bool;
}

/// Power source that never requests low power.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AlwaysFullPower;

impl PowerSense for AlwaysFullPower {
    fn low_power_requested(&mut self) -> bool {
        false
    }
}

impl PowerSense for bool {
    fn low_power_requested(&mut self) -> bool {
        *self
    }
}

/// Reads the low-power condition from a cable-detect input pin.
#[derive(Debug)]
pub struct CableSense<P: InputPin> {
    /// The cable-detect pin.
    pub pin: P,
    inverted: bool,
}

impl<P: InputPin> CableSense<P> {
    /// Wraps `pin`, which reads high while the cable is inserted.
    ///
    /// # Arguments
    /// - `pin`: cable-detect input
    /// - `inverted`: `Some(true)` if the pin reads low while the cable is inserted
    pub fn new(pin: P, inverted: Option<bool>) -> Self {
        Self {
            pin,
            inverted: inverted.unwrap_or(false),
        }
    }

    /// Whether the cable is currently inserted. A pin read error counts as
    /// not inserted.
    pub fn cable_inserted(&mut self) -> bool {
        match self.pin.is_high() {
            Ok(high) => high != self.inverted,
            Err(_) => {
                warn!("cable sense read failed");
                false
            }
        }
    }
}

impl<P: InputPin> PowerSense for CableSense<P> {
    fn low_power_requested(&mut self) -> bool {
        self.cable_inserted()
    }
}
