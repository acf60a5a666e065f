//! Constants used across the transponder protocol implementation.
//!
//! This module defines the frame layout of both supported protocol variants,
//! the pulse-width values written into the DMA buffer, and the timing used
//! by the repeat scheduler.
//!
//! ## Key Concepts
//!
//! - **Bits per byte**: I-Lap frames every byte with a start and a stop bit (10 bits),
//!   aRCiTimer sends the 8 data bits bare.
//! - **Toggles**: each logical bit is stretched over a fixed number of timer periods
//!   ("toggle slots"), optionally followed by gap slots held at rest.
//! - **Buffer sizing**: `bits_per_byte * data_length * (toggles_per_bit + gap_toggles)`.
//! - **Scheduling**: a fixed base interval plus a cyclic jitter offset so that several
//!   transmitters in range drift apart instead of colliding.
//!
//! These values should be used wherever buffer sizing or scheduling logic is
//! implemented so the encoder and the hardware transport agree on sizes.

/// Bits emitted per identifier byte for I-Lap: start + 8 data + stop.
pub const ILAP_BITS_PER_BYTE: usize = 10;

/// Identifier length (in bytes) for I-Lap.
pub const ILAP_DATA_LENGTH: usize = 6;

/// Toggle slots carrying the level of each I-Lap bit.
pub const ILAP_TOGGLES_PER_BIT: usize = 11;

/// Rest slots appended after every I-Lap bit.
pub const ILAP_GAP_TOGGLES: usize = 1;

/// Total slots per I-Lap bit.
pub const ILAP_TOGGLES: usize = ILAP_TOGGLES_PER_BIT + ILAP_GAP_TOGGLES;

/// Pulse buffer length for a complete I-Lap identifier (720 slots).
pub const ILAP_BUFFER_LEN: usize = ILAP_BITS_PER_BYTE * ILAP_DATA_LENGTH * ILAP_TOGGLES;

/// Bits emitted per identifier byte for aRCiTimer (no framing).
pub const ARCITIMER_BITS_PER_BYTE: usize = 8;

/// Identifier length (in bytes) for aRCiTimer.
pub const ARCITIMER_DATA_LENGTH: usize = 9;

/// Toggle slots carrying the level of each aRCiTimer bit.
pub const ARCITIMER_TOGGLES_PER_BIT: usize = 4;

/// aRCiTimer bits are sent back to back.
pub const ARCITIMER_GAP_TOGGLES: usize = 0;

/// Total slots per aRCiTimer bit.
pub const ARCITIMER_TOGGLES: usize = ARCITIMER_TOGGLES_PER_BIT + ARCITIMER_GAP_TOGGLES;

/// Pulse buffer length for a complete aRCiTimer identifier (288 slots).
pub const ARCITIMER_BUFFER_LEN: usize =
    ARCITIMER_BITS_PER_BYTE * ARCITIMER_DATA_LENGTH * ARCITIMER_TOGGLES;

/// Longest identifier of any variant. Sizes the persisted identifier field.
pub const MAX_DATA_LENGTH: usize = ARCITIMER_DATA_LENGTH;

/// Capacity of the pulse buffer, large enough for either variant.
pub const PULSE_BUFFER_CAPACITY: usize = if ILAP_BUFFER_LEN > ARCITIMER_BUFFER_LEN {
    ILAP_BUFFER_LEN
} else {
    ARCITIMER_BUFFER_LEN
};

/// Compare value of a slot in which the emitter is pulsed (50 % duty of a
/// 156-count carrier period).
pub const BIT_TOGGLE_1: u8 = 78;

/// Compare value of a slot in which the emitter stays off.
pub const BIT_TOGGLE_0: u8 = 0;

/// Level of the I-Lap start bit. It always carries the carrier.
pub const START_BIT: bool = true;

/// Level of the I-Lap stop bit. It always rests.
pub const STOP_BIT: bool = false;

/// I-Lap carrier frequency in Hz.
pub const ILAP_CARRIER_HZ: u32 = 460_750;

/// Minimum spacing between two scheduled transmissions, in microseconds.
pub const BASE_INTERVAL_US: u32 = 4_500;

/// Multiplier applied to each jitter table entry, in microseconds.
pub const JITTER_UNIT_US: u32 = 1_000;

/// Interval used while a low-power condition is reported: 10 Hz.
pub const LOW_POWER_INTERVAL_US: u32 = (1_000 * 1_000) / 10;

/// Number of entries in [`JITTER_TABLE`].
pub const JITTER_TABLE_LEN: usize = 15;

/// Cyclic jitter offsets (in [`JITTER_UNIT_US`]) added to [`BASE_INTERVAL_US`].
///
/// Other transmitters in the field use the same sequence; changing it changes
/// real-world collision behaviour.
pub const JITTER_TABLE: [u8; JITTER_TABLE_LEN] = [0, 9, 4, 8, 3, 9, 6, 7, 1, 6, 9, 7, 8, 2, 6];
