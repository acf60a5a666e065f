//! On-off-keyed pulse encoding of transponder identifiers.
//!
//! This module turns an identifier into the sequence of timer compare values
//! that the hardware transport replays through DMA. Each entry is one toggle
//! slot: a slot holding the *mark* value pulses the IR emitter for that
//! timer period, a slot holding the *space* value keeps it dark.
//!
//! ## Layout
//!
//! For every identifier byte the variant's bits are emitted in order:
//!
//! - I-Lap: start bit (always mark), 8 data bits, stop bit (always space)
//! - aRCiTimer: 8 data bits
//!
//! Every bit occupies `toggles_per_bit` slots at its level, followed by
//! `gap_toggles` slots at rest. The receiver recovers the data from pulse
//! duration, so the buffer length is fixed per variant:
//!
//! ```text
//! bits_per_byte * data_length * (toggles_per_bit + gap_toggles)
//! ```
//!
//! ## Functions
//!
//! - [`encode`]: Encodes an identifier with the default pulse timing and bit order
//! - [`PulseEncoder::encode`]: Encodes with explicit timing and bit order
//! - [`decode_buffer`]: Recovers the identifier bytes from a pulse buffer
//!
//! ## Limitations
//!
//! - The identifier length must equal the variant's data length; anything else
//!   is rejected with [`EncodeError::IdentifierLength`] before the buffer is touched.

use heapless::Vec;

use crate::consts::{
    BIT_TOGGLE_0, BIT_TOGGLE_1, MAX_DATA_LENGTH, PULSE_BUFFER_CAPACITY, START_BIT, STOP_BIT,
};
use crate::error::EncodeError;
use crate::protocol::{BitOrder, ProtocolVariant};

/// Pulse widths replayed by the hardware transport, one entry per toggle slot.
pub type PulseBuffer = Vec<u8, PULSE_BUFFER_CAPACITY>;

/// Identifier bytes recovered by [`decode_buffer`].
pub type Identifier = Vec<u8, MAX_DATA_LENGTH>;

/// Compare values written for carrier-on and carrier-off slots.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseTiming {
    /// Value of a slot during which the emitter is pulsed.
    pub mark: u8,
    /// Value of a slot during which the emitter is off.
    pub space: u8,
}

impl Default for PulseTiming {
    fn default() -> Self {
        Self {
            mark: BIT_TOGGLE_1,
            space: BIT_TOGGLE_0,
        }
    }
}

/// Encoder settings shared by every identifier it encodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PulseEncoder {
    /// Slot values for mark and space.
    pub timing: PulseTiming,
    /// Emission order of the data bits.
    pub bit_order: BitOrder,
}

impl PulseEncoder {
    /// Creates an encoder with the given timing and bit order.
    pub const fn new(timing: PulseTiming, bit_order: BitOrder) -> Self {
        Self { timing, bit_order }
    }

    /// Encodes `identifier` into a freshly allocated pulse buffer.
    ///
    /// # Errors
    /// [`EncodeError::IdentifierLength`] if `identifier` is not exactly
    /// `variant.data_length()` bytes long.
    pub fn encode(
        &self,
        identifier: &[u8],
        variant: ProtocolVariant,
    ) -> Result<PulseBuffer, EncodeError> {
        let mut pulses = PulseBuffer::new();
        self.encode_into(identifier, variant, &mut pulses)?;
        Ok(pulses)
    }

    /// Encodes `identifier` into `pulses`, replacing its previous contents.
    ///
    /// On error `pulses` is left untouched.
    pub fn encode_into(
        &self,
        identifier: &[u8],
        variant: ProtocolVariant,
        pulses: &mut PulseBuffer,
    ) -> Result<(), EncodeError> {
        check_length(identifier, variant)?;
        pulses.clear();

        for &byte in identifier {
            for index in 0..variant.bits_per_byte() {
                let level = if bit_level(byte, index, variant, self.bit_order) {
                    self.timing.mark
                } else {
                    self.timing.space
                };
                for _ in 0..variant.toggles_per_bit() {
                    pulses.push(level).map_err(|_| EncodeError::BufferOverflow)?;
                }
                for _ in 0..variant.gap_toggles() {
                    pulses
                        .push(self.timing.space)
                        .map_err(|_| EncodeError::BufferOverflow)?;
                }
            }
        }
        Ok(())
    }
}

/// Encodes `identifier` with the default [`PulseTiming`] and [`BitOrder`].
pub fn encode(identifier: &[u8], variant: ProtocolVariant) -> Result<PulseBuffer, EncodeError> {
    PulseEncoder::default().encode(identifier, variant)
}

/// Recovers identifier bytes from a buffer produced by [`PulseEncoder`].
///
/// # Returns
/// `None` if the buffer has the wrong length for `variant`, a bit's toggle
/// slots disagree, a gap slot is not at rest, or a start/stop bit has the
/// wrong level.
pub fn decode_buffer(
    pulses: &[u8],
    variant: ProtocolVariant,
    timing: PulseTiming,
    bit_order: BitOrder,
) -> Option<Identifier> {
    if pulses.len() != variant.buffer_len() {
        return None;
    }
    let bytes_len = variant.bits_per_byte() * variant.slots_per_bit();
    let mut identifier = Identifier::new();

    for byte_slots in pulses.chunks(bytes_len) {
        let mut byte = 0u8;
        for (index, bit_slots) in byte_slots.chunks(variant.slots_per_bit()).enumerate() {
            let (toggles, gap) = bit_slots.split_at(variant.toggles_per_bit());
            if gap.iter().any(|&slot| slot != timing.space) {
                return None;
            }
            let level = if toggles.iter().all(|&slot| slot == timing.mark) {
                true
            } else if toggles.iter().all(|&slot| slot == timing.space) {
                false
            } else {
                return None;
            };

            match data_index(index, variant) {
                Some(data) => {
                    if level {
                        byte |= bit_order.mask(data);
                    }
                }
                None => {
                    let expected = if index == 0 { START_BIT } else { STOP_BIT };
                    if level != expected {
                        return None;
                    }
                }
            }
        }
        identifier.push(byte).ok()?;
    }
    Some(identifier)
}

pub(crate) fn check_length(identifier: &[u8], variant: ProtocolVariant) -> Result<(), EncodeError> {
    if identifier.len() != variant.data_length() {
        return Err(EncodeError::IdentifierLength {
            variant,
            expected: variant.data_length(),
            actual: identifier.len(),
        });
    }
    Ok(())
}

/// Position of bit `index` within the data byte, or `None` for a framing bit.
fn data_index(index: usize, variant: ProtocolVariant) -> Option<usize> {
    if !variant.is_framed() {
        return Some(index);
    }
    if index == 0 || index == variant.bits_per_byte() - 1 {
        None
    } else {
        Some(index - 1)
    }
}

fn bit_level(byte: u8, index: usize, variant: ProtocolVariant, bit_order: BitOrder) -> bool {
    match data_index(index, variant) {
        Some(data) => byte & bit_order.mask(data) != 0,
        None if index == 0 => START_BIT,
        None => STOP_BIT,
    }
}
