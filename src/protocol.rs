//! Protocol variants understood by race-timing receivers.
//!
//! Two layouts are supported:
//!
//! | Variant                         | Bits/byte | Toggles/bit | Gap | Bytes | Slots |
//! |---------------------------------|-----------|-------------|-----|-------|-------|
//! | [`Ilap`](ProtocolVariant::Ilap) (standard)        | 10 | 11 | 1 | 6 | 720 |
//! | [`Arcitimer`](ProtocolVariant::Arcitimer) (alternate) |  8 |  4 | 0 | 9 | 288 |
//!
//! The variant is persisted as a single selector byte: `0` for I-Lap,
//! `1` for aRCiTimer.

use core::fmt;

use crate::consts::{
    ARCITIMER_BITS_PER_BYTE, ARCITIMER_BUFFER_LEN, ARCITIMER_DATA_LENGTH, ARCITIMER_GAP_TOGGLES,
    ARCITIMER_TOGGLES_PER_BIT, ILAP_BITS_PER_BYTE, ILAP_BUFFER_LEN, ILAP_DATA_LENGTH,
    ILAP_GAP_TOGGLES, ILAP_TOGGLES_PER_BIT,
};
use crate::error::ConfigError;

/// Frame and timing layout of a transponder broadcast.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ProtocolVariant {
    /// Standard I-Lap layout: start bit, 8 data bits and stop bit per byte,
    /// 6 identifier bytes.
    #[default]
    Ilap,
    /// Alternate aRCiTimer layout: 8 unframed bits per byte, 9 identifier bytes.
    Arcitimer,
}

impl ProtocolVariant {
    /// Logical bits emitted for every identifier byte.
    pub const fn bits_per_byte(self) -> usize {
        match self {
            ProtocolVariant::Ilap => ILAP_BITS_PER_BYTE,
            ProtocolVariant::Arcitimer => ARCITIMER_BITS_PER_BYTE,
        }
    }

    /// Toggle slots carrying the level of a single bit.
    pub const fn toggles_per_bit(self) -> usize {
        match self {
            ProtocolVariant::Ilap => ILAP_TOGGLES_PER_BIT,
            ProtocolVariant::Arcitimer => ARCITIMER_TOGGLES_PER_BIT,
        }
    }

    /// Rest slots trailing every bit.
    pub const fn gap_toggles(self) -> usize {
        match self {
            ProtocolVariant::Ilap => ILAP_GAP_TOGGLES,
            ProtocolVariant::Arcitimer => ARCITIMER_GAP_TOGGLES,
        }
    }

    /// Total slots occupied by one bit.
    pub const fn slots_per_bit(self) -> usize {
        self.toggles_per_bit() + self.gap_toggles()
    }

    /// Identifier length in bytes.
    pub const fn data_length(self) -> usize {
        match self {
            ProtocolVariant::Ilap => ILAP_DATA_LENGTH,
            ProtocolVariant::Arcitimer => ARCITIMER_DATA_LENGTH,
        }
    }

    /// Exact pulse buffer length for this variant.
    pub const fn buffer_len(self) -> usize {
        match self {
            ProtocolVariant::Ilap => ILAP_BUFFER_LEN,
            ProtocolVariant::Arcitimer => ARCITIMER_BUFFER_LEN,
        }
    }

    /// Whether each byte is wrapped in start and stop bits.
    pub const fn is_framed(self) -> bool {
        matches!(self, ProtocolVariant::Ilap)
    }
}

impl TryFrom<u8> for ProtocolVariant {
    type Error = ConfigError;

    fn try_from(selector: u8) -> Result<Self, Self::Error> {
        match selector {
            0 => Ok(ProtocolVariant::Ilap),
            1 => Ok(ProtocolVariant::Arcitimer),
            other => Err(ConfigError::UnknownVariant(other)),
        }
    }
}

impl From<ProtocolVariant> for u8 {
    fn from(variant: ProtocolVariant) -> Self {
        match variant {
            ProtocolVariant::Ilap => 0,
            ProtocolVariant::Arcitimer => 1,
        }
    }
}

impl fmt::Display for ProtocolVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProtocolVariant::Ilap => f.write_str("I-Lap"),
            ProtocolVariant::Arcitimer => f.write_str("aRCiTimer"),
        }
    }
}

/// Order in which the 8 data bits of a byte are emitted.
///
/// Framing bits are unaffected: the start bit always leads and the stop bit
/// always trails.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitOrder {
    /// Bit 7 first.
    #[default]
    MsbFirst,
    /// Bit 0 first.
    LsbFirst,
}

impl BitOrder {
    /// Mask selecting the data bit emitted at position `index` (0..8).
    pub const fn mask(self, index: usize) -> u8 {
        match self {
            BitOrder::MsbFirst => 0x80 >> index,
            BitOrder::LsbFirst => 0x01 << index,
        }
    }
}
