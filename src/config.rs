//! Transponder configuration.
//!
//! The persisted configuration is a fixed 9-byte identifier field and a
//! single protocol selector byte. Variants with shorter identifiers use the
//! leading bytes of the field. How the configuration is stored is up to the
//! host; it only has to implement [`ConfigLoader`].

use crate::consts::MAX_DATA_LENGTH;
use crate::encoding::check_length;
use crate::error::{ConfigError, EncodeError};
use crate::protocol::ProtocolVariant;

/// Factory identifier. It is a production hardware test pattern, not a
/// valid race code.
pub const FACTORY_IDENTIFIER: [u8; MAX_DATA_LENGTH] =
    [0x1F, 0xFC, 0x8F, 0x03, 0xF0, 0x01, 0xF8, 0x1F, 0x00];

/// Known aRCiTimer identifier codes, ID1 to ID9.
pub const ARCITIMER_PRESETS: [[u8; MAX_DATA_LENGTH]; 9] = [
    [0x1F, 0xFC, 0x8F, 0x03, 0xF0, 0x01, 0xF8, 0x1F, 0x00],
    [0xFF, 0x83, 0xFF, 0xC1, 0x07, 0xFF, 0x03, 0xF0, 0x01],
    [0x07, 0x7E, 0xE0, 0x07, 0x7E, 0xE0, 0x00, 0x38, 0x00],
    [0xFF, 0x83, 0xFF, 0xC1, 0x07, 0xE0, 0x7F, 0xF0, 0x01],
    [0x0F, 0xF0, 0x00, 0xFF, 0x00, 0x0F, 0xF0, 0x0F, 0x00],
    [0xFF, 0x83, 0x0F, 0x3E, 0xF8, 0xE0, 0x83, 0xFF, 0x0F],
    [0x1F, 0xFC, 0x0F, 0xC0, 0xFF, 0x00, 0xFC, 0x0F, 0x3E],
    [0xFF, 0x03, 0xF0, 0x01, 0xF8, 0xE0, 0xC1, 0xFF, 0x01],
    [0x1F, 0x7C, 0x40, 0x0F, 0xF0, 0x61, 0xC7, 0x3F, 0x00],
];

/// Persisted identifier and protocol selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TransponderConfig {
    /// Identifier field; only the first `data_length` bytes are broadcast.
    pub data: [u8; MAX_DATA_LENGTH],
    /// Protocol selector byte (`0` I-Lap, `1` aRCiTimer).
    pub variant: u8,
}

impl Default for TransponderConfig {
    fn default() -> Self {
        Self {
            data: FACTORY_IDENTIFIER,
            variant: u8::from(ProtocolVariant::Ilap),
        }
    }
}

impl TransponderConfig {
    /// Builds a configuration from an identifier of the right length for `variant`.
    ///
    /// Unused trailing bytes of the field are zeroed.
    pub fn with_identifier(
        variant: ProtocolVariant,
        identifier: &[u8],
    ) -> Result<Self, EncodeError> {
        check_length(identifier, variant)?;
        let mut data = [0u8; MAX_DATA_LENGTH];
        data[..identifier.len()].copy_from_slice(identifier);
        Ok(Self {
            data,
            variant: u8::from(variant),
        })
    }

    /// Resolves the selector byte.
    pub fn protocol_variant(&self) -> Result<ProtocolVariant, ConfigError> {
        ProtocolVariant::try_from(self.variant)
    }

    /// The identifier bytes broadcast for the configured variant.
    pub fn identifier(&self) -> Result<&[u8], ConfigError> {
        let variant = self.protocol_variant()?;
        Ok(&self.data[..variant.data_length()])
    }
}

/// Source of the boot-time configuration.
pub trait ConfigLoader {
    /// Loads the configuration.
    fn load(&mut self) -> Result<TransponderConfig, ConfigError>;
}

/// Loader returning a fixed configuration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticConfig(pub TransponderConfig);

impl ConfigLoader for StaticConfig {
    fn load(&mut self) -> Result<TransponderConfig, ConfigError> {
        Ok(self.0)
    }
}
