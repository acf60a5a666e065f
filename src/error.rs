//! Error types returned by the encoder, configuration layer and controller.
//!
//! Unmet preconditions (gate closed, hardware busy, window not yet due) are
//! not errors; the controller reports them as skipped outcomes. Errors are
//! reserved for caller contract violations and transport failures.

use thiserror::Error;

use crate::protocol::ProtocolVariant;

/// Errors raised while turning an identifier into a pulse buffer.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum EncodeError {
    /// The identifier does not have the length the variant expects.
    #[error("identifier length {actual} does not match {variant} ({expected} bytes)")]
    IdentifierLength {
        /// Variant the identifier was encoded for.
        variant: ProtocolVariant,
        /// Bytes the variant requires.
        expected: usize,
        /// Bytes supplied.
        actual: usize,
    },
    /// The pulse buffer ran out of capacity.
    #[error("pulse buffer overflow")]
    BufferOverflow,
}

/// Errors raised while resolving a stored configuration.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// The selector byte does not name a supported protocol.
    #[error("unknown protocol variant selector {0}")]
    UnknownVariant(u8),
    /// The configuration source could not provide a configuration.
    #[error("configuration unavailable")]
    Unavailable,
}

/// Errors returned by [`Transponder`](crate::transponder::Transponder) operations.
///
/// `E` is the error type of the hardware transport.
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransponderError<E: core::fmt::Debug> {
    /// The identifier could not be encoded.
    #[error(transparent)]
    Encode(#[from] EncodeError),
    /// The configuration could not be resolved.
    #[error(transparent)]
    Config(#[from] ConfigError),
    /// The hardware transport reported a failure.
    #[error("transport error: {0:?}")]
    Transport(E),
}
