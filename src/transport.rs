//! Hardware transport abstraction.
//!
//! The transport owns the timer and DMA channel that shift a pulse buffer
//! onto the IR emitter pin. This crate never touches the peripheral itself;
//! platform code implements [`IrTransport`] and hands it to the
//! [`Transponder`](crate::transponder::Transponder).
//!
//! Every call is keyed by [`ProtocolVariant`] because carrier timing and
//! buffer length differ per variant.
//!
//! ## Readiness
//!
//! A transmission runs from [`transmit`](IrTransport::transmit) until the
//! DMA-complete interrupt fires and cannot be aborted in between. The
//! controller polls [`is_ready`](IrTransport::is_ready) before every trigger
//! and never blocks on the scheduling path. See
//! [`TransferFlag`](crate::timer::TransferFlag) for an interrupt-safe ready
//! flag.

use crate::protocol::ProtocolVariant;

/// Timer/DMA peripheral that replays pulse buffers on the IR emitter.
pub trait IrTransport {
    /// Error reported by the peripheral.
    type Error: core::fmt::Debug;

    /// Configures the timer and output pin for `variant`.
    fn initialize(&mut self, variant: ProtocolVariant) -> Result<(), Self::Error>;

    /// Arms the DMA channel with the buffer size used by `variant`.
    fn enable_dma(&mut self, variant: ProtocolVariant) -> Result<(), Self::Error>;

    /// Stops the timer and releases the DMA channel.
    fn disable(&mut self) -> Result<(), Self::Error>;

    /// Whether no transmission is in flight.
    fn is_ready(&self) -> bool;

    /// Non-blocking completion check.
    ///
    /// Returns `Err(nb::Error::WouldBlock)` while a transmission is in flight.
    fn poll_complete(&mut self) -> nb::Result<(), Self::Error>;

    /// Blocks until the in-flight transmission, if any, has finished.
    fn wait_for_complete(&mut self) -> Result<(), Self::Error> {
        nb::block!(self.poll_complete())
    }

    /// Copies `pulses` into the DMA source buffer.
    ///
    /// Only called while the transport is ready, so the DMA engine never
    /// reads a buffer that is being rewritten.
    fn load_buffer(&mut self, variant: ProtocolVariant, pulses: &[u8]) -> Result<(), Self::Error>;

    /// Starts replaying the loaded buffer. Readiness drops until it completes.
    fn transmit(&mut self, variant: ProtocolVariant) -> Result<(), Self::Error>;
}
