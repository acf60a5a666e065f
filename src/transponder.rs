//! Transmission controller and repeat scheduling for IR lap-timing transponders.
//!
//! This module provides the [`Transponder`] struct, which owns the active
//! pulse buffer, the gates that permit transmissions, and the
//! [`RepeatScheduler`]. It drives a hardware [`IrTransport`] but never touches
//! the timer or DMA peripheral directly.
//!
//! ## Lifecycle
//!
//! ```text
//! Uninitialized --init--> Initialized --enable--> Armed <--> Transmitting
//!                               ^                   |
//!                               +-----disable-------+
//! ```
//!
//! - [`init`](Transponder::init) configures the hardware for a variant and loads
//!   the encoded identifier. The enable gate is closed afterwards.
//! - [`enable`](Transponder::enable) / [`disable`](Transponder::disable) open and
//!   close the gate for both one-shot and repeated transmissions. Disabling
//!   never aborts a transmission already in flight.
//! - [`start_repeating`](Transponder::start_repeating) /
//!   [`stop_repeating`](Transponder::stop_repeating) open and close the gate of
//!   the periodic scheduler.
//!
//! ## Example
//!
//! ```rust,ignore
//! use transponder_ir::power::AlwaysFullPower;
//! use transponder_ir::protocol::ProtocolVariant;
//! use transponder_ir::transponder::Transponder;
//!
//! let mut transponder = Transponder::new(dma_transport, AlwaysFullPower);
//! transponder.init(&[0x1F, 0xFC, 0x8F, 0x03, 0xF0, 0x01], ProtocolVariant::Ilap)?;
//! transponder.enable();
//! transponder.start_repeating();
//!
//! loop {
//!     transponder.tick(micros())?;
//! }
//! ```
//!
//! ## Design Notes
//!
//! The scheduling path only polls [`IrTransport::is_ready`]. The one blocking
//! call, [`IrTransport::wait_for_complete`], is used by
//! [`update_data`](Transponder::update_data) and
//! [`shutdown`](Transponder::shutdown) so the DMA engine never reads a buffer
//! while it is being replaced.

use crate::config::{ConfigLoader, TransponderConfig};
use crate::encoding::{PulseBuffer, PulseEncoder};
use crate::error::TransponderError;
use crate::power::PowerSense;
use crate::protocol::ProtocolVariant;
use crate::scheduler::RepeatScheduler;
use crate::transport::IrTransport;

/// Controller state, derived from the gates and hardware readiness.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransponderState {
    /// `init` has not completed.
    Uninitialized,
    /// Hardware is configured but the enable gate is closed.
    Initialized,
    /// The enable gate is open and the hardware is idle.
    Armed,
    /// A transmission is in flight.
    Transmitting,
}

/// Hardware-level transmission state.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransmissionState {
    /// The hardware has not been configured.
    Uninitialized,
    /// No transmission is in flight.
    Ready,
    /// A transmission is in flight.
    Busy,
}

/// Why a scheduler pass did not transmit.
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Skip {
    /// The enable gate is closed.
    Disabled,
    /// The repeat gate is closed.
    NotRepeating,
    /// A transmission is still in flight. The window is left untouched.
    Busy,
    /// The next window has not opened yet.
    NotDue,
}

/// Result of a single [`Transponder::tick`].
#[derive(PartialEq, Eq, Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TickOutcome {
    /// Nothing was sent.
    Skipped(Skip),
    /// A transmission was triggered.
    Transmitted {
        /// Timestamp of the next window.
        next_fire_at: u32,
        /// Whether the low-rate cadence was applied.
        low_power: bool,
    },
}

impl TickOutcome {
    /// Whether this pass triggered a transmission.
    pub const fn transmitted(&self) -> bool {
        matches!(self, TickOutcome::Transmitted { .. })
    }
}

/// IR transponder controller.
///
/// ## Type Parameters
///
/// - `T`: The hardware transport replaying pulse buffers
/// - `P`: Source of the low-power condition
#[derive(Debug)]
pub struct Transponder<T, P>
where
    T: IrTransport,
    P: PowerSense,
{
    transport: T,
    power: P,
    encoder: PulseEncoder,
    variant: ProtocolVariant,
    pulses: PulseBuffer,
    scheduler: RepeatScheduler,
    /// Hardware has been configured by `init`.
    configured: bool,
    /// Gate for every transmission.
    enabled: bool,
    /// Gate for scheduled transmissions.
    repeating: bool,
}

impl<T, P> Transponder<T, P>
where
    T: IrTransport,
    P: PowerSense,
{
    /// Creates an uninitialized controller with the default encoder.
    pub fn new(transport: T, power: P) -> Self {
        Self::with_encoder(transport, power, PulseEncoder::default())
    }

    /// Creates an uninitialized controller with a custom encoder.
    pub fn with_encoder(transport: T, power: P, encoder: PulseEncoder) -> Self {
        Self {
            transport,
            power,
            encoder,
            variant: ProtocolVariant::default(),
            pulses: PulseBuffer::new(),
            scheduler: RepeatScheduler::new(),
            configured: false,
            enabled: false,
            repeating: false,
        }
    }

    /// Replaces the scheduler state, e.g. to restore it after a warm restart.
    pub fn with_scheduler(mut self, scheduler: RepeatScheduler) -> Self {
        self.scheduler = scheduler;
        self
    }

    /// Configures the hardware for `variant` and loads `identifier`.
    ///
    /// The enable gate is closed; call [`enable`](Self::enable) to allow transmissions.
    ///
    /// # Errors
    /// - [`TransponderError::Encode`] if `identifier` has the wrong length.
    ///   No hardware call is made in that case.
    /// - [`TransponderError::Transport`] if the hardware rejects a call.
    pub fn init(
        &mut self,
        identifier: &[u8],
        variant: ProtocolVariant,
    ) -> Result<(), TransponderError<T::Error>> {
        self.enabled = false;
        let staged = self.encoder.encode(identifier, variant)?;

        if self.configured {
            self.wait_idle()?;
        }
        self.configured = false;
        self.configure_hardware(variant)?;
        self.transport
            .load_buffer(variant, &staged)
            .map_err(TransponderError::Transport)?;

        self.pulses = staged;
        self.variant = variant;
        self.configured = true;
        info!(
            "transponder initialised: {} ({} slots)",
            variant,
            self.pulses.len()
        );
        Ok(())
    }

    /// Initializes from a stored configuration.
    pub fn init_from_config(
        &mut self,
        config: &TransponderConfig,
    ) -> Result<(), TransponderError<T::Error>> {
        let variant = config.protocol_variant()?;
        let identifier = config.identifier()?;
        self.init(identifier, variant)
    }

    /// Loads the configuration from `loader` and initializes from it.
    pub fn init_from_loader<L: ConfigLoader>(
        &mut self,
        loader: &mut L,
    ) -> Result<(), TransponderError<T::Error>> {
        let config = loader.load()?;
        self.init_from_config(&config)
    }

    /// Opens the enable gate. Does nothing before [`init`](Self::init).
    pub fn enable(&mut self) {
        if !self.configured {
            warn!("transponder enable ignored: not initialised");
            return;
        }
        self.enabled = true;
        debug!("transponder enabled");
    }

    /// Closes the enable gate. A transmission in flight runs to completion.
    pub fn disable(&mut self) {
        self.enabled = false;
        debug!("transponder disabled");
    }

    /// Allows the scheduler to retrigger transmissions.
    pub fn start_repeating(&mut self) {
        self.repeating = true;
        debug!("transponder repeating started");
    }

    /// Stops scheduled retransmissions.
    pub fn stop_repeating(&mut self) {
        self.repeating = false;
        debug!("transponder repeating stopped");
    }

    /// Re-encodes and replaces the active pulse buffer.
    ///
    /// The identifier is encoded into a staging buffer first, so an invalid
    /// identifier leaves the active buffer untouched. If a transmission is in
    /// flight this blocks until it completes before the hardware buffer is
    /// rewritten. A different `variant` reconfigures the hardware.
    ///
    /// Before [`init`](Self::init) only the controller's copy is updated.
    ///
    /// A transport error while reprogramming the hardware closes the enable
    /// gate and drops back to uninitialized; [`init`](Self::init) is required
    /// before the next transmission.
    pub fn update_data(
        &mut self,
        identifier: &[u8],
        variant: ProtocolVariant,
    ) -> Result<(), TransponderError<T::Error>> {
        let staged = self.encoder.encode(identifier, variant)?;

        if self.configured {
            self.wait_idle()?;
            if let Err(error) = self.reload_hardware(variant, &staged) {
                // The peripheral may be half-way into the new layout.
                self.configured = false;
                self.enabled = false;
                warn!("transponder update failed: init required");
                return Err(error);
            }
        }

        self.pulses = staged;
        self.variant = variant;
        debug!("transponder data updated ({} slots)", self.pulses.len());
        Ok(())
    }

    /// Replays the current buffer immediately, bypassing the scheduler.
    ///
    /// # Returns
    /// `Ok(true)` if a transmission was triggered, `Ok(false)` if the enable
    /// gate is closed or a transmission is still in flight.
    pub fn transmit_once(&mut self) -> Result<bool, TransponderError<T::Error>> {
        if !self.enabled {
            trace!("transmit skipped: disabled");
            return Ok(false);
        }
        if !self.transport.is_ready() {
            trace!("transmit skipped: busy");
            return Ok(false);
        }
        self.transport
            .transmit(self.variant)
            .map_err(TransponderError::Transport)?;
        Ok(true)
    }

    /// Runs one scheduler pass at timestamp `now` (wrapping microseconds).
    ///
    /// Does nothing unless both gates are open and the hardware is ready.
    /// A busy transport does not consume the window, so a window that elapsed
    /// during a transmission fires on the first pass after it completes.
    pub fn tick(&mut self, now: u32) -> Result<TickOutcome, TransponderError<T::Error>> {
        if !self.enabled {
            return Ok(TickOutcome::Skipped(Skip::Disabled));
        }
        if !self.repeating {
            return Ok(TickOutcome::Skipped(Skip::NotRepeating));
        }
        if !self.transport.is_ready() {
            return Ok(TickOutcome::Skipped(Skip::Busy));
        }
        if !self.scheduler.is_due(now) {
            return Ok(TickOutcome::Skipped(Skip::NotDue));
        }

        let low_power = self.power.low_power_requested();
        let next_fire_at = self.scheduler.schedule_next(now, low_power);
        trace!(
            "transponder fire at {}, next {}, low power {}",
            now, next_fire_at, low_power
        );
        self.transport
            .transmit(self.variant)
            .map_err(TransponderError::Transport)?;

        Ok(TickOutcome::Transmitted {
            next_fire_at,
            low_power,
        })
    }

    /// Closes both gates, waits for any transmission in flight and disables
    /// the hardware. [`init`](Self::init) is required afterwards.
    pub fn shutdown(&mut self) -> Result<(), TransponderError<T::Error>> {
        self.enabled = false;
        self.repeating = false;
        if self.configured {
            self.wait_idle()?;
            self.transport
                .disable()
                .map_err(TransponderError::Transport)?;
            self.configured = false;
            info!("transponder shut down");
        }
        Ok(())
    }

    /// Current controller state.
    pub fn state(&self) -> TransponderState {
        if !self.configured {
            TransponderState::Uninitialized
        } else if !self.transport.is_ready() {
            TransponderState::Transmitting
        } else if self.enabled {
            TransponderState::Armed
        } else {
            TransponderState::Initialized
        }
    }

    /// Current hardware transmission state.
    pub fn transmission_state(&self) -> TransmissionState {
        if !self.configured {
            TransmissionState::Uninitialized
        } else if self.transport.is_ready() {
            TransmissionState::Ready
        } else {
            TransmissionState::Busy
        }
    }

    /// Whether the enable gate is open.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Whether the repeat gate is open.
    pub fn is_repeating(&self) -> bool {
        self.repeating
    }

    /// Active protocol variant.
    pub fn variant(&self) -> ProtocolVariant {
        self.variant
    }

    /// Active pulse buffer.
    pub fn pulses(&self) -> &[u8] {
        &self.pulses
    }

    /// Scheduler state.
    pub fn scheduler(&self) -> &RepeatScheduler {
        &self.scheduler
    }

    /// The hardware transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// The hardware transport, mutably. Intended for interrupt plumbing.
    pub fn transport_mut(&mut self) -> &mut T {
        &mut self.transport
    }

    /// The low-power source, mutably.
    pub fn power_mut(&mut self) -> &mut P {
        &mut self.power
    }

    /// Releases the transport and power source.
    pub fn release(self) -> (T, P) {
        (self.transport, self.power)
    }

    fn configure_hardware(
        &mut self,
        variant: ProtocolVariant,
    ) -> Result<(), TransponderError<T::Error>> {
        self.transport
            .initialize(variant)
            .map_err(TransponderError::Transport)?;
        self.transport
            .enable_dma(variant)
            .map_err(TransponderError::Transport)
    }

    fn reload_hardware(
        &mut self,
        variant: ProtocolVariant,
        pulses: &[u8],
    ) -> Result<(), TransponderError<T::Error>> {
        if variant != self.variant {
            info!("transponder protocol changed: {} -> {}", self.variant, variant);
            self.configure_hardware(variant)?;
        }
        self.transport
            .load_buffer(variant, pulses)
            .map_err(TransponderError::Transport)
    }

    fn wait_idle(&mut self) -> Result<(), TransponderError<T::Error>> {
        if !self.transport.is_ready() {
            debug!("waiting for transmission in flight");
            self.transport
                .wait_for_complete()
                .map_err(TransponderError::Transport)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ARCITIMER_PRESETS, StaticConfig};
    use crate::consts::JITTER_TABLE;
    use crate::encoding::{PulseTiming, decode_buffer, encode};
    use crate::error::{ConfigError, EncodeError};
    use crate::power::AlwaysFullPower;
    use crate::protocol::BitOrder;
    use crate::transport::mock::{Call, MockTransport};

    const ILAP_ID: [u8; 6] = [0x1F, 0xFC, 0x8F, 0x03, 0xF0, 0x01];

    fn armed() -> Transponder<MockTransport, bool> {
        let mut transponder = Transponder::new(MockTransport::new(), false);
        transponder.init(&ILAP_ID, ProtocolVariant::Ilap).unwrap();
        transponder.enable();
        transponder.start_repeating();
        transponder.transport_mut().clear();
        transponder
    }

    #[test]
    fn test_init_configures_and_loads() {
        let mut transponder = Transponder::new(MockTransport::new(), AlwaysFullPower);
        assert_eq!(transponder.state(), TransponderState::Uninitialized);

        transponder
            .init(&ARCITIMER_PRESETS[0], ProtocolVariant::Arcitimer)
            .unwrap();
        assert_eq!(
            transponder.transport().calls,
            vec![
                Call::Initialize(ProtocolVariant::Arcitimer),
                Call::EnableDma(ProtocolVariant::Arcitimer),
                Call::LoadBuffer(ProtocolVariant::Arcitimer, 288),
            ]
        );
        assert_eq!(transponder.pulses().len(), 288);
        assert_eq!(transponder.state(), TransponderState::Initialized);
        assert_eq!(transponder.transmission_state(), TransmissionState::Ready);
        assert!(!transponder.is_enabled());
    }

    #[test]
    fn test_init_rejects_wrong_length_without_touching_hardware() {
        let mut transponder = Transponder::new(MockTransport::new(), AlwaysFullPower);
        let result = transponder.init(&ARCITIMER_PRESETS[0], ProtocolVariant::Ilap);
        assert_eq!(
            result,
            Err(TransponderError::Encode(EncodeError::IdentifierLength {
                variant: ProtocolVariant::Ilap,
                expected: 6,
                actual: 9,
            }))
        );
        assert!(transponder.transport().calls.is_empty());
        assert_eq!(transponder.state(), TransponderState::Uninitialized);
    }

    #[test]
    fn test_init_closes_enable_gate() {
        let mut transponder = armed();
        assert!(transponder.is_enabled());
        transponder.init(&ILAP_ID, ProtocolVariant::Ilap).unwrap();
        assert!(!transponder.is_enabled());
        assert!(transponder.is_repeating());
    }

    #[test]
    fn test_enable_before_init_is_ignored() {
        let mut transponder = Transponder::new(MockTransport::new(), AlwaysFullPower);
        transponder.enable();
        transponder.start_repeating();
        assert!(!transponder.is_enabled());
        assert_eq!(
            transponder.tick(0),
            Ok(TickOutcome::Skipped(Skip::Disabled))
        );
        assert_eq!(transponder.transmit_once(), Ok(false));
        assert_eq!(transponder.transport().hardware_calls(), 0);
    }

    #[test]
    fn test_tick_requires_every_gate() {
        for enabled in [false, true] {
            for repeating in [false, true] {
                for ready in [false, true] {
                    let mut transponder = armed();
                    if !enabled {
                        transponder.disable();
                    }
                    if !repeating {
                        transponder.stop_repeating();
                    }
                    transponder.transport_mut().busy = !ready;

                    let outcome = transponder.tick(1_000).unwrap();
                    let transport = transponder.transport();
                    if enabled && repeating && ready {
                        assert!(outcome.transmitted());
                        assert_eq!(transport.transmits(), 1);
                    } else {
                        assert!(!outcome.transmitted());
                        assert_eq!(transport.transmits(), 0);
                        assert!(transport.calls.is_empty());
                    }
                    if !enabled || !repeating {
                        assert_eq!(transport.hardware_calls(), 0);
                    }
                    if enabled && repeating && !ready {
                        assert_eq!(outcome, TickOutcome::Skipped(Skip::Busy));
                    }
                }
            }
        }
    }

    #[test]
    fn test_tick_follows_jitter_table() {
        let mut transponder = armed();
        let mut now = 250u32;
        let rounds = JITTER_TABLE.iter().enumerate().chain(JITTER_TABLE.iter().enumerate());
        for (index, jitter) in rounds {
            assert_eq!(transponder.scheduler().jitter_index(), index);
            let outcome = transponder.tick(now).unwrap();
            let expected = now + 4_500 + 1_000 * u32::from(*jitter);
            assert_eq!(
                outcome,
                TickOutcome::Transmitted {
                    next_fire_at: expected,
                    low_power: false
                }
            );
            assert_eq!(transponder.scheduler().jitter_index(), (index + 1) % 15);

            transponder.transport_mut().finish();
            assert_eq!(
                transponder.tick(expected - 1),
                Ok(TickOutcome::Skipped(Skip::NotDue))
            );
            now = expected + 3;
        }
        assert_eq!(transponder.transport().transmits(), 30);
    }

    #[test]
    fn test_elapsed_window_fires_once_ready() {
        let mut transponder = armed();
        assert!(transponder.tick(0).unwrap().transmitted());
        assert_eq!(transponder.scheduler().next_fire_at(), 4_500);

        assert_eq!(
            transponder.tick(20_000),
            Ok(TickOutcome::Skipped(Skip::Busy))
        );
        assert_eq!(transponder.scheduler().next_fire_at(), 4_500);
        assert_eq!(transponder.scheduler().jitter_index(), 1);

        transponder.transport_mut().finish();
        assert_eq!(
            transponder.tick(20_001),
            Ok(TickOutcome::Transmitted {
                next_fire_at: 20_001 + 4_500 + 9_000,
                low_power: false
            })
        );
    }

    #[test]
    fn test_tick_due_across_counter_wrap() {
        let mut transponder =
            armed().with_scheduler(RepeatScheduler::with_state(u32::MAX - 100, 2));
        assert_eq!(
            transponder.tick(u32::MAX - 101),
            Ok(TickOutcome::Skipped(Skip::NotDue))
        );
        let outcome = transponder.tick(50).unwrap();
        assert_eq!(
            outcome,
            TickOutcome::Transmitted {
                next_fire_at: 50 + 4_500 + 4_000,
                low_power: false
            }
        );
    }

    #[test]
    fn test_low_power_forces_slow_cadence() {
        let mut transponder = armed().with_scheduler(RepeatScheduler::with_state(1_000, 7));
        *transponder.power_mut() = true;

        assert_eq!(
            transponder.tick(1_500),
            Ok(TickOutcome::Transmitted {
                next_fire_at: 101_500,
                low_power: true
            })
        );
        assert_eq!(transponder.scheduler().jitter_index(), 7);

        transponder.transport_mut().finish();
        *transponder.power_mut() = false;
        assert_eq!(
            transponder.tick(101_500),
            Ok(TickOutcome::Transmitted {
                next_fire_at: 101_500 + 4_500 + 7_000,
                low_power: false
            })
        );
        assert_eq!(transponder.scheduler().jitter_index(), 8);
    }

    #[test]
    fn test_update_data_is_deterministic() {
        let mut transponder = armed();
        transponder.update_data(&ILAP_ID, ProtocolVariant::Ilap).unwrap();
        let first = transponder.transport().loaded.clone();
        transponder.update_data(&ILAP_ID, ProtocolVariant::Ilap).unwrap();
        let second = transponder.transport().loaded.clone();

        assert_eq!(first, second);
        assert_eq!(&first[..], transponder.pulses());
        assert_eq!(&first[..], &encode(&ILAP_ID, ProtocolVariant::Ilap).unwrap()[..]);
    }

    #[test]
    fn test_update_data_waits_for_transmission_in_flight() {
        let mut transponder = armed();
        assert!(transponder.tick(0).unwrap().transmitted());
        transponder.transport_mut().busy_polls = 4;

        let identifier = [0xAA, 0x55, 0xAA, 0x55, 0xAA, 0x55];
        transponder
            .update_data(&identifier, ProtocolVariant::Ilap)
            .unwrap();

        let transport = transponder.transport();
        assert_eq!(transport.busy_polls, 0);
        assert!(transport.is_ready());
        let decoded = decode_buffer(
            &transport.loaded,
            ProtocolVariant::Ilap,
            PulseTiming::default(),
            BitOrder::MsbFirst,
        )
        .unwrap();
        assert_eq!(&decoded[..], &identifier[..]);
    }

    #[test]
    fn test_update_data_switches_variant() {
        let mut transponder = armed();
        transponder
            .update_data(&ARCITIMER_PRESETS[3], ProtocolVariant::Arcitimer)
            .unwrap();
        assert_eq!(
            transponder.transport().calls,
            vec![
                Call::Initialize(ProtocolVariant::Arcitimer),
                Call::EnableDma(ProtocolVariant::Arcitimer),
                Call::LoadBuffer(ProtocolVariant::Arcitimer, 288),
            ]
        );
        assert_eq!(transponder.variant(), ProtocolVariant::Arcitimer);

        assert!(transponder.transmit_once().unwrap());
        assert_eq!(
            transponder.transport().calls.last(),
            Some(&Call::Transmit(ProtocolVariant::Arcitimer))
        );
    }

    #[test]
    fn test_failed_variant_switch_requires_init() {
        let mut transponder = armed();
        transponder.transport_mut().fail_load = true;
        assert_eq!(
            transponder.update_data(&ARCITIMER_PRESETS[3], ProtocolVariant::Arcitimer),
            Err(TransponderError::Transport("load fault"))
        );
        assert_eq!(transponder.state(), TransponderState::Uninitialized);
        assert!(!transponder.is_enabled());
        assert_eq!(transponder.variant(), ProtocolVariant::Ilap);

        // Nothing is replayed on hardware set up for the other variant.
        transponder.transport_mut().fail_load = false;
        transponder.enable();
        assert!(!transponder.tick(0).unwrap().transmitted());
        assert_eq!(transponder.transmit_once(), Ok(false));
        assert_eq!(transponder.transport().transmits(), 0);

        transponder
            .init(&ARCITIMER_PRESETS[3], ProtocolVariant::Arcitimer)
            .unwrap();
        transponder.enable();
        assert!(transponder.tick(0).unwrap().transmitted());
        assert_eq!(
            transponder.transport().calls.last(),
            Some(&Call::Transmit(ProtocolVariant::Arcitimer))
        );
    }

    #[test]
    fn test_failed_reload_closes_enable_gate() {
        let mut transponder = armed();
        transponder.transport_mut().fail_load = true;
        assert!(
            transponder
                .update_data(&ILAP_ID, ProtocolVariant::Ilap)
                .is_err()
        );
        assert!(!transponder.is_enabled());
        assert_eq!(transponder.transmission_state(), TransmissionState::Uninitialized);
    }

    #[test]
    fn test_update_data_rejects_wrong_length() {
        let mut transponder = armed();
        let before = transponder.pulses().to_vec();
        assert!(
            transponder
                .update_data(&ILAP_ID[..5], ProtocolVariant::Ilap)
                .is_err()
        );
        assert_eq!(transponder.pulses(), &before[..]);
        assert!(transponder.transport().calls.is_empty());
    }

    #[test]
    fn test_update_data_before_init_stays_local() {
        let mut transponder = Transponder::new(MockTransport::new(), AlwaysFullPower);
        transponder
            .update_data(&ARCITIMER_PRESETS[8], ProtocolVariant::Arcitimer)
            .unwrap();
        assert_eq!(transponder.pulses().len(), 288);
        assert!(transponder.transport().calls.is_empty());
    }

    #[test]
    fn test_transmit_once_bypasses_scheduler() {
        let mut transponder = armed().with_scheduler(RepeatScheduler::with_state(90_000, 5));
        transponder.stop_repeating();

        assert_eq!(transponder.transmit_once(), Ok(true));
        assert_eq!(transponder.transport().transmits(), 1);
        assert_eq!(transponder.scheduler().next_fire_at(), 90_000);
        assert_eq!(transponder.scheduler().jitter_index(), 5);
        assert_eq!(transponder.state(), TransponderState::Transmitting);

        // Busy: a second request is dropped.
        assert_eq!(transponder.transmit_once(), Ok(false));
        assert_eq!(transponder.transport().transmits(), 1);
    }

    #[test]
    fn test_disable_does_not_abort_transmission() {
        let mut transponder = armed();
        assert_eq!(transponder.transmit_once(), Ok(true));
        transponder.disable();

        assert_eq!(transponder.transmission_state(), TransmissionState::Busy);
        assert!(!transponder.transport().calls.contains(&Call::Disable));
        transponder.transport_mut().finish();
        assert_eq!(transponder.state(), TransponderState::Initialized);
        assert_eq!(transponder.transmit_once(), Ok(false));
    }

    #[test]
    fn test_shutdown_waits_and_disables_hardware() {
        let mut transponder = armed();
        assert_eq!(transponder.transmit_once(), Ok(true));
        transponder.transport_mut().busy_polls = 2;

        transponder.shutdown().unwrap();
        assert_eq!(transponder.transport().calls.last(), Some(&Call::Disable));
        assert_eq!(transponder.state(), TransponderState::Uninitialized);
        assert!(!transponder.is_repeating());

        let (transport, _power) = transponder.release();
        assert!(transport.is_ready());
    }

    #[test]
    fn test_transport_error_is_propagated() {
        let mut transponder = armed();
        transponder.transport_mut().fail_transmit = true;
        assert_eq!(
            transponder.tick(0),
            Err(TransponderError::Transport("dma fault"))
        );
        assert_eq!(
            transponder.transmit_once(),
            Err(TransponderError::Transport("dma fault"))
        );
    }

    #[test]
    fn test_init_from_config() {
        let mut transponder = Transponder::new(MockTransport::new(), AlwaysFullPower);
        transponder
            .init_from_config(&TransponderConfig::default())
            .unwrap();
        assert_eq!(transponder.variant(), ProtocolVariant::Ilap);
        assert_eq!(transponder.pulses().len(), 720);

        let config =
            TransponderConfig::with_identifier(ProtocolVariant::Arcitimer, &ARCITIMER_PRESETS[2])
                .unwrap();
        transponder
            .init_from_loader(&mut StaticConfig(config))
            .unwrap();
        assert_eq!(transponder.variant(), ProtocolVariant::Arcitimer);
    }

    #[test]
    fn test_init_from_failing_loader() {
        struct Missing;
        impl ConfigLoader for Missing {
            fn load(&mut self) -> Result<TransponderConfig, ConfigError> {
                Err(ConfigError::Unavailable)
            }
        }

        let mut transponder = Transponder::new(MockTransport::new(), AlwaysFullPower);
        assert_eq!(
            transponder.init_from_loader(&mut Missing),
            Err(TransponderError::Config(ConfigError::Unavailable))
        );
        let bad = TransponderConfig {
            variant: 3,
            ..TransponderConfig::default()
        };
        assert_eq!(
            transponder.init_from_config(&bad),
            Err(TransponderError::Config(ConfigError::UnknownVariant(3)))
        );
    }
}
