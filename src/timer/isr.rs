use crate::power::PowerSense;
use crate::transponder::{TickOutcome, Transponder};
use crate::transport::IrTransport;
use core::cell::{Cell, RefCell};
use core::fmt;
use critical_section::Mutex;

/// A global transponder slot shared between the main loop and interrupt handlers.
pub type GlobalTransponder<T, P> = Mutex<RefCell<Option<Transponder<T, P>>>>;

/// Used to initialize the global static `Transponder` for use with
/// `critical_section`.
///
/// # Returns
/// * An empty mutable ref-cell
///
/// # Example
/// ```rust,ignore
/// static TRANSPONDER: GlobalTransponder<MyDmaTransport, AlwaysFullPower> =
///     global_transponder_init();
/// ```
pub const fn global_transponder_init<T: IrTransport, P: PowerSense>()
-> GlobalTransponder<T, P> {
    Mutex::new(RefCell::new(None))
}

/// Moves a configured transponder into the global slot.
///
/// # Arguments
/// * The global static `Transponder`
/// * The transponder, typically already initialized from the stored configuration
pub fn global_transponder_setup<T: IrTransport, P: PowerSense>(
    global: &'static GlobalTransponder<T, P>,
    transponder: Transponder<T, P>,
) {
    critical_section::with(|cs| {
        let _ = global.borrow(cs).replace(Some(transponder));
    });
}

/// Runs one scheduler pass on the global transponder.
///
/// # Returns
/// `None` if the slot is empty or the tick failed, otherwise the tick outcome.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM7() {
///     global_transponder_tick(&TRANSPONDER, micros());
/// }
/// ```
pub fn global_transponder_tick<T: IrTransport, P: PowerSense>(
    global: &'static GlobalTransponder<T, P>,
    now: u32,
) -> Option<TickOutcome> {
    critical_section::with(|cs| {
        let mut slot = global.borrow(cs).borrow_mut();
        let transponder = slot.as_mut()?;
        match transponder.tick(now) {
            Ok(outcome) => Some(outcome),
            Err(_) => {
                warn!("transponder tick failed");
                None
            }
        }
    })
}

/// Interrupt-safe "transfer in progress" flag.
///
/// Transport implementations call [`begin`](TransferFlag::begin) when they
/// start the DMA stream and [`complete`](TransferFlag::complete) from the
/// DMA transfer-complete interrupt. [`is_ready`](TransferFlag::is_ready) then
/// backs [`IrTransport::is_ready`].
pub struct TransferFlag {
    in_progress: Mutex<Cell<bool>>,
}

impl TransferFlag {
    /// A flag with no transfer in progress.
    pub const fn new() -> Self {
        Self {
            in_progress: Mutex::new(Cell::new(false)),
        }
    }

    /// Marks a transfer as started.
    pub fn begin(&self) {
        critical_section::with(|cs| self.in_progress.borrow(cs).set(true));
    }

    /// Marks the transfer as finished. Call from the DMA-complete interrupt.
    pub fn complete(&self) {
        critical_section::with(|cs| self.in_progress.borrow(cs).set(false));
    }

    /// Whether no transfer is in progress.
    pub fn is_ready(&self) -> bool {
        critical_section::with(|cs| !self.in_progress.borrow(cs).get())
    }

    /// `WouldBlock` while a transfer is in progress.
    pub fn poll<E>(&self) -> nb::Result<(), E> {
        if self.is_ready() {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl fmt::Debug for TransferFlag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransferFlag")
            .field("ready", &self.is_ready())
            .finish()
    }
}

impl Default for TransferFlag {
    fn default() -> Self {
        Self::new()
    }
}
