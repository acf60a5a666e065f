//! # transponder-ir
//!
//! A portable, no_std Rust driver core for infrared race-timing transponders,
//! compatible with I-Lap and aRCiTimer lap counters.
//!
//! The crate turns a vehicle identifier into the pulse buffer a timer/DMA
//! peripheral replays on the IR emitter, and decides when to replay it:
//! - on-off-keyed pulse encoding for both protocol variants
//! - a transmission controller with enable and repeat gates
//! - a repeat scheduler with collision-avoidance jitter and a low-power cadence
//! - interrupt-safe shared state with `critical-section`
//!
//! ## Crate features
//! | Feature               | Description |
//! |-----------------------|-------------|
//! | `std`                 | Disables `#![no_std]` support |
//! | `delay-loop`          | Blocking poll loop over `embedded_hal::delay::DelayNs` |
//! | `timer-isr` (default) | Global instance helpers and DMA-complete flag using `critical_section::with` |
//! | `defmt`               | Uses `defmt` logging |
//! | `log`                 | Uses `log` logging |
//!
//! ## Usage
//!
//! ```rust,ignore
//! use transponder_ir::config::TransponderConfig;
//! use transponder_ir::power::CableSense;
//! use transponder_ir::transponder::Transponder;
//!
//! let mut transponder = Transponder::new(dma_transport, CableSense::new(vbus_pin, None));
//! transponder.init_from_config(&TransponderConfig::default())?;
//! transponder.enable();
//! transponder.start_repeating();
//! loop {
//!     transponder.tick(micros())?; // Poll at least every few hundred µs
//! }
//! ```
//!
//! Or, use `run_transponder_loop()` with a `DelayNs` implementation:
//!
//! ```rust,ignore
//! transponder_ir::timer::run_transponder_loop(&mut transponder, &mut clock, &mut delay, 250);
//! ```
//!
//! ## Integration Notes
//!
//! - The hardware transport (timer, DMA, output pin) is supplied by the platform
//!   through [`transport::IrTransport`]
//! - Only one transmission is in flight at a time; the controller polls the
//!   transport's readiness before every trigger
//! - Timestamps are a wrapping 32-bit microsecond counter
//!
//! --
//! Designed for `#![no_std]` use in resource-constrained embedded environments.

#![deny(
    bad_style,
    dead_code,
    improper_ctypes,
    non_shorthand_field_patterns,
    no_mangle_generic_items,
    overflowing_literals,
    path_statements,
    patterns_in_fns_without_body,
    unconditional_recursion,
    unused,
    while_true,
    missing_debug_implementations,
    missing_docs,
    trivial_casts,
    trivial_numeric_casts,
    unused_extern_crates,
    unused_import_braces,
    unused_qualifications,
    unused_results
)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(feature = "timer-isr")]
pub use critical_section;

pub use heapless;

#[macro_use]
mod fmt;

pub mod config;
pub mod consts;
pub mod encoding;
pub mod error;
pub mod power;
pub mod protocol;
pub mod scheduler;
pub mod timer;
pub mod transponder;
pub mod transport;
