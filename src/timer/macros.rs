/// Declares a static global `TRANSPONDER` instance protected by a `critical_section` mutex.
///
/// This macro creates a `static` singleton `TRANSPONDER` suitable for use in
/// interrupt-based environments, where both the main loop and an ISR need
/// to safely access the controller.
///
/// # Arguments
/// - `$transport`: The concrete transport type (must implement `IrTransport`)
/// - `$power`: The concrete power sense type (must implement `PowerSense`)
///
/// # Example
/// ```rust,ignore
/// declare_transponder!(MyDmaTransport, AlwaysFullPower);
/// ```
#[macro_export]
macro_rules! declare_transponder {
    ( $transport:ty, $power:ty ) => {
        pub static TRANSPONDER: $crate::timer::GlobalTransponder<$transport, $power> =
            $crate::critical_section::Mutex::new(::core::cell::RefCell::new(None));
    };
}

/// Calls `tick()` on the global `TRANSPONDER` if it has been set up.
///
/// This macro is intended to be invoked from a periodic timer ISR or the
/// main loop with the current microsecond timestamp.
///
/// # Example
/// ```rust,ignore
/// #[interrupt]
/// fn TIM7() {
///     tick_transponder!(micros());
/// }
/// ```
///
/// # Notes
/// - This macro assumes `TRANSPONDER` was declared with `declare_transponder!`
///   and filled via `global_transponder_setup`.
/// - Safe to call repeatedly; does nothing if the transponder hasn't been set up yet.
#[macro_export]
macro_rules! tick_transponder {
    ( $now:expr ) => {
        $crate::critical_section::with(|cs| {
            if let Some(transponder) = TRANSPONDER.borrow(cs).borrow_mut().as_mut() {
                let _ = transponder.tick($now);
            }
        })
    };
}

#[cfg(test)]
mod tests {
    use crate::power::AlwaysFullPower;
    use crate::protocol::ProtocolVariant;
    use crate::timer::global_transponder_setup;
    use crate::transponder::Transponder;
    use crate::transport::mock::MockTransport;

    declare_transponder!(MockTransport, AlwaysFullPower);

    #[test]
    fn test_tick_macro() {
        tick_transponder!(0);

        let mut transponder = Transponder::new(MockTransport::new(), AlwaysFullPower);
        transponder
            .init(&[0; 9], ProtocolVariant::Arcitimer)
            .unwrap();
        transponder.enable();
        transponder.start_repeating();
        global_transponder_setup(&TRANSPONDER, transponder);

        tick_transponder!(0);
        tick_transponder!(1);

        critical_section::with(|cs| {
            let slot = TRANSPONDER.borrow(cs).borrow();
            // The second tick finds the transport busy.
            assert_eq!(slot.as_ref().unwrap().transport().transmits(), 1);
        });
    }
}
