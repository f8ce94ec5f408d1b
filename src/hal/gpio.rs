//! Pin polarity and the AVR port pins

use embedded_hal::digital::v2::{InputPin, OutputPin};

/// Inverts a pin so the engines can treat `set_high` as "lit" and `is_high`
/// as "pressed" whatever the board wiring.
#[derive(Debug)]
pub struct ActiveLow<P> {
    pin: P,
}

impl<P> ActiveLow<P> {
    pub const fn new(pin: P) -> Self {
        Self { pin }
    }
}

impl<P: OutputPin> OutputPin for ActiveLow<P> {
    type Error = P::Error;

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.pin.set_low()
    }

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.pin.set_high()
    }
}

impl<P: InputPin> InputPin for ActiveLow<P> {
    type Error = P::Error;

    #[inline]
    fn is_high(&self) -> Result<bool, Self::Error> {
        self.pin.is_low()
    }

    #[inline]
    fn is_low(&self) -> Result<bool, Self::Error> {
        self.pin.is_high()
    }
}

#[cfg(target_arch = "avr")]
pub use self::port::{Input, Output, Pin};

#[cfg(target_arch = "avr")]
mod port {
    use avr_device::atmega128a::{PORTA, PORTB, PORTC, PORTD, PORTE};
    use core::convert::Infallible;
    use core::marker::PhantomData;
    use embedded_hal::digital::v2::{InputPin, OutputPin};

    pub struct Input;
    pub struct Output;

    /// One bit of an I/O port. Several pins of the same port share a type, so
    /// a row of columns fits in one array.
    pub struct Pin<PORT, MODE> {
        mask: u8,
        _marker: PhantomData<(PORT, MODE)>,
    }

    macro_rules! impl_port {
        ($PORT:ident, $pin:ident, $ddr:ident, $port:ident) => {
            impl Pin<$PORT, Input> {
                /// Claim bit `bit` of the port. Pins start out as floating
                /// inputs, which is the reset state.
                pub fn new(bit: u8) -> Self {
                    Pin {
                        mask: 1 << bit,
                        _marker: PhantomData,
                    }
                }
            }

            impl<MODE> Pin<$PORT, MODE> {
                pub fn into_output(self) -> Pin<$PORT, Output> {
                    unsafe {
                        (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() | self.mask));
                    }
                    Pin {
                        mask: self.mask,
                        _marker: PhantomData,
                    }
                }

                /// Output that starts at the high level, so active-low loads
                /// stay dark while the pin is switched.
                pub fn into_output_high(self) -> Pin<$PORT, Output> {
                    unsafe {
                        (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | self.mask));
                    }
                    self.into_output()
                }

                pub fn into_pull_up_input(self) -> Pin<$PORT, Input> {
                    unsafe {
                        (*$PORT::ptr()).$ddr.modify(|r, w| w.bits(r.bits() & !self.mask));
                        (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | self.mask));
                    }
                    Pin {
                        mask: self.mask,
                        _marker: PhantomData,
                    }
                }
            }

            impl OutputPin for Pin<$PORT, Output> {
                type Error = Infallible;

                #[inline]
                fn set_high(&mut self) -> Result<(), Infallible> {
                    unsafe {
                        (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() | self.mask));
                    }
                    Ok(())
                }

                #[inline]
                fn set_low(&mut self) -> Result<(), Infallible> {
                    unsafe {
                        (*$PORT::ptr()).$port.modify(|r, w| w.bits(r.bits() & !self.mask));
                    }
                    Ok(())
                }
            }

            impl InputPin for Pin<$PORT, Input> {
                type Error = Infallible;

                #[inline]
                fn is_high(&self) -> Result<bool, Infallible> {
                    Ok(unsafe { (*$PORT::ptr()).$pin.read().bits() } & self.mask != 0)
                }

                #[inline]
                fn is_low(&self) -> Result<bool, Infallible> {
                    self.is_high().map(|high| !high)
                }
            }
        };
    }

    impl_port!(PORTA, pina, ddra, porta);
    impl_port!(PORTB, pinb, ddrb, portb);
    impl_port!(PORTC, pinc, ddrc, portc);
    impl_port!(PORTD, pind, ddrd, portd);
    impl_port!(PORTE, pine, ddre, porte);
}
