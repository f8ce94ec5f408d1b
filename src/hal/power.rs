/// The main loop's only blocking call.
pub trait IdleWait {
    /// Sleep until any interrupt fires. Must wake on the tick interrupt.
    fn wait_for_interrupt(&mut self);
}

#[cfg(target_arch = "avr")]
pub use self::avr::Power;

#[cfg(target_arch = "avr")]
mod avr {
    use avr_device::atmega128a::CPU;

    use super::IdleWait;

    const SE: u8 = 1 << 5;
    const SM_MASK: u8 = 0b0001_1100;

    pub struct Power {
        cpu: CPU,
    }

    impl Power {
        pub fn new(cpu: CPU) -> Self {
            Self { cpu }
        }

        /// Idle sleep keeps the timers running, so the tick still wakes us.
        pub fn enter_idle_mode(&mut self) {
            self.cpu
                .mcucr
                .modify(|r, w| unsafe { w.bits((r.bits() & !SM_MASK) | SE) });
            avr_device::asm::sleep();
            self.cpu.mcucr.modify(|r, w| unsafe { w.bits(r.bits() & !SE) });
        }
    }

    impl IdleWait for Power {
        fn wait_for_interrupt(&mut self) {
            self.enter_idle_mode();
        }
    }
}
