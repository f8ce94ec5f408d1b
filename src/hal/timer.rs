/// A source of the periodic system tick.
pub trait TickTimer {
    /// Start firing the tick interrupt every `TICK_PERIOD_MS`.
    fn arm_periodic(&mut self);
}

#[cfg(target_arch = "avr")]
pub use self::avr::Timer0;

#[cfg(target_arch = "avr")]
mod avr {
    use avr_device::atmega128a::TC0;

    use super::TickTimer;
    use crate::config::{CPU_FREQ_HZ, TICK_PERIOD_MS};

    const PRESCALER: u32 = 64;
    // 16 MHz / 64 / 250 = 1 kHz
    const COMPARE: u8 = (CPU_FREQ_HZ / PRESCALER / 1000 * TICK_PERIOD_MS - 1) as u8;

    const WGM01: u8 = 1 << 3;
    // Timer0 on this part has its own prescaler table: 0b100 is clk/64
    const CS_DIV64: u8 = 0b100;
    const OCIE0: u8 = 1 << 1;

    /// Timer0 in clear-on-compare mode, firing `TIMER0_COMP`.
    pub struct Timer0 {
        tc0: TC0,
    }

    impl Timer0 {
        pub fn new(tc0: TC0) -> Self {
            tc0.tccr0.write(|w| unsafe { w.bits(0) });
            tc0.tcnt0.write(|w| unsafe { w.bits(0) });
            Self { tc0 }
        }
    }

    impl TickTimer for Timer0 {
        fn arm_periodic(&mut self) {
            self.tc0.ocr0.write(|w| unsafe { w.bits(COMPARE) });
            self.tc0.timsk.modify(|r, w| unsafe { w.bits(r.bits() | OCIE0) });
            self.tc0.tccr0.write(|w| unsafe { w.bits(WGM01 | CS_DIV64) });
        }
    }
}
