//! Fixed-rate tick work
//!
//! Everything the 1 ms interrupt does lives here. Per tick, in order:
//! advance the clock, sample the buttons, update the blink flags, step the
//! display scan. Button state is therefore fresh before the main loop wakes
//! on the same tick, and the scan never stalls.

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::config::{FAST_BLINK_TICKS, SLOW_BLINK_TICKS};
use crate::drivers::button_handler::ButtonHandler;
use crate::drivers::led_matrix::LedMatrix;
use crate::os::{elapsed, BlinkFlags, Shared};

/// A job that comes due every `period` ticks.
#[derive(Clone, Copy, Debug)]
pub struct Periodic {
    period: u32,
    next_run: u32,
}

impl Periodic {
    pub const fn new(period: u32) -> Self {
        Self { period, next_run: period }
    }

    /// Whether the job is due at `now`. Each call consumes at most one period.
    /// A job that fell more than a period behind restarts from `now`.
    pub fn poll(&mut self, now: u32) -> bool {
        // Due when `now` has reached `next_run`, measured wraparound-safe
        if elapsed(now, self.next_run) >= u32::MAX / 2 {
            return false;
        }
        let next_run = self.next_run.wrapping_add(self.period);
        self.next_run = if elapsed(now, next_run) < u32::MAX / 2 {
            now.wrapping_add(self.period)
        } else {
            next_run
        };
        true
    }

    pub fn reset(&mut self, now: u32) {
        self.next_run = now.wrapping_add(self.period);
    }
}

/// Toggles the slow and fast blink flags on their own periods.
pub struct BlinkScheduler {
    slow: Periodic,
    fast: Periodic,
}

impl BlinkScheduler {
    pub const fn new() -> Self {
        Self {
            slow: Periodic::new(SLOW_BLINK_TICKS),
            fast: Periodic::new(FAST_BLINK_TICKS),
        }
    }

    pub fn update(&mut self, flags: &BlinkFlags, now: u32) {
        if self.slow.poll(now) {
            flags.toggle_slow();
        }
        if self.fast.poll(now) {
            flags.toggle_fast();
        }
    }
}

impl Default for BlinkScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// The interrupt side of the firmware. Owns the button inputs, the
/// press-feedback LED and the display matrix pins.
pub struct TickHandler<I, F, C, R> {
    buttons: ButtonHandler<I, F>,
    matrix: LedMatrix<C, R>,
    blink: BlinkScheduler,
}

impl<I, F, C, R, E> TickHandler<I, F, C, R>
where
    I: InputPin<Error = E>,
    F: OutputPin<Error = E>,
    C: OutputPin<Error = E>,
    R: OutputPin<Error = E>,
{
    pub fn new(buttons: ButtonHandler<I, F>, matrix: LedMatrix<C, R>) -> Self {
        Self {
            buttons,
            matrix,
            blink: BlinkScheduler::new(),
        }
    }

    /// Blink periods count from `now` rather than from zero.
    pub fn with_start(mut self, now: u32) -> Self {
        self.blink.slow.reset(now);
        self.blink.fast.reset(now);
        self
    }

    pub fn on_tick(&mut self, shared: &Shared) -> Result<(), E> {
        let now = shared.clock.advance();
        self.buttons.poll(&shared.buttons, now)?;
        self.blink.update(&shared.blink, now);
        self.matrix.step(&shared.display, shared.blink.state())
    }
}
