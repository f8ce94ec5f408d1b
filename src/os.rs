//! System time and the state shared between the tick interrupt and the main loop
//!
//! Everything here lives in one `Shared` context. Each field documents which
//! side may write it. The target cannot load a 32-bit value in one
//! instruction, so tick-width values sit in `TickCell`s that copy under a
//! critical section; flags use native byte atomics.

use core::cell::Cell;
use core::convert::Infallible;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;

use crate::drivers::button_handler::ButtonBank;
use crate::drivers::display::DisplayBuffer;

/// Ticks elapsed from `since` to `now`, correct across counter wraparound.
#[inline]
pub fn elapsed(now: u32, since: u32) -> u32 {
    now.wrapping_sub(since)
}

/// A tick-width value written by one context and read by the other.
pub struct TickCell(Mutex<Cell<u32>>);

impl TickCell {
    pub const fn new(value: u32) -> Self {
        Self(Mutex::new(Cell::new(value)))
    }

    #[inline]
    pub fn get(&self) -> u32 {
        critical_section::with(|cs| self.0.borrow(cs).get())
    }

    #[inline]
    pub fn set(&self, value: u32) {
        critical_section::with(|cs| self.0.borrow(cs).set(value));
    }
}

/// Monotonic millisecond tick counter. Written only by the tick interrupt.
pub struct Clock {
    ticks: TickCell,
}

impl Clock {
    pub const fn new() -> Self {
        Self::with_ticks(0)
    }

    /// Start counting from `start` instead of zero.
    pub const fn with_ticks(start: u32) -> Self {
        Self {
            ticks: TickCell::new(start),
        }
    }

    /// Advance by one tick and return the new count.
    #[inline]
    pub fn advance(&self) -> u32 {
        critical_section::with(|cs| {
            let cell = self.ticks.0.borrow(cs);
            let next = cell.get().wrapping_add(1);
            cell.set(next);
            next
        })
    }

    #[inline]
    pub fn now(&self) -> u32 {
        self.ticks.get()
    }

    /// Non-blocking check whether `ticks` have passed since `since`.
    pub fn poll_elapsed(&self, since: u32, ticks: u32) -> nb::Result<(), Infallible> {
        if elapsed(self.now(), since) >= ticks {
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }

    /// Block for `ticks`, calling `idle` between checks.
    ///
    /// `idle` is expected to sleep until the next interrupt.
    pub fn wait_ticks<F: FnMut()>(&self, ticks: u32, mut idle: F) {
        let start = self.now();
        loop {
            match self.poll_elapsed(start, ticks) {
                Ok(()) => return,
                Err(nb::Error::WouldBlock) => idle(),
                Err(nb::Error::Other(never)) => match never {},
            }
        }
    }
}

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

/// The two blink flags. Toggled only by the tick interrupt.
pub struct BlinkFlags {
    slow: AtomicBool,
    fast: AtomicBool,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct BlinkState {
    pub slow: bool,
    pub fast: bool,
}

impl BlinkFlags {
    pub const fn new() -> Self {
        Self {
            slow: AtomicBool::new(false),
            fast: AtomicBool::new(false),
        }
    }

    #[inline]
    pub fn slow(&self) -> bool {
        self.slow.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn fast(&self) -> bool {
        self.fast.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn state(&self) -> BlinkState {
        BlinkState {
            slow: self.slow(),
            fast: self.fast(),
        }
    }

    pub(crate) fn toggle_slow(&self) {
        self.slow.store(!self.slow(), Ordering::Relaxed);
    }

    pub(crate) fn toggle_fast(&self) {
        self.fast.store(!self.fast(), Ordering::Relaxed);
    }
}

impl Default for BlinkFlags {
    fn default() -> Self {
        Self::new()
    }
}

/// Everything the tick interrupt and the main loop both touch.
pub struct Shared {
    /// Written by the interrupt.
    pub clock: Clock,
    /// Written by the interrupt.
    pub blink: BlinkFlags,
    /// Levels, counts and timestamps written by the interrupt; one-shot
    /// press flags cleared by the main loop.
    pub buttons: ButtonBank,
    /// Written by the main loop through `publish`, read by the interrupt.
    pub display: DisplayBuffer,
}

impl Shared {
    pub const fn new() -> Self {
        Self::with_clock(Clock::new())
    }

    pub const fn with_clock(clock: Clock) -> Self {
        Self {
            clock,
            blink: BlinkFlags::new(),
            buttons: ButtonBank::new(),
            display: DisplayBuffer::new(),
        }
    }
}

impl Default for Shared {
    fn default() -> Self {
        Self::new()
    }
}
