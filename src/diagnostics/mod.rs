//! Fatal fault capture
//!
//! Nothing in normal operation is an error: a failed self-test is a
//! result. What lands here is a stop condition: a panic, an interrupt
//! vector nobody owns, or a pin access that reported failure. The firmware
//! records the cause, stops interrupts and spins with the outputs frozen
//! so the fault is visible on the board and readable with a debugger.

use core::cell::Cell;

use critical_section::Mutex;
use ufmt::{uDebug, uWrite, Formatter};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum FaultCause {
    Panic = 0x01,
    UnexpectedInterrupt = 0x02,
    Gpio = 0x03,
}

impl FaultCause {
    pub fn name(self) -> &'static str {
        match self {
            FaultCause::Panic => "panic",
            FaultCause::UnexpectedInterrupt => "unexpected interrupt",
            FaultCause::Gpio => "gpio",
        }
    }
}

impl uDebug for FaultCause {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

/// What stopped the firmware. `detail` is cause specific: the panic line
/// number, or the tick at which a pin fault was seen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaultRecord {
    pub cause: FaultCause,
    pub detail: u32,
}

/// Slot for the first fault. Later faults raised while halting are ignored.
pub struct FaultLog {
    slot: Mutex<Cell<Option<FaultRecord>>>,
}

impl FaultLog {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Returns false if a fault was already recorded.
    pub fn record(&self, cause: FaultCause, detail: u32) -> bool {
        critical_section::with(|cs| {
            let slot = self.slot.borrow(cs);
            if slot.get().is_some() {
                return false;
            }
            slot.set(Some(FaultRecord { cause, detail }));
            true
        })
    }

    pub fn last(&self) -> Option<FaultRecord> {
        critical_section::with(|cs| self.slot.borrow(cs).get())
    }
}

impl Default for FaultLog {
    fn default() -> Self {
        Self::new()
    }
}

static FAULTS: FaultLog = FaultLog::new();

pub fn capture(cause: FaultCause, detail: u32) -> bool {
    FAULTS.record(cause, detail)
}

pub fn last_fault() -> Option<FaultRecord> {
    FAULTS.last()
}

/// Record the fault, stop interrupts and spin.
#[cfg(target_arch = "avr")]
pub fn halt(cause: FaultCause, detail: u32) -> ! {
    avr_device::interrupt::disable();
    capture(cause, detail);
    loop {
        core::sync::atomic::compiler_fence(core::sync::atomic::Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn first_fault_is_kept() {
        let log = FaultLog::new();
        assert_eq!(log.last(), None);

        assert!(log.record(FaultCause::Gpio, 1200));
        assert!(!log.record(FaultCause::Panic, 42));
        assert_eq!(
            log.last(),
            Some(FaultRecord {
                cause: FaultCause::Gpio,
                detail: 1200
            })
        );
    }

    #[test]
    fn global_log_captures() {
        capture(FaultCause::UnexpectedInterrupt, 0);
        assert!(last_fault().is_some());
    }

    #[test]
    fn cause_formats_with_ufmt() {
        let mut out = String::new();
        ufmt::uwrite!(out, "{:?}", FaultCause::UnexpectedInterrupt).unwrap();
        assert_eq!(out, "unexpected interrupt");
    }
}
