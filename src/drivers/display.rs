//! Double-buffered result display state
//!
//! The main loop fills the inactive buffer with interrupts enabled, then
//! flips the active index inside a critical section. The scan engine only
//! ever reads through the active index, so it never sees a half-written
//! snapshot.

use core::sync::atomic::{AtomicU8, Ordering};

use crate::config::COLUMNS;
use crate::testing::TestCaseState;

const UNPUBLISHED: u8 = u8::MAX;

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_SLOT: AtomicU8 = AtomicU8::new(TestCaseState::NoResult as u8);

#[allow(clippy::declare_interior_mutable_const)]
const EMPTY_BUFFER: [AtomicU8; COLUMNS] = [EMPTY_SLOT; COLUMNS];

pub struct DisplayBuffer {
    buffers: [[AtomicU8; COLUMNS]; 2],
    active: AtomicU8,
}

impl DisplayBuffer {
    /// A buffer with no published snapshot. `init` must run before the tick
    /// source is armed.
    pub const fn new() -> Self {
        Self {
            buffers: [EMPTY_BUFFER, EMPTY_BUFFER],
            active: AtomicU8::new(UNPUBLISHED),
        }
    }

    /// Clear both buffers to `NoResult` and make buffer 0 active.
    pub fn init(&self) {
        for buffer in &self.buffers {
            for slot in buffer {
                slot.store(TestCaseState::NoResult as u8, Ordering::Relaxed);
            }
        }
        critical_section::with(|_| self.active.store(0, Ordering::Release));
    }

    pub fn is_published(&self) -> bool {
        self.active_index().is_some()
    }

    /// Publish a complete snapshot.
    pub fn publish(&self, states: &[TestCaseState; COLUMNS]) {
        let target = match self.active_index() {
            Some(0) => 1,
            _ => 0,
        };
        for (slot, state) in self.buffers[target].iter().zip(states) {
            slot.store(*state as u8, Ordering::Relaxed);
        }
        critical_section::with(|_| self.active.store(target as u8, Ordering::Release));
    }

    /// The value one column should show, or `None` when nothing valid has
    /// been published or the column is out of range.
    pub fn column(&self, column: usize) -> Option<TestCaseState> {
        let index = self.active_index()?;
        let raw = self.buffers[index].get(column)?.load(Ordering::Relaxed);
        Some(TestCaseState::from_raw(raw).unwrap_or(TestCaseState::NoResult))
    }

    /// Copy of the active snapshot.
    pub fn active_states(&self) -> Option<[TestCaseState; COLUMNS]> {
        let index = self.active_index()?;
        let mut states = [TestCaseState::NoResult; COLUMNS];
        for (state, slot) in states.iter_mut().zip(&self.buffers[index]) {
            *state = TestCaseState::from_raw(slot.load(Ordering::Relaxed))
                .unwrap_or(TestCaseState::NoResult);
        }
        Some(states)
    }

    fn active_index(&self) -> Option<usize> {
        match self.active.load(Ordering::Acquire) {
            index @ (0 | 1) => Some(index as usize),
            _ => None,
        }
    }
}

impl Default for DisplayBuffer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TestCaseState::*;

    #[test]
    fn nothing_visible_before_init() {
        let display = DisplayBuffer::new();
        assert!(!display.is_published());
        assert_eq!(display.column(0), None);
        assert_eq!(display.active_states(), None);
    }

    #[test]
    fn init_publishes_blank_snapshot() {
        let display = DisplayBuffer::new();
        display.init();
        assert_eq!(display.active_states(), Some([NoResult; COLUMNS]));
    }

    #[test]
    fn publish_flips_between_buffers() {
        let display = DisplayBuffer::new();
        display.init();

        let first = [Pass, Fail, Warning, InProgress, Retry];
        display.publish(&first);
        assert_eq!(display.active_index(), Some(1));
        assert_eq!(display.active_states(), Some(first));

        let second = [Fail; COLUMNS];
        display.publish(&second);
        assert_eq!(display.active_index(), Some(0));
        assert_eq!(display.active_states(), Some(second));
        assert_eq!(display.column(2), Some(Fail));
    }

    #[test]
    fn publish_never_touches_the_active_buffer() {
        let display = DisplayBuffer::new();
        display.init();
        let snapshot = [Pass, Pass, Fail, Fail, Retry];
        display.publish(&snapshot);

        let active = display.active_index().unwrap();
        let before: [u8; COLUMNS] =
            core::array::from_fn(|i| display.buffers[active][i].load(Ordering::Relaxed));
        display.publish(&[Warning; COLUMNS]);
        let after: [u8; COLUMNS] =
            core::array::from_fn(|i| display.buffers[active][i].load(Ordering::Relaxed));
        assert_eq!(before, after);
    }

    #[test]
    fn out_of_range_column_reads_nothing() {
        let display = DisplayBuffer::new();
        display.init();
        assert_eq!(display.column(COLUMNS), None);
    }

    #[test]
    fn publish_before_init_still_yields_complete_snapshot() {
        let display = DisplayBuffer::new();
        let snapshot = [Retry; COLUMNS];
        display.publish(&snapshot);
        assert_eq!(display.active_states(), Some(snapshot));
    }
}
