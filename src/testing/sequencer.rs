use crate::config::{ms_to_ticks, COLUMNS};
use crate::drivers::display::DisplayBuffer;
use crate::os::elapsed;

use super::{Outcome, SelfTest, SelfTestCase, TestCaseState, TestInput};

/// A test that ran to the end of its window.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Completion {
    pub index: usize,
    pub name: &'static str,
    pub outcome: Outcome,
}

/// Runs the test table one case at a time from the main loop and owns the
/// result row shown on the display.
pub struct TestSequencer {
    cases: [SelfTestCase; COLUMNS],
    results: [TestCaseState; COLUMNS],
    current: usize,
    active: bool,
    started_at: u32,
}

impl TestSequencer {
    pub const fn new() -> Self {
        Self {
            cases: SelfTestCase::table(),
            results: [TestCaseState::NoResult; COLUMNS],
            current: 0,
            active: false,
            started_at: 0,
        }
    }

    #[inline]
    pub fn is_active(&self) -> bool {
        self.active
    }

    /// Index of the running test, or of the one that starts next.
    #[inline]
    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn results(&self) -> &[TestCaseState; COLUMNS] {
        &self.results
    }

    /// Every column holds a PASS.
    pub fn all_passed(&self) -> bool {
        self.results.iter().all(|&state| state == TestCaseState::Pass)
    }

    pub fn case_name(&self, index: usize) -> Option<&'static str> {
        self.cases.get(index).map(SelfTest::name)
    }

    /// Start test `index`. Starting test 0 begins a new sweep and clears
    /// every stored result. Returns false for an index outside the table.
    pub fn start(&mut self, index: usize, now: u32, display: &DisplayBuffer) -> bool {
        let Some(case) = self.cases.get_mut(index) else {
            return false;
        };

        if index == 0 {
            self.results = [TestCaseState::NoResult; COLUMNS];
        }
        self.current = index;
        self.started_at = now;
        self.active = true;
        self.results[index] = TestCaseState::InProgress;
        display.publish(&self.results);
        case.init(now);
        true
    }

    /// One main-loop iteration of the running test.
    ///
    /// Interim states the test reports are published at once. When the test's
    /// window has elapsed its verdict is stored and published, the sequencer
    /// goes idle and moves on to the next index.
    pub fn monitor(&mut self, input: &TestInput<'_>, display: &DisplayBuffer) -> Option<Completion> {
        if !self.active {
            return None;
        }
        let index = self.current;
        let case = self.cases.get_mut(index)?;

        if let Some(interim) = case.update(input) {
            self.results[index] = interim;
            display.publish(&self.results);
        }

        if elapsed(input.now, self.started_at) < ms_to_ticks(case.duration_ms()) {
            return None;
        }

        let outcome = case.evaluate();
        self.results[index] = outcome.into();
        display.publish(&self.results);
        self.active = false;
        self.current = (index + 1) % COLUMNS;

        Some(Completion {
            index,
            name: case.name(),
            outcome,
        })
    }
}

impl Default for TestSequencer {
    fn default() -> Self {
        Self::new()
    }
}
