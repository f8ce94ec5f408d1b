//! Self-test framework: result states, the `SelfTest` trait and the
//! sequencer that runs the fixed test table one case at a time.

pub mod cases;
pub mod sequencer;

pub use cases::SelfTestCase;
pub use sequencer::{Completion, TestSequencer};

use ufmt::{uDebug, uWrite, Formatter};

use crate::config::TEST_DURATION_MS;
use crate::drivers::button_handler::{Button, ButtonBank, ButtonState};

/// What one display column shows.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
#[repr(u8)]
pub enum TestCaseState {
    #[default]
    NoResult = 0,
    Pass = 1,
    Fail = 2,
    Warning = 3,
    InProgress = 4,
    Retry = 5,
}

impl TestCaseState {
    pub fn from_raw(raw: u8) -> Option<Self> {
        match raw {
            0 => Some(Self::NoResult),
            1 => Some(Self::Pass),
            2 => Some(Self::Fail),
            3 => Some(Self::Warning),
            4 => Some(Self::InProgress),
            5 => Some(Self::Retry),
            _ => None,
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            Self::NoResult => "NO_RESULT",
            Self::Pass => "PASS",
            Self::Fail => "FAIL",
            Self::Warning => "WARNING",
            Self::InProgress => "IN_PROGRESS",
            Self::Retry => "RETRY",
        }
    }
}

impl uDebug for TestCaseState {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.name())
    }
}

/// Final verdict of a self-test. `NoResult` and `InProgress` are display-only
/// states and can never be a verdict.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Outcome {
    Pass,
    Fail,
    Warning,
    Retry,
}

impl From<Outcome> for TestCaseState {
    fn from(outcome: Outcome) -> Self {
        match outcome {
            Outcome::Pass => TestCaseState::Pass,
            Outcome::Fail => TestCaseState::Fail,
            Outcome::Warning => TestCaseState::Warning,
            Outcome::Retry => TestCaseState::Retry,
        }
    }
}

impl uDebug for Outcome {
    fn fmt<W>(&self, f: &mut Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(TestCaseState::from(*self).name())
    }
}

/// What a running test sees on each main-loop iteration.
#[derive(Clone, Copy)]
pub struct TestInput<'a> {
    pub now: u32,
    pub buttons: &'a ButtonBank,
}

impl<'a> TestInput<'a> {
    pub fn new(now: u32, buttons: &'a ButtonBank) -> Self {
        Self { now, buttons }
    }

    #[inline]
    pub fn button(&self, button: Button) -> &'a ButtonState {
        self.buttons.get(button)
    }
}

/// One timed self-test routine.
///
/// `update` may return an interim display state that the sequencer stores and
/// publishes straight away.
pub trait SelfTest {
    fn name(&self) -> &'static str;

    fn duration_ms(&self) -> u32 {
        TEST_DURATION_MS
    }

    fn init(&mut self, now: u32);

    fn update(&mut self, input: &TestInput<'_>) -> Option<TestCaseState>;

    fn evaluate(&self) -> Outcome;
}
