//! Timed sequence unlock with a retry budget
//!
//! Five presses of A, B or C are compared with a fixed code. A wrong code
//! burns one attempt and opens a recovery window; pressing C twice in a row
//! inside the window acknowledges the miss and re-arms entry. Letting the
//! window lapse fails the test, as does running out of attempts. A window
//! still open when the run ends counts as lapsed.

use crate::config::{ms_to_ticks, RECOVERY_WINDOW_MS, UNLOCK_MAX_ATTEMPTS};
use crate::drivers::button_handler::Button;
use crate::os::elapsed;
use crate::testing::{Outcome, SelfTest, TestCaseState, TestInput};

const CODE_LEN: usize = 5;
const KEYS: [Button; 3] = [Button::A, Button::B, Button::C];
const CODE: [Button; CODE_LEN] = [Button::A, Button::B, Button::C, Button::B, Button::A];
const ACK_KEY: Button = Button::C;

pub struct SequenceUnlock {
    entered: [Button; CODE_LEN],
    count: usize,
    attempts: u8,
    /// Tick at which the recovery window opened.
    recovery: Option<u32>,
    ack_armed: bool,
    state: TestCaseState,
}

impl SequenceUnlock {
    pub const fn new() -> Self {
        Self {
            entered: [Button::A; CODE_LEN],
            count: 0,
            attempts: 0,
            recovery: None,
            ack_armed: false,
            state: TestCaseState::InProgress,
        }
    }

    pub fn attempts(&self) -> u8 {
        self.attempts
    }

    pub fn in_recovery(&self) -> bool {
        self.recovery.is_some()
    }

    fn recover(&mut self, key: Button) -> Option<TestCaseState> {
        if key != ACK_KEY {
            self.ack_armed = false;
            return None;
        }
        if !self.ack_armed {
            self.ack_armed = true;
            return None;
        }

        self.recovery = None;
        self.ack_armed = false;
        self.count = 0;
        self.state = TestCaseState::InProgress;
        Some(self.state)
    }

    fn enter(&mut self, key: Button, now: u32) -> Option<TestCaseState> {
        if self.count >= CODE_LEN {
            return None;
        }
        self.entered[self.count] = key;
        self.count += 1;
        if self.count < CODE_LEN {
            return None;
        }

        self.state = if self.entered == CODE {
            TestCaseState::Pass
        } else {
            self.attempts = self.attempts.saturating_add(1);
            if self.attempts >= UNLOCK_MAX_ATTEMPTS {
                TestCaseState::Fail
            } else {
                self.recovery = Some(now);
                self.ack_armed = false;
                TestCaseState::Retry
            }
        };
        Some(self.state)
    }
}

impl Default for SequenceUnlock {
    fn default() -> Self {
        Self::new()
    }
}

impl SelfTest for SequenceUnlock {
    fn name(&self) -> &'static str {
        "sequence unlock"
    }

    fn init(&mut self, _now: u32) {
        *self = Self::new();
    }

    fn update(&mut self, input: &TestInput<'_>) -> Option<TestCaseState> {
        if let Some(opened) = self.recovery {
            if elapsed(input.now, opened) >= ms_to_ticks(RECOVERY_WINDOW_MS) {
                self.attempts = self.attempts.saturating_add(1);
                self.recovery = None;
                self.state = TestCaseState::Fail;
                return Some(self.state);
            }
        }

        let mut interim = None;
        for key in KEYS {
            if !input.button(key).take_press() {
                continue;
            }
            let change = if self.in_recovery() {
                self.recover(key)
            } else {
                self.enter(key, input.now)
            };
            interim = change.or(interim);
        }
        interim
    }

    fn evaluate(&self) -> Outcome {
        if self.in_recovery() {
            return Outcome::Fail;
        }
        match self.state {
            TestCaseState::Pass => Outcome::Pass,
            TestCaseState::Warning => Outcome::Warning,
            _ => Outcome::Fail,
        }
    }
}
