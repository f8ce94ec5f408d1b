use crate::drivers::button_handler::Button;
use crate::testing::{Outcome, SelfTest, TestCaseState, TestInput};

const WATCHED: [Button; 3] = [Button::A, Button::B, Button::C];

/// Passes once A, B and C have each been seen held down, three of the four
/// buttons. Reads levels only and leaves the one-shot flags alone.
pub struct MajorityPress {
    seen: [bool; 3],
}

impl MajorityPress {
    pub const fn new() -> Self {
        Self { seen: [false; 3] }
    }
}

impl Default for MajorityPress {
    fn default() -> Self {
        Self::new()
    }
}

impl SelfTest for MajorityPress {
    fn name(&self) -> &'static str {
        "majority press"
    }

    fn init(&mut self, _now: u32) {
        self.seen = [false; 3];
    }

    fn update(&mut self, input: &TestInput<'_>) -> Option<TestCaseState> {
        for (seen, button) in self.seen.iter_mut().zip(WATCHED) {
            if input.button(button).is_pressed() {
                *seen = true;
            }
        }
        None
    }

    fn evaluate(&self) -> Outcome {
        if self.seen.iter().all(|&seen| seen) {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }
}
