use crate::drivers::button_handler::Button;
use crate::testing::{Outcome, SelfTest, TestCaseState, TestInput};

const TOGGLES: [Button; 3] = [Button::A, Button::B, Button::C];

/// Each press of A, B or C flips that button's latch; the final latches
/// index a fixed decision table.
pub struct DecisionTable {
    latches: [bool; 3],
}

/// Verdicts indexed by `A << 2 | B << 1 | C`.
const TABLE: [Outcome; 8] = [
    Outcome::Fail,    // 000
    Outcome::Warning, // 001
    Outcome::Warning, // 010
    Outcome::Pass,    // 011
    Outcome::Fail,    // 100
    Outcome::Warning, // 101
    Outcome::Warning, // 110
    Outcome::Warning, // 111
];

impl DecisionTable {
    pub const fn new() -> Self {
        Self { latches: [false; 3] }
    }

    pub fn latches(&self) -> [bool; 3] {
        self.latches
    }
}

impl Default for DecisionTable {
    fn default() -> Self {
        Self::new()
    }
}

impl SelfTest for DecisionTable {
    fn name(&self) -> &'static str {
        "toggle decision table"
    }

    fn init(&mut self, _now: u32) {
        self.latches = [false; 3];
    }

    fn update(&mut self, input: &TestInput<'_>) -> Option<TestCaseState> {
        for (latch, button) in self.latches.iter_mut().zip(TOGGLES) {
            if input.button(button).take_press() {
                *latch = !*latch;
            }
        }
        None
    }

    fn evaluate(&self) -> Outcome {
        let [a, b, c] = self.latches;
        let index = (usize::from(a) << 2) | (usize::from(b) << 1) | usize::from(c);
        TABLE[index]
    }
}
