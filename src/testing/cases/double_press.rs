use crate::config::ms_to_ticks;
use crate::drivers::button_handler::Button;
use crate::os::elapsed;
use crate::testing::{Outcome, SelfTest, TestCaseState, TestInput};

const TARGET: Button = Button::B;
const MAX_PRESSES: usize = 4;
/// Gaps at or below this are contact bounce, not a second press.
pub const MIN_GAP_MS: u32 = 30;
/// Gaps at or above this are two separate presses.
pub const FAST_THRESHOLD_MS: u32 = 200;

/// Looks for two presses of B in quick succession.
pub struct FastDoublePress {
    presses: [u32; MAX_PRESSES],
    count: usize,
}

impl FastDoublePress {
    pub const fn new() -> Self {
        Self {
            presses: [0; MAX_PRESSES],
            count: 0,
        }
    }

    fn recorded(&self) -> &[u32] {
        &self.presses[..self.count]
    }
}

impl Default for FastDoublePress {
    fn default() -> Self {
        Self::new()
    }
}

impl SelfTest for FastDoublePress {
    fn name(&self) -> &'static str {
        "fast double press"
    }

    fn init(&mut self, _now: u32) {
        self.presses = [0; MAX_PRESSES];
        self.count = 0;
    }

    fn update(&mut self, input: &TestInput<'_>) -> Option<TestCaseState> {
        let button = input.button(TARGET);
        if button.take_press() && self.count < MAX_PRESSES {
            self.presses[self.count] = button.last_press();
            self.count += 1;
        }
        None
    }

    fn evaluate(&self) -> Outcome {
        let fast_pair = self.recorded().windows(2).any(|pair| {
            let gap = elapsed(pair[1], pair[0]);
            gap > ms_to_ticks(MIN_GAP_MS) && gap < ms_to_ticks(FAST_THRESHOLD_MS)
        });
        if fast_pair {
            Outcome::Pass
        } else {
            Outcome::Fail
        }
    }
}
