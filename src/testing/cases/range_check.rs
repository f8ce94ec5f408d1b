use crate::drivers::button_handler::Button;
use crate::testing::{Outcome, SelfTest, TestCaseState, TestInput};

/// Inclusive press-count window for one button. A count on either edge is
/// valid but borderline.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PressRange {
    pub min: u8,
    pub max: u8,
}

impl PressRange {
    pub const fn new(min: u8, max: u8) -> Self {
        Self { min, max }
    }

    pub fn contains(&self, count: u8) -> bool {
        (self.min..=self.max).contains(&count)
    }

    pub fn is_borderline(&self, count: u8) -> bool {
        count == self.min || count == self.max
    }
}

const RANGES: [(Button, PressRange); 3] = [
    (Button::A, PressRange::new(5, 7)),
    (Button::B, PressRange::new(7, 12)),
    (Button::C, PressRange::new(2, 4)),
];

/// Counts presses of A, B and C and checks the totals against fixed ranges.
pub struct RangeCheck {
    counts: [u8; 3],
}

impl RangeCheck {
    pub const fn new() -> Self {
        Self { counts: [0; 3] }
    }

    pub fn counts(&self) -> [u8; 3] {
        self.counts
    }
}

impl Default for RangeCheck {
    fn default() -> Self {
        Self::new()
    }
}

impl SelfTest for RangeCheck {
    fn name(&self) -> &'static str {
        "press count range"
    }

    fn init(&mut self, _now: u32) {
        self.counts = [0; 3];
    }

    fn update(&mut self, input: &TestInput<'_>) -> Option<TestCaseState> {
        for (count, (button, _)) in self.counts.iter_mut().zip(RANGES) {
            if input.button(button).take_press() {
                *count = count.saturating_add(1);
            }
        }
        None
    }

    fn evaluate(&self) -> Outcome {
        let mut any_valid = false;
        let mut borderline = false;
        for (&count, (_, range)) in self.counts.iter().zip(RANGES) {
            if range.contains(count) {
                any_valid = true;
                borderline |= range.is_borderline(count);
            }
        }

        match (any_valid, borderline) {
            (false, _) => Outcome::Fail,
            (true, true) => Outcome::Warning,
            (true, false) => Outcome::Pass,
        }
    }
}
