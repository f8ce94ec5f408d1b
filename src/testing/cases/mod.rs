//! The fixed self-test table, one case per display column.

mod decision_table;
mod double_press;
mod majority;
mod range_check;
mod unlock;

pub use decision_table::DecisionTable;
pub use double_press::FastDoublePress;
pub use majority::MajorityPress;
pub use range_check::{PressRange, RangeCheck};
pub use unlock::SequenceUnlock;

use super::{Outcome, SelfTest, TestCaseState, TestInput};

pub enum SelfTestCase {
    Majority(MajorityPress),
    DoublePress(FastDoublePress),
    DecisionTable(DecisionTable),
    RangeCheck(RangeCheck),
    Unlock(SequenceUnlock),
}

impl SelfTestCase {
    /// The five cases in column order.
    pub const fn table() -> [SelfTestCase; 5] {
        [
            SelfTestCase::Majority(MajorityPress::new()),
            SelfTestCase::DoublePress(FastDoublePress::new()),
            SelfTestCase::DecisionTable(DecisionTable::new()),
            SelfTestCase::RangeCheck(RangeCheck::new()),
            SelfTestCase::Unlock(SequenceUnlock::new()),
        ]
    }

    fn as_test(&self) -> &dyn SelfTest {
        match self {
            SelfTestCase::Majority(t) => t,
            SelfTestCase::DoublePress(t) => t,
            SelfTestCase::DecisionTable(t) => t,
            SelfTestCase::RangeCheck(t) => t,
            SelfTestCase::Unlock(t) => t,
        }
    }

    fn as_test_mut(&mut self) -> &mut dyn SelfTest {
        match self {
            SelfTestCase::Majority(t) => t,
            SelfTestCase::DoublePress(t) => t,
            SelfTestCase::DecisionTable(t) => t,
            SelfTestCase::RangeCheck(t) => t,
            SelfTestCase::Unlock(t) => t,
        }
    }
}

impl SelfTest for SelfTestCase {
    fn name(&self) -> &'static str {
        self.as_test().name()
    }

    fn duration_ms(&self) -> u32 {
        self.as_test().duration_ms()
    }

    fn init(&mut self, now: u32) {
        self.as_test_mut().init(now)
    }

    fn update(&mut self, input: &TestInput<'_>) -> Option<TestCaseState> {
        self.as_test_mut().update(input)
    }

    fn evaluate(&self) -> Outcome {
        self.as_test().evaluate()
    }
}
