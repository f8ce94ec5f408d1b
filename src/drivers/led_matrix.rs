//! Column-multiplexed result display
//!
//! Five bicolour columns share one red and one green row driver. Each tick
//! lights exactly one column, so every column is on for one tick in five.
//! Per step the order is fixed: rows off, previous column off, rows for the
//! new column, new column on. Any other order ghosts the previous column's
//! colour onto the next.

use embedded_hal::digital::v2::OutputPin;

use crate::config::COLUMNS;
use crate::drivers::display::DisplayBuffer;
use crate::os::BlinkState;
use crate::testing::TestCaseState;

/// Which row drivers a column state lights right now.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct RowDrive {
    pub red: bool,
    pub green: bool,
}

pub fn row_drive(state: TestCaseState, blink: BlinkState) -> RowDrive {
    match state {
        TestCaseState::NoResult => RowDrive::default(),
        TestCaseState::Pass => RowDrive { red: false, green: true },
        TestCaseState::Fail => RowDrive { red: true, green: false },
        TestCaseState::InProgress => RowDrive {
            red: blink.slow,
            green: !blink.slow,
        },
        TestCaseState::Warning => RowDrive {
            red: blink.slow,
            green: false,
        },
        TestCaseState::Retry => RowDrive {
            red: blink.fast,
            green: false,
        },
    }
}

pub struct LedMatrix<C, R> {
    columns: [C; COLUMNS],
    red: R,
    green: R,
    current: usize,
    previous: Option<usize>,
}

impl<C, R, E> LedMatrix<C, R>
where
    C: OutputPin<Error = E>,
    R: OutputPin<Error = E>,
{
    /// Column pins select on `set_high`; row pins light on `set_high`.
    pub fn new(columns: [C; COLUMNS], red: R, green: R) -> Self {
        Self {
            columns,
            red,
            green,
            current: 0,
            previous: None,
        }
    }

    /// Column that the next `step` lights.
    pub fn current_column(&self) -> usize {
        self.current
    }

    /// One multiplexing step.
    pub fn step(&mut self, display: &DisplayBuffer, blink: BlinkState) -> Result<(), E> {
        self.red.set_low()?;
        self.green.set_low()?;

        if !display.is_published() {
            return self.blank();
        }

        if let Some(previous) = self.previous.and_then(|idx| self.columns.get_mut(idx)) {
            previous.set_low()?;
        }

        let column = self.current;
        if let Some(state) = display.column(column) {
            let drive = row_drive(state, blink);
            if drive.red {
                self.red.set_high()?;
            }
            if drive.green {
                self.green.set_high()?;
            }
            if let Some(select) = self.columns.get_mut(column) {
                select.set_high()?;
            }
        }

        self.previous = Some(column);
        self.current = (column + 1) % COLUMNS;
        Ok(())
    }

    /// Force every row and column off.
    pub fn blank(&mut self) -> Result<(), E> {
        self.red.set_low()?;
        self.green.set_low()?;
        for column in self.columns.iter_mut() {
            column.set_low()?;
        }
        self.previous = None;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};
    use TestCaseState::*;

    const SLOW: BlinkState = BlinkState { slow: true, fast: false };
    const FAST: BlinkState = BlinkState { slow: false, fast: true };
    const DARK: BlinkState = BlinkState { slow: false, fast: false };

    #[test]
    fn drive_table() {
        assert_eq!(row_drive(NoResult, SLOW), RowDrive { red: false, green: false });
        assert_eq!(row_drive(Pass, DARK), RowDrive { red: false, green: true });
        assert_eq!(row_drive(Fail, DARK), RowDrive { red: true, green: false });

        assert_eq!(row_drive(InProgress, SLOW), RowDrive { red: true, green: false });
        assert_eq!(row_drive(InProgress, DARK), RowDrive { red: false, green: true });

        assert_eq!(row_drive(Warning, SLOW), RowDrive { red: true, green: false });
        assert_eq!(row_drive(Warning, FAST), RowDrive { red: false, green: false });

        assert_eq!(row_drive(Retry, FAST), RowDrive { red: true, green: false });
        assert_eq!(row_drive(Retry, SLOW), RowDrive { red: false, green: false });
    }

    #[test]
    fn first_two_steps_per_pin() {
        let display = DisplayBuffer::new();
        display.init();
        display.publish(&[Pass, NoResult, NoResult, NoResult, NoResult]);

        let mut red = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
        ]);
        let mut green = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut col0 = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut col1 = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let idle: [PinMock; 3] = core::array::from_fn(|_| PinMock::new(&[]));
        let [c2, c3, c4] = idle;

        let mut matrix = LedMatrix::new(
            [col0.clone(), col1.clone(), c2, c3, c4],
            red.clone(),
            green.clone(),
        );
        matrix.step(&display, DARK).unwrap();
        matrix.step(&display, DARK).unwrap();
        assert_eq!(matrix.current_column(), 2);

        red.done();
        green.done();
        col0.done();
        col1.done();
    }

    #[test]
    fn unpublished_display_blanks_everything() {
        let display = DisplayBuffer::new();

        let mut red = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
        ]);
        let mut green = PinMock::new(&[
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::Low),
        ]);
        let mut columns: [PinMock; COLUMNS] =
            core::array::from_fn(|_| PinMock::new(&[PinTransaction::set(PinState::Low)]));

        let mut matrix = LedMatrix::new(columns.clone(), red.clone(), green.clone());
        matrix.step(&display, SLOW).unwrap();
        assert_eq!(matrix.current_column(), 0);

        red.done();
        green.done();
        for column in columns.iter_mut() {
            column.done();
        }
    }
}
