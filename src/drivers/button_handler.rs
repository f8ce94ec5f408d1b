use core::cell::Cell;
use core::sync::atomic::{AtomicBool, Ordering};

use critical_section::Mutex;

use embedded_hal::digital::v2::{InputPin, OutputPin};

use crate::config::{BUTTONS, PRESS_PULSE_TICKS};
use crate::os::{elapsed, TickCell};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Button {
    A,
    B,
    C,
    D,
}

impl Button {
    pub const ALL: [Button; BUTTONS] = [Button::A, Button::B, Button::C, Button::D];

    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Debounced level and press bookkeeping for one button.
///
/// The tick interrupt writes every field. The main loop reads them and clears
/// the one-shot press flag through `take_press`.
pub struct ButtonState {
    pressed: AtomicBool,
    just_pressed: AtomicBool,
    press_count: Mutex<Cell<u16>>,
    last_press: TickCell,
    last_release: TickCell,
}

impl ButtonState {
    pub const fn new() -> Self {
        Self {
            pressed: AtomicBool::new(false),
            just_pressed: AtomicBool::new(false),
            press_count: Mutex::new(Cell::new(0)),
            last_press: TickCell::new(0),
            last_release: TickCell::new(0),
        }
    }

    #[inline]
    pub fn is_pressed(&self) -> bool {
        self.pressed.load(Ordering::Relaxed)
    }

    /// Look at the one-shot press flag without consuming it.
    #[inline]
    pub fn is_just_pressed(&self) -> bool {
        self.just_pressed.load(Ordering::Relaxed)
    }

    /// Consume the one-shot press flag.
    ///
    /// This is a plain load followed by a store, not a queue. A press that
    /// lands between the two is lost, and two readers that both look before
    /// either clears will both see the same press. Each self-test is the
    /// single consumer of the buttons it reads.
    pub fn take_press(&self) -> bool {
        if self.just_pressed.load(Ordering::Relaxed) {
            self.just_pressed.store(false, Ordering::Relaxed);
            true
        } else {
            false
        }
    }

    #[inline]
    pub fn press_count(&self) -> u16 {
        critical_section::with(|cs| self.press_count.borrow(cs).get())
    }

    #[inline]
    pub fn last_press(&self) -> u32 {
        self.last_press.get()
    }

    #[inline]
    pub fn last_release(&self) -> u32 {
        self.last_release.get()
    }

    pub(crate) fn record_press(&self, now: u32) {
        self.pressed.store(true, Ordering::Relaxed);
        self.last_press.set(now);
        critical_section::with(|cs| {
            let count = self.press_count.borrow(cs);
            count.set(count.get().wrapping_add(1));
        });
        self.just_pressed.store(true, Ordering::Relaxed);
    }

    pub(crate) fn record_release(&self, now: u32) {
        self.pressed.store(false, Ordering::Relaxed);
        self.last_release.set(now);
    }
}

impl Default for ButtonState {
    fn default() -> Self {
        Self::new()
    }
}

pub struct ButtonBank {
    states: [ButtonState; BUTTONS],
}

impl ButtonBank {
    pub const fn new() -> Self {
        Self {
            states: [
                ButtonState::new(),
                ButtonState::new(),
                ButtonState::new(),
                ButtonState::new(),
            ],
        }
    }

    #[inline]
    pub fn get(&self, button: Button) -> &ButtonState {
        &self.states[button.index()]
    }

    pub fn iter(&self) -> impl Iterator<Item = (Button, &ButtonState)> {
        Button::ALL.into_iter().zip(self.states.iter())
    }
}

impl Default for ButtonBank {
    fn default() -> Self {
        Self::new()
    }
}

/// Samples the buttons once per tick and turns level changes into press and
/// release events.
///
/// There is no filtering beyond comparing each sample with the previous one:
/// a bouncing contact produces several presses. Tests that care about bounce
/// reject short gaps themselves.
pub struct ButtonHandler<I, F> {
    inputs: [I; BUTTONS],
    feedback: F,
    previous: Option<u8>,
    pulse_started: Option<u32>,
}

impl<I, F, E> ButtonHandler<I, F>
where
    I: InputPin<Error = E>,
    F: OutputPin<Error = E>,
{
    /// `inputs` read high while pressed; `feedback` lights on `set_high`.
    pub fn new(inputs: [I; BUTTONS], feedback: F) -> Self {
        Self {
            inputs,
            feedback,
            previous: None,
            pulse_started: None,
        }
    }

    /// Read all inputs into a bitset, bit n set while button n is pressed.
    pub fn sample(&self) -> Result<u8, E> {
        let mut bits = 0u8;
        for (idx, input) in self.inputs.iter().enumerate() {
            if input.is_high()? {
                bits |= 1 << idx;
            }
        }
        Ok(bits)
    }

    pub fn poll(&mut self, bank: &ButtonBank, now: u32) -> Result<(), E> {
        let sample = self.sample()?;
        self.apply(sample, bank, now)
    }

    /// Fold one sample into `bank`. The first sample only seeds the edge
    /// detector, so a button held through power-on needs a fresh press.
    pub fn apply(&mut self, sample: u8, bank: &ButtonBank, now: u32) -> Result<(), E> {
        if let Some(previous) = self.previous {
            let changed = sample ^ previous;
            for (button, state) in bank.iter() {
                let mask = 1 << button.index();
                if changed & mask == 0 {
                    continue;
                }
                if sample & mask != 0 {
                    state.record_press(now);
                    self.feedback.set_high()?;
                    self.pulse_started = Some(now);
                } else {
                    state.record_release(now);
                }
            }
        }

        if let Some(started) = self.pulse_started {
            if elapsed(now, started) >= PRESS_PULSE_TICKS {
                self.feedback.set_low()?;
                self.pulse_started = None;
            }
        }

        self.previous = Some(sample);
        Ok(())
    }

    pub fn release(self) -> ([I; BUTTONS], F) {
        (self.inputs, self.feedback)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use embedded_hal_mock::pin::{Mock as PinMock, State as PinState, Transaction as PinTransaction};

    fn idle_inputs() -> [PinMock; BUTTONS] {
        core::array::from_fn(|_| PinMock::new(&[]))
    }

    #[test]
    fn press_sets_level_edge_count_and_timestamp() {
        let bank = ButtonBank::new();
        let mut feedback = PinMock::new(&[PinTransaction::set(PinState::High)]);
        let mut handler = ButtonHandler::new(idle_inputs(), feedback.clone());

        handler.apply(0b0000, &bank, 10).unwrap();
        handler.apply(0b0010, &bank, 11).unwrap();

        let b = bank.get(Button::B);
        assert!(b.is_pressed());
        assert!(b.is_just_pressed());
        assert_eq!(b.press_count(), 1);
        assert_eq!(b.last_press(), 11);
        assert!(!bank.get(Button::A).is_pressed());

        feedback.done();
    }

    #[test]
    fn holding_a_button_yields_one_press() {
        let bank = ButtonBank::new();
        let mut feedback = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
            PinTransaction::set(PinState::High),
        ]);
        let mut handler = ButtonHandler::new(idle_inputs(), feedback.clone());

        handler.apply(0, &bank, 0).unwrap();
        for now in 1..=100 {
            handler.apply(0b0001, &bank, now).unwrap();
        }
        let a = bank.get(Button::A);
        assert!(a.take_press());
        assert!(!a.take_press());
        assert_eq!(a.press_count(), 1);

        handler.apply(0, &bank, 101).unwrap();
        assert!(!a.is_pressed());
        assert_eq!(a.last_release(), 101);
        assert!(!a.take_press());

        handler.apply(0b0001, &bank, 102).unwrap();
        assert!(a.take_press());
        assert_eq!(a.press_count(), 2);

        feedback.done();
    }

    #[test]
    fn first_sample_only_seeds() {
        let bank = ButtonBank::new();
        let mut handler = ButtonHandler::new(idle_inputs(), PinMock::new(&[]));

        handler.apply(0b1111, &bank, 1).unwrap();
        for (_, state) in bank.iter() {
            assert!(!state.is_pressed());
            assert!(!state.is_just_pressed());
        }

        // Still held: no edge
        handler.apply(0b1111, &bank, 2).unwrap();
        assert_eq!(bank.get(Button::D).press_count(), 0);

        let (_, mut feedback) = handler.release();
        feedback.done();
    }

    #[test]
    fn feedback_pulse_lasts_fixed_ticks() {
        let bank = ButtonBank::new();
        let mut feedback = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut handler = ButtonHandler::new(idle_inputs(), feedback.clone());

        handler.apply(0, &bank, 0).unwrap();
        handler.apply(0b0100, &bank, 1).unwrap();
        for now in 2..PRESS_PULSE_TICKS + 1 {
            handler.apply(0b0100, &bank, now).unwrap();
        }
        // Due on the tick that is PRESS_PULSE_TICKS after the press
        handler.apply(0b0100, &bank, PRESS_PULSE_TICKS + 1).unwrap();
        handler.apply(0b0100, &bank, PRESS_PULSE_TICKS + 2).unwrap();

        feedback.done();
    }

    #[test]
    fn feedback_pulse_ends_across_wraparound() {
        let bank = ButtonBank::new();
        let mut feedback = PinMock::new(&[
            PinTransaction::set(PinState::High),
            PinTransaction::set(PinState::Low),
        ]);
        let mut handler = ButtonHandler::new(idle_inputs(), feedback.clone());

        let start = u32::MAX - 10;
        handler.apply(0, &bank, start - 1).unwrap();
        handler.apply(0b0001, &bank, start).unwrap();
        handler
            .apply(0b0001, &bank, start.wrapping_add(PRESS_PULSE_TICKS))
            .unwrap();

        feedback.done();
    }

    #[test]
    fn sample_reads_every_input() {
        let inputs = [
            PinMock::new(&[PinTransaction::get(PinState::Low)]),
            PinMock::new(&[PinTransaction::get(PinState::High)]),
            PinMock::new(&[PinTransaction::get(PinState::Low)]),
            PinMock::new(&[PinTransaction::get(PinState::High)]),
        ];
        let handler = ButtonHandler::new(inputs, PinMock::new(&[]));
        assert_eq!(handler.sample().unwrap(), 0b1010);

        let (inputs, mut feedback) = handler.release();
        for mut input in inputs {
            input.done();
        }
        feedback.done();
    }

    #[test]
    fn two_readers_both_see_an_unconsumed_press() {
        let bank = ButtonBank::new();
        bank.get(Button::C).record_press(5);
        let first_look = bank.get(Button::C).is_just_pressed();
        let second_look = bank.get(Button::C).is_just_pressed();
        assert!(first_look && second_look);
        assert!(bank.get(Button::C).take_press());
        assert!(!bank.get(Button::C).is_just_pressed());
    }
}
