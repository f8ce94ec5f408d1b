#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::digital::v2::{InputPin, OutputPin};

use selftest_fixture::drivers::{Button, ButtonHandler, LedMatrix, StatusLeds};
use selftest_fixture::logger::{Level, Logger};
use selftest_fixture::os::Clock;
use selftest_fixture::rtos::TickHandler;
use selftest_fixture::{Application, Shared};

pub type Event = (&'static str, bool);
pub type EventLog = Rc<RefCell<Vec<Event>>>;

pub const COLUMN_NAMES: [&str; 5] = ["col0", "col1", "col2", "col3", "col4"];

/// Output pin that appends every write to a log shared by all pins.
#[derive(Clone)]
pub struct RecordingPin {
    name: &'static str,
    log: EventLog,
}

impl RecordingPin {
    pub fn new(name: &'static str, log: &EventLog) -> Self {
        Self {
            name,
            log: Rc::clone(log),
        }
    }
}

impl OutputPin for RecordingPin {
    type Error = Infallible;

    fn set_high(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push((self.name, true));
        Ok(())
    }

    fn set_low(&mut self) -> Result<(), Infallible> {
        self.log.borrow_mut().push((self.name, false));
        Ok(())
    }
}

/// Input pin whose level the test drives.
#[derive(Clone, Default)]
pub struct FakeInput(Rc<Cell<bool>>);

impl FakeInput {
    pub fn set(&self, pressed: bool) {
        self.0.set(pressed);
    }
}

impl InputPin for FakeInput {
    type Error = Infallible;

    fn is_high(&self) -> Result<bool, Infallible> {
        Ok(self.0.get())
    }

    fn is_low(&self) -> Result<bool, Infallible> {
        Ok(!self.0.get())
    }
}

pub fn matrix_pins(log: &EventLog) -> LedMatrix<RecordingPin, RecordingPin> {
    LedMatrix::new(
        COLUMN_NAMES.map(|name| RecordingPin::new(name, log)),
        RecordingPin::new("red", log),
        RecordingPin::new("green", log),
    )
}

/// Last level written to each named pin after replaying `events`.
pub fn levels_after(events: &[Event], names: &[&'static str]) -> Vec<bool> {
    names
        .iter()
        .map(|name| {
            events
                .iter()
                .rev()
                .find(|(pin, _)| pin == name)
                .map_or(false, |&(_, level)| level)
        })
        .collect()
}

/// The whole board: both execution contexts, fake pins and a string log.
pub struct Rig {
    pub shared: Shared,
    pub tick: TickHandler<FakeInput, RecordingPin, RecordingPin, RecordingPin>,
    pub app: Application<RecordingPin, String>,
    pub inputs: [FakeInput; 4],
    pub pins: EventLog,
}

impl Rig {
    pub fn new() -> Self {
        Self::starting_at(0)
    }

    /// A rig whose tick counter starts at `start`.
    pub fn starting_at(start: u32) -> Self {
        let pins = EventLog::default();
        let inputs: [FakeInput; 4] = Default::default();

        let shared = Shared::with_clock(Clock::with_ticks(start));
        let leds = StatusLeds::new(
            RecordingPin::new("pwr", &pins),
            RecordingPin::new("rdy", &pins),
            RecordingPin::new("run", &pins),
            RecordingPin::new("idle", &pins),
        );
        let mut app = Application::new(leds, Logger::new(String::new(), Level::Debug));
        app.startup(&shared).unwrap();

        shared.display.init();
        let tick = TickHandler::new(
            ButtonHandler::new(inputs.clone(), RecordingPin::new("init", &pins)),
            matrix_pins(&pins),
        )
        .with_start(start);
        app.ready(&shared).unwrap();

        Self {
            shared,
            tick,
            app,
            inputs,
            pins,
        }
    }

    pub fn now(&self) -> u32 {
        self.shared.clock.now()
    }

    /// One tick interrupt followed by one main-loop pass.
    pub fn step(&mut self) {
        self.tick.on_tick(&self.shared).unwrap();
        self.app.poll(&self.shared).unwrap();
    }

    pub fn run(&mut self, ticks: u32) {
        for _ in 0..ticks {
            self.step();
        }
    }

    pub fn set(&mut self, button: Button, pressed: bool) {
        self.inputs[button.index()].set(pressed);
    }

    /// Press for one tick and release on the next.
    pub fn tap(&mut self, button: Button) {
        self.set(button, true);
        self.step();
        self.set(button, false);
        self.step();
    }

    pub fn clear_pins(&self) {
        self.pins.borrow_mut().clear();
    }

    pub fn pin_events(&self) -> Vec<Event> {
        self.pins.borrow().clone()
    }

    pub fn console(&self) -> &str {
        self.app.logger().writer().as_str()
    }
}
