//! Main-loop service
//!
//! Runs once per wake-up. Starts a self-test when button D is pressed while
//! idle, drives the running test, logs results and keeps the RUN and IDLE
//! indicators in step with the mode.

use embedded_hal::digital::v2::OutputPin;
use ufmt::uWrite;

use crate::config::COLUMNS;
use crate::drivers::button_handler::Button;
use crate::drivers::status_leds::StatusLeds;
use crate::logger::Logger;
use crate::os::Shared;
use crate::testing::{Completion, TestInput, TestSequencer};
use crate::{info, warn};

/// Requests a start while no self-test is running.
pub const START_BUTTON: Button = Button::D;

pub struct Application<P, W> {
    sequencer: TestSequencer,
    status: StatusLeds<P>,
    log: Logger<W>,
    run_mode: bool,
}

impl<P, W, E> Application<P, W>
where
    P: OutputPin<Error = E>,
    W: uWrite,
{
    pub fn new(status: StatusLeds<P>, log: Logger<W>) -> Self {
        Self {
            sequencer: TestSequencer::new(),
            status,
            log,
            run_mode: false,
        }
    }

    /// Light PWR and print the banner. Runs before the tick is armed.
    pub fn startup(&mut self, shared: &Shared) -> Result<(), E> {
        self.status.power_on()?;
        info!(
            self.log,
            shared.clock.now(),
            "{} v{}",
            env!("CARGO_PKG_NAME"),
            env!("CARGO_PKG_VERSION")
        );
        Ok(())
    }

    /// Light RDY. The tick is running and the display holds a snapshot.
    pub fn ready(&mut self, shared: &Shared) -> Result<(), E> {
        self.status.ready()?;
        info!(self.log, shared.clock.now(), "ready, press D to start");
        Ok(())
    }

    pub fn poll(&mut self, shared: &Shared) -> Result<(), E> {
        let now = shared.clock.now();

        if self.sequencer.is_active() {
            let input = TestInput::new(now, &shared.buttons);
            if let Some(done) = self.sequencer.monitor(&input, &shared.display) {
                self.run_mode = false;
                self.report(now, done);
            }
        } else if shared.buttons.get(START_BUTTON).take_press() {
            self.start(now, shared);
        }

        self.status.service(self.run_mode, shared.blink.slow())?;
        Ok(())
    }

    pub fn sequencer(&self) -> &TestSequencer {
        &self.sequencer
    }

    pub fn is_running(&self) -> bool {
        self.run_mode
    }

    pub fn logger(&self) -> &Logger<W> {
        &self.log
    }

    fn start(&mut self, now: u32, shared: &Shared) {
        let index = self.sequencer.current_index();
        if !self.sequencer.start(index, now, &shared.display) {
            return;
        }
        self.run_mode = true;
        let name = self.sequencer.case_name(index).unwrap_or("?");
        info!(self.log, now, "test {} started: {}", index + 1, name);
    }

    fn report(&mut self, now: u32, done: Completion) {
        info!(
            self.log,
            now,
            "test {} {}: {:?}",
            done.index + 1,
            done.name,
            done.outcome
        );

        if done.index + 1 == COLUMNS {
            if self.sequencer.all_passed() {
                info!(self.log, now, "sweep complete, all passed");
            } else {
                warn!(self.log, now, "sweep complete, not all passed");
            }
        }
    }
}
