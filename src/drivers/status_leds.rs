use embedded_hal::digital::v2::OutputPin;

/// The main-loop owned status indicators: PWR, RDY, RUN and IDLE.
///
/// INIT doubles as the press-feedback pulse and belongs to the tick
/// interrupt, so it is not here.
pub struct StatusLeds<P> {
    power: P,
    ready: P,
    run: P,
    idle: P,
    last: Option<(bool, bool)>,
}

impl<P, E> StatusLeds<P>
where
    P: OutputPin<Error = E>,
{
    /// Pins light on `set_high`.
    pub fn new(power: P, ready: P, run: P, idle: P) -> Self {
        Self {
            power,
            ready,
            run,
            idle,
            last: None,
        }
    }

    pub fn power_on(&mut self) -> Result<(), E> {
        self.power.set_high()
    }

    pub fn ready(&mut self) -> Result<(), E> {
        self.ready.set_high()
    }

    /// Blink RUN or IDLE with `flash` and keep the other one dark.
    ///
    /// Only writes when `run_mode` or `flash` changed since the last call.
    /// Returns whether anything was written.
    pub fn service(&mut self, run_mode: bool, flash: bool) -> Result<bool, E> {
        if self.last == Some((run_mode, flash)) {
            return Ok(false);
        }

        let (active, inactive) = if run_mode {
            (&mut self.run, &mut self.idle)
        } else {
            (&mut self.idle, &mut self.run)
        };
        if flash {
            active.set_high()?;
        } else {
            active.set_low()?;
        }
        inactive.set_low()?;

        self.last = Some((run_mode, flash));
        Ok(true)
    }
}
