#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use core::cell::RefCell;

use avr_device::atmega128a::{Peripherals, PORTA, PORTB, PORTC, PORTD, PORTE};
use critical_section::Mutex;

use selftest_fixture::config::{LOG_LEVEL, STARTUP_SETTLE_TICKS};
use selftest_fixture::diagnostics::{self, FaultCause};
use selftest_fixture::drivers::{ButtonHandler, LedMatrix, SerialConsole, StatusLeds};
use selftest_fixture::hal::gpio::{Input, Output, Pin};
use selftest_fixture::hal::{ActiveLow, IdleWait, Power, TickTimer, Timer0, Uart};
use selftest_fixture::logger::Logger;
use selftest_fixture::rtos::TickHandler;
use selftest_fixture::{Application, Shared};

// Board wiring: buttons, rows, status LEDs and INIT are active-low,
// column selects are active-high.
type ButtonPin = ActiveLow<Pin<PORTD, Input>>;
type FeedbackPin = ActiveLow<Pin<PORTE, Output>>;
type ColumnPin = Pin<PORTC, Output>;
type RowPin = ActiveLow<Pin<PORTB, Output>>;
type StatusPin = ActiveLow<Pin<PORTA, Output>>;

type Tick = TickHandler<ButtonPin, FeedbackPin, ColumnPin, RowPin>;

static SHARED: Shared = Shared::new();
static TICK: Mutex<RefCell<Option<Tick>>> = Mutex::new(RefCell::new(None));

#[avr_device::interrupt(atmega128a)]
fn TIMER0_COMP() {
    critical_section::with(|cs| {
        if let Some(tick) = TICK.borrow_ref_mut(cs).as_mut() {
            or_halt(tick.on_tick(&SHARED));
        }
    });
}

#[avr_device::entry]
fn main() -> ! {
    let dp = match Peripherals::take() {
        Some(dp) => dp,
        None => diagnostics::halt(FaultCause::Panic, line!()),
    };

    // Port A belongs to the main loop. Ports B, C, D and E belong to the tick.
    let status = |bit| ActiveLow::new(Pin::<PORTA, Input>::new(bit).into_output_high());
    let leds = StatusLeds::new(status(5), status(7), status(0), status(6));

    let columns = [0, 1, 2, 3, 4].map(|bit| Pin::<PORTC, Input>::new(bit).into_output());
    let red = ActiveLow::new(Pin::<PORTB, Input>::new(1).into_output_high());
    let green = ActiveLow::new(Pin::<PORTB, Input>::new(2).into_output_high());
    let buttons =
        [2, 3, 4, 5].map(|bit| ActiveLow::new(Pin::<PORTD, Input>::new(bit).into_pull_up_input()));
    let feedback = ActiveLow::new(Pin::<PORTE, Input>::new(2).into_output_high());

    let console = SerialConsole::new(Uart::new(dp.USART0));
    let mut app = Application::new(leds, Logger::new(console, LOG_LEVEL));
    let mut timer = Timer0::new(dp.TC0);
    let mut power = Power::new(dp.CPU);

    or_halt(app.startup(&SHARED));

    SHARED.display.init();
    let tick = TickHandler::new(
        ButtonHandler::new(buttons, feedback),
        LedMatrix::new(columns, red, green),
    )
    .with_start(SHARED.clock.now());
    critical_section::with(|cs| TICK.borrow(cs).replace(Some(tick)));

    timer.arm_periodic();
    // SAFETY: all interrupt-shared state is initialised above
    unsafe { avr_device::interrupt::enable() };
    or_halt(app.ready(&SHARED));

    SHARED
        .clock
        .wait_ticks(STARTUP_SETTLE_TICKS, || power.wait_for_interrupt());

    loop {
        or_halt(app.poll(&SHARED));
        power.wait_for_interrupt();
    }
}

/// A failed pin access stops the firmware.
fn or_halt<T, E>(result: Result<T, E>) -> T {
    match result {
        Ok(value) => value,
        Err(_) => diagnostics::halt(FaultCause::Gpio, SHARED.clock.now()),
    }
}

#[no_mangle]
pub unsafe extern "avr-interrupt" fn __vector_default() {
    diagnostics::halt(FaultCause::UnexpectedInterrupt, 0)
}

#[panic_handler]
fn panic(info: &core::panic::PanicInfo) -> ! {
    let line = info.location().map_or(0, |location| location.line());
    diagnostics::halt(FaultCause::Panic, line)
}
