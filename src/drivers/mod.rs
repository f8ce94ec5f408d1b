pub mod button_handler;
pub mod display;
pub mod led_matrix;
#[cfg(target_arch = "avr")]
pub mod serial_console;
pub mod status_leds;

pub use button_handler::{Button, ButtonBank, ButtonHandler, ButtonState};
pub use display::DisplayBuffer;
pub use led_matrix::LedMatrix;
#[cfg(target_arch = "avr")]
pub use serial_console::SerialConsole;
pub use status_leds::StatusLeds;
