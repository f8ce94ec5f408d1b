pub mod gpio;
pub mod power;
pub mod timer;
#[cfg(target_arch = "avr")]
pub mod uart;

pub use gpio::ActiveLow;
pub use power::IdleWait;
pub use timer::TickTimer;

#[cfg(target_arch = "avr")]
pub use power::Power;
#[cfg(target_arch = "avr")]
pub use timer::Timer0;
#[cfg(target_arch = "avr")]
pub use uart::Uart;
