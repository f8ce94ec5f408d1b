//! Configuration constants for the self-test fixture firmware

use crate::logger::Level;

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// Log console baud rate
pub const UART_BAUD: u32 = 9600;

/// Period of the tick interrupt in milliseconds
pub const TICK_PERIOD_MS: u32 = 1;

/// Ticks between toggles of the slow blink flag
pub const SLOW_BLINK_TICKS: u32 = 250;

/// Ticks between toggles of the fast blink flag
pub const FAST_BLINK_TICKS: u32 = 125;

/// How long the INIT indicator stays lit after a button press
pub const PRESS_PULSE_TICKS: u32 = 50;

/// Run time of every self-test
pub const TEST_DURATION_MS: u32 = 5000;

/// Window in which a failed unlock attempt can be acknowledged
pub const RECOVERY_WINDOW_MS: u32 = 5000;

/// Unlock attempts before the sequence-unlock test gives up
pub const UNLOCK_MAX_ATTEMPTS: u8 = 3;

/// Ticks the main loop waits after arming before accepting a start request
pub const STARTUP_SETTLE_TICKS: u32 = 1000;

/// Number of result columns on the display
pub const COLUMNS: usize = 5;

/// Number of input buttons
pub const BUTTONS: usize = 4;

#[cfg(feature = "debug")]
pub const LOG_LEVEL: Level = Level::Debug;

#[cfg(not(feature = "debug"))]
pub const LOG_LEVEL: Level = Level::Info;

/// Convert milliseconds to ticks
pub const fn ms_to_ticks(ms: u32) -> u32 {
    ms / TICK_PERIOD_MS
}
