//! Self-test fixture firmware
//!
//! A 1 ms tick interrupt samples four buttons and multiplexes a five-column
//! red/green result display. The main loop runs five timed button self-tests
//! one after another and publishes their results to the display.
//!
//! Everything except the interrupt and pin wiring in `main.rs` builds and
//! tests on the host.

#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod config;
pub mod diagnostics;
pub mod drivers;
pub mod hal;
pub mod logger;
pub mod os;
pub mod rtos;
pub mod testing;

pub use application::Application;
pub use os::Shared;

#[doc(hidden)]
pub use ufmt;
