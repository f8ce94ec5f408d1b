pub mod scheduler;

pub use scheduler::{BlinkScheduler, Periodic, TickHandler};
