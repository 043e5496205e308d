//! Embassy async tasks
//!
//! Each task runs independently and communicates via channels/signals.

pub mod rangefinder;

pub use rangefinder::rangefinder_task;
