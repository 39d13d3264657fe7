//! The timer engine.
//!
//! - `machine`: the pure transition function and its effects
//! - `clock` / `scheduler`: injected time and polling
//! - `surface`: the display the controller writes to
//! - `controller`: owns the state and applies effects

pub mod clock;
pub mod controller;
pub mod machine;
pub mod scheduler;
pub mod surface;

pub use clock::{Clock, ManualClock, SystemClock};
pub use controller::{Capabilities, Controller};
pub use machine::{step, Effect, Transition};
pub use scheduler::{IntervalScheduler, ManualScheduler, Scheduler, TICK_INTERVAL};
pub use surface::{DisplaySurface, RecordingDisplay};
