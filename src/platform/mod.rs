//! Platform abstraction layer
//!
//! The seams a presentation layer plugs into:
//! - Time (monotonic clock sources)
//! - Input events

pub mod input;
pub mod time;

pub use input::{Drained, InputEvent, InputQueue};
pub use time::{Clock, FixedStepClock, WallClock};
