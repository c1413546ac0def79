//! Domain services.

pub mod chart;
pub mod clock;
pub mod renewal;

pub use clock::{Clock, ManualClock, SystemClock};
