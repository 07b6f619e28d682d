//! Host-side helper utilities.

pub mod clock;

pub use clock::{HostClock, ManualClock, SystemClock};
