#![forbid(unsafe_code)]

//! Frame-driven motion for in-flight interactions.
//!
//! Motion is expressed per frame rather than per elapsed duration: the host
//! schedules a frame while [`Ticker::is_running`] and calls the engine's tick,
//! which advances every [`SmoothedRect`] by one damping step.

pub mod smoothing;
pub mod ticker;

pub use smoothing::{DEFAULT_DAMPING, SETTLE_EPSILON, SmoothedRect, smooth_step};
pub use ticker::Ticker;
