#![forbid(unsafe_code)]

//! Core: grid geometry, canvas pixel mapping, pointer events, and motion.
//!
//! # Role in dashgrid
//! `dashgrid-core` is the bottom layer. It knows nothing about components or
//! policies; it owns the coordinate systems (grid cells vs. canvas pixels),
//! the event types the host feeds in, and the per-frame smoothing used while
//! an interaction is in flight.
//!
//! # Primary responsibilities
//! - **GridRect / FloatRect**: committed and in-flight rectangles.
//! - **CanvasMetrics**: pixel ↔ cell conversion.
//! - **PointerEvent / ResizeDirection**: normalized host input.
//! - **SmoothedRect / Ticker**: first-order smoothing and its frame clock.
//!
//! # How it fits in the system
//! `dashgrid-layout` builds the component model, solver, and interaction
//! engine on these types. The `dashgrid` CLI in `dashgrid-harness` enables
//! the `subscriber` feature to install logging.

pub mod animation;
pub mod canvas;
pub mod event;
pub mod geometry;

#[cfg(feature = "subscriber")]
pub mod logging;

pub use canvas::{CanvasMetrics, PixelPoint, PixelRect};
pub use event::{PointerEvent, PointerPhase, ResizeDirection};
pub use geometry::{FloatRect, GRID_COLUMNS, GridRect};
