#![forbid(unsafe_code)]

//! Grid placement, collision policies, responsive constraints and the
//! interaction engine.
//!
//! # Role in dashgrid
//! `dashgrid-layout` owns every layout decision: where components sit on the
//! 12-column grid, how overlaps are resolved, how the arrangement adapts to
//! narrower viewports, and how pointer interaction turns into committed
//! changes. It depends on `dashgrid-core` for geometry, pixel mapping,
//! smoothing and event types.
//!
//! # How it fits in the system
//! A host owns one [`LayoutEngine`] and a [`Renderer`]. It forwards pointer
//! events, viewport changes and animation frames; the engine mutates its
//! [`GridModel`] and reports placements back through the renderer. Layouts
//! persist as [`LayoutDocument`] JSON.
//!
//! The lower layers ([`solver`], [`policy`], [`responsive_layout`],
//! [`border`]) are pure functions over arrangement slices and can be used
//! without the engine.

pub mod border;
pub mod component;
pub mod config;
pub mod document;
pub mod engine;
pub mod error;
pub mod interaction;
pub mod model;
pub mod policy;
pub mod renderer;
pub mod responsive;
pub mod responsive_layout;
pub mod solver;

pub use border::{BorderHandle, BorderHandleCache, BorderOrientation, border_handles, drag_border};
pub use component::{Component, ComponentId, ComponentKind, IdAllocator};
pub use config::EngineConfig;
pub use document::{ComponentRecord, LAYOUT_DOCUMENT_VERSION, LayoutDocument};
pub use engine::LayoutEngine;
pub use error::{ConfigError, DocumentError};
pub use interaction::{
    InteractionEffect, InteractionState, InteractionTuning, MotionSession, NoopReason, PointerTarget,
};
pub use model::GridModel;
pub use policy::{CollisionPolicy, PolicyContext};
pub use renderer::{Ghost, NullRenderer, RecordingRenderer, RenderOp, Renderer};
pub use responsive::{Breakpoint, Breakpoints, Responsive, min_columns};
pub use responsive_layout::{BreakpointTransition, ResponsiveState, TransitionKind};
pub use solver::{MAX_SCAN_ROWS, find_slot, reflow};
