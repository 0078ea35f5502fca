#![forbid(unsafe_code)]

//! The rendering seam.
//!
//! The engine never draws. It tells a [`Renderer`] where each component
//! belongs, by id, and the host maps that onto whatever it displays (DOM
//! nodes, a canvas, terminal cells). [`CanvasMetrics`] converts grid units
//! to pixels for hosts that want them.
//!
//! [`RecordingRenderer`] keeps the last instruction per id plus an ordered
//! log; tests and the trace replayer use it.
//!
//! [`CanvasMetrics`]: dashgrid_core::canvas::CanvasMetrics

use dashgrid_core::geometry::{FloatRect, GridRect};
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::border::BorderHandle;
use crate::component::ComponentId;

/// Drop-target preview for the active component.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ghost {
    pub id: ComponentId,
    pub rect: GridRect,
    /// Whether `rect` overlaps another component in the authoritative model.
    pub collides: bool,
}

/// Receives placement instructions from the engine.
pub trait Renderer {
    /// Show `id` at an integer grid rect.
    fn place(&mut self, id: &ComponentId, rect: GridRect);

    /// Show `id` at a fractional rect while it is being animated.
    fn place_floating(&mut self, id: &ComponentId, rect: FloatRect) {
        self.place(id, rect.round());
    }

    fn show_ghost(&mut self, ghost: &Ghost);

    fn hide_ghost(&mut self);

    /// The full set of border handles changed.
    fn border_handles_changed(&mut self, handles: &[BorderHandle]);

    /// `id` no longer exists.
    fn remove(&mut self, id: &ComponentId);
}

/// Discards everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullRenderer;

impl Renderer for NullRenderer {
    fn place(&mut self, _id: &ComponentId, _rect: GridRect) {}
    fn show_ghost(&mut self, _ghost: &Ghost) {}
    fn hide_ghost(&mut self) {}
    fn border_handles_changed(&mut self, _handles: &[BorderHandle]) {}
    fn remove(&mut self, _id: &ComponentId) {}
}

/// One renderer call, as logged by [`RecordingRenderer`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum RenderOp {
    Place { id: ComponentId, rect: GridRect },
    PlaceFloating { id: ComponentId, rect: FloatRect },
    ShowGhost { ghost: Ghost },
    HideGhost,
    BorderHandles { count: usize },
    Remove { id: ComponentId },
}

/// Remembers what is on screen and every call that put it there.
#[derive(Debug, Clone, Default)]
pub struct RecordingRenderer {
    placed: FxHashMap<ComponentId, GridRect>,
    floating: FxHashMap<ComponentId, FloatRect>,
    ghost: Option<Ghost>,
    handles: Vec<BorderHandle>,
    ops: Vec<RenderOp>,
}

impl RecordingRenderer {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Last integer rect shown for `id`.
    pub fn placed(&self, id: &ComponentId) -> Option<GridRect> {
        self.placed.get(id).copied()
    }

    /// Last fractional rect shown for `id`, if it is currently floating.
    pub fn floating(&self, id: &ComponentId) -> Option<FloatRect> {
        self.floating.get(id).copied()
    }

    pub fn ghost(&self) -> Option<&Ghost> {
        self.ghost.as_ref()
    }

    pub fn handles(&self) -> &[BorderHandle] {
        &self.handles
    }

    /// Number of components currently shown.
    pub fn visible(&self) -> usize {
        self.placed.len()
    }

    pub fn ops(&self) -> &[RenderOp] {
        &self.ops
    }

    /// Drop the op log, keeping what is on screen.
    pub fn clear_ops(&mut self) {
        self.ops.clear();
    }
}

impl Renderer for RecordingRenderer {
    fn place(&mut self, id: &ComponentId, rect: GridRect) {
        self.floating.remove(id);
        self.placed.insert(id.clone(), rect);
        self.ops.push(RenderOp::Place { id: id.clone(), rect });
    }

    fn place_floating(&mut self, id: &ComponentId, rect: FloatRect) {
        self.placed.insert(id.clone(), rect.round());
        self.floating.insert(id.clone(), rect);
        self.ops.push(RenderOp::PlaceFloating { id: id.clone(), rect });
    }

    fn show_ghost(&mut self, ghost: &Ghost) {
        self.ghost = Some(ghost.clone());
        self.ops.push(RenderOp::ShowGhost { ghost: ghost.clone() });
    }

    fn hide_ghost(&mut self) {
        self.ghost = None;
        self.ops.push(RenderOp::HideGhost);
    }

    fn border_handles_changed(&mut self, handles: &[BorderHandle]) {
        self.handles = handles.to_vec();
        self.ops.push(RenderOp::BorderHandles { count: handles.len() });
    }

    fn remove(&mut self, id: &ComponentId) {
        self.placed.remove(id);
        self.floating.remove(id);
        self.ops.push(RenderOp::Remove { id: id.clone() });
    }
}
