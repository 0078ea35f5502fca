#![forbid(unsafe_code)]

//! Pointer interaction sessions: drag, resize and border drag.
//!
//! A session is created on pointer-down and destroyed on pointer-up; at most
//! one exists at a time. The engine owns it and routes pointer and tick
//! events to it.
//!
//! ```text
//!          down(body)            up: commit
//!   Idle ─────────────▶ Dragging ─────────▶ Idle
//!     │  down(grip)              up: commit
//!     ├───────────────▶ Resizing ─────────▶ Idle
//!     │  down(border)                up
//!     └───────────────▶ BorderDragging ──▶ Idle
//! ```
//!
//! Drag and resize are driven by a [`MotionSession`]: pointer moves only
//! update a raw (fractional) control value; every animation tick then
//!
//! 1. moves the snap target to the rounded raw value once the raw value has
//!    strayed more than `snap_threshold` cells from it (hysteresis),
//! 2. moves the ghost the same way with the tighter `ghost_threshold`,
//! 3. steps the smoothed rect a `damping` fraction of the way to the snap
//!    target.
//!
//! For a drag the control value is the target origin; for a resize it is the
//! `(dx, dy)` delta applied to the rect captured at pointer-down.
//!
//! # Invariants
//!
//! 1. [`MotionSession::snap_rect`] and [`MotionSession::ghost_rect`] always
//!    lie inside the grid (`col + width <= 12`, width and height >= 1).
//! 2. A resize never shrinks the moved horizontal edge below the minimum
//!    width, and never moves the opposite edges.
//! 3. The smoothed rect never overshoots its snap target.
//! 4. The ticker runs exactly while the session is alive.
//!
//! # Failure Modes
//!
//! - Non-finite pointer coordinates: the raw control value keeps its last
//!   finite value.

use std::fmt;

use dashgrid_core::animation::{DEFAULT_DAMPING, SmoothedRect, Ticker};
use dashgrid_core::event::{HorizontalEdge, ResizeDirection, VerticalEdge};
use dashgrid_core::geometry::{FloatRect, GRID_COLUMNS, GridRect};
use serde::{Deserialize, Serialize};

use crate::border::{BorderHandle, BorderOrientation};
use crate::component::ComponentId;

/// Default raw-to-snap distance (in cells) before the snap target moves.
pub const DEFAULT_SNAP_THRESHOLD: f64 = 0.75;

/// Default raw-to-ghost distance (in cells) before the ghost moves.
pub const DEFAULT_GHOST_THRESHOLD: f64 = 0.5;

/// Smoothing and hysteresis parameters for drag and resize.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct InteractionTuning {
    /// Fraction of the remaining distance covered per tick, in `(0, 1]`.
    pub damping: f64,
    /// Cells the raw target may stray from the snap target before it moves.
    pub snap_threshold: f64,
    /// Cells the raw target may stray from the ghost before it moves.
    pub ghost_threshold: f64,
}

impl Default for InteractionTuning {
    fn default() -> Self {
        Self {
            damping: DEFAULT_DAMPING,
            snap_threshold: DEFAULT_SNAP_THRESHOLD,
            ghost_threshold: DEFAULT_GHOST_THRESHOLD,
        }
    }
}

impl InteractionTuning {
    /// Check parameter ranges. Returns every problem found.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = Vec::new();
        if !(self.damping > 0.0 && self.damping <= 1.0) {
            errors.push(format!("tuning.damping must be in (0, 1], got {}", self.damping));
        }
        if !(self.snap_threshold.is_finite() && self.snap_threshold > 0.0) {
            errors.push(format!(
                "tuning.snap_threshold must be > 0, got {}",
                self.snap_threshold
            ));
        }
        if !(self.ghost_threshold.is_finite() && self.ghost_threshold > 0.0) {
            errors.push(format!(
                "tuning.ghost_threshold must be > 0, got {}",
                self.ghost_threshold
            ));
        }
        if self.ghost_threshold > self.snap_threshold {
            errors.push(format!(
                "tuning.ghost_threshold ({}) must not exceed tuning.snap_threshold ({})",
                self.ghost_threshold, self.snap_threshold
            ));
        }
        errors
    }
}

/// Keep `held` while `raw` is within `threshold` of it, otherwise round.
#[must_use]
pub fn hold_or_round(raw: f64, held: i32, threshold: f64) -> i32 {
    if !raw.is_finite() || (raw - f64::from(held)).abs() <= threshold {
        return held;
    }
    raw.round().clamp(f64::from(i32::MIN), f64::from(i32::MAX)) as i32
}

/// Where a pointer-down landed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "target", rename_all = "snake_case")]
pub enum PointerTarget {
    /// Component body: starts a drag.
    Body { id: ComponentId },
    /// One of the eight resize grips: starts a resize.
    Grip {
        id: ComponentId,
        direction: ResizeDirection,
    },
    /// A shared border: starts a border drag.
    Border { handle: BorderHandle },
}

/// Observable interaction state.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum InteractionState {
    #[default]
    Idle,
    Dragging {
        id: ComponentId,
    },
    Resizing {
        id: ComponentId,
        direction: ResizeDirection,
    },
    BorderDragging {
        first: ComponentId,
        second: ComponentId,
        orientation: BorderOrientation,
    },
}

impl InteractionState {
    #[must_use]
    pub const fn is_active(&self) -> bool {
        !matches!(self, Self::Idle)
    }

    /// Whether `id` takes part in the current session.
    #[must_use]
    pub fn involves(&self, id: &ComponentId) -> bool {
        match self {
            Self::Idle => false,
            Self::Dragging { id: active } | Self::Resizing { id: active, .. } => active == id,
            Self::BorderDragging { first, second, .. } => first == id || second == id,
        }
    }

    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Dragging { .. } => "dragging",
            Self::Resizing { .. } => "resizing",
            Self::BorderDragging { .. } => "border_dragging",
        }
    }
}

impl fmt::Display for InteractionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why an event did nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NoopReason {
    /// Move, up or tick with no session.
    IdleWithoutSession,
    /// Pointer-down while a session is already running.
    SessionAlreadyActive,
    /// Pointer-down on empty canvas.
    NoTarget,
    /// The target names a component that no longer exists.
    UnknownComponent,
    /// Tick during a border drag, which does not animate.
    NotAnimating,
    /// Border drag move that left both rects unchanged.
    BorderUnchanged,
}

/// What handling an event did, for diagnostics and trace replay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "effect", rename_all = "snake_case")]
pub enum InteractionEffect {
    Started {
        state: InteractionState,
    },
    /// The session advanced. `rect` is the snap target (drag/resize) or the
    /// new first-side rect (border drag); `retargeted` is set when it moved.
    Updated {
        id: ComponentId,
        rect: GridRect,
        retargeted: bool,
    },
    /// The session ended; `rect` is the active component's committed rect.
    Committed {
        state: InteractionState,
        rect: GridRect,
    },
    Noop {
        reason: NoopReason,
    },
}

impl InteractionEffect {
    #[must_use]
    pub const fn noop(reason: NoopReason) -> Self {
        Self::Noop { reason }
    }

    #[must_use]
    pub const fn is_noop(&self) -> bool {
        matches!(self, Self::Noop { .. })
    }
}

/// Drag or resize.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MotionKind {
    Drag,
    Resize { direction: ResizeDirection },
}

/// Result of one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TickOutcome {
    /// Frames since the session started, including this one.
    pub frame: u64,
    /// The snap target rect changed this frame.
    pub retargeted: bool,
    /// The ghost rect changed this frame.
    pub ghost_moved: bool,
}

/// A drag or resize in flight.
#[derive(Debug, Clone)]
pub struct MotionSession {
    id: ComponentId,
    kind: MotionKind,
    start: GridRect,
    min_width: u16,
    anchor: (f64, f64),
    raw: (f64, f64),
    snap: (i32, i32),
    ghost: (i32, i32),
    smoothed: SmoothedRect,
    ticker: Ticker,
    tuning: InteractionTuning,
}

impl MotionSession {
    /// Begin dragging `id` (currently at `start`) from pointer cell `pointer`.
    #[must_use]
    pub fn drag(id: ComponentId, start: GridRect, pointer: (f64, f64), tuning: InteractionTuning) -> Self {
        let origin = (i32::from(start.col), i32::from(start.row));
        Self::begin(id, MotionKind::Drag, start, 1, pointer, origin, tuning)
    }

    /// Begin resizing `id` from grip `direction`. `min_width` is the
    /// breakpoint minimum for the component's kind.
    #[must_use]
    pub fn resize(
        id: ComponentId,
        start: GridRect,
        direction: ResizeDirection,
        min_width: u16,
        pointer: (f64, f64),
        tuning: InteractionTuning,
    ) -> Self {
        Self::begin(
            id,
            MotionKind::Resize { direction },
            start,
            min_width.clamp(1, GRID_COLUMNS),
            pointer,
            (0, 0),
            tuning,
        )
    }

    fn begin(
        id: ComponentId,
        kind: MotionKind,
        start: GridRect,
        min_width: u16,
        pointer: (f64, f64),
        control: (i32, i32),
        tuning: InteractionTuning,
    ) -> Self {
        let mut ticker = Ticker::new();
        ticker.start();
        Self {
            id,
            kind,
            start,
            min_width,
            anchor: pointer,
            raw: (f64::from(control.0), f64::from(control.1)),
            snap: control,
            ghost: control,
            smoothed: SmoothedRect::new(start).with_damping(tuning.damping),
            ticker,
            tuning,
        }
    }

    #[inline]
    pub fn id(&self) -> &ComponentId {
        &self.id
    }

    #[inline]
    pub const fn kind(&self) -> MotionKind {
        self.kind
    }

    /// Rect captured at pointer-down.
    #[inline]
    pub const fn start(&self) -> GridRect {
        self.start
    }

    /// Unsnapped control value: target origin (drag) or delta (resize).
    #[inline]
    pub const fn raw(&self) -> (f64, f64) {
        self.raw
    }

    #[inline]
    pub const fn ticker(&self) -> &Ticker {
        &self.ticker
    }

    /// Current animated position.
    #[inline]
    pub const fn smoothed(&self) -> FloatRect {
        self.smoothed.current()
    }

    /// Rect the component will commit to if released now.
    #[must_use]
    pub fn snap_rect(&self) -> GridRect {
        self.rect_for(self.snap)
    }

    #[must_use]
    pub fn ghost_rect(&self) -> GridRect {
        self.rect_for(self.ghost)
    }

    #[must_use]
    pub fn state(&self) -> InteractionState {
        match self.kind {
            MotionKind::Drag => InteractionState::Dragging { id: self.id.clone() },
            MotionKind::Resize { direction } => InteractionState::Resizing {
                id: self.id.clone(),
                direction,
            },
        }
    }

    /// Record a pointer position in fractional grid units.
    pub fn pointer_moved(&mut self, pointer: (f64, f64)) {
        let dx = pointer.0 - self.anchor.0;
        let dy = pointer.1 - self.anchor.1;
        let raw = match self.kind {
            MotionKind::Drag => {
                let max_col = f64::from(GRID_COLUMNS - self.start.width.min(GRID_COLUMNS));
                (
                    (f64::from(self.start.col) + dx).clamp(0.0, max_col),
                    (f64::from(self.start.row) + dy).max(0.0),
                )
            }
            MotionKind::Resize { .. } => (dx, dy),
        };
        if raw.0.is_finite() {
            self.raw.0 = raw.0;
        }
        if raw.1.is_finite() {
            self.raw.1 = raw.1;
        }
    }

    /// Advance one frame. `None` once the ticker has been stopped.
    pub fn tick(&mut self) -> Option<TickOutcome> {
        if !self.ticker.advance() {
            return None;
        }

        let snap_before = self.snap_rect();
        self.snap = (
            hold_or_round(self.raw.0, self.snap.0, self.tuning.snap_threshold),
            hold_or_round(self.raw.1, self.snap.1, self.tuning.snap_threshold),
        );
        let snap_after = self.snap_rect();

        let ghost_before = self.ghost_rect();
        self.ghost = (
            hold_or_round(self.raw.0, self.ghost.0, self.tuning.ghost_threshold),
            hold_or_round(self.raw.1, self.ghost.1, self.tuning.ghost_threshold),
        );

        self.smoothed.set_target(snap_after);
        self.smoothed.step();

        Some(TickOutcome {
            frame: self.ticker.frames(),
            retargeted: snap_after != snap_before,
            ghost_moved: self.ghost_rect() != ghost_before,
        })
    }

    /// Stop animating and return the rect to commit.
    pub fn finish(&mut self) -> GridRect {
        self.ticker.stop();
        self.smoothed.set_target(self.snap_rect());
        self.smoothed.settle();
        self.snap_rect()
    }

    fn rect_for(&self, control: (i32, i32)) -> GridRect {
        match self.kind {
            MotionKind::Drag => {
                let max_col = i32::from(GRID_COLUMNS.saturating_sub(self.start.width));
                self.start
                    .at(to_cell(control.0.clamp(0, max_col)), to_cell(control.1))
                    .clamped_to_grid()
            }
            MotionKind::Resize { direction } => resized(self.start, direction, control, self.min_width),
        }
    }
}

/// `start` resized by `delta` from the grip `direction`.
#[must_use]
pub fn resized(start: GridRect, direction: ResizeDirection, delta: (i32, i32), min_width: u16) -> GridRect {
    let columns = i32::from(GRID_COLUMNS);
    let min_w = i32::from(min_width.clamp(1, GRID_COLUMNS));

    let left = i32::from(start.col);
    let right = i32::from(start.right());
    let (col, width) = match direction.horizontal_edge() {
        Some(HorizontalEdge::East) => {
            let width = (right - left + delta.0).clamp(min_w, (columns - left).max(min_w));
            (left, width)
        }
        Some(HorizontalEdge::West) => {
            let col = (left + delta.0).clamp(0, (right - min_w).max(0));
            (col, (right - col).max(min_w))
        }
        None => (left, right - left),
    };

    let top = i32::from(start.row);
    let bottom = i32::from(start.bottom());
    let (row, height) = match direction.vertical_edge() {
        Some(VerticalEdge::South) => (top, (bottom - top + delta.1).max(1)),
        Some(VerticalEdge::North) => {
            let row = (top + delta.1).clamp(0, (bottom - 1).max(0));
            (row, bottom - row)
        }
        None => (top, bottom - top),
    };

    GridRect::new(to_cell(col), to_cell(row), to_cell(width), to_cell(height)).clamped_to_grid()
}

fn to_cell(value: i32) -> u16 {
    u16::try_from(value.max(0)).unwrap_or(u16::MAX)
}
