#![forbid(unsafe_code)]

//! Breakpoint tracking and the master (wide) arrangement.
//!
//! The wide arrangement is authoritative. Leaving `Wide` snapshots it into
//! the master layout before narrow-screen minimums and reflow rearrange the
//! live model; returning to `Wide` copies the saved rects back by id.
//!
//! ```text
//!   Wide ──save master, enforce, reflow──▶ Medium/Narrow
//!   Medium/Narrow ──restore rects by id──▶ Wide
//!   Medium ◀──enforce, reflow──▶ Narrow
//! ```
//!
//! # Invariants
//!
//! 1. The master is only written while `Wide` (or on leaving it, or import).
//! 2. Restoring never reflows: the saved wide arrangement is reproduced
//!    exactly for every id it contains.
//! 3. Components absent from the master keep their current rect on restore.
//!
//! # Failure Modes
//!
//! - Empty master on return to `Wide`: nothing is restored.

use dashgrid_core::geometry::GRID_COLUMNS;
use tracing::debug;

use crate::component::{Component, ComponentId};
use crate::model::GridModel;
use crate::responsive::{Breakpoint, Breakpoints, min_columns};
use crate::solver;

/// What a breakpoint change did to the live arrangement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Wide → Medium/Narrow: master saved, minimums enforced, reflowed.
    LeaveWide,
    /// Medium/Narrow → Wide: master rects restored.
    EnterWide,
    /// Medium ↔ Narrow: minimums enforced, reflowed.
    Between,
}

/// A breakpoint change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BreakpointTransition {
    pub from: Breakpoint,
    pub to: Breakpoint,
    pub kind: TransitionKind,
}

impl BreakpointTransition {
    /// Classify a change, or `None` if the breakpoint did not change.
    #[must_use]
    pub fn between(from: Breakpoint, to: Breakpoint) -> Option<Self> {
        let kind = match (from.is_wide(), to.is_wide()) {
            _ if from == to => return None,
            (true, false) => TransitionKind::LeaveWide,
            (false, true) => TransitionKind::EnterWide,
            _ => TransitionKind::Between,
        };
        Some(Self { from, to, kind })
    }
}

/// Current breakpoint plus the saved wide arrangement.
#[derive(Debug, Clone)]
pub struct ResponsiveState {
    breakpoints: Breakpoints,
    current: Breakpoint,
    master: Vec<Component>,
}

impl ResponsiveState {
    #[must_use]
    pub fn new(breakpoints: Breakpoints, viewport_width: f64) -> Self {
        Self {
            breakpoints,
            current: breakpoints.classify(viewport_width),
            master: Vec::new(),
        }
    }

    #[inline]
    pub const fn breakpoint(&self) -> Breakpoint {
        self.current
    }

    #[inline]
    pub const fn breakpoints(&self) -> Breakpoints {
        self.breakpoints
    }

    /// The saved wide arrangement (empty if never saved).
    #[inline]
    pub fn master(&self) -> &[Component] {
        &self.master
    }

    /// Snapshot the live model as the master.
    pub fn save_master(&mut self, model: &GridModel) {
        self.master = model.snapshot();
    }

    /// Snapshot the live model, but only while `Wide`.
    pub fn refresh_master_if_wide(&mut self, model: &GridModel) {
        if self.current.is_wide() {
            self.save_master(model);
        }
    }

    /// Replace the master outright.
    pub fn set_master(&mut self, master: Vec<Component>) {
        self.master = master;
    }

    /// Drop one id from the master.
    pub fn forget(&mut self, id: &ComponentId) {
        self.master.retain(|c| &c.id != id);
    }

    /// Reclassify `viewport_width` and apply the resulting transition to
    /// `model`. Returns `None` when the breakpoint is unchanged.
    pub fn on_viewport(
        &mut self,
        viewport_width: f64,
        model: &mut GridModel,
        max_rows: u16,
    ) -> Option<BreakpointTransition> {
        let next = self.breakpoints.classify(viewport_width);
        let transition = BreakpointTransition::between(self.current, next)?;
        self.current = next;

        match transition.kind {
            TransitionKind::LeaveWide => {
                self.save_master(model);
                rearrange_for(model, next, max_rows);
            }
            TransitionKind::EnterWide => {
                if !self.master.is_empty() {
                    model.apply_rects(&self.master);
                }
            }
            TransitionKind::Between => rearrange_for(model, next, max_rows),
        }

        debug!(
            target: "dashgrid::responsive",
            from = %transition.from,
            to = %transition.to,
            viewport_width,
            components = model.len(),
            "breakpoint transition"
        );
        Some(transition)
    }
}

/// Enforce minimums then reflow the live model for `bp`.
pub fn rearrange_for(model: &mut GridModel, bp: Breakpoint, max_rows: u16) {
    let mut arrangement = model.snapshot();
    enforce_minimums(&mut arrangement, bp);
    model.replace_all(solver::reflow(&arrangement, bp, max_rows));
}

/// Grow under-width components to the breakpoint minimum, shifting them
/// left if they would cross the right edge of the grid.
pub fn enforce_minimums(arrangement: &mut [Component], bp: Breakpoint) {
    for comp in arrangement.iter_mut() {
        let min = min_columns(comp.kind, bp);
        if comp.rect.width < min {
            comp.rect.width = min;
            if comp.rect.right() > GRID_COLUMNS {
                comp.rect.col = GRID_COLUMNS.saturating_sub(comp.rect.width);
            }
        }
    }
}
