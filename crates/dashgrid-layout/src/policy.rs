#![forbid(unsafe_code)]

//! Collision resolution policies.
//!
//! A policy turns "the active component wants this rect" into a whole new
//! arrangement. [`preview`] is evaluated continuously while an interaction is
//! in flight; [`commit`] runs once on release.
//!
//! | policy | preview | commit |
//! |---|---|---|
//! | `Reflow` | move, then reflow | same as preview |
//! | `CollisionResize` | move, then shrink neighbors | same as preview |
//! | `Plain` | move only | move; relocate active if it overlaps |
//!
//! # Invariants
//!
//! 1. Neither function mutates its input arrangement.
//! 2. Output contains exactly the input ids.
//! 3. `Reflow` and `Plain` commits leave no overlaps whenever a free slot
//!    exists within the scan limit.
//!
//! # Failure Modes
//!
//! - Unknown active id: the arrangement is returned unchanged (still
//!   reflowed under `Reflow`).
//! - `CollisionResize` may shrink a neighbor below its breakpoint minimum
//!   and does not guarantee the result is overlap-free.

use std::fmt;

use dashgrid_core::geometry::{GRID_COLUMNS, GridRect};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

use crate::component::{Component, ComponentId};
use crate::responsive::Breakpoint;
use crate::solver;

/// How overlaps caused by an interaction are resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CollisionPolicy {
    /// Re-pack everything with first-fit.
    #[default]
    Reflow,
    /// Shrink the neighbors the active component lands on.
    CollisionResize,
    /// Leave neighbors alone; bounce the active component on overlap.
    Plain,
}

impl CollisionPolicy {
    pub const ALL: [CollisionPolicy; 3] = [Self::Reflow, Self::CollisionResize, Self::Plain];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Reflow => "reflow",
            Self::CollisionResize => "collision_resize",
            Self::Plain => "plain",
        }
    }
}

impl fmt::Display for CollisionPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Placement context shared by every policy call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PolicyContext {
    pub policy: CollisionPolicy,
    pub breakpoint: Breakpoint,
    pub max_rows: u16,
}

impl PolicyContext {
    #[must_use]
    pub const fn new(policy: CollisionPolicy, breakpoint: Breakpoint) -> Self {
        Self {
            policy,
            breakpoint,
            max_rows: solver::MAX_SCAN_ROWS,
        }
    }

    #[must_use]
    pub const fn with_max_rows(mut self, max_rows: u16) -> Self {
        self.max_rows = max_rows;
        self
    }
}

/// Hypothetical arrangement if `active` were at `tentative`.
#[must_use]
pub fn preview(
    arrangement: &[Component],
    active: &ComponentId,
    tentative: GridRect,
    ctx: PolicyContext,
) -> Vec<Component> {
    let mut next = with_active_rect(arrangement, active, tentative);
    match ctx.policy {
        CollisionPolicy::Reflow => solver::reflow(&next, ctx.breakpoint, ctx.max_rows),
        CollisionPolicy::CollisionResize => {
            resize_overlapping(&mut next, active);
            next
        }
        CollisionPolicy::Plain => next,
    }
}

/// Final arrangement once `active` is released at `target`.
#[must_use]
pub fn commit(
    arrangement: &[Component],
    active: &ComponentId,
    target: GridRect,
    ctx: PolicyContext,
) -> Vec<Component> {
    match ctx.policy {
        CollisionPolicy::Reflow | CollisionPolicy::CollisionResize => {
            let next = preview(arrangement, active, target, ctx);
            debug!(
                target: "dashgrid::policy",
                policy = %ctx.policy,
                id = %active,
                col = target.col,
                row = target.row,
                width = target.width,
                height = target.height,
                "commit"
            );
            next
        }
        CollisionPolicy::Plain => {
            let mut next = with_active_rect(arrangement, active, target);
            if solver::has_collisions(&next, active) {
                let snapshot = next.clone();
                if let Some(comp) = next.iter_mut().find(|c| &c.id == active) {
                    solver::find_slot(&snapshot, comp, ctx.breakpoint, ctx.max_rows);
                    debug!(
                        target: "dashgrid::policy",
                        id = %active,
                        col = comp.rect.col,
                        row = comp.rect.row,
                        "plain commit overlapped; relocated"
                    );
                }
            }
            next
        }
    }
}

/// Shrink or shift every component overlapping `active` out of its way.
///
/// Neighbors are taken in collection order and each tries, in order:
///
/// 1. starts left of active: right edge pulled to active's left edge;
/// 2. extends past active's right edge: left edge pushed to active's right
///    edge (only if that column is inside the grid);
/// 3. starts above active: bottom edge pulled to active's top edge;
/// 4. extends below active: top edge pushed to active's bottom edge;
/// 5. otherwise collapses to 1×1 at its existing origin.
pub fn resize_overlapping(arrangement: &mut [Component], active: &ComponentId) {
    let Some(a) = arrangement.iter().find(|c| &c.id == active).map(|c| c.rect) else {
        return;
    };
    let victims = solver::overlapping(arrangement, active);

    for comp in arrangement.iter_mut().filter(|c| victims.contains(&c.id)) {
        let before = comp.rect;
        comp.rect = shrink_away(before, a);
        trace!(
            target: "dashgrid::policy",
            id = %comp.id,
            from = ?before,
            to = ?comp.rect,
            "neighbor reshaped"
        );
    }
}

fn shrink_away(n: GridRect, a: GridRect) -> GridRect {
    if n.col < a.col {
        return n.with_size(a.col - n.col, n.height);
    }
    if n.right() > a.right() {
        let col = a.right();
        let width = n.right() - col;
        if width >= 1 && col < GRID_COLUMNS {
            return GridRect::new(col, n.row, width, n.height);
        }
    }
    if n.row < a.row {
        return n.with_size(n.width, a.row - n.row);
    }
    if n.bottom() > a.bottom() {
        let row = a.bottom();
        return GridRect::new(n.col, row, n.width, n.bottom() - row);
    }
    n.with_size(1, 1)
}

fn with_active_rect(arrangement: &[Component], active: &ComponentId, rect: GridRect) -> Vec<Component> {
    arrangement
        .iter()
        .map(|c| {
            if &c.id == active {
                c.clone().with_rect(rect)
            } else {
                c.clone()
            }
        })
        .collect()
}
