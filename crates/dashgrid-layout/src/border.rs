#![forbid(unsafe_code)]

//! Shared-border handles between adjacent components.
//!
//! Two components share a *vertical* border when one's right edge equals the
//! other's left edge and their row ranges genuinely intersect (touching
//! corners do not count); *horizontal* borders are the transpose. Dragging a
//! handle moves the shared edge, growing one side and shrinking the other.
//!
//! Handles are a derived projection of the model: [`BorderHandleCache`]
//! recomputes them from scratch whenever the model generation changes and
//! never edits them in place.
//!
//! # Invariants
//!
//! 1. `first` is the left (vertical) or top (horizontal) component.
//! 2. `span_start < span_end` for every handle.
//! 3. A border drag keeps both sides at least one cell wide/tall and keeps
//!    the far edges of both components fixed.

use dashgrid_core::canvas::{CanvasMetrics, PixelRect};
use dashgrid_core::geometry::{GRID_COLUMNS, GridRect, ranges_intersect};
use serde::{Deserialize, Serialize};
use tracing::trace;

use crate::component::{Component, ComponentId};
use crate::model::GridModel;

/// Orientation of the shared edge.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BorderOrientation {
    /// A vertical line between a left and a right component; drags resize columns.
    Vertical,
    /// A horizontal line between a top and a bottom component; drags resize rows.
    Horizontal,
}

/// A draggable shared edge between two components.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BorderHandle {
    pub orientation: BorderOrientation,
    /// Left or top component.
    pub first: ComponentId,
    /// Right or bottom component.
    pub second: ComponentId,
    /// Column (vertical) or row (horizontal) of the shared edge.
    pub position: u16,
    /// Start of the shared extent along the edge.
    pub span_start: u16,
    /// End (exclusive) of the shared extent along the edge.
    pub span_end: u16,
}

impl BorderHandle {
    /// Pixel band the handle occupies: centered on the gutter between the
    /// two components, one gutter either side of its midline.
    #[must_use]
    pub fn pixel_rect(&self, metrics: &CanvasMetrics) -> PixelRect {
        let span = f64::from(self.span_end - self.span_start);
        let start = f64::from(self.span_start);
        let edge = f64::from(self.position);
        let back = metrics.gutter * 1.5;
        match self.orientation {
            BorderOrientation::Vertical => PixelRect::new(
                edge * metrics.column_pitch() + metrics.origin - back,
                start * metrics.row_pitch() + metrics.origin,
                metrics.gutter * 2.0,
                span * metrics.cell_height + (span - 1.0) * metrics.gutter,
            ),
            BorderOrientation::Horizontal => PixelRect::new(
                start * metrics.column_pitch() + metrics.origin,
                edge * metrics.row_pitch() + metrics.origin - back,
                span * metrics.cell_width() + (span - 1.0) * metrics.gutter,
                metrics.gutter * 2.0,
            ),
        }
    }
}

/// Handle between `a` and `b` if they share a vertical edge.
fn vertical_between(a: &Component, b: &Component) -> Option<BorderHandle> {
    let (ra, rb) = (a.rect, b.rect);
    let touching = ra.right() == rb.col || rb.right() == ra.col;
    if !touching || !ranges_intersect(ra.row, ra.bottom(), rb.row, rb.bottom()) {
        return None;
    }
    let (left, right) = if ra.col < rb.col { (a, b) } else { (b, a) };
    Some(BorderHandle {
        orientation: BorderOrientation::Vertical,
        first: left.id.clone(),
        second: right.id.clone(),
        position: left.rect.right(),
        span_start: ra.row.max(rb.row),
        span_end: ra.bottom().min(rb.bottom()),
    })
}

/// Handle between `a` and `b` if they share a horizontal edge.
fn horizontal_between(a: &Component, b: &Component) -> Option<BorderHandle> {
    let (ra, rb) = (a.rect, b.rect);
    let touching = ra.bottom() == rb.row || rb.bottom() == ra.row;
    if !touching || !ranges_intersect(ra.col, ra.right(), rb.col, rb.right()) {
        return None;
    }
    let (top, bottom) = if ra.row < rb.row { (a, b) } else { (b, a) };
    Some(BorderHandle {
        orientation: BorderOrientation::Horizontal,
        first: top.id.clone(),
        second: bottom.id.clone(),
        position: top.rect.bottom(),
        span_start: ra.col.max(rb.col),
        span_end: ra.right().min(rb.right()),
    })
}

/// Every shared border in the arrangement, pairs in collection order.
#[must_use]
pub fn border_handles(arrangement: &[Component]) -> Vec<BorderHandle> {
    let mut handles = Vec::new();
    for (i, a) in arrangement.iter().enumerate() {
        for b in &arrangement[i + 1..] {
            handles.extend(vertical_between(a, b));
            handles.extend(horizontal_between(a, b));
        }
    }
    handles
}

/// Border handles memoized on the model generation.
#[derive(Debug, Clone, Default)]
pub struct BorderHandleCache {
    generation: Option<u64>,
    handles: Vec<BorderHandle>,
}

impl BorderHandleCache {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute if the model changed since the last call. Returns `true`
    /// when the handle set was recomputed.
    pub fn refresh(&mut self, model: &GridModel) -> bool {
        if self.generation == Some(model.generation()) {
            return false;
        }
        self.handles = border_handles(model.components());
        self.generation = Some(model.generation());
        trace!(
            target: "dashgrid::interaction",
            generation = model.generation(),
            handles = self.handles.len(),
            "border handles recomputed"
        );
        true
    }

    /// Handles as of the last refresh.
    #[inline]
    pub fn handles(&self) -> &[BorderHandle] {
        &self.handles
    }
}

/// Move the shared edge between `handle.first` and `handle.second` toward
/// the pointer cell `(col, row)`.
///
/// Current rects are read from `model` (the pair may have been resized by
/// earlier moves); which component is left/top is re-derived from them.
/// Returns the new `(first, second)` rects, or `None` if either component is
/// gone or the move would leave a side empty.
pub fn drag_border(
    model: &mut GridModel,
    handle: &BorderHandle,
    pointer_cell: (u16, u16),
) -> Option<(GridRect, GridRect)> {
    let a = model.rect(&handle.first)?;
    let b = model.rect(&handle.second)?;

    let (first_id, second_id, first, second) = match handle.orientation {
        BorderOrientation::Vertical if b.col < a.col => (&handle.second, &handle.first, b, a),
        BorderOrientation::Horizontal if b.row < a.row => (&handle.second, &handle.first, b, a),
        _ => (&handle.first, &handle.second, a, b),
    };

    let (new_first, new_second) = match handle.orientation {
        BorderOrientation::Vertical => {
            let min = i32::from(first.col) + 1;
            let max = i32::from(second.right()) - 1;
            let edge = i32::from(pointer_cell.0).min(max).max(min);
            let first_width = edge - i32::from(first.col);
            let second_width = i32::from(second.right()) - edge;
            if first_width < 1 || second_width < 1 || edge > i32::from(GRID_COLUMNS) {
                return None;
            }
            (
                first.with_size(first_width as u16, first.height),
                GridRect::new(edge as u16, second.row, second_width as u16, second.height),
            )
        }
        BorderOrientation::Horizontal => {
            let min = i32::from(first.row) + 1;
            let max = i32::from(second.bottom()) - 1;
            let edge = i32::from(pointer_cell.1).min(max).max(min);
            let first_height = edge - i32::from(first.row);
            let second_height = i32::from(second.bottom()) - edge;
            if first_height < 1 || second_height < 1 {
                return None;
            }
            (
                first.with_size(first.width, first_height as u16),
                GridRect::new(second.col, edge as u16, second.width, second_height as u16),
            )
        }
    };

    if new_first != first || new_second != second {
        model.set_rect(first_id, new_first);
        model.set_rect(second_id, new_second);
    }
    Some((new_first, new_second))
}
