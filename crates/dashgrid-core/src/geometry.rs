#![forbid(unsafe_code)]

//! Grid-space geometric primitives.
//!
//! The grid has a fixed span of [`GRID_COLUMNS`] columns and an unbounded
//! number of rows. All committed rectangles are integer-addressed; the
//! fractional [`FloatRect`] is only used while an interaction is in flight.
//!
//! # Invariants
//!
//! 1. Intervals are half-open: a rect covers columns `col..col + width` and
//!    rows `row..row + height`.
//! 2. Touching edges never count as overlap.
//! 3. A committed rect satisfies `col + width <= GRID_COLUMNS`, `width >= 1`,
//!    `height >= 1` (see [`GridRect::is_within_grid`]).

use serde::{Deserialize, Serialize};

/// Number of columns spanned by the grid.
pub const GRID_COLUMNS: u16 = 12;

/// An integer rectangle in grid cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct GridRect {
    /// Left edge (inclusive).
    pub col: u16,
    /// Top edge (inclusive).
    pub row: u16,
    /// Width in columns.
    pub width: u16,
    /// Height in rows.
    pub height: u16,
}

impl GridRect {
    /// Create a new rectangle.
    #[inline]
    pub const fn new(col: u16, row: u16, width: u16, height: u16) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    /// Create a rectangle at the origin with the given size.
    #[inline]
    pub const fn from_size(width: u16, height: u16) -> Self {
        Self::new(0, 0, width, height)
    }

    /// Right edge (exclusive).
    #[inline]
    pub const fn right(&self) -> u16 {
        self.col.saturating_add(self.width)
    }

    /// Bottom edge (exclusive).
    #[inline]
    pub const fn bottom(&self) -> u16 {
        self.row.saturating_add(self.height)
    }

    /// Check if the rectangle has zero area.
    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    /// Check if a cell is inside the rectangle.
    #[inline]
    pub const fn contains(&self, col: u16, row: u16) -> bool {
        col >= self.col && col < self.right() && row >= self.row && row < self.bottom()
    }

    /// Whether the two rectangles share interior area.
    ///
    /// Both axes must intersect with non-zero extent; `a.right() == b.col`
    /// is adjacency, not overlap.
    #[inline]
    pub const fn overlaps(&self, other: &GridRect) -> bool {
        !(self.right() <= other.col
            || other.right() <= self.col
            || self.bottom() <= other.row
            || other.bottom() <= self.row)
    }

    /// Whether the rectangle respects the grid's column span and minimum size.
    #[inline]
    pub const fn is_within_grid(&self) -> bool {
        self.width >= 1 && self.height >= 1 && self.right() <= GRID_COLUMNS
    }

    /// Return a copy with the same size placed at `(col, row)`.
    #[inline]
    #[must_use]
    pub const fn at(self, col: u16, row: u16) -> Self {
        Self::new(col, row, self.width, self.height)
    }

    /// Return a copy with the given size and the same origin.
    #[inline]
    #[must_use]
    pub const fn with_size(self, width: u16, height: u16) -> Self {
        Self::new(self.col, self.row, width, height)
    }

    /// Clamp into the grid: width to `1..=GRID_COLUMNS`, height to at least 1,
    /// and shift left until the right edge fits.
    #[must_use]
    pub fn clamped_to_grid(self) -> Self {
        let width = self.width.clamp(1, GRID_COLUMNS);
        let height = self.height.max(1);
        let col = self.col.min(GRID_COLUMNS - width);
        Self::new(col, self.row, width, height)
    }
}

/// Whether the half-open ranges `[start_a, end_a)` and `[start_b, end_b)`
/// genuinely intersect. Touching ranges do not.
#[inline]
pub fn ranges_intersect(start_a: u16, end_a: u16, start_b: u16, end_b: u16) -> bool {
    start_a.max(start_b) < end_a.min(end_b)
}

/// A fractional rectangle in grid units, used for smoothed motion.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct FloatRect {
    pub col: f64,
    pub row: f64,
    pub width: f64,
    pub height: f64,
}

impl FloatRect {
    /// Create a new fractional rectangle.
    #[inline]
    pub const fn new(col: f64, row: f64, width: f64, height: f64) -> Self {
        Self {
            col,
            row,
            width,
            height,
        }
    }

    /// Round each field to the nearest cell, clamped to the grid.
    #[must_use]
    pub fn round(&self) -> GridRect {
        GridRect::new(
            round_to_cell(self.col),
            round_to_cell(self.row),
            round_to_cell(self.width),
            round_to_cell(self.height),
        )
        .clamped_to_grid()
    }

    /// Largest per-field distance to another rectangle.
    #[must_use]
    pub fn max_distance(&self, other: &FloatRect) -> f64 {
        (self.col - other.col)
            .abs()
            .max((self.row - other.row).abs())
            .max((self.width - other.width).abs())
            .max((self.height - other.height).abs())
    }
}

impl From<GridRect> for FloatRect {
    fn from(rect: GridRect) -> Self {
        Self::new(
            f64::from(rect.col),
            f64::from(rect.row),
            f64::from(rect.width),
            f64::from(rect.height),
        )
    }
}

fn round_to_cell(value: f64) -> u16 {
    if !value.is_finite() || value <= 0.0 {
        return 0;
    }
    value.round().min(f64::from(u16::MAX)) as u16
}
