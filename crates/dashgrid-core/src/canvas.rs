#![forbid(unsafe_code)]

//! Mapping between canvas pixels and grid cells.
//!
//! The canvas reserves `padding` pixels of horizontal chrome, lays out
//! [`GRID_COLUMNS`] columns separated by `gutter` pixels, and offsets every
//! cell by `origin` pixels from the canvas's top-left corner. Rows have a
//! fixed pixel height.
//!
//! ```text
//!   origin
//!   |<->|<- cell ->|gutter|<- cell ->|gutter| ... |<- cell ->|
//! ```
//!
//! # Invariants
//!
//! 1. `cell_width() >= 0` for any canvas width (narrow canvases collapse to 0).
//! 2. [`CanvasMetrics::cell_at`] always yields a column in `0..GRID_COLUMNS`
//!    and a non-negative row.
//! 3. A rect's pixel size includes the gutters it spans internally, so two
//!    adjacent rects are separated by exactly one gutter.

use serde::{Deserialize, Serialize};

use crate::geometry::{FloatRect, GRID_COLUMNS, GridRect};

/// A point in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelPoint {
    pub x: f64,
    pub y: f64,
}

impl PixelPoint {
    #[inline]
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

/// A rectangle in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct PixelRect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl PixelRect {
    #[inline]
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    #[inline]
    pub fn right(&self) -> f64 {
        self.x + self.width
    }

    #[inline]
    pub fn bottom(&self) -> f64 {
        self.y + self.height
    }

    /// Half-open containment test.
    #[inline]
    pub fn contains(&self, point: PixelPoint) -> bool {
        point.x >= self.x && point.x < self.right() && point.y >= self.y && point.y < self.bottom()
    }
}

/// Pixel metrics of the canvas the grid is drawn on.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CanvasMetrics {
    /// Total canvas width in pixels.
    pub canvas_width: f64,
    /// Space between adjacent cells.
    pub gutter: f64,
    /// Horizontal chrome subtracted from the canvas width.
    pub padding: f64,
    /// Offset of cell (0, 0) from the canvas corner.
    pub origin: f64,
    /// Height of one row.
    pub cell_height: f64,
}

impl Default for CanvasMetrics {
    fn default() -> Self {
        Self {
            canvas_width: 1200.0,
            gutter: 8.0,
            padding: 30.0,
            origin: 15.0,
            cell_height: 50.0,
        }
    }
}

impl CanvasMetrics {
    /// Default metrics for a canvas of the given width.
    #[must_use]
    pub fn with_width(canvas_width: f64) -> Self {
        Self {
            canvas_width,
            ..Self::default()
        }
    }

    /// Set the canvas width (builder pattern).
    #[must_use]
    pub fn with_canvas_width(mut self, canvas_width: f64) -> Self {
        self.canvas_width = canvas_width;
        self
    }

    /// Width of a single column.
    #[inline]
    pub fn cell_width(&self) -> f64 {
        let gutters = f64::from(GRID_COLUMNS - 1) * self.gutter;
        ((self.canvas_width - self.padding - gutters) / f64::from(GRID_COLUMNS)).max(0.0)
    }

    /// Horizontal distance between the left edges of adjacent columns.
    #[inline]
    pub fn column_pitch(&self) -> f64 {
        self.cell_width() + self.gutter
    }

    /// Vertical distance between the top edges of adjacent rows.
    #[inline]
    pub fn row_pitch(&self) -> f64 {
        self.cell_height + self.gutter
    }

    /// Pixel box for a fractional grid rectangle.
    pub fn to_pixels_f(&self, rect: FloatRect) -> PixelRect {
        let x = rect.col * self.column_pitch() + self.origin;
        let y = rect.row * self.row_pitch() + self.origin;
        let width = rect.width * self.cell_width() + (rect.width - 1.0).max(0.0) * self.gutter;
        let height = rect.height * self.cell_height + (rect.height - 1.0).max(0.0) * self.gutter;
        PixelRect::new(x, y, width, height)
    }

    /// Pixel box for an integer grid rectangle.
    #[inline]
    pub fn to_pixels(&self, rect: GridRect) -> PixelRect {
        self.to_pixels_f(rect.into())
    }

    /// Fractional grid coordinates of a canvas point, unclamped.
    pub fn to_grid_f(&self, point: PixelPoint) -> (f64, f64) {
        let pitch = self.column_pitch();
        let col = if pitch > 0.0 {
            (point.x - self.origin) / pitch
        } else {
            0.0
        };
        let row = (point.y - self.origin) / self.row_pitch();
        (col, row)
    }

    /// Cell containing a canvas point: column clamped to `0..GRID_COLUMNS`,
    /// row clamped to `>= 0`.
    pub fn cell_at(&self, point: PixelPoint) -> (u16, u16) {
        let (col, row) = self.to_grid_f(point);
        let max_col = f64::from(GRID_COLUMNS - 1);
        let col = if col.is_finite() {
            col.floor().clamp(0.0, max_col)
        } else {
            0.0
        };
        let row = if row.is_finite() {
            row.floor().clamp(0.0, f64::from(u16::MAX))
        } else {
            0.0
        };
        (col as u16, row as u16)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn cell_width_from_canvas() {
        // (1200 - 30 - 88) / 12
        let m = CanvasMetrics::with_width(1200.0);
        assert!(approx(m.cell_width(), 1082.0 / 12.0));
    }

    #[test]
    fn narrow_canvas_collapses_cells() {
        let m = CanvasMetrics::with_width(50.0);
        assert_eq!(m.cell_width(), 0.0);
        assert_eq!(m.cell_at(PixelPoint::new(500.0, 20.0)).0, 11);
    }

    #[test]
    fn pixel_box_includes_internal_gutters() {
        let m = CanvasMetrics::with_width(1200.0);
        let cw = m.cell_width();
        let px = m.to_pixels(GridRect::new(2, 1, 3, 2));
        assert!(approx(px.x, 2.0 * cw + 16.0 + 15.0));
        assert!(approx(px.y, 50.0 + 8.0 + 15.0));
        assert!(approx(px.width, 3.0 * cw + 16.0));
        assert!(approx(px.height, 100.0 + 8.0));
    }

    #[test]
    fn adjacent_boxes_separated_by_one_gutter() {
        let m = CanvasMetrics::with_width(1000.0);
        let left = m.to_pixels(GridRect::new(0, 0, 4, 1));
        let right = m.to_pixels(GridRect::new(4, 0, 4, 1));
        assert!(approx(right.x - left.right(), m.gutter));
    }

    #[test]
    fn cell_at_floors_and_clamps() {
        let m = CanvasMetrics::with_width(1200.0);
        let inside = m.to_pixels(GridRect::new(3, 2, 1, 1));
        let point = PixelPoint::new(inside.x + 1.0, inside.y + 1.0);
        assert_eq!(m.cell_at(point), (3, 2));
        assert_eq!(m.cell_at(PixelPoint::new(-40.0, -40.0)), (0, 0));
        assert_eq!(m.cell_at(PixelPoint::new(5000.0, 0.0)), (11, 0));
    }

    #[test]
    fn to_grid_inverts_to_pixels_origin() {
        let m = CanvasMetrics::with_width(900.0);
        let px = m.to_pixels(GridRect::new(5, 7, 1, 1));
        let (col, row) = m.to_grid_f(PixelPoint::new(px.x, px.y));
        assert!(approx(col, 5.0));
        assert!(approx(row, 7.0));
    }
}
