#![forbid(unsafe_code)]

//! First-order exponential smoothing toward a moving target.
//!
//! Each step moves the current value a fixed fraction of the remaining
//! distance:
//!
//!   current' = current + (target - current) × factor
//!
//! # Invariants
//!
//! 1. With `factor` in `[0, 1]` a step never overshoots the target.
//! 2. The distance to the target shrinks by exactly `(1 - factor)` per step;
//!    the target is reached only in the limit. [`SmoothedRect::is_settled`]
//!    treats anything within [`SETTLE_EPSILON`] as settled.
//!
//! # Failure Modes
//!
//! - Non-finite factor: treated as `1.0` (jump to target).
//! - Factor outside `[0, 1]`: clamped.

use crate::geometry::{FloatRect, GridRect};

/// Default fraction of the remaining distance covered per frame.
pub const DEFAULT_DAMPING: f64 = 0.12;

/// Distance below which a smoothed value is considered settled.
pub const SETTLE_EPSILON: f64 = 0.01;

/// Advance `current` one step toward `target`.
#[inline]
#[must_use]
pub fn smooth_step(current: f64, target: f64, factor: f64) -> f64 {
    let factor = if factor.is_finite() {
        factor.clamp(0.0, 1.0)
    } else {
        1.0
    };
    current + (target - current) * factor
}

/// A fractional rectangle converging toward an integer snap target.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SmoothedRect {
    current: FloatRect,
    target: GridRect,
    damping: f64,
}

impl SmoothedRect {
    /// Start at rest on `rect`.
    #[must_use]
    pub fn new(rect: GridRect) -> Self {
        Self {
            current: rect.into(),
            target: rect,
            damping: DEFAULT_DAMPING,
        }
    }

    /// Set the per-frame damping factor (builder pattern).
    #[must_use]
    pub fn with_damping(mut self, damping: f64) -> Self {
        self.damping = damping;
        self
    }

    /// Current fractional position.
    #[inline]
    pub const fn current(&self) -> FloatRect {
        self.current
    }

    /// Integer rectangle the value converges toward.
    #[inline]
    pub const fn target(&self) -> GridRect {
        self.target
    }

    /// Retarget without moving the current value.
    pub fn set_target(&mut self, target: GridRect) {
        self.target = target;
    }

    /// Advance one frame. Returns `true` while not yet settled.
    pub fn step(&mut self) -> bool {
        let goal = FloatRect::from(self.target);
        let next = FloatRect::new(
            smooth_step(self.current.col, goal.col, self.damping),
            smooth_step(self.current.row, goal.row, self.damping),
            smooth_step(self.current.width, goal.width, self.damping),
            smooth_step(self.current.height, goal.height, self.damping),
        );
        self.current = next;
        !self.is_settled()
    }

    /// Whether every field is within [`SETTLE_EPSILON`] of the target.
    pub fn is_settled(&self) -> bool {
        self.current.max_distance(&FloatRect::from(self.target)) < SETTLE_EPSILON
    }

    /// Jump onto the target.
    pub fn settle(&mut self) {
        self.current = self.target.into();
    }
}
