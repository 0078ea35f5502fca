#![forbid(unsafe_code)]

//! Breakpoint classification and breakpoint-indexed values.
//!
//! [`Responsive<T>`] maps [`Breakpoint`] tiers to values with inheritance
//! from smaller tiers: if no value is set for a tier, the value of the next
//! smaller tier is used.
//!
//! ```ignore
//! use dashgrid_layout::{Breakpoint, Responsive};
//!
//! let min_cols = Responsive::new(12).at(Breakpoint::Medium, 4);
//! assert_eq!(min_cols.resolve(Breakpoint::Wide), &4); // inherits Medium
//! ```
//!
//! # Invariants
//!
//! 1. `Narrow` always has a value (the base passed to `new()`).
//! 2. A missing tier inherits from the nearest smaller tier with a value.
//! 3. `resolve()` never fails.
//! 4. `Breakpoints::classify` is monotonic in the viewport width.
//!
//! # Failure Modes
//!
//! - Non-finite viewport widths classify as `Wide`.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::component::ComponentKind;

/// Viewport tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Breakpoint {
    /// Phone-sized viewports.
    Narrow = 0,
    /// Tablet-sized viewports.
    Medium = 1,
    /// Desktop; the authoritative arrangement lives here.
    Wide = 2,
}

impl Breakpoint {
    pub const ALL: [Breakpoint; 3] = [Self::Narrow, Self::Medium, Self::Wide];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Narrow => "narrow",
            Self::Medium => "medium",
            Self::Wide => "wide",
        }
    }

    #[inline]
    pub const fn is_wide(self) -> bool {
        matches!(self, Self::Wide)
    }
}

impl fmt::Display for Breakpoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Viewport width thresholds, in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Breakpoints {
    /// Widths below this are `Narrow`.
    pub medium: f64,
    /// Widths below this (and at least `medium`) are `Medium`.
    pub wide: f64,
}

impl Breakpoints {
    pub const DEFAULT: Self = Self {
        medium: 768.0,
        wide: 1024.0,
    };

    #[must_use]
    pub const fn new(medium: f64, wide: f64) -> Self {
        Self { medium, wide }
    }

    /// Classify a viewport width.
    #[must_use]
    pub fn classify(&self, viewport_width: f64) -> Breakpoint {
        if viewport_width < self.medium {
            Breakpoint::Narrow
        } else if viewport_width < self.wide {
            Breakpoint::Medium
        } else {
            Breakpoint::Wide
        }
    }
}

impl Default for Breakpoints {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// A breakpoint-aware value with inheritance from smaller tiers.
///
/// `Narrow` holds the base value; `Medium` and `Wide` are optional overrides.
/// Resolution walks downward from the requested tier until a value is found.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Responsive<T> {
    base: T,
    /// Overrides for `Medium` (slot 0) and `Wide` (slot 1).
    overrides: [Option<T>; 2],
}

impl<T: Clone> Responsive<T> {
    /// Create a responsive value with a base value for `Narrow`.
    #[must_use]
    pub fn new(base: T) -> Self {
        Self {
            base,
            overrides: [None, None],
        }
    }

    /// Set the value for a specific breakpoint (builder pattern).
    #[must_use]
    pub fn at(mut self, bp: Breakpoint, value: T) -> Self {
        self.set(bp, value);
        self
    }

    /// Set the value for a specific breakpoint (mutating).
    pub fn set(&mut self, bp: Breakpoint, value: T) {
        match bp {
            Breakpoint::Narrow => self.base = value,
            _ => self.overrides[bp as usize - 1] = Some(value),
        }
    }

    /// Resolve the value for a given breakpoint.
    #[must_use]
    pub fn resolve(&self, bp: Breakpoint) -> &T {
        self.overrides[..bp as usize]
            .iter()
            .rev()
            .find_map(Option::as_ref)
            .unwrap_or(&self.base)
    }

    /// Resolve and clone the value for a given breakpoint.
    #[must_use]
    pub fn resolve_cloned(&self, bp: Breakpoint) -> T {
        self.resolve(bp).clone()
    }
}

// ---------------------------------------------------------------------------
// Minimum widths
// ---------------------------------------------------------------------------

/// Per-breakpoint minimum column span for a component kind.
///
/// Primary tiles span the full row on narrow screens; on wide screens every
/// kind may shrink to a single column.
#[must_use]
pub fn min_column_table(kind: ComponentKind) -> Responsive<u16> {
    match kind {
        ComponentKind::Primary => Responsive::new(12)
            .at(Breakpoint::Medium, 4)
            .at(Breakpoint::Wide, 1),
        ComponentKind::Secondary => Responsive::new(6)
            .at(Breakpoint::Medium, 2)
            .at(Breakpoint::Wide, 1),
    }
}

/// Minimum column span for `kind` at `bp`.
#[must_use]
pub fn min_columns(kind: ComponentKind, bp: Breakpoint) -> u16 {
    min_column_table(kind).resolve_cloned(bp)
}
