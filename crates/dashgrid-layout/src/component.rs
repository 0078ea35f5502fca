#![forbid(unsafe_code)]

//! Components placed on the grid, and the id allocator that names them.

use std::fmt;

use dashgrid_core::geometry::GridRect;
use serde::{Deserialize, Serialize};

/// Opaque component identifier.
///
/// Ids handed out by [`IdAllocator`] are decimal strings ("1", "2", ...), but
/// imported documents may carry arbitrary strings.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ComponentId(String);

impl ComponentId {
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Numeric value if the id is a plain non-negative decimal integer.
    #[must_use]
    pub fn numeric(&self) -> Option<u64> {
        self.0.parse().ok()
    }
}

impl fmt::Display for ComponentId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ComponentId {
    fn from(value: &str) -> Self {
        Self(value.to_owned())
    }
}

impl From<String> for ComponentId {
    fn from(value: String) -> Self {
        Self(value)
    }
}

/// The two component families. Kind only selects defaults and minimum widths.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ComponentKind {
    /// Large visualisation tile; defaults to 6×6.
    #[serde(rename = "chart")]
    Primary,
    /// Small metric tile; defaults to 2×3.
    #[serde(rename = "kpi")]
    Secondary,
}

impl ComponentKind {
    pub const ALL: [ComponentKind; 2] = [Self::Primary, Self::Secondary];

    /// `(width, height)` of a freshly added component.
    #[must_use]
    pub const fn default_size(self) -> (u16, u16) {
        match self {
            Self::Primary => (6, 6),
            Self::Secondary => (2, 3),
        }
    }

    /// Serialized name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Primary => "chart",
            Self::Secondary => "kpi",
        }
    }

    /// Parse a serialized name.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "chart" => Some(Self::Primary),
            "kpi" => Some(Self::Secondary),
            _ => None,
        }
    }
}

impl fmt::Display for ComponentKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A placed component.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Component {
    pub id: ComponentId,
    pub kind: ComponentKind,
    pub rect: GridRect,
}

impl Component {
    /// A component of default size at the origin.
    #[must_use]
    pub fn new(id: impl Into<ComponentId>, kind: ComponentKind) -> Self {
        let (width, height) = kind.default_size();
        Self {
            id: id.into(),
            kind,
            rect: GridRect::from_size(width, height),
        }
    }

    /// Set the rectangle (builder pattern).
    #[must_use]
    pub fn with_rect(mut self, rect: GridRect) -> Self {
        self.rect = rect;
        self
    }
}

/// Hands out sequential decimal ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl Default for IdAllocator {
    fn default() -> Self {
        Self { next: 1 }
    }
}

impl IdAllocator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// The id the next call to [`allocate`](Self::allocate) returns.
    #[inline]
    pub const fn peek(&self) -> u64 {
        self.next
    }

    pub fn allocate(&mut self) -> ComponentId {
        let id = ComponentId(self.next.to_string());
        self.next = self.next.saturating_add(1);
        id
    }

    /// Continue after the largest numeric id in `ids`. Non-numeric ids are
    /// ignored; with no numeric ids the allocator restarts at 1.
    pub fn reseed<'a>(&mut self, ids: impl IntoIterator<Item = &'a ComponentId>) {
        let max = ids.into_iter().filter_map(ComponentId::numeric).max().unwrap_or(0);
        self.next = max.saturating_add(1);
    }
}
