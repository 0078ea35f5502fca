#![forbid(unsafe_code)]

//! Canonical pointer and viewport events.
//!
//! Coordinates are canvas-local pixels: the host has already subtracted the
//! canvas's page offset. Events derive `Clone` and `PartialEq` for use in
//! tests and trace replay.

use serde::{Deserialize, Serialize};

use crate::canvas::PixelPoint;

/// Pointer phase reported by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
}

/// A pointer event in canvas-local pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub position: PixelPoint,
}

impl PointerEvent {
    #[must_use]
    pub const fn new(phase: PointerPhase, x: f64, y: f64) -> Self {
        Self {
            phase,
            position: PixelPoint::new(x, y),
        }
    }

    #[must_use]
    pub const fn down(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Down, x, y)
    }

    #[must_use]
    pub const fn moved(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Move, x, y)
    }

    #[must_use]
    pub const fn up(x: f64, y: f64) -> Self {
        Self::new(PointerPhase::Up, x, y)
    }
}

/// Horizontal edge touched by a resize grip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HorizontalEdge {
    West,
    East,
}

/// Vertical edge touched by a resize grip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum VerticalEdge {
    North,
    South,
}

/// One of the eight resize grips around a component.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ResizeDirection {
    North,
    South,
    East,
    West,
    NorthEast,
    NorthWest,
    SouthEast,
    SouthWest,
}

impl ResizeDirection {
    /// All directions, edges first.
    pub const ALL: [ResizeDirection; 8] = [
        Self::North,
        Self::South,
        Self::East,
        Self::West,
        Self::NorthEast,
        Self::NorthWest,
        Self::SouthEast,
        Self::SouthWest,
    ];

    /// Grip touching the given edges; `None` when neither is set.
    #[must_use]
    pub const fn from_edges(
        horizontal: Option<HorizontalEdge>,
        vertical: Option<VerticalEdge>,
    ) -> Option<Self> {
        use HorizontalEdge::{East, West};
        use VerticalEdge::{North, South};
        Some(match (horizontal, vertical) {
            (None, None) => return None,
            (None, Some(North)) => Self::North,
            (None, Some(South)) => Self::South,
            (Some(East), None) => Self::East,
            (Some(West), None) => Self::West,
            (Some(East), Some(North)) => Self::NorthEast,
            (Some(West), Some(North)) => Self::NorthWest,
            (Some(East), Some(South)) => Self::SouthEast,
            (Some(West), Some(South)) => Self::SouthWest,
        })
    }

    /// The horizontal edge this grip moves, if any.
    #[must_use]
    pub const fn horizontal_edge(self) -> Option<HorizontalEdge> {
        match self {
            Self::West | Self::NorthWest | Self::SouthWest => Some(HorizontalEdge::West),
            Self::East | Self::NorthEast | Self::SouthEast => Some(HorizontalEdge::East),
            Self::North | Self::South => None,
        }
    }

    /// The vertical edge this grip moves, if any.
    #[must_use]
    pub const fn vertical_edge(self) -> Option<VerticalEdge> {
        match self {
            Self::North | Self::NorthEast | Self::NorthWest => Some(VerticalEdge::North),
            Self::South | Self::SouthEast | Self::SouthWest => Some(VerticalEdge::South),
            Self::East | Self::West => None,
        }
    }

    /// Whether resizing in this direction moves the rect's column origin.
    #[must_use]
    pub const fn moves_col(self) -> bool {
        matches!(self.horizontal_edge(), Some(HorizontalEdge::West))
    }

    /// Whether resizing in this direction moves the rect's row origin.
    #[must_use]
    pub const fn moves_row(self) -> bool {
        matches!(self.vertical_edge(), Some(VerticalEdge::North))
    }

    /// Stable lowercase name, used in logs and traces.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::North => "north",
            Self::South => "south",
            Self::East => "east",
            Self::West => "west",
            Self::NorthEast => "north_east",
            Self::NorthWest => "north_west",
            Self::SouthEast => "south_east",
            Self::SouthWest => "south_west",
        }
    }
}
