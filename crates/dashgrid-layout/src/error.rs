//! Error types for fallible boundaries: document import and config loading.
//!
//! Interaction and placement never fail; geometric impossibilities are
//! clamped and collisions are resolved by the active policy.

use thiserror::Error;

use crate::component::ComponentId;

/// Why a layout document was rejected. The engine is untouched on error.
#[derive(Debug, Error)]
pub enum DocumentError {
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("layout document has no `components` field")]
    MissingComponents,

    #[error("`components` must be an array")]
    ComponentsNotSequence,

    #[error("component #{index} is malformed: {reason}")]
    InvalidComponent { index: usize, reason: String },

    #[error("duplicate component id: {id}")]
    DuplicateId { id: ComponentId },

    #[error("component {id} has invalid geometry: {reason}")]
    InvalidGeometry { id: ComponentId, reason: String },
}

impl DocumentError {
    #[must_use]
    pub fn invalid_component(index: usize, reason: impl Into<String>) -> Self {
        Self::InvalidComponent {
            index,
            reason: reason.into(),
        }
    }

    #[must_use]
    pub fn invalid_geometry(id: ComponentId, reason: impl Into<String>) -> Self {
        Self::InvalidGeometry {
            id,
            reason: reason.into(),
        }
    }
}

/// Errors from loading or validating an [`EngineConfig`](crate::config::EngineConfig).
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[cfg(feature = "config-files")]
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("validation errors: {}", .0.join("; "))]
    Validation(Vec<String>),
}
