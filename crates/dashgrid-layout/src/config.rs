#![forbid(unsafe_code)]

//! Engine configuration as data.
//!
//! Every tunable lives in one [`EngineConfig`] that can be loaded from TOML
//! or JSON (feature `config-files`). Missing fields take their defaults, so
//! an empty document yields [`EngineConfig::default`].
//!
//! ```toml
//! policy = "collision_resize"
//! max_scan_rows = 200
//!
//! [tuning]
//! damping = 0.2
//!
//! [breakpoints]
//! medium = 700
//! wide = 1100
//!
//! [canvas]
//! gutter = 10
//! ```
//!
//! Loaders validate after parsing and report every problem at once as
//! [`ConfigError::Validation`].

#[cfg(feature = "config-files")]
use std::path::Path;

use dashgrid_core::canvas::CanvasMetrics;
use serde::{Deserialize, Serialize};

#[cfg(feature = "config-files")]
use crate::error::ConfigError;
use crate::interaction::InteractionTuning;
use crate::policy::CollisionPolicy;
use crate::responsive::Breakpoints;
use crate::solver::MAX_SCAN_ROWS;

/// Default width, in pixels, of the resize grip band inside each edge.
pub const DEFAULT_GRIP_SIZE: f64 = 8.0;

/// Everything the [`LayoutEngine`](crate::engine::LayoutEngine) can be tuned with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Initial collision policy.
    pub policy: CollisionPolicy,
    pub tuning: InteractionTuning,
    pub breakpoints: Breakpoints,
    /// Pixel mapping; `canvas_width` is replaced on every viewport change.
    pub canvas: CanvasMetrics,
    /// Rows the first-fit search scans before giving up.
    pub max_scan_rows: u16,
    /// Pixels inside each component edge that count as a resize grip.
    pub grip_size: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            policy: CollisionPolicy::default(),
            tuning: InteractionTuning::default(),
            breakpoints: Breakpoints::default(),
            canvas: CanvasMetrics::default(),
            max_scan_rows: MAX_SCAN_ROWS,
            grip_size: DEFAULT_GRIP_SIZE,
        }
    }
}

impl EngineConfig {
    /// Set the collision policy (builder pattern).
    #[must_use]
    pub fn with_policy(mut self, policy: CollisionPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// Set the canvas metrics (builder pattern).
    #[must_use]
    pub fn with_canvas(mut self, canvas: CanvasMetrics) -> Self {
        self.canvas = canvas;
        self
    }

    /// Parse TOML and validate.
    #[cfg(feature = "config-files")]
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(s)?;
        config.validated()
    }

    /// Load and validate a TOML file.
    #[cfg(feature = "config-files")]
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_toml_str(&content)
    }

    /// Parse JSON and validate.
    #[cfg(feature = "config-files")]
    pub fn from_json_str(s: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(s)?;
        config.validated()
    }

    /// Load and validate a JSON file.
    #[cfg(feature = "config-files")]
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref())?;
        Self::from_json_str(&content)
    }

    #[cfg(feature = "config-files")]
    fn validated(self) -> Result<Self, ConfigError> {
        let errors = self.validate();
        if errors.is_empty() {
            Ok(self)
        } else {
            Err(ConfigError::Validation(errors))
        }
    }

    /// Validate all parameters are within acceptable ranges.
    ///
    /// Returns a list of validation errors. An empty list means the config
    /// is valid.
    #[must_use]
    pub fn validate(&self) -> Vec<String> {
        let mut errors = self.tuning.validate();

        let bp = self.breakpoints;
        if !(bp.medium.is_finite() && bp.medium >= 0.0) {
            errors.push(format!("breakpoints.medium must be >= 0, got {}", bp.medium));
        }
        if !(bp.wide.is_finite() && bp.wide >= bp.medium) {
            errors.push(format!(
                "breakpoints.wide must be >= breakpoints.medium ({}), got {}",
                bp.medium, bp.wide
            ));
        }

        let canvas = &self.canvas;
        if !(canvas.gutter.is_finite() && canvas.gutter >= 0.0) {
            errors.push(format!("canvas.gutter must be >= 0, got {}", canvas.gutter));
        }
        if !(canvas.padding.is_finite() && canvas.padding >= 0.0) {
            errors.push(format!("canvas.padding must be >= 0, got {}", canvas.padding));
        }
        if !(canvas.cell_height.is_finite() && canvas.cell_height > 0.0) {
            errors.push(format!(
                "canvas.cell_height must be > 0, got {}",
                canvas.cell_height
            ));
        }
        if !canvas.origin.is_finite() {
            errors.push(format!("canvas.origin must be finite, got {}", canvas.origin));
        }

        if self.max_scan_rows == 0 {
            errors.push("max_scan_rows must be > 0".into());
        }
        if !(self.grip_size.is_finite() && self.grip_size >= 0.0) {
            errors.push(format!("grip_size must be >= 0, got {}", self.grip_size));
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_valid() {
        let config = EngineConfig::default();
        assert!(config.validate().is_empty());
        assert_eq!(config.policy, CollisionPolicy::Reflow);
        assert_eq!(config.max_scan_rows, 100);
        assert_eq!(config.canvas.gutter, 8.0);
    }

    #[test]
    fn validate_collects_every_problem() {
        let mut config = EngineConfig::default();
        config.breakpoints = Breakpoints::new(900.0, 800.0);
        config.canvas.cell_height = 0.0;
        config.max_scan_rows = 0;
        config.grip_size = -1.0;
        let errors = config.validate();
        assert_eq!(errors.len(), 4, "{errors:?}");
        assert!(errors.iter().any(|e| e.starts_with("breakpoints.wide")));
        assert!(errors.iter().any(|e| e.starts_with("max_scan_rows")));
    }

    #[test]
    fn builders() {
        let config = EngineConfig::default()
            .with_policy(CollisionPolicy::Plain)
            .with_canvas(CanvasMetrics::with_width(800.0));
        assert_eq!(config.policy, CollisionPolicy::Plain);
        assert_eq!(config.canvas.canvas_width, 800.0);
    }

    #[test]
    fn serde_partial_json_uses_defaults() {
        let config: EngineConfig = serde_json::from_str(r#"{"policy":"plain"}"#).unwrap();
        assert_eq!(config.policy, CollisionPolicy::Plain);
        assert_eq!(config.tuning, InteractionTuning::default());
    }

    #[cfg(feature = "config-files")]
    mod files {
        use super::*;
        use std::io::Write;

        #[test]
        fn toml_roundtrip_through_file() {
            let mut file = tempfile::NamedTempFile::new().unwrap();
            writeln!(
                file,
                "policy = \"collision_resize\"\nmax_scan_rows = 50\n\n[tuning]\ndamping = 0.3\n\n[breakpoints]\nmedium = 600\nwide = 1000"
            )
            .unwrap();
            let config = EngineConfig::from_toml_file(file.path()).unwrap();
            assert_eq!(config.policy, CollisionPolicy::CollisionResize);
            assert_eq!(config.max_scan_rows, 50);
            assert_eq!(config.tuning.damping, 0.3);
            assert_eq!(config.tuning.snap_threshold, 0.75);
            assert_eq!(config.breakpoints.wide, 1000.0);
        }

        #[test]
        fn json_loader_validates() {
            let err = EngineConfig::from_json_str(r#"{"tuning":{"damping":2.0}}"#).unwrap_err();
            assert!(matches!(err, ConfigError::Validation(ref e) if e.len() == 1));
        }

        #[test]
        fn bad_toml_is_parse_error() {
            let err = EngineConfig::from_toml_str("policy = [").unwrap_err();
            assert!(matches!(err, ConfigError::Toml(_)));
        }

        #[test]
        fn missing_file_is_io_error() {
            let err = EngineConfig::from_json_file("/nonexistent/dashgrid.json").unwrap_err();
            assert!(matches!(err, ConfigError::Io(_)));
        }
    }
}
