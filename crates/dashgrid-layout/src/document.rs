#![forbid(unsafe_code)]

//! Layout documents: the JSON import/export format.
//!
//! ```json
//! {
//!   "components": [
//!     { "id": "1", "type": "chart",
//!       "position": { "col": 0, "row": 0, "width": 6, "height": 6 } }
//!   ],
//!   "version": "1.0.0",
//!   "lastModified": "2024-05-01T12:00:00.000Z"
//! }
//! ```
//!
//! `version` is carried but not interpreted; `lastModified` is advisory.
//!
//! # Invariants
//!
//! 1. A document that passes [`LayoutDocument::validate`] has unique ids and
//!    every position inside the grid with non-zero size.
//! 2. Parsing checks shape before content, so a missing `components` field
//!    and a non-array one are reported distinctly from malformed entries.

use chrono::{DateTime, FixedOffset, SecondsFormat, Utc};
use dashgrid_core::geometry::{GRID_COLUMNS, GridRect};
use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::{Component, ComponentId, ComponentKind};
use crate::error::DocumentError;

/// Version string written on export.
pub const LAYOUT_DOCUMENT_VERSION: &str = "1.0.0";

/// One component entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ComponentRecord {
    pub id: ComponentId,
    #[serde(rename = "type")]
    pub kind: ComponentKind,
    pub position: GridRect,
}

impl From<&Component> for ComponentRecord {
    fn from(component: &Component) -> Self {
        Self {
            id: component.id.clone(),
            kind: component.kind,
            position: component.rect,
        }
    }
}

impl From<ComponentRecord> for Component {
    fn from(record: ComponentRecord) -> Self {
        Component::new(record.id, record.kind).with_rect(record.position)
    }
}

/// A serialized arrangement.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LayoutDocument {
    pub components: Vec<ComponentRecord>,
    #[serde(default = "default_version")]
    pub version: String,
    #[serde(rename = "lastModified", default)]
    pub last_modified: String,
}

fn default_version() -> String {
    LAYOUT_DOCUMENT_VERSION.to_owned()
}

impl LayoutDocument {
    /// Document for `arrangement`, stamped with the current time.
    #[must_use]
    pub fn from_components(arrangement: &[Component]) -> Self {
        Self::at(arrangement, Utc::now())
    }

    /// Document for `arrangement`, stamped with `when`.
    #[must_use]
    pub fn at(arrangement: &[Component], when: DateTime<Utc>) -> Self {
        Self {
            components: arrangement.iter().map(ComponentRecord::from).collect(),
            version: LAYOUT_DOCUMENT_VERSION.to_owned(),
            last_modified: when.to_rfc3339_opts(SecondsFormat::Millis, true),
        }
    }

    /// Parse `lastModified`, if it is RFC 3339.
    #[must_use]
    pub fn last_modified_at(&self) -> Option<DateTime<FixedOffset>> {
        DateTime::parse_from_rfc3339(&self.last_modified).ok()
    }

    /// Parse and validate a JSON document.
    pub fn from_json_str(s: &str) -> Result<Self, DocumentError> {
        let value: Value = serde_json::from_str(s)?;
        let document = Self::from_value(value)?;
        document.validate()?;
        Ok(document)
    }

    fn from_value(mut value: Value) -> Result<Self, DocumentError> {
        let Some(object) = value.as_object_mut() else {
            return Err(DocumentError::MissingComponents);
        };
        let entries = match object.remove("components") {
            None => return Err(DocumentError::MissingComponents),
            Some(Value::Array(entries)) => entries,
            Some(_) => return Err(DocumentError::ComponentsNotSequence),
        };

        let components = entries
            .into_iter()
            .enumerate()
            .map(|(index, entry)| {
                serde_json::from_value::<ComponentRecord>(entry)
                    .map_err(|e| DocumentError::invalid_component(index, e.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        let version = match object.remove("version") {
            Some(Value::String(v)) => v,
            _ => default_version(),
        };
        let last_modified = match object.remove("lastModified") {
            Some(Value::String(v)) => v,
            _ => String::new(),
        };

        Ok(Self {
            components,
            version,
            last_modified,
        })
    }

    /// Reject duplicate ids and out-of-grid or empty positions.
    pub fn validate(&self) -> Result<(), DocumentError> {
        let mut seen = FxHashSet::default();
        for record in &self.components {
            if !seen.insert(&record.id) {
                return Err(DocumentError::DuplicateId {
                    id: record.id.clone(),
                });
            }
            check_position(&record.id, record.position)?;
        }
        Ok(())
    }

    /// Validated components, in document order.
    pub fn to_components(&self) -> Result<Vec<Component>, DocumentError> {
        self.validate()?;
        Ok(self.components.iter().cloned().map(Component::from).collect())
    }

    pub fn to_json_pretty(&self) -> Result<String, DocumentError> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

fn check_position(id: &ComponentId, rect: GridRect) -> Result<(), DocumentError> {
    if rect.width == 0 || rect.height == 0 {
        return Err(DocumentError::invalid_geometry(
            id.clone(),
            format!("size {}x{} must be at least 1x1", rect.width, rect.height),
        ));
    }
    if u32::from(rect.col) + u32::from(rect.width) > u32::from(GRID_COLUMNS) {
        return Err(DocumentError::invalid_geometry(
            id.clone(),
            format!(
                "col {} + width {} exceeds {GRID_COLUMNS} columns",
                rect.col, rect.width
            ),
        ));
    }
    if rect.row.checked_add(rect.height).is_none() {
        return Err(DocumentError::invalid_geometry(
            id.clone(),
            format!("row {} + height {} overflows", rect.row, rect.height),
        ));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn sample() -> Vec<Component> {
        vec![
            Component::new("1", ComponentKind::Primary),
            Component::new("2", ComponentKind::Secondary).with_rect(GridRect::new(6, 0, 2, 3)),
        ]
    }

    #[test]
    fn export_shape_matches_wire_format() {
        let when = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let doc = LayoutDocument::at(&sample(), when);
        let value: Value = serde_json::from_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(value["version"], "1.0.0");
        assert_eq!(value["lastModified"], "2024-05-01T12:00:00.000Z");
        assert_eq!(value["components"][1]["type"], "kpi");
        assert_eq!(value["components"][1]["position"]["col"], 6);
        assert_eq!(doc.last_modified_at().unwrap().timestamp(), when.timestamp());
    }

    #[test]
    fn parse_roundtrip() {
        let doc = LayoutDocument::from_components(&sample());
        let back = LayoutDocument::from_json_str(&doc.to_json_pretty().unwrap()).unwrap();
        assert_eq!(back, doc);
        assert_eq!(back.to_components().unwrap(), sample());
    }

    #[test]
    fn missing_and_non_array_components_are_distinct() {
        assert!(matches!(
            LayoutDocument::from_json_str(r#"{"version":"1.0.0"}"#),
            Err(DocumentError::MissingComponents)
        ));
        assert!(matches!(
            LayoutDocument::from_json_str("[]"),
            Err(DocumentError::MissingComponents)
        ));
        assert!(matches!(
            LayoutDocument::from_json_str(r#"{"components":{}}"#),
            Err(DocumentError::ComponentsNotSequence)
        ));
        assert!(matches!(
            LayoutDocument::from_json_str("{nope"),
            Err(DocumentError::Json(_))
        ));
    }

    #[test]
    fn malformed_entry_reports_index() {
        let json = r#"{"components":[
            {"id":"1","type":"chart","position":{"col":0,"row":0,"width":6,"height":6}},
            {"id":"2","type":"table","position":{"col":0,"row":0,"width":6,"height":6}}
        ]}"#;
        let err = LayoutDocument::from_json_str(json).unwrap_err();
        assert!(matches!(err, DocumentError::InvalidComponent { index: 1, .. }), "{err}");
    }

    #[test]
    fn geometry_and_duplicates_rejected() {
        let wide = r#"{"components":[{"id":"1","type":"kpi","position":{"col":8,"row":0,"width":6,"height":1}}]}"#;
        assert!(matches!(
            LayoutDocument::from_json_str(wide),
            Err(DocumentError::InvalidGeometry { .. })
        ));
        let empty = r#"{"components":[{"id":"1","type":"kpi","position":{"col":0,"row":0,"width":0,"height":1}}]}"#;
        assert!(matches!(
            LayoutDocument::from_json_str(empty),
            Err(DocumentError::InvalidGeometry { .. })
        ));
        let dup = r#"{"components":[
            {"id":"1","type":"kpi","position":{"col":0,"row":0,"width":2,"height":3}},
            {"id":"1","type":"kpi","position":{"col":2,"row":0,"width":2,"height":3}}
        ]}"#;
        let err = LayoutDocument::from_json_str(dup).unwrap_err();
        assert_eq!(err.to_string(), "duplicate component id: 1");
    }

    #[test]
    fn version_and_timestamp_are_optional() {
        let doc = LayoutDocument::from_json_str(r#"{"components":[]}"#).unwrap();
        assert_eq!(doc.version, "1.0.0");
        assert!(doc.last_modified_at().is_none());
    }
}
