//! Single-line text entity

use super::{DxfBody, EntityCommon, first, first_f64};
use crate::io::DxfPair;
use crate::types::Vector2;

/// A `TEXT` entity
#[derive(Debug, Clone, PartialEq)]
pub struct Text {
    pub common: EntityCommon,
    /// Text content (group code 1)
    pub value: String,
    /// First alignment point (10/20)
    pub position: Vector2,
    /// Text height (40)
    pub height: f64,
    /// Rotation in degrees (50)
    pub rotation: f64,
    /// Text style name (7)
    pub style: String,
}

impl Text {
    pub fn new() -> Self {
        Self {
            common: EntityCommon::new(),
            value: String::new(),
            position: Vector2::ZERO,
            height: 2.5,
            rotation: 0.0,
            style: "STANDARD".to_string(),
        }
    }

    pub fn with_value(value: impl Into<String>, position: Vector2) -> Self {
        Self {
            value: value.into(),
            position,
            ..Self::new()
        }
    }

    pub fn with_height(mut self, height: f64) -> Self {
        self.height = height;
        self
    }

    pub fn with_rotation(mut self, rotation: f64) -> Self {
        self.rotation = rotation;
        self
    }
}

impl Default for Text {
    fn default() -> Self {
        Self::new()
    }
}

impl DxfBody for Text {
    const TYPE_NAME: &'static str = "TEXT";

    fn read_body(common: EntityCommon, body: &[DxfPair]) -> Self {
        let defaults = Self::new();
        Self {
            common,
            value: first(body, 1).map(|p| p.value.clone()).unwrap_or_default(),
            position: Vector2::new(
                first_f64(body, 10).unwrap_or(0.0),
                first_f64(body, 20).unwrap_or(0.0),
            ),
            height: first_f64(body, 40).unwrap_or(defaults.height),
            rotation: first_f64(body, 50).unwrap_or(0.0),
            style: first(body, 7)
                .map(|p| p.value.clone())
                .unwrap_or(defaults.style),
        }
    }

    fn body_pairs(&self) -> Vec<DxfPair> {
        vec![
            DxfPair::double(10, self.position.x),
            DxfPair::double(20, self.position.y),
            DxfPair::double(40, self.height),
            DxfPair::new(1, &self.value),
            DxfPair::double(50, self.rotation),
            DxfPair::new(7, &self.style),
        ]
    }

    fn template() -> Vec<DxfPair> {
        vec![
            DxfPair::new(5, ""),
            DxfPair::new(100, "AcDbEntity"),
            DxfPair::new(8, ""),
            DxfPair::new(100, "AcDbText"),
            DxfPair::new(10, ""),
            DxfPair::new(20, ""),
            DxfPair::new(30, "0.0"),
            DxfPair::new(40, ""),
            DxfPair::new(1, ""),
            DxfPair::new(50, ""),
            DxfPair::new(7, ""),
            DxfPair::new(100, "AcDbText"),
        ]
    }
}
