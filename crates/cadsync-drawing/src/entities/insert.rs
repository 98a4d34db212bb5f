//! Block reference entity

use super::{DxfBody, EntityCommon, first, first_f64};
use crate::io::DxfPair;
use crate::types::Vector2;

/// An `INSERT` entity
#[derive(Debug, Clone, PartialEq)]
pub struct Insert {
    pub common: EntityCommon,
    /// Referenced block definition (2)
    pub block_name: String,
    /// Insertion point (10/20)
    pub position: Vector2,
    /// Uniform scale, written to 41 and 42; read from 41
    pub scale: f64,
    /// Rotation in degrees (50)
    pub rotation: f64,
}

impl Insert {
    pub fn new(block_name: impl Into<String>, position: Vector2) -> Self {
        Self {
            common: EntityCommon::new(),
            block_name: block_name.into(),
            position,
            scale: 1.0,
            rotation: 0.0,
        }
    }
}

impl DxfBody for Insert {
    const TYPE_NAME: &'static str = "INSERT";

    fn read_body(common: EntityCommon, body: &[DxfPair]) -> Self {
        Self {
            common,
            block_name: first(body, 2).map(|p| p.value.clone()).unwrap_or_default(),
            position: Vector2::new(
                first_f64(body, 10).unwrap_or(0.0),
                first_f64(body, 20).unwrap_or(0.0),
            ),
            scale: first_f64(body, 41).unwrap_or(1.0),
            rotation: first_f64(body, 50).unwrap_or(0.0),
        }
    }

    fn body_pairs(&self) -> Vec<DxfPair> {
        vec![
            DxfPair::new(2, &self.block_name),
            DxfPair::double(10, self.position.x),
            DxfPair::double(20, self.position.y),
            DxfPair::double(41, self.scale),
            DxfPair::double(42, self.scale),
            DxfPair::double(50, self.rotation),
        ]
    }

    fn template() -> Vec<DxfPair> {
        vec![
            DxfPair::new(5, ""),
            DxfPair::new(100, "AcDbEntity"),
            DxfPair::new(8, ""),
            DxfPair::new(100, "AcDbBlockReference"),
            DxfPair::new(2, ""),
            DxfPair::new(10, ""),
            DxfPair::new(20, ""),
            DxfPair::new(30, "0.0"),
            DxfPair::new(41, ""),
            DxfPair::new(42, ""),
            DxfPair::new(43, "1.0"),
            DxfPair::new(50, ""),
        ]
    }
}
