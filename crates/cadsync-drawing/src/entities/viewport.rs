//! Paper-space viewport entity

use super::{DxfBody, EntityCommon, first_f64};
use crate::io::DxfPair;
use crate::types::Vector2;

/// A `VIEWPORT` entity
#[derive(Debug, Clone, PartialEq)]
pub struct Viewport {
    pub common: EntityCommon,
    /// Center in paper space (10/20)
    pub center: Vector2,
    /// Width in paper space (40)
    pub width: f64,
    /// Height in paper space (41)
    pub height: f64,
    /// View center in model space (12/22)
    pub view_center: Vector2,
    /// View height in model space (45)
    pub view_height: f64,
}

impl Viewport {
    pub fn new(center: Vector2, width: f64, height: f64) -> Self {
        Self {
            common: EntityCommon::new(),
            center,
            width,
            height,
            view_center: Vector2::ZERO,
            view_height: height,
        }
    }
}

impl DxfBody for Viewport {
    const TYPE_NAME: &'static str = "VIEWPORT";

    fn read_body(common: EntityCommon, body: &[DxfPair]) -> Self {
        let height = first_f64(body, 41).unwrap_or(0.0);
        Self {
            common,
            center: Vector2::new(
                first_f64(body, 10).unwrap_or(0.0),
                first_f64(body, 20).unwrap_or(0.0),
            ),
            width: first_f64(body, 40).unwrap_or(0.0),
            height,
            view_center: Vector2::new(
                first_f64(body, 12).unwrap_or(0.0),
                first_f64(body, 22).unwrap_or(0.0),
            ),
            view_height: first_f64(body, 45).unwrap_or(height),
        }
    }

    fn body_pairs(&self) -> Vec<DxfPair> {
        vec![
            DxfPair::double(10, self.center.x),
            DxfPair::double(20, self.center.y),
            DxfPair::double(40, self.width),
            DxfPair::double(41, self.height),
            DxfPair::double(12, self.view_center.x),
            DxfPair::double(22, self.view_center.y),
            DxfPair::double(45, self.view_height),
        ]
    }

    fn template() -> Vec<DxfPair> {
        vec![
            DxfPair::new(5, ""),
            DxfPair::new(100, "AcDbEntity"),
            DxfPair::new(67, "1"),
            DxfPair::new(8, ""),
            DxfPair::new(100, "AcDbViewport"),
            DxfPair::new(10, ""),
            DxfPair::new(20, ""),
            DxfPair::new(30, "0.0"),
            DxfPair::new(40, ""),
            DxfPair::new(41, ""),
            DxfPair::new(68, "1"),
            DxfPair::new(69, "2"),
            DxfPair::new(12, ""),
            DxfPair::new(22, ""),
            DxfPair::new(45, ""),
        ]
    }
}
