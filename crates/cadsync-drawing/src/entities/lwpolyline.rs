//! Lightweight polyline entity

use super::{DxfBody, EntityCommon, first};
use crate::io::DxfPair;
use crate::types::Vector2;

const CLOSED_FLAG: i16 = 1;

/// An `LWPOLYLINE` entity
#[derive(Debug, Clone, PartialEq)]
pub struct LwPolyline {
    pub common: EntityCommon,
    /// Polyline flags (70); bit 1 = closed
    pub flags: i16,
    pub vertices: Vec<Vector2>,
}

impl LwPolyline {
    pub fn new(vertices: Vec<Vector2>, closed: bool) -> Self {
        Self {
            common: EntityCommon::new(),
            flags: if closed { CLOSED_FLAG } else { 0 },
            vertices,
        }
    }

    pub fn is_closed(&self) -> bool {
        self.flags & CLOSED_FLAG != 0
    }
}

impl DxfBody for LwPolyline {
    const TYPE_NAME: &'static str = "LWPOLYLINE";
    const GROUPED_CODES: &'static [i32] = &[10, 20, 40, 41, 42, 91];

    fn read_body(common: EntityCommon, body: &[DxfPair]) -> Self {
        let mut vertices = Vec::new();
        let mut pending_x = None;
        for pair in body {
            match pair.code {
                10 => pending_x = pair.as_f64(),
                20 => {
                    if let (Some(x), Some(y)) = (pending_x.take(), pair.as_f64()) {
                        vertices.push(Vector2::new(x, y));
                    }
                }
                _ => {}
            }
        }
        Self {
            common,
            flags: first(body, 70)
                .and_then(DxfPair::as_i64)
                .map(|f| f as i16)
                .unwrap_or(0),
            vertices,
        }
    }

    fn body_pairs(&self) -> Vec<DxfPair> {
        let mut pairs = vec![
            DxfPair::int(90, self.vertices.len() as i64),
            DxfPair::int(70, self.flags as i64),
        ];
        for vertex in &self.vertices {
            pairs.push(DxfPair::double(10, vertex.x));
            pairs.push(DxfPair::double(20, vertex.y));
        }
        pairs
    }

    fn template() -> Vec<DxfPair> {
        vec![
            DxfPair::new(5, ""),
            DxfPair::new(100, "AcDbEntity"),
            DxfPair::new(8, ""),
            DxfPair::new(100, "AcDbPolyline"),
            DxfPair::new(90, ""),
            DxfPair::new(70, ""),
            DxfPair::new(43, "0.0"),
            DxfPair::new(10, ""),
        ]
    }
}
