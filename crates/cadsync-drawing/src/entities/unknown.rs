//! Entities of types the model does not interpret

use super::EntityCommon;
use crate::io::DxfPair;

/// Any entity type other than the modelled ones
///
/// Only the common properties are editable; everything else is written back
/// exactly as read.
#[derive(Debug, Clone, PartialEq)]
pub struct UnknownEntity {
    pub common: EntityCommon,
    pub type_name: String,
}

impl UnknownEntity {
    pub fn new(type_name: impl Into<String>, common: EntityCommon) -> Self {
        Self {
            common,
            type_name: type_name.into(),
        }
    }

    pub(crate) fn template() -> Vec<DxfPair> {
        vec![
            DxfPair::new(5, ""),
            DxfPair::new(100, "AcDbEntity"),
            DxfPair::new(8, ""),
        ]
    }
}
