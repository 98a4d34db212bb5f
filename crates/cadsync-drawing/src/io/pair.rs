//! DXF group-code/value pairs

use crate::types::Handle;

/// One group code and its value line, as it appears in the file
#[derive(Debug, Clone, PartialEq)]
pub struct DxfPair {
    pub code: i32,
    pub value: String,
}

impl DxfPair {
    pub fn new(code: i32, value: impl Into<String>) -> Self {
        Self {
            code,
            value: value.into(),
        }
    }

    pub fn double(code: i32, value: f64) -> Self {
        Self::new(code, format_double(value))
    }

    pub fn int(code: i32, value: i64) -> Self {
        Self::new(code, value.to_string())
    }

    pub fn handle(code: i32, handle: Handle) -> Self {
        Self::new(code, handle.to_string())
    }

    pub fn as_f64(&self) -> Option<f64> {
        self.value.trim().parse().ok()
    }

    pub fn as_i64(&self) -> Option<i64> {
        self.value.trim().parse().ok()
    }

    pub fn as_handle(&self) -> Option<Handle> {
        self.value.parse().ok()
    }

    pub(crate) fn is(&self, code: i32, value: &str) -> bool {
        self.code == code && self.value.trim() == value
    }
}

/// Format a real the way CAD applications write it: the shortest text that
/// reads back as the same value, always with a decimal point.
pub fn format_double(value: f64) -> String {
    let formatted = value.to_string();
    if !value.is_finite() || formatted.contains('.') {
        formatted
    } else {
        format!("{}.0", formatted)
    }
}
