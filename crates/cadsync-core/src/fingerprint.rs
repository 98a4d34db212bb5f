//! Content fingerprints
//!
//! A fingerprint is the SHA-256 of a canonical JSON rendering of the
//! semantically relevant fields of an entity. Canonical means: object keys
//! sorted, no whitespace, floating point values rounded to six decimals and
//! written as strings, angles folded into `[0, 360)`, and names upper-cased
//! (the drawing format treats layer and style names case-insensitively).

use cadsync_fs::checksum::compute_content_checksum;
use serde_json::Value;

/// Decimal places kept for coordinates and sizes.
pub const PRECISION: usize = 6;

/// Fingerprint of an already canonicalized value.
pub fn fingerprint_value(value: &Value) -> String {
    compute_content_checksum(&canonical_json(value))
}

/// Render a value as compact JSON with object keys in sorted order.
///
/// Keys are sorted here rather than relying on `serde_json::Map` ordering:
/// any crate in the build may enable `preserve_order`, which turns the map
/// into insertion order for the whole build.
pub fn canonical_json(value: &Value) -> String {
    let mut out = String::new();
    write_canonical(value, &mut out);
    out
}

fn write_canonical(value: &Value, out: &mut String) {
    match value {
        Value::Object(map) => {
            let mut keys: Vec<&String> = map.keys().collect();
            keys.sort();
            out.push('{');
            for (i, key) in keys.into_iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                out.push_str(&Value::String(key.clone()).to_string());
                out.push(':');
                if let Some(v) = map.get(key) {
                    write_canonical(v, out);
                }
            }
            out.push('}');
        }
        Value::Array(items) => {
            out.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    out.push(',');
                }
                write_canonical(item, out);
            }
            out.push(']');
        }
        other => out.push_str(&other.to_string()),
    }
}

/// A length or coordinate at fixed precision.
pub fn number(value: f64) -> Value {
    Value::String(format_fixed(value))
}

/// An angle in degrees, folded into `[0, 360)`.
pub fn angle(degrees: f64) -> Value {
    let rounded = round(degrees).rem_euclid(360.0);
    // 359.9999999 rounds up to a full turn
    let folded = if round(rounded) >= 360.0 { 0.0 } else { rounded };
    number(folded)
}

/// A case-insensitive name.
pub fn name(value: &str) -> Value {
    Value::String(value.trim().to_uppercase())
}

fn round(value: f64) -> f64 {
    let scale = 10f64.powi(PRECISION as i32);
    (value * scale).round() / scale
}

fn format_fixed(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string();
    }
    let text = format!("{:.*}", PRECISION, value);
    // -0.000000 and 0.000000 are the same value
    if text.starts_with('-') && text[1..].chars().all(|c| c == '0' || c == '.') {
        text[1..].to_string()
    } else {
        text
    }
}
