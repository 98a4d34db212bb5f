//! Value types shared by the drawing model

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A unique identifier for an object in a drawing
///
/// Handles are assigned by the drawing container and never change for the
/// life of an object. Handle 0 is reserved and means "no handle". They are
/// written as upper-case hex without prefix (`4CC5`), which is also the form
/// stored in project files.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Handle(u64);

impl Handle {
    /// The null handle
    pub const NULL: Handle = Handle(0);

    #[inline]
    pub const fn new(value: u64) -> Self {
        Handle(value)
    }

    #[inline]
    pub const fn value(&self) -> u64 {
        self.0
    }

    #[inline]
    pub const fn is_null(&self) -> bool {
        self.0 == 0
    }
}

impl From<u64> for Handle {
    fn from(value: u64) -> Self {
        Handle(value)
    }
}

impl fmt::Display for Handle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:X}", self.0)
    }
}

impl FromStr for Handle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        let digits = trimmed
            .strip_prefix("0x")
            .or_else(|| trimmed.strip_prefix("0X"))
            .unwrap_or(trimmed);
        u64::from_str_radix(digits, 16)
            .map(Handle)
            .map_err(|_| Error::InvalidHandle(s.to_string()))
    }
}

/// Entity color as an AutoCAD Color Index
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Color {
    /// Use the layer's color (index 256)
    #[default]
    ByLayer,
    /// Use the enclosing block's color (index 0)
    ByBlock,
    /// Explicit index 1..=255
    Index(u8),
}

impl Color {
    /// Color from a raw group-code 62 value.
    pub fn from_index(index: i16) -> Self {
        match index {
            0 => Color::ByBlock,
            256 => Color::ByLayer,
            1..=255 => Color::Index(index as u8),
            // Negative values mark a layer that is switched off
            i if i < 0 => Color::Index(i.unsigned_abs().min(255) as u8),
            _ => Color::ByLayer,
        }
    }

    /// The group-code 62 value.
    pub fn index(&self) -> i16 {
        match self {
            Color::ByBlock => 0,
            Color::ByLayer => 256,
            Color::Index(i) => *i as i16,
        }
    }
}

/// A 2D point or vector
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Vector2 {
    pub x: f64,
    pub y: f64,
}

impl Vector2 {
    pub const ZERO: Vector2 = Vector2 { x: 0.0, y: 0.0 };

    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Vector2 {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn handle_display_is_bare_upper_hex() {
        assert_eq!(Handle::new(0x4cc5).to_string(), "4CC5");
    }

    #[test]
    fn handle_parses_with_or_without_prefix() {
        assert_eq!("4CC5".parse::<Handle>().unwrap(), Handle::new(0x4CC5));
        assert_eq!("4cc5".parse::<Handle>().unwrap(), Handle::new(0x4CC5));
        assert_eq!("0x1F".parse::<Handle>().unwrap(), Handle::new(0x1F));
        assert!("zz".parse::<Handle>().is_err());
        assert!("".parse::<Handle>().is_err());
    }

    #[test]
    fn color_index_round_trip() {
        assert_eq!(Color::from_index(256), Color::ByLayer);
        assert_eq!(Color::from_index(0), Color::ByBlock);
        assert_eq!(Color::from_index(1), Color::Index(1));
        assert_eq!(Color::from_index(-3), Color::Index(3));
        assert_eq!(Color::Index(7).index(), 7);
        assert_eq!(Color::ByLayer.index(), 256);
    }
}
