//! Sync modes and conflict policies

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// How an entity is reconciled between the project file and the drawing.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SyncMode {
    /// Regenerate the drawing entity from configuration on every run.
    ///
    /// Previous instances are deleted and recreated, so handles change.
    Push,
    /// Selective bidirectional reconciliation with stable handles.
    #[default]
    Auto,
    /// Import drawing state into the configuration; never writes the drawing.
    Pull,
    /// Leave the entity alone.
    Skip,
}

impl SyncMode {
    /// Whether this mode may modify the drawing.
    pub fn writes_drawing(&self) -> bool {
        matches!(self, SyncMode::Push | SyncMode::Auto)
    }
}

impl FromStr for SyncMode {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "push" => Ok(SyncMode::Push),
            "auto" => Ok(SyncMode::Auto),
            "pull" => Ok(SyncMode::Pull),
            "skip" | "none" => Ok(SyncMode::Skip),
            _ => Err(Error::InvalidMode {
                mode: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for SyncMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SyncMode::Push => write!(f, "push"),
            SyncMode::Auto => write!(f, "auto"),
            SyncMode::Pull => write!(f, "pull"),
            SyncMode::Skip => write!(f, "skip"),
        }
    }
}

/// Which side wins when both the project file and the drawing changed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictPolicy {
    YamlWins,
    DrawingWins,
    /// Leave both sides as they are and report the conflict.
    #[default]
    Skip,
}

impl FromStr for ConflictPolicy {
    type Err = Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().replace('-', "_").as_str() {
            "yaml_wins" | "yaml" => Ok(ConflictPolicy::YamlWins),
            "drawing_wins" | "drawing" => Ok(ConflictPolicy::DrawingWins),
            "skip" | "manual" => Ok(ConflictPolicy::Skip),
            _ => Err(Error::InvalidPolicy {
                policy: s.to_string(),
            }),
        }
    }
}

impl fmt::Display for ConflictPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConflictPolicy::YamlWins => write!(f, "yaml_wins"),
            ConflictPolicy::DrawingWins => write!(f, "drawing_wins"),
            ConflictPolicy::Skip => write!(f, "skip"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_str() {
        assert_eq!("AUTO".parse::<SyncMode>().unwrap(), SyncMode::Auto);
        assert_eq!("none".parse::<SyncMode>().unwrap(), SyncMode::Skip);
        assert!("sometimes".parse::<SyncMode>().is_err());
    }

    #[test]
    fn test_mode_display_matches_serde() {
        for mode in [SyncMode::Push, SyncMode::Auto, SyncMode::Pull, SyncMode::Skip] {
            let yaml = serde_yaml::to_string(&mode).unwrap();
            assert_eq!(yaml.trim(), mode.to_string());
        }
    }

    #[test]
    fn test_policy_default_is_skip() {
        assert_eq!(ConflictPolicy::default(), ConflictPolicy::Skip);
    }

    #[test]
    fn test_policy_from_str_accepts_kebab_case() {
        assert_eq!(
            "drawing-wins".parse::<ConflictPolicy>().unwrap(),
            ConflictPolicy::DrawingWins
        );
        assert_eq!(
            "yaml_wins".parse::<ConflictPolicy>().unwrap(),
            ConflictPolicy::YamlWins
        );
    }

    #[test]
    fn test_writes_drawing() {
        assert!(SyncMode::Push.writes_drawing());
        assert!(SyncMode::Auto.writes_drawing());
        assert!(!SyncMode::Pull.writes_drawing());
        assert!(!SyncMode::Skip.writes_drawing());
    }
}
