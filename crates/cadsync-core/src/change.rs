//! Change detection
//!
//! Compares the current fingerprints of both sides with the fingerprint
//! recorded at the last reconciliation.

use serde::Serialize;

use crate::content::EntityContent;

/// Which sides changed since the last reconciliation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ChangeState {
    Unchanged,
    YamlChanged,
    DrawingChanged,
    BothChanged,
}

impl std::fmt::Display for ChangeState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ChangeState::Unchanged => write!(f, "unchanged"),
            ChangeState::YamlChanged => write!(f, "yaml changed"),
            ChangeState::DrawingChanged => write!(f, "drawing changed"),
            ChangeState::BothChanged => write!(f, "both changed"),
        }
    }
}

/// A classification together with the fingerprints it was computed from
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    pub state: ChangeState,
    pub yaml_fingerprint: String,
    pub drawing_fingerprint: String,
}

impl Classification {
    /// Both sides changed, but to the same content.
    pub fn is_convergent(&self) -> bool {
        self.state == ChangeState::BothChanged && self.yaml_fingerprint == self.drawing_fingerprint
    }
}

/// Classify an entry whose drawing entity exists and was synced before.
pub fn classify(yaml: &EntityContent, drawing: &EntityContent, stored: &str) -> Classification {
    let yaml_fingerprint = yaml.fingerprint();
    let drawing_fingerprint = drawing.fingerprint();

    let state = match (yaml_fingerprint != stored, drawing_fingerprint != stored) {
        (false, false) => ChangeState::Unchanged,
        (true, false) => ChangeState::YamlChanged,
        (false, true) => ChangeState::DrawingChanged,
        (true, true) => ChangeState::BothChanged,
    };

    Classification {
        state,
        yaml_fingerprint,
        drawing_fingerprint,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::content::{Appearance, BlockContent};
    use cadsync_drawing::Vector2;
    use rstest::rstest;

    fn block(x: f64) -> EntityContent {
        EntityContent::Block(BlockContent {
            appearance: Appearance {
                layer: "BLOCKS".into(),
                color: 256,
                linetype: "BYLAYER".into(),
            },
            block_name: "NORTH".into(),
            position: Vector2::new(x, 0.0),
            scale: 1.0,
            rotation: 0.0,
        })
    }

    #[rstest]
    #[case(0.0, 0.0, ChangeState::Unchanged)]
    #[case(1.0, 0.0, ChangeState::YamlChanged)]
    #[case(0.0, 1.0, ChangeState::DrawingChanged)]
    #[case(1.0, 2.0, ChangeState::BothChanged)]
    fn test_classification(#[case] yaml_x: f64, #[case] drawing_x: f64, #[case] expected: ChangeState) {
        let stored = block(0.0).fingerprint();
        let result = classify(&block(yaml_x), &block(drawing_x), &stored);
        assert_eq!(result.state, expected);
        assert!(!result.is_convergent());
    }

    #[test]
    fn test_same_edit_on_both_sides_converges() {
        let stored = block(0.0).fingerprint();
        let result = classify(&block(5.0), &block(5.0), &stored);
        assert_eq!(result.state, ChangeState::BothChanged);
        assert!(result.is_convergent());
    }
}
