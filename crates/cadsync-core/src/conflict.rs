//! Conflict resolution for entries changed on both sides

use cadsync_meta::ConflictPolicy;
use serde::Serialize;

use crate::change::{ChangeState, Classification};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConflictDecision {
    YamlWins,
    DrawingWins,
    Skip,
}

/// Decide a both-changed entry according to `policy`.
///
/// The decision depends on the policy only, so identical inputs always
/// resolve identically. Every conflict is logged; the caller performs the
/// resulting action.
pub fn resolve_conflict(
    name: &str,
    classification: &Classification,
    policy: ConflictPolicy,
) -> ConflictDecision {
    debug_assert_eq!(classification.state, ChangeState::BothChanged);

    let decision = match policy {
        ConflictPolicy::YamlWins => ConflictDecision::YamlWins,
        ConflictPolicy::DrawingWins => ConflictDecision::DrawingWins,
        ConflictPolicy::Skip => ConflictDecision::Skip,
    };
    tracing::warn!(
        entity = %name,
        policy = %policy,
        decision = ?decision,
        "entity changed in both the project file and the drawing"
    );
    decision
}
