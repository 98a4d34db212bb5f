//! Per-run report of what happened to each entity

use std::collections::BTreeMap;
use std::fmt;

use cadsync_meta::{EntityKind, MalformedEntry, SyncMode};
use serde::Serialize;

use crate::change::ChangeState;

/// What a sync pass did with one entity
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// New drawing entity created from the entry
    Created,
    /// Entry written into its existing drawing entity
    Pushed,
    /// Drawing entity read back into the entry
    Pulled,
    /// Push batch recreated the entity
    Regenerated,
    /// Entry removed because its entity is gone
    Deleted,
    Unchanged,
    Skipped,
    /// Both sides changed and the policy left it unresolved
    Conflict,
    /// New entry proposed for an unowned drawing entity
    Discovered,
    Failed,
}

impl fmt::Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Outcome::Created => "created",
            Outcome::Pushed => "pushed",
            Outcome::Pulled => "pulled",
            Outcome::Regenerated => "regenerated",
            Outcome::Deleted => "deleted",
            Outcome::Unchanged => "unchanged",
            Outcome::Skipped => "skipped",
            Outcome::Conflict => "conflict",
            Outcome::Discovered => "discovered",
            Outcome::Failed => "failed",
        };
        f.write_str(s)
    }
}

/// One entity's line in the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityReport {
    pub kind: EntityKind,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub mode: Option<SyncMode>,
    pub outcome: Outcome,
    /// Drawing handle after the pass
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handle: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<ChangeState>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl EntityReport {
    pub fn new(kind: EntityKind, name: impl Into<String>, outcome: Outcome) -> Self {
        Self {
            kind,
            name: name.into(),
            mode: None,
            outcome,
            handle: None,
            state: None,
            detail: None,
        }
    }

    pub fn with_mode(mut self, mode: SyncMode) -> Self {
        self.mode = Some(mode);
        self
    }

    pub fn with_handle(mut self, handle: impl ToString) -> Self {
        self.handle = Some(handle.to_string());
        self
    }

    pub fn with_state(mut self, state: ChangeState) -> Self {
        self.state = Some(state);
        self
    }

    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.detail = Some(detail.into());
        self
    }
}

/// An entry that could not be processed
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EntityError {
    pub kind: EntityKind,
    /// Entry name, or `#<index>` for entries without one
    pub name: String,
    pub message: String,
}

impl From<&MalformedEntry> for EntityError {
    fn from(entry: &MalformedEntry) -> Self {
        Self {
            kind: entry.kind,
            name: entry
                .name
                .clone()
                .unwrap_or_else(|| format!("#{}", entry.index)),
            message: entry.reason.clone(),
        }
    }
}

/// Report of one sync pass
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SyncReport {
    pub dry_run: bool,
    pub entities: Vec<EntityReport>,
    pub errors: Vec<EntityError>,
    /// Whether the pass changed the drawing (written unless dry run)
    pub drawing_modified: bool,
    /// Whether the pass changed the project file (written unless dry run)
    pub project_modified: bool,
}

impl SyncReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn record(&mut self, entry: EntityReport) {
        self.entities.push(entry);
    }

    pub fn fail(&mut self, kind: EntityKind, name: impl Into<String>, message: impl Into<String>) {
        let error = EntityError {
            kind,
            name: name.into(),
            message: message.into(),
        };
        tracing::error!(kind = %error.kind, entity = %error.name, "{}", error.message);
        self.errors.push(error);
    }

    /// Number of entities per outcome; failures count errors.
    pub fn summary(&self) -> BTreeMap<Outcome, usize> {
        let mut counts = BTreeMap::new();
        for entry in &self.entities {
            *counts.entry(entry.outcome).or_insert(0) += 1;
        }
        if !self.errors.is_empty() {
            counts.insert(Outcome::Failed, self.errors.len());
        }
        counts
    }

    pub fn count(&self, outcome: Outcome) -> usize {
        self.summary().get(&outcome).copied().unwrap_or(0)
    }

    pub fn find(&self, kind: EntityKind, name: &str) -> Option<&EntityReport> {
        self.entities
            .iter()
            .find(|e| e.kind == kind && e.name == name)
    }

    pub fn has_conflicts(&self) -> bool {
        self.entities.iter().any(|e| e.outcome == Outcome::Conflict)
    }

    pub fn has_failures(&self) -> bool {
        !self.errors.is_empty()
    }

    /// One-line summary, e.g. `2 pushed, 1 pulled, 5 unchanged`.
    pub fn summary_line(&self) -> String {
        let summary = self.summary();
        if summary.is_empty() {
            return "nothing to do".to_string();
        }
        summary
            .iter()
            .map(|(outcome, count)| format!("{} {}", count, outcome))
            .collect::<Vec<_>>()
            .join(", ")
    }
}
