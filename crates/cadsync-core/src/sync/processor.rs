//! Per-collection processing: mode grouping, auto and pull

use std::collections::HashSet;

use cadsync_drawing::Handle;
use cadsync_meta::{EntryChange, FingerprintOrigin, LoadedCollection, LoadedEntry, SyncMode};

use super::pass::SyncPass;
use super::report::{EntityError, EntityReport, Outcome};
use crate::access::DrawingAccess;
use crate::change::{ChangeState, Classification, classify};
use crate::conflict::{ConflictDecision, resolve_conflict};
use crate::content::EntityContent;
use crate::entry::SyncableConfig;
use crate::identity::{MatchSource, resolve};
use crate::style::ResolvedStyle;

impl<D: DrawingAccess + ?Sized> SyncPass<'_, D> {
    /// Process every entry of a named collection.
    pub(crate) fn process_collection<T: SyncableConfig>(
        &mut self,
        collection: &LoadedCollection<T>,
    ) -> Vec<EntryChange<T>> {
        for malformed in &collection.malformed {
            self.report.errors.push(EntityError::from(malformed));
        }

        let mut push = Vec::new();
        let mut auto = Vec::new();
        let mut pull = Vec::new();
        let mut skip = Vec::new();
        for entry in &collection.entries {
            match self.settings.effective_mode(T::KIND, entry.config.sync()) {
                SyncMode::Push => push.push(entry),
                SyncMode::Auto => auto.push(entry),
                SyncMode::Pull => pull.push(entry),
                SyncMode::Skip => skip.push(entry),
            }
        }
        tracing::debug!(
            kind = %T::KIND,
            push = push.len(),
            auto = auto.len(),
            pull = pull.len(),
            skip = skip.len(),
            "processing collection"
        );

        let mut changes = Vec::new();
        if !push.is_empty() {
            let protected: HashSet<String> = auto
                .iter()
                .chain(&pull)
                .chain(&skip)
                .map(|e| e.config.name().to_string())
                .collect();
            changes.extend(self.push_batch(&push, &protected));
        }
        for entry in auto {
            changes.extend(self.process_auto(entry));
        }
        for entry in pull {
            changes.extend(self.process_pull(entry));
        }
        for entry in skip {
            tracing::debug!(entity = %entry.config.name(), "sync mode skip");
            let mut line = EntityReport::new(T::KIND, entry.config.name(), Outcome::Skipped)
                .with_mode(SyncMode::Skip);
            if let Some(meta) = entry.config.metadata() {
                line = line.with_handle(&meta.stable_id);
            }
            self.report.record(line);
        }
        changes
    }

    fn process_auto<T: SyncableConfig>(&mut self, entry: &LoadedEntry<T>) -> Option<EntryChange<T>> {
        let config = &entry.config;
        let name = config.name();
        let baseline = self.baseline(config);
        let yaml = config.content(&baseline);
        let recorded = self.recorded_handle(config);

        let resolution = resolve(&self.drawing, &self.settings.script_id, name, T::KIND, recorded);
        self.strip_stale(&resolution.stale);
        self.note_duplicates(T::KIND, name, &resolution.duplicates);

        let Some(handle) = resolution.handle else {
            if config.metadata().is_some() {
                tracing::warn!(entity = %name, "entity was deleted from the drawing, removing entry");
                self.report.record(
                    EntityReport::new(T::KIND, name, Outcome::Deleted)
                        .with_mode(SyncMode::Auto)
                        .with_detail("deleted in the drawing"),
                );
                return Some(EntryChange::Remove { index: entry.index });
            }
            let handle = self.drawing.create_from_content(&yaml);
            let fingerprint = yaml.fingerprint();
            self.tag(handle, name, T::KIND, &fingerprint, SyncMode::Auto);
            tracing::info!(entity = %name, handle = %handle, "created drawing entity");
            self.report.record(
                EntityReport::new(T::KIND, name, Outcome::Created)
                    .with_mode(SyncMode::Auto)
                    .with_handle(handle),
            );
            let metadata = self.metadata(handle, fingerprint, FingerprintOrigin::Yaml);
            return Some(Self::updated(entry, config.clone(), Some(metadata)));
        };
        self.known.add_handle(handle);

        let Some(stored) = config.metadata() else {
            return Some(self.push_existing(entry, handle, &yaml, None, "adopted existing drawing entity"));
        };

        let Some(drawing) = self.drawing.entity(handle).and_then(EntityContent::from_entity) else {
            self.report.fail(T::KIND, name, format!("entity {} cannot be read", handle));
            return None;
        };

        let classification = classify(&yaml, &drawing, &stored.content_fingerprint);
        let tag_lost = resolution.matched_by == Some(MatchSource::TagLost);
        let moved = recorded != Some(handle);

        match classification.state {
            ChangeState::Unchanged => {
                if tag_lost {
                    self.tag(handle, name, T::KIND, &classification.yaml_fingerprint, SyncMode::Auto);
                }
                let mut line = EntityReport::new(T::KIND, name, Outcome::Unchanged)
                    .with_mode(SyncMode::Auto)
                    .with_handle(handle)
                    .with_state(ChangeState::Unchanged);
                if !moved {
                    tracing::debug!(entity = %name, handle = %handle, "unchanged");
                    self.report.record(line);
                    return None;
                }
                tracing::info!(entity = %name, handle = %handle, "stable id refreshed");
                line = line.with_detail("stable id refreshed");
                self.report.record(line);
                let metadata = self.metadata(
                    handle,
                    stored.content_fingerprint.clone(),
                    stored.fingerprint_origin,
                );
                Some(Self::updated(entry, config.clone(), Some(metadata)))
            }
            ChangeState::YamlChanged => {
                Some(self.push_existing(entry, handle, &yaml, Some(&classification), "project file changed"))
            }
            ChangeState::DrawingChanged => Some(self.pull_existing(
                entry,
                handle,
                &drawing,
                &baseline,
                Some(&classification),
                "drawing changed",
                SyncMode::Auto,
            )),
            ChangeState::BothChanged if classification.is_convergent() => {
                tracing::info!(entity = %name, handle = %handle, "both sides made the same change");
                self.tag(handle, name, T::KIND, &classification.yaml_fingerprint, SyncMode::Auto);
                self.report.record(
                    EntityReport::new(T::KIND, name, Outcome::Unchanged)
                        .with_mode(SyncMode::Auto)
                        .with_handle(handle)
                        .with_state(ChangeState::BothChanged)
                        .with_detail("both sides made the same change"),
                );
                let metadata = self.metadata(
                    handle,
                    classification.yaml_fingerprint.clone(),
                    FingerprintOrigin::Yaml,
                );
                Some(Self::updated(entry, config.clone(), Some(metadata)))
            }
            ChangeState::BothChanged => {
                match resolve_conflict(name, &classification, self.settings.conflict_policy) {
                    ConflictDecision::YamlWins => Some(self.push_existing(
                        entry,
                        handle,
                        &yaml,
                        Some(&classification),
                        "conflict resolved, project file wins",
                    )),
                    ConflictDecision::DrawingWins => Some(self.pull_existing(
                        entry,
                        handle,
                        &drawing,
                        &baseline,
                        Some(&classification),
                        "conflict resolved, drawing wins",
                        SyncMode::Auto,
                    )),
                    ConflictDecision::Skip => {
                        self.report.record(
                            EntityReport::new(T::KIND, name, Outcome::Conflict)
                                .with_mode(SyncMode::Auto)
                                .with_handle(handle)
                                .with_state(ChangeState::BothChanged)
                                .with_detail("changed on both sides, left as is"),
                        );
                        None
                    }
                }
            }
        }
    }

    fn process_pull<T: SyncableConfig>(&mut self, entry: &LoadedEntry<T>) -> Option<EntryChange<T>> {
        let config = &entry.config;
        let name = config.name();
        let recorded = self.recorded_handle(config);

        // Read-only: stale copies are reported by resolution but keep their tags
        let resolution = resolve(&self.drawing, &self.settings.script_id, name, T::KIND, recorded);
        self.note_duplicates(T::KIND, name, &resolution.duplicates);

        let Some(handle) = resolution.handle else {
            if config.metadata().is_some() {
                tracing::warn!(entity = %name, "entity was deleted from the drawing, removing entry");
                self.report.record(
                    EntityReport::new(T::KIND, name, Outcome::Deleted)
                        .with_mode(SyncMode::Pull)
                        .with_detail("deleted in the drawing"),
                );
                return Some(EntryChange::Remove { index: entry.index });
            }
            tracing::warn!(entity = %name, "no drawing entity to pull from");
            self.report.record(
                EntityReport::new(T::KIND, name, Outcome::Skipped)
                    .with_mode(SyncMode::Pull)
                    .with_detail("not found in the drawing"),
            );
            return None;
        };
        self.known.add_handle(handle);

        let Some(drawing) = self.drawing.entity(handle).and_then(EntityContent::from_entity) else {
            self.report.fail(T::KIND, name, format!("entity {} cannot be read", handle));
            return None;
        };
        let baseline = self.baseline(config);
        let yaml_fingerprint = config.content(&baseline).fingerprint();
        let drawing_fingerprint = drawing.fingerprint();
        let classification = config
            .metadata()
            .map(|m| classify(&config.content(&baseline), &drawing, &m.content_fingerprint));

        if yaml_fingerprint == drawing_fingerprint {
            let current = config.metadata().is_some_and(|m| {
                m.content_fingerprint == drawing_fingerprint && recorded == Some(handle)
            });
            let mut line = EntityReport::new(T::KIND, name, Outcome::Unchanged)
                .with_mode(SyncMode::Pull)
                .with_handle(handle);
            if let Some(c) = &classification {
                line = line.with_state(c.state);
            }
            if current {
                self.report.record(line);
                return None;
            }
            self.report.record(line.with_detail("metadata refreshed"));
            let metadata = self.metadata(handle, drawing_fingerprint, FingerprintOrigin::Drawing);
            return Some(Self::updated(entry, config.clone(), Some(metadata)));
        }

        Some(self.pull_existing(
            entry,
            handle,
            &drawing,
            &baseline,
            classification.as_ref(),
            "imported from the drawing",
            SyncMode::Pull,
        ))
    }

    /// Write the entry into its existing entity, keeping the handle.
    fn push_existing<T: SyncableConfig>(
        &mut self,
        entry: &LoadedEntry<T>,
        handle: Handle,
        yaml: &EntityContent,
        classification: Option<&Classification>,
        detail: &str,
    ) -> EntryChange<T> {
        let name = entry.config.name();
        let fingerprint = yaml.fingerprint();
        self.drawing.update_entity(handle, yaml);
        self.tag(handle, name, T::KIND, &fingerprint, SyncMode::Auto);
        tracing::info!(entity = %name, handle = %handle, "{}", detail);

        let mut line = EntityReport::new(T::KIND, name, Outcome::Pushed)
            .with_mode(SyncMode::Auto)
            .with_handle(handle)
            .with_detail(detail);
        if let Some(c) = classification {
            line = line.with_state(c.state);
        }
        self.report.record(line);

        let metadata = self.metadata(handle, fingerprint, FingerprintOrigin::Yaml);
        Self::updated(entry, entry.config.clone(), Some(metadata))
    }

    /// Take the drawing's content into the entry.
    ///
    /// Only modes that may write the drawing refresh the entity's tag.
    #[allow(clippy::too_many_arguments)]
    fn pull_existing<T: SyncableConfig>(
        &mut self,
        entry: &LoadedEntry<T>,
        handle: Handle,
        drawing: &EntityContent,
        baseline: &ResolvedStyle,
        classification: Option<&Classification>,
        detail: &str,
        mode: SyncMode,
    ) -> EntryChange<T> {
        let name = entry.config.name();
        let fingerprint = drawing.fingerprint();
        let mut config = entry.config.clone();
        config.apply_content(drawing, baseline);

        if config.content(baseline).fingerprint() != fingerprint {
            tracing::debug!(entity = %name, "pulled entry does not reproduce the drawing fingerprint");
        }
        if mode.writes_drawing() {
            self.tag(handle, name, T::KIND, &fingerprint, mode);
        }
        tracing::info!(entity = %name, handle = %handle, "{}", detail);

        let mut line = EntityReport::new(T::KIND, name, Outcome::Pulled)
            .with_mode(mode)
            .with_handle(handle)
            .with_detail(detail);
        if let Some(c) = classification {
            line = line.with_state(c.state);
        }
        self.report.record(line);

        let metadata = self.metadata(handle, fingerprint, FingerprintOrigin::Drawing);
        Self::updated(entry, config, Some(metadata))
    }
}
