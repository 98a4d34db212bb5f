//! State of one sync pass

use chrono::{DateTime, Utc};
use cadsync_drawing::Handle;
use cadsync_meta::{
    EntityConfig, EntityKind, EntryChange, FingerprintOrigin, LoadedCollection, LoadedEntry,
    SyncMetadata, SyncMode, SyncSettings,
};

use super::report::{EntityReport, Outcome, SyncReport};
use crate::access::{DrawingAccess, TrackedDrawing};
use crate::discovery::{self, DiscoveredEntity, DuplicateCandidate, KnownEntities};
use crate::entry::SyncableConfig;
use crate::ownership::OwnershipTag;
use crate::style::{Presentation, ResolvedStyle, StyleResolver};

pub(crate) struct SyncPass<'a, D: DrawingAccess + ?Sized> {
    pub(crate) drawing: TrackedDrawing<'a, D>,
    pub(crate) settings: &'a SyncSettings,
    pub(crate) presentation: Presentation<'a>,
    pub(crate) now: DateTime<Utc>,
    pub(crate) report: SyncReport,
    pub(crate) known: KnownEntities,
    pub(crate) duplicates: Vec<DuplicateCandidate>,
}

impl<'a, D: DrawingAccess + ?Sized> SyncPass<'a, D> {
    pub(crate) fn new(
        drawing: &'a mut D,
        settings: &'a SyncSettings,
        styles: &'a dyn StyleResolver,
        now: DateTime<Utc>,
    ) -> Self {
        Self {
            drawing: TrackedDrawing::new(drawing),
            settings,
            presentation: Presentation::new(styles, settings),
            now,
            report: SyncReport::new(),
            known: KnownEntities::new(),
            duplicates: Vec::new(),
        }
    }

    /// Register a collection's names and recorded handles as known.
    pub(crate) fn learn<T: EntityConfig>(&mut self, collection: &LoadedCollection<T>) {
        for name in collection.names() {
            self.known.add_name(T::KIND, name);
        }
        for entry in &collection.entries {
            if let Some(handle) = entry
                .config
                .metadata()
                .and_then(|m| m.stable_id.parse::<Handle>().ok())
            {
                self.known.add_handle(handle);
            }
        }
    }

    pub(crate) fn baseline<T: EntityConfig>(&self, config: &T) -> ResolvedStyle {
        self.presentation
            .baseline(T::KIND, config.name(), config.style())
    }

    /// The handle recorded in an entry's `_sync` block.
    pub(crate) fn recorded_handle<T: EntityConfig>(&self, config: &T) -> Option<Handle> {
        let metadata = config.metadata()?;
        match metadata.stable_id.parse::<Handle>() {
            Ok(handle) if !handle.is_null() => Some(handle),
            _ => {
                tracing::warn!(
                    entity = %config.name(),
                    stable_id = %metadata.stable_id,
                    "recorded stable id is not a drawing handle"
                );
                None
            }
        }
    }

    pub(crate) fn metadata(
        &self,
        handle: Handle,
        fingerprint: impl Into<String>,
        origin: FingerprintOrigin,
    ) -> SyncMetadata {
        SyncMetadata::new(handle.to_string(), fingerprint, origin, self.now)
    }

    /// Write the named ownership tag of an entry onto its entity.
    pub(crate) fn tag(
        &mut self,
        handle: Handle,
        name: &str,
        kind: EntityKind,
        fingerprint: &str,
        mode: SyncMode,
    ) {
        let tag = OwnershipTag {
            name: name.to_string(),
            kind,
            fingerprint: fingerprint.to_string(),
            stable_id: handle,
            mode,
        };
        self.drawing
            .attach_tag(handle, &self.settings.script_id, Some(&tag));
    }

    pub(crate) fn strip_stale(&mut self, stale: &[Handle]) {
        for handle in stale {
            self.drawing.strip_tag(*handle, &self.settings.script_id);
        }
    }

    pub(crate) fn note_duplicates(&mut self, kind: EntityKind, name: &str, handles: &[Handle]) {
        for handle in handles {
            if self.duplicates.iter().any(|d| d.handle == *handle) {
                continue;
            }
            self.duplicates.push(DuplicateCandidate {
                kind,
                handle: *handle,
                original: name.to_string(),
            });
        }
    }

    /// The entry with new metadata, as a document change.
    pub(crate) fn updated<T: EntityConfig>(
        entry: &LoadedEntry<T>,
        mut config: T,
        metadata: Option<SyncMetadata>,
    ) -> EntryChange<T> {
        config.set_metadata(metadata);
        EntryChange::Update {
            index: entry.index,
            config,
        }
    }

    /// Run discovery over the entities no entry claimed.
    pub(crate) fn discover(&mut self) -> Vec<DiscoveredEntity> {
        if !self.settings.discovery_enabled {
            for duplicate in &self.duplicates {
                self.report.record(
                    EntityReport::new(duplicate.kind, duplicate.proposed_name(), Outcome::Skipped)
                        .with_handle(duplicate.handle)
                        .with_detail(format!(
                            "duplicate of '{}'; discovery is disabled",
                            duplicate.original
                        )),
                );
            }
            return Vec::new();
        }
        discovery::discover(&self.drawing, self.settings, &self.known, &self.duplicates)
    }

    /// Turn discovered entities of kind `T` into new entries and tag them.
    pub(crate) fn adopt_discovered<T: SyncableConfig>(
        &mut self,
        found: &[DiscoveredEntity],
    ) -> Vec<EntryChange<T>> {
        let mut changes = Vec::new();
        for discovered in found.iter().filter(|d| d.kind == T::KIND) {
            let baseline = self.presentation.baseline(T::KIND, &discovered.name, None);
            let Some(mut config) = T::from_content(&discovered.name, &discovered.content, &baseline)
            else {
                continue;
            };
            let fingerprint = discovered.content.fingerprint();
            config.set_sync(Some(SyncMode::Skip));
            config.set_metadata(Some(self.metadata(
                discovered.handle,
                fingerprint.clone(),
                FingerprintOrigin::Drawing,
            )));
            self.tag(
                discovered.handle,
                &discovered.name,
                T::KIND,
                &fingerprint,
                SyncMode::Skip,
            );

            tracing::info!(
                kind = %T::KIND,
                entity = %discovered.name,
                handle = %discovered.handle,
                "discovered drawing entity"
            );
            let mut line = EntityReport::new(T::KIND, discovered.name.clone(), Outcome::Discovered)
                .with_mode(SyncMode::Skip)
                .with_handle(discovered.handle);
            if let Some(original) = &discovered.duplicate_of {
                line = line.with_detail(format!("duplicate of '{}'", original));
            }
            self.report.record(line);
            changes.push(EntryChange::Append { config });
        }
        changes
    }

    pub(crate) fn finish(self) -> SyncReport {
        let mut report = self.report;
        report.drawing_modified = self.drawing.is_modified();
        report
    }
}
