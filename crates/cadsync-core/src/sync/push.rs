//! Bulk regeneration: push batches and geometry layers
//!
//! A push batch deletes what it owns and recreates it. Ownership is decided
//! by tag: named batches clear push-mode tags of their own kind, geometry
//! layers clear the anonymous tags naming them as source. Entities tagged by
//! entries in other modes are never cleared, even when they share a layer
//! with the batch.

use std::collections::{BTreeSet, HashSet};

use cadsync_drawing::Handle;
use cadsync_meta::{
    EntityConfig, EntityKind, EntryChange, FingerprintOrigin, GeometryLayerConfig,
    LoadedCollection, LoadedEntry, SyncMode,
};

use super::pass::SyncPass;
use super::report::{EntityError, EntityReport, Outcome};
use crate::access::DrawingAccess;
use crate::content::{Appearance, EntityContent, kind_of};
use crate::entry::SyncableConfig;
use crate::geometry::GeometryProvider;
use crate::ownership::{TagLookup, geometry_source, read_tag, write_geometry_tag};
use crate::{Error, Result};

impl<D: DrawingAccess + ?Sized> SyncPass<'_, D> {
    /// Regenerate all push-mode entries of a collection.
    ///
    /// `protected` names entries of the same collection in other modes.
    pub(crate) fn push_batch<T: SyncableConfig>(
        &mut self,
        entries: &[&LoadedEntry<T>],
        protected: &HashSet<String>,
    ) -> Vec<EntryChange<T>> {
        let script_id = self.settings.script_id.clone();
        let resolved: Vec<(&LoadedEntry<T>, EntityContent)> = entries
            .iter()
            .map(|entry| {
                let baseline = self.baseline(&entry.config);
                (*entry, entry.config.content(&baseline))
            })
            .collect();
        let layers: HashSet<String> = resolved
            .iter()
            .map(|(_, content)| content.appearance().layer.to_uppercase())
            .collect();

        let mut doomed = BTreeSet::new();
        for entity in self.drawing.entities() {
            if kind_of(entity) != Some(T::KIND) || !layers.contains(&entity.layer().to_uppercase()) {
                continue;
            }
            if let TagLookup::Tracked(tag) = read_tag(entity, &script_id)
                && tag.kind == T::KIND
                && tag.mode == SyncMode::Push
                && !protected.contains(&tag.name)
            {
                doomed.insert(entity.handle());
            }
        }

        // Previous instances, wherever they are and however they were tagged
        for (entry, _) in &resolved {
            let name = entry.config.name();
            if let Some(handle) = self.recorded_handle(&entry.config)
                && let Some(entity) = self.drawing.entity(handle)
                && kind_of(entity) == Some(T::KIND)
            {
                let previous = match read_tag(entity, &script_id) {
                    TagLookup::Tracked(tag) => tag.name == name && tag.kind == T::KIND,
                    TagLookup::Untracked | TagLookup::Foreign(_) => true,
                    TagLookup::Anonymous => false,
                };
                if previous {
                    doomed.insert(handle);
                }
            }
            doomed.extend(self.drawing.find_entities_by_tag(&script_id, name, T::KIND));
        }

        for handle in &doomed {
            self.drawing.delete_entity(*handle);
        }
        tracing::debug!(kind = %T::KIND, cleared = doomed.len(), "cleared push-owned entities");

        let mut changes = Vec::new();
        for (entry, content) in resolved {
            let name = entry.config.name();
            let handle = self.drawing.create_from_content(&content);
            let fingerprint = content.fingerprint();
            self.tag(handle, name, T::KIND, &fingerprint, SyncMode::Push);

            let outcome = if entry.config.metadata().is_some() {
                Outcome::Regenerated
            } else {
                Outcome::Created
            };
            tracing::info!(entity = %name, handle = %handle, "{}", outcome);
            self.report.record(
                EntityReport::new(T::KIND, name, outcome)
                    .with_mode(SyncMode::Push)
                    .with_handle(handle),
            );
            let metadata = self.metadata(handle, fingerprint, FingerprintOrigin::Yaml);
            changes.push(Self::updated(entry, entry.config.clone(), Some(metadata)));
        }
        changes
    }

    /// Process the `geometry_layers` collection.
    pub(crate) fn process_geometry(
        &mut self,
        collection: &LoadedCollection<GeometryLayerConfig>,
        provider: &dyn GeometryProvider,
    ) -> Vec<EntryChange<GeometryLayerConfig>> {
        for malformed in &collection.malformed {
            self.report.errors.push(EntityError::from(malformed));
        }

        let sources: HashSet<String> = collection.names().into_iter().collect();
        let mut changes = Vec::new();
        for entry in &collection.entries {
            let config = &entry.config;
            let mode = self
                .settings
                .effective_mode(EntityKind::Geometry, config.sync());
            match mode {
                SyncMode::Push => match self.regenerate_layer(entry, provider, &sources) {
                    Ok(change) => changes.extend(change),
                    Err(e) => self.report.fail(EntityKind::Geometry, &config.name, e.to_string()),
                },
                SyncMode::Skip => {
                    tracing::debug!(entity = %config.name, "sync mode skip");
                    self.report.record(
                        EntityReport::new(EntityKind::Geometry, &config.name, Outcome::Skipped)
                            .with_mode(SyncMode::Skip),
                    );
                }
                SyncMode::Auto | SyncMode::Pull => {
                    let error = Error::UnsupportedMode {
                        name: config.name.clone(),
                        kind: EntityKind::Geometry,
                        mode,
                    };
                    self.report
                        .fail(EntityKind::Geometry, &config.name, error.to_string());
                }
            }
        }
        changes
    }

    fn regenerate_layer(
        &mut self,
        entry: &LoadedEntry<GeometryLayerConfig>,
        provider: &dyn GeometryProvider,
        sources: &HashSet<String>,
    ) -> Result<Option<EntryChange<GeometryLayerConfig>>> {
        let config = &entry.config;
        let script_id = self.settings.script_id.clone();

        // Provider failures leave the drawing untouched
        let payload = provider.resolved_geometry(&config.name)?;
        if let Some(payload) = &payload {
            payload.validate(&config.name)?;
        }

        let baseline = self.baseline(config);
        let appearance = Appearance {
            layer: config.layer.clone().unwrap_or(baseline.layer),
            color: config.color.unwrap_or(baseline.color),
            linetype: config.linetype.clone().unwrap_or(baseline.linetype),
        };

        let mut layers = HashSet::from([appearance.layer.to_uppercase()]);
        // The layer may have been renamed since the last run
        if let Some(handle) = self.recorded_handle(config)
            && let Some(entity) = self.drawing.entity(handle)
            && read_tag(entity, &script_id) == TagLookup::Anonymous
        {
            layers.insert(entity.layer().to_uppercase());
        }
        let doomed: Vec<Handle> = self
            .drawing
            .entities()
            .filter(|e| layers.contains(&e.layer().to_uppercase()))
            .filter(|e| read_tag(e, &script_id) == TagLookup::Anonymous)
            .filter(|e| match geometry_source(e, &script_id) {
                Some(source) => source == config.name || !sources.contains(source),
                // Written before sources were recorded
                None => true,
            })
            .map(|e| e.handle())
            .collect();
        for handle in &doomed {
            self.drawing.delete_entity(*handle);
        }

        let payload = payload.filter(|p| !p.is_empty());
        let Some(payload) = payload else {
            tracing::info!(entity = %config.name, cleared = doomed.len(), "no geometry, layer cleared");
            self.report.record(
                EntityReport::new(EntityKind::Geometry, &config.name, Outcome::Regenerated)
                    .with_mode(SyncMode::Push)
                    .with_detail("no geometry, layer cleared"),
            );
            if config.metadata().is_none() {
                return Ok(None);
            }
            return Ok(Some(Self::updated(entry, config.clone(), None)));
        };

        let mut first = None;
        for mut entity in payload.to_entities(&appearance) {
            write_geometry_tag(&mut entity, &script_id, &config.name);
            let handle = self.drawing.create_entity(entity);
            first.get_or_insert(handle);
        }
        let Some(first) = first else {
            return Err(Error::SyncError {
                message: format!("no entities created for layer '{}'", config.name),
            });
        };

        let outcome = if config.metadata().is_some() {
            Outcome::Regenerated
        } else {
            Outcome::Created
        };
        tracing::info!(
            entity = %config.name,
            layer = %appearance.layer,
            paths = payload.paths.len(),
            "{}",
            outcome
        );
        self.report.record(
            EntityReport::new(EntityKind::Geometry, &config.name, outcome)
                .with_mode(SyncMode::Push)
                .with_handle(first)
                .with_detail(format!("{} polylines", payload.paths.len())),
        );
        let metadata = self.metadata(first, payload.fingerprint(&appearance), FingerprintOrigin::Yaml);
        Ok(Some(Self::updated(entry, config.clone(), Some(metadata))))
    }
}
