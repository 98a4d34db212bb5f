//! SyncEngine implementation
//!
//! The engine reads the project and the drawing once, runs a single pass
//! in memory and writes the drawing, then the project file. A failure to
//! read or write the drawing aborts the run before the project is touched.

use chrono::{DateTime, Utc};
use cadsync_drawing::Drawing;
use cadsync_fs::NormalizedPath;
use cadsync_fs::checksum::compute_file_checksum;
use cadsync_meta::{
    BlockConfig, ConflictPolicy, GeometryLayerConfig, Project, ProjectDocument, SyncSettings,
    TextConfig, ViewportConfig,
};

use super::pass::SyncPass;
use super::report::SyncReport;
use crate::{Error, Result};
use crate::access::DrawingAccess;
use crate::geometry::{FileGeometryProvider, GeometryProvider, NoGeometry};
use crate::style::{StyleResolver, StyleSheet};

/// Options for a sync run
#[derive(Debug, Clone, Default)]
pub struct SyncOptions {
    /// Run the whole pass but write nothing.
    pub dry_run: bool,
    /// Overrides `settings.conflict_policy`.
    pub conflict_policy: Option<ConflictPolicy>,
    /// Disable discovery for this run.
    pub no_discovery: bool,
}

impl SyncOptions {
    pub fn dry_run() -> Self {
        Self {
            dry_run: true,
            ..Self::default()
        }
    }

    /// Settings snapshot for a run: project settings plus these overrides.
    pub fn apply(&self, settings: SyncSettings) -> SyncSettings {
        let settings = match self.conflict_policy {
            Some(policy) => settings.with_conflict_policy(policy),
            None => settings,
        };
        if self.no_discovery {
            settings.with_discovery(false)
        } else {
            settings
        }
    }
}

/// Run one sync pass over an in-memory project document and drawing.
///
/// Entry changes are applied to `document` and entity changes to
/// `drawing`; nothing is written to disk. Per-entity failures end up in
/// the report. Only a structurally broken project returns an error.
pub fn reconcile<D: DrawingAccess + ?Sized>(
    document: &mut ProjectDocument,
    drawing: &mut D,
    settings: &SyncSettings,
    styles: &dyn StyleResolver,
    geometry: &dyn GeometryProvider,
    now: DateTime<Utc>,
) -> Result<SyncReport> {
    let texts = document.collection::<TextConfig>()?;
    let blocks = document.collection::<BlockConfig>()?;
    let viewports = document.collection::<ViewportConfig>()?;
    let geometry_layers = document.collection::<GeometryLayerConfig>()?;

    let mut pass = SyncPass::new(drawing, settings, styles, now);
    pass.learn(&texts);
    pass.learn(&blocks);
    pass.learn(&viewports);
    pass.learn(&geometry_layers);

    let mut text_changes = pass.process_collection(&texts);
    let mut block_changes = pass.process_collection(&blocks);
    let mut viewport_changes = pass.process_collection(&viewports);
    let geometry_changes = pass.process_geometry(&geometry_layers, geometry);

    let found = pass.discover();
    text_changes.extend(pass.adopt_discovered::<TextConfig>(&found));
    block_changes.extend(pass.adopt_discovered::<BlockConfig>(&found));
    viewport_changes.extend(pass.adopt_discovered::<ViewportConfig>(&found));

    let mut report = pass.finish();
    report.project_modified = !(text_changes.is_empty()
        && block_changes.is_empty()
        && viewport_changes.is_empty()
        && geometry_changes.is_empty());

    document.apply(text_changes)?;
    document.apply(block_changes)?;
    document.apply(viewport_changes)?;
    document.apply(geometry_changes)?;

    Ok(report)
}

/// Engine for synchronizing a project file with its drawing
///
/// - **run**: reconcile both sides and persist the result
/// - **status**: the same pass as a dry run, for reporting
pub struct SyncEngine {
    project_path: NormalizedPath,
    geometry: Option<Box<dyn GeometryProvider>>,
}

impl SyncEngine {
    /// Create an engine for the project file at `project_path`.
    ///
    /// Geometry is read from the project's `geometry_dir` unless a provider
    /// is set with [`Self::with_geometry_provider`].
    pub fn new(project_path: NormalizedPath) -> Self {
        Self {
            project_path,
            geometry: None,
        }
    }

    pub fn with_geometry_provider(mut self, provider: Box<dyn GeometryProvider>) -> Self {
        self.geometry = Some(provider);
        self
    }

    pub fn project_path(&self) -> &NormalizedPath {
        &self.project_path
    }

    /// Run one sync pass.
    ///
    /// # Errors
    ///
    /// Returns an error if the project or the drawing cannot be read or
    /// written. Problems with single entries are reported, not returned.
    pub fn run(&self, options: &SyncOptions) -> Result<SyncReport> {
        let now = Utc::now();
        let mut project = Project::load(&self.project_path)?;
        let drawing_path = project.drawing_path();
        let loaded_checksum = if drawing_path.is_file() {
            Some(compute_file_checksum(&drawing_path)?)
        } else {
            None
        };
        let mut drawing = Drawing::load_or_new(&drawing_path)?;

        let settings = options.apply(project.sync_settings());
        let styles = StyleSheet::new(project.styles.clone());
        let file_provider = project.geometry_dir().map(FileGeometryProvider::new);
        let geometry: &dyn GeometryProvider = match (&self.geometry, &file_provider) {
            (Some(provider), _) => &**provider,
            (None, Some(provider)) => provider,
            (None, None) => &NoGeometry,
        };

        tracing::debug!(
            project = %self.project_path,
            drawing = %drawing_path,
            entities = drawing.len(),
            dry_run = options.dry_run,
            "starting sync"
        );

        let mut report = reconcile(
            &mut project.document,
            &mut drawing,
            &settings,
            &styles,
            geometry,
            now,
        )?;
        report.dry_run = options.dry_run;

        if options.dry_run {
            tracing::info!(summary = %report.summary_line(), "dry run, nothing written");
            return Ok(report);
        }

        // Drawing first: a failure here must leave the project untouched
        if report.drawing_modified || !drawing_path.exists() {
            ensure_unchanged(&drawing_path, loaded_checksum.as_deref())?;
            drawing.save(&drawing_path)?;
            tracing::info!(path = %drawing_path, "wrote drawing");
        }
        if report.project_modified {
            project.document.save()?;
            tracing::info!(path = %self.project_path, "wrote project");
        }
        Ok(report)
    }

    /// Classify every entry without writing anything.
    pub fn status(&self) -> Result<SyncReport> {
        self.run(&SyncOptions::dry_run())
    }
}

/// Refuse to overwrite a drawing the editor saved while the pass ran.
fn ensure_unchanged(path: &NormalizedPath, loaded: Option<&str>) -> Result<()> {
    let current = if path.is_file() {
        Some(compute_file_checksum(path)?)
    } else {
        None
    };
    if current.as_deref() != loaded {
        tracing::warn!(path = %path, "drawing changed on disk during the run");
        return Err(Error::DrawingChanged {
            path: path.to_string(),
        });
    }
    Ok(())
}
