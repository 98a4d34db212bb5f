//! Loading a project from disk

use cadsync_fs::NormalizedPath;

use crate::Result;
use crate::document::ProjectDocument;
use crate::settings::{ProjectSettings, Styles, SyncSettings};

/// A loaded project: the document plus its parsed settings and styles
#[derive(Debug, Clone)]
pub struct Project {
    pub document: ProjectDocument,
    pub settings: ProjectSettings,
    pub styles: Styles,
}

impl Project {
    /// Load a project file and parse its `settings:` and `styles:` sections.
    pub fn load(path: &NormalizedPath) -> Result<Self> {
        Self::from_document(ProjectDocument::load(path)?)
    }

    pub fn from_document(document: ProjectDocument) -> Result<Self> {
        let settings = document.settings()?;
        let styles = document.styles()?;
        tracing::debug!(
            path = %document.path(),
            drawing = %settings.drawing,
            styles = styles.len(),
            "loaded project"
        );
        Ok(Self {
            document,
            settings,
            styles,
        })
    }

    pub fn path(&self) -> &NormalizedPath {
        self.document.path()
    }

    /// The drawing file, resolved against the project file's directory.
    pub fn drawing_path(&self) -> NormalizedPath {
        self.path().resolve_sibling(&self.settings.drawing)
    }

    /// The geometry payload directory, if configured.
    pub fn geometry_dir(&self) -> Option<NormalizedPath> {
        self.settings
            .geometry_dir
            .as_deref()
            .map(|dir| self.path().resolve_sibling(dir))
    }

    /// Settings snapshot without command-line overrides.
    pub fn sync_settings(&self) -> SyncSettings {
        SyncSettings::from_project(&self.settings)
    }
}
