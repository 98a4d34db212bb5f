//! [`TestProject`] builder for sync scenarios.

use std::fs;
use std::path::Path;

use cadsync_drawing::Drawing;
use cadsync_fs::NormalizedPath;
use cadsync_meta::{EntityConfig, ProjectDocument};
use tempfile::TempDir;

pub const PROJECT_FILE: &str = "cadsync.yaml";
pub const DRAWING_FILE: &str = "plan.dxf";

/// A temporary directory holding `cadsync.yaml` and `plan.dxf`.
///
/// # Example
///
/// ```rust,no_run
/// use cadsync_test_utils::TestProject;
///
/// let project = TestProject::new();
/// project.write_project("texts:\n  - name: Satzung\n    text: Satzung\n    position: [0, 0]\n");
/// project.assert_file_exists("cadsync.yaml");
/// ```
pub struct TestProject {
    temp_dir: TempDir,
}

impl Default for TestProject {
    fn default() -> Self {
        Self::new()
    }
}

impl TestProject {
    /// Create an empty temporary directory.
    pub fn new() -> Self {
        Self {
            temp_dir: TempDir::new().unwrap(),
        }
    }

    /// Create a project whose file is `settings` (pointing at `plan.dxf`)
    /// followed by `body`.
    pub fn with_body(body: &str) -> Self {
        let project = Self::new();
        project.write_project(&format!("settings:\n  drawing: {}\n{}", DRAWING_FILE, body));
        project
    }

    pub fn root(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn path(&self, relative: &str) -> NormalizedPath {
        NormalizedPath::new(self.root().join(relative))
    }

    pub fn project_path(&self) -> NormalizedPath {
        self.path(PROJECT_FILE)
    }

    pub fn drawing_path(&self) -> NormalizedPath {
        self.path(DRAWING_FILE)
    }

    pub fn write_file(&self, relative: &str, content: &str) {
        let full_path = self.root().join(relative);
        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(full_path, content).unwrap();
    }

    pub fn read_file(&self, relative: &str) -> String {
        let full_path = self.root().join(relative);
        fs::read_to_string(&full_path)
            .unwrap_or_else(|_| panic!("Could not read file: {}", full_path.display()))
    }

    pub fn write_project(&self, yaml: &str) {
        self.write_file(PROJECT_FILE, yaml);
    }

    pub fn read_project(&self) -> String {
        self.read_file(PROJECT_FILE)
    }

    pub fn write_drawing(&self, drawing: &Drawing) {
        drawing.save(&self.drawing_path()).unwrap();
    }

    /// Load the drawing from disk.
    pub fn drawing(&self) -> Drawing {
        Drawing::load(&self.drawing_path()).unwrap()
    }

    /// Load the project document from disk.
    pub fn document(&self) -> ProjectDocument {
        ProjectDocument::load(&self.project_path()).unwrap()
    }

    /// The valid entries of one collection, in file order.
    pub fn entries<T: EntityConfig>(&self) -> Vec<T> {
        self.document()
            .collection::<T>()
            .unwrap()
            .entries
            .into_iter()
            .map(|e| e.config)
            .collect()
    }

    /// The entry called `name`.
    ///
    /// # Panics
    /// Panics if there is no such entry.
    pub fn entry<T: EntityConfig>(&self, name: &str) -> T {
        self.entries::<T>()
            .into_iter()
            .find(|e| e.name() == name)
            .unwrap_or_else(|| panic!("no {} entry named '{}'", T::KIND, name))
    }

    /// Assert that `path` (relative to the root) exists.
    pub fn assert_file_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            full_path.exists(),
            "Expected file to exist: {}",
            full_path.display()
        );
    }

    /// Assert that `path` (relative to the root) does **not** exist.
    pub fn assert_file_not_exists(&self, path: &str) {
        let full_path = self.root().join(path);
        assert!(
            !full_path.exists(),
            "Expected file NOT to exist: {}",
            full_path.display()
        );
    }

    /// Assert that the file at `path` contains `content`.
    pub fn assert_file_contains(&self, path: &str, content: &str) {
        let file_content = self.read_file(path);
        assert!(
            file_content.contains(content),
            "File {} does not contain expected content.\nExpected: {}\nActual: {}",
            path,
            content,
            file_content
        );
    }
}
