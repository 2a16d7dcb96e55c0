//! Fixed artifact locations under a project directory.
use std::path::PathBuf;

/// Paths to the tracked artifacts, all relative to one project root.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    root: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: PathBuf) -> Self {
        Self { root }
    }

    /// Source outline of epics and stories (read-only input).
    pub fn outline_path(&self) -> PathBuf {
        self.root.join("docs").join("epics.md")
    }

    /// Structured story/epic status file.
    pub fn store_path(&self) -> PathBuf {
        self.root.join("docs").join("development-status.json")
    }

    /// Narrative workflow status document.
    pub fn narrative_path(&self) -> PathBuf {
        self.root.join("docs").join("project-status.md")
    }

    /// Pre-rename filename still found in older projects.
    pub fn legacy_narrative_path(&self) -> PathBuf {
        self.root.join("docs").join("workflow-status.md")
    }
}
