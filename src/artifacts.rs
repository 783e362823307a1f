//! Per-project artifact storage.
//!
//! Each project owns exactly two named text artifacts under its data
//! directory: the effective-settings document and the latest report document.
//! Reading an absent artifact is a normal "not present" outcome, never an
//! error.

use crate::error::{FenceError, Result};
use std::fs;
use std::path::{Path, PathBuf};

pub const SETTINGS_FILE: &str = "settings.json";
pub const REPORT_FILE: &str = "report.json";

#[derive(Debug, Clone)]
pub struct ArtifactStore {
    root: PathBuf,
}

impl ArtifactStore {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    fn project_dir(&self, project: &str) -> PathBuf {
        self.root.join(project)
    }

    /// Reads a named artifact; `Ok(None)` when it does not exist.
    ///
    /// # Errors
    /// Returns an error only for I/O failures other than absence.
    pub fn read(&self, project: &str, file: &str) -> Result<Option<String>> {
        let path = self.project_dir(project).join(file);
        match fs::read_to_string(&path) {
            Ok(text) => Ok(Some(text)),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(FenceError::io(e, path)),
        }
    }

    /// Writes a named artifact, creating the project directory as needed.
    ///
    /// # Errors
    /// Returns an error when the directory or file cannot be written.
    pub fn write(&self, project: &str, file: &str, contents: &str) -> Result<()> {
        let dir = self.project_dir(project);
        fs::create_dir_all(&dir).map_err(|e| FenceError::io(e, &dir))?;
        let path = dir.join(file);
        fs::write(&path, contents).map_err(|e| FenceError::io(e, path))
    }

    /// Removes a project's entire artifact directory; absence is fine.
    ///
    /// # Errors
    /// Returns an error when an existing directory cannot be removed.
    pub fn remove_project(&self, project: &str) -> Result<()> {
        let dir = self.project_dir(project);
        match fs::remove_dir_all(&dir) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(FenceError::io(e, dir)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn absent_artifact_reads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        assert!(store.read("demo", SETTINGS_FILE).unwrap().is_none());
    }

    #[test]
    fn write_then_read_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.write("demo", REPORT_FILE, "{}").unwrap();
        assert_eq!(store.read("demo", REPORT_FILE).unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn remove_project_clears_all_artifacts() {
        let dir = tempfile::tempdir().unwrap();
        let store = ArtifactStore::new(dir.path());
        store.write("demo", SETTINGS_FILE, "{}").unwrap();
        store.write("demo", REPORT_FILE, "{}").unwrap();
        store.remove_project("demo").unwrap();
        assert!(store.read("demo", SETTINGS_FILE).unwrap().is_none());
        // removing again is a no-op
        store.remove_project("demo").unwrap();
    }
}
