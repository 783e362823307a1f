//! Project store.
//!
//! The core only needs existence checks and a last-build timestamp, so the
//! store boundary is small: find/save/update/delete/find_all behind a trait,
//! with a JSON-file-backed implementation that writes through on mutation.

use crate::error::{FenceError, Result};
use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

/// A registered project.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Project {
    pub name: String,
    /// Checked-out sources the tools run against.
    pub source_path: PathBuf,
    pub created: DateTime<Utc>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_build: Option<DateTime<Utc>>,
}

impl Project {
    #[must_use]
    pub fn new(name: impl Into<String>, source_path: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            source_path: source_path.into(),
            created: Utc::now(),
            last_build: None,
        }
    }
}

/// Persistence boundary for project identity and timestamps.
pub trait ProjectStore {
    /// # Errors
    /// Returns an error when the backing store cannot be read.
    fn find(&self, name: &str) -> Result<Option<Project>>;

    /// # Errors
    /// Returns an error when the backing store cannot be read.
    fn find_all(&self) -> Result<Vec<Project>>;

    /// Inserts or replaces a project record.
    ///
    /// # Errors
    /// Returns an error when the backing store cannot be written.
    fn save(&mut self, project: Project) -> Result<()>;

    /// Upserts an existing record (same write semantics as `save`).
    ///
    /// # Errors
    /// Returns an error when the backing store cannot be written.
    fn update(&mut self, project: &Project) -> Result<()>;

    /// Removes a record; `false` when no such project existed.
    ///
    /// # Errors
    /// Returns an error when the backing store cannot be written.
    fn delete(&mut self, name: &str) -> Result<bool>;
}

/// Store backed by a single `projects.json` file.
#[derive(Debug)]
pub struct JsonProjectStore {
    path: PathBuf,
    projects: IndexMap<String, Project>,
}

impl JsonProjectStore {
    /// Opens (or initializes) the store at `path`.
    ///
    /// # Errors
    /// Returns an error when the file exists but cannot be read or parsed;
    /// a missing file is an empty store, not an error.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let projects = match fs::read_to_string(&path) {
            Ok(text) => serde_json::from_str(&text)
                .map_err(|e| FenceError::Store(format!("corrupt project store: {e}")))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => IndexMap::new(),
            Err(e) => return Err(FenceError::io(e, &path)),
        };
        Ok(Self { path, projects })
    }

    fn flush(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(|e| FenceError::io(e, parent))?;
        }
        let text = serde_json::to_string_pretty(&self.projects)?;
        fs::write(&self.path, text).map_err(|e| FenceError::io(e, &self.path))
    }
}

impl ProjectStore for JsonProjectStore {
    fn find(&self, name: &str) -> Result<Option<Project>> {
        Ok(self.projects.get(name).cloned())
    }

    fn find_all(&self) -> Result<Vec<Project>> {
        Ok(self.projects.values().cloned().collect())
    }

    fn save(&mut self, project: Project) -> Result<()> {
        self.projects.insert(project.name.clone(), project);
        self.flush()
    }

    fn update(&mut self, project: &Project) -> Result<()> {
        self.projects
            .insert(project.name.clone(), project.clone());
        self.flush()
    }

    fn delete(&mut self, name: &str) -> Result<bool> {
        let removed = self.projects.shift_remove(name).is_some();
        if removed {
            self.flush()?;
        }
        Ok(removed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_file_is_empty_store() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonProjectStore::open(dir.path().join("projects.json")).unwrap();
        assert!(store.find_all().unwrap().is_empty());
    }

    #[test]
    fn save_persists_across_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        {
            let mut store = JsonProjectStore::open(&path).unwrap();
            store.save(Project::new("demo", "/work/demo")).unwrap();
        }
        let store = JsonProjectStore::open(&path).unwrap();
        let found = store.find("demo").unwrap().unwrap();
        assert_eq!(found.source_path, PathBuf::from("/work/demo"));
        assert!(found.last_build.is_none());
    }

    #[test]
    fn delete_reports_whether_anything_existed() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonProjectStore::open(dir.path().join("projects.json")).unwrap();
        store.save(Project::new("demo", "/work/demo")).unwrap();
        assert!(store.delete("demo").unwrap());
        assert!(!store.delete("demo").unwrap());
        assert!(store.find("demo").unwrap().is_none());
    }

    #[test]
    fn corrupt_store_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("projects.json");
        fs::write(&path, "{broken").unwrap();
        assert!(matches!(
            JsonProjectStore::open(&path),
            Err(FenceError::Store(_))
        ));
    }
}
