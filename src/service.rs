//! Project orchestration.
//!
//! Ties the store, the artifact storage, and the tool adapters together:
//! register a project, reconcile its settings, run a fence (one sequential
//! pass over every configured tool), and hand back the comparison set.
//!
//! Failure policy follows the error taxonomy of the design: bad user input
//! and missing artifacts are descriptive outcomes or empty state, a tool that
//! produces no usable output downgrades to an absent report, and only broken
//! collaborators (unreadable store, unwritable artifacts) surface as errors.

use crate::artifacts::{ArtifactStore, REPORT_FILE, SETTINGS_FILE};
use crate::compare::Delta;
use crate::error::{FenceError, Result};
use crate::exec::{CommandRunner, ExecContext};
use crate::report::{NormalizedReport, ProjectReport};
use crate::settings::{self, SettingsDoc};
use crate::store::{Project, ProjectStore};
use crate::tools::ToolKind;
use chrono::Utc;
use indexmap::IndexMap;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};

/// Whether registration created a new project or touched an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    Created,
    Updated,
}

/// Result of a fence run: one comparison record per configured tool.
///
/// Serializes as `{"status":"pass","report":{...}}`; the per-tool normalized
/// reports are persisted but deliberately not part of this payload.
#[derive(Debug, Serialize)]
pub struct FenceOutcome {
    pub status: &'static str,
    #[serde(rename = "report")]
    pub comparisons: IndexMap<String, Delta>,
}

pub struct ProjectService<S: ProjectStore> {
    store: S,
    artifacts: ArtifactStore,
    runner: Box<dyn CommandRunner>,
    tools_dir: PathBuf,
}

impl<S: ProjectStore> ProjectService<S> {
    pub fn new(
        store: S,
        artifacts: ArtifactStore,
        runner: Box<dyn CommandRunner>,
        tools_dir: PathBuf,
    ) -> Self {
        Self {
            store,
            artifacts,
            runner,
            tools_dir,
        }
    }

    /// Registers a project, optionally seeding its settings inline.
    ///
    /// Re-registering an existing name updates its source path and, when
    /// inline settings are given, rebuilds the effective settings from tool
    /// defaults plus the supplied overrides.
    ///
    /// # Errors
    /// `InvalidSettings` for a malformed inline settings document; store and
    /// artifact failures pass through.
    pub fn register(
        &mut self,
        name: &str,
        source_path: &Path,
        inline_settings: Option<&str>,
    ) -> Result<RegisterOutcome> {
        if name.trim().is_empty() {
            return Err(FenceError::InvalidProject(
                "project name required".to_string(),
            ));
        }

        let existing = self.store.find(name)?;
        let outcome = if existing.is_some() {
            RegisterOutcome::Updated
        } else {
            RegisterOutcome::Created
        };

        let project = match existing {
            Some(mut p) => {
                p.source_path = source_path.to_path_buf();
                p
            }
            None => Project::new(name, source_path),
        };
        self.store.save(project)?;

        if let Some(text) = inline_settings {
            let incoming = settings::parse_incoming(text)?;
            let effective = settings::reconcile(&SettingsDoc::default(), &incoming);
            self.artifacts
                .write(name, SETTINGS_FILE, &serde_json::to_string(&effective)?)?;
        }

        tracing::info!(project = name, ?outcome, "project registered");
        Ok(outcome)
    }

    /// Reconciles an incoming settings update against the persisted
    /// effective settings and stores the result.
    ///
    /// # Errors
    /// `ProjectNotFound` for an unknown project, `InvalidSettings` for a
    /// malformed update; on either, the persisted settings are untouched.
    pub fn update_settings(&mut self, name: &str, incoming_text: &str) -> Result<()> {
        self.require_project(name)?;
        let incoming = settings::parse_incoming(incoming_text)?;

        // An unreadable existing document degrades to empty, the same as a
        // first-ever update.
        let effective = self
            .artifacts
            .read(name, SETTINGS_FILE)?
            .and_then(|text| SettingsDoc::parse(&text).ok())
            .unwrap_or_default();

        let next = settings::reconcile(&effective, &incoming);
        self.artifacts
            .write(name, SETTINGS_FILE, &serde_json::to_string(&next)?)?;
        tracing::info!(project = name, tools = next.0.len(), "settings updated");
        Ok(())
    }

    /// Runs every configured tool against the project and returns the
    /// comparison set.
    ///
    /// Tools run sequentially in settings-document order. A tool with no
    /// usable output is recorded as absent and compared as such; the run
    /// still completes, the aggregate report replaces the previous one, and
    /// the project's last-build timestamp is stamped.
    ///
    /// # Errors
    /// `ProjectNotFound` when the project does not exist and
    /// `SettingsUnreadable` when its effective settings are missing or
    /// unparsable. An unparsable previous report is not an error; it reads as
    /// "no previous report".
    pub fn fence(&mut self, name: &str) -> Result<FenceOutcome> {
        let mut project = self.require_project(name)?;

        let settings_text = self
            .artifacts
            .read(name, SETTINGS_FILE)?
            .ok_or_else(|| FenceError::SettingsUnreadable(name.to_string()))?;
        let effective = SettingsDoc::parse(&settings_text)
            .map_err(|_| FenceError::SettingsUnreadable(name.to_string()))?;

        let previous = self
            .artifacts
            .read(name, REPORT_FILE)?
            .and_then(|text| ProjectReport::parse(&text).ok())
            .unwrap_or_default();

        let ctx = ExecContext {
            project_dir: project.source_path.clone(),
            tools_dir: self.tools_dir.clone(),
        };

        let mut aggregate = ProjectReport::default();
        let mut comparisons = IndexMap::new();

        for (tool_name, tool_settings) in effective.iter() {
            // Stale hand-edited entries no lookup recognizes are skipped.
            let Some(kind) = ToolKind::lookup(tool_name) else {
                tracing::warn!(tool = %tool_name, "unrecognized tool in effective settings");
                continue;
            };
            let tool = kind.tool();
            tracing::info!(project = name, tool = kind.name(), "running tool");

            let current = tool.execute(tool_settings, &ctx, self.runner.as_ref());
            if current.is_none() {
                tracing::warn!(project = name, tool = kind.name(), "no usable output");
            }

            let delta = tool.compare(current.as_ref(), previous.get(kind.name()));
            aggregate.insert(kind.name().to_string(), current);
            comparisons.insert(kind.name().to_string(), delta);
        }

        self.artifacts
            .write(name, REPORT_FILE, &serde_json::to_string(&aggregate)?)?;
        project.last_build = Some(Utc::now());
        self.store.update(&project)?;

        Ok(FenceOutcome {
            status: "pass",
            comparisons,
        })
    }

    /// Raw persisted settings document; `None` when not present.
    ///
    /// # Errors
    /// `ProjectNotFound` for an unknown project.
    pub fn get_settings(&self, name: &str) -> Result<Option<String>> {
        self.require_project(name)?;
        self.artifacts.read(name, SETTINGS_FILE)
    }

    /// Raw persisted report document; `None` when no run has completed.
    ///
    /// # Errors
    /// `ProjectNotFound` for an unknown project.
    pub fn get_report(&self, name: &str) -> Result<Option<String>> {
        self.require_project(name)?;
        self.artifacts.read(name, REPORT_FILE)
    }

    /// # Errors
    /// Store failures pass through.
    pub fn find_all(&self) -> Result<Vec<Project>> {
        self.store.find_all()
    }

    /// Deletes a project and its artifacts; `false` when it never existed.
    ///
    /// # Errors
    /// Store and artifact failures pass through.
    pub fn delete(&mut self, name: &str) -> Result<bool> {
        if self.store.find(name)?.is_none() {
            return Ok(false);
        }
        self.artifacts.remove_project(name)?;
        self.store.delete(name)?;
        tracing::info!(project = name, "project deleted");
        Ok(true)
    }

    /// Runs one tool with its default settings against a caller-supplied
    /// source snippet, without touching any registered project.
    ///
    /// # Errors
    /// `UnknownTool` for an unrecognized tool name; scratch-file I/O failures
    /// pass through.
    pub fn instant_report(
        &self,
        tool_name: &str,
        source: &str,
    ) -> Result<Option<NormalizedReport>> {
        let kind = ToolKind::lookup(tool_name)
            .ok_or_else(|| FenceError::UnknownTool(tool_name.to_string()))?;
        let tool = kind.tool();

        let sample_dir = self.artifacts.root().join("sample");
        fs::create_dir_all(&sample_dir).map_err(|e| FenceError::io(e, &sample_dir))?;
        let sample = sample_dir.join("Test.java");
        fs::write(&sample, source).map_err(|e| FenceError::io(e, &sample))?;

        let ctx = ExecContext {
            project_dir: sample_dir,
            tools_dir: self.tools_dir.clone(),
        };
        Ok(tool.execute(&tool.default_settings(), &ctx, self.runner.as_ref()))
    }

    fn require_project(&self, name: &str) -> Result<Project> {
        self.store
            .find(name)?
            .ok_or_else(|| FenceError::ProjectNotFound(name.to_string()))
    }
}

/// Aggregate descriptor document for every known tool, keyed by name.
#[must_use]
pub fn describe_tools() -> serde_json::Value {
    let mut map = serde_json::Map::new();
    for kind in ToolKind::ALL {
        let descriptor = serde_json::to_value(kind.tool().descriptor())
            .unwrap_or(serde_json::Value::Null);
        map.insert(kind.name().to_string(), descriptor);
    }
    serde_json::Value::Object(map)
}
