//! Tool abstraction.
//!
//! Every external analyzer sits behind one capability contract: validate
//! settings, produce defaults, build and run a command line, normalize raw
//! output, and compare two normalized reports. The set of known tools is a
//! closed enum; adding a tool means adding one variant and one adapter module,
//! nothing else.

pub mod checkstyle;
pub mod descriptor;
pub mod maven;
pub mod pmd;

pub use descriptor::{ParameterSpec, ToolDescriptor};

use crate::compare::{self, Delta};
use crate::exec::{CommandRunner, ExecContext};
use crate::report::NormalizedReport;
use crate::settings::ToolSettings;

/// The closed set of known tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    Checkstyle,
    Pmd,
    Maven,
}

impl ToolKind {
    pub const ALL: [ToolKind; 3] = [ToolKind::Checkstyle, ToolKind::Pmd, ToolKind::Maven];

    /// Resolves a user-supplied name, case-insensitively.
    ///
    /// Unknown names resolve to `None` and are silently skipped wherever user
    /// input is processed; an unrecognized tool is never an error.
    #[must_use]
    pub fn lookup(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "checkstyle" => Some(ToolKind::Checkstyle),
            "pmd" => Some(ToolKind::Pmd),
            "maven" => Some(ToolKind::Maven),
            _ => None,
        }
    }

    /// Canonical lower-case name, used as the key in all stored documents.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            ToolKind::Checkstyle => "checkstyle",
            ToolKind::Pmd => "pmd",
            ToolKind::Maven => "maven",
        }
    }

    /// The adapter owned by this identity.
    #[must_use]
    pub fn tool(self) -> &'static dyn Tool {
        match self {
            ToolKind::Checkstyle => &checkstyle::Checkstyle,
            ToolKind::Pmd => &pmd::Pmd,
            ToolKind::Maven => &maven::Maven,
        }
    }
}

/// The polymorphic capability contract all tools implement.
pub trait Tool: Sync {
    /// Static metadata; drives defaults, validation and `describe`.
    fn descriptor(&self) -> &ToolDescriptor;

    /// Builds the external command line for one run.
    fn command(&self, settings: &ToolSettings, ctx: &ExecContext) -> String;

    /// Normalizes raw tool output.
    ///
    /// Must tolerate malformed input by returning `None`; external tool output
    /// is not under this system's control.
    fn parse(&self, raw: &str) -> Option<NormalizedReport>;

    fn name(&self) -> &'static str {
        self.descriptor().name
    }

    /// One canonical default value per required parameter.
    fn default_settings(&self) -> ToolSettings {
        self.descriptor().defaults()
    }

    /// Fails closed; unrecognized parameter keys are ignored.
    fn verify_settings(&self, settings: &ToolSettings) -> bool {
        self.descriptor().accepts(settings)
    }

    /// Runs the tool against the project and normalizes its output.
    ///
    /// `None` means the process produced no usable output -- a recoverable,
    /// reportable condition, not a failure of the build run.
    fn execute(
        &self,
        settings: &ToolSettings,
        ctx: &ExecContext,
        runner: &dyn CommandRunner,
    ) -> Option<NormalizedReport> {
        let command = self.command(settings, ctx);
        tracing::debug!(tool = self.name(), %command, "invoking tool");
        let raw = runner.run(&command, &ctx.project_dir)?;
        self.parse(&raw)
    }

    /// Diffs two normalized reports. Pure.
    fn compare(
        &self,
        current: Option<&NormalizedReport>,
        previous: Option<&NormalizedReport>,
    ) -> Delta {
        compare::diff(current, previous)
    }
}
