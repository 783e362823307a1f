//! Maven adapter.
//!
//! The build runner has no structured output format. The normalizer derives a
//! build status from the `BUILD SUCCESS` marker, counts `[ERROR]` lines into
//! the error metric, and lifts compiler diagnostics of the form
//! `[ERROR] /path/File.java:[line,col] message` into per-file findings.

use crate::exec::ExecContext;
use crate::report::{Finding, Metrics, NormalizedReport};
use crate::settings::ToolSettings;
use crate::tools::descriptor::{ParameterSpec, ToolDescriptor};
use crate::tools::Tool;
use indexmap::IndexMap;
use regex::Regex;
use std::sync::LazyLock;

const COMMAND: &str = "command";

static DESCRIPTOR: LazyLock<ToolDescriptor> = LazyLock::new(|| {
    let mut parameters = IndexMap::new();
    parameters.insert(
        COMMAND,
        ParameterSpec {
            default: "mvn package",
            allowed: None,
            prefix: Some("mvn"),
            description: "Maven command line to run in the project directory",
        },
    );
    ToolDescriptor {
        name: "maven",
        parameters,
    }
});

static COMPILER_DIAGNOSTIC: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\[ERROR\]\s+(?P<file>[^\s\[][^\[]*?):\[(?P<line>\d+),\d+\]\s*(?P<msg>.*)$")
        .unwrap_or_else(|_| panic!("Invalid Regex"))
});

pub struct Maven;

impl Tool for Maven {
    fn descriptor(&self) -> &ToolDescriptor {
        &DESCRIPTOR
    }

    fn command(&self, settings: &ToolSettings, _ctx: &ExecContext) -> String {
        settings
            .get(COMMAND)
            .cloned()
            .unwrap_or_else(|| "mvn package".to_string())
    }

    fn parse(&self, raw: &str) -> Option<NormalizedReport> {
        let mut files: IndexMap<String, Vec<Finding>> = IndexMap::new();
        let mut errors: i64 = 0;

        for line in raw.lines() {
            if !line.starts_with("[ERROR]") {
                continue;
            }
            errors += 1;
            if let Some(caps) = COMPILER_DIAGNOSTIC.captures(line) {
                let file = caps["file"].to_string();
                let finding = Finding {
                    line: caps["line"].parse().unwrap_or(0),
                    severity: "error".to_string(),
                    message: caps["msg"].trim().to_string(),
                };
                files.entry(file).or_default().push(finding);
            }
        }

        let status = if raw.contains("BUILD SUCCESS") {
            "success"
        } else {
            "failure"
        };

        Some(NormalizedReport {
            report: files,
            metrics: Metrics {
                errors,
                build_status: Some(status.to_string()),
            },
        })
    }
}
