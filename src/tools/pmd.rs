//! PMD adapter.
//!
//! Invokes PMD with XML output and normalizes the `<file>`/`<violation>`
//! document. Violation messages live in element text rather than attributes,
//! and the severity marker is PMD's numeric `priority`.

use crate::exec::ExecContext;
use crate::report::{Finding, Metrics, NormalizedReport};
use crate::settings::ToolSettings;
use crate::tools::descriptor::{ParameterSpec, ToolDescriptor};
use crate::tools::Tool;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::sync::LazyLock;

const RULESET: &str = "ruleset";

static DESCRIPTOR: LazyLock<ToolDescriptor> = LazyLock::new(|| {
    let mut parameters = IndexMap::new();
    parameters.insert(
        RULESET,
        ParameterSpec {
            default: "rulesets/java/quickstart.xml",
            allowed: Some(&["rulesets/java/quickstart.xml"]),
            prefix: None,
            description: "Rule set the sources are linted against",
        },
    );
    ToolDescriptor {
        name: "pmd",
        parameters,
    }
});

pub struct Pmd;

impl Tool for Pmd {
    fn descriptor(&self) -> &ToolDescriptor {
        &DESCRIPTOR
    }

    fn command(&self, settings: &ToolSettings, ctx: &ExecContext) -> String {
        let ruleset = settings.get(RULESET).map_or_else(
            || {
                DESCRIPTOR
                    .parameters
                    .get(RULESET)
                    .map_or("", |spec| spec.default)
            },
            String::as_str,
        );
        let binary = ctx.tools_dir.join("pmd/bin/pmd");
        format!(
            "\"{}\" -d \"{}\" -R {ruleset} -f xml",
            binary.display(),
            ctx.project_dir.display(),
        )
    }

    fn parse(&self, raw: &str) -> Option<NormalizedReport> {
        parse_xml(raw)
    }
}

fn attr(element: &BytesStart<'_>, name: &str) -> Option<String> {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(std::borrow::Cow::into_owned)
}

/// Normalizes a PMD XML document; `None` for anything that isn't one.
fn parse_xml(raw: &str) -> Option<NormalizedReport> {
    let mut reader = Reader::from_str(raw);
    let mut files: IndexMap<String, Vec<Finding>> = IndexMap::new();
    let mut errors: i64 = 0;
    let mut current_file: Option<String> = None;
    let mut pending: Option<Finding> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                if !saw_root {
                    if name.as_ref() != b"pmd" {
                        return None;
                    }
                    saw_root = true;
                    continue;
                }
                match name.as_ref() {
                    b"file" => {
                        let location = attr(e, "name")?;
                        files.entry(location.clone()).or_default();
                        current_file = Some(location);
                    }
                    b"violation" => {
                        errors += 1;
                        pending = Some(Finding {
                            line: attr(e, "beginline")
                                .and_then(|v| v.parse().ok())
                                .unwrap_or(0),
                            severity: attr(e, "priority").unwrap_or_default(),
                            message: String::new(),
                        });
                    }
                    _ => {}
                }
            }
            Ok(Event::Text(ref t)) => {
                if let Some(finding) = pending.as_mut() {
                    if let Ok(text) = t.unescape() {
                        finding.message.push_str(&text);
                    }
                }
            }
            Ok(Event::End(ref e)) => match e.local_name().as_ref() {
                b"violation" => {
                    if let (Some(mut finding), Some(location)) =
                        (pending.take(), current_file.as_ref())
                    {
                        finding.message = finding.message.trim().to_string();
                        if let Some(list) = files.get_mut(location) {
                            list.push(finding);
                        }
                    }
                }
                b"file" => current_file = None,
                _ => {}
            },
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(error = %e, "unparsable pmd output");
                return None;
            }
            Ok(_) => {}
        }
    }

    if !saw_root {
        return None;
    }
    Some(NormalizedReport {
        report: files,
        metrics: Metrics {
            errors,
            build_status: None,
        },
    })
}
