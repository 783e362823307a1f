//! Checkstyle adapter.
//!
//! Invokes the Checkstyle jar with XML output on stdout and normalizes the
//! `<file>`/`<error>` document into the common report shape.

use crate::exec::ExecContext;
use crate::report::{Finding, Metrics, NormalizedReport};
use crate::settings::ToolSettings;
use crate::tools::descriptor::{ParameterSpec, ToolDescriptor};
use crate::tools::Tool;
use indexmap::IndexMap;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;
use std::sync::LazyLock;

const STYLEGUIDE: &str = "styleguide";
const EXCLUDE_TEST_FILES: &str = "excludeTestFiles";
const JAR: &str = "checkstyle-8.23-all.jar";

static DESCRIPTOR: LazyLock<ToolDescriptor> = LazyLock::new(|| {
    let mut parameters = IndexMap::new();
    parameters.insert(
        STYLEGUIDE,
        ParameterSpec {
            default: "google_checks",
            allowed: Some(&["sun_checks", "google_checks"]),
            prefix: None,
            description: "Style guide the sources are checked against",
        },
    );
    parameters.insert(
        EXCLUDE_TEST_FILES,
        ParameterSpec {
            default: "no",
            allowed: Some(&["yes", "no"]),
            prefix: None,
            description: "Skip files under src/test",
        },
    );
    ToolDescriptor {
        name: "checkstyle",
        parameters,
    }
});

pub struct Checkstyle;

impl Tool for Checkstyle {
    fn descriptor(&self) -> &ToolDescriptor {
        &DESCRIPTOR
    }

    fn command(&self, settings: &ToolSettings, ctx: &ExecContext) -> String {
        let styleguide = setting_or_default(settings, STYLEGUIDE);
        let exclude_tests = setting_or_default(settings, EXCLUDE_TEST_FILES);

        let jar = ctx.tools_dir.join(JAR);
        let mut command = format!(
            "java -jar \"{}\" -c {styleguide}.xml \"{}\" -f xml -e target",
            jar.display(),
            ctx.project_dir.display(),
        );
        if exclude_tests == "yes" {
            command.push_str(" -e src/test");
        }
        command
    }

    fn parse(&self, raw: &str) -> Option<NormalizedReport> {
        parse_xml(raw)
    }
}

fn setting_or_default<'a>(settings: &'a ToolSettings, key: &str) -> &'a str {
    settings.get(key).map_or_else(
        || {
            DESCRIPTOR
                .parameters
                .get(key)
                .map_or("", |spec| spec.default)
        },
        String::as_str,
    )
}

fn attr(element: &BytesStart<'_>, name: &str) -> Option<String> {
    element
        .try_get_attribute(name)
        .ok()
        .flatten()
        .and_then(|a| a.unescape_value().ok())
        .map(std::borrow::Cow::into_owned)
}

/// Normalizes a Checkstyle XML document.
///
/// The error count includes every `<error>` element in the document, matching
/// the metric consumers already rely on. Anything that is not a Checkstyle
/// document (wrong root, truncated XML) normalizes to `None`.
fn parse_xml(raw: &str) -> Option<NormalizedReport> {
    let mut reader = Reader::from_str(raw);
    let mut files: IndexMap<String, Vec<Finding>> = IndexMap::new();
    let mut errors: i64 = 0;
    let mut current_file: Option<String> = None;
    let mut saw_root = false;

    loop {
        match reader.read_event() {
            Ok(Event::Start(ref e)) | Ok(Event::Empty(ref e)) => {
                let name = e.local_name();
                if !saw_root {
                    if name.as_ref() != b"checkstyle" {
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
                    b"error" => {
                        errors += 1;
                        if let Some(location) = current_file.as_ref() {
                            let finding = Finding {
                                line: attr(e, "line")
                                    .and_then(|v| v.parse().ok())
                                    .unwrap_or(0),
                                severity: attr(e, "severity").unwrap_or_default(),
                                message: attr(e, "message").unwrap_or_default(),
                            };
                            if let Some(list) = files.get_mut(location) {
                                list.push(finding);
                            }
                        }
                    }
                    _ => {}
                }
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"file" => {
                current_file = None;
            }
            Ok(Event::Eof) => break,
            Err(e) => {
                tracing::debug!(error = %e, "unparsable checkstyle output");
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
