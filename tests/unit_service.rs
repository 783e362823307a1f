// tests/unit_service.rs
use std::path::{Path, PathBuf};

use toolfence_core::artifacts::ArtifactStore;
use toolfence_core::error::FenceError;
use toolfence_core::exec::CommandRunner;
use toolfence_core::service::{self, ProjectService, RegisterOutcome};
use toolfence_core::settings::SettingsDoc;
use toolfence_core::store::JsonProjectStore;

struct NullRunner;

impl CommandRunner for NullRunner {
    fn run(&self, _command: &str, _cwd: &Path) -> Option<String> {
        None
    }
}

fn service(dir: &Path) -> ProjectService<JsonProjectStore> {
    let store = JsonProjectStore::open(dir.join("projects.json")).unwrap();
    ProjectService::new(
        store,
        ArtifactStore::new(dir),
        Box::new(NullRunner),
        dir.join("tools"),
    )
}

fn sources(dir: &Path) -> PathBuf {
    let src = dir.join("demo-src");
    std::fs::create_dir_all(&src).unwrap();
    src
}

#[test]
fn register_then_reregister() {
    let tmp = tempfile::tempdir().unwrap();
    let mut svc = service(tmp.path());
    let src = sources(tmp.path());

    assert_eq!(
        svc.register("demo", &src, None).unwrap(),
        RegisterOutcome::Created
    );
    assert_eq!(
        svc.register("demo", &src, None).unwrap(),
        RegisterOutcome::Updated
    );
}

#[test]
fn register_rejects_blank_names() {
    let tmp = tempfile::tempdir().unwrap();
    let mut svc = service(tmp.path());
    let src = sources(tmp.path());
    assert!(matches!(
        svc.register("   ", &src, None),
        Err(FenceError::InvalidProject(_))
    ));
}

#[test]
fn inline_settings_are_reconciled_from_defaults() {
    let tmp = tempfile::tempdir().unwrap();
    let mut svc = service(tmp.path());
    let src = sources(tmp.path());

    svc.register(
        "demo",
        &src,
        Some(r#"{"checkstyle":{"excludeTestFiles":"yes"},"pop":{}}"#),
    )
    .unwrap();

    let stored = svc.get_settings("demo").unwrap().unwrap();
    let doc = SettingsDoc::parse(&stored).unwrap();
    let checkstyle = doc.get("checkstyle").unwrap();
    assert_eq!(checkstyle.get("styleguide").unwrap(), "google_checks");
    assert_eq!(checkstyle.get("excludeTestFiles").unwrap(), "yes");
    assert!(doc.get("pop").is_none());
}

#[test]
fn malformed_inline_settings_are_invalid() {
    let tmp = tempfile::tempdir().unwrap();
    let mut svc = service(tmp.path());
    let src = sources(tmp.path());
    assert!(matches!(
        svc.register("demo", &src, Some("[not, settings]")),
        Err(FenceError::InvalidSettings)
    ));
}

#[test]
fn settings_operations_require_a_project() {
    let tmp = tempfile::tempdir().unwrap();
    let mut svc = service(tmp.path());
    assert!(matches!(
        svc.update_settings("ghost", "{}"),
        Err(FenceError::ProjectNotFound(_))
    ));
    assert!(matches!(
        svc.get_settings("ghost"),
        Err(FenceError::ProjectNotFound(_))
    ));
    assert!(matches!(
        svc.get_report("ghost"),
        Err(FenceError::ProjectNotFound(_))
    ));
}

#[test]
fn missing_artifacts_read_as_not_present() {
    let tmp = tempfile::tempdir().unwrap();
    let mut svc = service(tmp.path());
    let src = sources(tmp.path());
    svc.register("demo", &src, None).unwrap();
    assert!(svc.get_settings("demo").unwrap().is_none());
    assert!(svc.get_report("demo").unwrap().is_none());
}

#[test]
fn delete_removes_project_and_artifacts() {
    let tmp = tempfile::tempdir().unwrap();
    let mut svc = service(tmp.path());
    let src = sources(tmp.path());
    svc.register("demo", &src, Some(r#"{"maven":{}}"#)).unwrap();

    assert!(svc.delete("demo").unwrap());
    assert!(!svc.delete("demo").unwrap());
    assert!(!tmp.path().join("demo").exists());
    assert!(svc.find_all().unwrap().is_empty());
}

#[test]
fn instant_report_requires_a_known_tool() {
    let tmp = tempfile::tempdir().unwrap();
    let svc = service(tmp.path());
    assert!(matches!(
        svc.instant_report("pop", "class Test {}"),
        Err(FenceError::UnknownTool(_))
    ));
}

#[test]
fn instant_report_with_silent_tool_is_absent() {
    let tmp = tempfile::tempdir().unwrap();
    let svc = service(tmp.path());
    let report = svc.instant_report("checkstyle", "class Test {}").unwrap();
    assert!(report.is_none());
    // the scratch file was written for the tool to inspect
    assert!(tmp.path().join("sample/Test.java").exists());
}

#[test]
fn describe_tools_names_every_tool_and_its_parameters() {
    let doc = service::describe_tools();
    let tools = doc.as_object().unwrap();
    assert_eq!(tools.len(), 3);
    let checkstyle = &tools["checkstyle"];
    assert_eq!(checkstyle["name"], "checkstyle");
    assert_eq!(
        checkstyle["parameters"]["styleguide"]["default"],
        "google_checks"
    );
    assert_eq!(tools["maven"]["parameters"]["command"]["prefix"], "mvn");
    assert_eq!(
        tools["pmd"]["parameters"]["ruleset"]["default"],
        "rulesets/java/quickstart.xml"
    );
}
