// tests/unit_compare.rs
use toolfence_core::compare::{diff, Delta};
use toolfence_core::report::NormalizedReport;
use toolfence_core::tools::{Tool, ToolKind};

fn report(errors: i64) -> NormalizedReport {
    NormalizedReport::with_errors(errors)
}

fn wire(delta: &Delta) -> String {
    serde_json::to_string(delta).unwrap()
}

#[test]
fn identical_counts_yield_zero_change() {
    let current = report(3);
    let delta = diff(Some(&current), Some(&current));
    assert_eq!(delta.errors_then, Some(3));
    assert_eq!(delta.errors_now, Some(3));
    assert_eq!(
        wire(&delta),
        r#"{"errorsThen":3,"errorsNow":3,"percentageChange":"0"}"#
    );
}

#[test]
fn halving_errors_is_half_change() {
    let delta = diff(Some(&report(5)), Some(&report(10)));
    assert_eq!(
        wire(&delta),
        r#"{"errorsThen":10,"errorsNow":5,"percentageChange":"0.5"}"#
    );
}

#[test]
fn change_rounds_to_three_decimals() {
    let delta = diff(Some(&report(1)), Some(&report(3)));
    assert_eq!(
        wire(&delta),
        r#"{"errorsThen":3,"errorsNow":1,"percentageChange":"0.667"}"#
    );
}

#[test]
fn regressions_go_negative() {
    let delta = diff(Some(&report(6)), Some(&report(4)));
    assert_eq!(
        wire(&delta),
        r#"{"errorsThen":4,"errorsNow":6,"percentageChange":"-0.5"}"#
    );
}

#[test]
fn no_baseline_marks_previous_and_change_absent() {
    let delta = diff(Some(&report(3)), None);
    assert_eq!(delta.errors_then, None);
    assert_eq!(delta.errors_now, Some(3));
    assert_eq!(
        wire(&delta),
        r#"{"errorsThen":"null","errorsNow":3,"percentageChange":"null"}"#
    );
}

#[test]
fn no_baseline_regardless_of_current_value() {
    for errors in [0, 1, 42, 10_000] {
        let delta = diff(Some(&report(errors)), None);
        assert_eq!(delta.errors_then, None);
        assert_eq!(delta.errors_now, Some(errors));
        assert_eq!(delta.percentage_change, None);
    }
}

#[test]
fn neither_report_marks_all_three_absent() {
    let delta = diff(None, None);
    assert_eq!(delta, Delta::absent());
    assert_eq!(
        wire(&delta),
        r#"{"errorsThen":"null","errorsNow":"null","percentageChange":"null"}"#
    );
}

#[test]
fn absent_current_with_baseline_compares_as_neither() {
    // A failed run cannot be meaningfully compared even when a baseline exists.
    let delta = diff(None, Some(&report(7)));
    assert_eq!(delta, Delta::absent());
}

#[test]
fn unknown_baseline_sentinel_skips_the_division() {
    let delta = diff(Some(&report(5)), Some(&report(-1)));
    assert_eq!(
        wire(&delta),
        r#"{"errorsThen":-1,"errorsNow":5,"percentageChange":"0"}"#
    );
}

#[test]
fn zero_baseline_does_not_divide() {
    let delta = diff(Some(&report(4)), Some(&report(0)));
    assert_eq!(
        wire(&delta),
        r#"{"errorsThen":0,"errorsNow":4,"percentageChange":"0"}"#
    );
}

#[test]
fn tool_compare_delegates_to_the_engine() {
    let current = report(5);
    let previous = report(10);
    for kind in ToolKind::ALL {
        let delta = kind.tool().compare(Some(&current), Some(&previous));
        assert_eq!(delta, diff(Some(&current), Some(&previous)));
    }
}
