use buildstats::window::TimeWindow;
use buildstats::{query, source, Error};
use std::io::Write;

const ROWS: &str = r#"{"brid": 1, "buildsetid": 10, "branch": "mozilla-central", "revision": "0123456789abcdef", "when_timestamp": 1000, "submitted_at": 1002, "claimed_at": 1010, "start_time": 1011, "complete_at": 1600, "finish_time": 1590, "complete": 1, "results": 0, "buildername": "Linux mozilla-central build"}
{"brid": 2, "buildsetid": 10, "branch": "mozilla-central-linux-unittest", "revision": "0123456789abcdef", "when_timestamp": 1000, "submitted_at": 1600, "complete": 0, "results": null, "buildername": "Rev3 Fedora 12 mozilla-central opt test mochitests-1/5"}
{"brid": 3, "buildsetid": 11, "branch": "try", "revision": "ffffffffffff0000", "when_timestamp": 1200, "submitted_at": 1201, "complete": 0}
{"brid": 4, "buildsetid": 12, "branch": "mozilla-central", "revision": null, "submitted_at": 1300, "claimed_at": 1301, "start_time": 1302, "complete": 0}
"#;

fn rows_file() -> tempfile::NamedTempFile {
    let mut f = tempfile::NamedTempFile::new().unwrap();
    f.write_all(ROWS.as_bytes()).unwrap();
    f
}

#[test]
fn end_to_end_from_file() {
    let f = rows_file();
    let rows = source::read_rows(f.path()).unwrap();
    assert_eq!(rows.len(), 4);

    let report = query::get_end_to_end_times(rows, TimeWindow::new(900, 2000), "mozilla-central");
    assert_eq!(report.get_total_build_runs(), 2);
    assert_eq!(report.get_total_build_requests(), 3);

    let run = report.get_run(Some("0123456789ab")).unwrap();
    assert_eq!(run.get_total_build_requests(), 2);
    assert_eq!(run.unittests(), 1);
    assert_eq!(run.builds(), 1);
    assert_eq!(run.get_duration(), 600);
    assert!(!run.is_complete());

    let nightly = report.get_run(None).unwrap();
    assert_eq!(nightly.status_counts().running, 1);
}

#[test]
fn build_run_by_revision_prefix() {
    let f = rows_file();
    let rows = source::read_rows(f.path()).unwrap();
    let run = query::get_build_run(rows, Some("0123456789"), None);
    assert_eq!(run.get_total_build_requests(), 2);
    assert_eq!(run.build_requests()[0].revision(), Some("0123456789ab"));
    assert_eq!(run.build_requests()[0].platform(), Some("linux"));
}

#[test]
fn pushes_from_file() {
    let f = rows_file();
    let rows = source::read_rows(f.path()).unwrap();
    let report = query::get_pushes(&rows, TimeWindow::new(900, 1500), 300, &[]);
    assert_eq!(report.get_total(None), 2);
    assert_eq!(report.get_intervals(None), &[1, 1]);
    assert_eq!(report.get_total(Some("try")), 1);

    let filtered = query::get_pushes(&rows, TimeWindow::new(900, 1500), 300, &["try".to_string()]);
    assert_eq!(filtered.get_total(None), 1);
    assert_eq!(filtered.get_intervals(Some("try")), &[0, 1]);
}

#[test]
fn push_filter_accepts_raw_branch_names() {
    let f = rows_file();
    let rows = source::read_rows(f.path()).unwrap();
    let window = TimeWindow::new(900, 1500);

    let report = query::get_pushes(&rows, window, 0, &["tryserver".to_string()]);
    assert_eq!(report.get_total(None), 1);
    assert_eq!(report.get_total(Some("try")), 1);

    let report = query::get_pushes(&rows, window, 0, &["Mozilla-Central".to_string()]);
    assert_eq!(report.get_total(None), 1);
    assert_eq!(report.get_total(Some("mozilla-central")), 1);
}

#[test]
fn zero_change_time_is_not_a_push() {
    let rows = source::parse_rows(r#"{"branch": "try", "when_timestamp": 0}"#).unwrap();
    let report = query::get_pushes(&rows, TimeWindow::new(0, 100), 0, &[]);
    assert_eq!(report.get_total(None), 0);
}

#[test]
fn missing_file_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let err = source::read_rows(&dir.path().join("nope.jsonl")).unwrap_err();
    assert!(matches!(err, Error::Io { .. }));
}
