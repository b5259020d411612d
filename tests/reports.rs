use buildstats::config::{anchored, Registry};
use buildstats::branch::{BranchNormalizer, BranchRule};
use buildstats::{
    BuildRequest, BuildRequestRow, BuildResult, BuildRun, EndToEndTimesReport, Push, PushesReport,
    Status, TimeWindow,
};

const REV: &str = "abc123def456";

fn pending(brid: i64) -> BuildRequestRow {
    BuildRequestRow {
        brid: Some(brid),
        branch: Some("mozilla-central".into()),
        revision: Some(REV.into()),
        when_timestamp: Some(1_000),
        submitted_at: Some(1_005),
        ..Default::default()
    }
}

fn running(brid: i64) -> BuildRequestRow {
    BuildRequestRow {
        claimed_at: Some(1_060),
        start_time: Some(1_070),
        ..pending(brid)
    }
}

fn complete(brid: i64, results: i64) -> BuildRequestRow {
    BuildRequestRow {
        complete: Some(1),
        complete_at: Some(2_000),
        finish_time: Some(1_990),
        results: Some(results),
        ..running(brid)
    }
}

#[test]
fn pending_running_complete_run() {
    let mut run = BuildRun::new(Some(REV.into()), Some("mozilla-central".into()));
    for row in [pending(1), running(2), complete(3, 0)] {
        run.add(BuildRequest::new(row));
    }

    let counts = run.status_counts();
    assert_eq!((counts.pending, counts.running, counts.complete), (1, 1, 1));
    assert_eq!(run.result_counts().success, 1);
    assert_eq!(run.result_counts().other, 2);
    assert_eq!(run.results(), BuildResult::SUCCESS);
    assert!(!run.is_complete());
    assert_eq!(run.get_duration(), 1_000);

    let v = run.to_json(true);
    assert_eq!(v["pending"], 1);
    assert_eq!(v["running"], 1);
    assert_eq!(v["complete"], 1);
    assert_eq!(v["results_success"], 1);
    assert_eq!(v["is_complete"], "no");
}

#[test]
fn cancelled_interrupted_and_misc_count_as_done() {
    let cancelled = BuildRequestRow {
        complete: Some(1),
        complete_at: Some(1_500),
        ..pending(1)
    };
    let interrupted = BuildRequestRow {
        finish_time: None,
        ..complete(2, 5)
    };
    let misc = BuildRequestRow {
        claimed_at: Some(1_050),
        ..pending(3)
    };

    let mut run = BuildRun::new(Some(REV.into()), None);
    let statuses: Vec<Status> = [cancelled, interrupted, misc]
        .into_iter()
        .map(|row| {
            let br = BuildRequest::new(row);
            let status = br.status();
            run.add(br);
            status
        })
        .collect();

    assert_eq!(statuses, [Status::Cancelled, Status::Interrupted, Status::Misc]);
    assert!(run.is_complete());
    assert_eq!(run.results(), BuildResult::RETRY);
    assert_eq!(run.result_counts().failure, 1);
}

#[test]
fn worst_result_never_improves() {
    let mut run = BuildRun::new(None, None);
    run.add(BuildRequest::new(complete(1, 2)));
    run.add(BuildRequest::new(complete(2, 0)));
    run.add(BuildRequest::new(complete(3, 1)));
    assert_eq!(run.results(), BuildResult::FAILURE);
    assert_eq!(run.to_json(true)["results_str"], "FAILURE");
}

#[test]
fn end_to_end_report_over_two_pushes() {
    let mut report = EndToEndTimesReport::new(TimeWindow::new(0, 86_400), "mozilla-central");
    for row in [complete(1, 0), complete(2, 0), pending(2)] {
        report.add_build_request(BuildRequest::new(row));
    }
    report.add_build_request(BuildRequest::new(BuildRequestRow {
        revision: Some("fedcba987654".into()),
        when_timestamp: Some(5_000),
        complete_at: Some(5_300),
        ..complete(4, 0)
    }));

    assert_eq!(report.get_total_build_runs(), 2);
    assert_eq!(report.get_total_build_requests(), 4);
    assert_eq!(report.get_unique_total_build_requests(), 3);
    // (1000 + 300) / 2
    assert_eq!(report.get_avg_duration(), 650.0);

    let v = report.to_json(false);
    assert_eq!(v["build_runs"][REV]["total_build_requests"], 3);
    assert_eq!(v["build_runs"][REV]["is_complete"], "no");
    assert_eq!(v["build_runs"]["fedcba987654"]["is_complete"], "yes");
}

#[test]
fn push_buckets_at_window_edges() {
    let start = 1_700_000_000;
    let width = 3_600;
    let mut report = PushesReport::new(TimeWindow::new(start, start + 4 * width), width, &[]);
    let push = |stime| Push {
        stime,
        branch_name: "mozilla-central".into(),
        revision: None,
        author: None,
    };

    assert_eq!(report.get_interval_index(start), 0);
    assert_eq!(report.get_interval_index(start + width), 1);
    assert_eq!(report.get_interval_index(start - 10), 0);

    assert!(report.add(&push(start)));
    assert!(report.add(&push(start + width)));
    assert!(report.add(&push(start - 10)));
    assert_eq!(report.get_intervals(None), &[2, 1, 0, 0]);
    assert_eq!(report.get_intervals(Some("mozilla-central")), &[2, 1, 0, 0]);
}

#[test]
fn custom_registry_first_match_wins() {
    let rules = vec![
        BranchRule::new("mozilla-central", vec![anchored("mozilla-central.*").unwrap()]),
        BranchRule::new("mozilla-central-try", vec![anchored("mozilla-central-try.*").unwrap()]),
    ];
    let normalizer = BranchNormalizer::new(rules);
    assert_eq!(normalizer.normalize("mozilla-central-try"), "mozilla-central");

    let mut registry = Registry::builtin();
    registry.branches = normalizer;
    let br = BuildRequest::with_registry(
        BuildRequestRow {
            branch: Some("MOZILLA-CENTRAL-TRY".into()),
            ..Default::default()
        },
        &registry,
    );
    assert_eq!(br.branch_name(), Some("mozilla-central"));
}
