// src/query.rs
//
// Row selection and report assembly. Rows are filtered the way the
// scheduler db queries select them, then classified in parallel and folded
// into a report in arrival order.

use crate::config;
use crate::model::{self, BuildRequest, BuildRequestRow};
use crate::pushes::{self, Push, PushesReport};
use crate::report::EndToEndTimesReport;
use crate::run::BuildRun;
use crate::window::TimeWindow;
use rayon::prelude::*;
use std::collections::HashSet;
use tracing::info;

fn branch_contains(row: &BuildRequestRow, name: &str) -> bool {
    row.branch.as_deref().map_or(false, |b| b.contains(name))
}

/// Requests on `branch` whose change or submission falls inside the window.
pub fn matches_end_to_end(row: &BuildRequestRow, window: TimeWindow, branch: &str) -> bool {
    let after_start = |t: Option<i64>| t.map_or(false, |t| t >= window.start);
    let before_end = |t: Option<i64>| t.map_or(false, |t| t < window.end);

    branch_contains(row, branch)
        && (after_start(row.when_timestamp) || after_start(row.submitted_at))
        && (before_end(row.when_timestamp) || before_end(row.submitted_at))
}

/// Requests for one revision, matched on its leading characters. `None`
/// selects requests with no revision at all (nightlies).
pub fn matches_run(row: &BuildRequestRow, revision: Option<&str>, branch: Option<&str>) -> bool {
    let revision_ok = match (revision, row.revision.as_deref()) {
        (None, None) => true,
        (Some(want), Some(have)) => have.starts_with(want),
        _ => false,
    };
    revision_ok && branch.map_or(true, |b| branch_contains(row, b))
}

fn classify(rows: Vec<BuildRequestRow>) -> Vec<BuildRequest> {
    rows.into_par_iter().map(BuildRequest::new).collect()
}

pub fn get_end_to_end_times(
    rows: Vec<BuildRequestRow>,
    window: TimeWindow,
    branch_name: &str,
) -> EndToEndTimesReport {
    let selected: Vec<_> = rows
        .into_iter()
        .filter(|r| matches_end_to_end(r, window, branch_name))
        .collect();

    let mut report = EndToEndTimesReport::new(window, branch_name);
    for br in classify(selected) {
        report.add_build_request(br);
    }
    info!(
        branch = branch_name,
        runs = report.get_total_build_runs(),
        requests = report.get_total_build_requests(),
        "end-to-end report ready"
    );
    report
}

pub fn get_build_run(
    rows: Vec<BuildRequestRow>,
    revision: Option<&str>,
    branch_name: Option<&str>,
) -> BuildRun {
    let selected: Vec<_> = rows
        .into_iter()
        .filter(|r| matches_run(r, revision, branch_name))
        .collect();

    let mut run = BuildRun::new(revision.map(str::to_string), branch_name.map(str::to_string));
    for br in classify(selected) {
        run.add(br);
    }
    info!(
        revision = revision.unwrap_or("<none>"),
        requests = run.get_total_build_requests(),
        complete = run.is_complete(),
        "build run ready"
    );
    run
}

/// One push per distinct (change time, raw branch) inside the window,
/// skipping test-only branches.
pub fn pushes_from_rows(rows: &[BuildRequestRow], window: TimeWindow) -> Vec<Push> {
    let branches = &config::registry().branches;
    let mut seen = HashSet::new();
    let mut out = Vec::new();

    for row in rows {
        let (Some(stime), Some(branch)) = (model::set(row.when_timestamp), row.branch.as_deref())
        else {
            continue;
        };
        if stime < window.start || stime > window.end || pushes::is_excluded_branch(branch) {
            continue;
        }
        if !seen.insert((stime, branch.to_string())) {
            continue;
        }
        out.push(Push {
            stime,
            branch_name: branches.normalize(branch),
            revision: row.revision.clone(),
            author: row.author.clone(),
        });
    }
    out
}

/// Filter branches are normalized like push branches, so `tryserver` and
/// `try` select the same pushes.
pub fn get_pushes(
    rows: &[BuildRequestRow],
    window: TimeWindow,
    int_size: i64,
    branches: &[String],
) -> PushesReport {
    let normalizer = &config::registry().branches;
    let branches: Vec<String> = branches.iter().map(|b| normalizer.normalize(b)).collect();
    let mut report = PushesReport::new(window, int_size, &branches);
    let mut skipped = 0usize;
    for push in pushes_from_rows(rows, window) {
        if !report.add(&push) {
            skipped += 1;
        }
    }
    info!(
        total = report.get_total(None),
        skipped,
        intervals = report.int_no(),
        "pushes report ready"
    );
    report
}
