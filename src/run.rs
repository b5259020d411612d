// src/run.rs

use crate::config::{self, ReasonPatterns};
use crate::model::{BuildRequest, BuildResult, Severity};
use crate::status::Status;
use serde_json::{json, Value};
use std::cell::OnceCell;
use std::collections::HashSet;

/// Requests per lifecycle state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StatusCounts {
    pub pending: usize,
    pub running: usize,
    pub complete: usize,
    pub cancelled: usize,
    pub interrupted: usize,
    pub misc: usize,
}

impl StatusCounts {
    fn bump(&mut self, status: Status) {
        let slot = match status {
            Status::Pending => &mut self.pending,
            Status::Running => &mut self.running,
            Status::Complete => &mut self.complete,
            Status::Cancelled => &mut self.cancelled,
            Status::Interrupted => &mut self.interrupted,
            Status::Misc => &mut self.misc,
        };
        *slot += 1;
    }
}

/// Requests per result bucket.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ResultCounts {
    pub success: usize,
    pub warnings: usize,
    pub failure: usize,
    pub other: usize,
}

impl ResultCounts {
    fn bump(&mut self, severity: Severity) {
        let slot = match severity {
            Severity::Success => &mut self.success,
            Severity::Warnings => &mut self.warnings,
            Severity::Failure => &mut self.failure,
            Severity::Other => &mut self.other,
        };
        *slot += 1;
    }
}

/// All build requests triggered by one push: same revision, same branch.
///
/// Counters are updated as requests arrive. The distinct request count is
/// computed on first read after a change and cached until the next `add`.
#[derive(Clone, Debug)]
pub struct BuildRun {
    revision: Option<String>,
    branch_name: Option<String>,
    reasons: ReasonPatterns,

    build_requests: Vec<BuildRequest>,
    unique_total: OnceCell<usize>,

    status: StatusCounts,
    result_counts: ResultCounts,
    results: BuildResult,
    rebuilds: usize,
    forcebuilds: usize,

    lst_change_time: Option<i64>,
    gst_finish_time: Option<i64>,
    gst_complete_at_time: Option<i64>,

    // change timestamps, split by branch suffix
    unittests: Vec<i64>,
    talos: Vec<i64>,
    builds: Vec<i64>,
}

impl BuildRun {
    pub fn new(revision: Option<String>, branch_name: Option<String>) -> Self {
        Self::with_reasons(revision, branch_name, config::registry().reasons.clone())
    }

    pub fn with_reasons(
        revision: Option<String>,
        branch_name: Option<String>,
        reasons: ReasonPatterns,
    ) -> Self {
        Self {
            revision,
            branch_name,
            reasons,
            build_requests: Vec::new(),
            unique_total: OnceCell::new(),
            status: StatusCounts::default(),
            result_counts: ResultCounts::default(),
            results: BuildResult::NO_RESULT,
            rebuilds: 0,
            forcebuilds: 0,
            lst_change_time: None,
            gst_finish_time: None,
            gst_complete_at_time: None,
            unittests: Vec::new(),
            talos: Vec::new(),
            builds: Vec::new(),
        }
    }

    /// Folds one request into the run. Adding the same request twice counts
    /// it twice everywhere except in the distinct total.
    pub fn add(&mut self, br: BuildRequest) {
        self.unique_total.take();
        self.status.bump(br.status());

        if let Some(when) = br.when_timestamp() {
            self.lst_change_time = Some(self.lst_change_time.map_or(when, |t| t.min(when)));
        }
        if let Some(finish) = br.finish_time() {
            self.gst_finish_time = Some(self.gst_finish_time.map_or(finish, |t| t.max(finish)));
        }
        if let Some(done) = br.complete_at() {
            self.gst_complete_at_time =
                Some(self.gst_complete_at_time.map_or(done, |t| t.max(done)));
        }

        if self.reasons.is_rebuild(br.reason()) {
            self.rebuilds += 1;
        }
        if self.reasons.is_forcebuild(br.reason()) {
            self.forcebuilds += 1;
        }

        self.result_counts.bump(br.results().severity());
        self.results = self.results.max(br.results());

        if let Some(when) = br.when_timestamp() {
            let branch = br.branch().unwrap_or_default();
            if branch.ends_with("unittest") {
                self.unittests.push(when);
            } else if branch.ends_with("talos") {
                self.talos.push(when);
            } else {
                self.builds.push(when);
            }
        }

        self.build_requests.push(br);
    }

    pub fn revision(&self) -> Option<&str> {
        self.revision.as_deref()
    }

    pub fn branch_name(&self) -> Option<&str> {
        self.branch_name.as_deref()
    }

    pub fn build_requests(&self) -> &[BuildRequest] {
        &self.build_requests
    }

    pub fn status_counts(&self) -> StatusCounts {
        self.status
    }

    pub fn result_counts(&self) -> ResultCounts {
        self.result_counts
    }

    /// Worst result seen so far.
    pub fn results(&self) -> BuildResult {
        self.results
    }

    pub fn rebuilds(&self) -> usize {
        self.rebuilds
    }

    pub fn forcebuilds(&self) -> usize {
        self.forcebuilds
    }

    pub fn lst_change_time(&self) -> i64 {
        self.lst_change_time.unwrap_or(0)
    }

    pub fn gst_finish_time(&self) -> i64 {
        self.gst_finish_time.unwrap_or(0)
    }

    pub fn gst_complete_at_time(&self) -> i64 {
        self.gst_complete_at_time.unwrap_or(0)
    }

    pub fn unittests(&self) -> usize {
        self.unittests.len()
    }

    pub fn talos(&self) -> usize {
        self.talos.len()
    }

    pub fn builds(&self) -> usize {
        self.builds.len()
    }

    /// From the earliest change to the latest request completion.
    pub fn get_duration(&self) -> i64 {
        match (self.gst_complete_at_time, self.lst_change_time) {
            (Some(done), Some(change)) => done - change,
            _ => 0,
        }
    }

    pub fn get_total_build_requests(&self) -> usize {
        self.build_requests.len()
    }

    pub fn get_unique_total_build_requests(&self) -> usize {
        *self.unique_total.get_or_init(|| {
            self.build_requests
                .iter()
                .map(BuildRequest::brid)
                .collect::<HashSet<_>>()
                .len()
        })
    }

    /// Nothing left waiting or running. Cancelled, interrupted and
    /// unclassified requests all count as done.
    pub fn is_complete(&self) -> bool {
        self.status.running == 0 && self.status.pending == 0
    }

    pub fn to_json(&self, summary: bool) -> Value {
        let mut obj = json!({
            "revision": self.revision,
            "branch_name": self.branch_name,
            "results": self.results,
            "results_str": self.results.as_str(),
            "is_complete": if self.is_complete() { "yes" } else { "no" },
            "total_build_requests": self.get_total_build_requests(),
            "unique_total_build_requests": self.get_unique_total_build_requests(),
            "duration": self.get_duration(),
            "lst_change_time": self.lst_change_time(),
            "gst_finish_time": self.gst_finish_time(),
            "gst_complete_at_time": self.gst_complete_at_time(),
            "complete": self.status.complete,
            "running": self.status.running,
            "pending": self.status.pending,
            "cancelled": self.status.cancelled,
            "interrupted": self.status.interrupted,
            "misc": self.status.misc,
            "rebuilds": self.rebuilds,
            "forcebuilds": self.forcebuilds,
            "builds": self.builds(),
            "unittests": self.unittests(),
            "talos": self.talos(),
            "results_success": self.result_counts.success,
            "results_warnings": self.result_counts.warnings,
            "results_failure": self.result_counts.failure,
            "results_other": self.result_counts.other,
        });
        if !summary {
            obj["build_requests"] =
                Value::Array(self.build_requests.iter().map(BuildRequest::to_json).collect());
        }
        obj
    }
}
