// src/model.rs

use crate::builder::{self, BuildType, JobType};
use crate::config::{self, Registry};
use crate::status::{self, Signals, Status};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tracing::debug;

/// Revisions are compared and keyed on this many leading characters.
pub const REVISION_LEN: usize = 12;

/// Buildbot result code. Higher codes are more severe, so a run's overall
/// result is the maximum over its requests.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BuildResult(pub i64);

impl BuildResult {
    pub const NO_RESULT: BuildResult = BuildResult(-1);
    pub const SUCCESS: BuildResult = BuildResult(0);
    pub const WARNINGS: BuildResult = BuildResult(1);
    pub const FAILURE: BuildResult = BuildResult(2);
    pub const SKIPPED: BuildResult = BuildResult(3);
    pub const EXCEPTION: BuildResult = BuildResult(4);
    pub const RETRY: BuildResult = BuildResult(5);

    pub fn as_str(self) -> &'static str {
        match self {
            BuildResult::NO_RESULT => "NO_RESULT",
            BuildResult::SUCCESS => "SUCCESS",
            BuildResult::WARNINGS => "WARNINGS",
            BuildResult::FAILURE => "FAILURE",
            BuildResult::SKIPPED => "SKIPPED",
            BuildResult::EXCEPTION => "EXCEPTION",
            BuildResult::RETRY => "RETRY",
            _ => "UNKNOWN",
        }
    }

    pub fn severity(self) -> Severity {
        match self {
            BuildResult::SUCCESS => Severity::Success,
            BuildResult::WARNINGS => Severity::Warnings,
            BuildResult::FAILURE
            | BuildResult::SKIPPED
            | BuildResult::EXCEPTION
            | BuildResult::RETRY => Severity::Failure,
            _ => Severity::Other,
        }
    }
}

impl Default for BuildResult {
    fn default() -> Self {
        BuildResult::NO_RESULT
    }
}

/// Counting bucket for a result code.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Success,
    Warnings,
    Failure,
    Other,
}

/// One joined buildrequests/builds/sourcestamps/changes row, as fetched.
/// Every field may be missing.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BuildRequestRow {
    pub number: Option<i64>,
    pub brid: Option<i64>,
    pub buildername: Option<String>,
    pub branch: Option<String>,
    pub ssid: Option<i64>,
    pub revision: Option<String>,
    pub when_timestamp: Option<i64>,
    pub submitted_at: Option<i64>,
    pub claimed_at: Option<i64>,
    pub start_time: Option<i64>,
    pub complete_at: Option<i64>,
    pub finish_time: Option<i64>,
    pub claimed_by_name: Option<String>,
    pub complete: Option<i64>,
    pub reason: Option<String>,
    pub results: Option<i64>,
    pub author: Option<String>,
    pub comments: Option<String>,
    pub revlink: Option<String>,
    pub category: Option<String>,
    pub repository: Option<String>,
    pub project: Option<String>,
    pub buildsetid: Option<i64>,
}

// Zero is how the scheduler db spells "not yet".
pub(crate) fn set(ts: Option<i64>) -> Option<i64> {
    ts.filter(|&t| t != 0)
}

impl BuildRequestRow {
    pub fn signals(&self) -> Signals {
        Signals {
            complete: self.complete.unwrap_or(0) != 0,
            complete_at: set(self.complete_at).is_some(),
            finish_time: set(self.finish_time).is_some(),
            start_time: set(self.start_time).is_some(),
            claimed_at: set(self.claimed_at).is_some(),
        }
    }

    /// Time of the change that triggered the request, or of the submission
    /// when no change is attached (nightlies, forced builds).
    pub fn change_time(&self) -> Option<i64> {
        set(self.when_timestamp).or(set(self.submitted_at))
    }
}

pub fn truncate_revision(revision: &str) -> &str {
    match revision.char_indices().nth(REVISION_LEN) {
        Some((idx, _)) => &revision[..idx],
        None => revision,
    }
}

/// A classified build request. Derived fields are fixed at construction.
#[derive(Clone, Debug)]
pub struct BuildRequest {
    row: BuildRequestRow,
    branch_name: Option<String>,
    results: BuildResult,
    status: Status,
    platform: Option<&'static str>,
    build_type: Option<BuildType>,
    job_type: Option<JobType>,
}

impl BuildRequest {
    pub fn new(row: BuildRequestRow) -> Self {
        Self::with_registry(row, config::registry())
    }

    pub fn with_registry(mut row: BuildRequestRow, registry: &Registry) -> Self {
        if let Some(rev) = row.revision.as_mut() {
            let len = truncate_revision(rev).len();
            rev.truncate(len);
        }

        let status = status::classify(row.signals());
        if status == Status::Misc {
            debug!(brid = ?row.brid, signals = ?row.signals(), "unclassified build request");
        }

        let buildername = row.buildername.as_deref();
        Self {
            branch_name: row.branch.as_deref().map(|b| registry.branches.normalize(b)),
            results: row.results.map_or(BuildResult::NO_RESULT, BuildResult),
            status,
            platform: builder::platform(buildername),
            build_type: builder::build_type(buildername),
            job_type: builder::job_type(buildername),
            row,
        }
    }

    pub fn row(&self) -> &BuildRequestRow {
        &self.row
    }

    pub fn brid(&self) -> Option<i64> {
        self.row.brid
    }

    pub fn revision(&self) -> Option<&str> {
        self.row.revision.as_deref()
    }

    pub fn branch(&self) -> Option<&str> {
        self.row.branch.as_deref()
    }

    pub fn branch_name(&self) -> Option<&str> {
        self.branch_name.as_deref()
    }

    pub fn status(&self) -> Status {
        self.status
    }

    pub fn results(&self) -> BuildResult {
        self.results
    }

    pub fn reason(&self) -> Option<&str> {
        self.row.reason.as_deref()
    }

    pub fn when_timestamp(&self) -> Option<i64> {
        set(self.row.when_timestamp)
    }

    pub fn finish_time(&self) -> Option<i64> {
        set(self.row.finish_time)
    }

    pub fn complete_at(&self) -> Option<i64> {
        set(self.row.complete_at)
    }

    pub fn platform(&self) -> Option<&'static str> {
        self.platform
    }

    pub fn build_type(&self) -> Option<BuildType> {
        self.build_type
    }

    pub fn job_type(&self) -> Option<JobType> {
        self.job_type
    }

    /// Seconds from the triggering change to request completion.
    pub fn get_duration(&self) -> i64 {
        match (set(self.row.complete_at), self.row.change_time()) {
            (Some(done), Some(change)) => done - change,
            _ => 0,
        }
    }

    /// Seconds from the triggering change until a build started.
    pub fn get_wait_time(&self) -> i64 {
        match (set(self.row.start_time), self.row.change_time()) {
            (Some(start), Some(change)) => start - change,
            _ => 0,
        }
    }

    pub fn to_json(&self) -> Value {
        let r = &self.row;
        json!({
            "number": r.number,
            "brid": r.brid,
            "branch": r.branch,
            "branch_name": self.branch_name,
            "buildername": r.buildername,
            "ssid": r.ssid,
            "revision": r.revision,
            "when_timestamp": r.when_timestamp,
            "submitted_at": r.submitted_at,
            "claimed_at": r.claimed_at,
            "start_time": r.start_time,
            "complete_at": r.complete_at,
            "finish_time": r.finish_time,
            "claimed_by_name": r.claimed_by_name,
            "complete": r.complete.unwrap_or(0),
            "reason": r.reason,
            "results": self.results,
            "results_str": self.results.as_str(),
            "status": self.status.code(),
            "status_str": self.status.as_str(),
            "author": r.author,
            "comments": r.comments,
            "revlink": r.revlink,
            "category": r.category,
            "repository": r.repository,
            "project": r.project,
            "buildsetid": r.buildsetid,
            "platform": self.platform,
            "build_type": self.build_type,
            "job_type": self.job_type,
        })
    }
}
