// src/pushes.rs

use crate::window::TimeWindow;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// A single change pushed to a branch.
#[derive(Clone, Debug, PartialEq)]
pub struct Push {
    pub stime: i64,
    pub branch_name: String,
    pub revision: Option<String>,
    pub author: Option<String>,
}

/// Test-only sourcestamp branches that never represent a push.
pub fn is_excluded_branch(raw: &str) -> bool {
    let b = raw.to_lowercase();
    b.ends_with("unittest") || b.ends_with("talos") || b.starts_with("addontester")
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BranchIntervals {
    pub total: usize,
    pub intervals: Vec<usize>,
}

/// Push counts over a time window, split into fixed-size intervals, overall
/// and per branch.
#[derive(Clone, Debug)]
pub struct PushesReport {
    window: TimeWindow,
    int_size: i64,
    int_no: usize,
    filter_branches: bool,
    total: usize,
    intervals: Vec<usize>,
    branches: BTreeMap<String, BranchIntervals>,
}

impl PushesReport {
    /// A zero `int_size` means one interval covering the whole window. A
    /// non-empty `branches` list restricts the report to those branches.
    pub fn new(window: TimeWindow, int_size: i64, branches: &[String]) -> Self {
        let int_size = int_size.max(0);
        let int_no = if int_size > 0 {
            let span = window.span().max(0);
            (span / int_size + i64::from(span % int_size != 0)).max(1) as usize
        } else {
            1
        };

        let mut report = Self {
            window,
            int_size,
            int_no,
            filter_branches: !branches.is_empty(),
            total: 0,
            intervals: vec![0; int_no],
            branches: BTreeMap::new(),
        };
        for b in branches {
            report.init_branch(b);
        }
        report
    }

    fn init_branch(&mut self, branch: &str) -> &mut BranchIntervals {
        let int_no = self.int_no;
        self.branches
            .entry(branch.to_string())
            .or_insert_with(|| BranchIntervals {
                total: 0,
                intervals: vec![0; int_no],
            })
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn int_size(&self) -> i64 {
        self.int_size
    }

    pub fn int_no(&self) -> usize {
        self.int_no
    }

    pub fn branches(&self) -> impl Iterator<Item = (&str, &BranchIntervals)> {
        self.branches.iter().map(|(name, b)| (name.as_str(), b))
    }

    pub fn get_total(&self, branch: Option<&str>) -> usize {
        match branch {
            None => self.total,
            Some(b) => self.branches.get(b).map_or(0, |b| b.total),
        }
    }

    pub fn get_intervals(&self, branch: Option<&str>) -> &[usize] {
        match branch {
            None => &self.intervals,
            Some(b) => self.branches.get(b).map_or(&[][..], |b| b.intervals.as_slice()),
        }
    }

    pub fn get_interval_timestamp(&self, idx: usize) -> i64 {
        self.window.start + idx as i64 * self.int_size
    }

    /// Timestamps before the window land in the first interval, timestamps
    /// past its end in the last one.
    pub fn get_interval_index(&self, stime: i64) -> usize {
        if self.int_size == 0 {
            return 0;
        }
        let offset = stime.saturating_sub(self.window.start).max(0);
        let idx = (offset / self.int_size) as usize;
        if idx >= self.int_no {
            warn!(stime, end = self.window.end, "push past end of window, clamped");
            return self.int_no - 1;
        }
        idx
    }

    /// Counts a push. Returns false, leaving the report untouched, when a
    /// branch filter is set and does not list the push's branch.
    pub fn add(&mut self, push: &Push) -> bool {
        if self.filter_branches && !self.branches.contains_key(&push.branch_name) {
            debug!(branch = %push.branch_name, stime = push.stime, "push skipped by branch filter");
            return false;
        }

        let idx = self.get_interval_index(push.stime);
        self.total += 1;
        self.intervals[idx] += 1;

        let branch = self.init_branch(&push.branch_name);
        branch.total += 1;
        branch.intervals[idx] += 1;
        true
    }

    pub fn to_json(&self) -> Value {
        let branches: Map<String, Value> = self
            .branches
            .iter()
            .map(|(name, b)| {
                (name.clone(), json!({ "total": b.total, "intervals": b.intervals }))
            })
            .collect();
        json!({
            "starttime": self.window.start,
            "endtime": self.window.end,
            "int_size": self.int_size,
            "total": self.total,
            "intervals": self.intervals,
            "branches": branches,
        })
    }
}
