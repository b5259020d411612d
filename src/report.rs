// src/report.rs

use crate::model::BuildRequest;
use crate::run::BuildRun;
use crate::window::TimeWindow;
use serde_json::{json, Map, Value};
use std::cell::OnceCell;
use std::collections::BTreeMap;

/// End-to-end times for every push on a branch inside a time window.
///
/// Requests are grouped into runs by revision alone; the branch is carried
/// for display. Totals and the average duration are derived from the runs on
/// first read and cached until the next request arrives.
#[derive(Clone, Debug)]
pub struct EndToEndTimesReport {
    window: TimeWindow,
    branch_name: String,
    runs: BTreeMap<Option<String>, BuildRun>,

    total_br: OnceCell<usize>,
    unique_total_br: OnceCell<usize>,
    avg_duration: OnceCell<f64>,
}

impl EndToEndTimesReport {
    pub fn new(window: TimeWindow, branch_name: impl Into<String>) -> Self {
        Self {
            window,
            branch_name: branch_name.into(),
            runs: BTreeMap::new(),
            total_br: OnceCell::new(),
            unique_total_br: OnceCell::new(),
            avg_duration: OnceCell::new(),
        }
    }

    pub fn add_build_request(&mut self, br: BuildRequest) {
        let key = br.revision().map(str::to_string);
        self.runs
            .entry(key.clone())
            .or_insert_with(|| BuildRun::new(key, br.branch_name().map(str::to_string)))
            .add(br);

        self.total_br.take();
        self.unique_total_br.take();
        self.avg_duration.take();
    }

    pub fn window(&self) -> TimeWindow {
        self.window
    }

    pub fn branch_name(&self) -> &str {
        &self.branch_name
    }

    pub fn runs(&self) -> impl Iterator<Item = &BuildRun> {
        self.runs.values()
    }

    pub fn get_run(&self, revision: Option<&str>) -> Option<&BuildRun> {
        self.runs.get(&revision.map(str::to_string))
    }

    pub fn get_total_build_runs(&self) -> usize {
        self.runs.len()
    }

    pub fn get_total_build_requests(&self) -> usize {
        *self
            .total_br
            .get_or_init(|| self.runs.values().map(BuildRun::get_total_build_requests).sum())
    }

    /// Sum of each run's distinct request count. Requests are not
    /// de-duplicated across runs.
    pub fn get_unique_total_build_requests(&self) -> usize {
        *self.unique_total_br.get_or_init(|| {
            self.runs
                .values()
                .map(BuildRun::get_unique_total_build_requests)
                .sum()
        })
    }

    pub fn get_avg_duration(&self) -> f64 {
        *self.avg_duration.get_or_init(|| {
            let runs = self.get_total_build_runs();
            if runs == 0 {
                return 0.0;
            }
            let total: i64 = self.runs.values().map(BuildRun::get_duration).sum();
            total as f64 / runs as f64
        })
    }

    pub fn to_json(&self, summary: bool) -> Value {
        let mut build_runs = Map::new();
        if !summary {
            for (revision, run) in &self.runs {
                let key = revision.clone().unwrap_or_else(|| "null".to_string());
                build_runs.insert(key, run.to_json(true));
            }
        }
        json!({
            "starttime": self.window.start,
            "endtime": self.window.end,
            "branch_name": self.branch_name,
            "total_build_requests": self.get_total_build_requests(),
            "unique_total_build_requests": self.get_unique_total_build_requests(),
            "total_build_runs": self.get_total_build_runs(),
            "avg_duration": self.get_avg_duration(),
            "build_runs": build_runs,
        })
    }
}
