// src/window.rs

use chrono::{Duration, TimeZone, Utc};

pub const DEFAULT_SPAN: i64 = 24 * 60 * 60;

/// Reporting window in unix seconds, `[start, end)`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TimeWindow {
    pub start: i64,
    pub end: i64,
}

impl TimeWindow {
    pub fn new(start: i64, end: i64) -> Self {
        Self { start, end }
    }

    /// Fills in missing bounds: the end defaults to `now`, the start to one
    /// day before the end.
    pub fn resolve(start: Option<i64>, end: Option<i64>, now: i64) -> Self {
        let end = end.unwrap_or(now);
        let start = start.unwrap_or_else(|| end - Duration::days(1).num_seconds());
        Self { start, end }
    }

    pub fn resolve_now(start: Option<i64>, end: Option<i64>) -> Self {
        Self::resolve(start, end, Utc::now().timestamp())
    }

    pub fn span(&self) -> i64 {
        self.end.saturating_sub(self.start)
    }
}

/// RFC 2822 rendering of a unix timestamp, or the raw number if out of range.
pub fn format_ts(ts: i64) -> String {
    Utc.timestamp_opt(ts, 0)
        .single()
        .map_or_else(|| ts.to_string(), |t| t.to_rfc2822())
}
