// src/status.rs

use serde::Serialize;
use std::fmt;

/// Lifecycle state of a build request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Status {
    Pending,
    Running,
    Complete,
    Cancelled,
    Interrupted,
    Misc,
}

impl Status {
    pub const ALL: [Status; 6] = [
        Status::Pending,
        Status::Running,
        Status::Complete,
        Status::Cancelled,
        Status::Interrupted,
        Status::Misc,
    ];

    pub fn code(self) -> i64 {
        match self {
            Status::Pending => 0,
            Status::Running => 1,
            Status::Complete => 2,
            Status::Cancelled => 3,
            Status::Interrupted => 4,
            Status::Misc => 5,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::Running => "RUNNING",
            Status::Complete => "COMPLETE",
            Status::Cancelled => "CANCELLED",
            Status::Interrupted => "INTERRUPTED",
            Status::Misc => "MISC",
        }
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Presence of the five fields the classifier looks at.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Signals {
    pub complete: bool,
    pub complete_at: bool,
    pub finish_time: bool,
    pub start_time: bool,
    pub claimed_at: bool,
}

#[derive(Clone, Copy, Debug)]
enum Req {
    Set,
    Unset,
}

impl Req {
    fn accepts(self, present: bool) -> bool {
        match self {
            Req::Set => present,
            Req::Unset => !present,
        }
    }
}

struct Rule {
    complete: Req,
    complete_at: Req,
    finish_time: Req,
    start_time: Req,
    claimed_at: Req,
    status: Status,
}

impl Rule {
    fn matches(&self, s: Signals) -> bool {
        self.complete.accepts(s.complete)
            && self.complete_at.accepts(s.complete_at)
            && self.finish_time.accepts(s.finish_time)
            && self.start_time.accepts(s.start_time)
            && self.claimed_at.accepts(s.claimed_at)
    }
}

const fn rule(
    complete: Req,
    complete_at: Req,
    finish_time: Req,
    start_time: Req,
    claimed_at: Req,
    status: Status,
) -> Rule {
    Rule {
        complete,
        complete_at,
        finish_time,
        start_time,
        claimed_at,
        status,
    }
}

use Req::{Set, Unset};

// First match wins. COMPLETE and INTERRUPTED differ only in finish_time:
// a request that completed without a finish record was retried after its
// worker dropped out.
//
//    complete  complete_at  finish_time  start_time  claimed_at
const RULES: [Rule; 5] = [
    rule(Unset, Unset, Unset, Set, Set, Status::Running),
    rule(Unset, Unset, Unset, Unset, Unset, Status::Pending),
    rule(Set, Set, Set, Set, Set, Status::Complete),
    rule(Set, Set, Unset, Unset, Unset, Status::Cancelled),
    rule(Set, Set, Unset, Set, Set, Status::Interrupted),
];

/// Classifies a request. Combinations no rule covers (half-written rows,
/// usually) come back as MISC.
pub fn classify(signals: Signals) -> Status {
    RULES
        .iter()
        .find(|rule| rule.matches(signals))
        .map_or(Status::Misc, |rule| rule.status)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sig(
        complete: bool,
        complete_at: bool,
        finish_time: bool,
        start_time: bool,
        claimed_at: bool,
    ) -> Signals {
        Signals {
            complete,
            complete_at,
            finish_time,
            start_time,
            claimed_at,
        }
    }

    #[test]
    fn named_states() {
        assert_eq!(classify(sig(false, false, false, false, false)), Status::Pending);
        assert_eq!(classify(sig(false, false, false, true, true)), Status::Running);
        assert_eq!(classify(sig(true, true, true, true, true)), Status::Complete);
        assert_eq!(classify(sig(true, true, false, false, false)), Status::Cancelled);
        assert_eq!(classify(sig(true, true, false, true, true)), Status::Interrupted);
    }

    #[test]
    fn partial_writes_fall_back_to_misc() {
        // claimed but not started yet
        assert_eq!(classify(sig(false, false, false, false, true)), Status::Misc);
        // finished, request row not yet marked complete
        assert_eq!(classify(sig(false, false, true, true, true)), Status::Misc);
        assert_eq!(classify(sig(true, false, false, false, false)), Status::Misc);
    }

    #[test]
    fn codes_and_names() {
        let names: Vec<_> = Status::ALL.iter().map(|s| s.as_str()).collect();
        assert_eq!(
            names,
            ["PENDING", "RUNNING", "COMPLETE", "CANCELLED", "INTERRUPTED", "MISC"]
        );
        let codes: Vec<_> = Status::ALL.iter().map(|s| s.code()).collect();
        assert_eq!(codes, [0, 1, 2, 3, 4, 5]);
        assert_eq!(serde_json::to_string(&Status::Interrupted).unwrap(), "\"INTERRUPTED\"");
    }
}
