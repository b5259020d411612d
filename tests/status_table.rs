use buildstats::status::{classify, Signals};
use buildstats::Status;

/// Expected state for each presence combination, written out rule by rule.
fn expected(s: Signals) -> Status {
    let Signals { complete, complete_at, finish_time, start_time, claimed_at } = s;
    let not_done = !complete && !complete_at && !finish_time;
    if not_done && start_time && claimed_at {
        Status::Running
    } else if not_done && !start_time && !claimed_at {
        Status::Pending
    } else if complete && complete_at && finish_time && start_time && claimed_at {
        Status::Complete
    } else if !start_time && !claimed_at && complete && complete_at && !finish_time {
        Status::Cancelled
    } else if complete && complete_at && !finish_time && start_time && claimed_at {
        Status::Interrupted
    } else {
        Status::Misc
    }
}

fn all_signals() -> Vec<Signals> {
    (0u8..32)
        .map(|bits| Signals {
            complete: bits & 1 != 0,
            complete_at: bits & 2 != 0,
            finish_time: bits & 4 != 0,
            start_time: bits & 8 != 0,
            claimed_at: bits & 16 != 0,
        })
        .collect()
}

#[test]
fn every_combination_matches_the_rule_table() {
    for s in all_signals() {
        assert_eq!(classify(s), expected(s), "{s:?}");
    }
}

#[test]
fn each_named_state_has_exactly_one_combination() {
    let signals = all_signals();
    let named = [
        Status::Pending,
        Status::Running,
        Status::Complete,
        Status::Cancelled,
        Status::Interrupted,
    ];
    for status in named {
        let hits = signals.iter().filter(|s| classify(**s) == status).count();
        assert_eq!(hits, 1, "{status}");
    }
    let misc = signals.iter().filter(|s| classify(**s) == Status::Misc).count();
    assert_eq!(misc, 27);
}

#[test]
fn complete_and_interrupted_differ_only_in_finish_time() {
    let mut s = Signals {
        complete: true,
        complete_at: true,
        finish_time: true,
        start_time: true,
        claimed_at: true,
    };
    assert_eq!(classify(s), Status::Complete);
    s.finish_time = false;
    assert_eq!(classify(s), Status::Interrupted);
}
