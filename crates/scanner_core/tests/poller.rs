use scanner_core::{JobPoller, PollPhase, TickDecision};

#[test]
fn start_issues_fresh_generation() {
    let mut poller = JobPoller::new();
    let start = poller.start("abc".to_string());

    assert_eq!(start.generation, 1);
    assert_eq!(start.superseded, None);
    assert_eq!(poller.active_job(), Some("abc"));
}

#[test]
fn ticks_are_gated_on_outstanding_request() {
    let mut poller = JobPoller::new();
    let generation = poller.start("abc".to_string()).generation;

    assert_eq!(poller.tick(generation), TickDecision::Fetch("abc".to_string()));
    assert_eq!(poller.tick(generation), TickDecision::Busy);
    assert!(poller.resolve(generation, "abc"));
    assert_eq!(poller.tick(generation), TickDecision::Fetch("abc".to_string()));
}

#[test]
fn superseded_poller_rejects_late_results() {
    let mut poller = JobPoller::new();
    let first = poller.start("old".to_string()).generation;
    assert_eq!(poller.tick(first), TickDecision::Fetch("old".to_string()));

    let second = poller.start("new".to_string());
    assert_eq!(second.superseded, Some(first));
    assert!(second.generation > first);

    assert!(!poller.resolve(first, "old"));
    assert_eq!(poller.tick(first), TickDecision::Stale);
    assert_eq!(poller.tick(second.generation), TickDecision::Fetch("new".to_string()));
}

#[test]
fn resolve_requires_matching_job_id() {
    let mut poller = JobPoller::new();
    let generation = poller.start("abc".to_string()).generation;
    poller.tick(generation);

    assert!(!poller.resolve(generation, "other"));
    assert!(poller.resolve(generation, "abc"));
}

#[test]
fn finish_happens_once() {
    let mut poller = JobPoller::new();
    let generation = poller.start("abc".to_string()).generation;

    assert_eq!(poller.finish(), Some(generation));
    assert_eq!(poller.finish(), None);
    assert_eq!(
        poller.phase(),
        &PollPhase::Terminal {
            job_id: "abc".to_string()
        }
    );
    assert_eq!(poller.tick(generation), TickDecision::Stale);
    assert!(!poller.resolve(generation, "abc"));
}

#[test]
fn cancel_discards_in_flight_result() {
    let mut poller = JobPoller::new();
    let generation = poller.start("abc".to_string()).generation;
    assert_eq!(poller.tick(generation), TickDecision::Fetch("abc".to_string()));

    assert_eq!(poller.cancel(), Some(generation));
    assert!(!poller.resolve(generation, "abc"));
    assert_eq!(
        poller.phase(),
        &PollPhase::Cancelled {
            job_id: "abc".to_string()
        }
    );
}

#[test]
fn cancel_without_active_poller_is_noop() {
    let mut poller = JobPoller::new();
    assert_eq!(poller.cancel(), None);
    assert_eq!(poller.generation(), 0);

    poller.start("abc".to_string());
    poller.finish();
    let generation = poller.generation();
    assert_eq!(poller.cancel(), None);
    assert_eq!(poller.generation(), generation);
}
