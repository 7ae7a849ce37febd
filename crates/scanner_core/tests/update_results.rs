use scanner_core::{
    update, AppState, DomainResult, Effect, JobSnapshot, JobStatus, Msg, ResultsSummary,
    RESULTS_FALLBACK_ERROR,
};

fn watched_with_status(status: JobStatus) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::WatchRequested {
            job_id: "abc123".to_string(),
        },
    );
    let (state, _) = update(state, Msg::PollTick { generation: 1 });
    let (state, _) = update(
        state,
        Msg::StatusFetched {
            generation: 1,
            snapshot: JobSnapshot {
                job_id: "abc123".to_string(),
                status,
                progress: 100,
                domains_count: 1,
                results_count: 1,
                started_at: "2024-01-01T00:00:00Z".to_string(),
                completed_at: Some("2024-01-01T00:00:05Z".to_string()),
                error: None,
            },
        },
    );
    state
}

fn summary(job_id: &str) -> ResultsSummary {
    ResultsSummary {
        job_id: job_id.to_string(),
        domains: vec!["example.com".to_string()],
        results: vec![DomainResult {
            domain: "example.com".to_string(),
            finding_count: 2,
            error: None,
            analyzed_at: "2024-01-01T00:00:04Z".to_string(),
        }],
    }
}

#[test]
fn results_are_requested_only_for_completed_jobs() {
    let state = watched_with_status(JobStatus::Completed);
    let (_state, effects) = update(state, Msg::ResultsRequested);
    assert_eq!(
        effects,
        vec![Effect::FetchResults {
            job_id: "abc123".to_string()
        }]
    );

    let state = watched_with_status(JobStatus::Failed);
    let (_state, effects) = update(state, Msg::ResultsRequested);
    assert!(effects.is_empty());

    let (_state, effects) = update(AppState::new(), Msg::ResultsRequested);
    assert!(effects.is_empty());
}

#[test]
fn results_for_other_jobs_are_discarded() {
    let state = watched_with_status(JobStatus::Completed);
    let (state, _) = update(state, Msg::ResultsFetched(summary("someone-else")));
    assert_eq!(state.view().results, None);

    let (state, _) = update(state, Msg::ResultsFetched(summary("abc123")));
    assert_eq!(state.view().results, Some(summary("abc123")));
}

#[test]
fn results_failure_is_reported_on_submission_surface() {
    let state = watched_with_status(JobStatus::Completed);
    let (state, _) = update(
        state,
        Msg::ResultsFetchFailed {
            job_id: "abc123".to_string(),
            reason: "404".to_string(),
        },
    );

    let notice = state.view().submission_notice.expect("notice");
    assert!(notice.is_error());
    assert_eq!(notice.text, RESULTS_FALLBACK_ERROR);
}
