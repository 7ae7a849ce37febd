use std::time::Duration;

use scanner_client::{
    AnalyzeRequest, ClientSettings, EngineEvent, EngineHandle, MutationOutcome, RecipientChange,
};
use serde_json::json;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn engine_for(server: &MockServer) -> EngineHandle {
    let settings = ClientSettings {
        base_url: server.uri(),
        poll_interval: Duration::from_millis(20),
        ..ClientSettings::default()
    };
    EngineHandle::new(settings).expect("engine")
}

fn next_event(engine: &EngineHandle) -> EngineEvent {
    tokio::task::block_in_place(|| engine.recv_timeout(Duration::from_secs(5))).expect("event")
}

#[tokio::test(flavor = "multi_thread")]
async fn submit_reports_accepted_handle() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/analyze"))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({
            "job_id": "abc123",
            "message": "Analysis started. Results will be sent to 1 email(s).",
            "domains_count": 1,
            "recipients_count": 1,
        })))
        .mount(&server)
        .await;
    let engine = engine_for(&server);

    engine.submit(AnalyzeRequest {
        domains: "example.com".to_string(),
        emails: String::new(),
        use_configured_emails: true,
    });

    match next_event(&engine) {
        EngineEvent::Submitted(Ok(handle)) => assert_eq!(handle.job_id, "abc123"),
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn poll_ticks_carry_generation_until_stopped() {
    let server = MockServer::start().await;
    let engine = engine_for(&server);

    engine.start_polling(4);
    assert_eq!(next_event(&engine), EngineEvent::PollTick { generation: 4 });
    assert_eq!(next_event(&engine), EngineEvent::PollTick { generation: 4 });

    // Stopping another generation leaves the timer alone.
    engine.stop_polling(3);
    assert_eq!(next_event(&engine), EngineEvent::PollTick { generation: 4 });

    engine.stop_polling(4);
    // Drain ticks that were already queued before the stop landed.
    tokio::task::block_in_place(|| std::thread::sleep(Duration::from_millis(100)));
    while engine.try_recv().is_some() {}
    let late = tokio::task::block_in_place(|| engine.recv_timeout(Duration::from_millis(200)));
    assert_eq!(late, None);
}

#[tokio::test(flavor = "multi_thread")]
async fn restarting_replaces_the_previous_timer() {
    let server = MockServer::start().await;
    let engine = engine_for(&server);

    engine.start_polling(1);
    engine.start_polling(2);
    tokio::task::block_in_place(|| std::thread::sleep(Duration::from_millis(100)));

    let mut generations = Vec::new();
    while let Some(event) = engine.try_recv() {
        if let EngineEvent::PollTick { generation } = event {
            generations.push(generation);
        }
    }
    assert!(!generations.is_empty());
    assert!(generations.iter().all(|generation| *generation == 2));
}

#[tokio::test(flavor = "multi_thread")]
async fn status_fetch_is_tagged_with_job_and_generation() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/api/status/abc123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "job_id": "abc123",
            "status": "queued",
            "progress": 0,
            "domains_count": 1,
            "results_count": 0,
            "started_at": "2024-01-01T00:00:00",
            "completed_at": null,
            "error": null,
        })))
        .mount(&server)
        .await;
    let engine = engine_for(&server);

    engine.fetch_status("abc123", 9);

    match next_event(&engine) {
        EngineEvent::StatusFetched {
            job_id,
            generation,
            result,
        } => {
            assert_eq!(job_id, "abc123");
            assert_eq!(generation, 9);
            assert_eq!(result.expect("status").status, "queued");
        }
        other => panic!("unexpected event {other:?}"),
    }
}

#[tokio::test(flavor = "multi_thread")]
async fn recipient_change_reloads_list() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/api/email-config/add"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"message": "ok"})))
        .mount(&server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/email-config"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "recipients": ["ops@example.com"],
            "count": 1,
        })))
        .mount(&server)
        .await;
    let engine = engine_for(&server);

    engine.change_recipient(RecipientChange::Add, "ops@example.com");

    match next_event(&engine) {
        EngineEvent::RecipientChanged {
            change: RecipientChange::Add,
            result: Ok(MutationOutcome::Applied { recipients }),
        } => assert!(recipients.contains("ops@example.com")),
        other => panic!("unexpected event {other:?}"),
    }
}
