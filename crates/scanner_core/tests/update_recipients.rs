use std::sync::Once;

use scanner_core::{update, AppState, Effect, Msg, NoticeKind, RecipientOp};

fn init_logging() {
    static INIT: Once = Once::new();
    INIT.call_once(scanner_logging::initialize_for_tests);
}

fn loaded(recipients: &[&str]) -> AppState {
    let (state, _) = update(
        AppState::new(),
        Msg::RecipientsLoaded(recipients.iter().map(|r| r.to_string()).collect()),
    );
    state
}

#[test]
fn request_emits_load_effect() {
    init_logging();
    let (_state, effects) = update(AppState::new(), Msg::RecipientsRequested);
    assert_eq!(effects, vec![Effect::LoadRecipients]);
}

#[test]
fn load_replaces_cache_entirely() {
    init_logging();
    let state = loaded(&["a@example.com", "b@example.com"]);
    let (state, _) = update(state, Msg::RecipientsLoaded(vec!["c@example.com".to_string()]));

    assert_eq!(state.view().recipients, vec!["c@example.com".to_string()]);
}

#[test]
fn load_failure_leaves_cache_and_shows_nothing() {
    init_logging();
    let state = loaded(&["a@example.com"]);
    let (mut state, _) = update(state, Msg::NewEmailChanged(String::new()));
    state.consume_dirty();

    let (mut state, effects) = update(
        state,
        Msg::RecipientsLoadFailed {
            reason: "connection refused".to_string(),
        },
    );

    assert!(effects.is_empty());
    assert!(!state.consume_dirty());
    let view = state.view();
    assert_eq!(view.recipients, vec!["a@example.com".to_string()]);
    assert_eq!(view.settings_notice, None);
}

#[test]
fn blank_email_is_a_noop() {
    init_logging();
    let (state, _) = update(AppState::new(), Msg::NewEmailChanged("   ".to_string()));
    let (state, effects) = update(state, Msg::AddRecipientClicked);

    assert!(effects.is_empty());
    assert!(!state.view().settings_busy);
}

#[test]
fn add_is_not_optimistic_and_reloaded_list_wins() {
    init_logging();
    let state = loaded(&["a@example.com"]);
    let (state, _) = update(state, Msg::NewEmailChanged("b@example.com".to_string()));

    let (state, effects) = update(state, Msg::AddRecipientClicked);
    assert_eq!(
        effects,
        vec![Effect::MutateRecipient {
            op: RecipientOp::Add,
            email: "b@example.com".to_string(),
        }]
    );
    let view = state.view();
    assert!(view.settings_busy);
    assert_eq!(view.recipients, vec!["a@example.com".to_string()]);

    let (state, _) = update(
        state,
        Msg::RecipientMutationSucceeded {
            op: RecipientOp::Add,
            recipients: vec!["a@example.com".to_string(), "b@example.com".to_string()],
        },
    );
    let view = state.view();
    assert!(!view.settings_busy);
    assert_eq!(view.new_email, "");
    assert_eq!(
        view.recipients
            .iter()
            .filter(|r| r.as_str() == "b@example.com")
            .count(),
        1
    );
    let notice = view.settings_notice.expect("settings notice");
    assert_eq!(notice.kind, NoticeKind::Success);
    assert_eq!(notice.text, "Email added successfully");
}

#[test]
fn mutations_are_serialized_by_busy_flag() {
    init_logging();
    let state = loaded(&["a@example.com", "b@example.com"]);
    let (state, effects) = update(state, Msg::RemoveRecipientClicked("a@example.com".to_string()));
    assert_eq!(effects.len(), 1);

    let (state, effects) = update(state, Msg::RemoveRecipientClicked("b@example.com".to_string()));
    assert!(effects.is_empty());

    let (state, _) = update(
        state,
        Msg::RecipientMutationSucceeded {
            op: RecipientOp::Remove,
            recipients: vec!["b@example.com".to_string()],
        },
    );
    let (_state, effects) = update(state, Msg::RemoveRecipientClicked("b@example.com".to_string()));
    assert_eq!(effects.len(), 1);
}

#[test]
fn rejected_add_shows_server_error_and_keeps_cache() {
    init_logging();
    let state = loaded(&["a@example.com"]);
    let (state, _) = update(state, Msg::NewEmailChanged("not-an-email".to_string()));
    let (state, _) = update(state, Msg::AddRecipientClicked);

    let (state, _) = update(
        state,
        Msg::RecipientMutationFailed {
            op: RecipientOp::Add,
            server_message: Some("Invalid email".to_string()),
        },
    );

    let view = state.view();
    assert!(!view.settings_busy);
    assert_eq!(view.recipients, vec!["a@example.com".to_string()]);
    assert_eq!(view.new_email, "not-an-email");
    let notice = view.settings_notice.expect("settings notice");
    assert_eq!(notice.kind, NoticeKind::Error);
    assert_eq!(notice.text, "Invalid email");
    // The submission surface is untouched.
    assert_eq!(view.submission_notice, None);
}

#[test]
fn remove_failure_without_message_uses_fallback() {
    init_logging();
    let state = loaded(&["a@example.com"]);
    let (state, _) = update(state, Msg::RemoveRecipientClicked("a@example.com".to_string()));
    let (state, _) = update(
        state,
        Msg::RecipientMutationFailed {
            op: RecipientOp::Remove,
            server_message: None,
        },
    );

    assert_eq!(
        state.view().settings_notice.map(|n| n.text),
        Some("Failed to remove email".to_string())
    );
}

#[test]
fn next_action_clears_previous_settings_notice() {
    init_logging();
    let state = loaded(&["a@example.com"]);
    let (state, _) = update(state, Msg::RemoveRecipientClicked("a@example.com".to_string()));
    let (state, _) = update(
        state,
        Msg::RecipientMutationFailed {
            op: RecipientOp::Remove,
            server_message: None,
        },
    );
    assert!(state.view().settings_notice.is_some());

    let (state, _) = update(state, Msg::RemoveRecipientClicked("a@example.com".to_string()));
    assert_eq!(state.view().settings_notice, None);
}

#[test]
fn skipped_mutation_clears_busy_without_notice() {
    init_logging();
    let state = loaded(&["a@example.com"]);
    let (state, effects) = update(
        state,
        Msg::RemoveRecipientClicked("a@example.com".to_string()),
    );
    assert_eq!(effects.len(), 1);
    assert!(state.view().settings_busy);

    let (state, effects) = update(
        state,
        Msg::RecipientMutationSkipped {
            op: RecipientOp::Remove,
        },
    );

    assert!(effects.is_empty());
    let view = state.view();
    assert!(!view.settings_busy);
    assert_eq!(view.settings_notice, None);
    assert_eq!(view.recipients, vec!["a@example.com".to_string()]);
}
