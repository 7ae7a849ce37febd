use crate::{AppState, Effect, Msg, RecipientOp};
use scanner_logging::scanner_warn;

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::DomainsChanged(text) => {
            state.set_domains(text);
            Vec::new()
        }
        Msg::CustomEmailsChanged(text) => {
            state.set_custom_emails(text);
            Vec::new()
        }
        Msg::UseConfiguredEmailsToggled(enabled) => {
            state.set_use_configured_emails(enabled);
            Vec::new()
        }
        Msg::SubmitClicked => state.begin_submission(),
        Msg::SubmitSucceeded(accepted) => state.apply_submission_accepted(accepted),
        Msg::SubmitFailed { server_message } => {
            state.apply_submission_failed(server_message);
            Vec::new()
        }
        Msg::WatchRequested { job_id } => state.watch(job_id),
        Msg::PollTick { generation } => state.poll_tick(generation),
        Msg::StatusFetched {
            generation,
            snapshot,
        } => state.apply_status(generation, snapshot),
        Msg::StatusFetchFailed {
            generation,
            job_id,
            reason,
        } => {
            state.apply_status_failure(generation, &job_id, &reason);
            Vec::new()
        }
        Msg::ViewClosed => state.close_view(),
        Msg::RecipientsRequested => vec![Effect::LoadRecipients],
        Msg::RecipientsLoaded(recipients) => {
            state.replace_recipients(recipients);
            Vec::new()
        }
        Msg::RecipientsLoadFailed { reason } => {
            // Loading can run at any time; the cached list simply stays as is.
            scanner_warn!("Loading recipients failed: {}", reason);
            Vec::new()
        }
        Msg::NewEmailChanged(text) => {
            state.set_new_email(text);
            Vec::new()
        }
        Msg::AddRecipientClicked => {
            let email = state.new_email().to_string();
            state.begin_recipient_mutation(RecipientOp::Add, email)
        }
        Msg::RemoveRecipientClicked(email) => {
            state.begin_recipient_mutation(RecipientOp::Remove, email)
        }
        Msg::RecipientMutationSucceeded { op, recipients } => {
            state.apply_mutation_succeeded(op, recipients);
            Vec::new()
        }
        Msg::RecipientMutationFailed { op, server_message } => {
            state.apply_mutation_failed(op, server_message);
            Vec::new()
        }
        Msg::RecipientMutationSkipped { op } => {
            state.apply_mutation_skipped(op);
            Vec::new()
        }
        Msg::ResultsRequested => state.request_results(),
        Msg::ResultsFetched(summary) => {
            state.apply_results(summary);
            Vec::new()
        }
        Msg::ResultsFetchFailed { job_id, reason } => {
            state.apply_results_failed(&job_id, &reason);
            Vec::new()
        }
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}
