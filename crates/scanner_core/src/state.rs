use scanner_logging::{scanner_debug, scanner_info, scanner_trace, scanner_warn};

use crate::poller::{JobPoller, TickDecision};
use crate::view_model::{AppViewModel, JobView};
use crate::{
    Effect, Generation, JobId, JobSnapshot, JobStatus, Notice, Notifications, RecipientOp,
    ResultsSummary, SubmissionAccepted, SubmissionDraft, Surface,
};

pub const DOMAINS_REQUIRED: &str = "Please enter at least one domain";
pub const SUBMIT_FALLBACK_ERROR: &str = "An error occurred. Please try again.";
pub const RESULTS_FALLBACK_ERROR: &str = "Failed to load results";

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppState {
    draft: SubmissionDraft,
    field_error: Option<String>,
    submit_in_flight: bool,
    accepted: Option<SubmissionAccepted>,
    poller: JobPoller,
    job: Option<JobSnapshot>,
    results: Option<ResultsSummary>,
    notifications: Notifications,
    recipients: Vec<String>,
    new_email: String,
    settings_busy: bool,
    dirty: bool,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn view(&self) -> AppViewModel {
        AppViewModel {
            loading: self.submit_in_flight || self.poller.is_active(),
            submit_enabled: !self.submit_in_flight,
            field_error: self.field_error.clone(),
            submission_notice: self.notifications.get(Surface::Submission).cloned(),
            accepted: self.accepted.clone(),
            job: self.job.as_ref().map(JobView::from_snapshot),
            results: self.results.clone(),
            recipients: self.recipients.clone(),
            new_email: self.new_email.clone(),
            settings_busy: self.settings_busy,
            settings_notice: self.notifications.get(Surface::Settings).cloned(),
            dirty: self.dirty,
        }
    }

    pub fn draft(&self) -> &SubmissionDraft {
        &self.draft
    }

    pub fn poller(&self) -> &JobPoller {
        &self.poller
    }

    pub fn new_email(&self) -> &str {
        &self.new_email
    }

    pub fn job(&self) -> Option<&JobSnapshot> {
        self.job.as_ref()
    }

    /// Returns whether the view changed since the last call, and resets the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_domains(&mut self, text: String) {
        self.draft.domains = text;
        self.field_error = None;
        self.mark_dirty();
    }

    pub(crate) fn set_custom_emails(&mut self, text: String) {
        self.draft.custom_emails = text;
        self.mark_dirty();
    }

    pub(crate) fn set_use_configured_emails(&mut self, enabled: bool) {
        self.draft.use_configured_emails = enabled;
        self.mark_dirty();
    }

    pub(crate) fn begin_submission(&mut self) -> Vec<Effect> {
        if self.submit_in_flight {
            scanner_debug!("Submit ignored: a submission is already outstanding");
            return Vec::new();
        }
        if !self.draft.has_domains() {
            self.field_error = Some(DOMAINS_REQUIRED.to_string());
            self.mark_dirty();
            return Vec::new();
        }

        self.field_error = None;
        self.notifications.clear(Surface::Submission);
        self.accepted = None;
        self.job = None;
        self.results = None;
        self.submit_in_flight = true;
        self.mark_dirty();

        let mut effects = Vec::with_capacity(2);
        if let Some(generation) = self.poller.cancel() {
            scanner_info!("New submission cancels poller generation {}", generation);
            effects.push(Effect::StopPolling { generation });
        }
        effects.push(Effect::SubmitJob {
            draft: self.draft.clone(),
        });
        effects
    }

    pub(crate) fn apply_submission_accepted(&mut self, accepted: SubmissionAccepted) -> Vec<Effect> {
        if !self.submit_in_flight {
            scanner_debug!("Dropping acceptance for {}: no submission outstanding", accepted.job_id);
            return Vec::new();
        }
        self.submit_in_flight = false;
        self.draft = SubmissionDraft::default();
        self.notifications
            .post(Surface::Submission, Notice::success(accepted.message.clone()));
        let effects = self.start_polling(accepted.job_id.clone());
        self.accepted = Some(accepted);
        effects
    }

    pub(crate) fn apply_submission_failed(&mut self, server_message: Option<String>) {
        if !self.submit_in_flight {
            return;
        }
        self.submit_in_flight = false;
        let text = non_blank(server_message).unwrap_or_else(|| SUBMIT_FALLBACK_ERROR.to_string());
        scanner_warn!("Submission failed: {}", text);
        self.notifications.post(Surface::Submission, Notice::error(text));
        self.mark_dirty();
    }

    pub(crate) fn watch(&mut self, job_id: JobId) -> Vec<Effect> {
        let job_id = job_id.trim().to_string();
        if job_id.is_empty() {
            return Vec::new();
        }
        self.notifications.clear(Surface::Submission);
        self.accepted = None;
        self.job = None;
        self.results = None;
        self.start_polling(job_id)
    }

    fn start_polling(&mut self, job_id: JobId) -> Vec<Effect> {
        let start = self.poller.start(job_id.clone());
        scanner_info!("Polling job {} (generation {})", job_id, start.generation);
        self.mark_dirty();

        let mut effects = Vec::with_capacity(2);
        if let Some(generation) = start.superseded {
            effects.push(Effect::StopPolling { generation });
        }
        effects.push(Effect::StartPolling {
            job_id,
            generation: start.generation,
        });
        effects
    }

    pub(crate) fn poll_tick(&mut self, generation: Generation) -> Vec<Effect> {
        match self.poller.tick(generation) {
            TickDecision::Fetch(job_id) => vec![Effect::FetchStatus { job_id, generation }],
            TickDecision::Busy => {
                scanner_debug!("Tick skipped: status request still outstanding");
                Vec::new()
            }
            TickDecision::Stale => {
                scanner_trace!("Stale tick for generation {}", generation);
                Vec::new()
            }
        }
    }

    pub(crate) fn apply_status(&mut self, generation: Generation, snapshot: JobSnapshot) -> Vec<Effect> {
        if !self.poller.resolve(generation, &snapshot.job_id) {
            scanner_debug!(
                "Discarding stale status for {} (generation {})",
                snapshot.job_id,
                generation
            );
            return Vec::new();
        }

        let terminal = snapshot.status.is_terminal();
        if self.job.as_ref() != Some(&snapshot) {
            self.job = Some(snapshot);
            self.mark_dirty();
        }
        if !terminal {
            return Vec::new();
        }
        match self.poller.finish() {
            Some(generation) => {
                scanner_info!("Job reached a terminal status; stopping generation {}", generation);
                self.mark_dirty();
                vec![Effect::StopPolling { generation }]
            }
            None => Vec::new(),
        }
    }

    pub(crate) fn apply_status_failure(&mut self, generation: Generation, job_id: &str, reason: &str) {
        if self.poller.resolve(generation, job_id) {
            scanner_warn!("Status poll for {} failed: {}", job_id, reason);
        } else {
            scanner_debug!("Discarding stale poll failure for {}: {}", job_id, reason);
        }
    }

    pub(crate) fn close_view(&mut self) -> Vec<Effect> {
        match self.poller.cancel() {
            Some(generation) => {
                self.mark_dirty();
                vec![Effect::StopPolling { generation }]
            }
            None => Vec::new(),
        }
    }

    pub(crate) fn replace_recipients(&mut self, recipients: Vec<String>) {
        if self.recipients != recipients {
            self.recipients = recipients;
            self.mark_dirty();
        }
    }

    pub(crate) fn set_new_email(&mut self, text: String) {
        self.new_email = text;
        self.mark_dirty();
    }

    pub(crate) fn begin_recipient_mutation(&mut self, op: RecipientOp, email: String) -> Vec<Effect> {
        if self.settings_busy {
            scanner_debug!("{:?} ignored: a recipient change is in flight", op);
            return Vec::new();
        }
        if email.trim().is_empty() {
            return Vec::new();
        }
        self.settings_busy = true;
        self.notifications.clear(Surface::Settings);
        self.mark_dirty();
        vec![Effect::MutateRecipient { op, email }]
    }

    pub(crate) fn apply_mutation_succeeded(&mut self, op: RecipientOp, recipients: Vec<String>) {
        self.settings_busy = false;
        if op == RecipientOp::Add {
            self.new_email.clear();
        }
        self.recipients = recipients;
        self.notifications
            .post(Surface::Settings, Notice::success(op.success_text()));
        self.mark_dirty();
    }

    pub(crate) fn apply_mutation_failed(&mut self, op: RecipientOp, server_message: Option<String>) {
        self.settings_busy = false;
        let text = non_blank(server_message).unwrap_or_else(|| op.fallback_error().to_string());
        self.notifications.post(Surface::Settings, Notice::error(text));
        self.mark_dirty();
    }

    pub(crate) fn apply_mutation_skipped(&mut self, op: RecipientOp) {
        scanner_debug!("{:?} skipped: blank email", op);
        if self.settings_busy {
            self.settings_busy = false;
            self.mark_dirty();
        }
    }

    pub(crate) fn request_results(&self) -> Vec<Effect> {
        match &self.job {
            Some(job) if job.status == JobStatus::Completed => vec![Effect::FetchResults {
                job_id: job.job_id.clone(),
            }],
            _ => {
                scanner_debug!("Results requested before the job completed");
                Vec::new()
            }
        }
    }

    pub(crate) fn apply_results(&mut self, summary: ResultsSummary) {
        if self.job.as_ref().map(|job| job.job_id.as_str()) != Some(summary.job_id.as_str()) {
            scanner_debug!("Discarding results for {}: not the current job", summary.job_id);
            return;
        }
        self.results = Some(summary);
        self.mark_dirty();
    }

    pub(crate) fn apply_results_failed(&mut self, job_id: &str, reason: &str) {
        scanner_warn!("Fetching results for {} failed: {}", job_id, reason);
        if self.job.as_ref().map(|job| job.job_id.as_str()) == Some(job_id) {
            self.notifications
                .post(Surface::Submission, Notice::error(RESULTS_FALLBACK_ERROR));
            self.mark_dirty();
        }
    }
}

fn non_blank(message: Option<String>) -> Option<String> {
    message.filter(|text| !text.trim().is_empty())
}
