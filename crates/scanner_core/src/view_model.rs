use crate::{JobId, JobSnapshot, JobStatus, Notice, ResultsSummary, SubmissionAccepted};

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    /// A submission is outstanding or a poller is active.
    pub loading: bool,
    /// The form accepts a new submission.
    pub submit_enabled: bool,
    pub field_error: Option<String>,
    pub submission_notice: Option<Notice>,
    pub accepted: Option<SubmissionAccepted>,
    pub job: Option<JobView>,
    pub results: Option<ResultsSummary>,
    pub recipients: Vec<String>,
    pub new_email: String,
    pub settings_busy: bool,
    pub settings_notice: Option<Notice>,
    pub dirty: bool,
}

/// Display state derived from one status snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobView {
    pub job_id: JobId,
    pub status_label: String,
    pub show_progress: bool,
    pub progress: u8,
    pub domains_count: u64,
    pub results_count: u64,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub results_emailed: bool,
    pub error_banner: Option<String>,
    pub is_terminal: bool,
}

impl JobView {
    pub fn from_snapshot(snapshot: &JobSnapshot) -> Self {
        Self {
            job_id: snapshot.job_id.clone(),
            status_label: snapshot.status.as_str().to_uppercase(),
            show_progress: snapshot.status == JobStatus::Processing,
            progress: snapshot.progress,
            domains_count: snapshot.domains_count,
            results_count: snapshot.results_count,
            started_at: snapshot.started_at.clone(),
            completed_at: snapshot.completed_at.clone(),
            results_emailed: snapshot.completed_at.is_some(),
            error_banner: snapshot.error.clone(),
            is_terminal: snapshot.status.is_terminal(),
        }
    }
}
