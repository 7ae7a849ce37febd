use std::fmt;

/// Opaque identifier assigned by the Analysis Service.
pub type JobId = String;

/// Poller epoch. Bumped on every start and cancel so that late results can
/// be matched against the poller that issued them.
pub type Generation = u64;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum JobStatus {
    Queued,
    Processing,
    Completed,
    Failed,
    /// A status string this client does not know. Never terminal.
    Unknown(String),
}

impl JobStatus {
    pub fn parse(raw: &str) -> Self {
        match raw {
            "queued" => Self::Queued,
            "processing" => Self::Processing,
            "completed" => Self::Completed,
            "failed" => Self::Failed,
            other => Self::Unknown(other.to_string()),
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            Self::Queued => "queued",
            Self::Processing => "processing",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Unknown(raw) => raw,
        }
    }

    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Completed | Self::Failed)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Latest status reported for a job. Always replaced wholesale.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobSnapshot {
    pub job_id: JobId,
    pub status: JobStatus,
    pub progress: u8,
    pub domains_count: u64,
    pub results_count: u64,
    pub started_at: String,
    pub completed_at: Option<String>,
    pub error: Option<String>,
}

impl JobSnapshot {
    /// Clamps a server-reported progress value into 0..=100.
    pub fn clamp_progress(raw: i64) -> u8 {
        raw.clamp(0, 100) as u8
    }
}

/// Form state for a new analysis request. The text fields are sent verbatim;
/// splitting on commas and newlines is the service's job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionDraft {
    pub domains: String,
    pub custom_emails: String,
    pub use_configured_emails: bool,
}

impl Default for SubmissionDraft {
    fn default() -> Self {
        Self {
            domains: String::new(),
            custom_emails: String::new(),
            use_configured_emails: true,
        }
    }
}

impl SubmissionDraft {
    pub fn has_domains(&self) -> bool {
        !self.domains.trim().is_empty()
    }
}

/// Confirmation returned when the service accepts a submission.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionAccepted {
    pub job_id: JobId,
    pub message: String,
    pub domains_count: u64,
    pub recipients_count: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientOp {
    Add,
    Remove,
}

impl RecipientOp {
    pub(crate) fn success_text(self) -> &'static str {
        match self {
            Self::Add => "Email added successfully",
            Self::Remove => "Email removed successfully",
        }
    }

    pub(crate) fn fallback_error(self) -> &'static str {
        match self {
            Self::Add => "Failed to add email",
            Self::Remove => "Failed to remove email",
        }
    }
}

/// Per-domain outcome from a finished job.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DomainResult {
    pub domain: String,
    pub finding_count: usize,
    pub error: Option<String>,
    pub analyzed_at: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultsSummary {
    pub job_id: JobId,
    pub domains: Vec<String>,
    pub results: Vec<DomainResult>,
}
