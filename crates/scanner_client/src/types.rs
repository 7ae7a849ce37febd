use std::fmt;

use serde::{Deserialize, Deserializer, Serialize};
use thiserror::Error;

/// Body of `POST /api/analyze`. Text fields are forwarded as typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzeRequest {
    pub domains: String,
    pub emails: String,
    pub use_configured_emails: bool,
}

/// Acceptance returned by `POST /api/analyze`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobHandle {
    pub job_id: String,
    pub message: String,
    #[serde(default)]
    pub domains_count: u64,
    #[serde(default)]
    pub recipients_count: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub status: String,
    #[serde(default, deserialize_with = "whole_percent")]
    pub progress: i64,
    #[serde(default)]
    pub domains_count: u64,
    #[serde(default)]
    pub results_count: u64,
    #[serde(default)]
    pub started_at: String,
    pub completed_at: Option<String>,
    pub error: Option<String>,
}

/// Accepts any JSON number (or null) and rounds it to a whole percent.
fn whole_percent<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = Option::<serde_json::Number>::deserialize(deserializer)?;
    Ok(raw
        .and_then(|number| {
            number
                .as_i64()
                .or_else(|| number.as_f64().map(|value| value.round() as i64))
        })
        .unwrap_or(0))
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct EmailConfigResponse {
    pub recipients: Vec<String>,
    #[serde(default)]
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct JobResultsResponse {
    pub job_id: String,
    pub status: String,
    #[serde(default)]
    pub domains: Vec<String>,
    #[serde(default)]
    pub results: Vec<DomainResultRecord>,
    #[serde(default)]
    pub started_at: String,
    pub completed_at: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct DomainResultRecord {
    pub domain: String,
    #[serde(default)]
    pub findings: serde_json::Value,
    pub error: Option<String>,
    #[serde(default)]
    pub analyzed_at: String,
}

impl DomainResultRecord {
    /// Number of suspicious archive entries reported for the domain.
    pub fn finding_count(&self) -> usize {
        match &self.findings {
            serde_json::Value::Array(items) => items.len(),
            serde_json::Value::Object(map) => map.len(),
            _ => 0,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    #[serde(default)]
    pub active_jobs: u64,
    #[serde(default)]
    pub total_jobs: u64,
}

#[derive(Debug, Serialize)]
pub(crate) struct EmailRequest<'a> {
    pub email: &'a str,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ErrorBody {
    pub error: Option<String>,
}

/// Server-held notification recipients, in server order, without duplicates.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipientList(Vec<String>);

impl RecipientList {
    pub fn from_server(recipients: Vec<String>) -> Self {
        let mut unique: Vec<String> = Vec::with_capacity(recipients.len());
        for email in recipients {
            if !unique.contains(&email) {
                unique.push(email);
            }
        }
        Self(unique)
    }

    pub fn contains(&self, email: &str) -> bool {
        self.0.iter().any(|candidate| candidate == email)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn into_vec(self) -> Vec<String> {
        self.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecipientChange {
    Add,
    Remove,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MutationOutcome {
    /// Blank input; nothing was sent.
    Skipped,
    /// The service accepted the change. `recipients` is the list after the
    /// follow-up reload (unchanged cache if that reload failed).
    Applied { recipients: RecipientList },
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    Submitted(Result<JobHandle, ServiceError>),
    PollTick {
        generation: u64,
    },
    StatusFetched {
        job_id: String,
        generation: u64,
        result: Result<JobStatusResponse, ServiceError>,
    },
    RecipientsLoaded(Result<RecipientList, ServiceError>),
    RecipientChanged {
        change: RecipientChange,
        result: Result<MutationOutcome, ServiceError>,
    },
    ResultsFetched {
        job_id: String,
        result: Result<JobResultsResponse, ServiceError>,
    },
    Health(Result<HealthResponse, ServiceError>),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{kind}: {message}")]
pub struct ServiceError {
    pub kind: FailureKind,
    pub message: String,
}

impl ServiceError {
    pub(crate) fn new(kind: FailureKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The `error` field of a non-2xx response body, if the service sent one.
    pub fn server_message(&self) -> Option<&str> {
        match &self.kind {
            FailureKind::HttpStatus {
                server_error: Some(text),
                ..
            } => Some(text),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FailureKind {
    Validation,
    InvalidBaseUrl,
    HttpStatus {
        status: u16,
        server_error: Option<String>,
    },
    Timeout,
    Decode,
    Network,
    /// The local HTTP client or runtime could not be built.
    Setup,
}

impl fmt::Display for FailureKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FailureKind::Validation => write!(f, "invalid request"),
            FailureKind::InvalidBaseUrl => write!(f, "invalid base url"),
            FailureKind::HttpStatus { status, .. } => write!(f, "http status {status}"),
            FailureKind::Timeout => write!(f, "timeout"),
            FailureKind::Decode => write!(f, "malformed response"),
            FailureKind::Network => write!(f, "network error"),
            FailureKind::Setup => write!(f, "client setup failed"),
        }
    }
}
