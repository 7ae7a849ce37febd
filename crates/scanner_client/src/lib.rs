//! Scanner client: Analysis Service access and effect execution.
mod engine;
mod recipients;
mod service;
mod submit;
mod timer;
mod types;

pub use engine::EngineHandle;
pub use recipients::RecipientStore;
pub use service::{AnalysisService, ClientSettings, HttpAnalysisService, DEFAULT_BASE_URL};
pub use submit::submit_analysis;
pub use timer::{ChannelEventSink, EventSink, PollTimer};
pub use types::{
    AnalyzeRequest, DomainResultRecord, EmailConfigResponse, EngineEvent, FailureKind,
    HealthResponse, JobHandle, JobResultsResponse, JobStatusResponse, MutationOutcome,
    RecipientChange, RecipientList, ServiceError,
};
