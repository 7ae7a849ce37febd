//! Scanner core: pure job-lifecycle state machine and view-model helpers.
mod effect;
mod job;
mod msg;
mod notice;
mod poller;
mod state;
mod update;
mod view_model;

pub use effect::Effect;
pub use job::{
    DomainResult, Generation, JobId, JobSnapshot, JobStatus, RecipientOp, ResultsSummary,
    SubmissionAccepted, SubmissionDraft,
};
pub use msg::Msg;
pub use notice::{Notice, NoticeKind, Notifications, Surface};
pub use poller::{JobPoller, PollPhase, PollStart, TickDecision};
pub use state::{AppState, DOMAINS_REQUIRED, RESULTS_FALLBACK_ERROR, SUBMIT_FALLBACK_ERROR};
pub use update::update;
pub use view_model::{AppViewModel, JobView};
