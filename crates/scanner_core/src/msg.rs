use crate::{Generation, JobId, JobSnapshot, RecipientOp, ResultsSummary, SubmissionAccepted};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Msg {
    /// User edited the domains field.
    DomainsChanged(String),
    /// User edited the additional recipients field.
    CustomEmailsChanged(String),
    /// User toggled "send to configured emails".
    UseConfiguredEmailsToggled(bool),
    /// User submitted the analysis form.
    SubmitClicked,
    /// The service accepted the submission.
    SubmitSucceeded(SubmissionAccepted),
    /// The submission request failed.
    SubmitFailed { server_message: Option<String> },
    /// Attach a poller to a job submitted earlier.
    WatchRequested { job_id: JobId },
    /// Poll timer fired.
    PollTick { generation: Generation },
    /// A status request resolved.
    StatusFetched {
        generation: Generation,
        snapshot: JobSnapshot,
    },
    /// A status request failed.
    StatusFetchFailed {
        generation: Generation,
        job_id: JobId,
        reason: String,
    },
    /// The hosting view is going away.
    ViewClosed,
    /// Refresh the recipient list from the service.
    RecipientsRequested,
    RecipientsLoaded(Vec<String>),
    RecipientsLoadFailed { reason: String },
    /// User edited the "new recipient" field.
    NewEmailChanged(String),
    AddRecipientClicked,
    RemoveRecipientClicked(String),
    /// A recipient mutation was accepted; `recipients` is the reloaded list.
    RecipientMutationSucceeded {
        op: RecipientOp,
        recipients: Vec<String>,
    },
    RecipientMutationFailed {
        op: RecipientOp,
        server_message: Option<String>,
    },
    /// The service side dropped a blank mutation without a request.
    RecipientMutationSkipped { op: RecipientOp },
    /// Ask for the per-domain results of the current job.
    ResultsRequested,
    ResultsFetched(ResultsSummary),
    ResultsFetchFailed { job_id: JobId, reason: String },
    /// Fallback for placeholder wiring.
    NoOp,
}
