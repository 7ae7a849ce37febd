use crate::{Generation, JobId, RecipientOp, SubmissionDraft};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    SubmitJob { draft: SubmissionDraft },
    StartPolling { job_id: JobId, generation: Generation },
    StopPolling { generation: Generation },
    FetchStatus { job_id: JobId, generation: Generation },
    LoadRecipients,
    MutateRecipient { op: RecipientOp, email: String },
    FetchResults { job_id: JobId },
}
