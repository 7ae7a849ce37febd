use scanner_client::{
    AnalyzeRequest, ClientSettings, EngineEvent, EngineHandle, JobHandle, JobResultsResponse,
    JobStatusResponse, MutationOutcome, RecipientChange, ServiceError,
};
use scanner_core::{
    DomainResult, Effect, JobSnapshot, JobStatus, Msg, RecipientOp, ResultsSummary,
    SubmissionAccepted,
};
use scanner_logging::{scanner_debug, scanner_info};

/// Executes core effects on the engine and turns engine events back into
/// core messages.
pub struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        Ok(Self {
            engine: EngineHandle::new(settings)?,
        })
    }

    #[cfg(test)]
    pub fn with_engine(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    pub fn run(&self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::SubmitJob { draft } => {
                    scanner_info!(
                        "SubmitJob domains_len={} emails_len={} use_configured={}",
                        draft.domains.len(),
                        draft.custom_emails.len(),
                        draft.use_configured_emails
                    );
                    self.engine.submit(AnalyzeRequest {
                        domains: draft.domains,
                        emails: draft.custom_emails,
                        use_configured_emails: draft.use_configured_emails,
                    });
                }
                Effect::StartPolling { job_id, generation } => {
                    scanner_debug!("StartPolling job_id={} generation={}", job_id, generation);
                    self.engine.start_polling(generation);
                }
                Effect::StopPolling { generation } => {
                    scanner_debug!("StopPolling generation={}", generation);
                    self.engine.stop_polling(generation);
                }
                Effect::FetchStatus { job_id, generation } => {
                    self.engine.fetch_status(job_id, generation);
                }
                Effect::LoadRecipients => self.engine.load_recipients(),
                Effect::MutateRecipient { op, email } => {
                    self.engine.change_recipient(map_op(op), email);
                }
                Effect::FetchResults { job_id } => self.engine.fetch_results(job_id),
            }
        }
    }
}

/// Maps an engine event to the core message it stands for. Health reports
/// have no core counterpart and map to `None`.
pub fn map_event(event: EngineEvent) -> Option<Msg> {
    let msg = match event {
        EngineEvent::Submitted(Ok(handle)) => Msg::SubmitSucceeded(map_handle(handle)),
        EngineEvent::Submitted(Err(err)) => Msg::SubmitFailed {
            server_message: server_message(&err),
        },
        EngineEvent::PollTick { generation } => Msg::PollTick { generation },
        EngineEvent::StatusFetched {
            job_id,
            generation,
            result: Ok(status),
        } => Msg::StatusFetched {
            generation,
            snapshot: map_status(job_id, status),
        },
        EngineEvent::StatusFetched {
            job_id,
            generation,
            result: Err(err),
        } => Msg::StatusFetchFailed {
            generation,
            job_id,
            reason: err.to_string(),
        },
        EngineEvent::RecipientsLoaded(Ok(list)) => Msg::RecipientsLoaded(list.into_vec()),
        EngineEvent::RecipientsLoaded(Err(err)) => Msg::RecipientsLoadFailed {
            reason: err.to_string(),
        },
        EngineEvent::RecipientChanged { change, result } => {
            let op = map_change(change);
            match result {
                Ok(MutationOutcome::Applied { recipients }) => Msg::RecipientMutationSucceeded {
                    op,
                    recipients: recipients.into_vec(),
                },
                Ok(MutationOutcome::Skipped) => Msg::RecipientMutationSkipped { op },
                Err(err) => Msg::RecipientMutationFailed {
                    op,
                    server_message: server_message(&err),
                },
            }
        }
        EngineEvent::ResultsFetched {
            job_id: _,
            result: Ok(results),
        } => Msg::ResultsFetched(map_results(results)),
        EngineEvent::ResultsFetched {
            job_id,
            result: Err(err),
        } => Msg::ResultsFetchFailed {
            job_id,
            reason: err.to_string(),
        },
        EngineEvent::Health(_) => return None,
    };
    Some(msg)
}

fn server_message(err: &ServiceError) -> Option<String> {
    err.server_message().map(str::to_owned)
}

fn map_handle(handle: JobHandle) -> SubmissionAccepted {
    SubmissionAccepted {
        job_id: handle.job_id,
        message: handle.message,
        domains_count: handle.domains_count,
        recipients_count: handle.recipients_count,
    }
}

/// The snapshot is keyed by the job id the request was issued for, so the
/// stale guard compares like with like.
fn map_status(job_id: String, status: JobStatusResponse) -> JobSnapshot {
    JobSnapshot {
        job_id,
        status: JobStatus::parse(&status.status),
        progress: JobSnapshot::clamp_progress(status.progress),
        domains_count: status.domains_count,
        results_count: status.results_count,
        started_at: status.started_at,
        completed_at: status.completed_at,
        error: status.error,
    }
}

pub fn map_results(results: JobResultsResponse) -> ResultsSummary {
    ResultsSummary {
        job_id: results.job_id,
        domains: results.domains,
        results: results
            .results
            .into_iter()
            .map(|record| DomainResult {
                finding_count: record.finding_count(),
                domain: record.domain,
                error: record.error,
                analyzed_at: record.analyzed_at,
            })
            .collect(),
    }
}

fn map_op(op: RecipientOp) -> RecipientChange {
    match op {
        RecipientOp::Add => RecipientChange::Add,
        RecipientOp::Remove => RecipientChange::Remove,
    }
}

fn map_change(change: RecipientChange) -> RecipientOp {
    match change {
        RecipientChange::Add => RecipientOp::Add,
        RecipientChange::Remove => RecipientOp::Remove,
    }
}
