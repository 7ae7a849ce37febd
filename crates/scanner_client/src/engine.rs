use std::sync::{mpsc, Arc};
use std::thread;
use std::time::Duration;

use scanner_logging::{scanner_debug, scanner_info};
use tokio::runtime::Runtime;

use crate::submit::submit_analysis;
use crate::timer::{ChannelEventSink, EventSink, PollTimer};
use crate::{
    AnalysisService, AnalyzeRequest, ClientSettings, EngineEvent, FailureKind,
    HttpAnalysisService, RecipientChange, RecipientStore, ServiceError,
};

enum EngineCommand {
    StartPolling { generation: u64 },
    StopPolling { generation: u64 },
    Call(ServiceCall),
}

/// Commands that turn into one service round trip each.
enum ServiceCall {
    Submit(AnalyzeRequest),
    FetchStatus { job_id: String, generation: u64 },
    LoadRecipients,
    ChangeRecipient { change: RecipientChange, email: String },
    FetchResults { job_id: String },
    CheckHealth,
}

/// Runs service calls on a background runtime.
///
/// Commands are executed as independent tasks; every outcome comes back as
/// an [`EngineEvent`] through [`EngineHandle::recv`]. At most one poll timer
/// is alive at a time.
pub struct EngineHandle {
    cmd_tx: mpsc::Sender<EngineCommand>,
    event_rx: mpsc::Receiver<EngineEvent>,
}

impl EngineHandle {
    pub fn new(settings: ClientSettings) -> Result<Self, ServiceError> {
        let service = HttpAnalysisService::new(&settings)?;
        scanner_info!("Using Analysis Service at {}", service.base_url());
        Self::with_service(Arc::new(service), settings.poll_interval)
    }

    pub fn with_service(
        service: Arc<dyn AnalysisService>,
        poll_interval: Duration,
    ) -> Result<Self, ServiceError> {
        let runtime = Runtime::new()
            .map_err(|err| ServiceError::new(FailureKind::Setup, err.to_string()))?;
        let (cmd_tx, cmd_rx) = mpsc::channel();
        let (event_tx, event_rx) = mpsc::channel();
        let sink: Arc<dyn EventSink> = Arc::new(ChannelEventSink::new(event_tx));
        let store = Arc::new(RecipientStore::new(service.clone()));

        thread::spawn(move || {
            let mut timer: Option<PollTimer> = None;
            while let Ok(command) = cmd_rx.recv() {
                match command {
                    EngineCommand::StartPolling { generation } => {
                        // Dropping the previous timer cancels it.
                        timer = Some(PollTimer::spawn(
                            runtime.handle(),
                            generation,
                            poll_interval,
                            sink.clone(),
                        ));
                    }
                    EngineCommand::StopPolling { generation } => {
                        if timer.as_ref().map(PollTimer::generation) == Some(generation) {
                            timer = None;
                        } else {
                            scanner_debug!("No running timer for generation {}", generation);
                        }
                    }
                    EngineCommand::Call(call) => {
                        let service = service.clone();
                        let store = store.clone();
                        let sink = sink.clone();
                        runtime.spawn(async move {
                            let event = handle_call(service.as_ref(), &store, call).await;
                            sink.emit(event);
                        });
                    }
                }
            }
            drop(timer);
        });

        Ok(Self { cmd_tx, event_rx })
    }

    pub fn submit(&self, request: AnalyzeRequest) {
        self.call(ServiceCall::Submit(request));
    }

    pub fn start_polling(&self, generation: u64) {
        self.send(EngineCommand::StartPolling { generation });
    }

    pub fn stop_polling(&self, generation: u64) {
        self.send(EngineCommand::StopPolling { generation });
    }

    pub fn fetch_status(&self, job_id: impl Into<String>, generation: u64) {
        self.call(ServiceCall::FetchStatus {
            job_id: job_id.into(),
            generation,
        });
    }

    pub fn load_recipients(&self) {
        self.call(ServiceCall::LoadRecipients);
    }

    pub fn change_recipient(&self, change: RecipientChange, email: impl Into<String>) {
        self.call(ServiceCall::ChangeRecipient {
            change,
            email: email.into(),
        });
    }

    pub fn fetch_results(&self, job_id: impl Into<String>) {
        self.call(ServiceCall::FetchResults {
            job_id: job_id.into(),
        });
    }

    pub fn check_health(&self) {
        self.call(ServiceCall::CheckHealth);
    }

    /// Blocks until the next event arrives.
    pub fn recv(&self) -> Option<EngineEvent> {
        self.event_rx.recv().ok()
    }

    pub fn recv_timeout(&self, timeout: Duration) -> Option<EngineEvent> {
        self.event_rx.recv_timeout(timeout).ok()
    }

    pub fn try_recv(&self) -> Option<EngineEvent> {
        self.event_rx.try_recv().ok()
    }

    fn call(&self, call: ServiceCall) {
        self.send(EngineCommand::Call(call));
    }

    fn send(&self, command: EngineCommand) {
        let _ = self.cmd_tx.send(command);
    }
}

async fn handle_call(
    service: &dyn AnalysisService,
    store: &RecipientStore,
    call: ServiceCall,
) -> EngineEvent {
    match call {
        ServiceCall::Submit(request) => {
            EngineEvent::Submitted(submit_analysis(service, &request).await)
        }
        ServiceCall::FetchStatus { job_id, generation } => {
            let result = service.job_status(&job_id).await;
            EngineEvent::StatusFetched {
                job_id,
                generation,
                result,
            }
        }
        ServiceCall::LoadRecipients => EngineEvent::RecipientsLoaded(store.try_load().await),
        ServiceCall::ChangeRecipient { change, email } => EngineEvent::RecipientChanged {
            change,
            result: store.apply(change, &email).await,
        },
        ServiceCall::FetchResults { job_id } => {
            let result = service.job_results(&job_id).await;
            EngineEvent::ResultsFetched { job_id, result }
        }
        ServiceCall::CheckHealth => EngineEvent::Health(service.health().await),
    }
}
