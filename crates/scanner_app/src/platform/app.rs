use std::process::ExitCode;

use anyhow::{anyhow, bail, Context};
use scanner_client::{ClientSettings, EngineEvent};
use scanner_core::{update, AppState, AppViewModel, JobStatus, Msg};
use scanner_logging::{scanner_debug, scanner_info};

use super::effects::{map_event, map_results, EffectRunner};
use super::render::{render, render_recipients, Renderer};
use crate::cli::{Command, RecipientsAction};

/// Which part of the view model gets printed after each update.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    Submission,
    Settings,
}

pub fn run(command: Command, settings: ClientSettings) -> anyhow::Result<ExitCode> {
    let runner = EffectRunner::new(settings).context("cannot reach the Analysis Service")?;
    let mut app = App::new(runner);
    match command {
        Command::Analyze {
            domains,
            emails,
            no_configured_emails,
            detach,
            results,
        } => app.analyze(domains, emails, !no_configured_emails, detach, results),
        Command::Watch { job_id, results } => app.watch(job_id, results),
        Command::Recipients { action } => app.recipients(action),
        Command::Results { job_id } => app.results(job_id),
        Command::Health => app.health(),
    }
}

struct App {
    state: AppState,
    runner: EffectRunner,
    renderer: Renderer,
    screen: Screen,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
            renderer: Renderer::new(),
            screen: Screen::Submission,
        }
    }

    fn view(&self) -> AppViewModel {
        self.state.view()
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            let view = state.view();
            let frame = match self.screen {
                Screen::Submission => render(&view),
                Screen::Settings => render_recipients(&view),
            };
            self.renderer.present(frame);
        }
        self.state = state;
        self.runner.run(effects);
    }

    /// Feeds engine events into the update loop until `done` holds.
    fn pump_until(&mut self, done: impl Fn(&AppState) -> bool) -> anyhow::Result<()> {
        while !done(&self.state) {
            let event = self
                .runner
                .engine()
                .recv()
                .ok_or_else(|| anyhow!("engine stopped unexpectedly"))?;
            if let Some(msg) = map_event(event) {
                self.dispatch(msg);
            }
        }
        Ok(())
    }

    fn analyze(
        &mut self,
        domains: String,
        emails: String,
        use_configured_emails: bool,
        detach: bool,
        results: bool,
    ) -> anyhow::Result<ExitCode> {
        self.dispatch(Msg::DomainsChanged(domains));
        self.dispatch(Msg::CustomEmailsChanged(emails));
        self.dispatch(Msg::UseConfiguredEmailsToggled(use_configured_emails));
        self.dispatch(Msg::SubmitClicked);
        self.pump_until(|state| state.view().submit_enabled)?;

        let view = self.view();
        if view.field_error.is_some() || view.accepted.is_none() {
            return Ok(ExitCode::FAILURE);
        }
        if detach {
            self.dispatch(Msg::ViewClosed);
            return Ok(ExitCode::SUCCESS);
        }
        self.follow(results)
    }

    fn watch(&mut self, job_id: String, results: bool) -> anyhow::Result<ExitCode> {
        if job_id.trim().is_empty() {
            bail!("job id must not be empty");
        }
        self.dispatch(Msg::WatchRequested { job_id });
        self.follow(results)
    }

    /// Polls until the job settles, then optionally prints its results.
    fn follow(&mut self, results: bool) -> anyhow::Result<ExitCode> {
        self.pump_until(|state| !state.poller().is_active())?;

        let status = self.state.job().map(|job| job.status.clone());
        scanner_info!("Job settled with status {:?}", status);
        match status {
            Some(JobStatus::Completed) => {
                if results {
                    self.dispatch(Msg::ResultsRequested);
                    self.pump_until(|state| {
                        let view = state.view();
                        view.results.is_some()
                            || view.submission_notice.as_ref().is_some_and(|n| n.is_error())
                    })?;
                    if self.view().results.is_none() {
                        return Ok(ExitCode::FAILURE);
                    }
                }
                Ok(ExitCode::SUCCESS)
            }
            _ => Ok(ExitCode::FAILURE),
        }
    }

    fn recipients(&mut self, action: RecipientsAction) -> anyhow::Result<ExitCode> {
        self.screen = Screen::Settings;
        self.load_recipients()?;

        let clicked = match action {
            RecipientsAction::List => {
                self.renderer.present(render_recipients(&self.view()));
                return Ok(ExitCode::SUCCESS);
            }
            RecipientsAction::Add { email } => {
                self.dispatch(Msg::NewEmailChanged(email));
                Msg::AddRecipientClicked
            }
            RecipientsAction::Remove { email } => Msg::RemoveRecipientClicked(email),
        };
        self.dispatch(clicked);
        self.pump_until(|state| !state.view().settings_busy)?;

        let failed = self
            .view()
            .settings_notice
            .as_ref()
            .is_some_and(|notice| notice.is_error());
        Ok(if failed {
            ExitCode::FAILURE
        } else {
            ExitCode::SUCCESS
        })
    }

    /// Loads the recipient list, failing when the service cannot be reached.
    fn load_recipients(&mut self) -> anyhow::Result<()> {
        self.runner.engine().load_recipients();
        loop {
            let event = self
                .runner
                .engine()
                .recv()
                .ok_or_else(|| anyhow!("engine stopped unexpectedly"))?;
            match map_event(event) {
                Some(Msg::RecipientsLoadFailed { reason }) => {
                    bail!("loading recipients failed: {reason}")
                }
                Some(msg @ Msg::RecipientsLoaded(_)) => {
                    self.dispatch(msg);
                    return Ok(());
                }
                Some(other) => {
                    scanner_debug!("Ignoring {:?} while loading recipients", other);
                }
                None => {}
            }
        }
    }

    fn results(&mut self, job_id: String) -> anyhow::Result<ExitCode> {
        self.runner.engine().fetch_results(job_id);
        loop {
            match self.runner.engine().recv() {
                Some(EngineEvent::ResultsFetched { result, .. }) => {
                    let results = result.context("fetching results failed")?;
                    let view = AppViewModel {
                        results: Some(map_results(results)),
                        ..AppViewModel::default()
                    };
                    self.renderer.present(render(&view));
                    return Ok(ExitCode::SUCCESS);
                }
                Some(other) => scanner_debug!("Ignoring {:?} while fetching results", other),
                None => bail!("engine stopped unexpectedly"),
            }
        }
    }

    fn health(&mut self) -> anyhow::Result<ExitCode> {
        self.runner.engine().check_health();
        loop {
            match self.runner.engine().recv() {
                Some(EngineEvent::Health(result)) => {
                    let health = result.context("health check failed")?;
                    self.renderer.present(vec![format!(
                        "Service {}: {} active job(s), {} total",
                        health.status, health.active_jobs, health.total_jobs
                    )]);
                    return Ok(ExitCode::SUCCESS);
                }
                Some(other) => scanner_debug!("Ignoring {:?} while checking health", other),
                None => bail!("engine stopped unexpectedly"),
            }
        }
    }
}
