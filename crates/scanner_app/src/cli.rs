use std::time::Duration;

use clap::{ArgAction, Parser, Subcommand};
use log::LevelFilter;
use scanner_client::{ClientSettings, DEFAULT_BASE_URL};

use crate::platform::logging::LogDestination;

/// Request wayback security scans and follow them to completion.
#[derive(Debug, Parser)]
#[command(name = "scanner", version)]
pub struct Cli {
    /// Base URL of the Analysis Service.
    #[arg(long, env = "SCANNER_API_URL", default_value = DEFAULT_BASE_URL, global = true)]
    pub api_url: String,

    /// Status poll period in milliseconds.
    #[arg(long, env = "SCANNER_POLL_INTERVAL_MS", default_value_t = 2000, global = true)]
    pub poll_interval_ms: u64,

    /// Per-request timeout in seconds.
    #[arg(long, default_value_t = 30, global = true)]
    pub timeout_secs: u64,

    /// More log output (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log errors.
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Also write logs to ./scanner.log.
    #[arg(long, global = true)]
    pub log_file: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Submit domains for analysis and follow the job.
    Analyze {
        /// Domains, comma- or newline-separated.
        #[arg(long)]
        domains: String,
        /// Extra recipients for this scan only.
        #[arg(long, default_value = "")]
        emails: String,
        /// Do not send results to the configured recipients.
        #[arg(long)]
        no_configured_emails: bool,
        /// Return as soon as the job is accepted.
        #[arg(long, conflicts_with = "results")]
        detach: bool,
        /// Print per-domain results once the job completes.
        #[arg(long)]
        results: bool,
    },
    /// Follow a job submitted earlier.
    Watch {
        job_id: String,
        /// Print per-domain results once the job completes.
        #[arg(long)]
        results: bool,
    },
    /// Manage notification recipients.
    Recipients {
        #[command(subcommand)]
        action: RecipientsAction,
    },
    /// Print per-domain results of a finished job.
    Results { job_id: String },
    /// Check that the Analysis Service is up.
    Health,
}

#[derive(Debug, Subcommand)]
pub enum RecipientsAction {
    List,
    Add { email: String },
    Remove { email: String },
}

impl Cli {
    pub fn settings(&self) -> ClientSettings {
        ClientSettings {
            base_url: self.api_url.clone(),
            request_timeout: Duration::from_secs(self.timeout_secs),
            poll_interval: Duration::from_millis(self.poll_interval_ms.max(1)),
            ..ClientSettings::default()
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.quiet {
            return LevelFilter::Error;
        }
        match self.verbose {
            0 => LevelFilter::Warn,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }

    pub fn log_destination(&self) -> LogDestination {
        if self.log_file {
            LogDestination::Both
        } else {
            LogDestination::Terminal
        }
    }
}
