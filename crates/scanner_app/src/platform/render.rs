use std::io::{self, Write};

use chrono::{DateTime, NaiveDateTime, Utc};
use scanner_core::{AppViewModel, JobView, Notice, ResultsSummary};

const PROGRESS_WIDTH: usize = 20;

/// Renders the submission surface of a view model as terminal lines.
pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if let Some(error) = &view.field_error {
        lines.push(format!("[error] {error}"));
    }
    if let Some(notice) = &view.submission_notice {
        lines.push(notice_line(notice));
    }
    if let Some(accepted) = &view.accepted {
        lines.push(format!(
            "Job {}: {} domain(s), {} recipient(s)",
            accepted.job_id, accepted.domains_count, accepted.recipients_count
        ));
    }
    if let Some(job) = &view.job {
        render_job(job, &mut lines);
    }
    if let Some(results) = &view.results {
        render_results(results, &mut lines);
    }
    lines
}

/// Renders the settings surface: the recipient list and its notice.
pub fn render_recipients(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();
    if view.recipients.is_empty() {
        lines.push("No recipients configured".to_string());
    } else {
        lines.push(format!("Recipients ({}):", view.recipients.len()));
        lines.extend(view.recipients.iter().map(|email| format!("  {email}")));
    }
    if let Some(notice) = &view.settings_notice {
        lines.push(notice_line(notice));
    }
    lines
}

fn notice_line(notice: &Notice) -> String {
    let tag = if notice.is_error() { "error" } else { "ok" };
    format!("[{tag}] {}", notice.text)
}

fn render_job(job: &JobView, lines: &mut Vec<String>) {
    lines.push(format!("Status: {}", job.status_label));
    if job.show_progress {
        lines.push(progress_bar(job.progress));
    }
    lines.push(format!(
        "Domains: {}  Results: {}",
        job.domains_count, job.results_count
    ));
    if job.results_emailed {
        let mut line = "Results emailed".to_string();
        if let Some(elapsed) = job
            .completed_at
            .as_deref()
            .and_then(|completed| elapsed(&job.started_at, completed))
        {
            line.push_str(&format!(" after {elapsed}"));
        }
        lines.push(line);
    }
    if let Some(error) = &job.error_banner {
        lines.push(format!("[error] {error}"));
    }
}

fn render_results(results: &ResultsSummary, lines: &mut Vec<String>) {
    lines.push(format!("Results for {}:", results.job_id));
    for result in &results.results {
        match &result.error {
            Some(error) => lines.push(format!("  {}  error: {error}", result.domain)),
            None => lines.push(format!(
                "  {}  {} finding(s)",
                result.domain, result.finding_count
            )),
        }
    }
}

fn progress_bar(progress: u8) -> String {
    let filled = usize::from(progress.min(100)) * PROGRESS_WIDTH / 100;
    format!(
        "[{}{}] {progress}%",
        "#".repeat(filled),
        ".".repeat(PROGRESS_WIDTH - filled)
    )
}

/// Server timestamps are ISO-8601, with or without an offset.
fn parse_timestamp(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(text) {
        return Some(parsed.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(text, "%Y-%m-%dT%H:%M:%S%.f")
        .ok()
        .map(|naive| naive.and_utc())
}

fn elapsed(started_at: &str, completed_at: &str) -> Option<String> {
    let started = parse_timestamp(started_at)?;
    let completed = parse_timestamp(completed_at)?;
    let seconds = (completed - started).num_seconds();
    if seconds < 0 {
        return None;
    }
    Some(match seconds {
        0..=59 => format!("{seconds}s"),
        60..=3599 => format!("{}m {}s", seconds / 60, seconds % 60),
        _ => format!("{}h {}m", seconds / 3600, (seconds % 3600) / 60),
    })
}

/// Prints frames to stdout, skipping lines already shown in the same place.
#[derive(Default)]
pub struct Renderer {
    last_frame: Vec<String>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn present(&mut self, frame: Vec<String>) {
        let changed = changed_lines(&self.last_frame, &frame);
        if !changed.is_empty() {
            let mut stdout = io::stdout().lock();
            for line in changed {
                let _ = writeln!(stdout, "{line}");
            }
            let _ = stdout.flush();
        }
        self.last_frame = frame;
    }
}

fn changed_lines<'a>(previous: &[String], frame: &'a [String]) -> Vec<&'a str> {
    frame
        .iter()
        .enumerate()
        .filter(|(index, line)| previous.get(*index) != Some(*line))
        .map(|(_, line)| line.as_str())
        .collect()
}
