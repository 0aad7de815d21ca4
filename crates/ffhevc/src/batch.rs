use std::path::{Path, PathBuf};
use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use log::{error, info, warn};
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use crate::ffmpeg;
use crate::job::TranscodeJob;

/// What to do when one file in a batch fails
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FailurePolicy {
    /// Stop at the first failure; remaining files are recorded as skipped
    #[default]
    FailFast,
    Continue,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum JobStatus {
    Succeeded,
    Failed,
    Skipped,
}

/// Record of one file in a batch
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct JobOutcome {
    pub id: String,
    pub input: PathBuf,
    pub output: PathBuf,
    pub status: JobStatus,
    pub reason: Option<String>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl JobOutcome {
    fn new(input: PathBuf, output: PathBuf, status: JobStatus) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            input,
            output,
            status,
            reason: None,
            started_at: None,
            finished_at: None,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BatchReport {
    pub outcomes: Vec<JobOutcome>,
}

impl BatchReport {
    pub fn count(&self, status: JobStatus) -> usize {
        self.outcomes.iter().filter(|o| o.status == status).count()
    }

    pub fn is_success(&self) -> bool {
        self.count(JobStatus::Failed) == 0
    }

    pub fn first_failure(&self) -> Option<&JobOutcome> {
        self.outcomes.iter().find(|o| o.status == JobStatus::Failed)
    }

    /// Write the report as pretty JSON
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)
            .context("Failed to serialize batch report")?;
        std::fs::write(path, json)
            .with_context(|| format!("Failed to write batch report: {}", path.display()))?;
        Ok(())
    }
}

/// Transcode `inputs` one after another using `template` for every setting
/// except the input path.
///
/// Every input gets an outcome in the report, in input order.
pub async fn run_batch(template: &TranscodeJob, inputs: &[PathBuf], policy: FailurePolicy) -> BatchReport {
    let mut job = template.clone();
    let mut report = BatchReport::default();
    let mut aborted = false;

    info!("Starting batch of {} file(s)", inputs.len());

    for (idx, input) in inputs.iter().enumerate() {
        job.set_input(input);

        if aborted {
            let mut outcome = JobOutcome::new(input.clone(), job.output_path(), JobStatus::Skipped);
            outcome.reason = Some("batch aborted after earlier failure".to_string());
            report.outcomes.push(outcome);
            continue;
        }

        info!("[{}/{}] {}", idx + 1, inputs.len(), input.display());
        let mut outcome = JobOutcome::new(input.clone(), job.output_path(), JobStatus::Succeeded);
        outcome.started_at = Some(Utc::now());

        match ffmpeg::run(&job).await {
            Ok(summary) => {
                outcome.output = summary.output;
            }
            Err(e) => {
                error!("Failed to transcode {}: {}", input.display(), e);
                outcome.status = JobStatus::Failed;
                outcome.reason = Some(e.to_string());
                if policy == FailurePolicy::FailFast {
                    aborted = true;
                }
            }
        }

        outcome.finished_at = Some(Utc::now());
        report.outcomes.push(outcome);
    }

    if aborted {
        warn!(
            "Batch aborted: {} file(s) not attempted",
            report.count(JobStatus::Skipped)
        );
    }

    info!(
        "Batch complete: {} succeeded, {} failed, {} skipped",
        report.count(JobStatus::Succeeded),
        report.count(JobStatus::Failed),
        report.count(JobStatus::Skipped)
    );

    report
}
