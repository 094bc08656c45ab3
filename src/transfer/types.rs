//! Transfer event types and status definitions

use crate::error::TransferError;
use crate::sequence::SequencePair;
use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::batch::BatchId;

/// Upper bound of the shared progress budget
pub const PROGRESS_BUDGET: f64 = 100.0;

/// Buffered events between a running job and its handle
pub(crate) const EVENT_BUFFER: usize = 64;

/// Buffered messages from workers to the job runner
pub(crate) const MESSAGE_BUFFER: usize = 64;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum JobKind {
    #[serde(rename = "download")]
    Download,
    #[serde(rename = "upload")]
    Upload,
}

impl std::fmt::Display for JobKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            JobKind::Download => write!(f, "download"),
            JobKind::Upload => write!(f, "upload"),
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum TaskStatus {
    #[serde(rename = "running")]
    Running,
    #[serde(rename = "succeeded")]
    Succeeded,
    #[serde(rename = "failed")]
    Failed,
    /// Still in flight when the job failed or was torn down.
    #[serde(rename = "abandoned")]
    Abandoned,
}

impl std::fmt::Display for TaskStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TaskStatus::Running => write!(f, "running"),
            TaskStatus::Succeeded => write!(f, "succeeded"),
            TaskStatus::Failed => write!(f, "failed"),
            TaskStatus::Abandoned => write!(f, "abandoned"),
        }
    }
}

/// Per-task status change payload
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct TaskStatusChanged {
    pub task_id: usize,
    pub name: String,
    pub status: TaskStatus,
    pub error: Option<String>,
}

/// Aggregated job progress payload
#[derive(Debug, Clone, Copy, Serialize, PartialEq)]
pub struct TransferProgress {
    /// Non-decreasing within one job, in `[0, 100]`.
    pub percent: f64,
    pub completed: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct UploadReport {
    pub batch_id: BatchId,
    pub files: usize,
    #[serde(rename = "time_elapsed", serialize_with = "serialize_secs")]
    pub elapsed: Duration,
    /// Unix timestamp (seconds) of job start
    pub started_at: i64,
}

impl UploadReport {
    pub fn elapsed_secs(&self) -> f64 {
        self.elapsed.as_secs_f64()
    }
}

fn serialize_secs<S: serde::Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(value.as_secs_f64())
}

#[derive(Debug, Clone, PartialEq)]
pub enum JobOutcome {
    /// Downloaded meshes split by stream, in the order the URLs were submitted.
    Downloaded(SequencePair),
    Uploaded(UploadReport),
}

/// Everything a job reports to its handle.
///
/// A job emits `Started` first, then any number of `Status` and `Progress` events, and
/// ends with exactly one of `Complete` or `Failed`.
#[derive(Debug)]
pub enum TransferEvent {
    Started { kind: JobKind, tasks: usize },
    Status(TaskStatusChanged),
    Progress(TransferProgress),
    Complete(JobOutcome),
    Failed(TransferError),
}

impl TransferEvent {
    pub fn is_terminal(&self) -> bool {
        matches!(self, TransferEvent::Complete(_) | TransferEvent::Failed(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn task_status_display_matches_serialized_names() {
        for status in [
            TaskStatus::Running,
            TaskStatus::Succeeded,
            TaskStatus::Failed,
            TaskStatus::Abandoned,
        ] {
            let json = serde_json::to_string(&status).unwrap();
            assert_eq!(json, format!("\"{}\"", status));
        }
    }

    #[test]
    fn upload_report_serializes_elapsed_as_seconds() {
        let report = UploadReport {
            batch_id: BatchId::parse("aB3xZ").unwrap(),
            files: 10,
            elapsed: Duration::from_millis(2500),
            started_at: 1_700_000_000,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["batch_id"], "aB3xZ");
        assert_eq!(json["time_elapsed"], 2.5);
    }
}
