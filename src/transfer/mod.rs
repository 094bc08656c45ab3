//! Asset transfer pipeline
//!
//! Provides batch upload and download with:
//! - A fixed cap on in-flight tasks with continuous admission
//! - One weighted, monotonic progress counter per job
//! - All-or-nothing failure: the first failed task aborts the job
//! - Teardown by dropping the job handle

mod batch;
mod coordinator;
mod progress;
mod task;
mod types;
mod worker;

pub use batch::BatchId;
pub use coordinator::{TransferCoordinator, TransferHandle};
pub use progress::ProgressTracker;
pub use task::{split_url_name, TaskKind, TransferJob, TransferTask};
pub use types::{
    JobKind, JobOutcome, TaskStatus, TaskStatusChanged, TransferEvent, TransferProgress,
    UploadReport, PROGRESS_BUDGET,
};
