//! Transfer worker - executes one task and reports over the job's message channel

use crate::error::TransferResult;
use crate::storage::StorageTransport;
use bytes::Bytes;
use log::{debug, info};
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use super::batch::BatchId;
use super::task::{TaskKind, TransferTask};

pub(crate) enum TaskMessage {
    Started {
        id: usize,
    },
    Progress {
        id: usize,
        fraction: f64,
    },
    Finished {
        id: usize,
        result: TransferResult<TaskPayload>,
    },
}

pub(crate) enum TaskPayload {
    Downloaded(Bytes),
    Uploaded,
}

/// Run one task to completion unless the job is cancelled first.
///
/// On cancellation the in-flight request future is dropped and nothing is reported.
pub(crate) async fn run_task<S>(
    storage: Arc<S>,
    task: TransferTask,
    batch_id: Option<BatchId>,
    messages: mpsc::Sender<TaskMessage>,
    cancel: CancellationToken,
) where
    S: StorageTransport + ?Sized,
{
    let id = task.id;
    if messages.send(TaskMessage::Started { id }).await.is_err() {
        return;
    }

    let result = tokio::select! {
        _ = cancel.cancelled() => {
            debug!("transfer_task_abandoned: task={} name={}", id, task.name);
            return;
        }
        result = execute(storage.as_ref(), &task, batch_id.as_ref(), &messages) => result,
    };

    if result.is_ok() {
        info!("transfer_task_done: task={} name={}", id, task.name);
    }
    let _ = messages.send(TaskMessage::Finished { id, result }).await;
}

async fn execute<S>(
    storage: &S,
    task: &TransferTask,
    batch_id: Option<&BatchId>,
    messages: &mpsc::Sender<TaskMessage>,
) -> TransferResult<TaskPayload>
where
    S: StorageTransport + ?Sized,
{
    match &task.kind {
        TaskKind::Download { url, .. } => {
            let id = task.id;
            let report = |received: u64, total: Option<u64>| {
                if let Some(total) = total.filter(|t| *t > 0) {
                    // Lossy: a dropped report is superseded by the next one or by completion.
                    let _ = messages.try_send(TaskMessage::Progress {
                        id,
                        fraction: received as f64 / total as f64,
                    });
                }
            };
            let bytes = storage.fetch(url, &report).await?;
            Ok(TaskPayload::Downloaded(bytes))
        }
        TaskKind::Upload { asset } => {
            let batch = batch_id.map(BatchId::as_str).unwrap_or_default();
            let destination = storage.presign_upload(asset.name(), batch).await?;
            storage.put(&destination, asset.data().clone()).await?;
            Ok(TaskPayload::Uploaded)
        }
    }
}
