//! Transfer coordinator - bounded-concurrency job execution with aggregated progress
//!
//! Each submitted job gets its own runner task, queue and progress counter. Workers never
//! touch shared state: they report over a channel and the runner applies every update.

use crate::asset::{Arch, Asset, Classifier};
use crate::config::TransferConfig;
use crate::error::{TransferError, TransferResult};
use crate::sequence::SequencePair;
use crate::storage::StorageTransport;
use bytes::Bytes;
use chrono::Utc;
use log::{debug, info, warn};
use std::collections::BTreeSet;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{mpsc, Semaphore};
use tokio_util::sync::CancellationToken;

use super::batch::BatchId;
use super::progress::ProgressTracker;
use super::task::{JobTarget, TaskKind, TransferJob, TransferTask};
use super::types::{
    JobKind, JobOutcome, TaskStatus, TaskStatusChanged, TransferEvent, UploadReport,
    EVENT_BUFFER, MESSAGE_BUFFER,
};
use super::worker::{run_task, TaskMessage, TaskPayload};

/// Starts transfer jobs against one storage collaborator.
///
/// All methods spawn onto the current Tokio runtime and panic outside of one.
pub struct TransferCoordinator<S: ?Sized> {
    storage: Arc<S>,
    config: TransferConfig,
}

impl<S> TransferCoordinator<S>
where
    S: StorageTransport + ?Sized + 'static,
{
    pub fn new(storage: Arc<S>, config: TransferConfig) -> Self {
        Self { storage, config }
    }

    /// Download every URL, `download_concurrency` at a time.
    pub fn download<I>(&self, urls: I, classifier: &Classifier) -> TransferHandle
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let job = TransferJob::downloads(urls, classifier);
        self.run(job, self.config.download_concurrency)
    }

    /// Upload every asset under a freshly generated batch id.
    pub fn upload(&self, assets: Vec<Asset>) -> TransferResult<TransferHandle> {
        let batch_id = BatchId::generate()?;
        let job = TransferJob::uploads(assets, batch_id);
        Ok(self.run(job, self.config.upload_concurrency))
    }

    /// Run `job` with at most `concurrency` tasks in flight.
    pub fn run(&self, job: TransferJob, concurrency: usize) -> TransferHandle {
        let (events_tx, events_rx) = mpsc::channel(EVENT_BUFFER);
        let cancel = CancellationToken::new();
        let kind = job.kind();
        let batch_id = job.batch_id().cloned();

        let runner = JobRunner {
            storage: self.storage.clone(),
            job,
            concurrency: concurrency.max(1),
            events: events_tx,
            cancel: cancel.clone(),
        };
        tokio::spawn(runner.run());

        TransferHandle {
            kind,
            batch_id,
            events: events_rx,
            cancel,
        }
    }
}

/// Caller side of a running job. Dropping it abandons the job.
pub struct TransferHandle {
    kind: JobKind,
    batch_id: Option<BatchId>,
    events: mpsc::Receiver<TransferEvent>,
    cancel: CancellationToken,
}

impl TransferHandle {
    pub fn kind(&self) -> JobKind {
        self.kind
    }

    pub fn batch_id(&self) -> Option<&BatchId> {
        self.batch_id.as_ref()
    }

    /// Next event, or `None` once the job has ended or been cancelled.
    pub async fn next_event(&mut self) -> Option<TransferEvent> {
        self.events.recv().await
    }

    /// Abandon in-flight transfers without waiting for them to settle.
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub async fn wait(self) -> TransferResult<JobOutcome> {
        self.wait_with(|_| {}).await
    }

    /// Drain events into `on_event` until the job ends, returning its outcome.
    pub async fn wait_with<F>(mut self, mut on_event: F) -> TransferResult<JobOutcome>
    where
        F: FnMut(&TransferEvent),
    {
        while let Some(event) = self.events.recv().await {
            on_event(&event);
            match event {
                TransferEvent::Complete(outcome) => return Ok(outcome),
                TransferEvent::Failed(error) => return Err(error),
                _ => {}
            }
        }
        Err(TransferError::Worker(
            "job ended without a terminal event".to_string(),
        ))
    }
}

impl Drop for TransferHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

/// Where a finished task's bytes go once the job completes.
struct TaskMeta {
    name: String,
    download: Option<(String, Arch)>,
}

impl From<&TransferTask> for TaskMeta {
    fn from(task: &TransferTask) -> Self {
        let download = match &task.kind {
            TaskKind::Download { folder, arch, .. } => Some((folder.clone(), *arch)),
            TaskKind::Upload { .. } => None,
        };
        Self {
            name: task.name.clone(),
            download,
        }
    }
}

struct JobRunner<S: ?Sized> {
    storage: Arc<S>,
    job: TransferJob,
    concurrency: usize,
    events: mpsc::Sender<TransferEvent>,
    cancel: CancellationToken,
}

impl<S> JobRunner<S>
where
    S: StorageTransport + ?Sized + 'static,
{
    async fn run(self) {
        let JobRunner {
            storage,
            job,
            concurrency,
            events,
            cancel,
        } = self;
        let kind = job.kind();
        let (target, tasks) = job.into_parts();
        let batch_id = match &target {
            JobTarget::Download => None,
            JobTarget::Upload(batch_id) => Some(batch_id.clone()),
        };
        let total = tasks.len();
        let started = Instant::now();
        let started_at = Utc::now().timestamp();

        info!(
            "transfer_job_start: kind={} tasks={} concurrency={} batch={}",
            kind,
            total,
            concurrency,
            batch_id.as_ref().map(BatchId::as_str).unwrap_or("-")
        );
        let _ = events.send(TransferEvent::Started { kind, tasks: total }).await;

        let mut tracker = ProgressTracker::new(tasks.iter().map(|t| t.weight).collect());
        let meta: Vec<TaskMeta> = tasks.iter().map(TaskMeta::from).collect();
        let mut payloads: Vec<Option<Bytes>> = vec![None; total];

        if total > 0 {
            let (messages_tx, mut messages) = mpsc::channel(MESSAGE_BUFFER);
            tokio::spawn(dispatch(
                storage,
                tasks,
                batch_id.clone(),
                concurrency,
                messages_tx,
                cancel.clone(),
            ));

            let mut running: BTreeSet<usize> = BTreeSet::new();
            while tracker.completed() < total {
                let message = tokio::select! {
                    _ = cancel.cancelled() => {
                        info!("transfer_job_cancelled: kind={} completed={}/{}", kind, tracker.completed(), total);
                        return;
                    }
                    message = messages.recv() => message,
                };

                match message {
                    Some(TaskMessage::Started { id }) => {
                        running.insert(id);
                        let _ = events
                            .send(status_event(&meta, id, TaskStatus::Running, None))
                            .await;
                    }
                    Some(TaskMessage::Progress { id, fraction }) => {
                        if let Some(progress) = tracker.advance(id, fraction) {
                            let _ = events.send(TransferEvent::Progress(progress)).await;
                        }
                    }
                    Some(TaskMessage::Finished { id, result: Ok(payload) }) => {
                        running.remove(&id);
                        if let TaskPayload::Downloaded(bytes) = payload {
                            payloads[id] = Some(bytes);
                        }
                        let _ = events
                            .send(status_event(&meta, id, TaskStatus::Succeeded, None))
                            .await;
                        if let Some(progress) = tracker.complete(id) {
                            let _ = events.send(TransferEvent::Progress(progress)).await;
                        }
                    }
                    Some(TaskMessage::Finished { id, result: Err(error) }) => {
                        running.remove(&id);
                        cancel.cancel();
                        warn!(
                            "transfer_task_failed: kind={} task={} name={} error={}",
                            kind, id, meta[id].name, error
                        );
                        let _ = events
                            .send(status_event(
                                &meta,
                                id,
                                TaskStatus::Failed,
                                Some(error.to_string()),
                            ))
                            .await;
                        for abandoned in running {
                            let _ = events
                                .send(status_event(&meta, abandoned, TaskStatus::Abandoned, None))
                                .await;
                        }
                        let _ = events.send(TransferEvent::Failed(error)).await;
                        return;
                    }
                    None => {
                        cancel.cancel();
                        let error = TransferError::Worker(format!(
                            "{} of {} tasks never reported",
                            total - tracker.completed(),
                            total
                        ));
                        warn!("transfer_job_failed: kind={} error={}", kind, error);
                        let _ = events.send(TransferEvent::Failed(error)).await;
                        return;
                    }
                }
            }
        }

        if let Some(progress) = tracker.finish() {
            let _ = events.send(TransferEvent::Progress(progress)).await;
        }

        let outcome = match target {
            JobTarget::Download => {
                let mut pair = SequencePair::default();
                for (task, bytes) in meta.iter().zip(payloads) {
                    if let (Some((folder, arch)), Some(bytes)) = (&task.download, bytes) {
                        pair.push(*arch, Asset::new(folder.clone(), task.name.clone(), bytes));
                    }
                }
                JobOutcome::Downloaded(pair)
            }
            JobTarget::Upload(batch_id) => JobOutcome::Uploaded(UploadReport {
                batch_id,
                files: total,
                elapsed: started.elapsed(),
                started_at,
            }),
        };

        info!(
            "transfer_job_complete: kind={} tasks={} elapsed={:.3}s",
            kind,
            total,
            started.elapsed().as_secs_f64()
        );
        let _ = events.send(TransferEvent::Complete(outcome)).await;
    }
}

fn status_event(
    meta: &[TaskMeta],
    id: usize,
    status: TaskStatus,
    error: Option<String>,
) -> TransferEvent {
    TransferEvent::Status(TaskStatusChanged {
        task_id: id,
        name: meta[id].name.clone(),
        status,
        error,
    })
}

/// Admit queued tasks as slots free up. A slot is held until the worker has reported.
async fn dispatch<S>(
    storage: Arc<S>,
    tasks: Vec<TransferTask>,
    batch_id: Option<BatchId>,
    concurrency: usize,
    messages: mpsc::Sender<TaskMessage>,
    cancel: CancellationToken,
) where
    S: StorageTransport + ?Sized + 'static,
{
    let semaphore = Arc::new(Semaphore::new(concurrency));
    for task in tasks {
        let permit = tokio::select! {
            _ = cancel.cancelled() => return,
            permit = semaphore.clone().acquire_owned() => match permit {
                Ok(permit) => permit,
                Err(_) => return,
            },
        };
        debug!("transfer_admit: task={} name={}", task.id, task.name);

        let storage = storage.clone();
        let batch_id = batch_id.clone();
        let messages = messages.clone();
        let cancel = cancel.clone();
        tokio::spawn(async move {
            let _permit = permit;
            run_task(storage, task, batch_id, messages, cancel).await;
        });
    }
}
