//! Transfer tasks and jobs

use crate::asset::{Arch, Asset, Classifier};
use reqwest::Url;

use super::batch::BatchId;
use super::types::{JobKind, PROGRESS_BUDGET};

const FALLBACK_FILE_NAME: &str = "downloaded-file";

#[derive(Debug, Clone)]
pub enum TaskKind {
    /// Stream tag is assigned from the URL before dispatch, never from arrival order.
    Download {
        url: String,
        folder: String,
        arch: Arch,
    },
    Upload { asset: Asset },
}

/// One atomic network operation and its share of the job's progress budget.
#[derive(Debug, Clone)]
pub struct TransferTask {
    pub id: usize,
    pub name: String,
    pub weight: f64,
    pub kind: TaskKind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum JobTarget {
    Download,
    Upload(BatchId),
}

/// A batch of tasks sharing one 100-unit progress budget.
#[derive(Debug, Clone)]
pub struct TransferJob {
    target: JobTarget,
    tasks: Vec<TransferTask>,
}

impl TransferJob {
    pub fn downloads<I>(urls: I, classifier: &Classifier) -> Self
    where
        I: IntoIterator,
        I::Item: Into<String>,
    {
        let urls: Vec<String> = urls.into_iter().map(Into::into).collect();
        let weight = task_weight(urls.len());
        let tasks = urls
            .into_iter()
            .enumerate()
            .map(|(id, url)| {
                let (folder, name) = split_url_name(&url);
                let arch = classifier.classify(&name);
                TransferTask {
                    id,
                    name,
                    weight,
                    kind: TaskKind::Download { url, folder, arch },
                }
            })
            .collect();
        Self {
            target: JobTarget::Download,
            tasks,
        }
    }

    /// Upload tasks report only on completion, so progress moves in steps of `100 / n`.
    pub fn uploads(assets: Vec<Asset>, batch_id: BatchId) -> Self {
        let weight = task_weight(assets.len());
        let tasks = assets
            .into_iter()
            .enumerate()
            .map(|(id, asset)| TransferTask {
                id,
                name: asset.name().to_string(),
                weight,
                kind: TaskKind::Upload { asset },
            })
            .collect();
        Self {
            target: JobTarget::Upload(batch_id),
            tasks,
        }
    }

    pub fn kind(&self) -> JobKind {
        match self.target {
            JobTarget::Download => JobKind::Download,
            JobTarget::Upload(_) => JobKind::Upload,
        }
    }

    pub fn tasks(&self) -> &[TransferTask] {
        &self.tasks
    }

    pub fn batch_id(&self) -> Option<&BatchId> {
        match &self.target {
            JobTarget::Download => None,
            JobTarget::Upload(batch_id) => Some(batch_id),
        }
    }

    pub fn len(&self) -> usize {
        self.tasks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tasks.is_empty()
    }

    pub(crate) fn into_parts(self) -> (JobTarget, Vec<TransferTask>) {
        (self.target, self.tasks)
    }
}

fn task_weight(count: usize) -> f64 {
    if count == 0 {
        0.0
    } else {
        PROGRESS_BUDGET / count as f64
    }
}

/// `(folder, file name)` from the last two path segments of a URL, query string removed.
pub fn split_url_name(url: &str) -> (String, String) {
    let segments: Vec<String> = match Url::parse(url) {
        Ok(parsed) => parsed
            .path_segments()
            .map(|segments| segments.filter(|s| !s.is_empty()).map(decode).collect())
            .unwrap_or_default(),
        Err(_) => url
            .split(['?', '#'])
            .next()
            .unwrap_or_default()
            .split('/')
            .filter(|s| !s.is_empty())
            .map(decode)
            .collect(),
    };

    let mut rev = segments.into_iter().rev();
    let name = rev
        .next()
        .unwrap_or_else(|| FALLBACK_FILE_NAME.to_string());
    let folder = rev.next().unwrap_or_default();
    (folder, name)
}

fn decode(segment: &str) -> String {
    urlencoding::decode(segment)
        .map(|s| s.into_owned())
        .unwrap_or_else(|_| segment.to_string())
}
