//! Upload progress, keyed by upload id.

use serde::Serialize;

/// Identity of one upload attempt. Two uploads of the same file get different ids.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct UploadId(u64);

impl std::fmt::Display for UploadId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "upload-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadStatus {
    Uploading,
    Success,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct UploadProgressEntry {
    pub id: UploadId,
    pub file_name: String,
    pub size: u64,
    /// Percent complete.
    pub progress: u8,
    pub status: UploadStatus,
    pub error: Option<String>,
    #[serde(skip)]
    finished_at: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadEvent {
    Started {
        id: UploadId,
        file_name: String,
        size: u64,
    },
    Progress {
        id: UploadId,
        percent: u8,
    },
    Succeeded {
        id: UploadId,
        at: u64,
    },
    Failed {
        id: UploadId,
        error: String,
    },
}

/// The upload list shown under the editor.
#[derive(Debug, Clone, Default)]
pub struct UploadTracker {
    entries: Vec<UploadProgressEntry>,
    next_id: u64,
    success_linger_ms: u64,
}

impl UploadTracker {
    pub fn new(success_linger_ms: u64) -> Self {
        Self {
            entries: Vec::new(),
            next_id: 0,
            success_linger_ms,
        }
    }

    /// Reserve a fresh id.
    pub fn next_id(&mut self) -> UploadId {
        self.next_id += 1;
        UploadId(self.next_id)
    }

    pub fn entries(&self) -> &[UploadProgressEntry] {
        &self.entries
    }

    pub fn get(&self, id: UploadId) -> Option<&UploadProgressEntry> {
        self.entries.iter().find(|entry| entry.id == id)
    }

    pub fn is_uploading(&self) -> bool {
        self.entries
            .iter()
            .any(|entry| entry.status == UploadStatus::Uploading)
    }

    pub fn apply(&mut self, event: UploadEvent) {
        match event {
            UploadEvent::Started {
                id,
                file_name,
                size,
            } => {
                self.entries.retain(|entry| entry.id != id);
                self.entries.push(UploadProgressEntry {
                    id,
                    file_name,
                    size,
                    progress: 0,
                    status: UploadStatus::Uploading,
                    error: None,
                    finished_at: None,
                });
            }
            UploadEvent::Progress { id, percent } => {
                if let Some(entry) = self.entry_mut(id) {
                    entry.progress = percent.min(100);
                }
            }
            UploadEvent::Succeeded { id, at } => {
                if let Some(entry) = self.entry_mut(id) {
                    entry.progress = 100;
                    entry.status = UploadStatus::Success;
                    entry.finished_at = Some(at);
                }
            }
            UploadEvent::Failed { id, error } => {
                if let Some(entry) = self.entry_mut(id) {
                    entry.status = UploadStatus::Error;
                    entry.error = Some(error);
                }
            }
        }
    }

    fn entry_mut(&mut self, id: UploadId) -> Option<&mut UploadProgressEntry> {
        let entry = self.entries.iter_mut().find(|entry| entry.id == id);
        if entry.is_none() {
            tracing::trace!(%id, "event for unknown upload ignored");
        }
        entry
    }

    /// Drop succeeded entries whose linger delay has passed. Failed entries stay.
    pub fn prune(&mut self, now: u64) {
        let linger = self.success_linger_ms;
        self.entries.retain(|entry| match (entry.status, entry.finished_at) {
            (UploadStatus::Success, Some(at)) => now.saturating_sub(at) < linger,
            _ => true,
        });
    }
}
