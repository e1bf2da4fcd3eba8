//! Test doubles for the editor's external collaborators.

use async_trait::async_trait;
use brief_editor::analytics::{AnalyticsSink, EngagementKind, SinkError};
use brief_editor::assets::{
    AssetDescriptor, ImageFile, ImageService, NotificationKind, NotificationSink,
    OptimizeOptions, ServiceError, UploadOptions,
};
use brief_editor::Clock;
use std::cell::{Cell, RefCell};

#[derive(Debug, Default)]
pub struct TestClock {
    now: Cell<u64>,
}

impl TestClock {
    pub fn at(millis: u64) -> Self {
        Self {
            now: Cell::new(millis),
        }
    }

    pub fn advance(&self, millis: u64) {
        self.now.set(self.now.get() + millis);
    }
}

impl Clock for TestClock {
    fn now_millis(&self) -> u64 {
        self.now.get()
    }
}

#[derive(Debug, Default)]
pub struct RecordingNotifier {
    pub messages: RefCell<Vec<(NotificationKind, String)>>,
}

impl RecordingNotifier {
    pub fn count(&self, kind: NotificationKind) -> usize {
        self.messages
            .borrow()
            .iter()
            .filter(|(k, _)| *k == kind)
            .count()
    }
}

impl NotificationSink for RecordingNotifier {
    fn notify(&self, kind: NotificationKind, message: &str) {
        self.messages.borrow_mut().push((kind, message.to_string()));
    }
}

/// Storage that fails uploads for the named files.
#[derive(Debug, Default)]
pub struct FakeImageService {
    pub optimize_calls: Cell<usize>,
    pub upload_calls: Cell<usize>,
    pub failing: Vec<String>,
    pub library: Vec<AssetDescriptor>,
}

impl FakeImageService {
    pub fn failing_for(names: &[&str]) -> Self {
        Self {
            failing: names.iter().map(|n| n.to_string()).collect(),
            ..Self::default()
        }
    }
}

pub fn asset(name: &str, bucket: &str) -> AssetDescriptor {
    AssetDescriptor {
        id: format!("id-{name}"),
        url: format!("https://cdn.example/{bucket}/{name}"),
        name: name.to_string(),
        size: 1024,
        content_type: "image/png".to_string(),
        bucket: bucket.to_string(),
        path: format!("{bucket}/{name}"),
        created_at: 0,
    }
}

#[async_trait(?Send)]
impl ImageService for FakeImageService {
    async fn optimize(
        &self,
        file: ImageFile,
        _options: &OptimizeOptions,
    ) -> Result<ImageFile, ServiceError> {
        self.optimize_calls.set(self.optimize_calls.get() + 1);
        Ok(file)
    }

    async fn upload(
        &self,
        file: &ImageFile,
        options: &UploadOptions,
    ) -> Result<AssetDescriptor, ServiceError> {
        self.upload_calls.set(self.upload_calls.get() + 1);
        if self.failing.contains(&file.name) {
            return Err(ServiceError::Upload("storage unavailable".to_string()));
        }
        Ok(asset(&file.name, &options.bucket))
    }

    async fn list_recent(
        &self,
        _bucket: &str,
        limit: usize,
    ) -> Result<Vec<AssetDescriptor>, ServiceError> {
        if self.library.is_empty() {
            return Err(ServiceError::List("bucket missing".to_string()));
        }
        Ok(self.library.iter().take(limit).cloned().collect())
    }
}

#[derive(Debug, Default)]
pub struct RecordingSink {
    pub views: Vec<(String, String)>,
    pub engagements: Vec<(String, EngagementKind, serde_json::Value)>,
    pub offline: bool,
}

impl RecordingSink {
    pub fn offline() -> Self {
        Self {
            offline: true,
            ..Self::default()
        }
    }

    pub fn of_kind(&self, kind: EngagementKind) -> Vec<&serde_json::Value> {
        self.engagements
            .iter()
            .filter(|(_, k, _)| *k == kind)
            .map(|(_, _, payload)| payload)
            .collect()
    }
}

impl AnalyticsSink for RecordingSink {
    fn record_view(&mut self, post_id: &str, session_id: &str) -> Result<(), SinkError> {
        if self.offline {
            return Err(SinkError::Unavailable("offline".to_string()));
        }
        self.views.push((post_id.to_string(), session_id.to_string()));
        Ok(())
    }

    fn record_engagement(
        &mut self,
        post_id: &str,
        kind: EngagementKind,
        payload: serde_json::Value,
    ) -> Result<(), SinkError> {
        if self.offline {
            return Err(SinkError::Unavailable("offline".to_string()));
        }
        self.engagements.push((post_id.to_string(), kind, payload));
        Ok(())
    }
}
