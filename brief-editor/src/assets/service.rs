//! External services the asset flow depends on.

use super::{AssetDescriptor, ImageFile, OptimizeOptions, UploadOptions};
use async_trait::async_trait;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ServiceError {
    #[error("optimization failed: {0}")]
    Optimize(String),

    #[error("upload failed: {0}")]
    Upload(String),

    #[error("listing failed: {0}")]
    List(String),
}

/// Image processing and object storage.
///
/// Futures are not `Send`: the editor runs on a single-threaded executor.
#[async_trait(?Send)]
pub trait ImageService {
    /// Downscale and recompress an image within `options`.
    async fn optimize(
        &self,
        file: ImageFile,
        options: &OptimizeOptions,
    ) -> Result<ImageFile, ServiceError>;

    async fn upload(
        &self,
        file: &ImageFile,
        options: &UploadOptions,
    ) -> Result<AssetDescriptor, ServiceError>;

    /// Most recent uploads in `bucket`, newest first.
    async fn list_recent(
        &self,
        bucket: &str,
        limit: usize,
    ) -> Result<Vec<AssetDescriptor>, ServiceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NotificationKind {
    Success,
    Error,
    Info,
}

/// User-facing notifications (toasts).
pub trait NotificationSink {
    fn notify(&self, kind: NotificationKind, message: &str);
}
