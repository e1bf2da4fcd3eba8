//! Image assets: validation, upload tracking and insertion into the editor.
//!
//! Flow for a selected file:
//!
//!     validate -> optimize -> upload -> insert image (src = url, alt = name)
//!
//! Validation happens synchronously in [`AssetPipeline::begin`]; a rejected file never
//! reaches the [`ImageService`] and leaves the upload list untouched. The service calls
//! run in [`AssetPipeline::run`], a future that touches no shared state, so several
//! uploads can be in flight at once. Their [`UploadOutcome`]s are folded back into the
//! [`UploadTracker`] and the editor by [`AssetPipeline::finish`].

pub mod pipeline;
pub mod service;
pub mod tracker;

pub use pipeline::{AssetPipeline, PendingUpload, UploadOutcome};
pub use service::{ImageService, NotificationKind, NotificationSink, ServiceError};
pub use tracker::{UploadEvent, UploadId, UploadProgressEntry, UploadStatus, UploadTracker};

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A file picked by the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageFile {
    pub name: String,
    pub content_type: String,
    pub data: Vec<u8>,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, content_type: impl Into<String>, data: Vec<u8>) -> Self {
        Self {
            name: name.into(),
            content_type: content_type.into(),
            data,
        }
    }

    pub fn size(&self) -> u64 {
        self.data.len() as u64
    }
}

/// An uploaded asset as reported by the storage service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AssetDescriptor {
    pub id: String,
    pub url: String,
    pub name: String,
    pub size: u64,
    pub content_type: String,
    pub bucket: String,
    pub path: String,
    /// Milliseconds since the Unix epoch.
    pub created_at: u64,
}

/// Bounds applied before upload.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OptimizeOptions {
    pub max_width: u32,
    pub max_height: u32,
    /// Encoder quality in `0.0..=1.0`.
    pub quality: f32,
}

impl Default for OptimizeOptions {
    fn default() -> Self {
        Self {
            max_width: 1920,
            max_height: 1080,
            quality: 0.8,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UploadOptions {
    pub bucket: String,
    pub max_size: u64,
    pub generate_thumbnails: bool,
}

/// Rules for accepting, uploading and listing images.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetPolicy {
    pub bucket: String,
    pub max_file_size: u64,
    pub accepted_types: Vec<String>,
    pub generate_thumbnails: bool,
    pub success_linger_ms: u64,
    pub gallery_limit: usize,
    pub optimize: OptimizeOptions,
}

impl Default for AssetPolicy {
    fn default() -> Self {
        Self {
            bucket: "blog-images".to_string(),
            max_file_size: 5 * 1024 * 1024,
            accepted_types: ["image/jpeg", "image/png", "image/webp", "image/gif"]
                .into_iter()
                .map(str::to_string)
                .collect(),
            generate_thumbnails: true,
            success_linger_ms: 2000,
            gallery_limit: 24,
            optimize: OptimizeOptions::default(),
        }
    }
}

impl AssetPolicy {
    pub fn upload_options(&self, bucket: &str) -> UploadOptions {
        UploadOptions {
            bucket: bucket.to_string(),
            max_size: self.max_file_size,
            generate_thumbnails: self.generate_thumbnails,
        }
    }

    /// Check a file against the size limit and accepted types.
    pub fn validate(&self, file: &ImageFile) -> Result<(), AssetError> {
        if file.size() > self.max_file_size {
            return Err(AssetError::TooLarge {
                name: file.name.clone(),
                size: file.size(),
                limit: self.max_file_size,
            });
        }
        let accepted = self
            .accepted_types
            .iter()
            .any(|t| t.eq_ignore_ascii_case(&file.content_type));
        if !accepted {
            return Err(AssetError::UnsupportedType {
                name: file.name.clone(),
                content_type: file.content_type.clone(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AssetError {
    #[error("{name} is {} but the limit is {}", megabytes(.size), megabytes(.limit))]
    TooLarge { name: String, size: u64, limit: u64 },

    #[error("{name} has unsupported type '{content_type}'")]
    UnsupportedType { name: String, content_type: String },
}

fn megabytes(bytes: &u64) -> String {
    let mb = *bytes as f64 / (1024.0 * 1024.0);
    if mb.fract() == 0.0 {
        format!("{mb:.0}MB")
    } else {
        format!("{mb:.1}MB")
    }
}
