//! The upload flow from picked file to inserted image.

use super::service::{ImageService, NotificationKind, NotificationSink, ServiceError};
use super::tracker::{UploadEvent, UploadId, UploadTracker};
use super::{AssetDescriptor, AssetError, AssetPolicy, ImageFile};
use crate::clock::Clock;
use crate::editor::RichTextEditor;
use crate::schema::ImageAttrs;
use futures::future::join_all;

/// A validated file registered with the tracker, ready for [`AssetPipeline::run`].
#[derive(Debug, Clone)]
pub struct PendingUpload {
    pub id: UploadId,
    file: ImageFile,
    bucket: String,
}

/// Result of one upload, fed back through [`AssetPipeline::finish`].
#[derive(Debug, Clone)]
pub struct UploadOutcome {
    pub id: UploadId,
    pub file_name: String,
    pub result: Result<AssetDescriptor, ServiceError>,
}

pub struct AssetPipeline<S, N> {
    service: S,
    notifier: N,
    policy: AssetPolicy,
}

impl<S: ImageService, N: NotificationSink> AssetPipeline<S, N> {
    pub fn new(service: S, notifier: N, policy: AssetPolicy) -> Self {
        Self {
            service,
            notifier,
            policy,
        }
    }

    pub fn policy(&self) -> &AssetPolicy {
        &self.policy
    }

    pub fn service(&self) -> &S {
        &self.service
    }

    pub fn notifier(&self) -> &N {
        &self.notifier
    }

    /// Validate `file` and register it as uploading.
    ///
    /// `bucket` overrides the policy's bucket, as the editor's `asset_bucket` prop does.
    /// A rejected file is reported to the user and creates no tracker entry.
    pub fn begin(
        &self,
        tracker: &mut UploadTracker,
        file: ImageFile,
        bucket: Option<&str>,
    ) -> Result<PendingUpload, AssetError> {
        if let Err(err) = self.policy.validate(&file) {
            tracing::debug!(file = %file.name, error = %err, "image rejected");
            self.notifier.notify(NotificationKind::Error, &err.to_string());
            return Err(err);
        }

        let id = tracker.next_id();
        tracker.apply(UploadEvent::Started {
            id,
            file_name: file.name.clone(),
            size: file.size(),
        });
        Ok(PendingUpload {
            id,
            file,
            bucket: bucket.unwrap_or(&self.policy.bucket).to_string(),
        })
    }

    /// Optimize and upload. Touches no shared state; nothing is retried.
    pub async fn run(&self, pending: PendingUpload) -> UploadOutcome {
        let PendingUpload { id, file, bucket } = pending;
        let file_name = file.name.clone();
        let result = async {
            let optimized = self.service.optimize(file, &self.policy.optimize).await?;
            self.service
                .upload(&optimized, &self.policy.upload_options(&bucket))
                .await
        }
        .await;
        UploadOutcome {
            id,
            file_name,
            result,
        }
    }

    /// Run several uploads concurrently. Outcomes come back in input order.
    pub async fn run_all(&self, pending: Vec<PendingUpload>) -> Vec<UploadOutcome> {
        join_all(pending.into_iter().map(|upload| self.run(upload))).await
    }

    /// Fold an outcome into the tracker and, on success, insert the image.
    ///
    /// Returns true when the image landed in the document. Success is only announced
    /// for an image that was inserted. An editor that was unmounted
    /// in the meantime silently drops the image.
    pub fn finish(
        &self,
        tracker: &mut UploadTracker,
        editor: &mut RichTextEditor,
        outcome: UploadOutcome,
        now: u64,
    ) -> bool {
        let UploadOutcome {
            id,
            file_name,
            result,
        } = outcome;
        if !editor.is_mounted() {
            tracing::debug!(%id, file = %file_name, "editor unmounted, discarding upload outcome");
            let event = match result {
                Ok(_) => UploadEvent::Succeeded { id, at: now },
                Err(err) => UploadEvent::Failed {
                    id,
                    error: err.to_string(),
                },
            };
            tracker.apply(event);
            return false;
        }
        match result {
            Ok(asset) => {
                tracker.apply(UploadEvent::Succeeded { id, at: now });
                let inserted = editor.insert_image(image_attrs(&asset));
                tracing::debug!(%id, url = %asset.url, inserted, "upload finished");
                if inserted {
                    self.notifier
                        .notify(NotificationKind::Success, "Image uploaded successfully");
                } else {
                    self.notifier.notify(
                        NotificationKind::Info,
                        &format!("{file_name} was uploaded but could not be inserted"),
                    );
                }
                inserted
            }
            Err(err) => {
                tracing::warn!(%id, file = %file_name, error = %err, "upload failed");
                tracker.apply(UploadEvent::Failed {
                    id,
                    error: err.to_string(),
                });
                self.notifier.notify(
                    NotificationKind::Error,
                    &format!("Failed to upload {file_name}: {err}"),
                );
                false
            }
        }
    }

    /// Validate, upload and insert one file.
    pub async fn upload(
        &self,
        tracker: &mut UploadTracker,
        editor: &mut RichTextEditor,
        file: ImageFile,
        clock: &impl Clock,
    ) -> Result<bool, AssetError> {
        let pending = self.begin(tracker, file, editor.asset_bucket())?;
        let outcome = self.run(pending).await;
        Ok(self.finish(tracker, editor, outcome, clock.now_millis()))
    }

    /// Recent uploads for the gallery. Failures are reported and yield an empty list.
    pub async fn recent_assets(
        &self,
        bucket: Option<&str>,
        limit: Option<usize>,
    ) -> Vec<AssetDescriptor> {
        let bucket = bucket.unwrap_or(&self.policy.bucket);
        let limit = limit.unwrap_or(self.policy.gallery_limit);
        match self.service.list_recent(bucket, limit).await {
            Ok(assets) => assets,
            Err(err) => {
                tracing::warn!(bucket, error = %err, "could not list assets");
                self.notifier
                    .notify(NotificationKind::Error, "Failed to load images");
                Vec::new()
            }
        }
    }

    /// Insert an already uploaded asset.
    pub fn insert_existing(&self, editor: &mut RichTextEditor, asset: &AssetDescriptor) -> bool {
        editor.insert_image(image_attrs(asset))
    }
}

fn image_attrs(asset: &AssetDescriptor) -> ImageAttrs {
    ImageAttrs {
        src: asset.url.clone(),
        alt: asset.name.clone(),
        title: None,
    }
}
