use crate::archive::{Archiver, UploadResult};
use crate::classify::{Classification, classify};
use crate::error::{ErrorKind, Result};
use crate::item::{Content, MediaItem};
use crate::plan::{DestinationPlan, plan};
use exn::ResultExt;
use hoard_storage::LocalBackend;
use hoard_transcode::AudioFormat;
use std::path::{Path, PathBuf};
use tracing::instrument;

const FALLBACK_MIME_TYPE: &str = "application/octet-stream";

/// MIME type an archived file is uploaded with: guessed from the planned file
/// name, then whatever the source declared.
pub(crate) fn upload_mime_type(file_name: &str, declared: Option<&str>) -> String {
    mime_guess::from_path(file_name)
        .first_raw()
        .or(declared)
        .unwrap_or(FALLBACK_MIME_TYPE)
        .to_string()
}

impl Archiver {
    /// Classify and archive a single item.
    pub async fn process(&self, item: MediaItem) -> Result<UploadResult> {
        let classification = classify(item.extension().as_deref(), item.mime_type.as_deref());
        self.archive_as(item, classification).await
    }

    /// Archive an item under an already decided classification.
    #[instrument(skip_all, fields(source = %item.source, classification = %classification))]
    pub async fn archive_as(&self, item: MediaItem, classification: Classification) -> Result<UploadResult> {
        let backend = self.local.backend(classification);
        let plan = plan(&item, classification, backend.root(), &self.root_folder);
        let target = Path::new(&plan.file_name);

        match plan.transcode {
            Some(format) => self.transcode_into(backend, &item, &plan, format).await?,
            None => match &item.content {
                Content::File(source) => {
                    backend.copy_from(source, target).await.or_raise(|| ErrorKind::Storage)?;
                },
                Content::Bytes(data) => backend.write(target, data).await.or_raise(|| ErrorKind::Storage)?,
            },
        }
        tracing::debug!(path = %plan.local_path.display(), "Stored local copy");

        let mime_type = upload_mime_type(&plan.file_name, item.mime_type.as_deref());
        let folder = self.folders.resolve(&plan.remote_segments).await?;
        // Uploaded from the stored copy: transcoded output lives only on disk.
        let content = backend.open(target).await.or_raise(|| ErrorKind::Storage)?;
        let file = self
            .remote
            .create_file(&plan.file_name, &folder, &mime_type, content)
            .await
            .or_raise(|| ErrorKind::Remote)?;
        tracing::info!(file = %plan.file_name, id = %file, mime_type = %mime_type, "Archived item");

        Ok(UploadResult {
            source: item.source,
            classification,
            local_path: plan.local_path,
            remote_folder: folder,
            remote_file: file,
            file_name: plan.file_name,
        })
    }

    /// Transcode an item into its planned local path. In-memory payloads are
    /// staged next to the target first, and the staged copy removed after.
    async fn transcode_into(
        &self,
        backend: &LocalBackend,
        item: &MediaItem,
        plan: &DestinationPlan,
        format: AudioFormat,
    ) -> Result<()> {
        let data = match &item.content {
            Content::File(source) => {
                return self
                    .transcoder
                    .transcode(source, &plan.local_path, format)
                    .await
                    .or_raise(|| ErrorKind::Transcode);
            },
            Content::Bytes(data) => data,
        };
        let extension = item.extension().unwrap_or_default();
        let staged = PathBuf::from(format!("{}.{extension}", plan.file_name));
        backend.write(&staged, data).await.or_raise(|| ErrorKind::Storage)?;
        let source = backend.absolute_path(&staged).or_raise(|| ErrorKind::Storage)?;
        let result = self.transcoder.transcode(&source, &plan.local_path, format).await.or_raise(|| ErrorKind::Transcode);
        if let Err(e) = backend.delete(&staged).await {
            tracing::warn!(path = %source.display(), error = ?e, "Unable to remove staged file");
        }
        result
    }
}
