//! Upload and packaging of rendered variants.
//!
//! Each variant is uploaded as soon as it is rendered. Once the loop ends the
//! uploaded variants are fetched back by URL, written into a deflate zip as
//! `split_0.mp4 .. split_{n-1}.mp4` and the zip is uploaded itself.

use std::io::Write;
use std::path::Path;

use metrics::counter;
use splitgen_models::naming::{archive_entry_name, ArchiveName, VariantName};
use splitgen_models::{ArchiveArtifact, VariantSet};
use splitgen_storage::{BlobStore, CONTENT_TYPE_MP4, CONTENT_TYPE_ZIP};
use tracing::{info, warn};
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::scratch::{remove_local, ScratchDir};

/// Result of uploading one variant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantUpload {
    pub object_key: String,
    pub url: Option<String>,
}

pub struct Packager<'a> {
    store: &'a dyn BlobStore,
    config: &'a WorkerConfig,
    scratch: &'a ScratchDir,
}

impl<'a> Packager<'a> {
    pub fn new(
        store: &'a dyn BlobStore,
        config: &'a WorkerConfig,
        scratch: &'a ScratchDir,
    ) -> Self {
        Self {
            store,
            config,
            scratch,
        }
    }

    /// Upload a rendered variant and delete the local file.
    ///
    /// A failed upload is logged and reported as a missing URL.
    pub async fn upload_variant(&self, local: &Path, name: &VariantName) -> VariantUpload {
        let object_key = name.object_key(&self.config.splits_prefix);

        let url = match self.store.upload_file(local, &object_key, CONTENT_TYPE_MP4).await {
            Ok(url) => {
                counter!("splitgen_variants_total", "status" => "rendered").increment(1);
                Some(url)
            }
            Err(e) => {
                warn!(key = %object_key, "Variant upload failed: {}", e);
                counter!("splitgen_variants_total", "status" => "upload_failed").increment(1);
                None
            }
        };

        remove_local(local).await;
        VariantUpload { object_key, url }
    }

    /// Bundle every uploaded variant into a zip and upload it.
    ///
    /// Variants are fetched back one at a time and written straight into the
    /// archive. Those that cannot be fetched are skipped; entry numbering
    /// stays dense over the ones that made it in.
    pub async fn package(&self, variants: &VariantSet) -> WorkerResult<ArchiveArtifact> {
        let name = ArchiveName::generate();
        let local = self.scratch.file(&name.file_name());

        let path = local.clone();
        let mut zip = blocking(move || Ok(ZipWriter::new(std::fs::File::create(&path)?))).await?;
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        let mut entry_names = Vec::with_capacity(variants.len());
        for url in variants.uploaded_urls() {
            let bytes = match self.store.get_object_by_url(url).await {
                Ok(bytes) => bytes,
                Err(e) => {
                    warn!("Skipping {} in archive: {}", url, e);
                    continue;
                }
            };

            let entry = archive_entry_name(entry_names.len());
            let entry_name = entry.clone();
            zip = blocking(move || {
                let mut zip = zip;
                zip.start_file(entry_name, options)?;
                zip.write_all(&bytes)?;
                Ok(zip)
            })
            .await?;
            entry_names.push(entry);
        }

        blocking(move || {
            zip.finish()?;
            Ok(())
        })
        .await?;

        let object_key = name.object_key(&self.config.archive_prefix);
        let url = match self.store.upload_file(&local, &object_key, CONTENT_TYPE_ZIP).await {
            Ok(url) => {
                counter!("splitgen_archives_total", "status" => "uploaded").increment(1);
                info!(key = %object_key, entries = entry_names.len(), "Uploaded archive");
                Some(url)
            }
            Err(e) => {
                warn!(key = %object_key, "Archive upload failed: {}", e);
                counter!("splitgen_archives_total", "status" => "upload_failed").increment(1);
                None
            }
        };

        remove_local(&local).await;

        Ok(ArchiveArtifact {
            object_key,
            url,
            entry_names,
        })
    }
}

/// Run synchronous zip I/O off the async workers.
async fn blocking<T, F>(f: F) -> WorkerResult<T>
where
    F: FnOnce() -> WorkerResult<T> + Send + 'static,
    T: Send + 'static,
{
    tokio::task::spawn_blocking(f)
        .await
        .map_err(|e| WorkerError::archive(format!("archive task failed: {}", e)))?
}
