//! Input resolution.
//!
//! Request paths are either local files or public URLs of objects in the
//! configured bucket. URLs are fetched into the scratch directory first.

use std::path::{Path, PathBuf};

use splitgen_models::naming::input_file_name;
use splitgen_storage::{is_object_url, key_from_url, BlobStore};
use tracing::info;

use crate::error::{WorkerError, WorkerResult};
use crate::scratch::ScratchDir;

/// A request input available on local disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LocalInput {
    pub path: PathBuf,
    /// Whether the file was fetched from storage
    pub fetched: bool,
}

/// Make `location` available locally.
///
/// Fetch failures are decode errors: the source cannot be read.
pub async fn resolve_input(
    location: &str,
    store: &dyn BlobStore,
    scratch: &ScratchDir,
) -> WorkerResult<LocalInput> {
    if !is_object_url(location) {
        return Ok(LocalInput {
            path: PathBuf::from(location),
            fetched: false,
        });
    }

    let key = key_from_url(location)
        .map_err(|e| WorkerError::decode(format!("{}: {}", location, e)))?;
    let extension = Path::new(&key).extension().and_then(|e| e.to_str());
    let path = scratch.file(&input_file_name(extension));

    store
        .download_file(&key, &path)
        .await
        .map_err(|e| WorkerError::decode(format!("failed to fetch {}: {}", location, e)))?;

    info!(key = %key, "Fetched input to {}", path.display());
    Ok(LocalInput {
        path,
        fetched: true,
    })
}
