//! File and object naming.
//!
//! Every generated name embeds a fresh UUID v4 so concurrent invocations
//! never collide in the bucket.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::encoding::VARIANT_EXTENSION;

/// Default key prefix for uploaded variants.
pub const DEFAULT_SPLITS_PREFIX: &str = "splits";
/// Default key prefix for uploaded archives.
pub const DEFAULT_ARCHIVE_PREFIX: &str = "zip";

const TIMESTAMP_FORMAT: &str = "%Y-%m-%d-%H-%M-%S";

/// Name of one rendered variant: `<timestamp>-<uuid>.mp4`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariantName {
    stem: String,
}

impl VariantName {
    /// Fresh name for the current time.
    pub fn generate() -> Self {
        Self::at(Utc::now(), Uuid::new_v4())
    }

    pub fn at(time: DateTime<Utc>, id: Uuid) -> Self {
        Self {
            stem: format!("{}-{}", time.format(TIMESTAMP_FORMAT), id),
        }
    }

    /// Local scratch file name.
    pub fn file_name(&self) -> String {
        format!("{}.{}", self.stem, VARIANT_EXTENSION)
    }

    /// Storage key under the given prefix.
    pub fn object_key(&self, prefix: &str) -> String {
        join_key(prefix, &self.file_name())
    }
}

/// Name of one request's archive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArchiveName {
    id: Uuid,
}

impl ArchiveName {
    pub fn generate() -> Self {
        Self { id: Uuid::new_v4() }
    }

    pub fn with_id(id: Uuid) -> Self {
        Self { id }
    }

    /// Local scratch file name: `split_variations_<uuid>.zip`.
    pub fn file_name(&self) -> String {
        format!("split_variations_{}.zip", self.id)
    }

    /// Storage key: `<prefix>/<uuid>.zip`.
    pub fn object_key(&self, prefix: &str) -> String {
        join_key(prefix, &format!("{}.zip", self.id))
    }
}

/// Archive entry name for the variant at `position`.
pub fn archive_entry_name(position: usize) -> String {
    format!("split_{}.{}", position, VARIANT_EXTENSION)
}

/// Scratch file name for a downloaded input, keeping its extension.
pub fn input_file_name(extension: Option<&str>) -> String {
    match extension.filter(|e| !e.is_empty()) {
        Some(ext) => format!("{}.{}", Uuid::new_v4(), ext),
        None => Uuid::new_v4().to_string(),
    }
}

fn join_key(prefix: &str, name: &str) -> String {
    let prefix = prefix.trim_matches('/');
    if prefix.is_empty() {
        name.to_string()
    } else {
        format!("{}/{}", prefix, name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_variant_name_layout() {
        let time = Utc.with_ymd_and_hms(2024, 3, 9, 14, 5, 7).unwrap();
        let id = Uuid::nil();
        let name = VariantName::at(time, id);

        assert_eq!(
            name.file_name(),
            "2024-03-09-14-05-07-00000000-0000-0000-0000-000000000000.mp4"
        );
        assert_eq!(
            name.object_key("splits"),
            "splits/2024-03-09-14-05-07-00000000-0000-0000-0000-000000000000.mp4"
        );
    }

    #[test]
    fn test_generated_names_are_unique() {
        assert_ne!(VariantName::generate(), VariantName::generate());
        assert_ne!(ArchiveName::generate(), ArchiveName::generate());
    }

    #[test]
    fn test_archive_names() {
        let name = ArchiveName::with_id(Uuid::nil());
        assert_eq!(
            name.file_name(),
            "split_variations_00000000-0000-0000-0000-000000000000.zip"
        );
        assert_eq!(
            name.object_key("/zip/"),
            "zip/00000000-0000-0000-0000-000000000000.zip"
        );
        assert_eq!(archive_entry_name(0), "split_0.mp4");
        assert_eq!(archive_entry_name(12), "split_12.mp4");
    }

    #[test]
    fn test_input_file_name_extension() {
        assert!(input_file_name(Some("mov")).ends_with(".mov"));
        assert!(!input_file_name(Some("")).contains('.'));
        assert!(!input_file_name(None).contains('.'));
    }
}
