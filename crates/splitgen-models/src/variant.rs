//! Variant and archive records.

use serde::{Deserialize, Serialize};

/// One generated composite.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variant {
    /// Position in the request loop (zero-based)
    pub index: u32,
    /// Start of the secondary subclip in seconds
    pub start_offset_secs: f64,
    /// Duration in seconds (equals the primary track duration)
    pub duration_secs: f64,
    /// Storage key the variant was uploaded under
    pub object_key: String,
    /// Public URL, `None` when the upload failed
    pub url: Option<String>,
}

impl Variant {
    pub fn is_uploaded(&self) -> bool {
        self.url.is_some()
    }

    /// End of the secondary subclip in seconds.
    pub fn end_offset_secs(&self) -> f64 {
        self.start_offset_secs + self.duration_secs
    }
}

/// Ordered, append-only collection of variants for one request.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VariantSet {
    variants: Vec<Variant>,
}

impl VariantSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, variant: Variant) {
        self.variants.push(variant);
    }

    pub fn len(&self) -> usize {
        self.variants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.variants.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Variant> {
        self.variants.iter()
    }

    /// URLs of uploaded variants, in insertion order.
    pub fn uploaded_urls(&self) -> impl Iterator<Item = &str> {
        self.variants.iter().filter_map(|v| v.url.as_deref())
    }

    pub fn uploaded_count(&self) -> usize {
        self.variants.iter().filter(|v| v.is_uploaded()).count()
    }
}

impl<'a> IntoIterator for &'a VariantSet {
    type Item = &'a Variant;
    type IntoIter = std::slice::Iter<'a, Variant>;

    fn into_iter(self) -> Self::IntoIter {
        self.variants.iter()
    }
}

/// The uploaded zip bundle of all variants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArchiveArtifact {
    /// Storage key of the archive
    pub object_key: String,
    /// Public URL, `None` when the upload failed
    pub url: Option<String>,
    /// Entry names written into the archive, in order
    pub entry_names: Vec<String>,
}

/// Result of one request.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitOutcome {
    /// Variants requested by the caller
    pub requested: u32,
    /// Variants that rendered, including those whose upload failed
    pub variants: VariantSet,
    /// Packaged archive
    pub archive: ArchiveArtifact,
}

impl SplitOutcome {
    /// The invocation's return value.
    pub fn archive_url(&self) -> Option<&str> {
        self.archive.url.as_deref()
    }
}
