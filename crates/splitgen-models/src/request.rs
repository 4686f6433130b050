//! Invocation request.

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::style::FramingStyle;

/// Errors raised while validating a request.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RequestError {
    #[error("{0} must not be empty")]
    EmptyPath(&'static str),

    #[error("split_variations must be zero or positive, got {0}")]
    NegativeVariations(i64),

    #[error("split_variations {0} exceeds the supported maximum of {max}", max = u32::MAX)]
    TooManyVariations(i64),
}

/// A request to generate split-screen variants from two videos.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SplitRequest {
    /// Primary (foreground) video; local path or bucket URL
    pub video1_path: String,
    /// Secondary (band) video; local path or bucket URL
    pub video2_path: String,
    /// Number of variants to generate
    pub split_variations: i64,
    /// Framing style for the primary track
    #[serde(default)]
    pub style: FramingStyle,
}

impl SplitRequest {
    pub fn new(
        video1_path: impl Into<String>,
        video2_path: impl Into<String>,
        split_variations: i64,
        style: FramingStyle,
    ) -> Self {
        Self {
            video1_path: video1_path.into(),
            video2_path: video2_path.into(),
            split_variations,
            style,
        }
    }

    /// Validate the request.
    pub fn validate(&self) -> Result<(), RequestError> {
        if self.video1_path.trim().is_empty() {
            return Err(RequestError::EmptyPath("video1_path"));
        }
        if self.video2_path.trim().is_empty() {
            return Err(RequestError::EmptyPath("video2_path"));
        }
        self.variation_count().map(|_| ())
    }

    /// Number of variants to generate, checked.
    pub fn variation_count(&self) -> Result<u32, RequestError> {
        if self.split_variations < 0 {
            return Err(RequestError::NegativeVariations(self.split_variations));
        }
        u32::try_from(self.split_variations)
            .map_err(|_| RequestError::TooManyVariations(self.split_variations))
    }
}
