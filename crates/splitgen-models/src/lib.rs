//! Shared data models for the split-screen variant generator.
//!
//! This crate provides Serde-serializable types for:
//! - The invocation request and its validation
//! - Framing styles for the primary track
//! - Canvas geometry constants and dimension math
//! - Encoding configuration
//! - Variant and archive records
//! - Object and file naming

pub mod encoding;
pub mod geometry;
pub mod naming;
pub mod request;
pub mod style;
pub mod variant;

// Re-export common types
pub use encoding::EncodingConfig;
pub use geometry::{
    Dimensions, CANVAS_HEIGHT, CANVAS_WIDTH, SECONDARY_BAND_HEIGHT, SECONDARY_OFFSET_Y,
    SHRINK_HEIGHT,
};
pub use request::{RequestError, SplitRequest};
pub use style::FramingStyle;
pub use variant::{ArchiveArtifact, SplitOutcome, Variant, VariantSet};
