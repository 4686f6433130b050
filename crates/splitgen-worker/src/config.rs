//! Worker configuration.

use std::path::PathBuf;

use splitgen_models::encoding::{
    DEFAULT_AUDIO_CODEC, DEFAULT_CRF, DEFAULT_PRESET, DEFAULT_VIDEO_CODEC,
};
use splitgen_models::naming::{DEFAULT_ARCHIVE_PREFIX, DEFAULT_SPLITS_PREFIX};
use splitgen_models::EncodingConfig;

/// Worker configuration.
#[derive(Debug, Clone)]
pub struct WorkerConfig {
    /// Base directory for per-request scratch directories
    pub work_dir: PathBuf,
    /// Key prefix for uploaded variants
    pub splits_prefix: String,
    /// Key prefix for uploaded archives
    pub archive_prefix: String,
    /// Encoding applied to every variant
    pub encoding: EncodingConfig,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            work_dir: std::env::temp_dir(),
            splits_prefix: DEFAULT_SPLITS_PREFIX.to_string(),
            archive_prefix: DEFAULT_ARCHIVE_PREFIX.to_string(),
            encoding: EncodingConfig::default(),
        }
    }
}

impl WorkerConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            work_dir: std::env::var("SPLITGEN_WORK_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| std::env::temp_dir()),
            splits_prefix: std::env::var("SPLITGEN_SPLITS_PREFIX")
                .unwrap_or_else(|_| DEFAULT_SPLITS_PREFIX.to_string()),
            archive_prefix: std::env::var("SPLITGEN_ARCHIVE_PREFIX")
                .unwrap_or_else(|_| DEFAULT_ARCHIVE_PREFIX.to_string()),
            encoding: EncodingConfig {
                codec: std::env::var("SPLITGEN_VIDEO_CODEC")
                    .unwrap_or_else(|_| DEFAULT_VIDEO_CODEC.to_string()),
                audio_codec: std::env::var("SPLITGEN_AUDIO_CODEC")
                    .unwrap_or_else(|_| DEFAULT_AUDIO_CODEC.to_string()),
                preset: std::env::var("SPLITGEN_PRESET")
                    .unwrap_or_else(|_| DEFAULT_PRESET.to_string()),
                crf: std::env::var("SPLITGEN_CRF")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(DEFAULT_CRF),
                ..EncodingConfig::default()
            },
        }
    }

    /// Config rooted at a specific scratch base.
    pub fn with_work_dir(mut self, work_dir: impl Into<PathBuf>) -> Self {
        self.work_dir = work_dir.into();
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_prefixes() {
        let config = WorkerConfig::default();
        assert_eq!(config.splits_prefix, "splits");
        assert_eq!(config.archive_prefix, "zip");
        assert_eq!(config.encoding.codec, "libx264");
        assert_eq!(config.encoding.audio_codec, "aac");
    }

    #[test]
    fn test_with_work_dir() {
        let config = WorkerConfig::default().with_work_dir("/var/tmp/splitgen");
        assert_eq!(config.work_dir, PathBuf::from("/var/tmp/splitgen"));
    }
}
