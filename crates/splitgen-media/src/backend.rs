//! Media backend abstraction.
//!
//! The worker only needs two things from the media engine: probe a source
//! into a [`VideoHandle`] and render a [`CompositionPlan`] to a file.

use async_trait::async_trait;
use std::path::Path;
use tracing::{debug, info};

use splitgen_models::EncodingConfig;

use crate::command::FfmpegRunner;
use crate::composite::CompositionPlan;
use crate::error::MediaResult;
use crate::probe::VideoHandle;

/// Decode/encode engine used by the variant pipeline.
#[async_trait]
pub trait MediaBackend: Send + Sync {
    /// Backend name for logs.
    fn name(&self) -> &'static str;

    /// Probe a local file.
    async fn probe(&self, path: &Path) -> MediaResult<VideoHandle>;

    /// Render one variant to `output`.
    async fn render(
        &self,
        plan: &CompositionPlan,
        output: &Path,
        encoding: &EncodingConfig,
    ) -> MediaResult<()>;
}

/// FFmpeg/FFprobe child-process backend.
#[derive(Debug, Clone, Default)]
pub struct FfmpegBackend {
    runner: FfmpegRunner,
}

impl FfmpegBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl MediaBackend for FfmpegBackend {
    fn name(&self) -> &'static str {
        "ffmpeg"
    }

    async fn probe(&self, path: &Path) -> MediaResult<VideoHandle> {
        let handle = VideoHandle::open(path).await?;
        info!(
            path = %path.display(),
            width = handle.info.width,
            height = handle.info.height,
            duration = handle.info.duration,
            fps = handle.info.fps,
            has_audio = handle.info.has_audio,
            "Probed video"
        );
        Ok(handle)
    }

    async fn render(
        &self,
        plan: &CompositionPlan,
        output: &Path,
        encoding: &EncodingConfig,
    ) -> MediaResult<()> {
        let cmd = plan.to_command(output, encoding);
        let total_ms = (plan.duration * 1000.0) as i64;
        let output_display = output.display().to_string();

        self.runner
            .run_with_progress(&cmd, move |progress| {
                debug!(
                    output = %output_display,
                    percent = progress.percentage(total_ms),
                    speed = progress.speed,
                    "Render progress"
                );
            })
            .await
    }
}
