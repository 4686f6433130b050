//! Request processing.
//!
//! One request runs start to finish in order: resolve and probe both inputs,
//! frame them, render and upload `split_variations` composites, then package
//! the uploaded ones into a zip. Only input and configuration problems abort
//! the request; a variant that fails to render is logged and skipped.

use std::sync::Arc;
use std::time::Instant;

use metrics::{counter, histogram};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use tracing::Instrument;

use splitgen_media::{frame_primary, frame_secondary, FramedTrack, MediaBackend};
use splitgen_models::naming::VariantName;
use splitgen_models::{SplitOutcome, SplitRequest, Variant, VariantSet};
use splitgen_storage::BlobStore;

use crate::config::WorkerConfig;
use crate::error::{WorkerError, WorkerResult};
use crate::inputs::resolve_input;
use crate::logging::RequestLogger;
use crate::packager::Packager;
use crate::sampler::VariantSampler;
use crate::scratch::{remove_local, ScratchDir};

/// Runs split requests against a media backend and a blob store.
#[derive(Clone)]
pub struct SplitProcessor {
    config: WorkerConfig,
    media: Arc<dyn MediaBackend>,
    store: Arc<dyn BlobStore>,
}

impl SplitProcessor {
    pub fn new(
        config: WorkerConfig,
        media: Arc<dyn MediaBackend>,
        store: Arc<dyn BlobStore>,
    ) -> Self {
        Self {
            config,
            media,
            store,
        }
    }

    /// Process a request with an OS-seeded generator.
    pub async fn process(
        &self,
        request_id: &str,
        request: &SplitRequest,
    ) -> WorkerResult<SplitOutcome> {
        let mut rng = StdRng::from_os_rng();
        self.process_with_rng(request_id, request, &mut rng).await
    }

    /// Process a request drawing subclip offsets from `rng`.
    pub async fn process_with_rng<R: Rng + Send + ?Sized>(
        &self,
        request_id: &str,
        request: &SplitRequest,
        rng: &mut R,
    ) -> WorkerResult<SplitOutcome> {
        let logger = RequestLogger::new(request_id, "split_variations");
        let span = logger.create_span();

        async {
            let result = self.run(&logger, request, rng).await;
            if let Err(ref e) = result {
                logger.log_error(&format!("{} ({})", e, e.kind()));
            }
            result
        }
        .instrument(span)
        .await
    }

    async fn run<R: Rng + Send + ?Sized>(
        &self,
        logger: &RequestLogger,
        request: &SplitRequest,
        rng: &mut R,
    ) -> WorkerResult<SplitOutcome> {
        request.validate()?;
        let requested = request.variation_count()?;
        logger.log_start(&format!(
            "{} variations, style={}, primary={}, secondary={}",
            requested, request.style, request.video1_path, request.video2_path
        ));

        let scratch = ScratchDir::create(&self.config.work_dir)?;

        let (primary, secondary) = self.prepare_tracks(request, &scratch).await?;
        let sampler = VariantSampler::new(primary, secondary)?;

        let packager = Packager::new(self.store.as_ref(), &self.config, &scratch);
        let mut variants = VariantSet::new();

        for index in 0..requested {
            let plan = sampler.next_plan(rng)?;
            let name = VariantName::generate();
            let local = scratch.file(&name.file_name());

            let started = Instant::now();
            if let Err(e) = self.media.render(&plan, &local, &self.config.encoding).await {
                let err = WorkerError::encode(e.to_string());
                logger.log_warning(&format!("variant {} skipped: {}", index, err));
                counter!("splitgen_variants_total", "status" => "encode_failed").increment(1);
                remove_local(&local).await;
                continue;
            }
            histogram!("splitgen_variant_render_seconds").record(started.elapsed().as_secs_f64());

            let upload = packager.upload_variant(&local, &name).await;
            variants.push(Variant {
                index,
                start_offset_secs: plan.secondary_start,
                duration_secs: plan.duration,
                object_key: upload.object_key,
                url: upload.url,
            });

            logger.log_progress(&format!(
                "variant {}/{} rendered (offset {:.3}s)",
                index + 1,
                requested,
                plan.secondary_start
            ));
        }

        let archive = packager.package(&variants).await?;

        logger.log_completion(&format!(
            "{} of {} variants archived, archive={}",
            archive.entry_names.len(),
            requested,
            archive.url.as_deref().unwrap_or("<not uploaded>")
        ));

        Ok(SplitOutcome {
            requested,
            variants,
            archive,
        })
    }

    async fn prepare_tracks(
        &self,
        request: &SplitRequest,
        scratch: &ScratchDir,
    ) -> WorkerResult<(FramedTrack, FramedTrack)> {
        let store = self.store.as_ref();
        let primary_input = resolve_input(&request.video1_path, store, scratch).await?;
        let secondary_input = resolve_input(&request.video2_path, store, scratch).await?;

        let primary = self
            .media
            .probe(&primary_input.path)
            .await
            .map_err(WorkerError::from_source)?;
        let secondary = self
            .media
            .probe(&secondary_input.path)
            .await
            .map_err(WorkerError::from_source)?;

        Ok((
            frame_primary(&primary, request.style),
            frame_secondary(&secondary),
        ))
    }
}
