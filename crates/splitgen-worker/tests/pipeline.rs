//! End-to-end request tests against a scripted media backend and an
//! in-memory bucket.

use std::collections::{HashMap, HashSet};
use std::io::{Cursor, Read};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use rand::rngs::StdRng;
use rand::SeedableRng;
use tempfile::TempDir;

use splitgen_media::{
    CompositionPlan, MediaBackend, MediaError, MediaResult, VideoHandle, VideoInfo,
};
use splitgen_models::{EncodingConfig, FramingStyle, SplitRequest};
use splitgen_storage::{BlobStore, InMemoryStore};
use splitgen_worker::{SplitProcessor, WorkerConfig, WorkerError};

/// Probes by file content label and "renders" by writing the plan's offsets.
#[derive(Default)]
struct ScriptedBackend {
    sources: HashMap<String, VideoInfo>,
    failing_renders: HashSet<u32>,
    renders: AtomicU32,
    plans: Mutex<Vec<CompositionPlan>>,
}

impl ScriptedBackend {
    fn with_source(mut self, label: &str, duration: f64, width: u32, height: u32) -> Self {
        self.sources.insert(
            label.to_string(),
            VideoInfo {
                duration,
                width,
                height,
                fps: 29.97,
                has_audio: true,
                codec: "h264".to_string(),
            },
        );
        self
    }

    fn failing_render(mut self, attempt: u32) -> Self {
        self.failing_renders.insert(attempt);
        self
    }

    fn plans(&self) -> Vec<CompositionPlan> {
        self.plans.lock().unwrap().clone()
    }
}

#[async_trait]
impl MediaBackend for ScriptedBackend {
    fn name(&self) -> &'static str {
        "scripted"
    }

    async fn probe(&self, path: &Path) -> MediaResult<VideoHandle> {
        let label = tokio::fs::read_to_string(path)
            .await
            .map_err(|_| MediaError::FileNotFound(path.to_path_buf()))?;
        let info = self
            .sources
            .get(label.trim())
            .cloned()
            .ok_or_else(|| MediaError::decode(path, "not a video"))?;
        Ok(VideoHandle::new(path, info))
    }

    async fn render(
        &self,
        plan: &CompositionPlan,
        output: &Path,
        _encoding: &EncodingConfig,
    ) -> MediaResult<()> {
        let attempt = self.renders.fetch_add(1, Ordering::SeqCst);
        if self.failing_renders.contains(&attempt) {
            tokio::fs::write(output, b"partial").await?;
            return Err(MediaError::ffmpeg_failed("encoder crashed", None, Some(1)));
        }

        self.plans.lock().unwrap().push(plan.clone());
        let body = format!("render {} start {:.6}", attempt, plan.secondary_start);
        tokio::fs::write(output, body).await?;
        Ok(())
    }
}

struct Fixture {
    _dir: TempDir,
    work_dir: PathBuf,
    primary: String,
    secondary: String,
}

impl Fixture {
    async fn new() -> Self {
        let dir = tempfile::tempdir().unwrap();
        let primary = dir.path().join("primary.mp4");
        let secondary = dir.path().join("secondary.mp4");
        tokio::fs::write(&primary, "primary").await.unwrap();
        tokio::fs::write(&secondary, "secondary").await.unwrap();

        Self {
            work_dir: dir.path().join("work"),
            primary: primary.to_string_lossy().into_owned(),
            secondary: secondary.to_string_lossy().into_owned(),
            _dir: dir,
        }
    }

    fn request(&self, variations: i64) -> SplitRequest {
        SplitRequest::new(&self.primary, &self.secondary, variations, FramingStyle::Shrink)
    }

    fn processor(
        &self,
        backend: Arc<ScriptedBackend>,
        store: Arc<InMemoryStore>,
    ) -> SplitProcessor {
        let config = WorkerConfig::default().with_work_dir(&self.work_dir);
        SplitProcessor::new(config, backend, store)
    }
}

fn standard_backend() -> ScriptedBackend {
    ScriptedBackend::default()
        .with_source("primary", 10.0, 1920, 1080)
        .with_source("secondary", 60.0, 1280, 720)
}

fn archive_entries(bytes: Vec<u8>) -> Vec<(String, String)> {
    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).unwrap();
    (0..archive.len())
        .map(|i| {
            let mut file = archive.by_index(i).unwrap();
            let mut body = String::new();
            file.read_to_string(&mut body).unwrap();
            (file.name().to_string(), body)
        })
        .collect()
}

#[tokio::test]
async fn test_three_variants_archived_in_order() {
    let fixture = Fixture::new().await;
    let backend = Arc::new(standard_backend());
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = fixture.processor(backend.clone(), store.clone());

    let request = SplitRequest::new(&fixture.primary, &fixture.secondary, 3, FramingStyle::Overlay);
    let mut rng = StdRng::seed_from_u64(11);
    let outcome = processor
        .process_with_rng("req-1", &request, &mut rng)
        .await
        .unwrap();

    assert_eq!(outcome.requested, 3);
    assert_eq!(outcome.variants.uploaded_count(), 3);
    assert_eq!(store.keys_under("splits/").len(), 3);

    let url = outcome.archive_url().unwrap();
    assert!(url.starts_with("https://processed.s3.amazonaws.com/zip/"));
    assert!(url.ends_with(".zip"));

    let entries = archive_entries(store.get_object_by_url(url).await.unwrap());
    let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["split_0.mp4", "split_1.mp4", "split_2.mp4"]);
    for (i, (_, body)) in entries.iter().enumerate() {
        assert!(body.starts_with(&format!("render {} ", i)));
    }

    for plan in backend.plans() {
        assert_eq!(plan.duration, 10.0);
        assert_eq!(plan.fps, 29);
        assert_eq!(plan.primary.width(), 1080);
        assert_eq!(plan.secondary_position.y, 1152);
        assert!(!plan.secondary.has_audio);
        assert!(plan.secondary_start >= 0.0);
        assert!(plan.secondary_end() <= 60.0);
    }
}

#[tokio::test]
async fn test_zero_variations_uploads_empty_archive() {
    let fixture = Fixture::new().await;
    let backend = Arc::new(standard_backend());
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = fixture.processor(backend.clone(), store.clone());

    let outcome = processor.process("req-0", &fixture.request(0)).await.unwrap();

    assert!(outcome.variants.is_empty());
    assert!(backend.plans().is_empty());
    let bytes = store.get_object_by_url(outcome.archive_url().unwrap()).await.unwrap();
    assert!(archive_entries(bytes).is_empty());
}

#[tokio::test]
async fn test_short_secondary_is_configuration_error() {
    let fixture = Fixture::new().await;
    let backend = Arc::new(
        ScriptedBackend::default()
            .with_source("primary", 30.0, 1920, 1080)
            .with_source("secondary", 10.0, 1920, 1080),
    );
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = fixture.processor(backend.clone(), store.clone());

    let err = processor.process("req", &fixture.request(2)).await.unwrap_err();

    assert!(matches!(err, WorkerError::Configuration(_)));
    assert!(err.is_fatal());
    assert!(backend.plans().is_empty());
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn test_negative_variations_rejected() {
    let fixture = Fixture::new().await;
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = fixture.processor(Arc::new(standard_backend()), store.clone());

    let err = processor.process("req", &fixture.request(-1)).await.unwrap_err();
    assert!(matches!(err, WorkerError::Configuration(_)));
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn test_undecodable_input_is_fatal() {
    let fixture = Fixture::new().await;
    let backend = Arc::new(ScriptedBackend::default().with_source("primary", 10.0, 1920, 1080));
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = fixture.processor(backend, store.clone());

    let err = processor.process("req", &fixture.request(1)).await.unwrap_err();
    assert!(matches!(err, WorkerError::Decode(_)));

    let missing =
        SplitRequest::new("/no/such/file.mp4", &fixture.secondary, 1, FramingStyle::Overlay);
    let err = processor.process("req", &missing).await.unwrap_err();
    assert!(matches!(err, WorkerError::Decode(_)));
    assert!(store.keys().is_empty());
}

#[tokio::test]
async fn test_encode_failure_skips_variant() {
    let fixture = Fixture::new().await;
    let backend = Arc::new(standard_backend().failing_render(1));
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = fixture.processor(backend, store.clone());

    let mut rng = StdRng::seed_from_u64(5);
    let outcome = processor
        .process_with_rng("req", &fixture.request(3), &mut rng)
        .await
        .unwrap();

    assert_eq!(outcome.variants.len(), 2);
    let indices: Vec<u32> = outcome.variants.iter().map(|v| v.index).collect();
    assert_eq!(indices, [0, 2]);

    let bytes = store
        .get_object_by_url(outcome.archive_url().unwrap())
        .await
        .unwrap();
    let entries = archive_entries(bytes);
    let names: Vec<_> = entries.iter().map(|(n, _)| n.as_str()).collect();
    assert_eq!(names, ["split_0.mp4", "split_1.mp4"]);
    assert!(entries[1].1.starts_with("render 2 "));
}

#[tokio::test]
async fn test_variant_upload_failure_leaves_gap() {
    let fixture = Fixture::new().await;
    let store = Arc::new(InMemoryStore::new("processed"));
    store.fail_uploads_under("splits/");
    let processor = fixture.processor(Arc::new(standard_backend()), store.clone());

    let outcome = processor.process("req", &fixture.request(2)).await.unwrap();

    assert_eq!(outcome.variants.len(), 2);
    assert_eq!(outcome.variants.uploaded_count(), 0);
    assert_eq!(store.upload_attempts_under("splits/"), 2);
    assert!(outcome.archive.entry_names.is_empty());
    assert!(outcome.archive_url().is_some());
}

#[tokio::test]
async fn test_archive_upload_failure_returns_no_url() {
    let fixture = Fixture::new().await;
    let store = Arc::new(InMemoryStore::new("processed"));
    store.fail_uploads_under("zip/");
    let processor = fixture.processor(Arc::new(standard_backend()), store.clone());

    let outcome = processor.process("req", &fixture.request(1)).await.unwrap();

    assert!(outcome.archive_url().is_none());
    assert_eq!(store.keys_under("splits/").len(), 1);
}

#[tokio::test]
async fn test_repeated_runs_produce_distinct_archives() {
    let fixture = Fixture::new().await;
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = fixture.processor(Arc::new(standard_backend()), store.clone());

    let first = processor.process("a", &fixture.request(1)).await.unwrap();
    let second = processor.process("b", &fixture.request(1)).await.unwrap();

    assert_ne!(first.archive_url(), second.archive_url());
    assert_eq!(store.keys_under("zip/").len(), 2);
}

#[tokio::test]
async fn test_scratch_space_cleaned_up() {
    let fixture = Fixture::new().await;
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = fixture.processor(Arc::new(standard_backend()), store);

    processor.process("req", &fixture.request(2)).await.unwrap();

    let mut entries = tokio::fs::read_dir(&fixture.work_dir).await.unwrap();
    assert!(entries.next_entry().await.unwrap().is_none());
}

#[tokio::test]
async fn test_bucket_url_inputs_are_fetched() {
    let fixture = Fixture::new().await;
    let store = Arc::new(InMemoryStore::new("processed"));
    store.insert("uploads/primary.mp4", b"primary".to_vec(), "video/mp4");
    store.insert("uploads/secondary.mp4", b"secondary".to_vec(), "video/mp4");
    let processor = fixture.processor(Arc::new(standard_backend()), store.clone());

    let request = SplitRequest::new(
        store.object_url("uploads/primary.mp4"),
        store.object_url("uploads/secondary.mp4"),
        1,
        FramingStyle::Overlay,
    );
    let outcome = processor.process("req", &request).await.unwrap();

    assert_eq!(outcome.archive.entry_names, ["split_0.mp4"]);
}

#[tokio::test]
async fn test_lambda_handler_returns_archive_url() {
    let fixture = Fixture::new().await;
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = fixture.processor(Arc::new(standard_backend()), store.clone());

    let payload = serde_json::json!({
        "video1_path": fixture.primary,
        "video2_path": fixture.secondary,
        "split_variations": 1,
        "style": "overlay"
    });
    let request: SplitRequest = serde_json::from_value(payload).unwrap();
    let event = lambda_runtime::LambdaEvent::new(request, lambda_runtime::Context::default());

    let url = splitgen_worker::handle(&processor, event).await.unwrap().unwrap();
    assert_eq!(store.keys_under("zip/").len(), 1);
    assert!(url.ends_with(".zip"));
}

#[tokio::test]
#[ignore = "requires ffmpeg and sample videos in SPLITGEN_SAMPLE_DIR"]
async fn test_real_ffmpeg_render() {
    let dir = PathBuf::from(std::env::var("SPLITGEN_SAMPLE_DIR").unwrap());
    let work = tempfile::tempdir().unwrap();
    let store = Arc::new(InMemoryStore::new("processed"));
    let processor = SplitProcessor::new(
        WorkerConfig::default().with_work_dir(work.path()),
        Arc::new(splitgen_media::FfmpegBackend::new()),
        store.clone(),
    );

    let request = SplitRequest::new(
        dir.join("primary.mp4").to_string_lossy(),
        dir.join("secondary.mp4").to_string_lossy(),
        2,
        FramingStyle::Overlay,
    );
    let outcome = processor.process("real", &request).await.unwrap();
    assert_eq!(outcome.archive.entry_names.len(), 2);
}
