//! Lambda function binary.

use std::sync::Arc;

use lambda_runtime::{service_fn, LambdaEvent};
use tracing::{error, info};

use splitgen_media::FfmpegBackend;
use splitgen_models::SplitRequest;
use splitgen_storage::S3Store;
use splitgen_worker::{handle, init_tracing, SplitProcessor, WorkerConfig};

#[tokio::main]
async fn main() -> Result<(), lambda_runtime::Error> {
    dotenvy::dotenv().ok();
    init_tracing();

    info!("Starting splitgen");

    let config = WorkerConfig::from_env();
    info!("Worker config: {:?}", config);

    let store = match S3Store::from_env().await {
        Ok(s) => s,
        Err(e) => {
            error!("Failed to create S3 store: {}", e);
            return Err(e.into());
        }
    };

    let processor = Arc::new(SplitProcessor::new(
        config,
        Arc::new(FfmpegBackend::new()),
        Arc::new(store),
    ));

    lambda_runtime::run(service_fn(move |event: LambdaEvent<SplitRequest>| {
        let processor = Arc::clone(&processor);
        async move { handle(&processor, event).await }
    }))
    .await
}
