use std::path::Path;

use splitgen_media::{check_ffmpeg, check_ffprobe};
use splitgen_storage::S3Store;
use splitgen_worker::WorkerConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = WorkerConfig::from_env();

    println!(
        "splitgen-selfcheck: starting with work_dir={}",
        config.work_dir.display()
    );
    ensure_workdir(&config.work_dir).await?;
    check_ffmpeg().map_err(|e| anyhow::anyhow!("ffmpeg not available: {}", e))?;
    check_ffprobe().map_err(|e| anyhow::anyhow!("ffprobe not available: {}", e))?;
    ensure_env_present(&["S3_BUCKET_NAME"])?;

    if std::env::args().any(|a| a == "--s3") {
        let store = S3Store::from_env().await?;
        store.check_connectivity().await?;
        println!("splitgen-selfcheck: bucket reachable");
    }

    println!("splitgen-selfcheck: ok");
    Ok(())
}

async fn ensure_workdir<P: AsRef<Path>>(path: P) -> anyhow::Result<()> {
    let path = path.as_ref();
    tokio::fs::create_dir_all(path).await?;
    let probe = tempfile::Builder::new().prefix("selfcheck-").tempfile_in(path)?;
    drop(probe);
    Ok(())
}

fn ensure_env_present(vars: &[&str]) -> anyhow::Result<()> {
    for var in vars {
        if std::env::var(var).is_err() {
            return Err(anyhow::anyhow!("missing required env var {}", var));
        }
    }
    Ok(())
}
