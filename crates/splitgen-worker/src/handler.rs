//! Lambda entry point.

use lambda_runtime::{Error, LambdaEvent};
use splitgen_models::SplitRequest;

use crate::processor::SplitProcessor;

/// Handle one invocation, returning the archive URL.
///
/// `None` means the archive could not be uploaded. Decode and configuration
/// failures surface as invocation errors.
pub async fn handle(
    processor: &SplitProcessor,
    event: LambdaEvent<SplitRequest>,
) -> Result<Option<String>, Error> {
    let (request, context) = event.into_parts();
    let outcome = processor.process(&context.request_id, &request).await?;
    Ok(outcome.archive.url)
}
