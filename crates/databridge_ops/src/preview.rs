use databridge_core::{
    CancellationToken, EngineError, ExecuteRequest, ExecuteResponse, ExecuteType, InterfaceInfo,
};
use databridge_processor::{DataProcessor, FetchMode};

const DEFAULT_PREVIEW_LIMIT: i64 = 10;
const MAX_PREVIEW_LIMIT: i64 = 1000;

/// Preview (§4.6.1): one bounded sample fetch, never touching the target
/// table. `limit` is clamped into `[1, 1000]`, defaulting to 10.
pub async fn run(
    processor: &DataProcessor,
    interface: &InterfaceInfo,
    request: &ExecuteRequest,
    cancel: &CancellationToken,
) -> Result<ExecuteResponse, EngineError> {
    let limit = match request.limit {
        Some(limit) if limit > 0 => limit.clamp(1, MAX_PREVIEW_LIMIT),
        _ => DEFAULT_PREVIEW_LIMIT,
    };

    let mut outcome = processor.fetch(interface, FetchMode::Sample { limit }, cancel).await?;
    outcome.rows.truncate(limit as usize);

    let mut response = ExecuteResponse::empty(ExecuteType::Preview);
    response.row_count = outcome.rows.len() as u64;
    response.column_count = outcome.data_types.len() as u64;
    response.data_types = outcome.data_types;
    response.data = outcome.rows;
    response.warnings = outcome.warnings;
    response.metadata.insert("limit".to_string(), serde_json::json!(limit));
    Ok(response)
}
