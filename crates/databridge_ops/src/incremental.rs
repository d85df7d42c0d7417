use crate::sync_result_json::sync_result_to_json;
use crate::target::build_target;
use databridge_core::{
    CancellationToken, ComparisonOp, EngineError, ExecuteRequest, ExecuteResponse, ExecuteType,
    IncrementalParams, InterfaceInfo, InterfaceInfoAccessor, TransactionProvider,
};
use databridge_processor::{DataProcessor, FetchMode};
use databridge_sync::SyncEngine;

const DEFAULT_INCREMENTAL_BATCH_SIZE: u64 = 1000;

/// Explicit `incremental_sync` verb (§4.6.6): builds `IncrementalParams`
/// straight from the request rather than resolving a watermark, fetches
/// once, and hands the batch to the Sync Engine's incremental mode.
/// `validate_request` already guarantees `last_sync_time`/`incremental_key`
/// are present by the time this runs.
pub async fn run(
    processor: &DataProcessor,
    sync_engine: &SyncEngine,
    transaction_provider: &dyn TransactionProvider,
    interface: &InterfaceInfo,
    request: &ExecuteRequest,
    cancel: &CancellationToken,
) -> Result<ExecuteResponse, EngineError> {
    if !interface.is_table_created() {
        return Err(EngineError::validation(format!(
            "interface '{}' has no table created; incremental_sync requires table_created",
            interface.id()
        )));
    }

    let incremental_key = request
        .incremental_key
        .clone()
        .ok_or_else(|| EngineError::validation("incremental_sync requires a non-empty incremental_key"))?;
    let last_sync_value = request
        .last_sync_time
        .clone()
        .ok_or_else(|| EngineError::validation("incremental_sync requires last_sync_time"))?;

    let params = IncrementalParams::new(last_sync_value, incremental_key)
        .with_batch_size(request.batch_size.unwrap_or(DEFAULT_INCREMENTAL_BATCH_SIZE))
        .with_comparison(ComparisonOp::Gt);

    let outcome = processor.fetch(interface, FetchMode::Incremental { params }, cancel).await?;
    let target = build_target(interface, &outcome.rows)?;
    let result = sync_engine.incremental_sync(transaction_provider, interface, &target, &outcome.rows).await?;

    let mut response = ExecuteResponse::empty(ExecuteType::IncrementalSync);
    response.table_updated = true;
    response.updated_rows = result.counts.updated;
    response.row_count = outcome.rows.len() as u64;
    response.data_types = outcome.data_types;
    response.warnings = outcome.warnings;
    response.metadata.insert("sync_result".to_string(), sync_result_to_json(&result));
    Ok(response)
}
