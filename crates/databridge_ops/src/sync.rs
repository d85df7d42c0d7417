use crate::sync_result_json::sync_result_to_json;
use crate::target::build_target;
use databridge_catalog::{CatalogConfig, LimitConfig};
use databridge_core::{
    CancellationToken, ComparisonOp, EngineError, ExecuteResponse, ExecuteType, IncrementalParams,
    InterfaceInfo, InterfaceInfoAccessor, SyncStrategy, TransactionProvider, Value, WatermarkQuery,
};
use databridge_mapper::{FieldMapper, FieldMapping};
use databridge_processor::{DataProcessor, FetchMode};
use databridge_sync::SyncEngine;

/// The effective strategy a `sync` run resolves to, per §4.6.3 step 2.
/// Kept separate from `databridge_core::SyncStrategy` since this verb never
/// produces `Realtime` and the incremental arm needs to carry its params.
enum Resolution {
    Full,
    Incremental(IncrementalParams),
}

/// Resolves the watermark and effective strategy (§4.6.3 step 2). A
/// watermark-query failure degrades gracefully to a full sync with a
/// warning (§7); an empty table (watermark present but null) keeps the
/// incremental strategy with a null lower bound, which the query builder
/// is expected to treat as "no filter" (§8 scenario S4).
async fn resolve_strategy(
    interface: &InterfaceInfo,
    watermark: &dyn WatermarkQuery,
) -> Result<(Resolution, Vec<String>), EngineError> {
    let incremental_config = interface.incremental_config();
    if !incremental_config.enabled {
        return Ok((Resolution::Full, Vec::new()));
    }

    let field = incremental_config.field.ok_or_else(|| {
        EngineError::validation(format!(
            "interface '{}' enables incremental_config but declares no incremental_field",
            interface.id()
        ))
    })?;

    let mapping = FieldMapping::parse(interface.parse_config().field_mapping.as_ref());
    let mapped_column = mapping.target_for(&field).unwrap_or(&field).to_string();

    match watermark.max_value(interface.schema_name(), interface.table_name(), &mapped_column).await {
        Ok(watermark_value) => {
            let last_sync_value = watermark_value.unwrap_or(Value::Null);
            let params = IncrementalParams::new(last_sync_value, field).with_comparison(ComparisonOp::Gt);
            Ok((Resolution::Incremental(params), Vec::new()))
        }
        Err(err) => Ok((
            Resolution::Full,
            vec![format!("watermark query failed, degrading to full sync: {err}")],
        )),
    }
}

/// Sync (§4.6.3): resolves the strategy then routes to Batch Sync with
/// Strategy or Single Sync depending on `limit_config.enabled`.
#[allow(clippy::too_many_arguments)]
pub async fn run(
    processor: &DataProcessor,
    sync_engine: &SyncEngine,
    mapper: &FieldMapper,
    transaction_provider: &dyn TransactionProvider,
    watermark: &dyn WatermarkQuery,
    interface: &InterfaceInfo,
    cancel: &CancellationToken,
) -> Result<ExecuteResponse, EngineError> {
    if !interface.is_table_created() {
        return Err(EngineError::validation(format!(
            "interface '{}' has no table created; sync requires table_created",
            interface.id()
        )));
    }

    let (resolution, mut strategy_warnings) = resolve_strategy(interface, watermark).await?;
    let limit_config = interface.limit_config();

    let mut response = if limit_config.enabled {
        batch_sync_with_strategy(processor, sync_engine, transaction_provider, interface, resolution, &limit_config, cancel)
            .await?
    } else {
        single_sync(processor, mapper, transaction_provider, interface, resolution, cancel).await?
    };

    strategy_warnings.append(&mut response.warnings);
    response.warnings = strategy_warnings;
    Ok(response)
}

/// Batch Sync with Strategy (§4.6.4): pages the whole result set in via the
/// Data Processor (the source fetch carries no transactional concerns of
/// its own), then writes the full batch through the Sync Engine inside one
/// transaction — full sync truncates first, incremental upserts the lot.
async fn batch_sync_with_strategy(
    processor: &DataProcessor,
    sync_engine: &SyncEngine,
    transaction_provider: &dyn TransactionProvider,
    interface: &InterfaceInfo,
    resolution: Resolution,
    limit_config: &LimitConfig,
    cancel: &CancellationToken,
) -> Result<ExecuteResponse, EngineError> {
    let batch_size = limit_config.batch_size();

    let (fetch_mode, strategy) = match resolution {
        Resolution::Full => (FetchMode::FullPaginated { page_size: batch_size }, SyncStrategy::Full),
        Resolution::Incremental(mut params) => {
            params.batch_size = batch_size;
            (FetchMode::IncrementalPaginated { params }, SyncStrategy::Incremental)
        }
    };

    let outcome = processor.fetch(interface, fetch_mode, cancel).await?;
    let target = build_target(interface, &outcome.rows)?;
    let result = sync_engine.run(strategy, transaction_provider, interface, &target, &outcome.rows).await?;

    let mut response = ExecuteResponse::empty(ExecuteType::Sync);
    response.table_updated = true;
    response.updated_rows = result.counts.inserted + result.counts.updated;
    response.row_count = outcome.rows.len() as u64;
    response.data_types = outcome.data_types;
    response.warnings = outcome.warnings;
    response.metadata.insert("batch_count".to_string(), serde_json::json!(outcome.pages_fetched));
    response.metadata.insert("sync_result".to_string(), sync_result_to_json(&result));
    Ok(response)
}

/// Single Sync (§4.6.5): one non-paginated fetch; an incremental run that
/// comes back empty short-circuits with "no new data" rather than writing.
async fn single_sync(
    processor: &DataProcessor,
    mapper: &FieldMapper,
    transaction_provider: &dyn TransactionProvider,
    interface: &InterfaceInfo,
    resolution: Resolution,
    cancel: &CancellationToken,
) -> Result<ExecuteResponse, EngineError> {
    let is_incremental = matches!(resolution, Resolution::Incremental(_));
    let fetch_mode = match resolution {
        Resolution::Full => FetchMode::Full,
        Resolution::Incremental(params) => FetchMode::Incremental { params },
    };

    let outcome = processor.fetch(interface, fetch_mode, cancel).await?;

    if is_incremental && outcome.rows.is_empty() {
        let mut response = ExecuteResponse::empty(ExecuteType::Sync);
        response.message = "no new data".to_string();
        response.warnings = outcome.warnings;
        return Ok(response);
    }

    let updated_rows = if is_incremental {
        let target = build_target(interface, &outcome.rows)?;
        mapper.upsert_table_data(transaction_provider, interface, &target, &outcome.rows).await?
    } else {
        mapper.replace_table_data(transaction_provider, interface, &outcome.rows).await?
    };

    let mut response = ExecuteResponse::empty(ExecuteType::Sync);
    response.table_updated = true;
    response.updated_rows = updated_rows;
    response.row_count = outcome.rows.len() as u64;
    response.data_types = outcome.data_types;
    response.warnings = outcome.warnings;
    Ok(response)
}
