use databridge_core::{
    CancellationToken, EngineError, ExecuteRequest, ExecuteResponse, ExecuteType, InterfaceInfo,
    InterfaceInfoAccessor, TransactionProvider,
};
use databridge_mapper::FieldMapper;
use databridge_processor::{DataProcessor, FetchMode};

const TEST_FETCH_LIMIT: i64 = 1000;

/// Test (§4.6.2): one sample fetch; if the target table already exists,
/// write the fetched rows through `FieldMapper::update_table_data`
/// best-effort — a write failure becomes a warning, never a hard error.
/// The fetched rows are always returned regardless of the write outcome.
pub async fn run(
    processor: &DataProcessor,
    mapper: &FieldMapper,
    transaction_provider: &dyn TransactionProvider,
    interface: &InterfaceInfo,
    request: &ExecuteRequest,
    cancel: &CancellationToken,
) -> Result<ExecuteResponse, EngineError> {
    let limit = request.limit.unwrap_or(TEST_FETCH_LIMIT);
    let outcome = processor.fetch(interface, FetchMode::Sample { limit }, cancel).await?;

    let mut response = ExecuteResponse::empty(ExecuteType::Test);
    response.row_count = outcome.rows.len() as u64;
    response.column_count = outcome.data_types.len() as u64;
    response.data_types = outcome.data_types;
    response.warnings = outcome.warnings;

    if interface.is_table_created() {
        match mapper.update_table_data(transaction_provider, interface, &outcome.rows).await {
            Ok(updated) => {
                response.table_updated = true;
                response.updated_rows = updated;
            }
            Err(err) => {
                response.warnings.push(format!("test write failed: {err}"));
            }
        }
    }

    response.data = outcome.rows;
    Ok(response)
}
