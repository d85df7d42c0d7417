use crate::validate::validate_request;
use crate::{incremental, preview, sync, test_verb};
use databridge_core::{
    CancellationToken, Catalog, DriverManager, EngineError, ExecuteRequest, ExecuteResponse,
    ExecuteType, QueryBuilderFactory, RunId, TransactionProvider, WatermarkQuery,
};
use databridge_mapper::FieldMapper;
use databridge_processor::DataProcessor;
use databridge_sync::SyncEngine;
use std::sync::Arc;
use std::time::Instant;

/// The Executor Facade (§4.1): the engine's single public entry point.
/// Wires the Interface Info Adapter (the catalog lookup), Data Processor,
/// Field Mapper, and Sync Engine together behind one `execute` call that
/// never propagates an `Err` — every failure becomes a `success=false`
/// response so callers always have something to log and return upstream.
pub struct Executor {
    catalog: Arc<dyn Catalog>,
    processor: DataProcessor,
    mapper: Arc<FieldMapper>,
    sync_engine: SyncEngine,
    transaction_provider: Arc<dyn TransactionProvider>,
    watermark: Arc<dyn WatermarkQuery>,
}

impl Executor {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        driver_manager: Arc<dyn DriverManager>,
        query_builders: Arc<dyn QueryBuilderFactory>,
        transaction_provider: Arc<dyn TransactionProvider>,
        watermark: Arc<dyn WatermarkQuery>,
    ) -> Self {
        let mapper = Arc::new(FieldMapper::new());
        let processor = DataProcessor::new(catalog.clone(), driver_manager, query_builders);
        let sync_engine = SyncEngine::new(mapper.clone());
        Self { catalog, processor, mapper, sync_engine, transaction_provider, watermark }
    }

    /// Overrides the Data Processor's pagination safety valve (spec.md §9
    /// open question — configurable rather than a hardcoded 1000).
    pub fn with_max_pagination_iterations(mut self, max: u64) -> Self {
        self.processor = self.processor.with_max_pagination_iterations(max);
        self
    }

    /// Runs one `Execute` call end to end. Always stamps `duration_ms` from
    /// the first line of this function, per §4.1's contract.
    pub async fn execute(&self, request: ExecuteRequest, cancel: &CancellationToken) -> ExecuteResponse {
        let started = Instant::now();
        let execute_type = request.execute_type;
        let run_id = RunId::new();
        log::debug!("run {run_id}: execute({execute_type:?}) for interface '{}'", request.interface_id);

        let mut response = match self.dispatch(request, cancel).await {
            Ok(response) => response,
            Err(err) => {
                log::warn!("run {run_id}: execute({execute_type:?}) failed: {err}");
                ExecuteResponse::failure(execute_type, databridge_errors::classify(err.kind, err.message))
            }
        };
        response.run_id = run_id;
        response.duration_ms = started.elapsed().as_millis() as u64;
        response
    }

    async fn dispatch(
        &self,
        request: ExecuteRequest,
        cancel: &CancellationToken,
    ) -> Result<ExecuteResponse, EngineError> {
        validate_request(&request)?;
        let interface = self.catalog.get_interface(&request.interface_id).await?;

        match request.execute_type {
            ExecuteType::Preview => preview::run(&self.processor, &interface, &request, cancel).await,
            ExecuteType::Test => {
                test_verb::run(
                    &self.processor,
                    &self.mapper,
                    self.transaction_provider.as_ref(),
                    &interface,
                    &request,
                    cancel,
                )
                .await
            }
            ExecuteType::Sync => {
                sync::run(
                    &self.processor,
                    &self.sync_engine,
                    &self.mapper,
                    self.transaction_provider.as_ref(),
                    self.watermark.as_ref(),
                    &interface,
                    cancel,
                )
                .await
            }
            ExecuteType::IncrementalSync => {
                incremental::run(
                    &self.processor,
                    &self.sync_engine,
                    self.transaction_provider.as_ref(),
                    &interface,
                    &request,
                    cancel,
                )
                .await
            }
        }
    }
}
