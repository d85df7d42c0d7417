use crate::normalize::normalize;
use crate::pagination::page_params;
use crate::type_inference::infer_types_first_row;
use databridge_core::{
    CancellationToken, Catalog, DataSource, DataSourceDescriptor, DriverManager, DriverRequest,
    EngineError, HealthStatus, IncrementalParams, InterfaceInfo, InterfaceInfoAccessor,
    QueryBuilder, QueryBuilderFactory, Record,
};
use std::collections::HashMap;
use std::sync::Arc;

/// Hard safety valve on pagination loops (§3 invariant 5). Configurable per
/// `DataProcessor` instance rather than a hardcoded constant, per
/// spec.md §9's open question on this point.
pub const DEFAULT_MAX_PAGINATION_ITERATIONS: u64 = 1000;

/// Which request shape to fetch, selected by the caller from the strategy
/// it is running (§4.3 step 4).
pub enum FetchMode {
    /// `test`/`preview`: a single bounded sample fetch (`BuildTestRequest`).
    Sample { limit: i64 },
    Full,
    FullPaginated { page_size: u64 },
    Incremental { params: IncrementalParams },
    IncrementalPaginated { params: IncrementalParams },
}

/// Result of one `DataProcessor::fetch` call: normalised rows, inferred
/// column types (first-row strategy, §4.3.2), and any advisory warnings.
#[derive(Debug, Clone, Default)]
pub struct FetchOutcome {
    pub rows: Vec<Record>,
    pub data_types: HashMap<String, String>,
    pub warnings: Vec<String>,
    pub pages_fetched: u64,
}

/// The Data Processor (spec §4.3): resolves a live driver for an interface,
/// selects the right query-builder call for the strategy in play, executes
/// it, and normalises + type-infers the result.
pub struct DataProcessor {
    catalog: Arc<dyn Catalog>,
    driver_manager: Arc<dyn DriverManager>,
    query_builders: Arc<dyn QueryBuilderFactory>,
    max_pagination_iterations: u64,
}

impl DataProcessor {
    pub fn new(
        catalog: Arc<dyn Catalog>,
        driver_manager: Arc<dyn DriverManager>,
        query_builders: Arc<dyn QueryBuilderFactory>,
    ) -> Self {
        Self {
            catalog,
            driver_manager,
            query_builders,
            max_pagination_iterations: DEFAULT_MAX_PAGINATION_ITERATIONS,
        }
    }

    pub fn with_max_pagination_iterations(mut self, max: u64) -> Self {
        self.max_pagination_iterations = max;
        self
    }

    /// Resolves and starts (or borrows) the driver backing `interface`'s
    /// data source (§4.3 steps 1-2). Returns the driver, its descriptor, and
    /// whether the manager owns it (vs. it being this call's ephemeral
    /// responsibility to stop).
    async fn acquire(
        &self,
        interface: &InterfaceInfo,
    ) -> Result<(Arc<dyn DataSource>, DataSourceDescriptor, bool), EngineError> {
        let data_source_id = interface.data_source_id();
        if data_source_id.is_empty() {
            return Err(EngineError::business(format!(
                "interface '{}' has no data source to fetch from (thematic library interfaces are computed over base tables)",
                interface.id()
            )));
        }
        let descriptor = self.catalog.get_data_source(data_source_id).await?;
        let driver = self.driver_manager.acquire(&descriptor).await?;
        let shared = self.driver_manager.is_shared(data_source_id).await;
        Ok((driver, descriptor, shared))
    }

    /// Stops the driver if this call owns it ephemerally; shared drivers are
    /// left running for the next caller (§4.3 step 2, §5 shared-resource
    /// policy). Never propagates a stop failure — it's logged instead, since
    /// the fetch itself has already succeeded or failed independently.
    async fn release(&self, driver: &Arc<dyn DataSource>, data_source_id: &str, shared: bool) {
        if shared {
            return;
        }
        if let Err(err) = driver.stop().await {
            log::warn!("failed to stop ephemeral driver for data source '{data_source_id}': {err}");
        }
    }

    /// Invokes the driver's health probe through the same acquisition path a
    /// fetch would use (SPEC_FULL §4 "health check plumbing").
    pub async fn health_check(&self, interface: &InterfaceInfo) -> Result<HealthStatus, EngineError> {
        let (driver, descriptor, shared) = self.acquire(interface).await?;
        let status = databridge_errors::guard(async { Ok(driver.health_check().await) }).await;
        self.release(&driver, &descriptor.id, shared).await;
        status
    }

    /// Fetches, normalises, and type-infers one `FetchMode` against
    /// `interface`'s data source (§4.3 end to end).
    pub async fn fetch(
        &self,
        interface: &InterfaceInfo,
        mode: FetchMode,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome, EngineError> {
        let (driver, descriptor, shared) = self.acquire(interface).await?;

        let result = match self.query_builders.build(&descriptor, interface) {
            Ok(query_builder) => {
                databridge_errors::guard(self.fetch_with_driver(
                    interface,
                    &descriptor,
                    driver.as_ref(),
                    query_builder.as_ref(),
                    mode,
                    cancel,
                ))
                .await
            }
            Err(err) => Err(err),
        };

        self.release(&driver, &descriptor.id, shared).await;
        result
    }

    async fn fetch_with_driver(
        &self,
        interface: &InterfaceInfo,
        descriptor: &DataSourceDescriptor,
        driver: &dyn DataSource,
        query_builder: &dyn QueryBuilder,
        mode: FetchMode,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome, EngineError> {
        match mode {
            FetchMode::Sample { limit } => {
                let request = query_builder.build_preview_request(limit);
                self.execute_once(driver, request, cancel).await
            }
            FetchMode::Full => {
                let request = query_builder.build_full_request();
                self.execute_once(driver, request, cancel).await
            }
            FetchMode::Incremental { params } => {
                let request = query_builder.build_incremental_request(&params);
                self.execute_once(driver, request, cancel).await
            }
            FetchMode::FullPaginated { page_size } => {
                self.execute_paginated(interface, descriptor, driver, query_builder, None, page_size, cancel)
                    .await
            }
            FetchMode::IncrementalPaginated { params } => {
                let page_size = params.batch_size;
                self.execute_paginated(
                    interface,
                    descriptor,
                    driver,
                    query_builder,
                    Some(params),
                    page_size,
                    cancel,
                )
                .await
            }
        }
    }

    fn failure_message(message: &str, error: &Option<String>) -> String {
        match error {
            Some(error) => format!("{message}: {error}"),
            None => message.to_string(),
        }
    }

    fn finish(rows: Vec<Record>, pages_fetched: u64, mut warnings: Vec<String>) -> FetchOutcome {
        if rows.is_empty() {
            warnings.push("empty result".to_string());
        }
        let data_types = infer_types_first_row(&rows);
        FetchOutcome { rows, data_types, warnings, pages_fetched }
    }

    /// §4.3 step 7: only the single-fetch path warns on an oversized result
    /// suggesting pagination — a caller already paginating (`execute_paginated`)
    /// accumulates a large `all_rows` by design and shouldn't be told to do
    /// what it's already doing.
    async fn execute_once(
        &self,
        driver: &dyn DataSource,
        request: DriverRequest,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome, EngineError> {
        let response = driver.execute(request, cancel.clone()).await?;
        if !response.success {
            return Err(EngineError::data_source(Self::failure_message(&response.message, &response.error)));
        }
        let rows = normalize(response.data);
        let mut warnings = Vec::new();
        if rows.len() > 1000 {
            warnings.push("result too large, consider pagination".to_string());
        }
        Ok(Self::finish(rows, 1, warnings))
    }

    #[allow(clippy::too_many_arguments)]
    async fn execute_paginated(
        &self,
        interface: &InterfaceInfo,
        descriptor: &DataSourceDescriptor,
        driver: &dyn DataSource,
        query_builder: &dyn QueryBuilder,
        incremental: Option<IncrementalParams>,
        page_size: u64,
        cancel: &CancellationToken,
    ) -> Result<FetchOutcome, EngineError> {
        let mut all_rows = Vec::new();
        let mut warnings = Vec::new();
        let mut pages_fetched = 0u64;
        let mut page = page_params(&descriptor.category, interface, page_size);

        loop {
            if cancel.is_cancelled() {
                return Err(EngineError::system("fetch cancelled during pagination"));
            }
            if pages_fetched >= self.max_pagination_iterations {
                warnings.push(format!(
                    "pagination cap of {} reached, more data may exist",
                    self.max_pagination_iterations
                ));
                break;
            }

            let base = match &incremental {
                Some(params) => query_builder.build_incremental_request(params),
                None => query_builder.build_full_request(),
            };
            let request = query_builder.build_paginated_request(base, &page);

            let response = driver.execute(request, cancel.clone()).await?;
            if !response.success {
                return Err(EngineError::data_source(format!(
                    "page {}: {}",
                    page.page,
                    Self::failure_message(&response.message, &response.error)
                )));
            }

            let batch = normalize(response.data);
            let batch_len = batch.len() as u64;
            pages_fetched += 1;
            all_rows.extend(batch);

            if batch_len == 0 || batch_len < page_size {
                break;
            }
            page.page += 1;
        }

        Ok(Self::finish(all_rows, pages_fetched, warnings))
    }
}
