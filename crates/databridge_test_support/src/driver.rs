use async_trait::async_trait;
use databridge_core::{
    CancellationToken, DataSource, DataSourceDescriptor, DriverManager, DriverRequest,
    DriverResponse, EngineError, ErrorKind, HealthStatus, IncrementalParams, InterfaceInfo,
    PageParams, QueryBuilder, QueryBuilderFactory,
};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// One canned outcome for `FakeDataSource::execute`: either a response to
/// hand back, or a simulated failure the caller should classify via
/// `databridge_errors`. The failure is stored as `(kind, message)` rather
/// than `EngineError` itself, since that type isn't `Clone` (it may carry a
/// boxed source) and this queue is popped from behind a shared reference.
#[derive(Debug, Clone)]
pub enum QueuedResponse {
    Response(DriverResponse),
    Fail(ErrorKind, String),
}

impl QueuedResponse {
    pub fn ok(response: DriverResponse) -> Self {
        QueuedResponse::Response(response)
    }

    pub fn fail(kind: ErrorKind, message: impl Into<String>) -> Self {
        QueuedResponse::Fail(kind, message.into())
    }
}

/// A scripted `DataSource`: pops one `QueuedResponse` per `execute` call, in
/// order, repeating the last entry once the queue is drained. Tracks
/// lifecycle calls so tests can assert the init/start/stop dance (§4.3
/// ephemeral driver algorithm, §8 panic/teardown properties).
pub struct FakeDataSource {
    responses: Mutex<Vec<QueuedResponse>>,
    cursor: AtomicUsize,
    init_calls: AtomicUsize,
    start_calls: AtomicUsize,
    stop_calls: AtomicUsize,
    execute_calls: AtomicUsize,
    health: HealthStatus,
}

impl FakeDataSource {
    pub fn new(responses: Vec<QueuedResponse>) -> Self {
        Self {
            responses: Mutex::new(responses),
            cursor: AtomicUsize::new(0),
            init_calls: AtomicUsize::new(0),
            start_calls: AtomicUsize::new(0),
            stop_calls: AtomicUsize::new(0),
            execute_calls: AtomicUsize::new(0),
            health: HealthStatus::Healthy,
        }
    }

    pub fn single(response: DriverResponse) -> Self {
        Self::new(vec![QueuedResponse::ok(response)])
    }

    pub fn with_health(mut self, health: HealthStatus) -> Self {
        self.health = health;
        self
    }

    pub fn init_calls(&self) -> usize {
        self.init_calls.load(Ordering::SeqCst)
    }

    pub fn start_calls(&self) -> usize {
        self.start_calls.load(Ordering::SeqCst)
    }

    pub fn stop_calls(&self) -> usize {
        self.stop_calls.load(Ordering::SeqCst)
    }

    pub fn execute_calls(&self) -> usize {
        self.execute_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DataSource for FakeDataSource {
    async fn init(&self, _descriptor: &DataSourceDescriptor) -> Result<(), EngineError> {
        self.init_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn start(&self) -> Result<(), EngineError> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn stop(&self) -> Result<(), EngineError> {
        self.stop_calls.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn execute(
        &self,
        _request: DriverRequest,
        _cancel: CancellationToken,
    ) -> Result<DriverResponse, EngineError> {
        self.execute_calls.fetch_add(1, Ordering::SeqCst);
        let responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            return Err(EngineError::data_source("fake data source has no queued responses"));
        }
        let idx = self.cursor.fetch_add(1, Ordering::SeqCst).min(responses.len() - 1);
        match responses[idx].clone() {
            QueuedResponse::Response(response) => Ok(response),
            QueuedResponse::Fail(kind, message) => Err(EngineError::new(kind, message)),
        }
    }

    async fn health_check(&self) -> HealthStatus {
        self.health.clone()
    }
}

/// A pass-through `QueryBuilder`: records the last request shape it built
/// and otherwise returns an empty `DriverRequest`, enough for tests that
/// only care that the right builder method was selected (§4.3 step 4).
#[derive(Default)]
pub struct FakeQueryBuilder;

impl FakeQueryBuilder {
    pub fn new() -> Self {
        Self
    }
}

impl QueryBuilder for FakeQueryBuilder {
    fn build_preview_request(&self, limit: i64) -> DriverRequest {
        DriverRequest::new().with_param("mode", "preview").with_param("limit", limit.to_string())
    }

    fn build_full_request(&self) -> DriverRequest {
        DriverRequest::new().with_param("mode", "full")
    }

    fn build_incremental_request(&self, params: &IncrementalParams) -> DriverRequest {
        DriverRequest::new()
            .with_param("mode", "incremental")
            .with_param("column", params.incremental_column.clone())
            .with_param("comparison", params.comparison.as_str())
            .with_param("last_sync_value", params.last_sync_value.as_str_lossy())
            .with_param("batch_size", params.batch_size.to_string())
    }

    fn build_paginated_request(&self, base: DriverRequest, page: &PageParams) -> DriverRequest {
        base.with_param(page.page_param.clone(), page.page.to_string())
            .with_param(page.size_param.clone(), page.page_size.to_string())
    }
}

/// Hands out one pre-registered `Arc<dyn DataSource>` per data source id,
/// marking every one of them as shared (never ephemeral) so `DataProcessor`
/// never calls `stop` on a driver a test still holds a handle to. Register
/// with `register_ephemeral` to exercise the ephemeral-driver stop path
/// instead (§4.3 step 2).
#[derive(Default)]
pub struct FakeDriverManager {
    drivers: Mutex<HashMap<String, Arc<dyn DataSource>>>,
    ephemeral: Mutex<HashMap<String, bool>>,
}

impl FakeDriverManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(self, data_source_id: &str, driver: Arc<dyn DataSource>) -> Self {
        self.drivers.lock().unwrap().insert(data_source_id.to_string(), driver);
        self
    }

    pub fn register_ephemeral(self, data_source_id: &str, driver: Arc<dyn DataSource>) -> Self {
        self.drivers.lock().unwrap().insert(data_source_id.to_string(), driver);
        self.ephemeral.lock().unwrap().insert(data_source_id.to_string(), true);
        self
    }
}

#[async_trait]
impl DriverManager for FakeDriverManager {
    async fn acquire(&self, descriptor: &DataSourceDescriptor) -> Result<Arc<dyn DataSource>, EngineError> {
        self.drivers
            .lock()
            .unwrap()
            .get(&descriptor.id)
            .cloned()
            .ok_or_else(|| EngineError::data_source(format!("no fake driver registered for '{}'", descriptor.id)))
    }

    async fn is_shared(&self, data_source_id: &str) -> bool {
        !self.ephemeral.lock().unwrap().get(data_source_id).copied().unwrap_or(false)
    }
}

/// Always returns a fresh `FakeQueryBuilder`, ignoring the descriptor and
/// interface it's asked to build for, unless `with_build_failure` has armed
/// a fault for the next `build` call.
#[derive(Default)]
pub struct FakeQueryBuilderFactory {
    fail_next_build: Mutex<bool>,
}

impl FakeQueryBuilderFactory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes the next `build` call return an error instead of a builder, to
    /// exercise the driver-release path on query-builder construction
    /// failure (§3 invariant 4).
    pub fn with_build_failure(self) -> Self {
        *self.fail_next_build.lock().unwrap() = true;
        self
    }
}

impl QueryBuilderFactory for FakeQueryBuilderFactory {
    fn build(
        &self,
        _descriptor: &DataSourceDescriptor,
        _interface: &InterfaceInfo,
    ) -> Result<Arc<dyn QueryBuilder>, EngineError> {
        let mut fail_next = self.fail_next_build.lock().unwrap();
        if *fail_next {
            *fail_next = false;
            return Err(EngineError::query("fake query builder construction failed"));
        }
        Ok(Arc::new(FakeQueryBuilder::new()))
    }
}
