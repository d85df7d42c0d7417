use crate::data_source::DataSourceDescriptor;
use crate::driver::{DriverRequest, DriverResponse, HealthStatus, IncrementalParams, PageParams};
use crate::error::EngineError;
use crate::interface::InterfaceInfo;
use crate::value::Record;
use async_trait::async_trait;
use std::sync::Arc;
use tokio_util::sync::CancellationToken;

/// A live connection to one external system, reused across calls to
/// `Execute` as long as it stays healthy (§5 Concurrency model).
///
/// Methods take `&self` rather than `&mut self`: the engine may hold the
/// same `Arc<dyn DataSource>` across concurrent runs against the same
/// catalog entry, so any mutable state a concrete driver needs (pooled
/// connections, an HTTP client) must be managed with interior mutability.
#[async_trait]
pub trait DataSource: Send + Sync {
    async fn init(&self, descriptor: &DataSourceDescriptor) -> Result<(), EngineError>;
    async fn start(&self) -> Result<(), EngineError>;
    async fn stop(&self) -> Result<(), EngineError>;
    async fn execute(&self, request: DriverRequest, cancel: CancellationToken) -> Result<DriverResponse, EngineError>;
    async fn health_check(&self) -> HealthStatus;
}

/// Builds driver requests for one interface's external query, per the
/// strategy the caller is running (§4.3.2, §4.5).
pub trait QueryBuilder: Send + Sync {
    fn build_preview_request(&self, limit: i64) -> DriverRequest;
    fn build_full_request(&self) -> DriverRequest;
    fn build_incremental_request(&self, params: &IncrementalParams) -> DriverRequest;
    fn build_paginated_request(&self, base: DriverRequest, page: &PageParams) -> DriverRequest;
}

/// Read-only lookups against the system catalog (§4.2).
#[async_trait]
pub trait Catalog: Send + Sync {
    async fn get_interface(&self, interface_id: &str) -> Result<InterfaceInfo, EngineError>;
    async fn get_data_source(&self, data_source_id: &str) -> Result<DataSourceDescriptor, EngineError>;
}

/// A write primitive a `Transaction` can execute, described structurally
/// rather than as raw SQL so that fakes can implement it without a SQL
/// engine, and so that a real implementation can still render it through
/// whatever query builder the target database needs.
#[derive(Debug, Clone)]
pub enum WriteStatement {
    /// Ensure the target table exists with (at least) the given columns.
    EnsureSchema {
        table: String,
        schema: Option<String>,
        columns: Vec<crate::interface::FieldDescriptor>,
    },
    /// Remove every row from the target table (used by full-sync's
    /// truncate-then-insert path, §4.5).
    DeleteAll { table: String, schema: Option<String> },
    /// Append rows verbatim.
    Insert {
        table: String,
        schema: Option<String>,
        rows: Vec<Record>,
    },
    /// Insert rows that don't already exist by primary key, update those
    /// that do.
    Upsert {
        table: String,
        schema: Option<String>,
        primary_keys: Vec<String>,
        rows: Vec<Record>,
    },
}

/// One transactional unit of work against the target store. Every sync
/// strategy runs entirely inside a single `Transaction` so a mid-batch
/// driver failure rolls back cleanly (§4.5, §8 scenario S5).
#[async_trait]
pub trait Transaction: Send + Sync {
    async fn execute_write(&self, statement: WriteStatement) -> Result<u64, EngineError>;
    async fn commit(self: Box<Self>) -> Result<(), EngineError>;
    async fn rollback(self: Box<Self>) -> Result<(), EngineError>;
}

/// Opens transactions against the target store the catalog resolves an
/// interface's table to.
#[async_trait]
pub trait TransactionProvider: Send + Sync {
    async fn begin(&self) -> Result<Box<dyn Transaction>, EngineError>;
}

/// Reads the current high-water mark of one column in the target table
/// (§4.6.3's watermark resolution). Deliberately separate from
/// `TransactionProvider`: it is a plain read against the target store,
/// never wrapped in the run's write transaction, and a watermark query
/// failure degrades the caller to a full sync rather than failing the run.
#[async_trait]
pub trait WatermarkQuery: Send + Sync {
    async fn max_value(
        &self,
        schema: Option<&str>,
        table: &str,
        column: &str,
    ) -> Result<Option<crate::value::Value>, EngineError>;
}

/// Builds the right `QueryBuilder` for one `(data source, interface)` pair
/// (§4.3 step 3). A concrete implementation knows, e.g., that a `postgres`
/// data source needs a SQL-building `QueryBuilder` while an `api` one needs
/// an HTTP-request builder; the engine itself never chooses between them.
pub trait QueryBuilderFactory: Send + Sync {
    fn build(
        &self,
        descriptor: &DataSourceDescriptor,
        interface: &InterfaceInfo,
    ) -> Result<Arc<dyn QueryBuilder>, EngineError>;
}

/// Resolves a `DataSourceDescriptor` to a live, started `DataSource`,
/// reusing one already running for that data source id where possible and
/// otherwise spinning up an ephemeral instance the caller is responsible
/// for stopping once done (§4.3 algorithm).
#[async_trait]
pub trait DriverManager: Send + Sync {
    async fn acquire(&self, descriptor: &DataSourceDescriptor) -> Result<Arc<dyn DataSource>, EngineError>;

    /// True if `acquire` returned a driver owned by the manager's registry
    /// (the caller must not stop it); false if it is ephemeral and the
    /// caller is responsible for calling `stop` once it is done with it.
    async fn is_shared(&self, data_source_id: &str) -> bool;
}
