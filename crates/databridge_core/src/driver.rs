use crate::value::Record;
use std::collections::HashMap;

/// Which synchronisation mode a `QueryBuilder` is building a request for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncMode {
    Full,
    Incremental,
}

impl SyncMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            SyncMode::Full => "full",
            SyncMode::Incremental => "incremental",
        }
    }
}

/// Pagination cursor/window passed to `QueryBuilder::build_sync_request_with_pagination`.
#[derive(Debug, Clone, PartialEq)]
pub struct PageParams {
    pub page_param: String,
    pub size_param: String,
    pub page: u64,
    pub page_size: u64,
}

/// Comparison operator used when filtering on the incremental column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ComparisonOp {
    Gt,
    Gte,
}

impl Default for ComparisonOp {
    fn default() -> Self {
        ComparisonOp::Gt
    }
}

impl ComparisonOp {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComparisonOp::Gt => "gt",
            ComparisonOp::Gte => "gte",
        }
    }
}

/// Parameters driving an incremental fetch: `WHERE incremental_column <op> last_sync_value`.
#[derive(Debug, Clone)]
pub struct IncrementalParams {
    pub last_sync_value: crate::value::Value,
    pub comparison: ComparisonOp,
    pub incremental_column: String,
    pub batch_size: u64,
}

impl IncrementalParams {
    pub fn new(last_sync_value: crate::value::Value, incremental_column: impl Into<String>) -> Self {
        Self {
            last_sync_value,
            comparison: ComparisonOp::default(),
            incremental_column: incremental_column.into(),
            batch_size: 1000,
        }
    }

    pub fn with_batch_size(mut self, batch_size: u64) -> Self {
        self.batch_size = batch_size;
        self
    }

    pub fn with_comparison(mut self, comparison: ComparisonOp) -> Self {
        self.comparison = comparison;
        self
    }
}

/// Opaque, driver-specific request built by a `QueryBuilder` and handed to
/// `DataSource::execute`. The engine never inspects its contents; it is a
/// pass-through capability the driver and its query builder agree on.
#[derive(Debug, Clone, Default)]
pub struct DriverRequest {
    pub params: HashMap<String, String>,
    pub body: Option<Record>,
}

impl DriverRequest {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_param(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(key.into(), value.into());
        self
    }
}

/// What a driver's `execute` call hands back, before normalisation (§4.3.1).
#[derive(Debug, Clone)]
pub struct DriverResponse {
    pub success: bool,
    pub message: String,
    pub error: Option<String>,
    pub data: ResponseData,
}

impl DriverResponse {
    pub fn ok(data: ResponseData) -> Self {
        Self {
            success: true,
            message: String::new(),
            error: None,
            data,
        }
    }

    pub fn failure(message: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: Some(error.into()),
            data: ResponseData::Empty,
        }
    }
}

/// The shapes a driver's `data` payload may take, per §4.3.1.
#[derive(Debug, Clone)]
pub enum ResponseData {
    Rows(Vec<Record>),
    Mixed(Vec<serde_json::Value>),
    Single(Record),
    Raw(Vec<u8>),
    Empty,
}

/// Health probe result from `DataSource::health_check`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Degraded(String),
    Unhealthy(String),
}
