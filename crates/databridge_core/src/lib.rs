#![allow(clippy::result_large_err)]

mod data_source;
mod driver;
mod error;
mod error_detail;
mod interface;
mod request;
mod response;
mod run_id;
mod sync_result;
mod target;
mod traits;
mod value;

pub use data_source::{DataSourceCategory, DataSourceDescriptor};
pub use driver::{
    ComparisonOp, DriverRequest, DriverResponse, HealthStatus, IncrementalParams, PageParams,
    ResponseData, SyncMode,
};
pub use error::{EngineError, ErrorKind};
pub use error_detail::{ErrorDetail, Severity};
pub use interface::{
    FieldDescriptor, InterfaceInfo, InterfaceInfoAccessor, InterfaceRecord, InterfaceType,
    ParseConfig,
};
pub use request::{ExecuteRequest, ExecuteType, SyncStrategy};
pub use response::ExecuteResponse;
pub use run_id::RunId;
pub use sync_result::{SyncCounts, SyncResult};
pub use target::TableTarget;
pub use traits::{
    Catalog, DataSource, DriverManager, QueryBuilder, QueryBuilderFactory, Transaction,
    TransactionProvider, WatermarkQuery, WriteStatement,
};
pub use value::{Record, Value};

pub use chrono;
pub use tokio_util::sync::CancellationToken;
