use crate::error_detail::ErrorDetail;
use crate::request::ExecuteType;
use crate::run_id::RunId;
use crate::value::Record;
use serde_json::Value as Json;
use std::collections::HashMap;

/// The response surface from §6. `metadata` is the catch-all extension point
/// callers use for strategy-specific detail (e.g. a `sync_result` entry
/// holding the structured `SyncResult` from a `sync`/`incremental_sync` run).
#[derive(Debug, Clone)]
pub struct ExecuteResponse {
    pub run_id: RunId,
    pub success: bool,
    pub message: String,
    pub duration_ms: u64,
    pub execute_type: ExecuteType,
    pub data: Vec<Record>,
    pub row_count: u64,
    pub column_count: u64,
    pub data_types: HashMap<String, String>,
    pub table_updated: bool,
    pub updated_rows: u64,
    pub error: Option<ErrorDetail>,
    pub warnings: Vec<String>,
    pub metadata: HashMap<String, Json>,
}

impl ExecuteResponse {
    pub fn empty(execute_type: ExecuteType) -> Self {
        Self {
            run_id: RunId::new(),
            success: true,
            message: String::new(),
            duration_ms: 0,
            execute_type,
            data: Vec::new(),
            row_count: 0,
            column_count: 0,
            data_types: HashMap::new(),
            table_updated: false,
            updated_rows: 0,
            error: None,
            warnings: Vec::new(),
            metadata: HashMap::new(),
        }
    }

    pub fn failure(execute_type: ExecuteType, error: ErrorDetail) -> Self {
        Self {
            success: false,
            message: error.message.clone(),
            error: Some(error),
            ..Self::empty(execute_type)
        }
    }
}
