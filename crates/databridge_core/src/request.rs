use crate::interface::InterfaceType;
use crate::value::Value;
use serde_json::Value as Json;
use std::collections::HashMap;

/// The four user-visible verbs, per §2 and §4.6.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExecuteType {
    Preview,
    Test,
    Sync,
    IncrementalSync,
}

impl ExecuteType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "preview" => Some(ExecuteType::Preview),
            "test" => Some(ExecuteType::Test),
            "sync" => Some(ExecuteType::Sync),
            "incremental_sync" => Some(ExecuteType::IncrementalSync),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ExecuteType::Preview => "preview",
            ExecuteType::Test => "test",
            ExecuteType::Sync => "sync",
            ExecuteType::IncrementalSync => "incremental_sync",
        }
    }
}

/// The three sync strategies a `sync` verb can resolve to, per §4.5.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStrategy {
    Full,
    Incremental,
    Realtime,
}

impl SyncStrategy {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "full" => Some(SyncStrategy::Full),
            "incremental" => Some(SyncStrategy::Incremental),
            "realtime" => Some(SyncStrategy::Realtime),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SyncStrategy::Full => "full",
            SyncStrategy::Incremental => "incremental",
            SyncStrategy::Realtime => "realtime",
        }
    }
}

/// The request surface from §6, named identically to the language-neutral
/// field names there.
#[derive(Debug, Clone)]
pub struct ExecuteRequest {
    pub interface_id: String,
    pub interface_type: InterfaceType,
    pub execute_type: ExecuteType,
    pub sync_strategy: Option<SyncStrategy>,
    pub parameters: HashMap<String, Json>,
    pub options: HashMap<String, Json>,
    pub limit: Option<i64>,
    pub last_sync_time: Option<Value>,
    pub incremental_key: Option<String>,
    pub batch_size: Option<u64>,
}

impl ExecuteRequest {
    pub fn new(interface_id: impl Into<String>, interface_type: InterfaceType, execute_type: ExecuteType) -> Self {
        Self {
            interface_id: interface_id.into(),
            interface_type,
            execute_type,
            sync_strategy: None,
            parameters: HashMap::new(),
            options: HashMap::new(),
            limit: None,
            last_sync_time: None,
            incremental_key: None,
            batch_size: None,
        }
    }
}
