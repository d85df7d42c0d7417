use serde_json::Value as Json;

/// Broad classification of a data source, used to pick pagination parameter
/// names (§4.3.3) and, eventually, a driver factory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSourceCategory {
    Database,
    Api,
    Other(String),
}

impl DataSourceCategory {
    pub fn parse(s: &str) -> Self {
        match s {
            "database" => DataSourceCategory::Database,
            "api" => DataSourceCategory::Api,
            other => DataSourceCategory::Other(other.to_string()),
        }
    }
}

/// Catalog record describing an external data source. Immutable for the
/// duration of a run; the concrete connection config is driver-specific and
/// therefore left as an opaque JSON blob (§1 Non-goals: the engine never
/// defines driver wire formats).
#[derive(Debug, Clone)]
pub struct DataSourceDescriptor {
    pub id: String,
    pub category: DataSourceCategory,
    pub driver_type: String,
    pub connection_config: Json,
    pub driver_params: Json,
}
