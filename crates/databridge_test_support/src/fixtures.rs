use databridge_core::{
    DataSourceCategory, DataSourceDescriptor, FieldDescriptor, InterfaceInfo, InterfaceRecord,
    ParseConfig, Record, Value,
};

/// Builds a `Record` from `(column, value)` pairs, preserving insertion
/// order the way a driver response would.
pub fn record(fields: Vec<(&str, Value)>) -> Record {
    let mut r = Record::new();
    for (k, v) in fields {
        r.insert(k.to_string(), v);
    }
    r
}

/// A base-library `InterfaceInfo` wired to `data_source_id`, with the given
/// table fields and `table_created` flag.
pub fn basic_interface(
    id: &str,
    table_name: &str,
    data_source_id: &str,
    table_fields: Vec<FieldDescriptor>,
    table_created: bool,
) -> InterfaceInfo {
    InterfaceInfo::Basic {
        record: InterfaceRecord {
            id: id.to_string(),
            name: table_name.to_string(),
            schema_name: Some("public".to_string()),
            table_name: table_name.to_string(),
            interface_config: serde_json::json!({}),
            parse_config: ParseConfig::default(),
            table_fields,
            table_created,
        },
        data_source_id: data_source_id.to_string(),
    }
}

/// A base-library `InterfaceInfo` like [`basic_interface`], but with an
/// explicit `interface_config` blob for exercising `incremental_config`,
/// `limit_config`, or `primary_keys`-reading call sites.
#[allow(clippy::too_many_arguments)]
pub fn basic_interface_with_config(
    id: &str,
    table_name: &str,
    data_source_id: &str,
    table_fields: Vec<FieldDescriptor>,
    table_created: bool,
    interface_config: serde_json::Value,
) -> InterfaceInfo {
    InterfaceInfo::Basic {
        record: InterfaceRecord {
            id: id.to_string(),
            name: table_name.to_string(),
            schema_name: Some("public".to_string()),
            table_name: table_name.to_string(),
            interface_config,
            parse_config: ParseConfig::default(),
            table_fields,
            table_created,
        },
        data_source_id: data_source_id.to_string(),
    }
}

/// A thematic-library `InterfaceInfo` (computed over base tables, no data
/// source of its own — §4.2).
pub fn thematic_interface(id: &str, table_name: &str, table_fields: Vec<FieldDescriptor>) -> InterfaceInfo {
    InterfaceInfo::Thematic {
        record: InterfaceRecord {
            id: id.to_string(),
            name: table_name.to_string(),
            schema_name: Some("public".to_string()),
            table_name: table_name.to_string(),
            interface_config: serde_json::json!({}),
            parse_config: ParseConfig::default(),
            table_fields,
            table_created: true,
        },
    }
}

/// A `database`-category data source descriptor.
pub fn descriptor(id: &str, category: DataSourceCategory) -> DataSourceDescriptor {
    DataSourceDescriptor {
        id: id.to_string(),
        category,
        driver_type: "fake".to_string(),
        connection_config: serde_json::json!({}),
        driver_params: serde_json::json!({}),
    }
}
