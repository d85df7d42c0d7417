use databridge_catalog::CatalogConfig;
use databridge_core::{EngineError, InterfaceInfo, InterfaceInfoAccessor, Record, TableTarget};
use databridge_sync::{resolve_target, TableTargetSpec};

/// Builds the `TableTarget` a sync write needs from the interface's catalog
/// record: primary keys must be declared explicitly (spec.md §9 design
/// note), columns come from the declared table-fields config when present
/// and are otherwise inferred from `rows`' shape (§4.5).
pub fn build_target(interface: &InterfaceInfo, rows: &[Record]) -> Result<TableTarget, EngineError> {
    let primary_keys = interface.primary_keys();
    if primary_keys.is_empty() {
        return Err(EngineError::validation(format!(
            "interface '{}' declares no primary_keys; sync writes require an explicit declaration",
            interface.id()
        )));
    }

    let columns = if interface.table_fields_config().is_empty() {
        None
    } else {
        Some(interface.table_fields_config().to_vec())
    };

    let spec = TableTargetSpec {
        schema: interface.schema_name().map(str::to_string),
        table_name: interface.table_name().to_string(),
        primary_keys,
        columns,
    };
    Ok(resolve_target(spec, rows))
}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_test_support::{basic_interface, record};
    use databridge_core::Value;

    #[test]
    fn rejects_interface_with_no_declared_primary_keys() {
        let interface = basic_interface("if-1", "orders", "ds-1", vec![], true);
        let rows = vec![record(vec![("id", Value::Int(1))])];
        assert!(build_target(&interface, &rows).is_err());
    }
}
