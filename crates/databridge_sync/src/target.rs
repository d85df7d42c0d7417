use databridge_core::{FieldDescriptor, Record, TableTarget};
use databridge_processor::infer_schema_types;

/// What the caller supplies up front for a sync run's write target; the
/// column list is filled in from the first record when not given explicitly
/// (§4.5 `TableTarget` validation / column derivation).
pub struct TableTargetSpec {
    pub schema: Option<String>,
    pub table_name: String,
    pub primary_keys: Vec<String>,
    pub columns: Option<Vec<FieldDescriptor>>,
}

/// Resolves a `TableTargetSpec` into a concrete `TableTarget`, deriving
/// columns from `rows`' first record (via the all-rows type-inference
/// variant, §4.3.2) when none were supplied explicitly.
pub fn resolve_target(spec: TableTargetSpec, rows: &[Record]) -> TableTarget {
    let columns = spec.columns.unwrap_or_else(|| infer_schema_types(rows));
    TableTarget {
        schema: spec.schema,
        table_name: spec.table_name,
        primary_keys: spec.primary_keys,
        columns,
    }
}
