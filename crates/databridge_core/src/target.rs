use crate::error::EngineError;
use crate::interface::FieldDescriptor;

/// The resolved write target for a sync run: which table, under which
/// schema, keyed by which columns. Built once per run from the interface's
/// catalog record (§4.5) and then threaded through the sync strategies.
#[derive(Debug, Clone)]
pub struct TableTarget {
    pub schema: Option<String>,
    pub table_name: String,
    pub primary_keys: Vec<String>,
    pub columns: Vec<FieldDescriptor>,
}

impl TableTarget {
    /// Validates the invariants §4.5 requires before any write is attempted:
    /// a non-empty table name, at least one column, and at least one primary
    /// key (the `["id"]` fallback some drivers use is deliberately not
    /// applied here — see the design note on this decision).
    pub fn validate(&self) -> Result<(), EngineError> {
        if self.table_name.trim().is_empty() {
            return Err(EngineError::validation("table_name must not be empty"));
        }
        if self.columns.is_empty() {
            return Err(EngineError::validation("table target must declare at least one column"));
        }
        if self.primary_keys.is_empty() {
            return Err(EngineError::validation(format!(
                "table target '{}' declares no primary key; upsert/incremental writes require one",
                self.table_name
            )));
        }
        for pk in &self.primary_keys {
            if !self.columns.iter().any(|c| &c.name == pk) {
                return Err(EngineError::validation(format!(
                    "primary key '{pk}' is not among the declared columns for '{}'",
                    self.table_name
                )));
            }
        }
        Ok(())
    }

    pub fn qualified_name(&self) -> String {
        match &self.schema {
            Some(schema) => format!("{schema}.{}", self.table_name),
            None => self.table_name.clone(),
        }
    }
}
