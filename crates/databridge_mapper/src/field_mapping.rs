use databridge_core::Record;
use indexmap::IndexMap;
use serde_json::Value as Json;

/// Parsed `field_mapping`, normalised to a `source -> target` rename table
/// regardless of which of the two wire shapes it arrived in (§4.4).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldMapping {
    source_to_target: IndexMap<String, String>,
}

impl FieldMapping {
    /// Array form: `[{"source": "...", "target": "..."}, ...]`.
    /// Object form (legacy): `{"target": "source", ...}` — same semantics,
    /// inverted lookup.
    pub fn parse(config: Option<&Json>) -> Self {
        let mut source_to_target = IndexMap::new();
        match config {
            Some(Json::Array(entries)) => {
                for entry in entries {
                    let source = entry.get("source").and_then(Json::as_str);
                    let target = entry.get("target").and_then(Json::as_str);
                    if let (Some(source), Some(target)) = (source, target) {
                        source_to_target.insert(source.to_string(), target.to_string());
                    }
                }
            }
            Some(Json::Object(map)) => {
                for (target, source) in map {
                    if let Some(source) = source.as_str() {
                        source_to_target.insert(source.to_string(), target.clone());
                    }
                }
            }
            _ => {}
        }
        Self { source_to_target }
    }

    /// Renames mapped columns; columns with no mapping entry pass through
    /// unchanged. Preserves row field order.
    pub fn apply(&self, row: &Record) -> Record {
        let mut out = Record::with_capacity(row.len());
        for (column, value) in row {
            let target = self.source_to_target.get(column).cloned().unwrap_or_else(|| column.clone());
            out.insert(target, value.clone());
        }
        out
    }

    pub fn target_for(&self, source_column: &str) -> Option<&str> {
        self.source_to_target.get(source_column).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_core::Value;

    fn row() -> Record {
        let mut r = Record::new();
        r.insert("cust_id".to_string(), Value::Int(1));
        r.insert("amount".to_string(), Value::Float(9.5));
        r
    }

    #[test]
    fn array_and_object_forms_agree() {
        let array = FieldMapping::parse(Some(&serde_json::json!([
            {"source": "cust_id", "target": "customer_id"}
        ])));
        let object = FieldMapping::parse(Some(&serde_json::json!({
            "customer_id": "cust_id"
        })));
        assert_eq!(array.apply(&row()), object.apply(&row()));
    }

    #[test]
    fn unmapped_columns_pass_through() {
        let mapping = FieldMapping::parse(Some(&serde_json::json!([
            {"source": "cust_id", "target": "customer_id"}
        ])));
        let mapped = mapping.apply(&row());
        assert!(mapped.contains_key("amount"));
        assert!(mapped.contains_key("customer_id"));
        assert!(!mapped.contains_key("cust_id"));
    }

    #[test]
    fn absent_config_is_identity() {
        let mapping = FieldMapping::parse(None);
        assert_eq!(mapping.apply(&row()), row());
    }
}
