use chrono::NaiveDateTime;
use databridge_core::{FieldDescriptor, Record, Value};
use std::collections::HashMap;

const DATETIME_FORMATS: &[&str] = &[
    "%Y-%m-%dT%H:%M:%SZ",
    "%Y-%m-%dT%H:%M:%S",
    "%Y-%m-%d %H:%M:%S",
    "%Y-%m-%d",
    "%H:%M:%S",
];

fn looks_like_datetime(s: &str) -> bool {
    DATETIME_FORMATS.iter().any(|fmt| NaiveDateTime::parse_from_str(s, fmt).is_ok())
        || chrono::NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || chrono::NaiveTime::parse_from_str(s, "%H:%M:%S").is_ok()
}

/// A single value's inferred tag, per spec §4.3.2's first-row strategy.
fn infer_tag(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Int(_) => "integer",
        Value::Float(_) => "float",
        Value::Str(s) if looks_like_datetime(s) => "datetime",
        Value::Str(_) => "string",
        Value::Time(_) => "datetime",
        Value::Bytes(_) | Value::Nested(_) | Value::Map(_) => "object",
    }
}

/// First-row type inference (§4.3.2): assigns a tag to every column of the
/// first row. An empty row set yields an empty map.
pub fn infer_types_first_row(rows: &[Record]) -> HashMap<String, String> {
    let Some(first) = rows.first() else {
        return HashMap::new();
    };
    first.iter().map(|(col, value)| (col.clone(), infer_tag(value).to_string())).collect()
}

/// Maps a first-row tag family to a schema-creation type, per the wider
/// "all-rows" variant used when assuring a target table's schema (§4.3.2,
/// §4.5). Scans every row so a column that is null in row one but typed
/// elsewhere still gets a real type instead of defaulting to `TEXT`.
fn schema_tag_for_column(rows: &[Record], column: &str) -> &'static str {
    for row in rows {
        if let Some(value) = row.get(column) {
            match value {
                Value::Null => continue,
                Value::Bool(_) => return "BOOLEAN",
                Value::Int(_) => return "INTEGER",
                Value::Float(_) => return "REAL",
                Value::Str(s) if looks_like_datetime(s) => return "DATETIME",
                _ => return "TEXT",
            }
        }
    }
    "TEXT"
}

/// Infers schema-creation types across every row, defaulting absent or
/// always-null columns to `TEXT` (§4.3.2). Column order follows the first
/// row's field order, matching `TableTarget`'s column derivation.
pub fn infer_schema_types(rows: &[Record]) -> Vec<FieldDescriptor> {
    let Some(first) = rows.first() else {
        return Vec::new();
    };
    first
        .keys()
        .map(|column| FieldDescriptor {
            name: column.clone(),
            declared_type: schema_tag_for_column(rows, column).to_string(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(fields: Vec<(&str, Value)>) -> Record {
        let mut r = Record::new();
        for (k, v) in fields {
            r.insert(k.to_string(), v);
        }
        r
    }

    #[test]
    fn infers_primitive_families() {
        let rows = vec![row(vec![
            ("id", Value::Int(1)),
            ("price", Value::Float(9.5)),
            ("active", Value::Bool(true)),
            ("name", Value::Str("widget".to_string())),
            ("deleted_at", Value::Null),
        ])];
        let types = infer_types_first_row(&rows);
        assert_eq!(types.get("id").map(String::as_str), Some("integer"));
        assert_eq!(types.get("price").map(String::as_str), Some("float"));
        assert_eq!(types.get("active").map(String::as_str), Some("boolean"));
        assert_eq!(types.get("name").map(String::as_str), Some("string"));
        assert_eq!(types.get("deleted_at").map(String::as_str), Some("null"));
    }

    #[test]
    fn infers_datetime_from_known_formats() {
        let rows = vec![row(vec![("created_at", Value::Str("2023-01-02T03:04:05Z".to_string()))])];
        let types = infer_types_first_row(&rows);
        assert_eq!(types.get("created_at").map(String::as_str), Some("datetime"));
    }

    #[test]
    fn empty_rows_yield_empty_map() {
        assert!(infer_types_first_row(&[]).is_empty());
    }

    #[test]
    fn schema_types_skip_null_rows_for_real_type() {
        let rows = vec![
            row(vec![("qty", Value::Null)]),
            row(vec![("qty", Value::Int(3))]),
        ];
        let schema = infer_schema_types(&rows);
        assert_eq!(schema[0].declared_type, "INTEGER");
    }

    #[test]
    fn schema_types_default_to_text_when_always_null() {
        let rows = vec![row(vec![("notes", Value::Null)])];
        let schema = infer_schema_types(&rows);
        assert_eq!(schema[0].declared_type, "TEXT");
    }
}
