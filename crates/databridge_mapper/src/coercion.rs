use crate::type_cache::FieldTypeCache;
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use databridge_core::{InterfaceInfoAccessor, Value};

const CANONICAL_TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.3f";

fn heuristic_type(column: &str) -> &'static str {
    let lower = column.to_lowercase();
    if ["time", "date", "created_at", "updated_at"].iter().any(|n| lower.contains(n)) {
        "timestamp"
    } else {
        "varchar"
    }
}

fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%SZ", "%Y-%m-%dT%H:%M:%S%.3fZ", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Some(DateTime::from_naive_utc_and_offset(naive, Utc));
        }
    }
    if let Ok(date) = NaiveDate::parse_from_str(s, "%Y-%m-%d") {
        return Some(DateTime::from_naive_utc_and_offset(date.and_time(NaiveTime::MIN), Utc));
    }
    None
}

fn coerce_timestamp(value: &Value) -> Value {
    match value {
        Value::Time(dt) => Value::Str(dt.format(CANONICAL_TIMESTAMP_FORMAT).to_string()),
        Value::Str(s) => match parse_timestamp(s) {
            Some(dt) => Value::Str(dt.format(CANONICAL_TIMESTAMP_FORMAT).to_string()),
            None => value.clone(),
        },
        other => other.clone(),
    }
}

fn coerce_integer(value: &Value) -> Value {
    match value {
        Value::Int(_) => value.clone(),
        Value::Float(f) => Value::Int(f.trunc() as i64),
        Value::Str(s) => {
            if s.contains('.') {
                s.parse::<f64>().map(|f| Value::Int(f.trunc() as i64)).unwrap_or_else(|_| value.clone())
            } else {
                s.parse::<i64>().map(Value::Int).unwrap_or_else(|_| value.clone())
            }
        }
        other => other.clone(),
    }
}

fn coerce_boolean(value: &Value) -> Value {
    match value {
        Value::Bool(_) => value.clone(),
        Value::Int(n) => Value::Bool(*n != 0),
        Value::Str(s) => match s.as_str() {
            "true" | "1" => Value::Bool(true),
            "false" | "0" => Value::Bool(false),
            _ => value.clone(),
        },
        other => other.clone(),
    }
}

fn coerce_string(value: &Value) -> Value {
    match value {
        Value::Str(_) => value.clone(),
        Value::Null => value.clone(),
        other => Value::Str(other.as_str_lossy()),
    }
}

/// `ProcessValueForDatabase(column, value, interface_info)` (§4.4 step 1-3).
pub fn process_value_for_database(
    cache: &FieldTypeCache,
    interface: &dyn InterfaceInfoAccessor,
    column: &str,
    value: &Value,
) -> Value {
    let declared = cache.declared_type(interface, column);
    let effective_type = declared.unwrap_or_else(|| heuristic_type(column).to_string());

    match effective_type.as_str() {
        "timestamp" | "datetime" => coerce_timestamp(value),
        "integer" | "int" | "bigint" | "smallint" => coerce_integer(value),
        "boolean" | "bool" => coerce_boolean(value),
        "varchar" | "text" | "string" | "char" => coerce_string(value),
        _ => value.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_core::{FieldDescriptor, InterfaceInfo, InterfaceRecord, ParseConfig};

    fn interface_with_fields(fields: Vec<FieldDescriptor>) -> InterfaceInfo {
        InterfaceInfo::Basic {
            record: InterfaceRecord {
                id: "if-1".to_string(),
                name: "orders".to_string(),
                schema_name: None,
                table_name: "orders".to_string(),
                interface_config: serde_json::json!({}),
                parse_config: ParseConfig::default(),
                table_fields: fields,
                table_created: true,
            },
            data_source_id: "ds-1".to_string(),
        }
    }

    #[test]
    fn timestamp_coerces_to_canonical_format() {
        let cache = FieldTypeCache::new();
        let info = interface_with_fields(vec![FieldDescriptor {
            name: "created_at".to_string(),
            declared_type: "timestamp".to_string(),
        }]);
        let value = Value::Str("2024-01-15T10:30:00Z".to_string());
        let result = process_value_for_database(&cache, &info, "created_at", &value);
        assert_eq!(result, Value::Str("2024-01-15 10:30:00.000".to_string()));
    }

    #[test]
    fn unparseable_timestamp_string_passes_through() {
        let cache = FieldTypeCache::new();
        let info = interface_with_fields(vec![FieldDescriptor {
            name: "created_at".to_string(),
            declared_type: "timestamp".to_string(),
        }]);
        let value = Value::Str("not-a-date".to_string());
        let result = process_value_for_database(&cache, &info, "created_at", &value);
        assert_eq!(result, value);
    }

    #[test]
    fn integer_truncates_float_toward_zero() {
        let cache = FieldTypeCache::new();
        let info = interface_with_fields(vec![FieldDescriptor {
            name: "qty".to_string(),
            declared_type: "integer".to_string(),
        }]);
        let result = process_value_for_database(&cache, &info, "qty", &Value::Float(-3.9));
        assert_eq!(result, Value::Int(-3));
    }

    #[test]
    fn boolean_parses_one_and_zero() {
        let cache = FieldTypeCache::new();
        let info = interface_with_fields(vec![FieldDescriptor {
            name: "active".to_string(),
            declared_type: "boolean".to_string(),
        }]);
        assert_eq!(
            process_value_for_database(&cache, &info, "active", &Value::Str("1".to_string())),
            Value::Bool(true)
        );
        assert_eq!(
            process_value_for_database(&cache, &info, "active", &Value::Str("0".to_string())),
            Value::Bool(false)
        );
    }

    #[test]
    fn unknown_column_falls_back_to_heuristics() {
        let cache = FieldTypeCache::new();
        let info = interface_with_fields(vec![]);
        let result = process_value_for_database(&cache, &info, "updated_at", &Value::Str("2024-01-15 10:30:00".to_string()));
        assert_eq!(result, Value::Str("2024-01-15 10:30:00.000".to_string()));
    }
}
