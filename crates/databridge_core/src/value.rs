use chrono::{DateTime, Utc};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Dynamic value carried through the fetch -> map -> write pipeline.
///
/// The source systems hand the engine `map[string]any`-shaped records; this
/// enum is the statically typed stand-in so every downstream component
/// (type inference, coercion, transactional writes) matches on a closed set
/// of variants instead of re-inspecting `serde_json::Value` everywhere.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Null,
    Bool(bool),
    Int(i64),
    Float(f64),
    Str(String),
    Bytes(Vec<u8>),
    Time(DateTime<Utc>),
    Nested(Vec<Value>),
    Map(Record),
}

/// A single source/target record: an ordered map from column name to value.
///
/// Ordering is preserved (via `IndexMap`) so that deriving target columns
/// from the first record (§4.5 `TableTarget` column derivation) produces a
/// stable column order instead of hash order.
pub type Record = IndexMap<String, Value>;

impl Value {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    /// Best-effort string form, used for logging and column-name heuristics.
    /// Not a coercion — see `databridge_mapper::coercion` for that.
    pub fn as_str_lossy(&self) -> String {
        match self {
            Value::Null => String::new(),
            Value::Bool(b) => b.to_string(),
            Value::Int(i) => i.to_string(),
            Value::Float(f) => f.to_string(),
            Value::Str(s) => s.clone(),
            Value::Bytes(b) => format!("<{} bytes>", b.len()),
            Value::Time(t) => t.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            Value::Nested(_) => "<nested>".to_string(),
            Value::Map(_) => "<object>".to_string(),
        }
    }

    /// Converts a decoded JSON value into our `Value` enum, used by response
    /// normalisation (§4.3.1) when a driver hands back raw JSON bytes.
    pub fn from_json(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    Value::Int(i)
                } else {
                    Value::Float(n.as_f64().unwrap_or_default())
                }
            }
            serde_json::Value::String(s) => Value::Str(s),
            serde_json::Value::Array(items) => {
                Value::Nested(items.into_iter().map(Value::from_json).collect())
            }
            serde_json::Value::Object(map) => {
                let mut record = Record::new();
                for (k, v) in map {
                    record.insert(k, Value::from_json(v));
                }
                Value::Map(record)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_json_preserves_object_field_order() {
        let json: serde_json::Value = serde_json::from_str(r#"{"b": 1, "a": 2, "c": 3}"#).unwrap();
        let Value::Map(record) = Value::from_json(json) else {
            panic!("expected a map");
        };
        let keys: Vec<&str> = record.keys().map(String::as_str).collect();
        assert_eq!(keys, vec!["b", "a", "c"]);
    }

    #[test]
    fn from_json_distinguishes_int_and_float() {
        assert_eq!(Value::from_json(serde_json::json!(5)), Value::Int(5));
        assert_eq!(Value::from_json(serde_json::json!(5.5)), Value::Float(5.5));
    }

    #[test]
    fn null_is_null() {
        assert!(Value::Null.is_null());
        assert!(!Value::Int(0).is_null());
    }
}
