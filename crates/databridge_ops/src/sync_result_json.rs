use databridge_core::{SyncResult, Value};
use serde_json::Value as Json;

fn value_to_json(value: &Value) -> Json {
    match value {
        Value::Null => Json::Null,
        Value::Bool(b) => Json::Bool(*b),
        Value::Int(i) => Json::Number((*i).into()),
        Value::Float(f) => serde_json::Number::from_f64(*f).map(Json::Number).unwrap_or(Json::Null),
        Value::Str(s) => Json::String(s.clone()),
        Value::Time(t) => Json::String(t.to_rfc3339()),
        other => Json::String(other.as_str_lossy()),
    }
}

/// Folds a `SyncResult` into the `ExecuteResponse::metadata["sync_result"]`
/// entry (SPEC_FULL §4 supplemented feature).
pub fn sync_result_to_json(result: &SyncResult) -> Json {
    serde_json::json!({
        "fetched": result.counts.fetched,
        "inserted": result.counts.inserted,
        "updated": result.counts.updated,
        "deleted": result.counts.deleted,
        "skipped": result.counts.skipped,
        "failed": result.counts.failed,
        "pages_fetched": result.pages_fetched,
        "new_watermark": result.new_watermark.as_ref().map(value_to_json),
        "warnings": result.warnings,
    })
}
