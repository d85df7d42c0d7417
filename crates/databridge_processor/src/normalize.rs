use databridge_core::{Record, ResponseData, Value};

/// Response normalisation (spec §4.3.1): whatever shape a driver's `data`
/// payload takes, reduce it to a list of record maps.
///
/// - `Rows` passes through unchanged.
/// - `Mixed` retains only the map-shaped elements, discarding scalars.
/// - `Single` is wrapped in a one-element list.
/// - `Raw` is JSON-decoded and retried as one of the three shapes above.
/// - anything else (a raw scalar, unparseable bytes) yields an empty list.
pub fn normalize(data: ResponseData) -> Vec<Record> {
    match data {
        ResponseData::Rows(rows) => rows,
        ResponseData::Mixed(values) => values
            .into_iter()
            .filter_map(|v| match Value::from_json(v) {
                Value::Map(record) => Some(record),
                _ => None,
            })
            .collect(),
        ResponseData::Single(record) => vec![record],
        ResponseData::Raw(bytes) => match serde_json::from_slice::<serde_json::Value>(&bytes) {
            Ok(serde_json::Value::Array(items)) => items
                .into_iter()
                .filter_map(|v| match Value::from_json(v) {
                    Value::Map(record) => Some(record),
                    _ => None,
                })
                .collect(),
            Ok(obj @ serde_json::Value::Object(_)) => match Value::from_json(obj) {
                Value::Map(record) => vec![record],
                _ => Vec::new(),
            },
            _ => Vec::new(),
        },
        ResponseData::Empty => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rows_pass_through() {
        let mut row = Record::new();
        row.insert("id".to_string(), Value::Int(1));
        let normalized = normalize(ResponseData::Rows(vec![row.clone()]));
        assert_eq!(normalized, vec![row]);
    }

    #[test]
    fn mixed_discards_non_map_elements() {
        let values = vec![serde_json::json!({"id": 1}), serde_json::json!("scalar"), serde_json::json!(5)];
        let normalized = normalize(ResponseData::Mixed(values));
        assert_eq!(normalized.len(), 1);
    }

    #[test]
    fn single_is_wrapped() {
        let mut row = Record::new();
        row.insert("id".to_string(), Value::Int(1));
        let normalized = normalize(ResponseData::Single(row));
        assert_eq!(normalized.len(), 1);
    }

    #[test]
    fn raw_bytes_decode_then_retry_as_list() {
        let bytes = serde_json::to_vec(&serde_json::json!([{"id": 1}, {"id": 2}])).unwrap();
        let normalized = normalize(ResponseData::Raw(bytes));
        assert_eq!(normalized.len(), 2);
    }

    #[test]
    fn raw_bytes_single_object() {
        let bytes = serde_json::to_vec(&serde_json::json!({"id": 1})).unwrap();
        let normalized = normalize(ResponseData::Raw(bytes));
        assert_eq!(normalized.len(), 1);
    }

    #[test]
    fn empty_yields_empty_list() {
        assert!(normalize(ResponseData::Empty).is_empty());
    }

    #[test]
    fn unparseable_raw_bytes_yield_empty_list() {
        assert!(normalize(ResponseData::Raw(vec![0xff, 0x00])).is_empty());
    }
}
