use databridge_core::{EngineError, ExecuteRequest, ExecuteType};

/// Request-shape checks the Executor Facade runs before ever touching the
/// catalog (§4.1). The `interface_type ∉ {...}` and `execute_type` unknown
/// clauses from the source spec are enforced structurally here: both fields
/// are already typed enums on `ExecuteRequest`, so a malformed wire value
/// fails to parse into one before it ever reaches this crate.
pub fn validate_request(request: &ExecuteRequest) -> Result<(), EngineError> {
    if request.interface_id.trim().is_empty() {
        return Err(EngineError::validation("interface_id must not be empty"));
    }

    if request.execute_type == ExecuteType::IncrementalSync {
        if request.last_sync_time.is_none() {
            return Err(EngineError::validation(
                "incremental_sync requires last_sync_time",
            ));
        }
        if request.incremental_key.as_deref().unwrap_or("").trim().is_empty() {
            return Err(EngineError::validation(
                "incremental_sync requires a non-empty incremental_key",
            ));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_core::{InterfaceType, Value};

    fn request(execute_type: ExecuteType) -> ExecuteRequest {
        ExecuteRequest::new("if-1", InterfaceType::BasicLibrary, execute_type)
    }

    #[test]
    fn rejects_empty_interface_id() {
        let mut req = request(ExecuteType::Preview);
        req.interface_id.clear();
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn incremental_sync_requires_last_sync_time_and_key() {
        let req = request(ExecuteType::IncrementalSync);
        assert!(validate_request(&req).is_err());
    }

    #[test]
    fn incremental_sync_passes_with_both_fields_set() {
        let mut req = request(ExecuteType::IncrementalSync);
        req.last_sync_time = Some(Value::Str("2023-01-01".to_string()));
        req.incremental_key = Some("updated_at".to_string());
        assert!(validate_request(&req).is_ok());
    }

    #[test]
    fn preview_does_not_require_incremental_fields() {
        assert!(validate_request(&request(ExecuteType::Preview)).is_ok());
    }
}
