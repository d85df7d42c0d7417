use databridge_core::InterfaceInfoAccessor;
use std::collections::HashMap;
use std::sync::RwLock;

/// Per-interface cache of declared column types, lowercased for
/// case-insensitive lookup (§4.4 step 1). Read-mostly; population is
/// idempotent so concurrent writers racing to populate the same interface
/// id is harmless (§5 shared-resource policy).
#[derive(Default)]
pub struct FieldTypeCache {
    by_interface: RwLock<HashMap<String, HashMap<String, String>>>,
}

impl FieldTypeCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks up `column`'s declared type for `interface`, populating the
    /// cache from `interface.table_fields_config()` on first use.
    pub fn declared_type(&self, interface: &dyn InterfaceInfoAccessor, column: &str) -> Option<String> {
        let key = column.to_lowercase();
        {
            let cache = self.by_interface.read().unwrap_or_else(|e| e.into_inner());
            if let Some(fields) = cache.get(interface.id()) {
                if let Some(declared) = fields.get(&key) {
                    return Some(declared.clone());
                }
                if fields.contains_key("__populated__") {
                    return None;
                }
            }
        }

        let mut fields: HashMap<String, String> = interface
            .table_fields_config()
            .iter()
            .map(|f| (f.name.to_lowercase(), f.declared_type.to_lowercase()))
            .collect();
        fields.insert("__populated__".to_string(), String::new());

        let result = fields.get(&key).cloned();
        let mut cache = self.by_interface.write().unwrap_or_else(|e| e.into_inner());
        cache.entry(interface.id().to_string()).or_insert(fields);
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_core::{FieldDescriptor, InterfaceInfo, InterfaceRecord, ParseConfig};

    fn interface() -> InterfaceInfo {
        InterfaceInfo::Basic {
            record: InterfaceRecord {
                id: "if-1".to_string(),
                name: "orders".to_string(),
                schema_name: None,
                table_name: "orders".to_string(),
                interface_config: serde_json::json!({}),
                parse_config: ParseConfig::default(),
                table_fields: vec![FieldDescriptor {
                    name: "CreatedAt".to_string(),
                    declared_type: "TIMESTAMP".to_string(),
                }],
                table_created: true,
            },
            data_source_id: "ds-1".to_string(),
        }
    }

    #[test]
    fn lookup_is_case_insensitive() {
        let cache = FieldTypeCache::new();
        let info = interface();
        assert_eq!(cache.declared_type(&info, "created_at"), Some("timestamp".to_string()));
    }

    #[test]
    fn unknown_column_returns_none() {
        let cache = FieldTypeCache::new();
        let info = interface();
        assert_eq!(cache.declared_type(&info, "nope"), None);
    }
}
