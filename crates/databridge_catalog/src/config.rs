use databridge_core::InterfaceInfoAccessor;
use serde_json::Value as Json;

/// `incremental_config{enabled, incremental_field|increment_field}` from the
/// interface's config (§4.6.3). `increment_field` is accepted as a legacy
/// alias for `incremental_field`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IncrementalConfig {
    pub enabled: bool,
    pub field: Option<String>,
}

/// `limit_config{enabled, default_limit, max_limit}` (§4.6.3, §4.6.4).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LimitConfig {
    pub enabled: bool,
    pub default_limit: u64,
    pub max_limit: u64,
}

impl Default for LimitConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            default_limit: 1000,
            max_limit: 10000,
        }
    }
}

impl LimitConfig {
    /// `min(default_limit, max_limit)`, the effective batch size (§4.6.4).
    pub fn batch_size(&self) -> u64 {
        self.default_limit.min(self.max_limit)
    }
}

/// Pagination parameter names and start value (§4.3.3).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaginationConfig {
    pub enabled: bool,
    pub page_param: String,
    pub size_param: String,
    pub start_value: u64,
    pub total_field: Option<String>,
    pub page_field: Option<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            page_param: "page".to_string(),
            size_param: "size".to_string(),
            start_value: 1,
            total_field: None,
            page_field: None,
        }
    }
}

fn as_bool(value: &Json, key: &str) -> bool {
    value.get(key).and_then(Json::as_bool).unwrap_or(false)
}

fn as_str(value: &Json, key: &str) -> Option<String> {
    value.get(key).and_then(Json::as_str).map(str::to_string)
}

fn as_u64(value: &Json, key: &str, default: u64) -> u64 {
    value.get(key).and_then(Json::as_u64).unwrap_or(default)
}

/// Typed config getters layered over `InterfaceInfoAccessor`'s raw JSON
/// `interface_config`. The accessor itself stays total and side-effect
/// free (§4.2); these are the only fallible-looking reads, and even they
/// never error — an absent or malformed section just resolves to disabled
/// defaults.
pub trait CatalogConfig: InterfaceInfoAccessor {
    fn incremental_config(&self) -> IncrementalConfig {
        let Some(section) = self.interface_config().get("incremental_config") else {
            return IncrementalConfig::default();
        };
        let enabled = as_bool(section, "enabled");
        let field = as_str(section, "incremental_field").or_else(|| as_str(section, "increment_field"));
        IncrementalConfig { enabled, field }
    }

    fn limit_config(&self) -> LimitConfig {
        let Some(section) = self.interface_config().get("limit_config") else {
            return LimitConfig::default();
        };
        let defaults = LimitConfig::default();
        LimitConfig {
            enabled: as_bool(section, "enabled"),
            default_limit: as_u64(section, "default_limit", defaults.default_limit),
            max_limit: as_u64(section, "max_limit", defaults.max_limit),
        }
    }

    /// Declared primary key columns for the target table, read from
    /// `interface_config.primary_keys` (an array of column names). Absent
    /// or malformed resolves to an empty list rather than the brittle
    /// `["id"]` fallback the source system used — callers that need a
    /// primary key for a write must surface this as a validation error
    /// instead of guessing (spec.md §9 design note).
    fn primary_keys(&self) -> Vec<String> {
        self.interface_config()
            .get("primary_keys")
            .and_then(Json::as_array)
            .map(|values| values.iter().filter_map(Json::as_str).map(str::to_string).collect())
            .unwrap_or_default()
    }

    fn pagination_config(&self) -> PaginationConfig {
        let config = self.interface_config();
        let defaults = PaginationConfig::default();
        PaginationConfig {
            enabled: as_bool(config, "pagination_enabled"),
            page_param: as_str(config, "pagination_page_param").unwrap_or(defaults.page_param),
            size_param: as_str(config, "pagination_size_param").unwrap_or(defaults.size_param),
            start_value: as_u64(config, "pagination_start_value", defaults.start_value),
            total_field: as_str(config, "total_field"),
            page_field: as_str(config, "page_field"),
        }
    }
}

impl<T: InterfaceInfoAccessor + ?Sized> CatalogConfig for T {}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_core::{InterfaceInfo, InterfaceRecord, ParseConfig};

    fn interface_with_config(config: Json) -> InterfaceInfo {
        InterfaceInfo::Basic {
            record: InterfaceRecord {
                id: "if-1".to_string(),
                name: "orders".to_string(),
                schema_name: Some("public".to_string()),
                table_name: "orders".to_string(),
                interface_config: config,
                parse_config: ParseConfig::default(),
                table_fields: vec![],
                table_created: true,
            },
            data_source_id: "ds-1".to_string(),
        }
    }

    #[test]
    fn incremental_config_accepts_legacy_increment_field() {
        let info = interface_with_config(serde_json::json!({
            "incremental_config": {"enabled": true, "increment_field": "updated_at"}
        }));
        let cfg = info.incremental_config();
        assert!(cfg.enabled);
        assert_eq!(cfg.field.as_deref(), Some("updated_at"));
    }

    #[test]
    fn limit_config_defaults_when_absent() {
        let info = interface_with_config(serde_json::json!({}));
        let cfg = info.limit_config();
        assert!(!cfg.enabled);
        assert_eq!(cfg.batch_size(), 1000);
    }

    #[test]
    fn primary_keys_reads_declared_array() {
        let info = interface_with_config(serde_json::json!({"primary_keys": ["id", "region"]}));
        assert_eq!(info.primary_keys(), vec!["id".to_string(), "region".to_string()]);
    }

    #[test]
    fn primary_keys_defaults_to_empty_without_fallback() {
        let info = interface_with_config(serde_json::json!({}));
        assert!(info.primary_keys().is_empty());
    }

    #[test]
    fn pagination_config_reads_custom_param_names() {
        let info = interface_with_config(serde_json::json!({
            "pagination_enabled": true,
            "pagination_page_param": "pageNumber",
            "pagination_size_param": "pageSize",
            "pagination_start_value": 0
        }));
        let cfg = info.pagination_config();
        assert!(cfg.enabled);
        assert_eq!(cfg.page_param, "pageNumber");
        assert_eq!(cfg.start_value, 0);
    }
}
