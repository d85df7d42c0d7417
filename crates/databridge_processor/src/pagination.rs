use databridge_catalog::CatalogConfig;
use databridge_core::{DataSourceCategory, InterfaceInfoAccessor, PageParams};

/// Resolves pagination parameter names and the starting page value, per
/// §4.3.3: database sources always use `page`/`page_size` starting at 1;
/// API sources read their names from interface config (with the same
/// defaults as a fallback).
pub fn page_params(
    category: &DataSourceCategory,
    interface: &dyn InterfaceInfoAccessor,
    page_size: u64,
) -> PageParams {
    match category {
        DataSourceCategory::Database => PageParams {
            page_param: "page".to_string(),
            size_param: "page_size".to_string(),
            page: 1,
            page_size,
        },
        _ => {
            let cfg = interface.pagination_config();
            PageParams {
                page_param: cfg.page_param,
                size_param: cfg.size_param,
                page: cfg.start_value,
                page_size,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use databridge_core::{InterfaceInfo, InterfaceRecord, ParseConfig};

    fn interface(config: serde_json::Value) -> InterfaceInfo {
        InterfaceInfo::Basic {
            record: InterfaceRecord {
                id: "if-1".to_string(),
                name: "orders".to_string(),
                schema_name: None,
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
    fn database_category_uses_fixed_names() {
        let info = interface(serde_json::json!({}));
        let params = page_params(&DataSourceCategory::Database, &info, 500);
        assert_eq!(params.page_param, "page");
        assert_eq!(params.size_param, "page_size");
        assert_eq!(params.page, 1);
    }

    #[test]
    fn api_category_reads_custom_param_names() {
        let info = interface(serde_json::json!({
            "pagination_page_param": "pageNumber",
            "pagination_size_param": "pageSize",
            "pagination_start_value": 0
        }));
        let params = page_params(&DataSourceCategory::Api, &info, 100);
        assert_eq!(params.page_param, "pageNumber");
        assert_eq!(params.page, 0);
    }
}
