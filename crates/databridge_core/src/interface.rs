use serde_json::Value as Json;

/// Declared type of one target-table column, as recorded in the catalog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptor {
    pub name: String,
    pub declared_type: String,
}

/// Raw parse configuration for an interface: currently only `field_mapping`,
/// carried as an untyped JSON blob since it accepts two shapes (array or
/// object form) that `databridge_mapper` is responsible for parsing.
#[derive(Debug, Clone, Default)]
pub struct ParseConfig {
    pub field_mapping: Option<Json>,
}

/// Shared fields between base-library and thematic-library catalog records.
#[derive(Debug, Clone)]
pub struct InterfaceRecord {
    pub id: String,
    pub name: String,
    pub schema_name: Option<String>,
    pub table_name: String,
    pub interface_config: Json,
    pub parse_config: ParseConfig,
    pub table_fields: Vec<FieldDescriptor>,
    pub table_created: bool,
}

/// Uniform identity of a cataloged interface.
///
/// Base-library interfaces wrap a raw external data source; thematic-library
/// interfaces are computed over base tables and therefore carry no data
/// source id of their own. Per the reimplementation's design note, this sum
/// type plus `InterfaceInfoAccessor` replaces the teacher-style adapter
/// shim entirely: there is no separate adapter object to construct.
#[derive(Debug, Clone)]
pub enum InterfaceInfo {
    Basic {
        record: InterfaceRecord,
        data_source_id: String,
    },
    Thematic {
        record: InterfaceRecord,
    },
}

/// The interface type as it appears on an `ExecuteRequest`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceType {
    BasicLibrary,
    ThematicLibrary,
}

impl InterfaceType {
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "basic_library" => Some(InterfaceType::BasicLibrary),
            "thematic_library" => Some(InterfaceType::ThematicLibrary),
            _ => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            InterfaceType::BasicLibrary => "basic_library",
            InterfaceType::ThematicLibrary => "thematic_library",
        }
    }
}

/// Total, side-effect-free accessors over either catalog record shape.
///
/// Every accessor here must be infallible per §4.2 — there is no branch
/// where, say, `get_table_name` can fail; missing data is represented in
/// the record itself (e.g. an empty `data_source_id` for thematic
/// interfaces), never as an `Option` threaded through every call site.
pub trait InterfaceInfoAccessor {
    fn id(&self) -> &str;
    fn name(&self) -> &str;
    fn interface_type(&self) -> InterfaceType;
    fn data_source_id(&self) -> &str;
    fn schema_name(&self) -> Option<&str>;
    fn table_name(&self) -> &str;
    fn interface_config(&self) -> &Json;
    fn parse_config(&self) -> &ParseConfig;
    fn table_fields_config(&self) -> &[FieldDescriptor];
    fn is_table_created(&self) -> bool;
}

impl InterfaceInfoAccessor for InterfaceInfo {
    fn id(&self) -> &str {
        &self.record().id
    }

    fn name(&self) -> &str {
        &self.record().name
    }

    fn interface_type(&self) -> InterfaceType {
        match self {
            InterfaceInfo::Basic { .. } => InterfaceType::BasicLibrary,
            InterfaceInfo::Thematic { .. } => InterfaceType::ThematicLibrary,
        }
    }

    fn data_source_id(&self) -> &str {
        match self {
            InterfaceInfo::Basic { data_source_id, .. } => data_source_id,
            InterfaceInfo::Thematic { .. } => "",
        }
    }

    fn schema_name(&self) -> Option<&str> {
        self.record().schema_name.as_deref()
    }

    fn table_name(&self) -> &str {
        &self.record().table_name
    }

    fn interface_config(&self) -> &Json {
        &self.record().interface_config
    }

    fn parse_config(&self) -> &ParseConfig {
        &self.record().parse_config
    }

    fn table_fields_config(&self) -> &[FieldDescriptor] {
        &self.record().table_fields
    }

    fn is_table_created(&self) -> bool {
        self.record().table_created
    }
}

impl InterfaceInfo {
    fn record(&self) -> &InterfaceRecord {
        match self {
            InterfaceInfo::Basic { record, .. } | InterfaceInfo::Thematic { record } => record,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: &str) -> InterfaceRecord {
        InterfaceRecord {
            id: id.to_string(),
            name: "orders".to_string(),
            schema_name: Some("public".to_string()),
            table_name: "orders".to_string(),
            interface_config: serde_json::json!({}),
            parse_config: ParseConfig::default(),
            table_fields: vec![],
            table_created: true,
        }
    }

    #[test]
    fn thematic_interface_has_empty_data_source_id() {
        let info = InterfaceInfo::Thematic {
            record: record("if-1"),
        };
        assert_eq!(info.data_source_id(), "");
        assert_eq!(info.interface_type(), InterfaceType::ThematicLibrary);
    }

    #[test]
    fn basic_interface_exposes_data_source_id() {
        let info = InterfaceInfo::Basic {
            record: record("if-2"),
            data_source_id: "ds-9".to_string(),
        };
        assert_eq!(info.data_source_id(), "ds-9");
        assert_eq!(info.interface_type(), InterfaceType::BasicLibrary);
    }

    #[test]
    fn interface_type_parses_known_strings_only() {
        assert_eq!(
            InterfaceType::parse("basic_library"),
            Some(InterfaceType::BasicLibrary)
        );
        assert_eq!(InterfaceType::parse("bogus"), None);
    }
}
