use async_trait::async_trait;
use databridge_core::{Catalog, DataSourceDescriptor, EngineError, InterfaceInfo, InterfaceInfoAccessor};
use std::collections::HashMap;
use std::sync::Mutex;

/// An in-memory `Catalog`: interfaces and data sources registered ahead of
/// time, looked up by id. Mirrors the real catalog's read-only contract
/// (§4.2) without a database behind it.
#[derive(Default)]
pub struct FakeCatalog {
    interfaces: Mutex<HashMap<String, InterfaceInfo>>,
    data_sources: Mutex<HashMap<String, DataSourceDescriptor>>,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_interface(self, interface: InterfaceInfo) -> Self {
        self.interfaces
            .lock()
            .unwrap()
            .insert(interface.id().to_string(), interface);
        self
    }

    pub fn with_data_source(self, descriptor: DataSourceDescriptor) -> Self {
        self.data_sources
            .lock()
            .unwrap()
            .insert(descriptor.id.clone(), descriptor);
        self
    }
}

#[async_trait]
impl Catalog for FakeCatalog {
    async fn get_interface(&self, interface_id: &str) -> Result<InterfaceInfo, EngineError> {
        self.interfaces
            .lock()
            .unwrap()
            .get(interface_id)
            .cloned()
            .ok_or_else(|| EngineError::data_source(format!("interface '{interface_id}' not found")))
    }

    async fn get_data_source(&self, data_source_id: &str) -> Result<DataSourceDescriptor, EngineError> {
        self.data_sources
            .lock()
            .unwrap()
            .get(data_source_id)
            .cloned()
            .ok_or_else(|| EngineError::data_source(format!("data source '{data_source_id}' not found")))
    }
}
