mod config;

pub use config::{CatalogConfig, IncrementalConfig, LimitConfig, PaginationConfig};
