//! Field Mapper (spec §4.4): source -> target column renaming, per-column
//! type coercion, and the write primitives every sync strategy composes on
//! top of a caller-supplied transaction.

mod coercion;
mod field_mapping;
mod type_cache;
mod writer;

pub use coercion::process_value_for_database;
pub use field_mapping::FieldMapping;
pub use type_cache::FieldTypeCache;
pub use writer::FieldMapper;
