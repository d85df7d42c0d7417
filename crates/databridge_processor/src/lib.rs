#![allow(clippy::result_large_err)]

//! The Data Processor (spec §4.3): driver lifecycle, query-builder
//! selection, response normalisation, type inference, and the paginated
//! batch-fetch loop.

mod normalize;
mod pagination;
mod processor;
mod type_inference;

pub use normalize::normalize;
pub use pagination::page_params;
pub use processor::{DataProcessor, FetchMode, FetchOutcome, DEFAULT_MAX_PAGINATION_ITERATIONS};
pub use type_inference::{infer_schema_types, infer_types_first_row};
