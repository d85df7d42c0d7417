#![allow(clippy::result_large_err)]

//! Executor Facade and Execute Operations (spec §4.1, §4.6): the engine's
//! single public entry point, request validation, and the four verbs
//! (preview, test, sync, incremental_sync) built on top of the Data
//! Processor, Field Mapper, and Sync Engine.

mod executor;
mod incremental;
mod preview;
mod sync;
mod sync_result_json;
mod target;
mod test_verb;
mod validate;

pub use executor::Executor;
pub use sync_result_json::sync_result_to_json;
pub use target::build_target;
pub use validate::validate_request;
