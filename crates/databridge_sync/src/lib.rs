#![allow(clippy::result_large_err)]

//! Sync Engine (spec §4.5): strategy dispatch over a single transaction per
//! run, schema assurance, and the full/incremental/realtime write paths
//! every `Executor` verb composes on top of a fetched batch of rows.

mod engine;
mod target;

pub use engine::SyncEngine;
pub use target::{resolve_target, TableTargetSpec};
