#![allow(clippy::result_large_err)]

//! Deterministic fakes for every trait seam `databridge_core` defines,
//! mirroring the teacher's `dbflux_test_support::FakeDriver` pattern: one
//! fake per capability, built by hand instead of mocked, so tests read the
//! same way the production call sites do.

mod catalog;
mod driver;
mod fixtures;
mod store;

pub use catalog::FakeCatalog;
pub use driver::{
    FakeDataSource, FakeDriverManager, FakeQueryBuilder, FakeQueryBuilderFactory, QueuedResponse,
};
pub use fixtures::{basic_interface, basic_interface_with_config, descriptor, record, thematic_interface};
pub use store::{InMemoryStore, InMemoryTransactionProvider};
