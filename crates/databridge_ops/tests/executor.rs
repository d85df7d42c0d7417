//! End-to-end `Executor::execute` scenarios mirroring spec.md §8's seed
//! cases: preview clamping, batched full sync, incremental sync against a
//! pre-existing watermark, and rollback on a mid-batch driver failure.

use databridge_core::{
    CancellationToken, DataSourceCategory, DriverResponse, ExecuteRequest, ExecuteType,
    FieldDescriptor, InterfaceType, ResponseData, Value,
};
use databridge_ops::Executor;
use databridge_test_support::{
    basic_interface_with_config, descriptor, record, FakeCatalog, FakeDataSource,
    FakeDriverManager, FakeQueryBuilderFactory, InMemoryStore, InMemoryTransactionProvider,
    QueuedResponse,
};
use std::sync::Arc;

fn rows(start: i64, count: i64) -> ResponseData {
    ResponseData::Rows(
        (start..start + count)
            .map(|i| record(vec![("id", Value::Int(i)), ("name", Value::Str(format!("n{i}")))]))
            .collect(),
    )
}

fn executor(
    store: InMemoryStore,
    catalog: FakeCatalog,
    manager: FakeDriverManager,
) -> Executor {
    let store_for_tx = store.clone();
    Executor::new(
        Arc::new(catalog),
        Arc::new(manager),
        Arc::new(FakeQueryBuilderFactory::new()),
        Arc::new(InMemoryTransactionProvider::new(store_for_tx)),
        Arc::new(store),
    )
}

/// S1 — preview clamps a requested `limit` of 0 down to the default of 10,
/// and never touches the target table.
#[tokio::test]
async fn preview_clamps_limit_and_infers_types() {
    let interface = basic_interface_with_config(
        "if-1",
        "orders",
        "ds-1",
        vec![],
        true,
        serde_json::json!({}),
    );
    let ds = descriptor("ds-1", DataSourceCategory::Database);
    let driver = Arc::new(FakeDataSource::single(DriverResponse::ok(rows(1, 25))));

    let catalog = FakeCatalog::new().with_interface(interface).with_data_source(ds);
    let manager = FakeDriverManager::new().register("ds-1", driver);
    let store = InMemoryStore::new();
    let executor = executor(store.clone(), catalog, manager);

    let mut request = ExecuteRequest::new("if-1", InterfaceType::BasicLibrary, ExecuteType::Preview);
    request.limit = Some(0);

    let response = executor.execute(request, &CancellationToken::new()).await;

    assert!(response.success);
    assert_eq!(response.row_count, 10);
    assert_eq!(response.data_types.get("id").map(String::as_str), Some("integer"));
    assert_eq!(response.data_types.get("name").map(String::as_str), Some("string"));
    assert_eq!(store.row_count("public.orders"), 0);
}

/// S2 — a full batch sync over 2500 rows paginated 1000/1000/500 commits
/// exactly those rows and reports three batches fetched.
#[tokio::test]
async fn full_batch_sync_commits_all_pages() {
    let interface = basic_interface_with_config(
        "if-1",
        "orders",
        "ds-1",
        vec![],
        true,
        serde_json::json!({
            "primary_keys": ["id"],
            "limit_config": {"enabled": true, "default_limit": 1000, "max_limit": 1000},
        }),
    );
    let ds = descriptor("ds-1", DataSourceCategory::Database);
    let driver = Arc::new(FakeDataSource::new(vec![
        QueuedResponse::ok(DriverResponse::ok(rows(1, 1000))),
        QueuedResponse::ok(DriverResponse::ok(rows(1001, 1000))),
        QueuedResponse::ok(DriverResponse::ok(rows(2001, 500))),
    ]));

    let catalog = FakeCatalog::new().with_interface(interface).with_data_source(ds);
    let manager = FakeDriverManager::new().register("ds-1", driver);
    let store = InMemoryStore::new();
    let executor = executor(store.clone(), catalog, manager);

    let request = ExecuteRequest::new("if-1", InterfaceType::BasicLibrary, ExecuteType::Sync);
    let response = executor.execute(request, &CancellationToken::new()).await;

    assert!(response.success, "expected success, got {:?}", response.error);
    assert!(response.table_updated);
    assert_eq!(response.updated_rows, 2500);
    assert_eq!(store.row_count("public.orders"), 2500);
    assert_eq!(
        response.metadata.get("batch_count").and_then(serde_json::Value::as_u64),
        Some(3)
    );
    assert!(
        response.warnings.is_empty(),
        "expected no warnings for a paginated full sync, got {:?}",
        response.warnings
    );
}

/// S3 — an interface with incremental sync enabled resolves its watermark
/// from the existing table contents and upserts only what the driver
/// returns for that watermark, landing on a table of the expected size.
#[tokio::test]
async fn incremental_sync_resolves_watermark_and_upserts() {
    let interface = basic_interface_with_config(
        "if-1",
        "orders",
        "ds-1",
        vec![FieldDescriptor { name: "id".to_string(), declared_type: "integer".to_string() }],
        true,
        serde_json::json!({
            "primary_keys": ["id"],
            "incremental_config": {"enabled": true, "incremental_field": "updated_at"},
        }),
    );
    let ds = descriptor("ds-1", DataSourceCategory::Database);

    let store = InMemoryStore::new();
    store.seed(
        "public.orders",
        vec![record(vec![
            ("id", Value::Int(1)),
            ("updated_at", Value::Str("2023-01-01 00:00:00".to_string())),
        ])],
    );

    let driver = Arc::new(FakeDataSource::single(DriverResponse::ok(ResponseData::Rows(vec![
        record(vec![("id", Value::Int(1)), ("updated_at", Value::Str("2023-02-01 00:00:00".to_string()))]),
        record(vec![("id", Value::Int(2)), ("updated_at", Value::Str("2023-02-02 00:00:00".to_string()))]),
    ]))));

    let catalog = FakeCatalog::new().with_interface(interface).with_data_source(ds);
    let manager = FakeDriverManager::new().register("ds-1", driver);
    let executor = executor(store.clone(), catalog, manager);

    let request = ExecuteRequest::new("if-1", InterfaceType::BasicLibrary, ExecuteType::Sync);
    let response = executor.execute(request, &CancellationToken::new()).await;

    assert!(response.success, "expected success, got {:?}", response.error);
    assert_eq!(store.row_count("public.orders"), 2);
}

/// S4 — an empty target table still resolves to the incremental strategy
/// (a null watermark, not a degrade to full) and lands every driver row.
#[tokio::test]
async fn incremental_sync_against_empty_table_takes_all_rows() {
    let interface = basic_interface_with_config(
        "if-1",
        "orders",
        "ds-1",
        vec![],
        true,
        serde_json::json!({
            "primary_keys": ["id"],
            "incremental_config": {"enabled": true, "incremental_field": "updated_at"},
        }),
    );
    let ds = descriptor("ds-1", DataSourceCategory::Database);
    let store = InMemoryStore::new();

    let driver = Arc::new(FakeDataSource::single(DriverResponse::ok(ResponseData::Rows(vec![
        record(vec![("id", Value::Int(1)), ("updated_at", Value::Str("2023-02-01 00:00:00".to_string()))]),
        record(vec![("id", Value::Int(2)), ("updated_at", Value::Str("2023-02-02 00:00:00".to_string()))]),
    ]))));

    let catalog = FakeCatalog::new().with_interface(interface).with_data_source(ds);
    let manager = FakeDriverManager::new().register("ds-1", driver);
    let executor = executor(store.clone(), catalog, manager);

    let request = ExecuteRequest::new("if-1", InterfaceType::BasicLibrary, ExecuteType::Sync);
    let response = executor.execute(request, &CancellationToken::new()).await;

    assert!(response.success);
    assert_eq!(store.row_count("public.orders"), 2);
}

/// S5 — a driver failure mid-batch fails the run and leaves the target
/// exactly as it was before the sync started.
#[tokio::test]
async fn driver_failure_mid_batch_rolls_back_and_reports_error() {
    let interface = basic_interface_with_config(
        "if-1",
        "orders",
        "ds-1",
        vec![],
        true,
        serde_json::json!({
            "primary_keys": ["id"],
            "limit_config": {"enabled": true, "default_limit": 1000, "max_limit": 1000},
        }),
    );
    let ds = descriptor("ds-1", DataSourceCategory::Database);
    let driver = Arc::new(FakeDataSource::new(vec![
        QueuedResponse::ok(DriverResponse::ok(rows(1, 1000))),
        QueuedResponse::ok(DriverResponse::failure("page fetch failed", "boom")),
    ]));

    let catalog = FakeCatalog::new().with_interface(interface).with_data_source(ds);
    let manager = FakeDriverManager::new().register("ds-1", driver);
    let store = InMemoryStore::new();
    let executor = executor(store.clone(), catalog, manager);

    let request = ExecuteRequest::new("if-1", InterfaceType::BasicLibrary, ExecuteType::Sync);
    let response = executor.execute(request, &CancellationToken::new()).await;

    assert!(!response.success);
    assert!(response.error.as_ref().unwrap().message.contains("boom"));
    assert_eq!(store.row_count("public.orders"), 0);
}

/// §3 invariant 1 — `incremental_sync` refuses to run against an interface
/// whose `table_created` flag is false, same as the plain `sync` verb.
#[tokio::test]
async fn incremental_sync_rejects_interface_without_table_created() {
    let interface = basic_interface_with_config(
        "if-1",
        "orders",
        "ds-1",
        vec![],
        false,
        serde_json::json!({ "primary_keys": ["id"] }),
    );
    let ds = descriptor("ds-1", DataSourceCategory::Database);
    let driver = Arc::new(FakeDataSource::single(DriverResponse::ok(rows(1, 1))));

    let catalog = FakeCatalog::new().with_interface(interface).with_data_source(ds);
    let manager = FakeDriverManager::new().register("ds-1", driver);
    let store = InMemoryStore::new();
    let executor = executor(store.clone(), catalog, manager);

    let mut request = ExecuteRequest::new("if-1", InterfaceType::BasicLibrary, ExecuteType::IncrementalSync);
    request.last_sync_time = Some(Value::Str("2023-01-01 00:00:00".to_string()));
    request.incremental_key = Some("updated_at".to_string());

    let response = executor.execute(request, &CancellationToken::new()).await;

    assert!(!response.success);
    assert_eq!(store.row_count("public.orders"), 0);
}

/// §4.1 — an unknown interface id is reported as a failed response rather
/// than a propagated error; the facade never panics or bubbles a raw `Err`.
#[tokio::test]
async fn unknown_interface_id_yields_failure_response() {
    let store = InMemoryStore::new();
    let executor = executor(store, FakeCatalog::new(), FakeDriverManager::new());

    let request = ExecuteRequest::new("missing", InterfaceType::BasicLibrary, ExecuteType::Preview);
    let response = executor.execute(request, &CancellationToken::new()).await;

    assert!(!response.success);
    assert!(response.error.is_some());
}
