//! SQL-level tests for system.parts
//!
//! Tests cover:
//! - Filtering on table identity columns (pushed down)
//! - Filtering on part columns (applied by DataFusion afterwards)
//! - Projection, aggregation and ordering over the view
//! - Replicated tables with and without an unreplicated dataset

use std::sync::Arc;

use datafusion::arrow::array::{AsArray, RecordBatch};
use datafusion::arrow::compute::concat_batches;
use datafusion::arrow::datatypes::{Int64Type, UInt32Type, UInt64Type};
use datafusion::prelude::SessionContext;
use stratadb_commons::{DatabaseName, TableId};
use stratadb_store::{Catalog, DataPart, MemoryStorage, MergeTreeStorage, ReplicatedMergeTreeStorage};
use stratadb_views::register_system_schema;

fn part(name: &str, marks: u64, bytes: u64) -> DataPart {
    DataPart::new(name, marks, bytes, 1_700_000_000).expect("valid part name")
}

/// default.t: all_1_1_0 superseded by all_1_1_1, plus all_2_2_0
/// default.events: replicated, with one unreplicated part
/// default.cache: Memory
/// logs.r: replicated, no unreplicated dataset
fn build_catalog() -> Arc<Catalog> {
    let catalog = Arc::new(Catalog::new());
    catalog.create_database(DatabaseName::new("default")).unwrap();
    catalog.create_database(DatabaseName::new("logs")).unwrap();

    let t = Arc::new(MergeTreeStorage::new());
    t.data().commit_part(part("all_1_1_0", 2, 2000)).unwrap();
    t.data().commit_part(part("all_1_1_1", 2, 1800)).unwrap();
    t.data().commit_part(part("all_2_2_0", 1, 500)).unwrap();
    catalog.attach_table(TableId::from_strings("default", "t"), t).unwrap();

    let events = Arc::new(ReplicatedMergeTreeStorage::new(true));
    events.data().commit_part(part("202401_1_1_0", 8, 8000)).unwrap();
    events.data().commit_part(part("202401_2_2_0", 8, 8000)).unwrap();
    events
        .unreplicated()
        .unwrap()
        .commit_part(part("legacy_1_1_0", 3, 300))
        .unwrap();
    catalog
        .attach_table(TableId::from_strings("default", "events"), events)
        .unwrap();

    catalog
        .attach_table(TableId::from_strings("default", "cache"), Arc::new(MemoryStorage::new()))
        .unwrap();

    let r = Arc::new(ReplicatedMergeTreeStorage::new(false));
    r.data().commit_part(part("all_1_1_0", 1, 10)).unwrap();
    catalog.attach_table(TableId::from_strings("logs", "r"), r).unwrap();

    catalog
}

fn create_test_context() -> SessionContext {
    let ctx = SessionContext::new();
    register_system_schema(&ctx, build_catalog(), "system").expect("register system schema");
    ctx
}

async fn query(ctx: &SessionContext, sql: &str) -> Vec<RecordBatch> {
    ctx.sql(sql)
        .await
        .unwrap_or_else(|e| panic!("planning '{}' failed: {}", sql, e))
        .collect()
        .await
        .unwrap_or_else(|e| panic!("executing '{}' failed: {}", sql, e))
}

fn single(batches: &[RecordBatch]) -> RecordBatch {
    let schema = batches.first().expect("at least one batch").schema();
    concat_batches(&schema, batches).expect("batches share a schema")
}

fn strings(batches: &[RecordBatch], column: usize) -> Vec<String> {
    batches
        .iter()
        .flat_map(|b| {
            b.column(column)
                .as_string::<i32>()
                .iter()
                .map(|v| v.unwrap_or_default().to_string())
                .collect::<Vec<_>>()
        })
        .collect()
}

fn bools(batches: &[RecordBatch], column: usize) -> Vec<bool> {
    batches
        .iter()
        .flat_map(|b| b.column(column).as_boolean().iter().map(|v| v.unwrap_or(false)).collect::<Vec<_>>())
        .collect()
}

#[tokio::test]
async fn test_superseded_part_is_listed_inactive() {
    let ctx = create_test_context();
    let batches = query(
        &ctx,
        r#"SELECT name, active FROM system.parts
           WHERE "database" = 'default' AND "table" = 't'
           ORDER BY name"#,
    )
    .await;

    assert_eq!(strings(&batches, 0), vec!["all_1_1_0", "all_1_1_1", "all_2_2_0"]);
    assert_eq!(bools(&batches, 1), vec![false, true, true]);
}

#[tokio::test]
async fn test_memory_tables_are_not_listed() {
    let ctx = create_test_context();
    let batches = query(&ctx, "SELECT DISTINCT engine FROM system.parts ORDER BY engine").await;
    assert_eq!(strings(&batches, 0), vec!["MergeTree", "ReplicatedMergeTree"]);

    let batches = query(&ctx, r#"SELECT count(*) FROM system.parts WHERE "table" = 'cache'"#).await;
    assert_eq!(single(&batches).column(0).as_primitive::<Int64Type>().value(0), 0);
}

#[tokio::test]
async fn test_part_column_filters_are_applied() {
    let ctx = create_test_context();
    let batches = query(
        &ctx,
        r#"SELECT name FROM system.parts WHERE "table" = 't' AND bytes > 1000 ORDER BY name"#,
    )
    .await;
    assert_eq!(strings(&batches, 0), vec!["all_1_1_0", "all_1_1_1"]);

    let batches = query(&ctx, "SELECT name FROM system.parts WHERE name LIKE 'legacy%'").await;
    assert_eq!(strings(&batches, 0), vec!["legacy_1_1_0"]);
}

#[tokio::test]
async fn test_replicated_and_unreplicated_datasets() {
    let ctx = create_test_context();
    let batches = query(
        &ctx,
        r#"SELECT name, replicated FROM system.parts WHERE "table" = 'events' ORDER BY name"#,
    )
    .await;
    assert_eq!(
        strings(&batches, 0),
        vec!["202401_1_1_0", "202401_2_2_0", "legacy_1_1_0"]
    );
    assert_eq!(bools(&batches, 1), vec![true, true, false]);

    let batches = query(
        &ctx,
        r#"SELECT name FROM system.parts WHERE "database" = 'logs' AND replicated = false"#,
    )
    .await;
    assert!(strings(&batches, 0).is_empty());
}

#[tokio::test]
async fn test_aggregation_over_active_parts() {
    let ctx = create_test_context();
    let batches = query(
        &ctx,
        r#"SELECT "table", sum(bytes), sum(marks) FROM system.parts
           WHERE active AND "database" = 'default'
           GROUP BY "table" ORDER BY "table""#,
    )
    .await;

    assert_eq!(strings(&batches, 0), vec!["events", "t"]);
    let batch = single(&batches);
    let bytes = batch.column(1).as_primitive::<UInt64Type>();
    assert_eq!(bytes.value(0), 16300);
    assert_eq!(bytes.value(1), 2300);
    let marks = batch.column(2).as_primitive::<UInt64Type>();
    assert_eq!(marks.value(0), 19);
    assert_eq!(marks.value(1), 3);
}

#[tokio::test]
async fn test_idle_parts_report_dataset_reference() {
    let ctx = create_test_context();
    let batches = query(&ctx, "SELECT DISTINCT refcount FROM system.parts").await;
    let refcounts: Vec<u32> = batches
        .iter()
        .flat_map(|b| b.column(0).as_primitive::<UInt32Type>().values().to_vec())
        .collect();
    assert_eq!(refcounts, vec![1]);
}

#[tokio::test]
async fn test_schema_and_limit() {
    let ctx = create_test_context();
    let df = ctx.table("system.parts").await.unwrap();
    let names: Vec<String> = df.schema().fields().iter().map(|f| f.name().clone()).collect();
    assert_eq!(names.len(), 11);
    assert_eq!(names[0], "name");
    assert_eq!(names[10], "engine");

    let batches = query(&ctx, "SELECT name FROM system.parts LIMIT 2").await;
    assert_eq!(batches.iter().map(|b| b.num_rows()).sum::<usize>(), 2);
}
