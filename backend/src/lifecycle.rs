//! Server lifecycle management helpers.
//!
//! Builds the in-memory catalog described by the configuration and the
//! DataFusion session the system views are queried through.

use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use datafusion::arrow::array::RecordBatch;
use datafusion::prelude::{SessionConfig, SessionContext};
use log::{debug, info};
use stratadb_commons::{engines, DatabaseName, TableId};
use stratadb_configs::{CatalogSettings, PartSettings, ServerConfig, TableSettings};
use stratadb_store::{
    Catalog, DataPart, MemoryStorage, MergeTreeData, MergeTreeStorage,
    ReplicatedMergeTreeStorage, StoreError, TableStorage,
};
use stratadb_views::register_system_schema;

/// Components shared by everything that answers queries
pub struct ApplicationComponents {
    pub catalog: Arc<Catalog>,
    pub session: SessionContext,
}

/// Create the configured databases and tables, committing their parts.
pub fn bootstrap_catalog(settings: &CatalogSettings) -> Result<Arc<Catalog>> {
    let catalog = Arc::new(Catalog::new());

    for database in &settings.databases {
        catalog.create_database(DatabaseName::new(database.as_str()))?;
    }

    let now = chrono::Utc::now().timestamp();
    for table in &settings.tables {
        let table_id = TableId::from_strings(&table.database, &table.name);
        let storage = create_storage(table, now)
            .with_context(|| format!("Failed to create table {}", table_id))?;
        catalog.attach_table(table_id, storage)?;
    }

    info!(
        "Catalog initialized: {} database(s), {} table(s)",
        settings.databases.len(),
        settings.tables.len()
    );

    Ok(catalog)
}

fn commit_parts(data: &MergeTreeData, parts: &[&PartSettings], now: i64) -> Result<(), StoreError> {
    for part in parts {
        data.commit_part(DataPart::new(part.name.as_str(), part.marks, part.bytes, now)?)?;
    }
    Ok(())
}

fn create_storage(table: &TableSettings, now: i64) -> Result<Arc<dyn TableStorage>> {
    match table.engine.as_str() {
        engines::MERGE_TREE => {
            let parts: Vec<&PartSettings> = table.parts.iter().collect();
            let storage = MergeTreeStorage::new();
            commit_parts(storage.data(), &parts, now)?;
            Ok(Arc::new(storage))
        }
        engines::REPLICATED_MERGE_TREE => {
            let (local, replicated): (Vec<&PartSettings>, Vec<&PartSettings>) =
                table.parts.iter().partition(|p| p.unreplicated);
            let storage = ReplicatedMergeTreeStorage::new(table.with_unreplicated);
            if !local.is_empty() {
                let unreplicated = storage.unreplicated().ok_or_else(|| {
                    anyhow::anyhow!("unreplicated parts listed but with_unreplicated is false")
                })?;
                commit_parts(unreplicated, &local, now)?;
            }
            commit_parts(storage.data(), &replicated, now)?;
            Ok(Arc::new(storage))
        }
        engines::MEMORY => Ok(Arc::new(MemoryStorage::new())),
        other => Err(StoreError::UnknownEngine(other.to_string()).into()),
    }
}

/// Drop superseded parts older than `lifetime_secs` from every table.
pub fn clear_old_parts(catalog: &Catalog, lifetime_secs: i64) -> usize {
    let snapshot = catalog.snapshot();
    let mut removed = 0;
    for database in snapshot.database_names() {
        let Some(tables) = snapshot.tables(database.as_str()) else {
            continue;
        };
        for (table_name, storage) in tables {
            if let Some(parts) = storage.part_storage() {
                let count = parts.clear_old_parts(lifetime_secs);
                if count > 0 {
                    debug!("Cleared {} old part(s) of {}.{}", count, database, table_name);
                }
                removed += count;
            }
        }
    }
    removed
}

/// DataFusion session with the system views registered
pub fn create_session(config: &ServerConfig, catalog: Arc<Catalog>) -> Result<SessionContext> {
    let session_config = SessionConfig::new()
        .with_information_schema(true)
        .with_target_partitions(config.datafusion.target_partitions)
        .with_batch_size(config.datafusion.batch_size);
    let session = SessionContext::new_with_config(session_config);

    register_system_schema(&session, catalog, &config.system_tables.schema_name)?;
    Ok(session)
}

/// Build the catalog and query session.
pub fn bootstrap(config: &ServerConfig) -> Result<ApplicationComponents> {
    let phase_start = Instant::now();
    let catalog = bootstrap_catalog(&config.catalog)?;

    let cleared = clear_old_parts(&catalog, config.catalog.old_parts_lifetime_secs);
    if cleared > 0 {
        info!("Removed {} outdated part(s) at startup", cleared);
    }

    let session = create_session(config, Arc::clone(&catalog))?;
    info!(
        "Bootstrap completed in {:.2}ms",
        phase_start.elapsed().as_secs_f64() * 1000.0
    );

    Ok(ApplicationComponents { catalog, session })
}

/// Plan and execute one SQL statement.
pub async fn execute_sql(session: &SessionContext, sql: &str) -> Result<Vec<RecordBatch>> {
    let started = Instant::now();
    let df = session
        .sql(sql)
        .await
        .with_context(|| format!("Failed to plan '{}'", sql))?;
    let batches = df
        .collect()
        .await
        .with_context(|| format!("Failed to execute '{}'", sql))?;
    debug!(
        "Executed '{}' in {:.2}ms ({} row(s))",
        sql,
        started.elapsed().as_secs_f64() * 1000.0,
        batches.iter().map(|b| b.num_rows()).sum::<usize>()
    );
    Ok(batches)
}

/// Split a script into statements on `;`, skipping blanks.
///
/// Semicolons inside string literals are not supported.
pub fn split_statements(script: &str) -> Vec<String> {
    script
        .split(';')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}
