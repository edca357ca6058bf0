//! Table catalog
//!
//! Maps database name → table name → storage handle. The catalog lock only
//! protects this mapping: it is held while a snapshot is copied or while
//! an entry is added, moved or removed, never while a table is read.
//!
//! Lock order for DDL is table structure lock first, catalog lock second.

use std::collections::BTreeMap;
use std::sync::Arc;

use parking_lot::RwLock;
use stratadb_commons::{DatabaseName, TableId, TableName};

use crate::error::{Result, StoreError};
use crate::storage::TableStorage;

/// Tables of one database, ordered by name
pub type Tables = BTreeMap<TableName, Arc<dyn TableStorage>>;

/// Registry of databases and their tables
#[derive(Debug, Default)]
pub struct Catalog {
    databases: RwLock<BTreeMap<DatabaseName, Tables>>,
}

/// Point-in-time copy of the catalog mapping
///
/// Holds its own handle to every storage, so the tables it lists stay
/// resolvable for as long as the snapshot lives, even if they are dropped
/// from the catalog in the meantime.
#[derive(Debug, Clone, Default)]
pub struct CatalogSnapshot {
    databases: BTreeMap<DatabaseName, Tables>,
}

impl CatalogSnapshot {
    /// Database names in ascending order
    pub fn database_names(&self) -> impl Iterator<Item = &DatabaseName> {
        self.databases.keys()
    }

    pub fn tables(&self, database: &str) -> Option<&Tables> {
        self.databases.get(database)
    }

    pub fn is_empty(&self) -> bool {
        self.databases.is_empty()
    }
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn create_database(&self, name: DatabaseName) -> Result<()> {
        let mut databases = self.databases.write();
        if databases.contains_key(&name) {
            return Err(StoreError::AlreadyExists(format!("database {}", name)));
        }
        log::debug!("Created database {}", name);
        databases.insert(name, Tables::new());
        Ok(())
    }

    pub fn database_exists(&self, name: &str) -> bool {
        self.databases.read().contains_key(name)
    }

    pub fn attach_table(&self, table_id: TableId, storage: Arc<dyn TableStorage>) -> Result<()> {
        let mut databases = self.databases.write();
        let tables = databases
            .get_mut(table_id.database())
            .ok_or_else(|| StoreError::DatabaseNotFound(table_id.database().to_string()))?;

        if tables.contains_key(table_id.table_name()) {
            return Err(StoreError::AlreadyExists(format!("table {}", table_id)));
        }

        log::debug!("Attached table {} (engine {})", table_id, storage.engine_name());
        tables.insert(table_id.table_name().clone(), storage);
        Ok(())
    }

    pub fn get_table(&self, table_id: &TableId) -> Option<Arc<dyn TableStorage>> {
        self.databases
            .read()
            .get(table_id.database())
            .and_then(|tables| tables.get(table_id.table_name()))
            .cloned()
    }

    /// Drop a table: wait for its readers, mark it dropped, detach it.
    ///
    /// Handles captured before the drop keep the storage alive, but any
    /// later `lock_structure()` on them fails with `TableDropped`.
    pub fn drop_table(&self, table_id: &TableId) -> Result<()> {
        let storage = self
            .get_table(table_id)
            .ok_or_else(|| StoreError::TableNotFound(table_id.to_string()))?;

        let structure = storage.lock_structure_for_alter()?;
        structure.mark_dropped();

        let mut databases = self.databases.write();
        if let Some(tables) = databases.get_mut(table_id.database()) {
            let still_ours = tables
                .get(table_id.table_name())
                .is_some_and(|current| Arc::ptr_eq(current, &storage));
            if still_ours {
                tables.remove(table_id.table_name());
            }
        }

        log::debug!("Dropped table {}", table_id);
        Ok(())
    }

    /// Rename a table within its database.
    pub fn rename_table(&self, table_id: &TableId, new_name: TableName) -> Result<()> {
        let storage = self
            .get_table(table_id)
            .ok_or_else(|| StoreError::TableNotFound(table_id.to_string()))?;

        let _structure = storage.lock_structure_for_alter()?;

        let mut databases = self.databases.write();
        let tables = databases
            .get_mut(table_id.database())
            .ok_or_else(|| StoreError::DatabaseNotFound(table_id.database().to_string()))?;

        if tables.contains_key(&new_name) {
            return Err(StoreError::AlreadyExists(format!(
                "table {}.{}",
                table_id.database(),
                new_name
            )));
        }

        let moved = tables
            .remove(table_id.table_name())
            .ok_or_else(|| StoreError::TableNotFound(table_id.to_string()))?;

        log::debug!("Renamed table {} to {}", table_id, new_name);
        tables.insert(new_name, moved);
        Ok(())
    }

    /// Copy the current mapping under the catalog lock.
    pub fn snapshot(&self) -> CatalogSnapshot {
        let databases = self.databases.read();
        CatalogSnapshot {
            databases: databases.clone(),
        }
    }
}
