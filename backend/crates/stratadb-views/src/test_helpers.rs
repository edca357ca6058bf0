//! Test fixtures: storages that count how they are accessed

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use datafusion::arrow::array::{AsArray, RecordBatch};
use datafusion::arrow::datatypes::{TimestampSecondType, UInt32Type, UInt64Type};
use stratadb_commons::{engines, DatabaseName, TableId};
use stratadb_store::{
    Catalog, DataPart, MergeTreeData, PartDataset, PartSet, PartStorage, StoreError,
    StructureLock, TableStorage, TableStructureReadLock, TableStructureWriteLock,
};

#[derive(Debug, Default)]
pub struct AccessCounters {
    pub structure_locks: AtomicUsize,
    pub active_fetches: AtomicUsize,
    pub all_fetches: AtomicUsize,
}

impl AccessCounters {
    pub fn structure_locks(&self) -> usize {
        self.structure_locks.load(Ordering::SeqCst)
    }

    pub fn active_fetches(&self) -> usize {
        self.active_fetches.load(Ordering::SeqCst)
    }

    pub fn all_fetches(&self) -> usize {
        self.all_fetches.load(Ordering::SeqCst)
    }
}

#[derive(Debug)]
pub struct CountingDataset {
    inner: MergeTreeData,
    counters: Arc<AccessCounters>,
}

impl CountingDataset {
    fn new(counters: &Arc<AccessCounters>) -> Self {
        Self {
            inner: MergeTreeData::new(),
            counters: Arc::clone(counters),
        }
    }
}

impl PartDataset for CountingDataset {
    fn active_parts(&self) -> PartSet {
        self.counters.active_fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.active_parts()
    }

    fn all_parts(&self) -> PartSet {
        self.counters.all_fetches.fetch_add(1, Ordering::SeqCst);
        self.inner.all_parts()
    }
}

/// Part-based storage that records structure lock and dataset accesses
#[derive(Debug)]
pub struct CountingStorage {
    engine: &'static str,
    structure: StructureLock,
    unreplicated: Option<CountingDataset>,
    replicated: Option<CountingDataset>,
    counters: Arc<AccessCounters>,
}

impl CountingStorage {
    pub fn merge_tree() -> Self {
        let counters = Arc::new(AccessCounters::default());
        Self {
            engine: engines::MERGE_TREE,
            structure: StructureLock::new(),
            unreplicated: Some(CountingDataset::new(&counters)),
            replicated: None,
            counters,
        }
    }

    pub fn replicated(with_unreplicated: bool) -> Self {
        let counters = Arc::new(AccessCounters::default());
        Self {
            engine: engines::REPLICATED_MERGE_TREE,
            structure: StructureLock::new(),
            unreplicated: with_unreplicated.then(|| CountingDataset::new(&counters)),
            replicated: Some(CountingDataset::new(&counters)),
            counters,
        }
    }

    pub fn counters(&self) -> Arc<AccessCounters> {
        Arc::clone(&self.counters)
    }

    pub fn unreplicated_data(&self) -> &MergeTreeData {
        &self.unreplicated.as_ref().expect("no unreplicated dataset").inner
    }

    pub fn replicated_data(&self) -> &MergeTreeData {
        &self.replicated.as_ref().expect("not a replicated storage").inner
    }
}

impl TableStorage for CountingStorage {
    fn engine_name(&self) -> &str {
        self.engine
    }

    fn lock_structure(&self) -> Result<TableStructureReadLock<'_>, StoreError> {
        self.counters.structure_locks.fetch_add(1, Ordering::SeqCst);
        self.structure.read()
    }

    fn lock_structure_for_alter(&self) -> Result<TableStructureWriteLock<'_>, StoreError> {
        self.structure.write()
    }

    fn part_storage(&self) -> Option<&dyn PartStorage> {
        Some(self)
    }
}

impl PartStorage for CountingStorage {
    fn unreplicated_data(&self) -> Option<&dyn PartDataset> {
        self.unreplicated.as_ref().map(|d| d as &dyn PartDataset)
    }

    fn replicated_data(&self) -> Option<&dyn PartDataset> {
        self.replicated.as_ref().map(|d| d as &dyn PartDataset)
    }

    fn clear_old_parts(&self, lifetime_secs: i64) -> usize {
        [&self.unreplicated, &self.replicated]
            .into_iter()
            .flatten()
            .map(|d| d.inner.clear_old_parts(lifetime_secs).len())
            .sum()
    }
}

pub fn part(name: &str, marks: u64, bytes: u64, modification_time: i64) -> DataPart {
    DataPart::new(name, marks, bytes, modification_time).unwrap()
}

pub fn catalog_with_databases(names: &[&str]) -> Catalog {
    let catalog = Catalog::new();
    for name in names {
        catalog.create_database(DatabaseName::new(*name)).unwrap();
    }
    catalog
}

/// Attach a counting storage and return it with its counters
pub fn attach(catalog: &Catalog, database: &str, table: &str, storage: CountingStorage) -> Arc<CountingStorage> {
    let storage = Arc::new(storage);
    catalog
        .attach_table(TableId::from_strings(database, table), storage.clone())
        .unwrap();
    storage
}

/// One decoded system.parts row
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PartRow {
    pub name: String,
    pub replicated: bool,
    pub active: bool,
    pub marks: u64,
    pub bytes: u64,
    pub modification_time: i64,
    pub remove_time: i64,
    pub refcount: u32,
    pub database: String,
    pub table: String,
    pub engine: String,
}

pub fn rows(batch: &RecordBatch) -> Vec<PartRow> {
    let text = |i: usize, row: usize| batch.column(i).as_string::<i32>().value(row).to_string();
    let flag = |i: usize, row: usize| batch.column(i).as_boolean().value(row);
    let ts = |i: usize, row: usize| batch.column(i).as_primitive::<TimestampSecondType>().value(row);

    (0..batch.num_rows())
        .map(|row| PartRow {
            name: text(0, row),
            replicated: flag(1, row),
            active: flag(2, row),
            marks: batch.column(3).as_primitive::<UInt64Type>().value(row),
            bytes: batch.column(4).as_primitive::<UInt64Type>().value(row),
            modification_time: ts(5, row),
            remove_time: ts(6, row),
            refcount: batch.column(7).as_primitive::<UInt32Type>().value(row),
            database: text(8, row),
            table: text(9, row),
            engine: text(10, row),
        })
        .collect()
}
