// Composite key identifying one table: {database}.{table}

use std::fmt;

use super::database_name::DatabaseName;
use super::table_name::TableName;

/// Composite key for a table: `{database}.{table}`
///
/// Keeps database and table name paired so lookups never mix up tables of the
/// same name living in different databases.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TableId {
    database: DatabaseName,
    table_name: TableName,
}

impl TableId {
    pub fn new(database: DatabaseName, table_name: TableName) -> Self {
        Self {
            database,
            table_name,
        }
    }

    /// Create from string components
    pub fn from_strings(database: &str, table_name: &str) -> Self {
        Self {
            database: DatabaseName::new(database),
            table_name: TableName::new(table_name),
        }
    }

    pub fn database(&self) -> &DatabaseName {
        &self.database
    }

    pub fn table_name(&self) -> &TableName {
        &self.table_name
    }

    /// Consume and return inner components
    pub fn into_parts(self) -> (DatabaseName, TableName) {
        (self.database, self.table_name)
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.database, self.table_name)
    }
}
