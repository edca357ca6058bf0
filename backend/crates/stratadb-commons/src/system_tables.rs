//! System table enumeration
//!
//! Defines the system views available in StrataDB.

/// System view enumeration
///
/// Ensures type-safe view registration and prevents typos in view names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SystemTable {
    /// system.parts - Data parts of every part-based table
    Parts,
}

impl SystemTable {
    /// All system views, in registration order.
    pub const ALL: &'static [SystemTable] = &[SystemTable::Parts];

    /// Get the table name as used in SQL (e.g., "parts")
    pub fn table_name(&self) -> &'static str {
        match self {
            SystemTable::Parts => "parts",
        }
    }

    /// Parse from table name (with or without "system." prefix)
    pub fn from_name(name: &str) -> Result<Self, String> {
        let name = name.strip_prefix("system.").unwrap_or(name);

        match name {
            "parts" => Ok(SystemTable::Parts),
            _ => Err(format!("Unknown system table: {}", name)),
        }
    }
}
