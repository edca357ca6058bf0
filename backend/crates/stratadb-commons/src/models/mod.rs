mod database_name;
mod table_id;
mod table_name;

pub use database_name::DatabaseName;
pub use table_id::TableId;
pub use table_name::TableName;
