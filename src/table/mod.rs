pub mod types;
pub mod columns;
pub mod table;
pub mod table_search;
pub mod table_order;
pub mod pagination;
pub mod query;
pub mod render;

pub use types::*;
pub use table::DataTable;
pub use query::{TablePage, TableQuery};
