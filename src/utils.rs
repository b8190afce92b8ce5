pub mod date;
pub mod ddb;
pub(crate) mod ddb_table;
pub mod logging;
pub(crate) mod memory;
