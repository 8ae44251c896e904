//! Report writers for run histories and experiment tables.

pub mod csv;

pub use self::csv::{CsvRecord, write_history, write_records};
