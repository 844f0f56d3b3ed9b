//! Typed CSV tables: header layouts, row records and read/write helpers

pub mod io;
pub mod layout;
pub mod records;

pub use io::*;
pub use layout::*;
pub use records::*;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum TableError {
    #[error("table '{table}' is missing required column '{column}'")]
    MissingColumn {
        table: &'static str,
        column: &'static str,
    },

    #[error("table '{table}', line {line}: {message}")]
    Parse {
        table: &'static str,
        line: usize,
        message: String,
    },
}
