// File I/O: spreadsheet exports in, outreach CSV out

pub mod csv;
pub mod error;
pub mod export;

pub use crate::csv::{read_rows, read_rows_from_str};
pub use error::IoError;
pub use export::{default_export_filename, export_outreach, write_outreach_export};
