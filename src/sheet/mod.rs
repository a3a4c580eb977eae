//! Spreadsheet input module
//!
//! Reads a row/column .xlsx sheet into an in-memory table:
//! - Header row names the columns (no fixed schema beyond "has columns")
//! - Cells become typed field values; empty cells become explicit nulls
//! - Date-formatted cells stay date-typed

mod reader;

pub use reader::{SheetReader, SheetTable};
