//! Export of the overview as a CSV file.

pub mod csv_export;

pub use csv_export::{export_csv, export_filename, export_filename_today, write_csv, ExportError, ExportFile, CSV_HEADER};
