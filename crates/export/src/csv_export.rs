use std::path::{Path, PathBuf};

use chrono::{Local, NaiveDate};
use serde::Serialize;
use thiserror::Error;

use stocktake_counting::{filter_reorder, AggregatedTotal};

/// Header row of the export, in field order.
pub const CSV_HEADER: [&str; 5] = ["Name", "Category", "Total", "Minimum", "ToOrder"];

#[derive(Debug, Error)]
pub enum ExportError {
    #[error("failed to write csv record: {0}")]
    Csv(#[from] csv::Error),

    #[error("failed to flush csv writer: {0}")]
    Flush(#[source] std::io::Error),

    #[error("export is not valid utf-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),

    #[error("failed to write export file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

#[derive(Debug, Serialize)]
struct ExportRow<'a> {
    name: &'a str,
    category: &'a str,
    total: u32,
    minimum: u32,
    to_order: u32,
}

impl<'a> From<&'a AggregatedTotal> for ExportRow<'a> {
    fn from(total: &'a AggregatedTotal) -> Self {
        Self {
            name: &total.name,
            category: &total.category,
            total: total.total_counted.value(),
            minimum: total.minimum_stock.value(),
            to_order: total.reorder_quantity.value(),
        }
    }
}

/// Render totals as CSV text.
///
/// The header is always written, even when no row survives the reorder
/// filter. Fields containing commas, quotes or line breaks are quoted; every
/// record ends with `\n`.
pub fn export_csv(totals: &[AggregatedTotal], only_reorder: bool) -> Result<String, ExportError> {
    let bytes = write_csv(Vec::new(), totals, only_reorder)?;
    Ok(String::from_utf8(bytes)?)
}

/// Write the CSV into `sink` and hand it back once flushed.
pub fn write_csv<W: std::io::Write>(
    sink: W,
    totals: &[AggregatedTotal],
    only_reorder: bool,
) -> Result<W, ExportError> {
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .terminator(csv::Terminator::Any(b'\n'))
        .from_writer(sink);

    writer.write_record(CSV_HEADER)?;
    for total in filter_reorder(totals, only_reorder) {
        writer.serialize(ExportRow::from(total))?;
    }

    writer.into_inner().map_err(|e| ExportError::Flush(e.into_error()))
}

/// `count-DD-MM-YYYY.csv` for `date`.
pub fn export_filename(date: NaiveDate) -> String {
    format!("count-{}.csv", date.format("%d-%m-%Y"))
}

/// [`export_filename`] for today's local calendar date.
pub fn export_filename_today() -> String {
    export_filename(Local::now().date_naive())
}

/// A rendered export, ready to be written by the caller.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportFile {
    pub filename: String,
    pub contents: String,
}

impl ExportFile {
    pub fn build(totals: &[AggregatedTotal], only_reorder: bool, date: NaiveDate) -> Result<Self, ExportError> {
        Ok(Self {
            filename: export_filename(date),
            contents: export_csv(totals, only_reorder)?,
        })
    }

    /// Write the file into `dir`, replacing an earlier export of the same day.
    pub fn write_to(&self, dir: &Path) -> Result<PathBuf, ExportError> {
        let path = dir.join(&self.filename);
        std::fs::write(&path, &self.contents).map_err(|source| ExportError::Io {
            path: path.clone(),
            source,
        })?;
        tracing::info!(path = %path.display(), bytes = self.contents.len(), "export written");
        Ok(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use stocktake_core::{Quantity, Unit};

    fn total(name: &str, category: &str, minimum: u32, counted: u32) -> AggregatedTotal {
        let minimum = Quantity::new(minimum);
        let counted = Quantity::new(counted);
        AggregatedTotal {
            name: name.to_string(),
            category: category.to_string(),
            unit: Unit::Pieces,
            minimum_stock: minimum,
            total_counted: counted,
            reorder_quantity: minimum.shortfall_from(counted),
        }
    }

    #[test]
    fn writes_header_and_rows_in_field_order() {
        let totals = vec![total("Cola", "SOFT DRINKS", 24, 15), total("Merlot", "RED WINE", 6, 6)];
        let csv = export_csv(&totals, false).unwrap();
        assert_eq!(
            csv,
            "Name,Category,Total,Minimum,ToOrder\nCola,SOFT DRINKS,15,24,9\nMerlot,RED WINE,6,6,0\n"
        );
    }

    #[test]
    fn reorder_filter_keeps_only_shortfalls() {
        let totals = vec![total("Merlot", "RED WINE", 6, 6), total("Cola", "SOFT DRINKS", 24, 15)];
        let csv = export_csv(&totals, true).unwrap();
        assert_eq!(csv, "Name,Category,Total,Minimum,ToOrder\nCola,SOFT DRINKS,15,24,9\n");
    }

    #[test]
    fn header_is_written_without_rows() {
        let csv = export_csv(&[], true).unwrap();
        assert_eq!(csv, "Name,Category,Total,Minimum,ToOrder\n");
    }

    #[test]
    fn empty_category_is_an_empty_field() {
        let csv = export_csv(&[total("Water", "", 6, 0)], false).unwrap();
        assert!(csv.ends_with("Water,,0,6,6\n"));
    }

    #[test]
    fn names_with_commas_are_quoted() {
        let csv = export_csv(&[total("Gin, Tonic \"large\"", "MIXED", 4, 1)], false).unwrap();
        let mut reader = csv::Reader::from_reader(csv.as_bytes());
        let record = reader.records().next().unwrap().unwrap();
        assert_eq!(&record[0], "Gin, Tonic \"large\"");
        assert_eq!(&record[4], "3");
    }

    #[derive(Debug)]
    struct BrokenPipe;

    impl std::io::Write for BrokenPipe {
        fn write(&mut self, _: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "reader went away"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn flush_failure_keeps_io_error_as_source() {
        use std::error::Error as _;

        let err = write_csv(BrokenPipe, &[total("Cola", "SOFT DRINKS", 24, 0)], false).unwrap_err();
        let ExportError::Flush(io) = &err else {
            panic!("expected flush error, got {err:?}");
        };
        assert_eq!(io.kind(), std::io::ErrorKind::BrokenPipe);

        let source = err.source().and_then(|s| s.downcast_ref::<std::io::Error>()).unwrap();
        assert_eq!(source.kind(), std::io::ErrorKind::BrokenPipe);
    }

    #[test]
    fn filename_uses_day_month_year() {
        let date = NaiveDate::from_ymd_opt(2024, 3, 7).unwrap();
        assert_eq!(export_filename(date), "count-07-03-2024.csv");
    }

    #[test]
    fn write_to_creates_file() {
        let dir = std::env::temp_dir().join(format!("stocktake-export-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let date = NaiveDate::from_ymd_opt(2024, 12, 31).unwrap();
        let file = ExportFile::build(&[total("Cola", "SOFT DRINKS", 24, 0)], false, date).unwrap();
        let path = file.write_to(&dir).unwrap();

        assert_eq!(path.file_name().unwrap(), "count-31-12-2024.csv");
        assert_eq!(std::fs::read_to_string(&path).unwrap(), file.contents);
        std::fs::remove_dir_all(&dir).unwrap();
    }
}
