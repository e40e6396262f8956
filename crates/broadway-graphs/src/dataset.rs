//! Loading of the primary revenue dataset into an immutable, typed handle.

use broadway_common::{BroadwayError, Result, RevenueRecord};
use chrono::NaiveDate;
use serde::Deserialize;
use std::collections::HashSet;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{debug, info, instrument};

/// Columns the primary dataset must provide; any others are ignored.
pub const REQUIRED_COLUMNS: [&str; 4] = ["Show.Name", "Date.Full", "Date.Year", "Statistics.Gross"];

/// Accepted spellings of `Date.Full`.
const DATE_FORMATS: [&str; 3] = ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"];

#[derive(Debug, Deserialize)]
struct RawRevenueRow {
    #[serde(rename = "Show.Name")]
    show_name: String,
    #[serde(rename = "Date.Full")]
    date_full: String,
    #[serde(rename = "Date.Year")]
    date_year: i32,
    #[serde(rename = "Statistics.Gross")]
    gross: f64,
}

/// Options applied while reading the primary dataset.
#[derive(Debug, Clone, Default)]
pub struct LoadOptions {
    /// Rows whose `Date.Year` is listed here are skipped.
    pub excluded_years: Vec<i32>,
}

impl LoadOptions {
    /// Options excluding the given years.
    pub fn excluding_years(years: impl IntoIterator<Item = i32>) -> Self {
        Self {
            excluded_years: years.into_iter().collect(),
        }
    }
}

/// Parse a `Date.Full` value.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(value, fmt).ok())
}

pub(crate) fn ensure_columns<R: Read>(
    reader: &mut csv::Reader<R>,
    required: &[&str],
    source: &str,
) -> Result<()> {
    let headers = reader.headers()?;
    let missing: Vec<&str> = required
        .iter()
        .copied()
        .filter(|col| !headers.iter().any(|h| h == *col))
        .collect();

    if missing.is_empty() {
        Ok(())
    } else {
        Err(BroadwayError::data_format(format!(
            "{source} is missing required column(s): {}",
            missing.join(", ")
        )))
    }
}

/// Read-only revenue records, loaded once and shared by every view.
#[derive(Debug, Clone, Default)]
pub struct Dataset {
    records: Vec<RevenueRecord>,
    excluded_rows: usize,
}

impl Dataset {
    /// Wraps already-typed records.
    pub fn from_records(records: Vec<RevenueRecord>) -> Self {
        Self {
            records,
            excluded_rows: 0,
        }
    }

    /// Loads the dataset from a CSV file.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>, options: &LoadOptions) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            BroadwayError::data_format_with_source(
                format!("Cannot open dataset {}", path.display()),
                e,
            )
        })?;
        let dataset = Self::from_reader(file, options)?;
        info!(
            records = dataset.len(),
            excluded = dataset.excluded_rows,
            shows = dataset.show_count(),
            "Loaded revenue dataset"
        );
        Ok(dataset)
    }

    /// Loads the dataset from any CSV source.
    pub fn from_reader<R: Read>(source: R, options: &LoadOptions) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        ensure_columns(&mut reader, &REQUIRED_COLUMNS, "Revenue dataset")?;

        let mut records = Vec::new();
        let mut excluded_rows = 0;

        for (idx, row) in reader.deserialize::<RawRevenueRow>().enumerate() {
            let row = row?;
            if options.excluded_years.contains(&row.date_year) {
                excluded_rows += 1;
                continue;
            }

            let date = parse_date(&row.date_full).ok_or_else(|| {
                BroadwayError::data_format_at(
                    format!("Unparseable date '{}'", row.date_full),
                    idx as u64 + 1,
                )
            })?;

            records.push(RevenueRecord::new(row.show_name, date, row.gross));
        }

        debug!(records = records.len(), excluded_rows, "Parsed revenue rows");
        Ok(Self {
            records,
            excluded_rows,
        })
    }

    /// All records in source order.
    pub fn records(&self) -> &[RevenueRecord] {
        &self.records
    }

    /// Number of loaded records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether no record was loaded.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Rows skipped because of an excluded year.
    pub fn excluded_rows(&self) -> usize {
        self.excluded_rows
    }

    /// Number of distinct shows.
    pub fn show_count(&self) -> usize {
        self.records
            .iter()
            .map(|r| r.show_name.as_str())
            .collect::<HashSet<_>>()
            .len()
    }

    /// Whether any record belongs to `show`.
    pub fn contains_show(&self, show: &str) -> bool {
        self.records.iter().any(|r| r.show_name == show)
    }

    /// Earliest and latest record dates.
    pub fn date_range(&self) -> Option<(NaiveDate, NaiveDate)> {
        let first = self.records.iter().map(|r| r.date).min()?;
        let last = self.records.iter().map(|r| r.date).max()?;
        Some((first, last))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadway_common::test_utils::csv_fixtures;

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(2016, 7, 31).unwrap();
        assert_eq!(parse_date("2016-07-31"), Some(expected));
        assert_eq!(parse_date("7/31/2016"), Some(expected));
        assert_eq!(parse_date(" 2016/07/31 "), Some(expected));
        assert_eq!(parse_date("31st July"), None);
        assert_eq!(parse_date("2016-02-30"), None);
    }

    #[test]
    fn test_load_excludes_known_bad_year() {
        let options = LoadOptions::excluding_years([1990]);
        let dataset = Dataset::from_reader(csv_fixtures::broadway_csv().as_bytes(), &options).unwrap();

        assert_eq!(dataset.len(), 6);
        assert_eq!(dataset.excluded_rows(), 1);
        assert!(!dataset.contains_show("Les Miserables"));
        assert_eq!(dataset.show_count(), 2);
        assert_eq!(dataset.records()[0].gross, 2_100_000.0);
    }

    #[test]
    fn test_load_without_exclusions_keeps_all_rows() {
        let dataset =
            Dataset::from_reader(csv_fixtures::broadway_csv().as_bytes(), &LoadOptions::default())
                .unwrap();
        assert_eq!(dataset.len(), 7);
        let (first, last) = dataset.date_range().unwrap();
        assert_eq!(first.to_string(), "1990-08-26");
        assert_eq!(last.to_string(), "2014-04-06");
    }

    #[test]
    fn test_missing_column_is_data_format_error() {
        let csv = "Show.Name,Date.Full,Statistics.Gross\nWicked,2014-01-05,100\n";
        let err = Dataset::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap_err();

        assert!(matches!(err, BroadwayError::DataFormat { .. }));
        assert!(err.to_string().contains("Date.Year"));
    }

    #[test]
    fn test_bad_date_reports_row() {
        let csv = "Show.Name,Date.Full,Date.Year,Statistics.Gross\n\
                   Wicked,2014-01-05,2014,100\n\
                   Wicked,soon,2014,100\n";
        let err = Dataset::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap_err();

        match err {
            BroadwayError::DataFormat { row, message, .. } => {
                assert_eq!(row, Some(2));
                assert!(message.contains("soon"));
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_non_numeric_gross_is_data_format_error() {
        let csv = "Show.Name,Date.Full,Date.Year,Statistics.Gross\nWicked,2014-01-05,2014,lots\n";
        let err = Dataset::from_reader(csv.as_bytes(), &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, BroadwayError::DataFormat { row: Some(1), .. }));
    }

    #[test]
    fn test_missing_file_is_data_format_error() {
        let err = Dataset::from_path("no/such/broadway.csv", &LoadOptions::default()).unwrap_err();
        assert!(matches!(err, BroadwayError::DataFormat { .. }));
    }
}
