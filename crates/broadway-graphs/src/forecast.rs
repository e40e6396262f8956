//! Loading of the offline forecast (`DateMonth`, `predicted_mean`).

use crate::dataset::ensure_columns;
use broadway_common::{BroadwayError, ForecastPoint, MonthKey, Result};
use chrono::{NaiveDate, NaiveDateTime};
use serde::Deserialize;
use std::fs::File;
use std::io::Read;
use std::path::Path;
use tracing::{info, instrument, warn};

/// Columns the forecast file must provide.
pub const FORECAST_COLUMNS: [&str; 2] = ["DateMonth", "predicted_mean"];

#[derive(Debug, Deserialize)]
struct RawForecastRow {
    #[serde(rename = "DateMonth")]
    date_month: String,
    predicted_mean: f64,
}

/// Parse a `DateMonth` value into its month.
///
/// Accepts `YYYY-MM-DD`, `YYYY-MM-DD HH:MM:SS` and `YYYY-MM`.
pub fn parse_month(value: &str) -> Option<MonthKey> {
    let value = value.trim();
    if let Ok(date) = NaiveDate::parse_from_str(value, "%Y-%m-%d") {
        return Some(MonthKey::from_date(date));
    }
    if let Ok(datetime) = NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S") {
        return Some(MonthKey::from_date(datetime.date()));
    }
    value.parse().ok()
}

/// Predicted monthly values, ordered by month.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ForecastSeries {
    points: Vec<ForecastPoint>,
}

impl ForecastSeries {
    /// Builds a series, sorting points chronologically.
    pub fn from_points(mut points: Vec<ForecastPoint>) -> Self {
        points.sort_by_key(|p| p.month);
        Self { points }
    }

    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file = File::open(path).map_err(|e| {
            BroadwayError::data_format_with_source(
                format!("Cannot open forecast {}", path.display()),
                e,
            )
        })?;
        let series = Self::from_reader(file)?;
        info!(months = series.len(), "Loaded forecast");
        Ok(series)
    }

    pub fn from_reader<R: Read>(source: R) -> Result<Self> {
        let mut reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(source);
        ensure_columns(&mut reader, &FORECAST_COLUMNS, "Forecast dataset")?;

        let mut points = Vec::new();
        for (idx, row) in reader.deserialize::<RawForecastRow>().enumerate() {
            let row = row?;
            let month = parse_month(&row.date_month).ok_or_else(|| {
                BroadwayError::data_format_at(
                    format!("Unparseable forecast month '{}'", row.date_month),
                    idx as u64 + 1,
                )
            })?;
            points.push(ForecastPoint {
                month,
                predicted: row.predicted_mean,
            });
        }

        let series = Self::from_points(points);
        if series.points.windows(2).any(|w| w[0].month == w[1].month) {
            warn!("Forecast contains several rows for the same month");
        }
        Ok(series)
    }

    pub fn points(&self) -> &[ForecastPoint] {
        &self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn first_month(&self) -> Option<MonthKey> {
        self.points.first().map(|p| p.month)
    }

    pub fn last_month(&self) -> Option<MonthKey> {
        self.points.last().map(|p| p.month)
    }
}
