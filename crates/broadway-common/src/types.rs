//! Domain types shared by the loader, the aggregation pipeline and the renderers.

use crate::error::BroadwayError;
use crate::utils::ValueFormat;
use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// One reporting period of one show, as read from the source dataset.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RevenueRecord {
    /// Show title.
    pub show_name: String,
    /// Reporting date.
    pub date: NaiveDate,
    /// Gross revenue for the period.
    pub gross: f64,
}

impl RevenueRecord {
    /// Creates a new record.
    pub fn new(show_name: impl Into<String>, date: NaiveDate, gross: f64) -> Self {
        Self {
            show_name: show_name.into(),
            date,
            gross,
        }
    }

    /// Monthly bucket this record falls into.
    pub fn month(&self) -> MonthKey {
        MonthKey::from_date(self.date)
    }
}

/// A calendar month, the aggregation bucket of every monthly series.
///
/// Ordering is chronological. Serialized as `YYYY-MM`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub struct MonthKey {
    year: i32,
    month: u32,
}

impl MonthKey {
    /// Creates a month key, returning `None` when `month` is outside 1..=12.
    pub fn new(year: i32, month: u32) -> Option<Self> {
        (1..=12).contains(&month).then_some(Self { year, month })
    }

    /// Truncates a date to its month.
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// Calendar year.
    pub fn year(self) -> i32 {
        self.year
    }

    /// Month of year, 1-12.
    pub fn month(self) -> u32 {
        self.month
    }

    /// The following calendar month.
    #[must_use]
    pub fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// Months elapsed since year 0; consecutive months differ by exactly one.
    pub fn ordinal(self) -> i64 {
        i64::from(self.year) * 12 + i64::from(self.month) - 1
    }

    /// Inverse of [`MonthKey::ordinal`].
    pub fn from_ordinal(ordinal: i64) -> Option<Self> {
        let year = i32::try_from(ordinal.div_euclid(12)).ok()?;
        let month = u32::try_from(ordinal.rem_euclid(12) + 1).ok()?;
        Self::new(year, month)
    }

    /// Short label such as `Jan 2016`, used on chart axes.
    pub fn short_label(self) -> String {
        const ABBR: [&str; 12] = [
            "Jan", "Feb", "Mar", "Apr", "May", "Jun", "Jul", "Aug", "Sep", "Oct", "Nov", "Dec",
        ];
        format!("{} {}", ABBR[(self.month - 1) as usize], self.year)
    }
}

impl fmt::Display for MonthKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl FromStr for MonthKey {
    type Err = BroadwayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || BroadwayError::data_format(format!("Invalid month '{s}', expected YYYY-MM"));
        let (year, month) = s.trim().split_once('-').ok_or_else(invalid)?;
        let year = year.parse::<i32>().map_err(|_| invalid())?;
        let month = month.parse::<u32>().map_err(|_| invalid())?;
        Self::new(year, month).ok_or_else(invalid)
    }
}

impl From<MonthKey> for String {
    fn from(key: MonthKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for MonthKey {
    type Error = BroadwayError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// One entry of a monthly series.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MonthlyPoint {
    /// Bucket month.
    pub month: MonthKey,
    /// Aggregated value for the month.
    pub value: f64,
}

/// Chronologically ordered monthly values.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MonthlySeries {
    points: Vec<MonthlyPoint>,
}

impl MonthlySeries {
    /// Builds a series, sorting the points chronologically.
    pub fn from_points(mut points: Vec<MonthlyPoint>) -> Self {
        points.sort_by_key(|p| p.month);
        Self { points }
    }

    /// Ordered points.
    pub fn points(&self) -> &[MonthlyPoint] {
        &self.points
    }

    /// Iterates over the points in order.
    pub fn iter(&self) -> std::slice::Iter<'_, MonthlyPoint> {
        self.points.iter()
    }

    /// Number of months.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Whether the series holds no months.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// First month of the series.
    pub fn first_month(&self) -> Option<MonthKey> {
        self.points.first().map(|p| p.month)
    }

    /// Last month of the series.
    pub fn last_month(&self) -> Option<MonthKey> {
        self.points.last().map(|p| p.month)
    }

    /// Value recorded for `month`, if the month is part of the series.
    pub fn value_at(&self, month: MonthKey) -> Option<f64> {
        self.points
            .binary_search_by_key(&month, |p| p.month)
            .ok()
            .map(|idx| self.points[idx].value)
    }

    /// Sum of all values.
    pub fn total(&self) -> f64 {
        self.points.iter().map(|p| p.value).sum()
    }

    /// Mean value per month.
    pub fn average(&self) -> f64 {
        if self.points.is_empty() {
            return 0.0;
        }
        self.total() / self.points.len() as f64
    }

    /// Month with the highest value; the earliest wins on ties.
    pub fn peak(&self) -> Option<&MonthlyPoint> {
        self.points
            .iter()
            .reduce(|best, p| if p.value > best.value { p } else { best })
    }

    /// Whether consecutive points are exactly one month apart.
    pub fn is_contiguous(&self) -> bool {
        self.points.windows(2).all(|w| w[0].month.next() == w[1].month)
    }
}

impl<'a> IntoIterator for &'a MonthlySeries {
    type Item = &'a MonthlyPoint;
    type IntoIter = std::slice::Iter<'a, MonthlyPoint>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Metric used to rank shows against each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RankingMetric {
    /// Mean gross per reporting period.
    #[serde(alias = "average")]
    AveragePerRecord,
    /// Sum of gross.
    #[serde(alias = "total_revenue")]
    Total,
    /// Number of reporting periods ("running weeks").
    #[serde(alias = "running_weeks", alias = "weeks")]
    Count,
}

impl RankingMetric {
    /// All metrics in selector order.
    pub const ALL: [Self; 3] = [Self::AveragePerRecord, Self::Total, Self::Count];

    /// Label shown in the metric selector.
    pub fn label(self) -> &'static str {
        match self {
            Self::AveragePerRecord => "Average Gross per Week",
            Self::Total => "Total Revenue",
            Self::Count => "Running Weeks",
        }
    }

    /// Column name of the ranked value.
    pub fn column_label(self) -> &'static str {
        match self {
            Self::AveragePerRecord => "Average Gross",
            Self::Total => "Total Revenue",
            Self::Count => "Running Weeks",
        }
    }

    /// Chart title for a top-`n` ranking.
    pub fn chart_title(self, n: usize) -> String {
        match self {
            Self::AveragePerRecord => {
                format!("Top {n} Broadway Shows by Average Gross per Week")
            }
            Self::Total => format!("Top {n} Broadway Shows by Total Revenue"),
            Self::Count => format!("Top {n} Broadway Shows by Number of Running Weeks"),
        }
    }

    /// Value axis title.
    pub fn y_axis_title(self) -> &'static str {
        match self {
            Self::AveragePerRecord => "Average Gross Revenue (Millions $)",
            Self::Total => "Total Revenue (Millions $)",
            Self::Count => "Number of Weeks",
        }
    }

    /// How ranked values are printed.
    pub fn value_format(self) -> ValueFormat {
        match self {
            Self::AveragePerRecord | Self::Total => ValueFormat::CurrencySi,
            Self::Count => ValueFormat::Si,
        }
    }
}

impl fmt::Display for RankingMetric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for RankingMetric {
    type Err = BroadwayError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', '_'], " ");
        match normalized.as_str() {
            "average gross per week" | "average per record" | "average" | "avg" => {
                Ok(Self::AveragePerRecord)
            }
            "total revenue" | "total" => Ok(Self::Total),
            "running weeks" | "count" | "weeks" => Ok(Self::Count),
            _ => Err(BroadwayError::invalid_parameter(
                "metric",
                format!(
                    "unknown metric '{}', expected one of: {}",
                    s.trim(),
                    Self::ALL.map(Self::label).join(", ")
                ),
            )),
        }
    }
}

/// One row of a ranking table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingEntry {
    /// Show title.
    pub show_name: String,
    /// Metric value for the show.
    pub value: f64,
}

/// Shows ordered by a metric, highest first.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankingTable {
    /// Metric the table was ranked by.
    pub metric: RankingMetric,
    /// Ranked rows.
    pub entries: Vec<RankingEntry>,
}

impl RankingTable {
    /// Number of ranked shows.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the table is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether values never increase down the table.
    pub fn is_sorted_descending(&self) -> bool {
        self.entries.windows(2).all(|w| w[0].value >= w[1].value)
    }

    /// Show names in rank order.
    pub fn show_names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|e| e.show_name.as_str())
    }
}

/// One month of an externally produced forecast.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ForecastPoint {
    /// Forecast month.
    pub month: MonthKey,
    /// Predicted mean value.
    pub predicted: f64,
}
