//! Test utilities and shared test helpers for the Broadway dashboard.
//!
//! This module provides common testing utilities, fixtures, and helper functions
//! that can be used across all crates in the workspace for unit and integration testing.

use crate::types::RevenueRecord;
use chrono::NaiveDate;
use std::sync::Once;
use tracing_subscriber::{fmt, EnvFilter};

/// Initialize test logging once per test run.
static INIT: Once = Once::new();

/// Initialize logging for tests with a sensible default configuration.
/// This function is safe to call multiple times and will only initialize once.
pub fn init_test_logging() {
    INIT.call_once(|| {
        let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));

        let _ = fmt().with_test_writer().with_env_filter(filter).try_init();
    });
}

/// Parse an ISO date literal, panicking on malformed fixtures.
pub fn date(iso: &str) -> NaiveDate {
    NaiveDate::parse_from_str(iso, "%Y-%m-%d").expect("fixture dates are ISO formatted")
}

/// Build a revenue record from literals.
pub fn record(show: &str, iso_date: &str, gross: f64) -> RevenueRecord {
    RevenueRecord::new(show, date(iso_date), gross)
}

/// Write `contents` to a named temporary file that cleans up on drop.
#[cfg(feature = "tempfile")]
pub fn write_temp_file(contents: &str) -> tempfile::NamedTempFile {
    use std::io::Write;

    let mut file = tempfile::NamedTempFile::new().expect("Failed to create temporary file");
    file.write_all(contents.as_bytes())
        .expect("Failed to write temporary file");
    file
}

/// Assert that two floating point numbers are approximately equal within a tolerance.
pub fn assert_approx_eq(left: f64, right: f64, tolerance: f64) {
    let diff = (left - right).abs();
    assert!(
        diff <= tolerance,
        "assertion failed: `{left}` is not approximately equal to `{right}` (tolerance: {tolerance}, diff: {diff})"
    );
}

/// Revenue datasets for aggregation and ranking tests.
pub mod revenue_fixtures {
    use super::record;
    use crate::types::RevenueRecord;

    /// Two records for one show with a missing month in between.
    pub fn gap_records() -> Vec<RevenueRecord> {
        vec![
            record("A", "2020-01-05", 100.0),
            record("A", "2020-03-10", 50.0),
        ]
    }

    /// One show reported in January, March and April, with February missing.
    pub fn interior_gap_records() -> Vec<RevenueRecord> {
        vec![
            record("A", "2020-01-05", 100.0),
            record("A", "2020-03-08", 60.0),
            record("A", "2020-03-22", 40.0),
            record("A", "2020-04-12", 75.0),
        ]
    }

    /// Three shows over half a year of weekly reports.
    ///
    /// "Wicked" runs every week, "Chicago" skips April, "Cats" closes in February.
    pub fn season_records() -> Vec<RevenueRecord> {
        let mut records = Vec::new();
        let weeks = [
            "2015-01-04", "2015-01-11", "2015-02-01", "2015-02-15", "2015-03-01", "2015-03-22",
            "2015-04-05", "2015-04-26", "2015-05-03", "2015-05-17", "2015-06-07",
        ];
        for week in weeks {
            records.push(record("Wicked", week, 1_800_000.0));
            if !week.starts_with("2015-04") {
                records.push(record("Chicago", week, 700_000.0));
            }
            if week < "2015-03-01" {
                records.push(record("Cats", week, 400_000.0));
            }
        }
        records
    }

    /// Show "A" three times and show "B" five times, interleaved.
    pub fn count_records() -> Vec<RevenueRecord> {
        vec![
            record("A", "2019-01-06", 10.0),
            record("B", "2019-01-06", 10.0),
            record("A", "2019-01-13", 10.0),
            record("B", "2019-01-13", 10.0),
            record("B", "2019-01-20", 10.0),
            record("A", "2019-01-20", 10.0),
            record("B", "2019-01-27", 10.0),
            record("B", "2019-02-03", 10.0),
        ]
    }
}

/// CSV sources in the layout of the published dataset.
pub mod csv_fixtures {
    /// A small primary dataset, including a 1990 row that must be excluded.
    pub fn broadway_csv() -> &'static str {
        concat!(
            "Date.Day,Date.Full,Date.Month,Date.Year,Show.Name,Show.Theatre,Show.Type,",
            "Statistics.Attendance,Statistics.Capacity,Statistics.Gross,",
            "Statistics.Gross Potential,Statistics.Performances\n",
            "26,8/26/1990,8,1990,Les Miserables,Imperial,Musical,9000,100,500000,0,8\n",
            "5,1/5/2014,1,2014,Wicked,Gershwin,Musical,14000,99,2100000,95,8\n",
            "5,1/5/2014,1,2014,Chicago,Ambassador,Musical,8000,88,650000,70,8\n",
            "12,1/12/2014,1,2014,Wicked,Gershwin,Musical,13800,98,1900000,93,8\n",
            "2,3/2/2014,3,2014,Wicked,Gershwin,Musical,13000,95,1500000,90,8\n",
            "2,3/2/2014,3,2014,Chicago,Ambassador,Musical,7000,80,500000,66,8\n",
            "6,4/6/2014,4,2014,Wicked,Gershwin,Musical,12000,90,1000000,80,4\n",
        )
    }

    /// A forecast produced offline for the default forecast show.
    pub fn forecast_csv() -> &'static str {
        concat!(
            "DateMonth,predicted_mean\n",
            "2014-04-01,1450000.5\n",
            "2014-05-01,1480000.25\n",
            "2014-06-01,1510000.0\n",
        )
    }
}

/// Property-based testing strategies using proptest.
#[cfg(feature = "proptest")]
pub mod property_testing {
    use crate::types::RevenueRecord;
    use chrono::NaiveDate;
    use proptest::prelude::*;

    /// Show names drawn from a small pool so that shows repeat across records.
    pub fn show_name_strategy() -> impl Strategy<Value = String> {
        prop::sample::select(vec!["Wicked", "Chicago", "Cats", "Rent", "Annie", "Hair", "Evita"])
            .prop_map(str::to_string)
    }

    /// Report dates between 1985 and 2020.
    pub fn date_strategy() -> impl Strategy<Value = NaiveDate> {
        (1985i32..=2020, 1u32..=12, 1u32..=28)
            .prop_filter_map("valid calendar date", |(y, m, d)| NaiveDate::from_ymd_opt(y, m, d))
    }

    /// Whole-dollar grosses, so sums stay exact.
    pub fn gross_strategy() -> impl Strategy<Value = f64> {
        (0u32..=3_000_000).prop_map(f64::from)
    }

    /// One record with a pooled show name, a date and a whole-dollar gross.
    pub fn record_strategy() -> impl Strategy<Value = RevenueRecord> {
        (show_name_strategy(), date_strategy(), gross_strategy())
            .prop_map(|(show, date, gross)| RevenueRecord::new(show, date, gross))
    }

    /// Between one and `max_len` records.
    pub fn records_strategy(max_len: usize) -> impl Strategy<Value = Vec<RevenueRecord>> {
        prop::collection::vec(record_strategy(), 1..=max_len)
    }
}
