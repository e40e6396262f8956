//! Monthly aggregation of revenue records into gap-free series.

use broadway_common::{BroadwayError, MonthKey, MonthlyPoint, MonthlySeries, Result, RevenueRecord};
use broadway_config::AggregationConfig;
use chrono::Datelike;
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, instrument};

/// Named aggregation policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AggregationPolicy {
    /// Exclude the chronologically last month, which is a partial reporting period
    /// in the published dataset.
    pub drop_last_bucket: bool,
    /// Emit zero-valued months for months without records.
    pub fill_gaps: bool,
}

impl AggregationPolicy {
    /// Behavior of the published dashboard.
    pub const DASHBOARD: Self = Self {
        drop_last_bucket: true,
        fill_gaps: true,
    };

    /// Plain grouping: every bucket kept, no filled months.
    pub const RAW: Self = Self {
        drop_last_bucket: false,
        fill_gaps: false,
    };
}

impl Default for AggregationPolicy {
    fn default() -> Self {
        Self::DASHBOARD
    }
}

impl From<&AggregationConfig> for AggregationPolicy {
    fn from(config: &AggregationConfig) -> Self {
        Self {
            drop_last_bucket: config.drop_last_bucket,
            fill_gaps: config.fill_gaps,
        }
    }
}

/// Record selection applied before grouping.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RecordFilter {
    /// Records of one show, matched exactly.
    Show(String),
    /// Records dated in one calendar year.
    Year(i32),
}

impl RecordFilter {
    pub fn show(name: impl Into<String>) -> Self {
        Self::Show(name.into())
    }

    pub fn matches(&self, record: &RevenueRecord) -> bool {
        match self {
            Self::Show(name) => record.show_name == *name,
            Self::Year(year) => record.date.year() == *year,
        }
    }
}

impl fmt::Display for RecordFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Show(name) => write!(f, "show '{name}'"),
            Self::Year(year) => write!(f, "year {year}"),
        }
    }
}

/// Groups records into calendar months under an [`AggregationPolicy`].
#[derive(Debug, Clone, Copy, Default)]
pub struct MonthlyAggregator {
    policy: AggregationPolicy,
}

impl MonthlyAggregator {
    pub fn new(policy: AggregationPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> AggregationPolicy {
        self.policy
    }

    /// Sums gross per month over the records accepted by `filter`.
    ///
    /// With the dashboard policy the last month is dropped and every month
    /// between the first and last remaining bucket is present, so consecutive
    /// points are exactly one month apart.
    ///
    /// # Errors
    ///
    /// [`BroadwayError::EmptyDataset`] when no record passes the filter, or when
    /// dropping the last bucket leaves nothing.
    #[instrument(skip(self, records), fields(records = records.len()))]
    pub fn aggregate_monthly(
        &self,
        records: &[RevenueRecord],
        filter: Option<&RecordFilter>,
    ) -> Result<MonthlySeries> {
        let mut buckets: BTreeMap<MonthKey, f64> = BTreeMap::new();
        for record in records
            .iter()
            .filter(|r| filter.map_or(true, |f| f.matches(r)))
        {
            *buckets.entry(record.month()).or_insert(0.0) += record.gross;
        }

        if buckets.is_empty() {
            return Err(BroadwayError::empty_dataset(match filter {
                Some(f) => format!("No records match {f}"),
                None => "No records to aggregate".to_string(),
            }));
        }

        if self.policy.drop_last_bucket {
            if let Some((month, value)) = buckets.pop_last() {
                debug!(%month, value, "Dropped last monthly bucket");
            }
            if buckets.is_empty() {
                return Err(BroadwayError::empty_dataset(
                    "Only a single month of records remains, and it is the dropped partial month",
                ));
            }
        }

        let points = if self.policy.fill_gaps {
            fill_gaps(&buckets)
        } else {
            buckets
                .into_iter()
                .map(|(month, value)| MonthlyPoint { month, value })
                .collect()
        };

        debug!(months = points.len(), "Aggregated monthly series");
        Ok(MonthlySeries::from_points(points))
    }
}

fn fill_gaps(buckets: &BTreeMap<MonthKey, f64>) -> Vec<MonthlyPoint> {
    let (Some((&first, _)), Some((&last, _))) = (buckets.first_key_value(), buckets.last_key_value())
    else {
        return Vec::new();
    };

    let mut points = Vec::with_capacity((last.ordinal() - first.ordinal() + 1) as usize);
    let mut month = first;
    loop {
        points.push(MonthlyPoint {
            month,
            value: buckets.get(&month).copied().unwrap_or(0.0),
        });
        if month == last {
            break;
        }
        month = month.next();
    }
    points
}

/// [`MonthlyAggregator::aggregate_monthly`] with the dashboard policy.
pub fn aggregate_monthly(
    records: &[RevenueRecord],
    filter: Option<&RecordFilter>,
) -> Result<MonthlySeries> {
    MonthlyAggregator::default().aggregate_monthly(records, filter)
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadway_common::test_utils::{assert_approx_eq, record, revenue_fixtures};

    fn key(year: i32, month: u32) -> MonthKey {
        MonthKey::new(year, month).unwrap()
    }

    fn points(series: &MonthlySeries) -> Vec<(MonthKey, f64)> {
        series.iter().map(|p| (p.month, p.value)).collect()
    }

    #[test]
    fn test_last_month_dropped_before_gap_fill() {
        // March is dropped first, so the range ends at January
        let series = aggregate_monthly(&revenue_fixtures::gap_records(), None).unwrap();
        assert_eq!(points(&series), vec![(key(2020, 1), 100.0)]);
    }

    #[test]
    fn test_interior_gap_filled_with_zero() {
        let series = aggregate_monthly(&revenue_fixtures::interior_gap_records(), None).unwrap();
        assert_eq!(
            points(&series),
            vec![(key(2020, 1), 100.0), (key(2020, 2), 0.0), (key(2020, 3), 100.0)]
        );
    }

    #[test]
    fn test_raw_policy_keeps_buckets_as_grouped() {
        let aggregator = MonthlyAggregator::new(AggregationPolicy::RAW);
        let series = aggregator
            .aggregate_monthly(&revenue_fixtures::gap_records(), None)
            .unwrap();

        assert_eq!(series.len(), 2);
        assert_eq!(series.value_at(key(2020, 3)), Some(50.0));
        assert_eq!(series.value_at(key(2020, 2)), None);
        assert!(!series.is_contiguous());
    }

    #[test]
    fn test_fill_without_drop() {
        let aggregator = MonthlyAggregator::new(AggregationPolicy {
            drop_last_bucket: false,
            fill_gaps: true,
        });
        let series = aggregator
            .aggregate_monthly(&revenue_fixtures::gap_records(), None)
            .unwrap();

        assert_eq!(series.len(), 3);
        assert_eq!(series.total(), 150.0);
        assert!(series.is_contiguous());
    }

    #[test]
    fn test_output_has_no_gaps() {
        let records = revenue_fixtures::season_records();
        for filter in [
            None,
            Some(RecordFilter::show("Chicago")),
            Some(RecordFilter::show("Cats")),
            Some(RecordFilter::Year(2015)),
        ] {
            let series = aggregate_monthly(&records, filter.as_ref()).unwrap();
            for pair in series.points().windows(2) {
                assert_eq!(pair[0].month.next(), pair[1].month, "gap with {filter:?}");
            }
        }
    }

    #[test]
    fn test_sum_matches_input_minus_dropped_month() {
        let records = revenue_fixtures::season_records();
        let last_month = records.iter().map(RevenueRecord::month).max().unwrap();
        let expected: f64 = records
            .iter()
            .filter(|r| r.month() != last_month)
            .map(|r| r.gross)
            .sum();

        let series = aggregate_monthly(&records, None).unwrap();

        assert_approx_eq(series.total(), expected, 1e-6);
        assert_eq!(series.last_month(), Some(key(2015, 5)));
    }

    #[test]
    fn test_show_filter_fills_missing_month_with_zero() {
        let records = revenue_fixtures::season_records();
        let series = aggregate_monthly(&records, Some(&RecordFilter::show("Chicago"))).unwrap();

        assert_eq!(series.value_at(key(2015, 4)), Some(0.0));
        assert_eq!(series.value_at(key(2015, 1)), Some(1_400_000.0));
    }

    #[test]
    fn test_empty_input_is_empty_dataset() {
        let err = aggregate_monthly(&[], None).unwrap_err();
        assert!(matches!(err, BroadwayError::EmptyDataset { .. }));
    }

    #[test]
    fn test_filter_without_matches_is_empty_dataset() {
        let records = revenue_fixtures::season_records();
        let err = aggregate_monthly(&records, Some(&RecordFilter::show("Hamilton"))).unwrap_err();

        assert!(matches!(err, BroadwayError::EmptyDataset { .. }));
        assert!(err.to_string().contains("Hamilton"));
    }

    #[test]
    fn test_single_month_is_empty_after_drop() {
        let records = vec![record("A", "2020-05-01", 10.0), record("A", "2020-05-20", 5.0)];
        let err = aggregate_monthly(&records, None).unwrap_err();
        assert!(matches!(err, BroadwayError::EmptyDataset { .. }));

        let series = MonthlyAggregator::new(AggregationPolicy::RAW)
            .aggregate_monthly(&records, None)
            .unwrap();
        assert_eq!(series.total(), 15.0);
    }

    #[test]
    fn test_policy_from_config() {
        let config = AggregationConfig {
            drop_last_bucket: false,
            fill_gaps: true,
        };
        let policy = AggregationPolicy::from(&config);
        assert!(!policy.drop_last_bucket);
        assert!(policy.fill_gaps);
        assert_eq!(AggregationPolicy::default(), AggregationPolicy::DASHBOARD);
    }

    mod property_tests {
        use super::*;
        use broadway_common::test_utils::property_testing::records_strategy;
        use proptest::prelude::*;
        use std::collections::BTreeSet;

        proptest! {
            #[test]
            fn test_property_output_has_no_gaps(records in records_strategy(60)) {
                let months: BTreeSet<MonthKey> = records.iter().map(RevenueRecord::month).collect();
                match aggregate_monthly(&records, None) {
                    Ok(series) => {
                        prop_assert!(months.len() >= 2);
                        for pair in series.points().windows(2) {
                            prop_assert_eq!(pair[0].month.next(), pair[1].month);
                        }
                        prop_assert_eq!(series.first_month(), months.first().copied());
                    }
                    Err(err) => {
                        prop_assert!(months.len() < 2);
                        prop_assert!(matches!(err, BroadwayError::EmptyDataset { .. }), "unexpected: {}", err);
                    }
                }
            }

            #[test]
            fn test_property_sum_excludes_last_month(records in records_strategy(60)) {
                let last_month = records.iter().map(RevenueRecord::month).max().unwrap();
                let expected: f64 = records
                    .iter()
                    .filter(|r| r.month() != last_month)
                    .map(|r| r.gross)
                    .sum();

                if let Ok(series) = aggregate_monthly(&records, None) {
                    assert_approx_eq(series.total(), expected, 1e-6);
                    prop_assert!(series.last_month() < Some(last_month));
                }
            }
        }
    }

    #[test]
    fn test_year_filter_matches_calendar_year() {
        let filter = RecordFilter::Year(2019);
        assert!(filter.matches(&record("A", "2019-12-29", 1.0)));
        assert!(!filter.matches(&record("A", "2020-01-05", 1.0)));
        assert_eq!(filter.to_string(), "year 2019");
    }
}
