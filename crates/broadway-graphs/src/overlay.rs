//! Historical sales of one show next to its offline forecast.

use crate::aggregator::{MonthlyAggregator, RecordFilter};
use crate::forecast::ForecastSeries;
use broadway_common::{MonthlySeries, Result, RevenueRecord};
use tracing::debug;

/// Legend label of the actual series.
pub const HISTORICAL_LABEL: &str = "Historical Sales";
/// Legend label of the forecast series.
pub const PREDICTED_LABEL: &str = "Predicted Sales";

/// Two independent series sharing only the month axis.
///
/// Nothing is merged or interpolated: a gap between the end of the actuals
/// and the start of the forecast is kept and renders as disjoint lines.
#[derive(Debug, Clone, PartialEq)]
pub struct ForecastOverlay {
    pub show_name: String,
    pub actual: MonthlySeries,
    pub predicted: ForecastSeries,
}

impl ForecastOverlay {
    /// Aggregates the actuals of `show_name` and pairs them with `predicted`.
    pub fn build(
        aggregator: &MonthlyAggregator,
        records: &[RevenueRecord],
        show_name: &str,
        predicted: ForecastSeries,
    ) -> Result<Self> {
        let actual = aggregator.aggregate_monthly(records, Some(&RecordFilter::show(show_name)))?;
        let overlay = Self {
            show_name: show_name.to_string(),
            actual,
            predicted,
        };
        debug!(
            show = show_name,
            actual = overlay.actual.len(),
            predicted = overlay.predicted.len(),
            gap = overlay.gap_months(),
            overlaps = overlay.overlaps(),
            "Built forecast overlay"
        );
        Ok(overlay)
    }

    /// Months strictly between the last actual and the first predicted month.
    ///
    /// Zero when the series touch or overlap, or when either is empty.
    pub fn gap_months(&self) -> i64 {
        match (self.actual.last_month(), self.predicted.first_month()) {
            (Some(actual_end), Some(forecast_start)) => {
                (forecast_start.ordinal() - actual_end.ordinal() - 1).max(0)
            }
            _ => 0,
        }
    }

    /// Whether any predicted month is also an actual month.
    pub fn overlaps(&self) -> bool {
        self.predicted
            .points()
            .iter()
            .any(|p| self.actual.value_at(p.month).is_some())
    }
}
