//! Line chart of total gross per month.

use crate::chart::{ChartKind, ChartPoint, ChartSpec, SeriesSpec};
use broadway_common::{MonthlySeries, ValueFormat};
use broadway_config::GraphsConfig;

/// Title of the monthly revenue chart.
pub const MONTHLY_REVENUE_TITLE: &str = "Monthly Broadway Gross Revenue";

/// Describes `series` as a single teal line starting from zero.
pub fn monthly_revenue_chart(series: &MonthlySeries, style: &GraphsConfig) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: MONTHLY_REVENUE_TITLE.to_string(),
        x_label: "Month".to_string(),
        y_label: "Gross Revenue".to_string(),
        value_format: ValueFormat::Currency,
        y_from_zero: true,
        series: vec![SeriesSpec {
            name: "Gross".to_string(),
            color: style.primary_color.clone(),
            line_width: style.line_width,
            points: series
                .iter()
                .map(|p| ChartPoint::monthly(p.month, p.value))
                .collect(),
        }],
    }
}
