//! Dual-line chart of actual versus predicted sales.

use crate::chart::{ChartKind, ChartPoint, ChartSpec, SeriesSpec};
use crate::overlay::{ForecastOverlay, HISTORICAL_LABEL, PREDICTED_LABEL};
use broadway_common::ValueFormat;
use broadway_config::GraphsConfig;

/// Stroke width of both forecast lines.
const FORECAST_LINE_WIDTH: u32 = 2;

/// Describes the overlay as two independent lines on a shared month axis.
pub fn forecast_chart(overlay: &ForecastOverlay, style: &GraphsConfig) -> ChartSpec {
    ChartSpec {
        kind: ChartKind::Line,
        title: format!("Monthly Forecast of {}'s Broadway Sales", overlay.show_name),
        x_label: "Month".to_string(),
        y_label: "Gross Revenue".to_string(),
        value_format: ValueFormat::CurrencySi,
        y_from_zero: false,
        series: vec![
            SeriesSpec {
                name: HISTORICAL_LABEL.to_string(),
                color: style.historical_color.clone(),
                line_width: FORECAST_LINE_WIDTH,
                points: overlay
                    .actual
                    .iter()
                    .map(|p| ChartPoint::monthly(p.month, p.value))
                    .collect(),
            },
            SeriesSpec {
                name: PREDICTED_LABEL.to_string(),
                color: style.predicted_color.clone(),
                line_width: FORECAST_LINE_WIDTH,
                points: overlay
                    .predicted
                    .points()
                    .iter()
                    .map(|p| ChartPoint::monthly(p.month, p.predicted))
                    .collect(),
            },
        ],
    }
}
