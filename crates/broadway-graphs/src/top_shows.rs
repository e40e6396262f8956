//! Bar chart of the top-N ranking.

use crate::chart::{ChartKind, ChartPoint, ChartSpec, SeriesSpec};
use broadway_common::RankingTable;
use broadway_config::GraphsConfig;

/// Describes `table` as teal bars, one per show, in rank order.
///
/// The title reflects the requested `n`, which may exceed the number of bars
/// when fewer shows exist.
pub fn top_shows_chart(table: &RankingTable, n: usize, style: &GraphsConfig) -> ChartSpec {
    let metric = table.metric;
    ChartSpec {
        kind: ChartKind::Bar,
        title: metric.chart_title(n),
        x_label: "Show Name".to_string(),
        y_label: metric.y_axis_title().to_string(),
        value_format: metric.value_format(),
        y_from_zero: true,
        series: vec![SeriesSpec {
            name: metric.column_label().to_string(),
            color: style.primary_color.clone(),
            line_width: 1,
            points: table
                .entries
                .iter()
                .map(|e| ChartPoint::category(e.show_name.clone(), e.value))
                .collect(),
        }],
    }
}
