//! Renderer-independent chart specifications.
//!
//! Every view of the dashboard is first described as a [`ChartSpec`]: labeled,
//! ordered numeric series plus presentation metadata. The plotters renderers
//! draw these specs, and the same specs are written as JSON for other consumers.

use broadway_common::{BroadwayError, MonthKey, Result, ValueFormat};
use serde::{Deserialize, Serialize};

/// Geometry of a chart.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChartKind {
    /// One or more lines over a month axis.
    Line,
    /// Vertical bars over categories.
    Bar,
}

/// One plotted value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartPoint {
    /// Axis label of the point (a month or a show name).
    pub label: String,
    /// Month of the point on time axes.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub month: Option<MonthKey>,
    /// Plotted value.
    pub value: f64,
}

impl ChartPoint {
    /// A point on a month axis, labeled `Mon YYYY`.
    pub fn monthly(month: MonthKey, value: f64) -> Self {
        Self {
            label: month.short_label(),
            month: Some(month),
            value,
        }
    }

    /// A point on a category axis.
    pub fn category(label: impl Into<String>, value: f64) -> Self {
        Self {
            label: label.into(),
            month: None,
            value,
        }
    }
}

/// A named, colored sequence of points.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeriesSpec {
    /// Legend name.
    pub name: String,
    /// Hex color, e.g. `#008080`.
    pub color: String,
    /// Stroke width for line charts.
    pub line_width: u32,
    /// Points in drawing order.
    pub points: Vec<ChartPoint>,
}

/// Everything a renderer needs to draw one view.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartSpec {
    pub kind: ChartKind,
    pub title: String,
    pub x_label: String,
    pub y_label: String,
    /// Formatting of values on the value axis.
    pub value_format: ValueFormat,
    /// Whether the value axis starts at zero.
    pub y_from_zero: bool,
    pub series: Vec<SeriesSpec>,
}

impl ChartSpec {
    /// Total number of points across all series.
    pub fn point_count(&self) -> usize {
        self.series.iter().map(|s| s.points.len()).sum()
    }

    /// Whether there is nothing to draw.
    pub fn is_empty(&self) -> bool {
        self.point_count() == 0
    }

    fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.series.iter().flat_map(|s| s.points.iter().map(|p| p.value))
    }

    /// Smallest and largest value across all series.
    pub fn value_range(&self) -> Option<(f64, f64)> {
        self.values().fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
    }

    /// Earliest and latest month across all series.
    pub fn month_range(&self) -> Option<(MonthKey, MonthKey)> {
        let months = || self.series.iter().flat_map(|s| s.points.iter().filter_map(|p| p.month));
        Some((months().min()?, months().max()?))
    }

    /// Category labels of the first series, in order.
    pub fn categories(&self) -> Vec<&str> {
        self.series
            .first()
            .map(|s| s.points.iter().map(|p| p.label.as_str()).collect())
            .unwrap_or_default()
    }

    /// Pretty-printed JSON representation.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Rejects specs a renderer cannot draw.
    pub fn ensure_drawable(&self) -> Result<()> {
        if self.is_empty() {
            return Err(BroadwayError::graph(format!("Chart '{}' has no data", self.title)));
        }
        if self.values().any(|v| !v.is_finite()) {
            return Err(BroadwayError::graph(format!(
                "Chart '{}' contains non-finite values",
                self.title
            )));
        }
        if self.kind == ChartKind::Line
            && self.series.iter().flat_map(|s| &s.points).any(|p| p.month.is_none())
        {
            return Err(BroadwayError::graph(format!(
                "Line chart '{}' has points without a month",
                self.title
            )));
        }
        Ok(())
    }
}
