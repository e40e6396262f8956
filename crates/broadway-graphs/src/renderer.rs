//! Graph rendering trait and plotters implementations

use crate::chart::{ChartKind, ChartSpec};
use broadway_common::{truncate_string, MonthKey, Result};
use broadway_config::GraphsConfig;
use plotters::prelude::*;
use std::path::Path;
use tracing::info;

/// Trait for rendering chart specifications to image files
pub trait GraphRenderer {
    /// Render `spec` to a PNG file at `path`
    fn render_to_file(&self, spec: &ChartSpec, style: &GraphsConfig, path: &Path) -> Result<()>;

    /// Parse a color string (hex format) to RGBColor
    fn parse_color(&self, color_str: &str) -> RGBColor {
        if let Some(hex) = color_str.strip_prefix('#') {
            if hex.len() == 6 {
                if let (Ok(r), Ok(g), Ok(b)) = (
                    u8::from_str_radix(&hex[0..2], 16),
                    u8::from_str_radix(&hex[2..4], 16),
                    u8::from_str_radix(&hex[4..6], 16),
                ) {
                    return RGBColor(r, g, b);
                }
            }
        }
        // Default to black if parsing fails
        RGBColor(0, 0, 0)
    }

    /// Get background color from style config
    fn background_color(&self, style: &GraphsConfig) -> RGBColor {
        self.parse_color(&style.background_color)
    }
}

/// Value axis bounds with 10% headroom above the largest value.
pub(crate) fn value_axis_range(spec: &ChartSpec) -> (f64, f64) {
    let (lo, hi) = spec.value_range().unwrap_or((0.0, 1.0));
    let lo = if spec.y_from_zero { lo.min(0.0) } else { lo };
    let span = hi - lo;
    if span <= 0.0 {
        return (lo, lo + 1.0_f64.max(lo.abs() * 0.1));
    }
    let bottom = if spec.y_from_zero { lo } else { lo - span * 0.05 };
    (bottom, hi + span * 0.1)
}

/// Renders [`ChartKind::Line`] specs over a month axis
#[derive(Debug, Default, Clone, Copy)]
pub struct LineChartRenderer;

impl LineChartRenderer {
    pub fn new() -> Self {
        Self
    }

    /// Month ordinals spanned by the chart, widened when only one month exists
    fn month_axis_range(spec: &ChartSpec) -> (i64, i64) {
        match spec.month_range() {
            Some((first, last)) if first == last => (first.ordinal() - 1, last.ordinal() + 1),
            Some((first, last)) => (first.ordinal(), last.ordinal()),
            None => (0, 1),
        }
    }
}

impl GraphRenderer for LineChartRenderer {
    fn render_to_file(&self, spec: &ChartSpec, style: &GraphsConfig, path: &Path) -> Result<()> {
        spec.ensure_drawable()?;

        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&self.background_color(style))?;

        let (x_min, x_max) = Self::month_axis_range(spec);
        let (y_min, y_max) = value_axis_range(spec);
        let font = style.font_family.as_str();

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (font, style.title_font_size))
            .margin(20)
            .x_label_area_size(60)
            .y_label_area_size(100)
            .build_cartesian_2d(x_min..x_max, y_min..y_max)?;

        chart
            .configure_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_labels(12)
            .x_label_formatter(&|x| {
                MonthKey::from_ordinal(*x)
                    .map(MonthKey::short_label)
                    .unwrap_or_default()
            })
            .y_label_formatter(&|y| spec.value_format.format_tick(*y))
            .label_style((font, style.label_font_size))
            .draw()?;

        for series in &spec.series {
            let color = self.parse_color(&series.color);
            let data: Vec<(i64, f64)> = series
                .points
                .iter()
                .filter_map(|p| p.month.map(|m| (m.ordinal(), p.value)))
                .collect();

            chart
                .draw_series(LineSeries::new(data, color.stroke_width(series.line_width)))?
                .label(series.name.as_str())
                .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2)));
        }

        if spec.series.len() > 1 {
            chart
                .configure_series_labels()
                .position(SeriesLabelPosition::UpperLeft)
                .background_style(&WHITE.mix(0.8))
                .border_style(&BLACK)
                .label_font((font, style.label_font_size))
                .draw()?;
        }

        root.present()?;
        info!(path = %path.display(), title = %spec.title, "Rendered line chart");
        Ok(())
    }
}

/// Renders [`ChartKind::Bar`] specs with one bar per category
#[derive(Debug, Default, Clone, Copy)]
pub struct BarChartRenderer;

impl BarChartRenderer {
    pub fn new() -> Self {
        Self
    }
}

impl GraphRenderer for BarChartRenderer {
    fn render_to_file(&self, spec: &ChartSpec, style: &GraphsConfig, path: &Path) -> Result<()> {
        spec.ensure_drawable()?;

        let labels: Vec<String> = spec
            .categories()
            .into_iter()
            .map(|label| truncate_string(label, style.max_label_chars))
            .collect();
        let last_index = labels.len().saturating_sub(1);

        let root = BitMapBackend::new(path, (style.width, style.height)).into_drawing_area();
        root.fill(&self.background_color(style))?;

        let (y_min, y_max) = value_axis_range(spec);
        let font = style.font_family.as_str();

        let mut chart = ChartBuilder::on(&root)
            .caption(&spec.title, (font, style.title_font_size))
            .margin(20)
            .x_label_area_size(80)
            .y_label_area_size(100)
            .build_cartesian_2d((0..last_index).into_segmented(), y_min..y_max)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .x_desc(spec.x_label.as_str())
            .y_desc(spec.y_label.as_str())
            .x_labels(labels.len())
            .x_label_formatter(&|x| match x {
                SegmentValue::CenterOf(idx) | SegmentValue::Exact(idx) => {
                    labels.get(*idx).cloned().unwrap_or_default()
                }
                SegmentValue::Last => String::new(),
            })
            .y_label_formatter(&|y| spec.value_format.format_tick(*y))
            .label_style((font, style.label_font_size))
            .draw()?;

        if let Some(series) = spec.series.first() {
            let color = self.parse_color(&series.color);
            chart.draw_series(
                Histogram::vertical(&chart)
                    .style(color.filled())
                    .margin(6)
                    .data(series.points.iter().enumerate().map(|(idx, p)| (idx, p.value))),
            )?;
        }

        root.present()?;
        info!(path = %path.display(), bars = labels.len(), "Rendered bar chart");
        Ok(())
    }
}

/// Renders any spec with the renderer matching its kind
pub fn render_chart(spec: &ChartSpec, style: &GraphsConfig, path: &Path) -> Result<()> {
    match spec.kind {
        ChartKind::Line => LineChartRenderer::new().render_to_file(spec, style, path),
        ChartKind::Bar => BarChartRenderer::new().render_to_file(spec, style, path),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chart::{ChartPoint, SeriesSpec};
    use broadway_common::{BroadwayError, ValueFormat};

    struct MockRenderer;

    impl GraphRenderer for MockRenderer {
        fn render_to_file(&self, _spec: &ChartSpec, _style: &GraphsConfig, _path: &Path) -> Result<()> {
            Ok(())
        }
    }

    fn bar_spec(values: &[f64]) -> ChartSpec {
        ChartSpec {
            kind: ChartKind::Bar,
            title: "Bars".to_string(),
            x_label: "Show Name".to_string(),
            y_label: "Number of Weeks".to_string(),
            value_format: ValueFormat::Si,
            y_from_zero: true,
            series: vec![SeriesSpec {
                name: "Running Weeks".to_string(),
                color: "#008080".to_string(),
                line_width: 1,
                points: values
                    .iter()
                    .enumerate()
                    .map(|(i, v)| ChartPoint::category(format!("Show {i}"), *v))
                    .collect(),
            }],
        }
    }

    /// Rendering needs a system font; without one the error must still be a graph error.
    fn assert_rendered_or_graph_error(result: Result<()>, path: &Path) {
        match result {
            Ok(()) => assert!(path.exists()),
            Err(err) => assert!(matches!(err, BroadwayError::Graph { .. }), "unexpected: {err}"),
        }
    }

    #[test]
    fn test_color_parsing() {
        let renderer = MockRenderer;

        // Test valid hex colors
        assert_eq!(renderer.parse_color("#008080"), RGBColor(0, 128, 128));
        assert_eq!(renderer.parse_color("#E94190"), RGBColor(233, 65, 144));

        // Test invalid colors (should default to black)
        assert_eq!(renderer.parse_color("teal"), RGBColor(0, 0, 0));
        assert_eq!(renderer.parse_color("#ZZ0000"), RGBColor(0, 0, 0));
    }

    #[test]
    fn test_background_color() {
        let renderer = MockRenderer;
        let mut style = GraphsConfig::default();
        assert_eq!(renderer.background_color(&style), RGBColor(255, 255, 255));

        style.background_color = "#FF0000".to_string();
        assert_eq!(renderer.background_color(&style), RGBColor(255, 0, 0));
    }

    #[test]
    fn test_value_axis_starts_at_zero() {
        let (lo, hi) = value_axis_range(&bar_spec(&[40.0, 100.0]));
        assert_eq!(lo, 0.0);
        assert!((hi - 110.0).abs() < 1e-9);

        let mut spec = bar_spec(&[40.0, 100.0]);
        spec.y_from_zero = false;
        let (lo, _) = value_axis_range(&spec);
        assert!(lo > 0.0 && lo < 40.0);
    }

    #[test]
    fn test_value_axis_handles_flat_series() {
        let (lo, hi) = value_axis_range(&bar_spec(&[0.0, 0.0]));
        assert!(hi > lo);
    }

    #[test]
    fn test_single_month_axis_is_widened() {
        let month = MonthKey::new(2016, 6).unwrap();
        let mut spec = bar_spec(&[]);
        spec.kind = ChartKind::Line;
        spec.series[0].points.push(ChartPoint::monthly(month, 5.0));

        let (lo, hi) = LineChartRenderer::month_axis_range(&spec);
        assert!(lo < month.ordinal() && hi > month.ordinal());
    }

    #[test]
    fn test_render_empty_spec_is_error() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("empty.png");

        let result = render_chart(&bar_spec(&[]), &GraphsConfig::default(), &path);
        assert!(matches!(result, Err(BroadwayError::Graph { .. })));
        assert!(!path.exists());
    }

    #[test]
    fn test_render_bar_chart() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("bars.png");

        let result = render_chart(&bar_spec(&[11.0, 9.0, 4.0]), &GraphsConfig::default(), &path);
        assert_rendered_or_graph_error(result, &path);
    }

    #[test]
    fn test_render_line_chart() {
        let temp_dir = tempfile::tempdir().unwrap();
        let path = temp_dir.path().join("line.png");

        let mut spec = bar_spec(&[]);
        spec.kind = ChartKind::Line;
        let mut month = MonthKey::new(2015, 11).unwrap();
        for value in [3.0, 0.0, 5.0] {
            spec.series[0].points.push(ChartPoint::monthly(month, value));
            month = month.next();
        }

        let result = render_chart(&spec, &GraphsConfig::default(), &path);
        assert_rendered_or_graph_error(result, &path);
    }
}
