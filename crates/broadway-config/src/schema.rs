//! Configuration schema definitions using serde with validation attributes.

use broadway_common::{LoggingConfig, RankingMetric};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// Main configuration structure for the Broadway dashboard.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct Config {
    /// Source data configuration.
    #[validate(nested)]
    pub data: DataConfig,
    /// Monthly aggregation policy.
    pub aggregation: AggregationConfig,
    /// Interactive control bounds and defaults.
    #[validate(nested)]
    pub controls: ControlsConfig,
    /// Graph rendering configuration.
    #[validate(nested)]
    pub graphs: GraphsConfig,
    /// Output configuration.
    #[validate(nested)]
    pub output: OutputConfig,
    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Source data configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct DataConfig {
    /// Path of the primary revenue CSV.
    #[validate(custom(function = "crate::validation::validate_file_path"))]
    pub dataset_path: String,
    /// Path of the precomputed forecast CSV.
    #[validate(custom(function = "crate::validation::validate_file_path"))]
    pub forecast_path: String,
    /// Show whose history is overlaid with the forecast.
    #[validate(length(min = 1, message = "Forecast show cannot be empty"))]
    pub forecast_show: String,
    /// Rows whose `Date.Year` is listed here are dropped at load time.
    pub excluded_years: Vec<i32>,
}

/// Monthly aggregation policy.
///
/// The final month of the published dataset is a partial reporting period,
/// hence `drop_last_bucket` defaults to true.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AggregationConfig {
    /// Exclude the chronologically last month from every monthly series.
    pub drop_last_bucket: bool,
    /// Insert zero-valued months for months without records.
    pub fill_gaps: bool,
}

/// Bounds and defaults of the interactive controls.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
#[validate(schema(function = "crate::validation::validate_controls"))]
pub struct ControlsConfig {
    /// Smallest selectable number of ranked shows.
    #[validate(range(min = 1, max = 100, message = "top_n_min must be between 1 and 100"))]
    pub top_n_min: usize,
    /// Largest selectable number of ranked shows.
    #[validate(range(min = 1, max = 100, message = "top_n_max must be between 1 and 100"))]
    pub top_n_max: usize,
    /// Number of ranked shows before any interaction.
    pub top_n_default: usize,
    /// Ranking metric before any interaction.
    pub default_metric: RankingMetric,
}

/// Graph rendering configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct GraphsConfig {
    /// Graph width in pixels.
    #[validate(range(min = 100, max = 4000, message = "Width must be between 100 and 4000 pixels"))]
    pub width: u32,
    /// Graph height in pixels.
    #[validate(range(min = 100, max = 4000, message = "Height must be between 100 and 4000 pixels"))]
    pub height: u32,
    /// Background color (hex format).
    #[validate(regex(path = *crate::validation::HEX_COLOR_REGEX, message = "Background color must be valid hex color"))]
    pub background_color: String,
    /// Color of the monthly revenue line and the ranking bars.
    #[validate(regex(path = *crate::validation::HEX_COLOR_REGEX, message = "Primary color must be valid hex color"))]
    pub primary_color: String,
    /// Color of the historical series on the forecast chart.
    #[validate(regex(path = *crate::validation::HEX_COLOR_REGEX, message = "Historical color must be valid hex color"))]
    pub historical_color: String,
    /// Color of the predicted series on the forecast chart.
    #[validate(regex(path = *crate::validation::HEX_COLOR_REGEX, message = "Predicted color must be valid hex color"))]
    pub predicted_color: String,
    /// Font family for text rendering.
    #[validate(length(min = 1, message = "Font family cannot be empty"))]
    pub font_family: String,
    /// Font size for chart titles.
    #[validate(range(min = 8, max = 72, message = "Title font size must be between 8 and 72"))]
    pub title_font_size: u32,
    /// Font size for axis labels.
    #[validate(range(min = 8, max = 72, message = "Label font size must be between 8 and 72"))]
    pub label_font_size: u32,
    /// Stroke width of the monthly revenue line.
    #[validate(range(min = 1, max = 10, message = "Line width must be between 1 and 10"))]
    pub line_width: u32,
    /// Show names longer than this are truncated on the ranking axis.
    #[validate(range(min = 5, max = 80, message = "Max label length must be between 5 and 80"))]
    pub max_label_chars: usize,
}

/// Output configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
#[serde(default)]
pub struct OutputConfig {
    /// Directory receiving rendered charts.
    #[validate(custom(function = "crate::validation::validate_file_path"))]
    pub directory: String,
    /// Also write chart specifications as JSON next to the images.
    pub write_json: bool,
}
