//! Default values matching the published Broadway dataset and dashboard.

use crate::schema::*;
use broadway_common::{LoggingConfig, RankingMetric};

/// Default path of the primary dataset.
pub const DEFAULT_DATASET_PATH: &str = "data/broadway.csv";
/// Default path of the forecast dataset.
pub const DEFAULT_FORECAST_PATH: &str = "data/WickedResult.csv";
/// Show the bundled forecast was produced for.
pub const DEFAULT_FORECAST_SHOW: &str = "Wicked";
/// Year whose rows are known to be bad in the published dataset.
pub const KNOWN_BAD_YEAR: i32 = 1990;

impl Default for Config {
    fn default() -> Self {
        Self {
            data: DataConfig::default(),
            aggregation: AggregationConfig::default(),
            controls: ControlsConfig::default(),
            graphs: GraphsConfig::default(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dataset_path: DEFAULT_DATASET_PATH.to_string(),
            forecast_path: DEFAULT_FORECAST_PATH.to_string(),
            forecast_show: DEFAULT_FORECAST_SHOW.to_string(),
            excluded_years: vec![KNOWN_BAD_YEAR],
        }
    }
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            drop_last_bucket: true,
            fill_gaps: true,
        }
    }
}

impl Default for ControlsConfig {
    fn default() -> Self {
        Self {
            top_n_min: 5,
            top_n_max: 20,
            top_n_default: 10,
            default_metric: RankingMetric::AveragePerRecord,
        }
    }
}

impl Default for GraphsConfig {
    fn default() -> Self {
        Self {
            width: 1200,
            height: 600,
            background_color: "#FFFFFF".to_string(),
            primary_color: "#008080".to_string(),
            historical_color: "#00A651".to_string(),
            predicted_color: "#E94190".to_string(),
            font_family: "sans-serif".to_string(),
            title_font_size: 24,
            label_font_size: 14,
            line_width: 3,
            max_label_chars: 28,
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            directory: "output".to_string(),
            write_json: false,
        }
    }
}
