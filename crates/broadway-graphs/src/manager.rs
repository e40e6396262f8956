//! Graph manager writing rendered views to the output directory.

use crate::chart::ChartSpec;
use crate::renderer::render_chart;
use broadway_common::{BroadwayError, Result};
use broadway_config::{GraphsConfig, OutputConfig};
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, instrument};

/// The three views of the dashboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ChartView {
    MonthlyRevenue,
    TopShows,
    Forecast,
}

impl ChartView {
    pub const ALL: [Self; 3] = [Self::MonthlyRevenue, Self::TopShows, Self::Forecast];

    /// File name without extension.
    pub fn file_stem(self) -> &'static str {
        match self {
            Self::MonthlyRevenue => "monthly_revenue",
            Self::TopShows => "top_shows",
            Self::Forecast => "forecast",
        }
    }

    /// Heading shown above the view.
    pub fn heading(self) -> &'static str {
        match self {
            Self::MonthlyRevenue => "Total Revenue",
            Self::TopShows => "Top Shows",
            Self::Forecast => "Predictions",
        }
    }
}

impl fmt::Display for ChartView {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.heading())
    }
}

/// Files produced for one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedChart {
    pub view: ChartView,
    pub image_path: PathBuf,
    pub json_path: Option<PathBuf>,
}

/// Renders chart specs into PNG files, and optionally their JSON, under one directory.
#[derive(Debug, Clone)]
pub struct GraphManager {
    output_dir: PathBuf,
    write_json: bool,
    style: GraphsConfig,
}

impl GraphManager {
    /// Creates a manager from the output and graph sections of the configuration.
    pub fn new(output: &OutputConfig, style: GraphsConfig) -> Self {
        Self {
            output_dir: PathBuf::from(&output.directory),
            write_json: output.write_json,
            style,
        }
    }

    #[must_use]
    pub fn with_output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.output_dir = dir.into();
        self
    }

    #[must_use]
    pub fn with_json(mut self, write_json: bool) -> Self {
        self.write_json = write_json;
        self
    }

    pub fn output_dir(&self) -> &Path {
        &self.output_dir
    }

    pub fn style(&self) -> &GraphsConfig {
        &self.style
    }

    /// Path of the image written for `view`.
    pub fn image_path(&self, view: ChartView) -> PathBuf {
        self.output_dir.join(format!("{}.png", view.file_stem()))
    }

    /// Path of the JSON spec written for `view`.
    pub fn json_path(&self, view: ChartView) -> PathBuf {
        self.output_dir.join(format!("{}.json", view.file_stem()))
    }

    fn ensure_output_dir(&self) -> Result<()> {
        fs::create_dir_all(&self.output_dir).map_err(|e| {
            BroadwayError::config_with_source(
                format!("Cannot create output directory {}", self.output_dir.display()),
                e,
            )
        })
    }

    /// Writes the JSON spec of `view`.
    pub fn write_spec(&self, view: ChartView, spec: &ChartSpec) -> Result<PathBuf> {
        self.ensure_output_dir()?;
        let path = self.json_path(view);
        fs::write(&path, spec.to_json()?)?;
        debug!(path = %path.display(), "Wrote chart specification");
        Ok(path)
    }

    /// Renders `view` and, when enabled, writes its JSON spec next to it.
    #[instrument(skip(self, spec), fields(title = %spec.title))]
    pub fn write_chart(&self, view: ChartView, spec: &ChartSpec) -> Result<RenderedChart> {
        self.ensure_output_dir()?;

        let json_path = if self.write_json {
            Some(self.write_spec(view, spec)?)
        } else {
            None
        };

        let image_path = self.image_path(view);
        render_chart(spec, &self.style, &image_path)?;

        info!(view = %view, path = %image_path.display(), "Chart written");
        Ok(RenderedChart {
            view,
            image_path,
            json_path,
        })
    }
}
