//! # Broadway Graphs
//!
//! The aggregation pipeline behind the Broadway dashboard and the rendering of
//! its three views.
//!
//! Data flows from the CSV loaders ([`Dataset`], [`ForecastSeries`]) through the
//! [`MonthlyAggregator`] and [`rank_shows`] into renderer-independent
//! [`ChartSpec`]s, which the plotters renderers draw to image files.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod aggregator;
pub mod chart;
pub mod dashboard;
pub mod dataset;
pub mod forecast;
pub mod manager;
pub mod overlay;
pub mod ranking;
pub mod renderer;

// View builders
pub mod forecast_chart;
pub mod monthly_revenue;
pub mod top_shows;

pub use aggregator::{aggregate_monthly, AggregationPolicy, MonthlyAggregator, RecordFilter};
pub use chart::{ChartKind, ChartPoint, ChartSpec, SeriesSpec};
pub use dashboard::{ControlChange, Dashboard, DashboardSession, Panel, Selection};
pub use dataset::{Dataset, LoadOptions, REQUIRED_COLUMNS};
pub use forecast::{ForecastSeries, FORECAST_COLUMNS};
pub use forecast_chart::forecast_chart;
pub use manager::{ChartView, GraphManager, RenderedChart};
pub use monthly_revenue::monthly_revenue_chart;
pub use overlay::{ForecastOverlay, HISTORICAL_LABEL, PREDICTED_LABEL};
pub use ranking::rank_shows;
pub use renderer::{render_chart, BarChartRenderer, GraphRenderer, LineChartRenderer};
pub use top_shows::top_shows_chart;
