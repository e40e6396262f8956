//! The three dashboard views and the interactive session around them.
//!
//! [`Dashboard`] owns the data loaded at startup and recomputes a view from
//! scratch on every call. [`DashboardSession`] tracks the current control
//! selection and keeps the last good view of each panel, so a failed
//! interaction leaves a stale view plus an error message instead of aborting.

use crate::aggregator::{AggregationPolicy, MonthlyAggregator};
use crate::chart::ChartSpec;
use crate::dataset::{Dataset, LoadOptions};
use crate::forecast::ForecastSeries;
use crate::forecast_chart::forecast_chart;
use crate::manager::ChartView;
use crate::monthly_revenue::monthly_revenue_chart;
use crate::overlay::ForecastOverlay;
use crate::ranking::rank_shows;
use crate::top_shows::top_shows_chart;
use broadway_common::{BroadwayError, MonthlySeries, RankingMetric, RankingTable, Result};
use broadway_config::{Config, ControlsConfig, GraphsConfig};
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};

/// Current state of the ranking controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Selection {
    /// Number of ranked shows (slider).
    pub top_n: usize,
    /// Ranking metric (select box).
    pub metric: RankingMetric,
}

impl Selection {
    /// Initial selection before any interaction.
    pub fn from_controls(controls: &ControlsConfig) -> Self {
        Self {
            top_n: controls.top_n_default,
            metric: controls.default_metric,
        }
    }
}

/// One user interaction with the controls.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControlChange {
    /// Slider moved; raw input, validated against the slider range.
    SetTopN(i64),
    /// Selector changed; label or alias of a metric.
    SetMetric(String),
}

/// Read-only data handle plus the settings needed to build every view.
#[derive(Debug, Clone)]
pub struct Dashboard {
    dataset: Arc<Dataset>,
    forecast: ForecastSeries,
    aggregator: MonthlyAggregator,
    controls: ControlsConfig,
    forecast_show: String,
    style: GraphsConfig,
}

impl Dashboard {
    /// Assembles a dashboard from already loaded data.
    pub fn new(dataset: Arc<Dataset>, forecast: ForecastSeries, config: &Config) -> Self {
        Self {
            dataset,
            forecast,
            aggregator: MonthlyAggregator::new(AggregationPolicy::from(&config.aggregation)),
            controls: config.controls.clone(),
            forecast_show: config.data.forecast_show.clone(),
            style: config.graphs.clone(),
        }
    }

    /// Loads both input files named by `config`.
    ///
    /// # Errors
    ///
    /// Any [`BroadwayError::DataFormat`] from either file; these are fatal at startup.
    #[instrument(skip(config))]
    pub fn load(config: &Config) -> Result<Self> {
        let options = LoadOptions::excluding_years(config.data.excluded_years.iter().copied());
        let dataset = Dataset::from_path(&config.data.dataset_path, &options)?;
        let forecast = ForecastSeries::from_path(&config.data.forecast_path)?;

        if !dataset.contains_show(&config.data.forecast_show) {
            warn!(
                show = %config.data.forecast_show,
                "Forecast show has no records; the forecast view will be unavailable"
            );
        }

        info!(
            records = dataset.len(),
            shows = dataset.show_count(),
            forecast_months = forecast.len(),
            "Dashboard data loaded"
        );
        Ok(Self::new(Arc::new(dataset), forecast, config))
    }

    pub fn dataset(&self) -> &Dataset {
        &self.dataset
    }

    pub fn forecast(&self) -> &ForecastSeries {
        &self.forecast
    }

    pub fn controls(&self) -> &ControlsConfig {
        &self.controls
    }

    pub fn style(&self) -> &GraphsConfig {
        &self.style
    }

    pub fn forecast_show(&self) -> &str {
        &self.forecast_show
    }

    pub fn default_selection(&self) -> Selection {
        Selection::from_controls(&self.controls)
    }

    /// Checks raw slider input against the configured range.
    pub fn validate_top_n(&self, n: i64) -> Result<usize> {
        let (min, max) = (self.controls.top_n_min, self.controls.top_n_max);
        let n = usize::try_from(n)
            .ok()
            .filter(|&n| n > 0)
            .ok_or_else(|| {
                BroadwayError::invalid_parameter("top_n", format!("must be positive, got {n}"))
            })?;
        if !(min..=max).contains(&n) {
            return Err(BroadwayError::invalid_parameter(
                "top_n",
                format!("must be between {min} and {max}, got {n}"),
            ));
        }
        Ok(n)
    }

    /// Total gross per month across all shows.
    pub fn revenue_series(&self) -> Result<MonthlySeries> {
        self.aggregator.aggregate_monthly(self.dataset.records(), None)
    }

    pub fn revenue_view(&self) -> Result<ChartSpec> {
        Ok(monthly_revenue_chart(&self.revenue_series()?, &self.style))
    }

    pub fn ranking(&self, selection: Selection) -> Result<RankingTable> {
        rank_shows(self.dataset.records(), selection.metric, selection.top_n)
    }

    pub fn top_shows_view(&self, selection: Selection) -> Result<ChartSpec> {
        let table = self.ranking(selection)?;
        Ok(top_shows_chart(&table, selection.top_n, &self.style))
    }

    pub fn forecast_overlay(&self) -> Result<ForecastOverlay> {
        ForecastOverlay::build(
            &self.aggregator,
            self.dataset.records(),
            &self.forecast_show,
            self.forecast.clone(),
        )
    }

    pub fn forecast_view(&self) -> Result<ChartSpec> {
        Ok(forecast_chart(&self.forecast_overlay()?, &self.style))
    }

    /// Builds the view for `view` under `selection`.
    pub fn view(&self, view: ChartView, selection: Selection) -> Result<ChartSpec> {
        match view {
            ChartView::MonthlyRevenue => self.revenue_view(),
            ChartView::TopShows => self.top_shows_view(selection),
            ChartView::Forecast => self.forecast_view(),
        }
    }
}

/// Display state of one view.
#[derive(Debug, Clone, PartialEq)]
pub enum Panel {
    /// The view reflects the current selection.
    Ready(ChartSpec),
    /// The latest recomputation failed; the previous view is still shown.
    Stale { view: ChartSpec, error: String },
    /// No view could be computed yet.
    Error(String),
}

impl Panel {
    /// The view to display, if any.
    pub fn spec(&self) -> Option<&ChartSpec> {
        match self {
            Self::Ready(spec) | Self::Stale { view: spec, .. } => Some(spec),
            Self::Error(_) => None,
        }
    }

    /// Message of the latest failure, if any.
    pub fn error(&self) -> Option<&str> {
        match self {
            Self::Ready(_) => None,
            Self::Stale { error, .. } | Self::Error(error) => Some(error),
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready(_))
    }

    /// Next state after a recomputation with `outcome`.
    fn settle(self, outcome: Result<ChartSpec>) -> Self {
        match outcome {
            Ok(spec) => Self::Ready(spec),
            Err(err) => {
                let error = err.to_string();
                match self {
                    Self::Ready(view) | Self::Stale { view, .. } => Self::Stale { view, error },
                    Self::Error(_) => Self::Error(error),
                }
            }
        }
    }
}

/// A dashboard plus the user's current selection and panel states.
#[derive(Debug)]
pub struct DashboardSession {
    dashboard: Dashboard,
    selection: Selection,
    revenue: Panel,
    top_shows: Panel,
    forecast: Panel,
}

impl DashboardSession {
    /// Starts a session with the default selection and computes every panel.
    pub fn new(dashboard: Dashboard) -> Self {
        let selection = dashboard.default_selection();
        let mut session = Self {
            dashboard,
            selection,
            revenue: Panel::Error("not computed".to_string()),
            top_shows: Panel::Error("not computed".to_string()),
            forecast: Panel::Error("not computed".to_string()),
        };
        for view in ChartView::ALL {
            session.recompute(view);
        }
        session
    }

    pub fn dashboard(&self) -> &Dashboard {
        &self.dashboard
    }

    pub fn selection(&self) -> Selection {
        self.selection
    }

    pub fn panel(&self, view: ChartView) -> &Panel {
        match view {
            ChartView::MonthlyRevenue => &self.revenue,
            ChartView::TopShows => &self.top_shows,
            ChartView::Forecast => &self.forecast,
        }
    }

    fn panel_mut(&mut self, view: ChartView) -> &mut Panel {
        match view {
            ChartView::MonthlyRevenue => &mut self.revenue,
            ChartView::TopShows => &mut self.top_shows,
            ChartView::Forecast => &mut self.forecast,
        }
    }

    fn recompute(&mut self, view: ChartView) {
        let outcome = self.dashboard.view(view, self.selection);
        if let Err(err) = &outcome {
            warn!(view = %view, error = %err, "View could not be computed");
        }
        let panel = self.panel_mut(view);
        let previous = std::mem::replace(panel, Panel::Error(String::new()));
        *panel = previous.settle(outcome);
    }

    /// Applies one control change and recomputes the ranking view.
    ///
    /// Invalid input never aborts the session: the selection is kept, and the
    /// ranking panel turns stale with the error message. The returned panel is
    /// the ranking panel after the change.
    #[instrument(skip(self))]
    pub fn apply(&mut self, change: ControlChange) -> &Panel {
        let next = match &change {
            ControlChange::SetTopN(n) => self.dashboard.validate_top_n(*n).map(|top_n| Selection {
                top_n,
                ..self.selection
            }),
            ControlChange::SetMetric(label) => label.parse::<RankingMetric>().map(|metric| Selection {
                metric,
                ..self.selection
            }),
        };

        match next {
            Ok(selection) => {
                debug!(?selection, "Selection changed");
                self.selection = selection;
                self.recompute(ChartView::TopShows);
            }
            Err(err) => {
                warn!(error = %err, "Rejected control change");
                let previous = std::mem::replace(&mut self.top_shows, Panel::Error(String::new()));
                self.top_shows = previous.settle(Err(err));
            }
        }
        &self.top_shows
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use broadway_common::test_utils::revenue_fixtures;
    use broadway_common::{ForecastPoint, MonthKey};

    fn dashboard_with(config: &Config) -> Dashboard {
        let forecast = ForecastSeries::from_points(vec![ForecastPoint {
            month: MonthKey::new(2015, 7).unwrap(),
            predicted: 1_900_000.0,
        }]);
        Dashboard::new(
            Arc::new(Dataset::from_records(revenue_fixtures::season_records())),
            forecast,
            config,
        )
    }

    fn dashboard() -> Dashboard {
        dashboard_with(&Config::default())
    }

    #[test]
    fn test_default_selection() {
        let selection = dashboard().default_selection();
        assert_eq!(selection.top_n, 10);
        assert_eq!(selection.metric, RankingMetric::AveragePerRecord);
    }

    #[test]
    fn test_validate_top_n() {
        let dashboard = dashboard();
        assert_eq!(dashboard.validate_top_n(5).unwrap(), 5);
        assert_eq!(dashboard.validate_top_n(20).unwrap(), 20);

        for bad in [-3, 0, 4, 21] {
            let err = dashboard.validate_top_n(bad).unwrap_err();
            assert!(matches!(err, BroadwayError::InvalidParameter { .. }), "{bad}");
        }
    }

    #[test]
    fn test_all_views_available() {
        let dashboard = dashboard();
        let selection = dashboard.default_selection();
        for view in ChartView::ALL {
            let spec = dashboard.view(view, selection).unwrap();
            assert!(!spec.is_empty(), "{view}");
        }
    }

    #[test]
    fn test_session_starts_ready() {
        let session = DashboardSession::new(dashboard());
        for view in ChartView::ALL {
            assert!(session.panel(view).is_ready(), "{view}");
        }
    }

    #[test]
    fn test_metric_change_recomputes_ranking() {
        let mut session = DashboardSession::new(dashboard());
        let panel = session.apply(ControlChange::SetMetric("Running Weeks".to_string()));

        let spec = panel.spec().unwrap();
        assert!(panel.is_ready());
        assert_eq!(spec.title, "Top 10 Broadway Shows by Number of Running Weeks");
        assert_eq!(session.selection().metric, RankingMetric::Count);
    }

    #[test]
    fn test_invalid_change_keeps_previous_view() {
        let mut session = DashboardSession::new(dashboard());
        let before = session.panel(ChartView::TopShows).spec().cloned().unwrap();

        let panel = session.apply(ControlChange::SetTopN(0));
        match panel {
            Panel::Stale { view, error } => {
                assert_eq!(*view, before);
                assert!(error.contains("top_n"));
            }
            other => panic!("expected stale panel, got {other:?}"),
        }
        assert_eq!(session.selection().top_n, 10);

        session.apply(ControlChange::SetMetric("median".to_string()));
        assert_eq!(session.panel(ChartView::TopShows).spec(), Some(&before));

        let panel = session.apply(ControlChange::SetTopN(5));
        assert!(panel.is_ready());
        assert_eq!(panel.spec().unwrap().title, "Top 5 Broadway Shows by Average Gross per Week");
    }

    #[test]
    fn test_missing_forecast_show_is_error_panel() {
        let mut config = Config::default();
        config.data.forecast_show = "Hamilton".to_string();
        let session = DashboardSession::new(dashboard_with(&config));

        let panel = session.panel(ChartView::Forecast);
        assert!(panel.spec().is_none());
        assert!(panel.error().unwrap().contains("Hamilton"));
        assert!(session.panel(ChartView::MonthlyRevenue).is_ready());
    }

    #[test]
    fn test_aggregation_policy_follows_config() {
        let mut config = Config::default();
        config.aggregation.drop_last_bucket = false;
        let series = dashboard_with(&config).revenue_series().unwrap();
        assert_eq!(series.last_month(), MonthKey::new(2015, 6));
    }

    #[test]
    fn test_load_missing_files_is_fatal() {
        let mut config = Config::default();
        config.data.dataset_path = "does/not/exist.csv".to_string();
        let err = Dashboard::load(&config).unwrap_err();
        assert!(matches!(err, BroadwayError::DataFormat { .. }));
    }
}
