//! The dashboard application: a session, its chart output and the prompt loop.

use crate::command::{PromptCommand, HELP};
use crate::error::DashboardResult;
use broadway_common::{truncate_string, Result as BroadwayResult};
use broadway_config::Config;
use broadway_graphs::{
    ChartSpec, ChartView, ControlChange, Dashboard, DashboardSession, GraphManager, Panel,
    RenderedChart,
};
use std::fmt::Write as _;
use std::future::Future;
use std::io::Write;
use tokio::io::{AsyncBufRead, AsyncBufReadExt};
use tracing::{debug, info, instrument, warn};

/// Prompt shown before each command.
const PROMPT: &str = "broadway> ";

/// Dashboard title.
pub const TITLE: &str = "Broadway Analysis";

/// Introduction printed under the title.
pub const DATA_NOTE: &str = "Let us see some statistics on Broadway Shows. \
Note this dataset is taken from Kaggle and the data is only available till 07/2016.";

/// Methodology note printed under the forecast view.
pub const FORECAST_NOTE: &str = "The predictions are based on an ARIMA model fitted offline; \
this dashboard only reads its output.";

/// Outcome of one prompt command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Flow {
    /// Keep reading commands, after printing the message.
    Continue(String),
    /// Leave the prompt.
    Quit,
}

/// How a prompt session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptEnd {
    /// `quit` or end of input.
    Closed,
    /// The shutdown signal fired first.
    Interrupted,
}

/// Ties the dashboard session to the directory receiving its charts.
#[derive(Debug)]
pub struct DashboardApp {
    session: DashboardSession,
    manager: GraphManager,
}

impl DashboardApp {
    pub fn new(session: DashboardSession, manager: GraphManager) -> Self {
        Self { session, manager }
    }

    /// Loads the data named by `config`; failures here abort startup.
    pub fn from_config(config: &Config) -> DashboardResult<Self> {
        let dashboard = Dashboard::load(config)?;
        let manager = GraphManager::new(&config.output, dashboard.style().clone());
        Ok(Self::new(DashboardSession::new(dashboard), manager))
    }

    pub fn session(&self) -> &DashboardSession {
        &self.session
    }

    pub fn manager(&self) -> &GraphManager {
        &self.manager
    }

    /// Writes the current view of `view`, if its panel has one.
    pub fn render_view(&self, view: ChartView) -> BroadwayResult<Option<RenderedChart>> {
        match self.session.panel(view).spec() {
            Some(spec) => self.manager.write_chart(view, spec).map(Some),
            None => Ok(None),
        }
    }

    /// Writes every view; failures are logged and reported, never fatal.
    #[instrument(skip(self))]
    pub fn render_all(&self) -> Vec<String> {
        let mut messages = Vec::new();
        for view in ChartView::ALL {
            match self.render_view(view) {
                Ok(Some(chart)) => {
                    messages.push(format!("{view}: {}", chart.image_path.display()));
                }
                Ok(None) => {
                    let reason = self.session.panel(view).error().unwrap_or("no data");
                    messages.push(format!("{view}: unavailable ({reason})"));
                }
                Err(err) => {
                    warn!(view = %view, error = %err, "Failed to write chart");
                    messages.push(format!("{view}: rendering failed ({err})"));
                }
            }
        }
        messages
    }

    /// Handles one command and re-renders what changed.
    pub fn handle(&mut self, command: PromptCommand) -> DashboardResult<Flow> {
        debug!(?command, "Handling prompt command");
        let change = match command {
            PromptCommand::Quit => return Ok(Flow::Quit),
            PromptCommand::Help => return Ok(Flow::Continue(HELP.to_string())),
            PromptCommand::Show => return Ok(Flow::Continue(self.summary())),
            PromptCommand::Top(n) => ControlChange::SetTopN(n),
            PromptCommand::Metric(label) => ControlChange::SetMetric(label),
        };

        if let Panel::Stale { error, .. } | Panel::Error(error) = self.session.apply(change) {
            return Ok(Flow::Continue(format!("{error}\n(previous view kept)")));
        }

        let mut message = self.describe(ChartView::TopShows);
        match self.render_view(ChartView::TopShows) {
            Ok(Some(chart)) => {
                let _ = write!(message, "\nwritten to {}", chart.image_path.display());
            }
            Ok(None) => {}
            Err(err) if err.is_recoverable() => {
                warn!(error = %err, "Failed to write ranking chart");
                let _ = write!(message, "\nrendering failed: {err}");
            }
            Err(err) => return Err(err.into()),
        }
        Ok(Flow::Continue(message))
    }

    /// Title line of `view`; the forecast names its show.
    pub fn heading(&self, view: ChartView) -> String {
        match view {
            ChartView::Forecast => format!(
                "Monthly Forecast of {}'s Broadway Sales",
                self.session.dashboard().forecast_show()
            ),
            _ => view.heading().to_string(),
        }
    }

    fn describe(&self, view: ChartView) -> String {
        let mut text = format!("== {} ==", self.heading(view));
        if view == ChartView::Forecast {
            let _ = write!(text, "\n{FORECAST_NOTE}");
        }
        describe_panel(&mut text, self.session.panel(view));
        text
    }

    /// Text rendition of every panel under the dashboard title.
    pub fn summary(&self) -> String {
        let panels: Vec<String> = ChartView::ALL.iter().map(|&view| self.describe(view)).collect();
        format!("{TITLE}\n{DATA_NOTE}\n\n{}", panels.join("\n\n"))
    }

    /// Reads commands from `input` until `quit` or end of input.
    ///
    /// Invalid commands and rejected control values are reported on `output`
    /// and the loop continues.
    pub async fn run_prompt<R, W>(&mut self, input: R, output: &mut W) -> DashboardResult<()>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
    {
        let mut lines = input.lines();
        writeln!(output, "{TITLE}\n{DATA_NOTE}\n\n{HELP}")?;

        loop {
            write!(output, "{PROMPT}")?;
            output.flush()?;

            let Some(line) = lines.next_line().await? else {
                writeln!(output)?;
                break;
            };

            let flow = PromptCommand::parse(&line).and_then(|command| match command {
                Some(command) => self.handle(command),
                None => Ok(Flow::Continue(String::new())),
            });

            match flow {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue(message)) => {
                    if !message.is_empty() {
                        writeln!(output, "{message}")?;
                    }
                }
                Err(err) if err.is_recoverable() => writeln!(output, "{err}")?,
                Err(err) => return Err(err),
            }
        }

        info!("Prompt closed");
        Ok(())
    }

    /// Runs the prompt until it closes or `shutdown` resolves, whichever comes first.
    pub async fn run_until_shutdown<R, W, F>(
        &mut self,
        input: R,
        output: &mut W,
        shutdown: F,
    ) -> DashboardResult<PromptEnd>
    where
        R: AsyncBufRead + Unpin,
        W: Write,
        F: Future<Output = ()>,
    {
        tokio::select! {
            result = self.run_prompt(input, output) => result.map(|()| PromptEnd::Closed),
            () = shutdown => {
                info!("Interrupted, leaving the prompt");
                Ok(PromptEnd::Interrupted)
            }
        }
    }
}

/// Appends the state and values of one panel.
fn describe_panel(text: &mut String, panel: &Panel) {
    match panel {
        Panel::Ready(spec) => describe_spec(text, spec),
        Panel::Stale { view: spec, error } => {
            let _ = write!(text, "\n[stale: {error}]");
            describe_spec(text, spec);
        }
        Panel::Error(error) => {
            let _ = write!(text, "\n[unavailable: {error}]");
        }
    }
}

fn describe_spec(text: &mut String, spec: &ChartSpec) {
    let _ = write!(text, "\n{}", spec.title);
    for series in &spec.series {
        if spec.series.len() > 1 {
            let _ = write!(text, "\n{}:", series.name);
        }
        for (idx, point) in series.points.iter().enumerate() {
            let value = spec.value_format.format_exact(point.value);
            if point.month.is_some() {
                let _ = write!(text, "\n  {:<10} {value:>16}", point.label);
            } else {
                let _ = write!(
                    text,
                    "\n  {:>2}. {:<30} {value:>16}",
                    idx + 1,
                    truncate_string(&point.label, 30)
                );
            }
        }
    }
}
