//! Integration tests for broadway-dashboard crate.
//!
//! These tests drive the application the way the binary does: configuration
//! pointing at CSV files, an initial render of every view, then prompt input.

use broadway_common::test_utils::{csv_fixtures, init_test_logging, write_temp_file};
use broadway_config::Config;
use broadway_dashboard::{DashboardApp, DashboardError};
use tempfile::{NamedTempFile, TempDir};

struct Fixture {
    config: Config,
    output: TempDir,
    _dataset: NamedTempFile,
    _forecast: NamedTempFile,
}

fn fixture() -> Fixture {
    init_test_logging();
    let dataset = write_temp_file(csv_fixtures::broadway_csv());
    let forecast = write_temp_file(csv_fixtures::forecast_csv());
    let output = tempfile::tempdir().unwrap();

    let mut config = Config::default();
    config.data.dataset_path = dataset.path().display().to_string();
    config.data.forecast_path = forecast.path().display().to_string();
    config.output.directory = output.path().display().to_string();
    config.output.write_json = true;

    Fixture {
        config,
        output,
        _dataset: dataset,
        _forecast: forecast,
    }
}

fn chart_title(path: &std::path::Path) -> String {
    let json: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap();
    json["title"].as_str().unwrap().to_string()
}

#[test]
fn test_initial_render_writes_every_view() {
    let fixture = fixture();
    let app = DashboardApp::from_config(&fixture.config).unwrap();

    let messages = app.render_all();
    assert_eq!(messages.len(), 3);
    assert!(messages[0].starts_with("Total Revenue:"));
    assert!(messages[1].starts_with("Top Shows:"));
    assert!(messages[2].starts_with("Predictions:"));

    for stem in ["monthly_revenue", "top_shows", "forecast"] {
        let path = fixture.output.path().join(format!("{stem}.json"));
        assert!(path.exists(), "{stem}");
    }
    assert_eq!(
        chart_title(&fixture.output.path().join("forecast.json")),
        "Monthly Forecast of Wicked's Broadway Sales"
    );
}

#[tokio::test]
async fn test_prompt_updates_ranking_output() {
    let fixture = fixture();
    let mut app = DashboardApp::from_config(&fixture.config).unwrap();
    let input: &[u8] = b"metric total\ntop 3\nquit\n";
    let mut output = Vec::new();

    app.run_prompt(input, &mut output).await.unwrap();

    let output = String::from_utf8(output).unwrap();
    assert!(output.contains("Top 10 Broadway Shows by Total Revenue"));
    assert!(output.contains("between 5 and 20"));
    assert_eq!(app.session().selection().top_n, 10);
    assert_eq!(
        chart_title(&fixture.output.path().join("top_shows.json")),
        "Top 10 Broadway Shows by Total Revenue"
    );
}

#[test]
fn test_missing_dataset_is_fatal() {
    let fixture = fixture();
    let mut config = fixture.config.clone();
    config.data.dataset_path = fixture
        .output
        .path()
        .join("missing.csv")
        .display()
        .to_string();

    let err = DashboardApp::from_config(&config).unwrap_err();
    assert!(matches!(err, DashboardError::Broadway(_)));
    assert!(!err.is_recoverable());
}
