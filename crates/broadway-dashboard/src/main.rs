//! Main entry point for the Broadway dashboard.

use anyhow::Context;
use broadway_config::{Config, ConfigLoader};
use broadway_dashboard::{Args, DashboardApp, PromptEnd};
use clap::Parser;
use std::io::Write;
use tokio::io::BufReader;
use tracing::{error, info};

/// Conventional exit status after SIGINT.
const INTERRUPTED_EXIT_CODE: i32 = 130;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    let mut config = load_config(&args)?;
    args.apply_to(&mut config);
    broadway_common::init_logging(&config.logging).context("Failed to initialize logging")?;

    info!("Starting Broadway dashboard");

    let mut app = match DashboardApp::from_config(&config) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Failed to load dashboard data");
            return Err(e).context("Cannot start the dashboard");
        }
    };

    for line in app.render_all() {
        println!("{line}");
    }

    if args.no_interactive {
        return Ok(());
    }

    let input = BufReader::new(tokio::io::stdin());
    let mut output = std::io::stdout();
    let end = app.run_until_shutdown(input, &mut output, ctrl_c()).await?;

    if end == PromptEnd::Interrupted {
        // The pending stdin read sits on a blocking thread the runtime would wait for
        let _ = output.flush();
        std::process::exit(INTERRUPTED_EXIT_CODE);
    }

    Ok(())
}

/// Resolves on Ctrl-C; never resolves if the handler cannot be installed.
async fn ctrl_c() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for Ctrl-C");
        std::future::pending::<()>().await;
    }
}

fn load_config(args: &Args) -> anyhow::Result<Config> {
    let config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => ConfigLoader::load().context("Failed to load configuration")?,
    };
    Ok(config)
}
