//! Command line arguments.

use broadway_config::Config;
use clap::Parser;
use std::path::PathBuf;

/// Command line arguments
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Args {
    /// Configuration file path
    #[arg(short, long, env = "BROADWAY_CONFIG_PATH")]
    pub config: Option<PathBuf>,

    /// Log level, overriding the configuration file
    #[arg(short, long)]
    pub log_level: Option<String>,

    /// Directory receiving the rendered charts
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Also write chart specifications as JSON
    #[arg(long)]
    pub json: bool,

    /// Render the charts and exit without starting the prompt
    #[arg(long)]
    pub no_interactive: bool,
}

impl Args {
    /// Applies command line overrides on top of the loaded configuration.
    pub fn apply_to(&self, config: &mut Config) {
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if let Some(dir) = &self.output_dir {
            config.output.directory = dir.display().to_string();
        }
        if self.json {
            config.output.write_json = true;
        }
    }
}
