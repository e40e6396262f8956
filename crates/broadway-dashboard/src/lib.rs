//! # Broadway Dashboard
//!
//! Command line front end for the Broadway revenue dashboard.
//!
//! Loads the weekly grosses and the forecast named by the configuration,
//! renders the three views (monthly revenue, top shows, forecast overlay)
//! and then reads control changes from an interactive prompt.

#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod app;
pub mod cli;
pub mod command;
pub mod error;

pub use app::{DashboardApp, Flow, PromptEnd, DATA_NOTE, FORECAST_NOTE, TITLE};
pub use cli::Args;
pub use command::{PromptCommand, HELP};
pub use error::{DashboardError, DashboardResult};
