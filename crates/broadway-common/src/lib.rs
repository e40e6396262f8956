//! # Broadway Common
//!
//! Shared types, utilities, and common functionality for the Broadway dashboard.
//!
//! This crate provides the error taxonomy, the domain types flowing through
//! the aggregation pipeline, and the logging setup used by every other crate
//! in the workspace.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod logging;
pub mod types;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod test_utils;

pub use error::{BroadwayError, Result};
pub use logging::{init_logging, LoggingConfig};
pub use types::*;
pub use utils::*;
