//! # Broadway Config
//!
//! Type-safe configuration management for the Broadway dashboard.
//!
//! This crate provides the YAML schema, defaults matching the published
//! dataset, validation rules, and a loader applying `BROADWAY_*`
//! environment overrides.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validation;

pub use defaults::*;
pub use loader::{ConfigError, ConfigLoader, CONFIG_PATH_ENV};
pub use schema::*;
