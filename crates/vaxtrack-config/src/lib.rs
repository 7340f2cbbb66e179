//! # VaxTrack Config
//!
//! Type-safe configuration management for the VaxTrack dashboard service.
//!
//! This crate provides the configuration schema, defaults, TOML loading
//! with environment variable overrides, and validation.

#![warn(missing_docs)]
#![warn(clippy::all)]
#![allow(clippy::module_name_repetitions)]

pub mod defaults;
pub mod loader;
pub mod schema;
pub mod validator;

pub use loader::{ConfigError, ConfigLoader};
pub use schema::{
    ChartTheme, ChartsConfig, Config, DataConfig, LoggingSettings, ServerConfig, SourceKind,
};
pub use validator::ConfigValidator;
