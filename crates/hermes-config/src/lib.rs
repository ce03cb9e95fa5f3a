//! Typed configuration for Hermes controllers.
//!
//! This crate provides a strongly-typed configuration with support for:
//! - TOML and JSON configuration files
//! - `.env` files and environment variable overrides
//! - Strict validation (fails on unknown fields)
//! - Layered configuration (defaults → file → env)
//!
//! # Overview
//!
//! [`HermesConfig`] groups four sections:
//!
//! - [`CodecsConfig`] - Default codec, alternates and auxiliary decoders
//! - [`IngressConfig`] - Query placement and body size limit
//! - [`EgressConfig`] - Charset and fallback body
//! - [`LoggingConfig`] - Level filter and output format
//!
//! # Example
//!
//! ```no_run
//! use hermes_config::ConfigLoader;
//!
//! # fn main() -> Result<(), hermes_config::ConfigError> {
//! let config = ConfigLoader::new()
//!     .with_file("hermes.toml")?
//!     .with_env_prefix("HERMES")
//!     .load()?;
//!
//! println!("default codec: {}", config.codecs.default);
//! # Ok(())
//! # }
//! ```
//!
//! # Configuration File Format
//!
//! ```toml
//! [codecs]
//! default = "application/json"
//! alternates = ["application/x-www-form-urlencoded"]
//! decoders = ["application/x-www-form-urlencoded"]
//!
//! [ingress]
//! query = "before_body"
//! max_body_bytes = 1048576
//!
//! [egress]
//! charset = "utf-8"
//! fallback_body = "Internal Server Error"
//!
//! [logging]
//! level = "info"
//! format = "json"
//! ```
//!
//! # Environment Variable Overrides
//!
//! Values can be overridden with variables of the form
//! `PREFIX__SECTION__KEY`:
//!
//! - `HERMES__CODECS__ALTERNATES=application/x-www-form-urlencoded`
//! - `HERMES__INGRESS__QUERY=after_body`
//! - `HERMES__LOGGING__FORMAT=pretty`

#![doc(html_root_url = "https://docs.rs/hermes-config/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod config;
mod error;
mod loader;
mod schema;

pub use config::HermesConfig;
pub use error::ConfigError;
pub use hermes_telemetry::LogFormat;
pub use loader::ConfigLoader;
pub use schema::{CodecsConfig, EgressConfig, IngressConfig, LoggingConfig, QueryPlacement};
