//! Structured logging for Hermes.
//!
//! Every Hermes crate emits events through `tracing`. This crate installs a
//! `tracing-subscriber` registry that prints them as JSON lines (production)
//! or in a human-readable layout (development).
//!
//! | Level | Emitted for |
//! |-------|-------------|
//! | `debug` | Each ingress step, codec resolution, each render |
//! | `warn` | Requests rejected as client errors |
//! | `error` | Fallback renders, sink write failures |
//!
//! # Example
//!
//! ```rust,no_run
//! use hermes_telemetry::{init_logging, LogConfig};
//!
//! init_logging(&LogConfig::development()).unwrap();
//! tracing::info!("ready");
//! ```

#![doc(html_root_url = "https://docs.rs/hermes-telemetry/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod error;
pub mod logging;

pub use error::TelemetryError;
pub use logging::{create_env_filter, init_logging, LogConfig, LogFormat};

/// Result type for telemetry operations.
pub type TelemetryResult<T> = Result<T, TelemetryError>;
