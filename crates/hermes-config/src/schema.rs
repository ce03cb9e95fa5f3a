//! Configuration schema types.
//!
//! This module defines the structure of all configuration sections.

use hermes_telemetry::{LogConfig, LogFormat};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

const JSON: &str = "application/json";
const FORM: &str = "application/x-www-form-urlencoded";

/// Codec section.
///
/// Names the media types the controller speaks. Every name must refer to a
/// built-in codec.
///
/// # Example
///
/// ```
/// use hermes_config::CodecsConfig;
///
/// let config = CodecsConfig {
///     default: "application/json".to_string(),
///     alternates: vec![],
///     decoders: vec!["application/x-www-form-urlencoded".to_string()],
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct CodecsConfig {
    /// Media type of the default codec.
    #[serde(default = "default_codec")]
    pub default: String,

    /// Media types of alternate codecs, in negotiation order.
    #[serde(default = "default_alternates")]
    pub alternates: Vec<String>,

    /// Media types of auxiliary decoder factories.
    #[serde(default = "default_decoders")]
    pub decoders: Vec<String>,
}

impl Default for CodecsConfig {
    fn default() -> Self {
        Self {
            default: default_codec(),
            alternates: default_alternates(),
            decoders: default_decoders(),
        }
    }
}

fn default_codec() -> String {
    JSON.to_string()
}

fn default_alternates() -> Vec<String> {
    vec![FORM.to_string()]
}

fn default_decoders() -> Vec<String> {
    vec![FORM.to_string()]
}

/// Where the query decode step sits relative to the body decode.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum QueryPlacement {
    /// No query decoding.
    Disabled,
    /// Query first, so body fields win.
    #[default]
    BeforeBody,
    /// Body first, so query fields win.
    AfterBody,
}

impl FromStr for QueryPlacement {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "disabled" => Ok(Self::Disabled),
            "before_body" => Ok(Self::BeforeBody),
            "after_body" => Ok(Self::AfterBody),
            other => Err(format!(
                "expected 'disabled', 'before_body' or 'after_body', got '{other}'"
            )),
        }
    }
}

impl fmt::Display for QueryPlacement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Disabled => "disabled",
            Self::BeforeBody => "before_body",
            Self::AfterBody => "after_body",
        })
    }
}

/// Ingress section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct IngressConfig {
    /// Query decode placement.
    #[serde(default)]
    pub query: QueryPlacement,

    /// Largest accepted request body in bytes.
    #[serde(default = "default_max_body_bytes")]
    pub max_body_bytes: usize,
}

impl Default for IngressConfig {
    fn default() -> Self {
        Self {
            query: QueryPlacement::default(),
            max_body_bytes: default_max_body_bytes(),
        }
    }
}

fn default_max_body_bytes() -> usize {
    1024 * 1024
}

/// Egress section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct EgressConfig {
    /// Charset parameter of `Content-Type`.
    #[serde(default = "default_charset")]
    pub charset: String,

    /// Body written when a response cannot be encoded.
    #[serde(default = "default_fallback_body")]
    pub fallback_body: String,
}

impl Default for EgressConfig {
    fn default() -> Self {
        Self {
            charset: default_charset(),
            fallback_body: default_fallback_body(),
        }
    }
}

fn default_charset() -> String {
    "utf-8".to_string()
}

fn default_fallback_body() -> String {
    "Internal Server Error".to_string()
}

/// Logging section.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// Enable logging.
    #[serde(default = "default_true")]
    pub enabled: bool,

    /// Level filter (e.g. "info", "hermes_pipeline=debug").
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Output format.
    #[serde(default)]
    pub format: LogFormat,

    /// Include file and line in log lines.
    #[serde(default)]
    pub include_location: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            level: default_log_level(),
            format: LogFormat::default(),
            include_location: false,
        }
    }
}

impl LoggingConfig {
    /// Converts the section into a telemetry [`LogConfig`].
    #[must_use]
    pub fn to_log_config(&self) -> LogConfig {
        LogConfig {
            enabled: self.enabled,
            level: self.level.clone(),
            format: self.format,
            include_location: self.include_location,
            ..LogConfig::default()
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_true() -> bool {
    true
}
