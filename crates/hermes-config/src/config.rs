//! Root configuration type.

use crate::error::ConfigError;
use crate::schema::{CodecsConfig, EgressConfig, IngressConfig, LoggingConfig};
use hermes_codec::media;
use hermes_telemetry::{create_env_filter, LogFormat};
use http::HeaderValue;
use serde::{Deserialize, Serialize};

/// Complete Hermes configuration.
///
/// Use [`ConfigLoader`](crate::ConfigLoader) to load it from files and
/// environment variables.
///
/// # Example
///
/// ```
/// use hermes_config::HermesConfig;
///
/// let config = HermesConfig::default();
/// assert_eq!(config.codecs.default, "application/json");
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(deny_unknown_fields)]
pub struct HermesConfig {
    /// Codec selection.
    #[serde(default)]
    pub codecs: CodecsConfig,

    /// Ingress chain settings.
    #[serde(default)]
    pub ingress: IngressConfig,

    /// Egress settings.
    #[serde(default)]
    pub egress: EgressConfig,

    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl HermesConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::InvalidValue` if:
    /// - A media type does not parse
    /// - The default codec is repeated among the alternates, or an
    ///   alternate or decoder is listed twice
    /// - The charset is empty or cannot appear in a `Content-Type` header
    /// - The body limit is zero
    /// - The log level filter does not parse
    pub fn validate(&self) -> Result<(), ConfigError> {
        check_media_type("codecs.default", &self.codecs.default)?;

        let mut seen = vec![media::essence(&self.codecs.default)];
        for alternate in &self.codecs.alternates {
            check_media_type("codecs.alternates", alternate)?;
            let essence = media::essence(alternate);
            if seen.contains(&essence) {
                return Err(ConfigError::invalid_value(
                    "codecs.alternates",
                    format!("media type '{essence}' is listed more than once"),
                ));
            }
            seen.push(essence);
        }

        let mut decoders = Vec::new();
        for decoder in &self.codecs.decoders {
            check_media_type("codecs.decoders", decoder)?;
            let essence = media::essence(decoder);
            if decoders.contains(&essence) {
                return Err(ConfigError::invalid_value(
                    "codecs.decoders",
                    format!("media type '{essence}' is listed more than once"),
                ));
            }
            decoders.push(essence);
        }

        if self.egress.charset.trim().is_empty() {
            return Err(ConfigError::invalid_value("egress.charset", "must not be empty"));
        }
        let content_type = format!("{}; charset={}", self.codecs.default, self.egress.charset);
        if HeaderValue::from_str(&content_type).is_err() {
            return Err(ConfigError::invalid_value(
                "egress.charset",
                "is not valid in a Content-Type header",
            ));
        }

        if self.ingress.max_body_bytes == 0 {
            return Err(ConfigError::invalid_value(
                "ingress.max_body_bytes",
                "must be greater than zero",
            ));
        }

        if let Err(e) = create_env_filter(&self.logging.level) {
            return Err(ConfigError::invalid_value("logging.level", e.to_string()));
        }

        Ok(())
    }

    /// Development preset: pretty debug logging with source locations.
    ///
    /// ```
    /// use hermes_config::HermesConfig;
    ///
    /// let config = HermesConfig::development();
    /// assert_eq!(config.logging.level, "debug");
    /// ```
    #[must_use]
    pub fn development() -> Self {
        let mut config = Self::default();
        config.logging.level = "debug".to_string();
        config.logging.format = LogFormat::Pretty;
        config.logging.include_location = true;
        config
    }

    /// Production preset: JSON logging at info level.
    #[must_use]
    pub fn production() -> Self {
        let mut config = Self::default();
        config.logging.level = "info".to_string();
        config.logging.format = LogFormat::Json;
        config.logging.include_location = false;
        config
    }
}

fn check_media_type(field: &str, value: &str) -> Result<(), ConfigError> {
    if media::is_valid(value) {
        Ok(())
    } else {
        Err(ConfigError::invalid_value(
            field,
            format!("'{value}' is not a media type"),
        ))
    }
}
