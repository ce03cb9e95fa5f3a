//! Assembly errors.

use hermes_codec::StackError;
use hermes_config::ConfigError;
use hermes_telemetry::TelemetryError;
use thiserror::Error;

/// Errors raised while assembling a controller from configuration.
#[derive(Error, Debug)]
pub enum BuildError {
    /// A configured media type has no built-in codec.
    #[error("no built-in codec for media type '{media_type}' (in {field})")]
    UnknownMediaType {
        /// The configuration field naming the media type.
        field: &'static str,
        /// The media type as configured.
        media_type: String,
    },

    /// The codec stack or decoder set rejected a registration.
    #[error(transparent)]
    Stack(#[from] StackError),

    /// The configuration failed validation.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// The logging subscriber could not be installed.
    #[error(transparent)]
    Telemetry(#[from] TelemetryError),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_media_type_message() {
        let err = BuildError::UnknownMediaType {
            field: "codecs.alternates",
            media_type: "text/csv".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "no built-in codec for media type 'text/csv' (in codecs.alternates)"
        );
    }

    #[test]
    fn test_stack_error_is_transparent() {
        let inner = StackError::DuplicateMediaType {
            media_type: "application/json".to_string(),
        };
        let expected = inner.to_string();
        assert_eq!(BuildError::from(inner).to_string(), expected);
    }
}
