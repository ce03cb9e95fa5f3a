//! Codec error types.

use thiserror::Error;

/// Errors raised while resolving, encoding or decoding.
///
/// Decode failures display the underlying parser message unchanged so it can
/// be surfaced to the client verbatim.
#[derive(Debug, Error)]
pub enum CodecError {
    /// No codec is registered for the media type.
    #[error("unsupported media type: {media_type}")]
    UnsupportedMediaType {
        /// The requested media type.
        media_type: String,
    },

    /// The payload is not a well-formed document for the codec.
    #[error("{message}")]
    Malformed {
        /// Media type of the codec that rejected the payload.
        media_type: String,
        /// The parser's message.
        message: String,
    },

    /// The document is well-formed but does not fit the target type.
    #[error("{message}")]
    Mismatch {
        /// The deserializer's message.
        message: String,
    },

    /// The value cannot be represented in the codec's format.
    #[error("cannot encode as {media_type}: {message}")]
    Unrepresentable {
        /// Media type of the codec.
        media_type: String,
        /// Why the value could not be encoded.
        message: String,
    },
}

impl CodecError {
    /// Creates an unsupported media type error.
    pub fn unsupported(media_type: impl Into<String>) -> Self {
        Self::UnsupportedMediaType {
            media_type: media_type.into(),
        }
    }

    /// Creates a malformed payload error.
    pub fn malformed(media_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Malformed {
            media_type: media_type.into(),
            message: message.into(),
        }
    }

    /// Creates a type mismatch error.
    pub fn mismatch(message: impl Into<String>) -> Self {
        Self::Mismatch {
            message: message.into(),
        }
    }

    /// Creates an unrepresentable value error.
    pub fn unrepresentable(media_type: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Unrepresentable {
            media_type: media_type.into(),
            message: message.into(),
        }
    }
}

/// Errors raised while assembling a codec stack or decoder set.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum StackError {
    /// Two codecs (or two decoder factories) share a media type.
    #[error("media type '{media_type}' is registered more than once")]
    DuplicateMediaType {
        /// The duplicated media type.
        media_type: String,
    },

    /// A codec reports a media type that does not parse.
    #[error("invalid media type '{value}'")]
    InvalidMediaType {
        /// The offending value.
        value: String,
    },
}
