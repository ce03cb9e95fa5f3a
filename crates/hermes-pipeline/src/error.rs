//! Pipeline error types.

use hermes_codec::CodecError;
use hermes_core::BoxError;
use std::io;
use thiserror::Error;

/// A validator rejected the input.
///
/// Displays the validator's message unchanged.
#[derive(Debug, Error)]
#[error("{source}")]
pub struct ValidationError {
    source: BoxError,
}

impl ValidationError {
    /// Wraps a validator failure.
    pub fn new(source: impl Into<BoxError>) -> Self {
        Self {
            source: source.into(),
        }
    }
}

/// Errors raised by the ingress chain.
///
/// Every variant is caused by the request, and the controller renders all of
/// them as client errors.
#[derive(Debug, Error)]
pub enum IngressError {
    /// No codec or decoder factory handles the request's Content-Type.
    #[error("unsupported media type: {media_type}")]
    UnsupportedMediaType {
        /// The request's media type.
        media_type: String,
    },

    /// The body exceeds the configured limit.
    #[error("request body of {length} bytes exceeds the limit of {limit} bytes")]
    PayloadTooLarge {
        /// Body length in bytes.
        length: usize,
        /// Configured limit in bytes.
        limit: usize,
    },

    /// The body could not be decoded into the input.
    #[error(transparent)]
    MalformedBody(CodecError),

    /// The query string could not be decoded into the input.
    #[error(transparent)]
    MalformedQuery(CodecError),

    /// A validation step rejected the input.
    #[error(transparent)]
    Validation(#[from] ValidationError),

    /// A custom step failed.
    #[error("{source}")]
    Step {
        /// Name of the failing step.
        step: &'static str,
        /// The step's error.
        source: BoxError,
    },
}

impl IngressError {
    /// Creates a step failure.
    pub fn step(step: &'static str, source: impl Into<BoxError>) -> Self {
        Self::Step {
            step,
            source: source.into(),
        }
    }
}

/// Errors raised while rendering a response.
#[derive(Debug, Error)]
pub enum EgressError {
    /// The value could not be encoded by the negotiated codec.
    #[error("failed to encode response: {0}")]
    Encode(#[from] CodecError),

    /// The Content-Type value is not a valid header value.
    #[error("invalid content type '{value}'")]
    InvalidContentType {
        /// The rejected value.
        value: String,
    },

    /// The sink rejected the body.
    #[error("failed to write response body: {0}")]
    Write(#[from] io::Error),
}
