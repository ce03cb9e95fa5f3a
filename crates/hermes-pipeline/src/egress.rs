//! The egress render pipeline.
//!
//! Outputs and boxed errors share one path: negotiate a codec from the
//! `Accept` header, encode, set `Content-Type` and status, write the body.
//! [`Egress::must_render`] always leaves a response in the sink, degrading
//! to a fixed plain-text 500 when encoding fails.

use crate::error::EgressError;
use hermes_codec::CodecStack;
use hermes_core::{RenderValue, Request, ResponseSink};
use http::header::{ACCEPT, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};
use std::sync::Arc;

/// Default charset advertised in `Content-Type`.
pub const DEFAULT_CHARSET: &str = "utf-8";

/// Default body of the fallback response.
pub const DEFAULT_FALLBACK_BODY: &str = "Internal Server Error";

const FALLBACK_CONTENT_TYPE: &str = "text/plain; charset=utf-8";

/// Returns the request's `Accept` header, if it is valid text.
pub fn accept_header(request: &Request) -> Option<&str> {
    request
        .headers()
        .get(ACCEPT)
        .and_then(|value| value.to_str().ok())
}

/// Serializes render values into a response sink.
#[derive(Debug)]
pub struct Egress {
    codecs: Arc<CodecStack>,
    charset: String,
    fallback_body: String,
}

impl Egress {
    /// Creates an egress over a codec stack.
    pub fn new(codecs: Arc<CodecStack>) -> Self {
        Self {
            codecs,
            charset: DEFAULT_CHARSET.to_string(),
            fallback_body: DEFAULT_FALLBACK_BODY.to_string(),
        }
    }

    /// Sets the charset parameter of `Content-Type`.
    #[must_use]
    pub fn with_charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Sets the fallback response body.
    #[must_use]
    pub fn with_fallback_body(mut self, body: impl Into<String>) -> Self {
        self.fallback_body = body.into();
        self
    }

    /// Returns the codec stack.
    pub fn codecs(&self) -> &CodecStack {
        &self.codecs
    }

    /// Returns the charset.
    pub fn charset(&self) -> &str {
        &self.charset
    }

    /// Renders a value with the codec negotiated from `accept`.
    ///
    /// Nothing is written to the sink if encoding fails.
    pub fn render(
        &self,
        accept: Option<&str>,
        sink: &mut dyn ResponseSink,
        value: &RenderValue,
    ) -> Result<(), EgressError> {
        let codec = self.codecs.resolve_for_encode(accept);
        let body = codec.encode(value.body())?;

        let content_type = format!("{}; charset={}", codec.media_type(), self.charset);
        let header = HeaderValue::from_str(&content_type)
            .map_err(|_| EgressError::InvalidContentType { value: content_type })?;

        tracing::debug!(
            media_type = codec.media_type(),
            status = value.status().as_u16(),
            length = body.len(),
            "rendering response"
        );

        sink.headers_mut().insert(CONTENT_TYPE, header);
        sink.set_status(value.status());
        sink.write_body(&body)?;
        Ok(())
    }

    /// Renders a value, falling back to a plain-text 500 on failure.
    ///
    /// Sink write failures cannot be recovered from and are logged.
    pub fn must_render(&self, accept: Option<&str>, sink: &mut dyn ResponseSink, value: &RenderValue) {
        match self.render(accept, sink, value) {
            Ok(()) => {}
            Err(EgressError::Write(error)) => {
                tracing::error!(error = %error, "failed to write response body");
            }
            Err(error) => {
                tracing::error!(error = %error, "render failed, writing fallback response");
                self.render_fallback(sink);
            }
        }
    }

    fn render_fallback(&self, sink: &mut dyn ResponseSink) {
        sink.headers_mut()
            .insert(CONTENT_TYPE, HeaderValue::from_static(FALLBACK_CONTENT_TYPE));
        sink.set_status(StatusCode::INTERNAL_SERVER_ERROR);
        if let Err(error) = sink.write_body(self.fallback_body.as_bytes()) {
            tracing::error!(error = %error, "failed to write fallback response body");
        }
    }
}
