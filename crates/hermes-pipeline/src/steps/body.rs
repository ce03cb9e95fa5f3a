//! Body decoding.

use crate::error::IngressError;
use crate::input::Input;
use crate::transform::{Next, Transform};
use hermes_codec::{media, CodecStack, DecoderSet};
use hermes_core::{Request, ResponseSink};
use http::header::CONTENT_TYPE;
use std::sync::Arc;

/// Default body size limit (1 MiB).
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Decodes the request body into the input.
///
/// Runs only when the body is non-empty and a `Content-Type` header is
/// present. The codec is looked up in the codec stack first, then in the
/// decoder set. The decoded document is merged into the input before the
/// chain continues.
#[derive(Debug)]
pub struct BodyDecode {
    codecs: Arc<CodecStack>,
    decoders: DecoderSet,
    max_body_bytes: usize,
}

impl BodyDecode {
    /// Step name.
    pub const NAME: &'static str = "body_decode";

    /// Creates the step over a codec stack and decoder set.
    pub fn new(codecs: Arc<CodecStack>, decoders: DecoderSet) -> Self {
        Self {
            codecs,
            decoders,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Sets the body size limit.
    #[must_use]
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Returns the body size limit.
    pub fn max_body_bytes(&self) -> usize {
        self.max_body_bytes
    }

    fn decode(&self, input: &mut dyn Input, request: &Request) -> Result<(), IngressError> {
        let body = request.body();
        if body.is_empty() {
            return Ok(());
        }
        let Some(content_type) = request.headers().get(CONTENT_TYPE) else {
            tracing::debug!(length = body.len(), "body without content type, skipping decode");
            return Ok(());
        };
        let content_type = String::from_utf8_lossy(content_type.as_bytes());

        if body.len() > self.max_body_bytes {
            return Err(IngressError::PayloadTooLarge {
                length: body.len(),
                limit: self.max_body_bytes,
            });
        }

        let document = if let Ok(codec) = self.codecs.resolve_for_decode(&content_type) {
            tracing::debug!(media_type = codec.media_type(), "decoding body with codec");
            codec.decode(body)
        } else if let Some(factory) = self.decoders.find(&content_type) {
            tracing::debug!(media_type = factory.media_type(), "decoding body with decoder factory");
            factory.new_decoder(body).decode()
        } else {
            return Err(IngressError::UnsupportedMediaType {
                media_type: media::essence(&content_type),
            });
        };

        let document = document.map_err(IngressError::MalformedBody)?;
        input.merge(document).map_err(IngressError::MalformedBody)
    }
}

impl Transform for BodyDecode {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform(
        &self,
        input: &mut dyn Input,
        request: &Request,
        sink: &mut dyn ResponseSink,
        next: Next<'_>,
    ) -> Result<(), IngressError> {
        self.decode(input, request)?;
        next.run(input, request, sink)
    }
}
