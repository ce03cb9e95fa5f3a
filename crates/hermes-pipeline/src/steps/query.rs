//! Query string decoding.

use crate::error::IngressError;
use crate::input::Input;
use crate::transform::{Next, Transform};
use hermes_codec::{media, CodecDecoding, DecoderFactory, FormCodec};
use hermes_core::{Request, ResponseSink};
use std::sync::Arc;

/// Decodes the URL query string into the input.
///
/// Bound to one decoder factory. The step only acts when that factory
/// speaks `application/x-www-form-urlencoded`, the encoding of query
/// strings; with any other factory, or an empty query, it passes straight
/// to the next step.
pub struct QueryDecode {
    factory: Arc<dyn DecoderFactory>,
}

impl QueryDecode {
    /// Step name.
    pub const NAME: &'static str = "query_decode";

    /// Creates the step bound to `factory`.
    pub fn new(factory: impl DecoderFactory) -> Self {
        Self::shared(Arc::new(factory))
    }

    /// Creates the step bound to a shared factory.
    pub fn shared(factory: Arc<dyn DecoderFactory>) -> Self {
        Self { factory }
    }

    /// Creates the step with the built-in form decoder.
    pub fn form() -> Self {
        Self::new(CodecDecoding::form())
    }

    fn decode(&self, input: &mut dyn Input, request: &Request) -> Result<(), IngressError> {
        if !media::same_essence(self.factory.media_type(), FormCodec::MEDIA_TYPE) {
            tracing::debug!(
                media_type = self.factory.media_type(),
                "decoder factory does not handle query strings, skipping"
            );
            return Ok(());
        }
        let Some(query) = request.uri().query().filter(|q| !q.is_empty()) else {
            return Ok(());
        };

        let document = self
            .factory
            .new_decoder(query.as_bytes())
            .decode()
            .map_err(IngressError::MalformedQuery)?;
        input.merge(document).map_err(IngressError::MalformedQuery)
    }
}

impl Transform for QueryDecode {
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

impl std::fmt::Debug for QueryDecode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryDecode")
            .field("media_type", &self.factory.media_type())
            .finish()
    }
}
