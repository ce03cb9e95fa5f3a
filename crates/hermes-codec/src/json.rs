//! JSON codec.

use crate::codec::Codec;
use crate::document::Document;
use crate::error::CodecError;
use serde_json::Value;

/// `application/json`.
///
/// Decoding rejects anything that is not a single well-formed JSON value and
/// reports the parser's message unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec {
    pretty: bool,
}

impl JsonCodec {
    /// Media type of this codec.
    pub const MEDIA_TYPE: &'static str = "application/json";

    /// Creates a codec emitting compact JSON.
    #[must_use]
    pub fn new() -> Self {
        Self { pretty: false }
    }

    /// Creates a codec emitting indented JSON.
    #[must_use]
    pub fn pretty() -> Self {
        Self { pretty: true }
    }
}

impl Codec for JsonCodec {
    fn media_type(&self) -> &str {
        Self::MEDIA_TYPE
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let encoded = if self.pretty {
            serde_json::to_vec_pretty(value)
        } else {
            serde_json::to_vec(value)
        };
        encoded.map_err(|e| CodecError::unrepresentable(Self::MEDIA_TYPE, e.to_string()))
    }

    fn decode(&self, body: &[u8]) -> Result<Document, CodecError> {
        serde_json::from_slice::<Value>(body)
            .map(Document::Tree)
            .map_err(|e| CodecError::malformed(Self::MEDIA_TYPE, e.to_string()))
    }
}
