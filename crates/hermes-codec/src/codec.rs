//! The codec trait.

use crate::document::Document;
use crate::error::CodecError;
use serde_json::Value;

/// A named wire format with symmetric encode and decode.
///
/// Implementations must be stateless; a single instance serves every
/// request concurrently.
pub trait Codec: Send + Sync + 'static {
    /// Returns the media type this codec speaks, as `type/subtype`.
    fn media_type(&self) -> &str;

    /// Serializes a value into the wire format.
    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError>;

    /// Parses a payload into a [`Document`].
    fn decode(&self, body: &[u8]) -> Result<Document, CodecError>;
}
