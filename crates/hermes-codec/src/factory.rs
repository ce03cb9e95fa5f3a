//! Decoder factories.
//!
//! A [`DecoderFactory`] binds a media type to a way of building a one-shot
//! [`Decoder`] over a byte source. Factories decode data that does not come
//! from the body, such as query strings, and extend the set of body formats
//! the ingress accepts without making them encodable.

use crate::codec::Codec;
use crate::document::Document;
use crate::error::{CodecError, StackError};
use crate::form::FormCodec;
use crate::json::JsonCodec;
use crate::media;
use std::fmt;
use std::sync::Arc;

/// A single-use decoder bound to its source.
pub trait Decoder {
    /// Decodes the source into a [`Document`].
    fn decode(&mut self) -> Result<Document, CodecError>;
}

/// Builds decoders for one media type.
pub trait DecoderFactory: Send + Sync + 'static {
    /// Returns the media type the produced decoders understand.
    fn media_type(&self) -> &str;

    /// Creates a decoder reading from `source`.
    fn new_decoder<'a>(&self, source: &'a [u8]) -> Box<dyn Decoder + 'a>;
}

/// A [`DecoderFactory`] backed by a [`Codec`]'s decode half.
///
/// ```
/// use hermes_codec::{CodecDecoding, DecoderFactory, Document};
///
/// let factory = CodecDecoding::form();
/// let doc = factory.new_decoder(b"a=1").decode().unwrap();
/// assert_eq!(doc, Document::Pairs(vec![("a".into(), "1".into())]));
/// ```
#[derive(Debug)]
pub struct CodecDecoding<C> {
    codec: Arc<C>,
}

impl<C: Codec> CodecDecoding<C> {
    /// Wraps a codec.
    pub fn new(codec: C) -> Self {
        Self {
            codec: Arc::new(codec),
        }
    }
}

impl CodecDecoding<FormCodec> {
    /// Decodes `application/x-www-form-urlencoded` data.
    #[must_use]
    pub fn form() -> Self {
        Self::new(FormCodec::new())
    }
}

impl CodecDecoding<JsonCodec> {
    /// Decodes `application/json` data.
    #[must_use]
    pub fn json() -> Self {
        Self::new(JsonCodec::new())
    }
}

struct CodecDecoder<'a, C> {
    codec: Arc<C>,
    source: &'a [u8],
}

impl<C: Codec> Decoder for CodecDecoder<'_, C> {
    fn decode(&mut self) -> Result<Document, CodecError> {
        self.codec.decode(self.source)
    }
}

impl<C: Codec> DecoderFactory for CodecDecoding<C> {
    fn media_type(&self) -> &str {
        self.codec.media_type()
    }

    fn new_decoder<'a>(&self, source: &'a [u8]) -> Box<dyn Decoder + 'a> {
        Box::new(CodecDecoder {
            codec: Arc::clone(&self.codec),
            source,
        })
    }
}

/// Decoder factories keyed by media type.
#[derive(Clone, Default)]
pub struct DecoderSet {
    factories: Vec<(String, Arc<dyn DecoderFactory>)>,
}

impl DecoderSet {
    /// Creates an empty set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a factory, rejecting a media type that is already present.
    pub fn insert(&mut self, factory: Arc<dyn DecoderFactory>) -> Result<(), StackError> {
        let raw = factory.media_type();
        if !media::is_valid(raw) {
            return Err(StackError::InvalidMediaType {
                value: raw.to_string(),
            });
        }
        let essence = media::essence(raw);
        if self.factories.iter().any(|(existing, _)| *existing == essence) {
            return Err(StackError::DuplicateMediaType { media_type: essence });
        }
        self.factories.push((essence, factory));
        Ok(())
    }

    /// Adds a factory in builder style.
    pub fn with(mut self, factory: impl DecoderFactory) -> Result<Self, StackError> {
        self.insert(Arc::new(factory))?;
        Ok(self)
    }

    /// Finds the factory for a media type, ignoring parameters and case.
    pub fn find(&self, media_type: &str) -> Option<&dyn DecoderFactory> {
        let wanted = media::essence(media_type);
        self.factories
            .iter()
            .find(|(essence, _)| *essence == wanted)
            .map(|(_, factory)| factory.as_ref())
    }

    /// Returns the registered media types in insertion order.
    pub fn media_types(&self) -> impl Iterator<Item = &str> + '_ {
        self.factories.iter().map(|(essence, _)| essence.as_str())
    }

    /// Returns the number of factories.
    #[must_use]
    pub fn len(&self) -> usize {
        self.factories.len()
    }

    /// Returns true if the set is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.factories.is_empty()
    }
}

impl fmt::Debug for DecoderSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DecoderSet")
            .field("media_types", &self.media_types().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_json_decoding() {
        let factory = CodecDecoding::json();
        assert_eq!(factory.media_type(), "application/json");
        let doc = factory.new_decoder(br#"{"a":1}"#).decode().unwrap();
        assert_eq!(doc, Document::Tree(json!({"a": 1})));
    }

    #[test]
    fn test_decoder_reports_malformed() {
        let factory = CodecDecoding::json();
        assert!(factory.new_decoder(b"{").decode().is_err());
    }

    #[test]
    fn test_set_find_ignores_parameters() {
        let set = DecoderSet::new().with(CodecDecoding::form()).unwrap();
        assert!(set
            .find("application/x-www-form-urlencoded; charset=utf-8")
            .is_some());
        assert!(set.find("application/json").is_none());
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_set_rejects_duplicates() {
        let err = DecoderSet::new()
            .with(CodecDecoding::form())
            .unwrap()
            .with(CodecDecoding::form())
            .unwrap_err();
        assert!(matches!(err, StackError::DuplicateMediaType { .. }));
    }

    #[test]
    fn test_empty_set() {
        let set = DecoderSet::new();
        assert!(set.is_empty());
        assert!(set.find("application/json").is_none());
    }
}
