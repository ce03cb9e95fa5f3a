//! URL-encoded form codec.

use crate::codec::Codec;
use crate::document::Document;
use crate::error::CodecError;
use serde_json::Value;

/// `application/x-www-form-urlencoded`.
///
/// Decodes to [`Document::Pairs`]. Encoding accepts a flat JSON object:
/// scalars become one pair, arrays of scalars become repeated keys and
/// `null` fields are omitted. Keys are emitted in sorted order.
///
/// ```
/// use hermes_codec::{Codec, FormCodec};
/// use serde_json::json;
///
/// let body = FormCodec::new().encode(&json!({"foo": "bar", "bar": "foo"})).unwrap();
/// assert_eq!(body, b"bar=foo&foo=bar");
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct FormCodec;

impl FormCodec {
    /// Media type of this codec.
    pub const MEDIA_TYPE: &'static str = "application/x-www-form-urlencoded";

    /// Creates the codec.
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn flatten(value: &Value) -> Result<Vec<(&str, String)>, CodecError> {
    let Value::Object(map) = value else {
        return Err(CodecError::unrepresentable(
            FormCodec::MEDIA_TYPE,
            "top-level value must be an object",
        ));
    };

    let mut pairs = Vec::with_capacity(map.len());
    for (key, field) in map {
        match field {
            Value::Null => {}
            Value::Array(items) => {
                for item in items {
                    let text = scalar_text(item).ok_or_else(|| {
                        CodecError::unrepresentable(
                            FormCodec::MEDIA_TYPE,
                            format!("field '{key}' contains a nested value"),
                        )
                    })?;
                    pairs.push((key.as_str(), text));
                }
            }
            Value::Object(_) => {
                return Err(CodecError::unrepresentable(
                    FormCodec::MEDIA_TYPE,
                    format!("field '{key}' is a nested object"),
                ));
            }
            scalar => {
                if let Some(text) = scalar_text(scalar) {
                    pairs.push((key.as_str(), text));
                }
            }
        }
    }
    Ok(pairs)
}

impl Codec for FormCodec {
    fn media_type(&self) -> &str {
        Self::MEDIA_TYPE
    }

    fn encode(&self, value: &Value) -> Result<Vec<u8>, CodecError> {
        let pairs = flatten(value)?;
        serde_urlencoded::to_string(&pairs)
            .map(String::into_bytes)
            .map_err(|e| CodecError::unrepresentable(Self::MEDIA_TYPE, e.to_string()))
    }

    fn decode(&self, body: &[u8]) -> Result<Document, CodecError> {
        serde_urlencoded::from_bytes::<Vec<(String, String)>>(body)
            .map(Document::Pairs)
            .map_err(|e| CodecError::malformed(Self::MEDIA_TYPE, e.to_string()))
    }
}
