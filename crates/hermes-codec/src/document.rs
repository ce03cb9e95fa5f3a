//! Decoded, format-neutral documents.

use crate::de::{self, Field};
use crate::error::CodecError;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

/// The result of decoding a payload, before it is given a Rust type.
///
/// Tree-shaped formats produce [`Document::Tree`]. Flat key/value formats
/// produce [`Document::Pairs`], which keep repeated keys and are
/// deserialized with form semantics: every value starts out as a string and
/// is parsed into the field's type, and a repeated key fills a sequence.
#[derive(Debug, Clone, PartialEq)]
pub enum Document {
    /// A structured document.
    Tree(Value),
    /// Ordered key/value pairs.
    Pairs(Vec<(String, String)>),
}

impl Document {
    /// Deserializes the document into `T`.
    ///
    /// ```
    /// use hermes_codec::Document;
    /// use serde::Deserialize;
    ///
    /// #[derive(Deserialize)]
    /// struct Query {
    ///     page: u32,
    /// }
    ///
    /// let doc = Document::Pairs(vec![("page".into(), "3".into())]);
    /// let query: Query = doc.into_typed().unwrap();
    /// assert_eq!(query.page, 3);
    /// ```
    pub fn into_typed<T: DeserializeOwned>(self) -> Result<T, CodecError> {
        match self {
            Self::Tree(value) => {
                serde_json::from_value(value).map_err(|e| CodecError::mismatch(e.to_string()))
            }
            Self::Pairs(pairs) => Ok(de::from_entries(de::group_pairs(pairs))?),
        }
    }

    /// Merges the document into an existing value.
    ///
    /// Every field the document carries overwrites the target's field, even
    /// when the new value is empty, zero or false. Fields the document does
    /// not carry keep their current value, and nested objects merge key by
    /// key. Keys may name a field by any of its serde aliases. A `null` tree
    /// leaves the target alone, and a target that does not serialize to an
    /// object is replaced outright.
    ///
    /// On error the target is left untouched.
    ///
    /// ```
    /// use hermes_codec::Document;
    /// use serde::{Deserialize, Serialize};
    ///
    /// #[derive(Serialize, Deserialize)]
    /// struct Filter {
    ///     term: String,
    ///     exact: bool,
    /// }
    ///
    /// let mut filter = Filter { term: "rust".into(), exact: true };
    /// Document::Pairs(vec![("exact".into(), "false".into())])
    ///     .merge_into(&mut filter)
    ///     .unwrap();
    /// assert_eq!(filter.term, "rust");
    /// assert!(!filter.exact);
    /// ```
    pub fn merge_into<T>(self, target: &mut T) -> Result<(), CodecError>
    where
        T: Serialize + DeserializeOwned,
    {
        let current = match serde_json::to_value(&*target) {
            Ok(Value::Object(current)) => current,
            Ok(_) => {
                *target = self.into_typed()?;
                return Ok(());
            }
            Err(e) => return Err(CodecError::mismatch(e.to_string())),
        };

        let overlay: Vec<(String, Field)> = match self {
            Self::Tree(Value::Null) => return Ok(()),
            Self::Tree(Value::Object(fields)) => fields
                .into_iter()
                .map(|(key, value)| {
                    let value = match (value, current.get(&key)) {
                        (Value::Object(nested), Some(Value::Object(existing))) => {
                            let mut merged = existing.clone();
                            de::merge_json(&mut merged, nested);
                            Value::Object(merged)
                        }
                        (value, _) => value,
                    };
                    (key, Field::Json(value))
                })
                .collect(),
            tree @ Self::Tree(_) => {
                *target = tree.into_typed()?;
                return Ok(());
            }
            Self::Pairs(pairs) => de::group_pairs(pairs),
        };

        *target = de::overlay_onto(&overlay, &current)?;
        Ok(())
    }

    /// Returns true if the document carries no data.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::Tree(Value::Null) => true,
            Self::Tree(Value::Object(map)) => map.is_empty(),
            Self::Tree(_) => false,
            Self::Pairs(pairs) => pairs.is_empty(),
        }
    }
}
