//! Deserializers for turning documents into typed values.
//!
//! Pair values arrive as strings and are parsed on demand from the type the
//! target asks for. Repeated keys are grouped so that sequence fields see
//! every value in order, while scalar fields take the last one.
//!
//! Merging feeds the target's derived `Deserialize` a single map made of the
//! document's entries followed by the input's current fields, so whatever the
//! document carries wins and everything else is kept.

use crate::error::CodecError;
use serde::de::value::{MapDeserializer, SeqDeserializer};
use serde::de::{self, DeserializeOwned, Deserializer, IntoDeserializer, Visitor};
use serde::forward_to_deserialize_any;
use serde_json::{Map, Value};
use std::fmt::Display;
use thiserror::Error;

#[derive(Debug, Error)]
pub(crate) enum DeError {
    #[error("duplicate field `{0}`")]
    DuplicateField(&'static str),
    #[error("{0}")]
    Message(String),
}

impl de::Error for DeError {
    fn custom<T: Display>(msg: T) -> Self {
        Self::Message(msg.to_string())
    }

    fn duplicate_field(field: &'static str) -> Self {
        Self::DuplicateField(field)
    }
}

impl From<DeError> for CodecError {
    fn from(err: DeError) -> Self {
        Self::mismatch(err.to_string())
    }
}

/// Every value sent under one form key.
#[derive(Debug, Clone)]
pub(crate) struct Text(Vec<String>);

impl Text {
    fn last(&self) -> &str {
        self.0.last().map_or("", String::as_str)
    }

    fn into_last(mut self) -> String {
        self.0.pop().unwrap_or_default()
    }
}

macro_rules! parse_text {
    ($($method:ident => $visit:ident,)*) => {$(
        fn $method<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
            match self.last().parse() {
                Ok(value) => visitor.$visit(value),
                Err(e) => Err(de::Error::custom(format_args!("invalid value {:?}: {e}", self.last()))),
            }
        }
    )*};
}

impl<'de> Deserializer<'de> for Text {
    type Error = DeError;

    fn deserialize_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        if self.0.len() > 1 {
            self.deserialize_seq(visitor)
        } else {
            visitor.visit_string(self.into_last())
        }
    }

    parse_text! {
        deserialize_bool => visit_bool,
        deserialize_i8 => visit_i8,
        deserialize_i16 => visit_i16,
        deserialize_i32 => visit_i32,
        deserialize_i64 => visit_i64,
        deserialize_u8 => visit_u8,
        deserialize_u16 => visit_u16,
        deserialize_u32 => visit_u32,
        deserialize_u64 => visit_u64,
        deserialize_f32 => visit_f32,
        deserialize_f64 => visit_f64,
        deserialize_char => visit_char,
    }

    fn deserialize_str<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_string(self.into_last())
    }

    fn deserialize_string<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_string(self.into_last())
    }

    fn deserialize_option<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_some(self)
    }

    fn deserialize_unit<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_unit()
    }

    fn deserialize_newtype_struct<V: Visitor<'de>>(
        self,
        _name: &'static str,
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_newtype_struct(self)
    }

    fn deserialize_seq<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        let values = self.0.into_iter().map(|value| Self(vec![value]));
        let mut seq = SeqDeserializer::<_, DeError>::new(values);
        let value = visitor.visit_seq(&mut seq)?;
        seq.end()?;
        Ok(value)
    }

    fn deserialize_tuple<V: Visitor<'de>>(self, _len: usize, visitor: V) -> Result<V::Value, DeError> {
        self.deserialize_seq(visitor)
    }

    fn deserialize_enum<V: Visitor<'de>>(
        self,
        _name: &'static str,
        _variants: &'static [&'static str],
        visitor: V,
    ) -> Result<V::Value, DeError> {
        visitor.visit_enum(self.into_last().into_deserializer())
    }

    fn deserialize_ignored_any<V: Visitor<'de>>(self, visitor: V) -> Result<V::Value, DeError> {
        visitor.visit_unit()
    }

    forward_to_deserialize_any! {
        bytes byte_buf unit_struct tuple_struct map struct identifier
    }
}

impl<'de> IntoDeserializer<'de, DeError> for Text {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

/// A value in a merged map: either structured or form text.
#[derive(Debug, Clone)]
pub(crate) enum Field {
    Json(Value),
    Text(Text),
}

macro_rules! delegate_field {
    ($($method:ident($($arg:ident: $ty:ty),*),)*) => {$(
        fn $method<V: Visitor<'de>>(self, $($arg: $ty,)* visitor: V) -> Result<V::Value, DeError> {
            match self {
                Self::Json(value) => value
                    .$method($($arg,)* visitor)
                    .map_err(<DeError as de::Error>::custom),
                Self::Text(text) => text.$method($($arg,)* visitor),
            }
        }
    )*};
}

impl<'de> Deserializer<'de> for Field {
    type Error = DeError;

    delegate_field! {
        deserialize_any(),
        deserialize_bool(),
        deserialize_i8(),
        deserialize_i16(),
        deserialize_i32(),
        deserialize_i64(),
        deserialize_u8(),
        deserialize_u16(),
        deserialize_u32(),
        deserialize_u64(),
        deserialize_f32(),
        deserialize_f64(),
        deserialize_char(),
        deserialize_str(),
        deserialize_string(),
        deserialize_bytes(),
        deserialize_byte_buf(),
        deserialize_option(),
        deserialize_unit(),
        deserialize_unit_struct(name: &'static str),
        deserialize_newtype_struct(name: &'static str),
        deserialize_seq(),
        deserialize_tuple(len: usize),
        deserialize_tuple_struct(name: &'static str, len: usize),
        deserialize_map(),
        deserialize_struct(name: &'static str, fields: &'static [&'static str]),
        deserialize_enum(name: &'static str, variants: &'static [&'static str]),
        deserialize_identifier(),
        deserialize_ignored_any(),
    }
}

impl<'de> IntoDeserializer<'de, DeError> for Field {
    type Deserializer = Self;

    fn into_deserializer(self) -> Self {
        self
    }
}

/// Groups pairs by key, keeping first-appearance order.
pub(crate) fn group_pairs(pairs: Vec<(String, String)>) -> Vec<(String, Field)> {
    let mut grouped: Vec<(String, Vec<String>)> = Vec::new();
    for (key, value) in pairs {
        match grouped.iter_mut().find(|(k, _)| *k == key) {
            Some((_, values)) => values.push(value),
            None => grouped.push((key, vec![value])),
        }
    }
    grouped
        .into_iter()
        .map(|(key, values)| (key, Field::Text(Text(values))))
        .collect()
}

/// Deserializes `T` from map entries.
pub(crate) fn from_entries<T, I>(entries: I) -> Result<T, DeError>
where
    T: DeserializeOwned,
    I: IntoIterator<Item = (String, Field)>,
{
    T::deserialize(MapDeserializer::<_, DeError>::new(entries.into_iter()))
}

/// Deserializes `T` from `overlay` laid over the `current` fields.
///
/// A current field is dropped when the overlay names it, either directly or
/// through a serde alias. Aliases only surface as a duplicate field, so the
/// aliased current field is dropped and the map replayed.
pub(crate) fn overlay_onto<T: DeserializeOwned>(
    overlay: &[(String, Field)],
    current: &Map<String, Value>,
) -> Result<T, DeError> {
    let named = |key: &str| overlay.iter().any(|(k, _)| k == key);
    let mut shadowed: Vec<&'static str> = Vec::new();
    loop {
        let kept = current
            .iter()
            .filter(|(key, _)| {
                !named(key.as_str()) && !shadowed.iter().any(|field| *field == key.as_str())
            })
            .map(|(key, value)| (key.clone(), Field::Json(value.clone())));
        match from_entries(overlay.iter().cloned().chain(kept)) {
            Err(DeError::DuplicateField(field))
                if current.contains_key(field) && !named(field) && !shadowed.contains(&field) =>
            {
                shadowed.push(field);
            }
            result => return result,
        }
    }
}

/// Lays `overlay` over `current` key by key, descending into objects on both
/// sides.
pub(crate) fn merge_json(current: &mut Map<String, Value>, overlay: Map<String, Value>) {
    for (key, value) in overlay {
        match (current.get_mut(&key), value) {
            (Some(Value::Object(existing)), Value::Object(nested)) => merge_json(existing, nested),
            (_, value) => {
                current.insert(key, value);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use serde_json::json;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Listing {
        title: String,
        #[serde(default)]
        tags: Vec<String>,
        price: Option<u32>,
    }

    #[derive(Debug, Deserialize, PartialEq)]
    struct Aliased {
        #[serde(rename = "long-name", alias = "short")]
        name: String,
        count: u32,
    }

    fn pairs(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|(k, v)| ((*k).to_string(), (*v).to_string())).collect()
    }

    #[test]
    fn test_repeated_keys_fill_sequence() {
        let entries = group_pairs(pairs(&[("title", "lamp"), ("tags", "a"), ("tags", "b")]));
        let listing: Listing = from_entries(entries).unwrap();
        assert_eq!(listing.tags, ["a", "b"]);
        assert_eq!(listing.price, None);
    }

    #[test]
    fn test_scalar_takes_last_value() {
        let entries = group_pairs(pairs(&[("title", "lamp"), ("title", "desk"), ("price", "12")]));
        let listing: Listing = from_entries(entries).unwrap();
        assert_eq!(listing.title, "desk");
        assert_eq!(listing.price, Some(12));
    }

    #[test]
    fn test_unparsable_scalar() {
        let entries = group_pairs(pairs(&[("title", "lamp"), ("price", "cheap")]));
        let err = from_entries::<Listing, _>(entries).unwrap_err();
        assert!(err.to_string().contains("cheap"));
    }

    #[test]
    fn test_overlay_replaces_aliased_field() {
        let current = json!({"long-name": "before", "count": 3});
        let Value::Object(current) = current else { unreachable!() };
        let entries = group_pairs(pairs(&[("short", "after")]));
        let merged: Aliased = overlay_onto(&entries, &current).unwrap();
        assert_eq!(
            merged,
            Aliased {
                name: "after".into(),
                count: 3
            }
        );
    }

    #[test]
    fn test_overlay_reports_real_duplicates() {
        let current = Map::new();
        let entries = group_pairs(pairs(&[("short", "a"), ("long-name", "b"), ("count", "1")]));
        let err = overlay_onto::<Aliased>(&entries, &current).unwrap_err();
        assert!(matches!(err, DeError::DuplicateField("long-name")));
    }

    #[test]
    fn test_merge_json_descends() {
        let Value::Object(mut current) = json!({"a": {"b": 1, "c": 2}, "d": 3}) else {
            unreachable!()
        };
        let Value::Object(patch) = json!({"a": {"c": 0}, "d": null}) else {
            unreachable!()
        };
        merge_json(&mut current, patch);
        assert_eq!(Value::Object(current), json!({"a": {"b": 1, "c": 0}, "d": null}));
    }
}
