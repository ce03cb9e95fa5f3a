//! Type-erased request inputs.
//!
//! Ingress steps see the caller's input as `&mut dyn Input`. Any type that
//! is `Serialize + DeserializeOwned` is an input through the blanket
//! implementation.
//!
//! # Merging
//!
//! Decoding into an existing input merges instead of replacing: each field
//! a document carries overwrites the input's field, and the rest are kept.
//! Presence decides, so a later step can reset a field to `""`, `0` or
//! `false`. See [`Document::merge_into`].
//!
use hermes_codec::{CodecError, Document};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::any::Any;

/// A mutable value filled in by the ingress chain.
pub trait Input: Send + 'static {
    /// Merges a decoded document into this value.
    fn merge(&mut self, document: Document) -> Result<(), CodecError>;

    /// Returns `self` as `Any` for downcasting.
    fn as_any(&self) -> &dyn Any;

    /// Returns `self` as mutable `Any` for downcasting.
    fn as_any_mut(&mut self) -> &mut dyn Any;

    /// Returns the concrete type's name.
    fn type_name(&self) -> &'static str;
}

impl<T> Input for T
where
    T: Serialize + DeserializeOwned + Send + 'static,
{
    fn merge(&mut self, document: Document) -> Result<(), CodecError> {
        document.merge_into(self)
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn as_any_mut(&mut self) -> &mut dyn Any {
        self
    }

    fn type_name(&self) -> &'static str {
        std::any::type_name::<T>()
    }
}

impl dyn Input {
    /// Returns the input as `T` if it is one.
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.as_any().downcast_ref()
    }

    /// Returns the input as mutable `T` if it is one.
    pub fn downcast_mut<T: 'static>(&mut self) -> Option<&mut T> {
        self.as_any_mut().downcast_mut()
    }
}
