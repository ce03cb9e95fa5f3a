//! # Hermes Codec
//!
//! Wire formats and content negotiation for the Hermes pipeline.
//!
//! ## Codecs
//!
//! A [`Codec`] is a named wire format with symmetric encode and decode:
//!
//! | Codec | Media type | Decodes to |
//! |-------|------------|------------|
//! | [`JsonCodec`] | `application/json` | [`Document::Tree`] |
//! | [`FormCodec`] | `application/x-www-form-urlencoded` | [`Document::Pairs`] |
//!
//! Encoding always starts from a `serde_json::Value`; decoding produces a
//! [`Document`] that is turned into a typed value with
//! [`Document::into_typed`], or merged into an existing one with
//! [`Document::merge_into`].
//!
//! ## Negotiation
//!
//! A [`CodecStack`] holds one default codec and ordered alternates. Decoding
//! is strict, encoding is permissive:
//!
//! ```rust
//! use hermes_codec::{CodecStack, FormCodec, JsonCodec};
//!
//! let stack = CodecStack::builder(JsonCodec::new())
//!     .alternate(FormCodec::new())
//!     .build()
//!     .unwrap();
//!
//! // Content-Type must match a registered codec
//! let codec = stack.resolve_for_decode("application/x-www-form-urlencoded; charset=utf-8").unwrap();
//! assert_eq!(codec.media_type(), "application/x-www-form-urlencoded");
//! assert!(stack.resolve_for_decode("text/csv").is_err());
//!
//! // Accept falls back to the default codec
//! assert_eq!(stack.resolve_for_encode(Some("text/csv")).media_type(), "application/json");
//! ```
//!
//! ## Auxiliary Decoders
//!
//! A [`DecoderSet`] holds [`DecoderFactory`] values keyed by media type. They
//! decode data that does not travel in the body (query strings) and act as a
//! secondary namespace for body decoding.

#![doc(html_root_url = "https://docs.rs/hermes-codec/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod codec;
mod de;
mod document;
mod error;
mod factory;
mod form;
mod json;
pub mod media;
mod stack;

pub use codec::Codec;
pub use document::Document;
pub use error::{CodecError, StackError};
pub use factory::{CodecDecoding, Decoder, DecoderFactory, DecoderSet};
pub use form::FormCodec;
pub use json::JsonCodec;
pub use stack::{CodecStack, CodecStackBuilder};
