//! # Hermes
//!
//! **Negotiated request/response transformation for HTTP handlers**
//!
//! Hermes sits between a transport that has already collected a request and
//! the application logic that works on typed values:
//!
//! - **Codec negotiation** - `Content-Type` picks the decoder, `Accept`
//!   picks the encoder, with one default codec as the fallback
//! - **Ordered ingress** - Query, body and custom steps fill one typed input
//!   in a fixed, observable order
//! - **Uniform errors** - Any error is boxed into a message-bearing envelope
//!   and rendered with a status code
//! - **Always a response** - Encoding failures end in a plain-text fallback
//!
//! ## Quick Start
//!
//! ```rust
//! use bytes::Bytes;
//! use hermes::prelude::*;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Search {
//!     term: String,
//! }
//!
//! let controller = controller_from_config(&HermesConfig::default(), None).unwrap();
//!
//! let request = http::Request::get("/search?term=owls").body(Bytes::new()).unwrap();
//! let mut sink = ResponseRecorder::new();
//! let mut search = Search::default();
//!
//! if let Some(responder) =
//!     controller.handle(&mut sink, &request, Some(&mut search), ErrorEnvelope::default())
//! {
//!     responder.render(Ok::<_, BoxError>(vec![search.term]));
//! }
//!
//! assert_eq!(sink.body_str(), Some(r#"["owls"]"#));
//! ```
//!
//! ## Architecture
//!
//! ```text
//! Request → [query_decode → body_decode → custom steps] → Validator → Application
//!                                                                         ↓
//! Response ←──────────────────────── [negotiate → encode → write] ←──────┘
//! ```

#![doc(html_root_url = "https://docs.rs/hermes/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod assembly;
mod error;

// Re-export core types
pub use hermes_core as core;

// Re-export codec types
pub use hermes_codec as codec;

// Re-export pipeline types
pub use hermes_pipeline as pipeline;

// Re-export configuration types
pub use hermes_config as config;

// Re-export telemetry types
pub use hermes_telemetry as telemetry;

pub use assembly::{controller_builder_from_config, controller_from_config, init_logging};
pub use error::BuildError;
pub use hermes_config::{ConfigLoader, HermesConfig};

/// Prelude module for convenient imports.
///
/// # Example
///
/// ```rust
/// use hermes::prelude::*;
///
/// let controller = Controller::builder(JsonCodec::new()).build().unwrap();
/// # let _ = controller;
/// ```
pub mod prelude {
    pub use hermes_core::{
        BoxError, ClientError, ErrorEnvelope, ErrorTemplate, Request, ResponseRecorder,
        ResponseSink, StatusError,
    };

    // Codecs and decoder factories
    pub use hermes_codec::{Codec, CodecDecoding, CodecStack, FormCodec, JsonCodec};

    // Pipeline
    pub use hermes_pipeline::{
        Controller, ControllerBuilder, FnTransform, FnValidator, IngressError, Input, Next,
        Responder, Transform, TypedValidator, Validator,
    };

    // Configuration
    pub use hermes_config::{ConfigLoader, HermesConfig, QueryPlacement};

    pub use crate::{controller_builder_from_config, controller_from_config, BuildError};
}
