//! # Hermes Core
//!
//! Core types shared by every Hermes crate.
//!
//! This crate defines the boundary between the pipeline and its surroundings:
//!
//! - [`Request`] - The request representation the pipeline reads from
//! - [`ResponseSink`] - The writable response the pipeline renders onto
//! - [`ResponseRecorder`] - A buffering [`ResponseSink`] for tests and hosts
//! - [`ClientError`] / [`StatusError`] - Status hints carried by error values
//! - [`ErrorTemplate`] / [`ErrorEnvelope`] - Boxing of arbitrary errors into a
//!   renderable, message-bearing envelope
//! - [`RenderValue`] - The value handed to the egress path

#![doc(html_root_url = "https://docs.rs/hermes-core/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

mod envelope;
mod error;
mod sink;

pub use envelope::{ErrorEnvelope, ErrorTemplate, RenderValue};
pub use error::{status_hint, BoxError, ClientError, StatusError};
pub use sink::{ResponseRecorder, ResponseSink};

/// The HTTP request type read by the pipeline.
///
/// This is a standard `http::Request` whose body has already been collected
/// by the transport.
pub type Request = http::Request<bytes::Bytes>;
