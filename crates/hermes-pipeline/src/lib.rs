//! # Hermes Pipeline
//!
//! Request/response transformation for the Hermes framework.
//!
//! ## Flow
//!
//! ```text
//! Request → [Ingress: step → step → body_decode] → Validator → Application
//!                                                                  ↓
//! Response ←──────────────── [Egress: negotiate → encode → write] ←┘
//! ```
//!
//! - [`Ingress`] runs an ordered chain of [`Transform`] steps that fill a
//!   caller-supplied [`Input`].
//! - [`Egress`] renders outputs and boxed errors through one negotiated
//!   encode path and always produces a response.
//! - [`Controller`] combines both with an optional [`Validator`] and renders
//!   client-input failures as 400 responses on its own.
//!
//! ## Built-in Steps
//!
//! | Step | Purpose |
//! |------|---------|
//! | [`BodyDecode`] | Body via the codec stack, then the decoder set |
//! | [`QueryDecode`] | Query string via a form decoder factory |
//! | [`ValidateStep`] | Validator inside the chain |
//! | [`FnTransform`] | Any closure |

#![doc(html_root_url = "https://docs.rs/hermes-pipeline/0.1.0")]
#![warn(missing_docs)]
#![forbid(unsafe_code)]

pub mod controller;
pub mod egress;
mod error;
pub mod ingress;
mod input;
pub mod steps;
pub mod transform;
mod validator;

pub use controller::{Controller, ControllerBuilder, Responder};
pub use egress::{accept_header, Egress};
pub use error::{EgressError, IngressError, ValidationError};
pub use ingress::{Ingress, IngressBuilder};
pub use input::Input;
pub use steps::{BodyDecode, QueryDecode, ValidateStep};
pub use transform::{BoxedTransform, FnTransform, Next, Transform};
pub use validator::{FnValidator, TypedValidator, Validator};
