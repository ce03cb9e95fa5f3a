//! The request controller.
//!
//! A [`Controller`] ties the ingress chain, an optional validator and the
//! egress together. Each request moves through
//!
//! ```text
//! Parsing → Validating → AwaitingRender → Rendered
//! ```
//!
//! Client-input failures in the first two states are rendered by the
//! controller itself as 400 responses. Otherwise the caller receives a
//! [`Responder`], runs the application logic and hands the result back.
//!
//! # Example
//!
//! ```
//! use bytes::Bytes;
//! use hermes_codec::JsonCodec;
//! use hermes_core::{ErrorEnvelope, ResponseRecorder};
//! use hermes_pipeline::Controller;
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Default, Serialize, Deserialize)]
//! #[serde(default)]
//! struct Greet {
//!     name: String,
//! }
//!
//! let controller = Controller::builder(JsonCodec::new()).build().unwrap();
//! let request = http::Request::post("/greet")
//!     .header("content-type", "application/json")
//!     .body(Bytes::from_static(br#"{"name":"ada"}"#))
//!     .unwrap();
//!
//! let mut sink = ResponseRecorder::new();
//! let mut input = Greet::default();
//! if let Some(responder) =
//!     controller.handle(&mut sink, &request, Some(&mut input), ErrorEnvelope::default())
//! {
//!     let greeting = format!("hello {}", input.name);
//!     responder.render(Ok::<_, hermes_core::BoxError>(serde_json::json!({ "greeting": greeting })));
//! }
//!
//! assert_eq!(sink.body_str(), Some(r#"{"greeting":"hello ada"}"#));
//! ```

use crate::egress::{accept_header, Egress, DEFAULT_CHARSET, DEFAULT_FALLBACK_BODY};
use crate::error::ValidationError;
use crate::ingress::{Ingress, IngressBuilder};
use crate::input::Input;
use crate::transform::{BoxedTransform, Transform};
use crate::validator::Validator;
use hermes_codec::{Codec, CodecStack, CodecStackBuilder, DecoderFactory, StackError};
use hermes_core::{BoxError, ClientError, ErrorTemplate, RenderValue, Request, ResponseSink};
use http::StatusCode;
use serde::Serialize;
use std::fmt;
use std::sync::Arc;

/// Drives a request through ingress, validation and egress.
pub struct Controller {
    ingress: Ingress,
    egress: Egress,
    validator: Option<Arc<dyn Validator>>,
}

impl Controller {
    /// Starts building a controller around a default codec.
    pub fn builder(default: impl Codec) -> ControllerBuilder {
        ControllerBuilder::new(Arc::new(default))
    }

    /// Returns the ingress chain.
    pub fn ingress(&self) -> &Ingress {
        &self.ingress
    }

    /// Returns the egress.
    pub fn egress(&self) -> &Egress {
        &self.egress
    }

    /// Parses and validates the request.
    ///
    /// On failure the error is boxed into `error_template`, rendered with
    /// status 400 and `None` is returned; the response is complete. On
    /// success the returned [`Responder`] renders the application result.
    pub fn handle<'a, E: ErrorTemplate>(
        &'a self,
        sink: &'a mut dyn ResponseSink,
        request: &'a Request,
        input: Option<&mut dyn Input>,
        error_template: E,
    ) -> Option<Responder<'a, E>> {
        let mut input = input;

        if let Err(error) = self.ingress.parse(request, &mut *sink, input.as_deref_mut()) {
            self.reject(sink, request, error_template, error);
            return None;
        }

        if let (Some(validator), Some(input)) = (&self.validator, input) {
            if let Err(error) = validator.validate(input) {
                self.reject(sink, request, error_template, ValidationError::new(error));
                return None;
            }
        }

        Some(Responder {
            controller: self,
            sink,
            request,
            template: error_template,
        })
    }

    fn reject<E: ErrorTemplate>(
        &self,
        sink: &mut dyn ResponseSink,
        request: &Request,
        template: E,
        error: impl Into<BoxError>,
    ) {
        let error = ClientError::new(error);
        tracing::warn!(
            method = %request.method(),
            path = request.uri().path(),
            error = %error,
            "rejecting request"
        );
        let value = RenderValue::boxed(template, &error, StatusCode::BAD_REQUEST);
        self.egress.must_render(accept_header(request), sink, &value);
    }
}

impl fmt::Debug for Controller {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Controller")
            .field("ingress", &self.ingress)
            .field("egress", &self.egress)
            .field("validator", &self.validator.is_some())
            .finish()
    }
}

/// Renders the application's result for one request.
///
/// Consumed by [`Responder::render`], so a request is rendered once.
#[must_use = "the response is not written until `render` is called"]
pub struct Responder<'a, E> {
    controller: &'a Controller,
    sink: &'a mut dyn ResponseSink,
    request: &'a Request,
    template: E,
}

impl<E: ErrorTemplate> Responder<'_, E> {
    /// Renders the result.
    ///
    /// An `Ok` value is rendered with 200. An `Err` is boxed into the error
    /// template and rendered with its status hint, or 500 without one.
    pub fn render<O, Er>(self, result: Result<O, Er>)
    where
        O: Serialize,
        Er: Into<BoxError>,
    {
        let Self {
            controller,
            sink,
            request,
            template,
        } = self;

        let value = match result {
            Ok(output) => match RenderValue::output(&output) {
                Ok(value) => value,
                Err(error) => {
                    tracing::error!(error = %error, "failed to serialize output");
                    RenderValue::boxed(template, &error, StatusCode::INTERNAL_SERVER_ERROR)
                }
            },
            Err(error) => {
                let error: BoxError = error.into();
                tracing::debug!(error = %error, "rendering application error");
                RenderValue::boxed(template, error.as_ref(), StatusCode::INTERNAL_SERVER_ERROR)
            }
        };

        controller
            .egress
            .must_render(accept_header(request), sink, &value);
    }
}

/// Builder for [`Controller`].
pub struct ControllerBuilder {
    codecs: CodecStackBuilder,
    ingress: IngressBuilder,
    validator: Option<Arc<dyn Validator>>,
    charset: String,
    fallback_body: String,
}

impl ControllerBuilder {
    /// Creates a builder around a shared default codec.
    pub fn new(default: Arc<dyn Codec>) -> Self {
        Self {
            codecs: CodecStackBuilder::new(default),
            ingress: IngressBuilder::new(),
            validator: None,
            charset: DEFAULT_CHARSET.to_string(),
            fallback_body: DEFAULT_FALLBACK_BODY.to_string(),
        }
    }

    /// Adds an alternate codec.
    pub fn alternate(mut self, codec: impl Codec) -> Self {
        self.codecs = self.codecs.alternate(codec);
        self
    }

    /// Adds a shared alternate codec.
    pub fn alternate_shared(mut self, codec: Arc<dyn Codec>) -> Self {
        self.codecs = self.codecs.alternate_shared(codec);
        self
    }

    /// Registers an auxiliary decoder factory for body decoding.
    pub fn decoder(mut self, factory: impl DecoderFactory) -> Self {
        self.ingress = self.ingress.decoder(factory);
        self
    }

    /// Registers a shared auxiliary decoder factory.
    pub fn decoder_shared(mut self, factory: Arc<dyn DecoderFactory>) -> Self {
        self.ingress = self.ingress.decoder_shared(factory);
        self
    }

    /// Appends an ingress step.
    pub fn step(mut self, step: impl Transform) -> Self {
        self.ingress = self.ingress.step(step);
        self
    }

    /// Appends a shared ingress step.
    pub fn step_shared(mut self, step: BoxedTransform) -> Self {
        self.ingress = self.ingress.step_shared(step);
        self
    }

    /// Places the body decode at this position in the chain.
    pub fn body_decode(mut self) -> Self {
        self.ingress = self.ingress.body_decode();
        self
    }

    /// Appends a query decode step bound to `factory`.
    pub fn query_decode(mut self, factory: impl DecoderFactory) -> Self {
        self.ingress = self.ingress.query_decode(factory);
        self
    }

    /// Sets the validator run after the chain.
    pub fn validator(mut self, validator: impl Validator) -> Self {
        self.validator = Some(Arc::new(validator));
        self
    }

    /// Sets a shared validator run after the chain.
    pub fn validator_shared(mut self, validator: Arc<dyn Validator>) -> Self {
        self.validator = Some(validator);
        self
    }

    /// Sets the body size limit.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.ingress = self.ingress.max_body_bytes(limit);
        self
    }

    /// Sets the charset advertised in `Content-Type`.
    pub fn charset(mut self, charset: impl Into<String>) -> Self {
        self.charset = charset.into();
        self
    }

    /// Sets the body of the fallback response.
    pub fn fallback_body(mut self, body: impl Into<String>) -> Self {
        self.fallback_body = body.into();
        self
    }

    /// Builds the controller.
    ///
    /// Fails if two codecs, or two decoder factories, share a media type.
    pub fn build(self) -> Result<Controller, StackError> {
        let codecs: Arc<CodecStack> = Arc::new(self.codecs.build()?);
        let ingress = self.ingress.build(Arc::clone(&codecs))?;
        let egress = Egress::new(codecs)
            .with_charset(self.charset)
            .with_fallback_body(self.fallback_body);

        tracing::debug!(
            media_types = ?egress.codecs().media_types().collect::<Vec<_>>(),
            steps = ?ingress.step_names().collect::<Vec<_>>(),
            validator = self.validator.is_some(),
            "controller built"
        );

        Ok(Controller {
            ingress,
            egress,
            validator: self.validator,
        })
    }
}
