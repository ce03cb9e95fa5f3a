//! The ingress transform chain.
//!
//! An [`Ingress`] is an ordered, immutable list of [`Transform`] steps that
//! fill a request input. The body decode is itself a step: if it is not
//! registered explicitly with [`IngressBuilder::body_decode`] it is appended
//! after every other step.
//!
//! Steps run in registration order on the same input, so a later step
//! overwrites fields set by an earlier one:
//!
//! ```text
//! query_decode → body_decode     body wins
//! body_decode → query_decode     query wins
//! ```

use crate::error::IngressError;
use crate::input::Input;
use crate::steps::{BodyDecode, QueryDecode, ValidateStep, DEFAULT_MAX_BODY_BYTES};
use crate::transform::{BoxedTransform, Next, Transform};
use crate::validator::Validator;
use hermes_codec::{CodecStack, DecoderFactory, DecoderSet, StackError};
use hermes_core::{Request, ResponseSink};
use std::fmt;
use std::sync::Arc;

/// An immutable chain of ingress steps.
pub struct Ingress {
    steps: Vec<BoxedTransform>,
    decoders: DecoderSet,
}

impl Ingress {
    /// Creates a new builder.
    #[must_use]
    pub fn builder() -> IngressBuilder {
        IngressBuilder::new()
    }

    /// Runs the chain against `input`.
    ///
    /// With no input there is nothing to fill and the call succeeds without
    /// running any step.
    pub fn parse(
        &self,
        request: &Request,
        sink: &mut dyn ResponseSink,
        input: Option<&mut dyn Input>,
    ) -> Result<(), IngressError> {
        let Some(input) = input else {
            return Ok(());
        };
        Next::new(&self.steps).run(input, request, sink)
    }

    /// Returns the step names in execution order.
    pub fn step_names(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.steps.iter().map(|step| step.name())
    }

    /// Returns the auxiliary decoder set.
    pub fn decoders(&self) -> &DecoderSet {
        &self.decoders
    }
}

impl fmt::Debug for Ingress {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Ingress")
            .field("steps", &self.step_names().collect::<Vec<_>>())
            .field("decoders", &self.decoders)
            .finish()
    }
}

enum Slot {
    Body,
    Step(BoxedTransform),
}

/// Builder for [`Ingress`].
pub struct IngressBuilder {
    slots: Vec<Slot>,
    factories: Vec<Arc<dyn DecoderFactory>>,
    max_body_bytes: usize,
}

impl IngressBuilder {
    /// Creates an empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self {
            slots: Vec::new(),
            factories: Vec::new(),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Appends a step.
    pub fn step(self, step: impl Transform) -> Self {
        self.step_shared(Arc::new(step))
    }

    /// Appends a shared step.
    pub fn step_shared(mut self, step: BoxedTransform) -> Self {
        self.slots.push(Slot::Step(step));
        self
    }

    /// Places the body decode at this position.
    ///
    /// Calling it again moves the body decode to the new position.
    pub fn body_decode(mut self) -> Self {
        self.slots.retain(|slot| !matches!(slot, Slot::Body));
        self.slots.push(Slot::Body);
        self
    }

    /// Appends a query decode step bound to `factory`.
    pub fn query_decode(self, factory: impl DecoderFactory) -> Self {
        self.step(QueryDecode::new(factory))
    }

    /// Appends a validation step.
    pub fn validate(self, validator: impl Validator) -> Self {
        self.step(ValidateStep::new(validator))
    }

    /// Registers an auxiliary decoder factory for body decoding.
    pub fn decoder(self, factory: impl DecoderFactory) -> Self {
        self.decoder_shared(Arc::new(factory))
    }

    /// Registers a shared auxiliary decoder factory.
    pub fn decoder_shared(mut self, factory: Arc<dyn DecoderFactory>) -> Self {
        self.factories.push(factory);
        self
    }

    /// Sets the body size limit.
    pub fn max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Builds the chain over `codecs`.
    ///
    /// Fails if two decoder factories share a media type.
    pub fn build(self, codecs: Arc<CodecStack>) -> Result<Ingress, StackError> {
        let mut decoders = DecoderSet::new();
        for factory in self.factories {
            decoders.insert(factory)?;
        }

        let mut slots = self.slots;
        if !slots.iter().any(|slot| matches!(slot, Slot::Body)) {
            slots.push(Slot::Body);
        }

        let body: BoxedTransform = Arc::new(
            BodyDecode::new(codecs, decoders.clone()).with_max_body_bytes(self.max_body_bytes),
        );
        let steps = slots
            .into_iter()
            .map(|slot| match slot {
                Slot::Body => Arc::clone(&body),
                Slot::Step(step) => step,
            })
            .collect();

        Ok(Ingress { steps, decoders })
    }
}

impl Default for IngressBuilder {
    fn default() -> Self {
        Self::new()
    }
}
