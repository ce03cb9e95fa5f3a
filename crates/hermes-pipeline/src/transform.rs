//! The transform step trait and chain continuation.
//!
//! Every ingress step implements [`Transform`]. A step receives the input,
//! the request, the response sink and a [`Next`] handle for the rest of the
//! chain. It may work before and after calling [`Next::run`], or return an
//! error without calling it to stop the chain.
//!
//! # Example
//!
//! ```
//! use hermes_core::{Request, ResponseSink};
//! use hermes_pipeline::{IngressError, Input, Next, Transform};
//!
//! struct RequireJson;
//!
//! impl Transform for RequireJson {
//!     fn name(&self) -> &'static str {
//!         "require_json"
//!     }
//!
//!     fn transform(
//!         &self,
//!         input: &mut dyn Input,
//!         request: &Request,
//!         sink: &mut dyn ResponseSink,
//!         next: Next<'_>,
//!     ) -> Result<(), IngressError> {
//!         if request.method() == http::Method::POST
//!             && !request.headers().contains_key(http::header::CONTENT_TYPE)
//!         {
//!             return Err(IngressError::step(self.name(), "content type required"));
//!         }
//!         next.run(input, request, sink)
//!     }
//! }
//! ```

use crate::error::IngressError;
use crate::input::Input;
use hermes_core::{Request, ResponseSink};
use std::sync::Arc;

/// A type-erased step that can be stored in a chain.
pub type BoxedTransform = Arc<dyn Transform>;

/// One unit of request-to-input transformation.
///
/// # Invariants
///
/// - A step MUST call `next.run()` at most once
/// - A step that fails MUST NOT call `next.run()`
pub trait Transform: Send + Sync + 'static {
    /// Returns the step name used in logs.
    fn name(&self) -> &'static str;

    /// Processes the request and continues the chain.
    fn transform(
        &self,
        input: &mut dyn Input,
        request: &Request,
        sink: &mut dyn ResponseSink,
        next: Next<'_>,
    ) -> Result<(), IngressError>;
}

/// The remainder of the chain after the current step.
///
/// Consumed by [`Next::run`], so the rest of the chain runs at most once.
pub struct Next<'a> {
    steps: &'a [BoxedTransform],
}

impl<'a> Next<'a> {
    pub(crate) fn new(steps: &'a [BoxedTransform]) -> Self {
        Self { steps }
    }

    /// Runs the remaining steps.
    pub fn run(
        self,
        input: &mut dyn Input,
        request: &Request,
        sink: &mut dyn ResponseSink,
    ) -> Result<(), IngressError> {
        let Some((step, rest)) = self.steps.split_first() else {
            return Ok(());
        };
        tracing::debug!(step = step.name(), "running ingress step");
        step.transform(input, request, sink, Next::new(rest))
    }

    /// Returns the number of steps left to run.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

/// A step built from a closure.
///
/// ```
/// use hermes_pipeline::FnTransform;
///
/// let step = FnTransform::new("noop", |input, request, sink, next| {
///     next.run(input, request, sink)
/// });
/// ```
pub struct FnTransform<F> {
    name: &'static str,
    func: F,
}

impl<F> FnTransform<F>
where
    F: Fn(&mut dyn Input, &Request, &mut dyn ResponseSink, Next<'_>) -> Result<(), IngressError>
        + Send
        + Sync
        + 'static,
{
    /// Creates a named step from a closure.
    pub const fn new(name: &'static str, func: F) -> Self {
        Self { name, func }
    }
}

impl<F> Transform for FnTransform<F>
where
    F: Fn(&mut dyn Input, &Request, &mut dyn ResponseSink, Next<'_>) -> Result<(), IngressError>
        + Send
        + Sync
        + 'static,
{
    fn name(&self) -> &'static str {
        self.name
    }

    fn transform(
        &self,
        input: &mut dyn Input,
        request: &Request,
        sink: &mut dyn ResponseSink,
        next: Next<'_>,
    ) -> Result<(), IngressError> {
        (self.func)(input, request, sink, next)
    }
}
