//! In-chain validation.

use crate::error::{IngressError, ValidationError};
use crate::input::Input;
use crate::transform::{Next, Transform};
use crate::validator::Validator;
use hermes_core::{Request, ResponseSink};
use std::sync::Arc;

/// Runs a [`Validator`] at a chosen point in the chain.
///
/// Unlike the controller's validator, which sees the input after every
/// step, this step sees the input as it stands at its position.
pub struct ValidateStep {
    validator: Arc<dyn Validator>,
}

impl ValidateStep {
    /// Step name.
    pub const NAME: &'static str = "validate";

    /// Wraps a validator.
    pub fn new(validator: impl Validator) -> Self {
        Self {
            validator: Arc::new(validator),
        }
    }
}

impl Transform for ValidateStep {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn transform(
        &self,
        input: &mut dyn Input,
        request: &Request,
        sink: &mut dyn ResponseSink,
        next: Next<'_>,
    ) -> Result<(), IngressError> {
        self.validator
            .validate(input)
            .map_err(ValidationError::new)?;
        next.run(input, request, sink)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validator::FnValidator;
    use bytes::Bytes;
    use hermes_core::ResponseRecorder;

    #[test]
    fn test_rejection_is_validation_error() {
        let step = ValidateStep::new(FnValidator::new(|_| Err("always wrong".into())));
        let request = http::Request::new(Bytes::new());
        let steps: Vec<crate::transform::BoxedTransform> = Vec::new();
        let mut input = serde_json::Value::Null;

        let err = step
            .transform(&mut input, &request, &mut ResponseRecorder::new(), Next::new(&steps))
            .unwrap_err();
        assert!(matches!(err, IngressError::Validation(_)));
        assert_eq!(err.to_string(), "always wrong");
    }
}
