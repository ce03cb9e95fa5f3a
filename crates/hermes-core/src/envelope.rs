//! Error boxing and render values.
//!
//! Any error can be rendered: it is boxed into a caller-supplied
//! [`ErrorTemplate`] when the template accepts a message, and into the
//! built-in [`ErrorEnvelope`] otherwise.
//!
//! # Envelope Format
//!
//! The built-in envelope renders as:
//!
//! ```json
//! { "message": "Human-readable error message" }
//! ```

use crate::error::status_hint;
use http::StatusCode;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::error::Error;

/// A serializable shape that errors can be boxed into.
///
/// # Example
///
/// ```
/// use hermes_core::ErrorTemplate;
/// use http::StatusCode;
/// use serde::Serialize;
///
/// #[derive(Serialize, Default)]
/// struct ApiError {
///     error: String,
///     code: u16,
/// }
///
/// impl ErrorTemplate for ApiError {
///     fn set_message(&mut self, message: &str) -> bool {
///         self.error = message.to_string();
///         true
///     }
///
///     fn set_status(&mut self, status: StatusCode) {
///         self.code = status.as_u16();
///     }
/// }
/// ```
pub trait ErrorTemplate: Serialize {
    /// Stores the error message. Returns `false` if this shape has no
    /// message-bearing field, in which case the built-in envelope is used.
    fn set_message(&mut self, message: &str) -> bool;

    /// Stores the status the error renders with.
    fn set_status(&mut self, _status: StatusCode) {}
}

/// The built-in error envelope.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorEnvelope {
    /// User-facing error message.
    pub message: String,
}

impl ErrorEnvelope {
    /// Creates an envelope with the given message.
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl ErrorTemplate for ErrorEnvelope {
    fn set_message(&mut self, message: &str) -> bool {
        self.message = message.to_string();
        true
    }
}

// JSON objects take a "message" key; any other JSON value declines.
impl ErrorTemplate for Value {
    fn set_message(&mut self, message: &str) -> bool {
        match self {
            Value::Object(map) => {
                map.insert("message".to_string(), Value::String(message.to_string()));
                true
            }
            _ => false,
        }
    }
}

/// A value ready for the egress path.
#[derive(Debug, Clone, PartialEq)]
pub enum RenderValue {
    /// Application output, rendered with 200.
    Output(Value),
    /// A boxed error.
    Error {
        /// Status the error renders with.
        status: StatusCode,
        /// The serialized envelope.
        envelope: Value,
    },
}

impl RenderValue {
    /// Serializes an application output.
    pub fn output<O: Serialize + ?Sized>(value: &O) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Self::Output)
    }

    /// Boxes an error into `template`.
    ///
    /// The status is the error's hint, or `default_status` if it carries
    /// none. Boxing never fails: a template that declines the message or
    /// cannot be serialized is replaced by [`ErrorEnvelope`].
    pub fn boxed<T: ErrorTemplate>(
        mut template: T,
        error: &(dyn Error + 'static),
        default_status: StatusCode,
    ) -> Self {
        let status = status_hint(error).unwrap_or(default_status);
        let message = error.to_string();

        let envelope = if template.set_message(&message) {
            template.set_status(status);
            serde_json::to_value(&template).ok()
        } else {
            None
        };

        Self::Error {
            status,
            envelope: envelope.unwrap_or_else(|| serde_json::json!({ "message": message })),
        }
    }

    /// Returns the status this value renders with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Output(_) => StatusCode::OK,
            Self::Error { status, .. } => *status,
        }
    }

    /// Returns the value to encode.
    #[must_use]
    pub fn body(&self) -> &Value {
        match self {
            Self::Output(value) => value,
            Self::Error { envelope, .. } => envelope,
        }
    }

    /// Returns true for boxed errors.
    #[must_use]
    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error { .. })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{BoxError, ClientError, StatusError};
    use serde::ser::Error as _;
    use serde::Serializer;

    #[derive(Serialize, Default)]
    struct NoMessage {
        result: String,
    }

    impl ErrorTemplate for NoMessage {
        fn set_message(&mut self, _message: &str) -> bool {
            false
        }
    }

    #[derive(Serialize, Default)]
    struct Coded {
        error: String,
        code: u16,
    }

    impl ErrorTemplate for Coded {
        fn set_message(&mut self, message: &str) -> bool {
            self.error = message.to_string();
            true
        }

        fn set_status(&mut self, status: StatusCode) {
            self.code = status.as_u16();
        }
    }

    struct Unserializable;

    impl Serialize for Unserializable {
        fn serialize<S: Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
            Err(S::Error::custom("cannot serialize"))
        }
    }

    impl ErrorTemplate for Unserializable {
        fn set_message(&mut self, _message: &str) -> bool {
            true
        }
    }

    fn error(message: &str) -> BoxError {
        message.into()
    }

    #[test]
    fn test_output_renders_ok() {
        let value = RenderValue::output(&serde_json::json!({"result": "x"})).unwrap();
        assert_eq!(value.status(), StatusCode::OK);
        assert!(!value.is_error());
        assert_eq!(value.body()["result"], "x");
    }

    #[test]
    fn test_boxed_into_builtin_envelope() {
        let err = error("foo");
        let value = RenderValue::boxed(
            ErrorEnvelope::default(),
            err.as_ref(),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        assert_eq!(value.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(value.body(), &serde_json::json!({"message": "foo"}));
    }

    #[test]
    fn test_declining_template_falls_back() {
        let err = error("foo");
        let value = RenderValue::boxed(
            NoMessage::default(),
            err.as_ref(),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        assert_eq!(value.body(), &serde_json::json!({"message": "foo"}));
    }

    #[test]
    fn test_unserializable_template_falls_back() {
        let err = error("foo");
        let value = RenderValue::boxed(Unserializable, err.as_ref(), StatusCode::BAD_REQUEST);
        assert_eq!(value.status(), StatusCode::BAD_REQUEST);
        assert_eq!(value.body(), &serde_json::json!({"message": "foo"}));
    }

    #[test]
    fn test_custom_template_receives_status() {
        let err = StatusError::new(StatusCode::NOT_FOUND, "missing");
        let value = RenderValue::boxed(
            Coded::default(),
            &err,
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        assert_eq!(value.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            value.body(),
            &serde_json::json!({"error": "missing", "code": 404})
        );
    }

    #[test]
    fn test_client_error_overrides_default_status() {
        let err = ClientError::new("bad input");
        let value = RenderValue::boxed(
            ErrorEnvelope::default(),
            &err,
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        assert_eq!(value.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn test_json_object_template() {
        let err = error("boom");
        let template = serde_json::json!({"ok": false});
        let value = RenderValue::boxed(template, err.as_ref(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(
            value.body(),
            &serde_json::json!({"ok": false, "message": "boom"})
        );
    }

    #[test]
    fn test_json_scalar_template_declines() {
        let err = error("boom");
        let value = RenderValue::boxed(
            Value::Bool(true),
            err.as_ref(),
            StatusCode::INTERNAL_SERVER_ERROR,
        );
        assert_eq!(value.body(), &serde_json::json!({"message": "boom"}));
    }
}
