//! Error values carrying status-code hints.
//!
//! Application code and pipeline stages hand errors around as [`BoxError`].
//! Two wrapper types attach an HTTP status to an error without changing its
//! message: [`ClientError`] marks an error as fixable by the caller (400) and
//! [`StatusError`] carries an explicit status. [`status_hint`] recovers the
//! hint from anywhere in an error's source chain.

use http::StatusCode;
use std::error::Error;
use std::fmt;

/// Type-erased error used at every pipeline seam.
pub type BoxError = Box<dyn Error + Send + Sync + 'static>;

/// An error the client can fix by changing its request.
///
/// Renders with status 400. The message is the wrapped error's message,
/// unchanged.
///
/// # Example
///
/// ```
/// use hermes_core::{status_hint, ClientError};
/// use http::StatusCode;
///
/// let err = ClientError::new("position is required");
/// assert_eq!(err.to_string(), "position is required");
/// assert_eq!(status_hint(&err), Some(StatusCode::BAD_REQUEST));
/// ```
#[derive(Debug)]
pub struct ClientError {
    inner: BoxError,
}

impl ClientError {
    /// Wraps an error as client-fixable.
    pub fn new(error: impl Into<BoxError>) -> Self {
        Self {
            inner: error.into(),
        }
    }

    /// Returns the wrapped error.
    #[must_use]
    pub fn get_ref(&self) -> &(dyn Error + Send + Sync + 'static) {
        self.inner.as_ref()
    }

    /// Consumes the wrapper and returns the wrapped error.
    #[must_use]
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Display for ClientError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for ClientError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

/// An error with an explicit response status.
///
/// # Example
///
/// ```
/// use hermes_core::{status_hint, StatusError};
/// use http::StatusCode;
///
/// let err = StatusError::new(StatusCode::NOT_FOUND, "no such user");
/// assert_eq!(err.status(), StatusCode::NOT_FOUND);
/// assert_eq!(status_hint(&err), Some(StatusCode::NOT_FOUND));
/// ```
#[derive(Debug)]
pub struct StatusError {
    status: StatusCode,
    inner: BoxError,
}

impl StatusError {
    /// Wraps an error with the given status.
    pub fn new(status: StatusCode, error: impl Into<BoxError>) -> Self {
        Self {
            status,
            inner: error.into(),
        }
    }

    /// Returns the status this error renders with.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Consumes the wrapper and returns the wrapped error.
    #[must_use]
    pub fn into_inner(self) -> BoxError {
        self.inner
    }
}

impl fmt::Display for StatusError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.inner, f)
    }
}

impl Error for StatusError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        Some(self.inner.as_ref())
    }
}

/// Returns the status hint attached to `error` or to any error in its
/// source chain. The outermost hint wins.
pub fn status_hint(error: &(dyn Error + 'static)) -> Option<StatusCode> {
    let mut current = Some(error);
    while let Some(err) = current {
        if err.is::<ClientError>() {
            return Some(StatusCode::BAD_REQUEST);
        }
        if let Some(status_error) = err.downcast_ref::<StatusError>() {
            return Some(status_error.status());
        }
        current = err.source();
    }
    None
}
