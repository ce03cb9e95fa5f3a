//! Response sink abstraction.
//!
//! The pipeline never owns the response. It writes headers, the status and
//! the body through [`ResponseSink`], which the surrounding transport
//! implements.

use bytes::Bytes;
use http::{HeaderMap, StatusCode};
use std::io;

/// A writable HTTP response.
pub trait ResponseSink {
    /// Returns the response headers for modification.
    fn headers_mut(&mut self) -> &mut HeaderMap;

    /// Sets the response status.
    fn set_status(&mut self, status: StatusCode);

    /// Appends a chunk to the response body.
    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()>;
}

impl ResponseSink for http::Response<Vec<u8>> {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        http::Response::headers_mut(self)
    }

    fn set_status(&mut self, status: StatusCode) {
        *self.status_mut() = status;
    }

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.body_mut().extend_from_slice(chunk);
        Ok(())
    }
}

/// A [`ResponseSink`] that buffers everything written to it.
///
/// Useful for tests and for hosts that assemble the full response before
/// handing it to the transport.
///
/// # Example
///
/// ```
/// use hermes_core::{ResponseRecorder, ResponseSink};
/// use http::StatusCode;
///
/// let mut recorder = ResponseRecorder::new();
/// recorder.set_status(StatusCode::CREATED);
/// recorder.write_body(b"{}").unwrap();
///
/// assert_eq!(recorder.status(), StatusCode::CREATED);
/// assert_eq!(recorder.body_str(), Some("{}"));
/// ```
#[derive(Debug, Clone, Default)]
pub struct ResponseRecorder {
    status: Option<StatusCode>,
    headers: HeaderMap,
    body: Vec<u8>,
}

impl ResponseRecorder {
    /// Creates an empty recorder.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the recorded status, 200 if none was set.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status.unwrap_or(StatusCode::OK)
    }

    /// Returns the recorded headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value as a string.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Returns the recorded body bytes.
    #[must_use]
    pub fn body(&self) -> &[u8] {
        &self.body
    }

    /// Returns the recorded body as UTF-8, if it is valid UTF-8.
    #[must_use]
    pub fn body_str(&self) -> Option<&str> {
        std::str::from_utf8(&self.body).ok()
    }

    /// Converts the recording into an `http::Response`.
    #[must_use]
    pub fn into_response(self) -> http::Response<Bytes> {
        let mut response = http::Response::new(Bytes::from(self.body));
        *response.status_mut() = self.status.unwrap_or(StatusCode::OK);
        *response.headers_mut() = self.headers;
        response
    }
}

impl ResponseSink for ResponseRecorder {
    fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    fn set_status(&mut self, status: StatusCode) {
        self.status = Some(status);
    }

    fn write_body(&mut self, chunk: &[u8]) -> io::Result<()> {
        self.body.extend_from_slice(chunk);
        Ok(())
    }
}
