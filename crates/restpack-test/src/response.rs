//! Buffered response with assertion helpers.

use std::fmt;

use bytes::Bytes;
use http::{header, HeaderMap, StatusCode};
use http_body_util::BodyExt;
use serde::de::DeserializeOwned;

use crate::error::TestError;

/// A fully read response.
#[derive(Debug, Clone)]
pub struct TestResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl TestResponse {
    /// Reads `response` to the end.
    pub async fn from_http<B>(response: http::Response<B>) -> Result<Self, TestError>
    where
        B: BodyExt,
        B::Error: fmt::Display,
    {
        let (parts, body) = response.into_parts();
        let body = body
            .collect()
            .await
            .map_err(|e| TestError::BodyRead(e.to_string()))?
            .to_bytes();

        Ok(Self {
            status: parts.status,
            headers: parts.headers,
            body,
        })
    }

    /// Status code.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        self.status
    }

    /// Status code as a number.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// All headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// A header value, if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// The `Content-Type` header.
    #[must_use]
    pub fn content_type(&self) -> Option<&str> {
        self.header(header::CONTENT_TYPE.as_str())
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Body as UTF-8 text.
    pub fn text(&self) -> Result<String, TestError> {
        String::from_utf8(self.body.to_vec())
            .map_err(|e| TestError::BodyRead(format!("invalid UTF-8: {e}")))
    }

    /// Body decoded as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, TestError> {
        Ok(serde_json::from_slice(&self.body)?)
    }

    /// Body decoded as an untyped JSON value.
    pub fn json_value(&self) -> Result<serde_json::Value, TestError> {
        self.json()
    }

    /// Asserts the status code.
    ///
    /// # Panics
    ///
    /// Panics if the status differs; the message includes the body.
    pub fn assert_status(&self, expected: StatusCode) -> &Self {
        assert_eq!(
            self.status,
            expected,
            "expected status {expected}, got {} with body {}",
            self.status,
            String::from_utf8_lossy(&self.body)
        );
        self
    }

    /// Asserts a header value.
    ///
    /// # Panics
    ///
    /// Panics if the header is missing or differs.
    pub fn assert_header(&self, name: &str, expected: &str) -> &Self {
        match self.header(name) {
            Some(actual) => assert_eq!(actual, expected, "header {name} mismatch"),
            None => panic!("header {name} missing"),
        }
        self
    }

    /// Asserts the JSON body equals `expected`.
    ///
    /// # Panics
    ///
    /// Panics if the body is not JSON or differs.
    pub fn assert_json(&self, expected: &serde_json::Value) -> &Self {
        match self.json_value() {
            Ok(actual) => assert_eq!(&actual, expected),
            Err(e) => panic!("body is not JSON ({e}): {}", String::from_utf8_lossy(&self.body)),
        }
        self
    }
}
