//! The request value handed to handlers.

use bytes::Bytes;
use http::{HeaderMap, Method, Uri};
use restpack_router::{ParamError, Params};
use serde::de::DeserializeOwned;

use crate::json::{parse_json, ParseError};
use crate::query::{parse_query, Pagination, QueryError};

/// A fully buffered request plus the path parameters captured by routing.
///
/// # Example
///
/// ```rust
/// use restpack_extract::ApiRequest;
/// use bytes::Bytes;
/// use http::{HeaderMap, Method};
/// use restpack_router::Params;
///
/// let mut params = Params::new();
/// params.push("id", "42");
///
/// let request = ApiRequest::new(
///     Method::GET,
///     "/products/42?verbose=true".parse().unwrap(),
///     HeaderMap::new(),
///     Bytes::new(),
/// )
/// .with_params(params);
///
/// assert_eq!(request.path(), "/products/42");
/// assert_eq!(request.param_as::<i64>("id"), Ok(42));
/// assert_eq!(request.query_string(), Some("verbose=true"));
/// ```
#[derive(Debug, Clone)]
pub struct ApiRequest {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    params: Params,
    body: Bytes,
}

impl ApiRequest {
    /// Creates a request with no captured parameters.
    #[must_use]
    pub fn new(method: Method, uri: Uri, headers: HeaderMap, body: Bytes) -> Self {
        Self {
            method,
            uri,
            headers,
            params: Params::new(),
            body,
        }
    }

    /// Builds a request from `http` parts and a collected body.
    #[must_use]
    pub fn from_parts(parts: http::request::Parts, body: Bytes) -> Self {
        Self::new(parts.method, parts.uri, parts.headers, body)
    }

    /// Attaches captured path parameters.
    #[must_use]
    pub fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    /// Request method.
    #[must_use]
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Full request URI.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Path component of the URI.
    #[must_use]
    pub fn path(&self) -> &str {
        self.uri.path()
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Returns a header value if present and valid UTF-8.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|v| v.to_str().ok())
    }

    /// Captured path parameters.
    #[must_use]
    pub fn params(&self) -> &Params {
        &self.params
    }

    /// Raw text of the path parameter `name`.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name)
    }

    /// Parses the path parameter `name`.
    pub fn param_as<T: std::str::FromStr>(&self, name: &str) -> Result<T, ParamError> {
        self.params.parse(name)
    }

    /// Raw query string, without the `?`.
    #[must_use]
    pub fn query_string(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Decodes the query string into `T`. A missing query decodes as empty.
    pub fn query<T: DeserializeOwned>(&self) -> Result<T, QueryError> {
        parse_query(self.query_string().unwrap_or_default())
    }

    /// Reads `pagesize` and `pagenumber` from the query string.
    #[must_use]
    pub fn pagination(&self) -> Pagination {
        Pagination::from_query(self.query_string())
    }

    /// Raw body bytes.
    #[must_use]
    pub fn body(&self) -> &Bytes {
        &self.body
    }

    /// Decodes the body as JSON.
    pub fn json<T: DeserializeOwned>(&self) -> Result<T, ParseError> {
        parse_json(&self.body)
    }
}
