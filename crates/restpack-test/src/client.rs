//! In-memory client that dispatches straight into a route table.

use std::sync::Arc;

use bytes::Bytes;
use http::header::{HeaderName, HeaderValue, CONTENT_TYPE};
use http::{HeaderMap, Method, Uri};
use restpack_extract::ApiRequest;
use restpack_server::{ApiServer, RouteTable};
use serde::Serialize;

use crate::error::TestError;
use crate::response::TestResponse;

/// Sends requests through a [`RouteTable`] without binding a socket.
///
/// Dispatch is the same the server performs for every accepted request, so
/// prefix scoping, 404 and 405 behave identically.
///
/// # Example
///
/// ```rust,ignore
/// use restpack_test::TestClient;
///
/// let client = TestClient::from_server(&server);
/// let response = client.get("/api/v1/products/1").send().await;
/// response.assert_status(http::StatusCode::OK);
/// ```
#[derive(Debug, Clone)]
#[must_use]
pub struct TestClient {
    routes: Arc<RouteTable>,
    default_headers: Vec<(String, String)>,
}

impl TestClient {
    /// Wraps a route table.
    pub fn new(routes: RouteTable) -> Self {
        Self {
            routes: Arc::new(routes),
            default_headers: Vec::new(),
        }
    }

    /// Snapshots the routes registered on `server` so far.
    pub fn from_server(server: &ApiServer) -> Self {
        Self::new(server.routes().clone())
    }

    /// Adds a header sent with every request.
    pub fn with_default_header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.push((name.into(), value.into()));
        self
    }

    /// GET request builder.
    pub fn get(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::GET, uri)
    }

    /// POST request builder.
    pub fn post(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::POST, uri)
    }

    /// PUT request builder.
    pub fn put(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::PUT, uri)
    }

    /// PATCH request builder.
    pub fn patch(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::PATCH, uri)
    }

    /// DELETE request builder.
    pub fn delete(&self, uri: &str) -> TestRequest<'_> {
        self.request(Method::DELETE, uri)
    }

    /// Request builder for any method.
    pub fn request(&self, method: Method, uri: &str) -> TestRequest<'_> {
        let mut request = TestRequest {
            client: self,
            method,
            uri: uri.to_string(),
            headers: Vec::new(),
            body: Bytes::new(),
            error: None,
        };
        for (name, value) in &self.default_headers {
            request = request.header(name, value);
        }
        request
    }
}

/// A request bound to a [`TestClient`].
#[must_use]
pub struct TestRequest<'a> {
    client: &'a TestClient,
    method: Method,
    uri: String,
    headers: Vec<(String, String)>,
    body: Bytes,
    error: Option<TestError>,
}

impl TestRequest<'_> {
    /// Sets a header.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Sets the raw body.
    pub fn body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    /// Serializes `value` as the JSON body and sets `Content-Type`.
    pub fn json<T: Serialize + ?Sized>(mut self, value: &T) -> Self {
        match serde_json::to_vec(value) {
            Ok(body) => {
                self.body = Bytes::from(body);
                self.header(CONTENT_TYPE.as_str(), "application/json")
            }
            Err(e) => {
                self.error = Some(TestError::Json(e));
                self
            }
        }
    }

    /// Dispatches the request.
    ///
    /// # Panics
    ///
    /// Panics if the request cannot be built. Use
    /// [`try_send`](Self::try_send) to handle that case.
    pub async fn send(self) -> TestResponse {
        match self.try_send().await {
            Ok(response) => response,
            Err(e) => panic!("test request failed: {e}"),
        }
    }

    /// Dispatches the request, reporting build errors.
    pub async fn try_send(self) -> Result<TestResponse, TestError> {
        if let Some(e) = self.error {
            return Err(e);
        }

        let uri: Uri = self
            .uri
            .parse()
            .map_err(|e| TestError::RequestBuild(format!("invalid URI '{}': {e}", self.uri)))?;

        let mut headers = HeaderMap::new();
        for (name, value) in &self.headers {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|e| TestError::RequestBuild(format!("invalid header name '{name}': {e}")))?;
            let value = HeaderValue::from_str(value)
                .map_err(|e| TestError::RequestBuild(format!("invalid header value '{value}': {e}")))?;
            headers.insert(name, value);
        }

        let request = ApiRequest::new(self.method, uri, headers, self.body);
        let response = self.client.routes.dispatch(request).await;
        TestResponse::from_http(response).await
    }
}
