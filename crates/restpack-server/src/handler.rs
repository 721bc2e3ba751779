//! Type-erased request handlers.
//!
//! A [`Handler`] is any async function from [`ApiRequest`] to
//! [`HttpResponse`], boxed so handlers of different concrete types can share
//! one route table.
//!
//! # Example
//!
//! ```rust
//! use restpack_server::{handler_fn, Handler};
//! use restpack_extract::{write_json, ApiRequest};
//! use http::StatusCode;
//! use serde_json::json;
//!
//! let hello: Handler = handler_fn(|req: ApiRequest| async move {
//!     write_json(StatusCode::OK, &json!({"path": req.path()}))
//! });
//! ```

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use restpack_extract::{ApiRequest, HttpResponse};

/// A boxed, sendable future.
pub type BoxFuture<T> = Pin<Box<dyn Future<Output = T> + Send + 'static>>;

/// A type-erased handler function.
pub type Handler = Arc<dyn Fn(ApiRequest) -> BoxFuture<HttpResponse> + Send + Sync>;

/// Wraps an async function as a [`Handler`].
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
    F: Fn(ApiRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send + 'static,
{
    Arc::new(move |request: ApiRequest| -> BoxFuture<HttpResponse> { Box::pin(f(request)) })
}
