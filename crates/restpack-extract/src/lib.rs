//! Request accessors and response writers for restpack handlers.
//!
//! Handlers receive an [`ApiRequest`] (buffered body plus captured path
//! parameters) and answer with an [`HttpResponse`]. The helpers here cover
//! the common cases:
//!
//! - [`ApiRequest::json`] / [`parse_json`]: decode the body, failing with
//!   [`ParseError::MissingBody`] or [`ParseError::InvalidJson`]
//! - [`Validate`]: per-field payload checks collected in
//!   [`ValidationErrors`]
//! - [`write_json`], [`write_error_json`] and the status shortcuts in
//!   [`response`]
//! - [`Pagination`]: `pagesize` / `pagenumber` query parameters
//!
//! # Example
//!
//! ```rust
//! use restpack_extract::{bad_request, write_json, ApiRequest, HttpResponse};
//! use http::StatusCode;
//! use serde::Deserialize;
//! use serde_json::json;
//!
//! #[derive(Deserialize)]
//! struct Greeting {
//!     name: String,
//! }
//!
//! fn greet(request: &ApiRequest) -> HttpResponse {
//!     match request.json::<Greeting>() {
//!         Ok(greeting) => write_json(StatusCode::OK, &json!({"hello": greeting.name})),
//!         Err(_) => bad_request("", None),
//!     }
//! }
//! ```

mod json;
mod query;
mod request;
pub mod response;
mod validate;

pub use json::{parse_json, ParseError};
pub use query::{parse_query, Pagination, QueryError, DEFAULT_PAGE_SIZE};
pub use request::ApiRequest;
pub use response::{
    bad_request, internal_server_error, method_not_allowed, not_found, write_error_json,
    write_json, HttpResponse, ResponseBody,
};
pub use restpack_router::{ParamError, Params};
pub use validate::{Validate, ValidationErrors};
