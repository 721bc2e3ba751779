//! Radix tree path matcher for restpack.
//!
//! Maps `(method, path)` pairs to values of any type. The server crate binds
//! request handlers; tests bind plain strings.
//!
//! # Features
//!
//! - **Path Parameters**: named captures (`/products/{id}`)
//! - **Wildcards**: trailing catch-all captures (`/files/*path`)
//! - **Method Tables**: per-method bindings plus an optional catch-all
//! - **405 Support**: a path match with no method binding reports the
//!   allowed methods instead of "not found"
//!
//! # Example
//!
//! ```rust
//! use restpack_router::{Lookup, MethodRouter, Router};
//! use http::Method;
//!
//! let mut router = Router::new();
//! router
//!     .insert("/products", MethodRouter::new().on(Method::GET, "list").on(Method::POST, "create"))
//!     .unwrap();
//!
//! assert!(matches!(router.lookup(&Method::GET, "/products"), Lookup::Found(_)));
//! assert!(matches!(router.lookup(&Method::DELETE, "/products"), Lookup::MethodNotAllowed { .. }));
//! assert!(matches!(router.lookup(&Method::GET, "/orders"), Lookup::NotFound));
//! ```
//!
//! # Architecture
//!
//! ```text
//!                  (root)
//!                    │
//!               "products"
//!                    │
//!          ┌─────────┴─────────┐
//!       (leaf)               "{id}"
//!    [GET,POST]                │
//!                           (leaf)
//!                    [GET,PUT,DELETE]
//! ```

mod method_router;
mod node;
mod params;
mod router;

use http::Method;
use thiserror::Error;

pub use method_router::{Conflicts, MethodRouter};
pub use node::{Node, SegmentKind};
pub use params::{ParamError, Params};
pub use router::Router;

/// A matched route with its bound value and extracted parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteMatch<'a, T> {
    /// The value bound to the matched method.
    pub value: &'a T,
    /// Extracted path parameters.
    pub params: Params,
}

/// Outcome of resolving a request against a [`Router`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup<'a, T> {
    /// Path and method both matched.
    Found(RouteMatch<'a, T>),
    /// The path exists but `method` is not bound on it.
    MethodNotAllowed {
        /// Methods bound on the path, in registration order.
        allowed: Vec<Method>,
    },
    /// No registered path matches.
    NotFound,
}

/// Rejected route insertion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsertError {
    /// A `*name` segment appeared before the end of the path.
    #[error("wildcard segment must be last in '{0}'")]
    WildcardNotLast(String),

    /// The method table carried no bindings.
    #[error("route '{0}' has no method bindings")]
    NoMethods(String),
}
