//! The route table.
//!
//! [`RouteTable`] binds paths to [`Handler`]s through the radix router,
//! applying the server's mount prefix to every path, and dispatches
//! requests to the bound handler.
//!
//! | Request | Response |
//! |---------|----------|
//! | path and method match | handler result |
//! | path matches, method does not | `405` with `Allow` |
//! | nothing matches | `404` |

use std::fmt;

use http::Method;
use restpack_extract::{method_not_allowed, not_found, ApiRequest, HttpResponse};
use restpack_router::{Conflicts, Lookup, MethodRouter, Router};

use crate::error::RegistrationRejected;
use crate::handler::Handler;

/// Routes registered on a server.
///
/// Frozen behind an `Arc` once the server starts.
#[derive(Clone, Default)]
pub struct RouteTable {
    router: Router<Handler>,
    prefix: Option<String>,
}

impl RouteTable {
    /// Creates an empty table mounted under `prefix`.
    ///
    /// The prefix is expected in normalized form (see
    /// [`ServerConfigBuilder::path_prefix`](crate::ServerConfigBuilder::path_prefix)).
    #[must_use]
    pub fn new(prefix: Option<&str>) -> Self {
        Self {
            router: Router::new(),
            prefix: prefix.map(str::to_string),
        }
    }

    /// Mount prefix, if any.
    #[must_use]
    pub fn prefix(&self) -> Option<&str> {
        self.prefix.as_deref()
    }

    /// Returns `path` as it is matched on the wire, with the prefix applied.
    #[must_use]
    pub fn full_path(&self, path: &str) -> String {
        let path = path.trim();
        let sep = if path.starts_with('/') { "" } else { "/" };
        match &self.prefix {
            Some(prefix) => format!("{prefix}{sep}{path}"),
            None => format!("{sep}{path}"),
        }
    }

    /// Binds `handler` to `path` for `methods`, or for every method when
    /// `methods` is empty.
    ///
    /// Returns the bindings that already existed and were kept.
    pub fn register(
        &mut self,
        path: &str,
        handler: Option<Handler>,
        methods: &[Method],
    ) -> Result<Conflicts, RegistrationRejected> {
        if path.trim().is_empty() {
            return Err(RegistrationRejected::EmptyPath);
        }
        let full = self.full_path(path);
        let handler = handler.ok_or_else(|| RegistrationRejected::MissingHandler(full.clone()))?;

        let table = if methods.is_empty() {
            MethodRouter::new().any(handler)
        } else {
            methods.iter().fold(MethodRouter::new(), |table, method| {
                table.on(method.clone(), handler.clone())
            })
        };

        self.router
            .insert(&full, table)
            .map_err(|source| RegistrationRejected::InvalidPath { path: full, source })
    }

    /// Number of accepted registrations.
    #[must_use]
    pub fn len(&self) -> usize {
        self.router.len()
    }

    /// Returns true if nothing was registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.router.is_empty()
    }

    /// Routes `request` to its handler.
    pub async fn dispatch(&self, request: ApiRequest) -> HttpResponse {
        let path = request.path().to_string();
        let method = request.method().clone();

        match self.router.lookup(&method, &path) {
            Lookup::Found(matched) => {
                let handler = matched.value.clone();
                handler(request.with_params(matched.params)).await
            }
            Lookup::MethodNotAllowed { allowed } => {
                tracing::debug!(%method, path = %path, "method not allowed");
                method_not_allowed(&allowed)
            }
            Lookup::NotFound => {
                tracing::debug!(%method, path = %path, "no route");
                not_found("", None)
            }
        }
    }
}

impl fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteTable")
            .field("prefix", &self.prefix)
            .field("routes", &self.router.len())
            .finish()
    }
}
