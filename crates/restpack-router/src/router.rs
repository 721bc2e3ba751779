//! High-level router API.
//!
//! [`Router`] wraps the radix tree and turns a raw path match into a
//! [`Lookup`] that distinguishes "no such path" from "path exists but the
//! method is not bound".

use http::Method;

use crate::method_router::{Conflicts, MethodRouter};
use crate::node::Node;
use crate::params::Params;
use crate::{InsertError, Lookup, RouteMatch};

/// A radix tree router generic over the bound value.
///
/// # Example
///
/// ```rust
/// use restpack_router::{Lookup, MethodRouter, Router};
/// use http::Method;
///
/// let mut router = Router::new();
/// router.insert("/products", MethodRouter::new().on(Method::GET, "list")).unwrap();
/// router.insert("/products/{id}", MethodRouter::new().on(Method::GET, "get")).unwrap();
///
/// match router.lookup(&Method::GET, "/products/7") {
///     Lookup::Found(m) => {
///         assert_eq!(*m.value, "get");
///         assert_eq!(m.params.get("id"), Some("7"));
///     }
///     other => panic!("unexpected {other:?}"),
/// }
/// ```
///
/// # Route Priority
///
/// 1. **Static segments** (`/products/featured`)
/// 2. **Parameter segments** (`/products/{id}`)
/// 3. **Wildcard segments** (`/files/*path`)
#[derive(Debug, Clone)]
pub struct Router<T> {
    root: Node<T>,
    route_count: usize,
}

impl<T> Default for Router<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> Router<T> {
    /// Creates a new empty router.
    #[must_use]
    pub fn new() -> Self {
        Self {
            root: Node::root(),
            route_count: 0,
        }
    }

    /// Inserts a route, merging with an existing path entry.
    ///
    /// Bindings that already existed are kept and returned as
    /// [`Conflicts`] so the caller can report them.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) -> Result<Conflicts, InsertError> {
        if methods.is_empty() {
            return Err(InsertError::NoMethods(path.to_string()));
        }
        let conflicts = self.root.insert(path, methods)?;
        self.route_count += 1;
        Ok(conflicts)
    }

    /// Resolves `method` and `path` against the registered routes.
    #[must_use]
    pub fn lookup(&self, method: &Method, path: &str) -> Lookup<'_, T> {
        let Some((methods, params)) = self.root.match_path(path) else {
            return Lookup::NotFound;
        };

        match methods.lookup(method) {
            Some(value) => Lookup::Found(RouteMatch { value, params }),
            None => Lookup::MethodNotAllowed {
                allowed: methods.allowed(),
            },
        }
    }

    /// Matches a path without considering the method.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        self.root.match_path(path)
    }

    /// Returns the number of successful insertions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.route_count
    }

    /// Returns true if no routes are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.route_count == 0
    }
}
