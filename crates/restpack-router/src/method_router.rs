//! Per-path method table.
//!
//! A [`MethodRouter`] holds the values bound to one path, keyed by HTTP
//! method, plus an optional catch-all used when a route was registered
//! without a method restriction.

use http::Method;
use smallvec::SmallVec;

/// Values bound to a single path, keyed by HTTP method.
///
/// Explicit method bindings win over the catch-all.
///
/// # Example
///
/// ```rust
/// use restpack_router::MethodRouter;
/// use http::Method;
///
/// let methods = MethodRouter::new()
///     .on(Method::GET, "list")
///     .on(Method::POST, "create");
///
/// assert_eq!(methods.lookup(&Method::GET), Some(&"list"));
/// assert_eq!(methods.lookup(&Method::DELETE), None);
/// assert_eq!(methods.allowed(), vec![Method::GET, Method::POST]);
/// ```
#[derive(Debug, Clone)]
pub struct MethodRouter<T> {
    explicit: SmallVec<[(Method, T); 4]>,
    any: Option<T>,
}

impl<T> Default for MethodRouter<T> {
    fn default() -> Self {
        Self {
            explicit: SmallVec::new(),
            any: None,
        }
    }
}

impl<T> MethodRouter<T> {
    /// Creates an empty method table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `value` to every method not bound explicitly.
    #[must_use]
    pub fn any(mut self, value: T) -> Self {
        if self.any.is_none() {
            self.any = Some(value);
        }
        self
    }

    /// Binds `value` to `method`. An existing binding for the same method
    /// is kept.
    #[must_use]
    pub fn on(mut self, method: Method, value: T) -> Self {
        if !self.explicit.iter().any(|(m, _)| *m == method) {
            self.explicit.push((method, value));
        }
        self
    }

    /// Returns the value that handles `method`, if any.
    #[must_use]
    pub fn lookup(&self, method: &Method) -> Option<&T> {
        self.explicit
            .iter()
            .find(|(m, _)| m == method)
            .map(|(_, v)| v)
            .or(self.any.as_ref())
    }

    /// Methods bound explicitly, in registration order. Empty when only a
    /// catch-all is present.
    #[must_use]
    pub fn allowed(&self) -> Vec<Method> {
        self.explicit.iter().map(|(m, _)| m.clone()).collect()
    }

    /// Returns true if a catch-all binding exists.
    #[must_use]
    pub fn accepts_any(&self) -> bool {
        self.any.is_some()
    }

    /// Returns true if nothing is bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.explicit.is_empty() && self.any.is_none()
    }

    /// Folds `other` into this table and reports the bindings that already
    /// existed here. Existing bindings are left untouched.
    pub fn merge(&mut self, other: MethodRouter<T>) -> Conflicts {
        let mut conflicts = Conflicts::default();

        for (method, value) in other.explicit {
            if self.explicit.iter().any(|(m, _)| *m == method) {
                conflicts.methods.push(method);
            } else {
                self.explicit.push((method, value));
            }
        }

        if let Some(value) = other.any {
            if self.any.is_some() {
                conflicts.any = true;
            } else {
                self.any = Some(value);
            }
        }

        conflicts
    }
}

/// Bindings that [`MethodRouter::merge`] refused to overwrite.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Conflicts {
    /// Explicit methods that were already bound.
    pub methods: Vec<Method>,
    /// Whether a catch-all was already bound.
    pub any: bool,
}

impl Conflicts {
    /// Returns true if nothing conflicted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty() && !self.any
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_explicit_lookup() {
        let methods = MethodRouter::new().on(Method::PUT, 1).on(Method::DELETE, 2);

        assert_eq!(methods.lookup(&Method::PUT), Some(&1));
        assert_eq!(methods.lookup(&Method::DELETE), Some(&2));
        assert_eq!(methods.lookup(&Method::GET), None);
    }

    #[test]
    fn test_any_is_fallback() {
        let methods = MethodRouter::new().on(Method::GET, "get").any("fallback");

        assert_eq!(methods.lookup(&Method::GET), Some(&"get"));
        assert_eq!(methods.lookup(&Method::PATCH), Some(&"fallback"));
        assert!(methods.accepts_any());
        assert_eq!(methods.allowed(), vec![Method::GET]);
    }

    #[test]
    fn test_first_binding_wins() {
        let methods = MethodRouter::new().on(Method::GET, "first").on(Method::GET, "second");
        assert_eq!(methods.lookup(&Method::GET), Some(&"first"));
    }

    #[test]
    fn test_merge_reports_conflicts() {
        let mut methods = MethodRouter::new().on(Method::GET, "list");
        let conflicts = methods.merge(MethodRouter::new().on(Method::GET, "dup").on(Method::POST, "create"));

        assert_eq!(conflicts.methods, vec![Method::GET]);
        assert!(!conflicts.any);
        assert_eq!(methods.lookup(&Method::GET), Some(&"list"));
        assert_eq!(methods.lookup(&Method::POST), Some(&"create"));
    }

    #[test]
    fn test_merge_any_conflict() {
        let mut methods = MethodRouter::new().any(1);
        let conflicts = methods.merge(MethodRouter::new().any(2));

        assert!(conflicts.any);
        assert_eq!(methods.lookup(&Method::HEAD), Some(&1));
    }

    #[test]
    fn test_empty() {
        let methods: MethodRouter<u8> = MethodRouter::new();
        assert!(methods.is_empty());
        assert!(methods.allowed().is_empty());
    }
}
