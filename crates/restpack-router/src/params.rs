//! Path parameters captured during a match.
//!
//! Parameters live in a small vector so the common case (one or two
//! `{name}` segments) never touches the heap for the container itself.

use std::str::FromStr;

use smallvec::SmallVec;
use thiserror::Error;

/// Parameters stored inline before spilling to the heap.
const INLINE_PARAMS: usize = 4;

/// Failure to read a path parameter as a typed value.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParamError {
    /// No parameter with this name was captured.
    #[error("missing path parameter '{0}'")]
    Missing(String),

    /// The captured text did not parse into the requested type.
    #[error("path parameter '{name}' has invalid value '{value}'")]
    Invalid {
        /// Parameter name.
        name: String,
        /// Raw captured text.
        value: String,
    },
}

/// Named values captured from `{name}` and `*name` segments.
///
/// # Example
///
/// ```rust
/// use restpack_router::Params;
///
/// let mut params = Params::new();
/// params.push("id", "42");
///
/// assert_eq!(params.get("id"), Some("42"));
/// assert_eq!(params.parse::<i64>("id"), Ok(42));
/// assert!(params.parse::<i64>("missing").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Params {
    pairs: SmallVec<[(String, String); INLINE_PARAMS]>,
}

impl Params {
    /// Creates an empty parameter set.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a captured parameter.
    pub fn push(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((name.into(), value.into()));
    }

    /// Returns the raw captured text for `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Parses the parameter `name` into `T`.
    pub fn parse<T: FromStr>(&self, name: &str) -> Result<T, ParamError> {
        let raw = self
            .get(name)
            .ok_or_else(|| ParamError::Missing(name.to_string()))?;
        raw.parse().map_err(|_| ParamError::Invalid {
            name: name.to_string(),
            value: raw.to_string(),
        })
    }

    /// Returns true if nothing was captured.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// Number of captured parameters.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Drops parameters pushed after the first `len`. Used when a branch of
    /// the tree fails to match and the search backtracks.
    pub(crate) fn truncate(&mut self, len: usize) {
        self.pairs.truncate(len);
    }

    /// Iterates over `(name, value)` pairs in capture order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(n, v)| (n.as_str(), v.as_str()))
    }
}

impl FromIterator<(String, String)> for Params {
    fn from_iter<I: IntoIterator<Item = (String, String)>>(iter: I) -> Self {
        Self {
            pairs: iter.into_iter().collect(),
        }
    }
}
