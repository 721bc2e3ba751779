//! Radix tree nodes.
//!
//! Each node owns one path segment. Matching prefers static children, then
//! the parameter child, then the wildcard child, and backtracks when a
//! preferred branch dead-ends deeper in the tree.

use crate::method_router::{Conflicts, MethodRouter};
use crate::params::Params;
use crate::InsertError;

/// Kind of path segment held by a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SegmentKind {
    /// Literal text (`users`).
    Static,
    /// Named single-segment capture (`{id}`).
    Param(String),
    /// Trailing catch-all capture (`*path`).
    Wildcard(String),
}

impl SegmentKind {
    fn parse(segment: &str) -> Self {
        if let Some(name) = segment.strip_prefix('{').and_then(|s| s.strip_suffix('}')) {
            Self::Param(name.to_string())
        } else if let Some(name) = segment.strip_prefix('*') {
            Self::Wildcard(name.to_string())
        } else {
            Self::Static
        }
    }
}

/// A node in the radix tree.
#[derive(Debug, Clone)]
pub struct Node<T> {
    segment: String,
    kind: SegmentKind,
    methods: Option<MethodRouter<T>>,
    /// Sorted by segment for binary search.
    static_children: Vec<Node<T>>,
    param_child: Option<Box<Node<T>>>,
    wildcard_child: Option<Box<Node<T>>>,
}

impl<T> Node<T> {
    fn new(segment: &str, kind: SegmentKind) -> Self {
        Self {
            segment: segment.to_string(),
            kind,
            methods: None,
            static_children: Vec::new(),
            param_child: None,
            wildcard_child: None,
        }
    }

    /// Creates the root of a tree.
    #[must_use]
    pub fn root() -> Self {
        Self::new("", SegmentKind::Static)
    }

    /// Returns the segment text this node was created from.
    #[must_use]
    pub fn segment(&self) -> &str {
        &self.segment
    }

    /// Returns the segment kind.
    #[must_use]
    pub fn kind(&self) -> &SegmentKind {
        &self.kind
    }

    /// Inserts `methods` at `path`, merging with anything already bound
    /// there.
    pub fn insert(&mut self, path: &str, methods: MethodRouter<T>) -> Result<Conflicts, InsertError> {
        let segments: Vec<&str> = split(path).collect();

        if let Some(pos) = segments
            .iter()
            .position(|s| matches!(SegmentKind::parse(s), SegmentKind::Wildcard(_)))
        {
            if pos + 1 != segments.len() {
                return Err(InsertError::WildcardNotLast(path.to_string()));
            }
        }

        Ok(self.insert_segments(&segments, methods))
    }

    fn insert_segments(&mut self, segments: &[&str], methods: MethodRouter<T>) -> Conflicts {
        let Some((&segment, rest)) = segments.split_first() else {
            return match &mut self.methods {
                Some(existing) => existing.merge(methods),
                None => {
                    self.methods = Some(methods);
                    Conflicts::default()
                }
            };
        };

        let child = match SegmentKind::parse(segment) {
            SegmentKind::Static => {
                let idx = match self
                    .static_children
                    .binary_search_by(|c| c.segment.as_str().cmp(segment))
                {
                    Ok(idx) => idx,
                    Err(idx) => {
                        self.static_children
                            .insert(idx, Node::new(segment, SegmentKind::Static));
                        idx
                    }
                };
                &mut self.static_children[idx]
            }
            kind @ SegmentKind::Param(_) => self
                .param_child
                .get_or_insert_with(|| Box::new(Node::new(segment, kind)))
                .as_mut(),
            kind @ SegmentKind::Wildcard(_) => self
                .wildcard_child
                .get_or_insert_with(|| Box::new(Node::new(segment, kind)))
                .as_mut(),
        };

        child.insert_segments(rest, methods)
    }

    /// Finds the method table bound to `path`, capturing parameters.
    #[must_use]
    pub fn match_path(&self, path: &str) -> Option<(&MethodRouter<T>, Params)> {
        let segments: Vec<&str> = split(path).collect();
        let mut params = Params::new();
        let methods = self.match_segments(&segments, &mut params)?;
        Some((methods, params))
    }

    fn match_segments<'a>(&'a self, segments: &[&str], params: &mut Params) -> Option<&'a MethodRouter<T>> {
        let Some((&segment, rest)) = segments.split_first() else {
            return self.methods.as_ref();
        };

        if let Ok(idx) = self
            .static_children
            .binary_search_by(|c| c.segment.as_str().cmp(segment))
        {
            if let Some(found) = self.static_children[idx].match_segments(rest, params) {
                return Some(found);
            }
        }

        if let Some(child) = &self.param_child {
            if let SegmentKind::Param(name) = &child.kind {
                let mark = params.len();
                params.push(name.clone(), segment);
                if let Some(found) = child.match_segments(rest, params) {
                    return Some(found);
                }
                params.truncate(mark);
            }
        }

        if let Some(child) = &self.wildcard_child {
            if let (SegmentKind::Wildcard(name), Some(methods)) = (&child.kind, &child.methods) {
                params.push(name.clone(), segments.join("/"));
                return Some(methods);
            }
        }

        None
    }
}

/// Splits a path into non-empty segments, so `/a//b/` and `/a/b` are the
/// same route.
fn split(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}
