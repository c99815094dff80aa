//! Path chains
//!
//! An ordered sequence of path elements identifying one nested location
//! inside a document. Registered chains hold between 1 and
//! [`MAX_PATH_DEPTH`] elements, the nesting ceiling of the backing store.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::element::PathElement;
use super::errors::{PathError, PathResult};

/// Maximum number of elements in a chain
pub const MAX_PATH_DEPTH: usize = 32;

/// Ordered sequence of path elements
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathChain {
    elements: Vec<PathElement>,
}

impl PathChain {
    /// Creates an empty chain, used as the prefix of top-level fields.
    pub fn root() -> Self {
        Self { elements: Vec::new() }
    }

    /// Creates a chain, enforcing `1 <= len <= MAX_PATH_DEPTH`.
    pub fn new(elements: Vec<PathElement>) -> PathResult<Self> {
        let chain = Self { elements };
        chain.check_depth()?;
        Ok(chain)
    }

    /// Returns a new chain with `element` appended. Depth is not checked.
    pub fn child(&self, element: PathElement) -> Self {
        let mut elements = Vec::with_capacity(self.elements.len() + 1);
        elements.extend(self.elements.iter().cloned());
        elements.push(element);
        Self { elements }
    }

    /// Returns a new chain with all `elements` appended. Depth is not checked.
    pub fn extended(&self, elements: impl IntoIterator<Item = PathElement>) -> Self {
        let mut chain = self.clone();
        chain.elements.extend(elements);
        chain
    }

    /// Fails if the chain is empty or deeper than the store allows.
    pub fn check_depth(&self) -> PathResult<()> {
        if self.elements.is_empty() {
            return Err(PathError::Empty);
        }
        if self.elements.len() > MAX_PATH_DEPTH {
            return Err(PathError::TooDeep {
                depth: self.elements.len(),
                max: MAX_PATH_DEPTH,
            });
        }
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn elements(&self) -> &[PathElement] {
        &self.elements
    }

    pub fn iter(&self) -> std::slice::Iter<'_, PathElement> {
        self.elements.iter()
    }

    pub fn last(&self) -> Option<&PathElement> {
        self.elements.last()
    }

    /// Returns the variable names of all placeholder elements, in order
    pub fn placeholders(&self) -> impl Iterator<Item = &str> {
        self.elements
            .iter()
            .filter(|e| e.is_placeholder())
            .map(|e| e.key.name())
    }

    pub fn has_placeholders(&self) -> bool {
        self.elements.iter().any(|e| e.is_placeholder())
    }

    /// Returns the element keys in their textual form
    pub fn keys(&self) -> Vec<String> {
        self.elements.iter().map(|e| e.key.to_string()).collect()
    }

    /// Returns the human-facing path string, e.g. `projects.{{projectId}}.name`.
    pub fn to_path_string(&self) -> String {
        self.elements
            .iter()
            .map(|e| e.key.path_segment())
            .collect::<Vec<_>>()
            .join(".")
    }
}

impl fmt::Display for PathChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.keys().join(", "))
    }
}

impl<'a> IntoIterator for &'a PathChain {
    type Item = &'a PathElement;
    type IntoIter = std::slice::Iter<'a, PathElement>;

    fn into_iter(self) -> Self::IntoIter {
        self.elements.iter()
    }
}
