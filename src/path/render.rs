//! Path rendering
//!
//! Substitutes caller-supplied query arguments into the placeholder elements
//! of a compiled chain. Compiled chains are shared and never mutated; every
//! render produces a new chain.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::chain::PathChain;
use super::errors::{PathError, PathResult};

/// Runtime values for placeholder variables, keyed by variable name
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QueryArgs(BTreeMap<String, String>);

impl QueryArgs {
    pub fn new() -> Self {
        Self(BTreeMap::new())
    }

    /// Builder-style insert
    pub fn with(mut self, variable: impl Into<String>, value: impl Into<String>) -> Self {
        self.0.insert(variable.into(), value.into());
        self
    }

    pub fn insert(&mut self, variable: impl Into<String>, value: impl Into<String>) {
        self.0.insert(variable.into(), value.into());
    }

    pub fn get(&self, variable: &str) -> Option<&str> {
        self.0.get(variable).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for QueryArgs {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(iter.into_iter().map(|(k, v)| (k.into(), v.into())).collect())
    }
}

/// Renders `chain` against `args`.
///
/// # Errors
///
/// Returns `PathError::MissingQueryArgument` naming the first placeholder
/// variable that has no entry in `args`.
pub fn render(chain: &PathChain, args: &QueryArgs) -> PathResult<PathChain> {
    let mut elements = Vec::with_capacity(chain.len());
    for element in chain {
        if element.is_placeholder() {
            let variable = element.key.name();
            let literal = args
                .get(variable)
                .ok_or_else(|| PathError::MissingQueryArgument(variable.to_string()))?;
            elements.push(element.rendered(literal));
        } else {
            elements.push(element.clone());
        }
    }
    PathChain::new(elements)
}
