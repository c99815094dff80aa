//! Path element model and renderer
//!
//! - `PathElement`: one segment of a nested document address
//! - `PathChain`: bounded, ordered sequence of elements
//! - `render`: placeholder substitution against query arguments

mod chain;
mod element;
mod errors;
mod render;

pub use chain::{PathChain, MAX_PATH_DEPTH};
pub use element::{DefaultType, PathElement, PathKey, PLACEHOLDER_PREFIX};
pub use errors::{PathError, PathResult};
pub use render::{render, QueryArgs};
