//! Runtime value validation
//!
//! Value trees are checked against compiled field descriptors before they
//! are written to the store and after they are read back. Numbers pass
//! through a pluggable coercion hook on the way.

mod coercion;
mod errors;
mod validator;

pub use coercion::{coerce_value, FixedPoint, NumericCoercion, PassThrough};
pub use errors::{MismatchKind, ValidationDetails, ValidationError, ValidationResult};
pub use validator::{Validation, Validator};
