//! Numeric coercion hooks
//!
//! The backing store decides how numbers are represented on the wire. The
//! validator hands every accepted number to a [`NumericCoercion`] before the
//! value leaves the engine.

use rust_decimal::prelude::{FromPrimitive, ToPrimitive};
use rust_decimal::Decimal;
use serde_json::{Number, Value};

/// Converts a JSON number into the store's numeric representation
pub trait NumericCoercion: Send + Sync {
    fn coerce(&self, number: &Number) -> Value;
}

/// Leaves numbers unchanged
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassThrough;

impl NumericCoercion for PassThrough {
    fn coerce(&self, number: &Number) -> Value {
        Value::Number(number.clone())
    }
}

/// Rounds floating-point numbers to a fixed number of decimal places.
///
/// Integers pass through. With a scale of 0 floats become integers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedPoint {
    scale: u32,
}

impl FixedPoint {
    pub fn new(scale: u32) -> Self {
        Self { scale }
    }

    pub fn scale(&self) -> u32 {
        self.scale
    }
}

impl NumericCoercion for FixedPoint {
    fn coerce(&self, number: &Number) -> Value {
        if number.is_i64() || number.is_u64() {
            return Value::Number(number.clone());
        }
        let Some(decimal) = number.as_f64().and_then(Decimal::from_f64) else {
            // NaN and out-of-range values have no decimal form
            return Value::Number(number.clone());
        };

        let rounded = decimal.round_dp(self.scale).normalize();
        if self.scale == 0 {
            if let Some(int) = rounded.to_i64() {
                return Value::from(int);
            }
        }
        rounded
            .to_f64()
            .and_then(Number::from_f64)
            .map(Value::Number)
            .unwrap_or_else(|| Value::Number(number.clone()))
    }
}

/// Applies `coercion` to every number in `value`, recursively
pub fn coerce_value(value: &Value, coercion: &dyn NumericCoercion) -> Value {
    match value {
        Value::Number(number) => coercion.coerce(number),
        Value::Array(items) => Value::Array(items.iter().map(|v| coerce_value(v, coercion)).collect()),
        Value::Object(map) => Value::Object(
            map.iter()
                .map(|(k, v)| (k.clone(), coerce_value(v, coercion)))
                .collect(),
        ),
        other => other.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn number(value: f64) -> Number {
        Number::from_f64(value).unwrap()
    }

    #[test]
    fn test_pass_through() {
        assert_eq!(PassThrough.coerce(&number(0.1)), json!(0.1));
        assert_eq!(PassThrough.coerce(&Number::from(7)), json!(7));
    }

    #[test]
    fn test_fixed_point_rounds() {
        let coercion = FixedPoint::new(2);
        assert_eq!(coercion.coerce(&number(3.14159)), json!(3.14));
        assert_eq!(coercion.coerce(&number(2.5)), json!(2.5));
    }

    #[test]
    fn test_fixed_point_keeps_integers() {
        let coercion = FixedPoint::new(2);
        assert_eq!(coercion.coerce(&Number::from(42)), json!(42));
        assert_eq!(coercion.coerce(&Number::from(-3)), json!(-3));
    }

    #[test]
    fn test_fixed_point_scale_zero() {
        let coercion = FixedPoint::new(0);
        assert_eq!(coercion.coerce(&number(9.7)), json!(10));
        assert!(coercion.coerce(&number(9.7)).is_i64());
    }

    #[test]
    fn test_coerce_value_recurses() {
        let value = json!({"a": 1.234, "b": [2.345, "x"], "c": {"d": 3.456}, "e": null});
        let coerced = coerce_value(&value, &FixedPoint::new(1));
        assert_eq!(coerced, json!({"a": 1.2, "b": [2.3, "x"], "c": {"d": 3.5}, "e": null}));
    }
}
