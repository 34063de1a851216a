// Strict identity: no recursion, no coercion

use crate::classify::classify_number;
use crate::value::Value;

/// Strict same-value comparison.
///
/// Numbers are identical when they are numerically equal *and* agree on
/// negative zero, so `0` and `-0` differ. Unlike `==`, two NaNs are
/// identical. Every other pair must have the same type and value; objects and
/// symbols are compared by reference.
pub fn identical(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) => {
            let (sx, sy) = (classify_number(*x), classify_number(*y));
            if sx.is_nan || sy.is_nan {
                return sx.is_nan && sy.is_nan;
            }
            x == y && sx.is_negative_zero == sy.is_negative_zero
        }
        (Value::Undefined, Value::Undefined) => true,
        (Value::Null, Value::Null) => true,
        (Value::Boolean(x), Value::Boolean(y)) => x == y,
        (Value::BigInt(x), Value::BigInt(y)) => x == y,
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Symbol(x), Value::Symbol(y)) => x.ptr_eq(y),
        (Value::Object(x), Value::Object(y)) => x.ptr_eq(y),
        _ => false, // Different types are never identical
    }
}

/// Identity for collection membership: like [`identical`] except that `0`
/// and `-0` are the same key.
pub fn same_value_zero(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Number(x), Value::Number(y)) if *x == 0.0 && *y == 0.0 => true,
        _ => identical(a, b),
    }
}
