//! Primitive and structural-kind classification.
//!
//! Every comparison starts here: a value is first reduced to one [`Kind`]
//! from a closed set, and the comparators then `match` on that tag instead of
//! inspecting values ad hoc.

use core::fmt;

use num_traits::Zero;

use crate::platform::NodePlatform;
use crate::value::{ObjectClass, Value};

/// IEEE-754 facts about a number that ordinary `==` hides.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NumericSpecial {
    pub is_nan: bool,
    pub is_negative_zero: bool,
}

// RUST CONCEPT: NaN is the only value not equal to itself
// The self-comparison keeps the rule explicit instead of hiding it in is_nan().
// Negative zero equals zero, but its reciprocal is -inf rather than +inf.
#[allow(clippy::eq_op)]
pub fn classify_number(n: f64) -> NumericSpecial {
    NumericSpecial {
        is_nan: n != n,
        is_negative_zero: n.is_zero() && 1.0 / n == f64::NEG_INFINITY,
    }
}

/// Numeric special flags, or `None` for anything that is not a number.
/// BigInts have neither NaN nor a signed zero and report `None` too.
pub fn classify_primitive(value: &Value) -> Option<NumericSpecial> {
    match value {
        Value::Number(n) => Some(classify_number(*n)),
        _ => None,
    }
}

pub fn is_neg_zero(value: &Value) -> bool {
    classify_primitive(value).is_some_and(|special| special.is_negative_zero)
}

pub fn is_nan(value: &Value) -> bool {
    classify_primitive(value).is_some_and(|special| special.is_nan)
}

pub fn is_date(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| matches!(object.borrow().class, ObjectClass::Date(_)))
}

pub fn is_set(value: &Value) -> bool {
    value
        .as_object()
        .is_some_and(|object| matches!(object.borrow().class, ObjectClass::Set(_)))
}

/// The closed set of value shapes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Kind {
    Null,
    Primitive,
    BoxedPrimitive,
    Sequence,
    ArrayLike,
    Set,
    Map,
    Date,
    Pattern,
    ExternalNode,
    Function,
    Record,
}

impl Kind {
    /// Kinds that can only ever be equal through identity.
    pub fn is_reference_only(self) -> bool {
        matches!(
            self,
            Kind::Null | Kind::Primitive | Kind::BoxedPrimitive | Kind::Function
        )
    }

    /// Whether two values of these kinds may be structurally compared at all.
    /// Sequences and array-likes are interchangeable; nothing else mixes.
    pub fn compatible_with(self, other: Kind) -> bool {
        self == other
            || matches!(
                (self, other),
                (Kind::Sequence, Kind::ArrayLike) | (Kind::ArrayLike, Kind::Sequence)
            )
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Kind::Null => "null",
            Kind::Primitive => "primitive",
            Kind::BoxedPrimitive => "boxed-primitive",
            Kind::Sequence => "sequence",
            Kind::ArrayLike => "array-like",
            Kind::Set => "set",
            Kind::Map => "map",
            Kind::Date => "date",
            Kind::Pattern => "pattern",
            Kind::ExternalNode => "external-node",
            Kind::Function => "function",
            Kind::Record => "record",
        };
        write!(f, "{}", name)
    }
}

/// Everything the comparators need to know about one value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub kind: Kind,
    pub is_primitive: bool,
    pub is_boxed_primitive: bool,
    pub numeric_special: Option<NumericSpecial>,
}

impl fmt::Display for Classification {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "kind: {}", self.kind)?;
        writeln!(f, "primitive: {}", self.is_primitive)?;
        writeln!(f, "boxed primitive: {}", self.is_boxed_primitive)?;
        match self.numeric_special {
            Some(special) => write!(
                f,
                "numeric: nan={} negative-zero={}",
                special.is_nan, special.is_negative_zero
            ),
            None => write!(f, "numeric: none"),
        }
    }
}

// Precedence matters: boxed wrappers win over everything, and the platform
// gets to claim element nodes before the structural checks run.
pub(crate) fn kind_of(value: &Value, platform: Option<&dyn NodePlatform>) -> Kind {
    let object = match value {
        Value::Undefined | Value::Null => return Kind::Null,
        Value::Boolean(_)
        | Value::Number(_)
        | Value::BigInt(_)
        | Value::String(_)
        | Value::Symbol(_) => return Kind::Primitive,
        Value::Object(object) => object,
    };

    if matches!(object.borrow().class, ObjectClass::Boxed(_)) {
        return Kind::BoxedPrimitive;
    }

    if platform.is_some_and(|platform| platform.is_element_node(value)) {
        return Kind::ExternalNode;
    }

    match object.borrow().class {
        ObjectClass::Array(_) => Kind::Sequence,
        ObjectClass::Arguments(_) => Kind::ArrayLike,
        ObjectClass::Set(_) => Kind::Set,
        ObjectClass::Map(_) => Kind::Map,
        ObjectClass::Date(_) => Kind::Date,
        ObjectClass::Pattern(_) => Kind::Pattern,
        ObjectClass::Function(_) => Kind::Function,
        ObjectClass::Boxed(_) => Kind::BoxedPrimitive,
        ObjectClass::Plain | ObjectClass::Host(_) => Kind::Record,
    }
}

pub(crate) fn classification_of(value: &Value, platform: Option<&dyn NodePlatform>) -> Classification {
    let kind = kind_of(value, platform);
    Classification {
        kind,
        is_primitive: kind == Kind::Primitive,
        is_boxed_primitive: kind == Kind::BoxedPrimitive,
        numeric_special: classify_primitive(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_number() {
        assert_eq!(classify_number(1.0), NumericSpecial::default());
        assert!(classify_number(f64::NAN).is_nan);
        assert!(!classify_number(f64::NAN).is_negative_zero);
        assert!(classify_number(-0.0).is_negative_zero);
        assert!(!classify_number(0.0).is_negative_zero);
        assert!(!classify_number(f64::NEG_INFINITY).is_negative_zero);
    }

    #[test]
    fn test_is_neg_zero() {
        assert!(is_neg_zero(&Value::number(-0.0)));
        assert!(!is_neg_zero(&Value::number(0.0)));
        assert!(!is_neg_zero(&Value::string("-0")));
        assert!(!is_neg_zero(&Value::record(Vec::<(&str, Value)>::new())));
        assert!(!is_neg_zero(&Value::boxed_number(-0.0)));
    }

    #[test]
    fn test_non_numbers_have_no_special_flags() {
        assert_eq!(classify_primitive(&Value::bigint(0)), None);
        assert_eq!(classify_primitive(&Value::Null), None);
        assert_eq!(classify_primitive(&Value::boxed_number(f64::NAN)), None);
    }

    #[test]
    fn test_kind_precedence() {
        let cases = [
            (Value::Undefined, Kind::Null),
            (Value::Null, Kind::Null),
            (Value::from(true), Kind::Primitive),
            (Value::symbol("s"), Kind::Primitive),
            (Value::boxed_string("x"), Kind::BoxedPrimitive),
            (Value::array(vec![]), Kind::Sequence),
            (Value::arguments(vec![]), Kind::ArrayLike),
            (Value::set(vec![]), Kind::Set),
            (Value::map(vec![]), Kind::Map),
            (Value::date_from_millis(0).unwrap(), Kind::Date),
            (Value::pattern("a+", "g").unwrap(), Kind::Pattern),
            (Value::function("f"), Kind::Function),
            (Value::record([("nodeType", Value::from(1))]), Kind::Record),
        ];
        for (value, expected) in cases {
            assert_eq!(kind_of(&value, None), expected, "kind of {}", value);
        }
    }

    #[test]
    fn test_kind_compatibility() {
        assert!(Kind::Sequence.compatible_with(Kind::ArrayLike));
        assert!(Kind::ArrayLike.compatible_with(Kind::Sequence));
        assert!(!Kind::BoxedPrimitive.compatible_with(Kind::Primitive));
        assert!(!Kind::Date.compatible_with(Kind::Record));
        assert!(Kind::Record.compatible_with(Kind::Record));
    }

    #[test]
    fn test_classification_flags() {
        let classification = classification_of(&Value::number(-0.0), None);
        assert_eq!(classification.kind, Kind::Primitive);
        assert!(classification.is_primitive);
        assert!(!classification.is_boxed_primitive);
        assert_eq!(
            classification.numeric_special,
            Some(NumericSpecial {
                is_nan: false,
                is_negative_zero: true
            })
        );

        let boxed = classification_of(&Value::boxed_boolean(false), None);
        assert!(boxed.is_boxed_primitive);
        assert!(!boxed.is_primitive);
        assert_eq!(boxed.numeric_special, None);
    }

    #[test]
    fn test_date_and_set_predicates() {
        assert!(is_date(&Value::date_from_millis(5).unwrap()));
        assert!(!is_date(&Value::from(5)));
        assert!(is_set(&Value::set(vec![])));
        assert!(!is_set(&Value::array(vec![])));
        assert!(is_nan(&Value::number(f64::NAN)));
        assert!(!is_nan(&Value::string("NaN")));
    }
}
