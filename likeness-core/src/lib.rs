//! # Likeness Core
//!
//! Structural value comparison for a dynamically typed value model.
//!
//! Values are primitives or shared, possibly cyclic objects. The crate
//! answers three questions about them:
//!
//! - **Identity**: [`identical`] is a strict same-value test where `NaN` is
//!   identical to itself and `0` is not identical to `-0`.
//! - **Structure**: [`deep_equal`] recursively compares arrays, argument
//!   lists, records, sets, maps, dates and patterns, and terminates on
//!   self-referencing graphs.
//! - **Classification**: every value falls into exactly one [`Kind`];
//!   predicates such as [`is_element`] and [`is_arguments`] are thin views of
//!   that classification.
//!
//! Element detection depends on the host environment and is injected through
//! [`NodePlatform`]. With the `document` feature (on by default) the
//! reference [`document`] platform is used; without it, or with
//! [`Comparator::headless`], nothing is an element.
//!
//! ## Example
//!
//! ```
//! use likeness_core::{deep_equal, read_one};
//!
//! let a = read_one("#1={name: \"loop\", next: #1#}").unwrap();
//! let b = read_one("#1={next: #1#, name: \"loop\"}").unwrap();
//! assert!(deep_equal(&a, &b));
//! ```

// Public modules
pub mod classify;
pub mod comparator;
pub mod deep_equal;
#[cfg(feature = "document")]
pub mod document;
pub mod identical;
pub mod pattern;
pub mod platform;
pub mod reader;
pub mod tokenizer;
pub mod value;

// Re-exports for convenience
pub use classify::{Classification, Kind, NumericSpecial, is_date, is_nan, is_neg_zero, is_set};
pub use comparator::Comparator;
pub use deep_equal::TraversalState;
pub use identical::{identical, same_value_zero};
pub use pattern::{Pattern, PatternError, PatternFlags};
pub use platform::{HostObject, NodePlatform};
pub use reader::{ReadError, read, read_one};
pub use value::{Object, ObjectClass, Symbol, Value};

/// Deep structural equality using the default [`Comparator`].
pub fn deep_equal(a: &Value, b: &Value) -> bool {
    Comparator::new().deep_equal(a, b)
}

/// True iff the default platform recognises `value` as an element node.
pub fn is_element(value: &Value) -> bool {
    Comparator::new().is_element(value)
}

/// True iff `value` is a captured argument list.
pub fn is_arguments(value: &Value) -> bool {
    Comparator::new().is_arguments(value)
}
