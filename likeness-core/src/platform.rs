//! Host-environment seam
//!
//! The comparator has no idea what a rendering tree is. Embedders that have
//! one describe it through [`NodePlatform`]; everything else runs headless,
//! where no value is ever an element.

use core::any::Any;
use core::fmt;

use crate::identical::identical;
use crate::value::Value;

/// An object owned by the host environment. The core never looks inside;
/// it only asks for a class name (for record comparison) and hands the
/// object to the platform, which may downcast it.
pub trait HostObject: fmt::Debug {
    fn class_name(&self) -> &'static str;

    fn as_any(&self) -> &dyn Any;

    /// Rendering used by `Display` for values.
    fn fmt_notation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#<{}>", self.class_name())
    }
}

pub trait NodePlatform {
    /// True iff `value` is a rendering-tree node of the element subtype.
    ///
    /// Implementations must check both the node-kind discriminator and the
    /// element-only capabilities, so a record shaped like `{nodeType: 1}` is
    /// never an element.
    fn is_element_node(&self, value: &Value) -> bool;

    /// Equality for two element nodes. Defaults to reference identity.
    fn same_node(&self, a: &Value, b: &Value) -> bool {
        identical(a, b)
    }
}
