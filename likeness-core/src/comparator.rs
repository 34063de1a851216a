use core::fmt;

use crate::classify::{Classification, Kind, classification_of, kind_of};
use crate::platform::NodePlatform;
use crate::value::Value;

/// Entry point for classification and comparison.
///
/// A comparator carries the optional host platform used to recognise element
/// nodes. It holds no other state: every [`deep_equal`](Comparator::deep_equal)
/// call allocates its own traversal state, so one comparator can be reused
/// freely.
pub struct Comparator {
    // No platform means headless: nothing is an element
    platform: Option<Box<dyn NodePlatform>>,
}

impl fmt::Debug for Comparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Comparator")
            .field("headless", &self.platform.is_none())
            .finish()
    }
}

impl Comparator {
    /// Comparator for the platform this crate was built for: the reference
    /// document platform with the `document` feature, headless otherwise.
    pub fn new() -> Self {
        #[cfg(feature = "document")]
        return Self::with_platform(Box::new(crate::document::DocumentPlatform::new()));

        #[cfg(not(feature = "document"))]
        Self::headless()
    }

    pub fn headless() -> Self {
        Self { platform: None }
    }

    pub fn with_platform(platform: Box<dyn NodePlatform>) -> Self {
        Self {
            platform: Some(platform),
        }
    }

    pub fn set_platform(&mut self, platform: Box<dyn NodePlatform>) {
        self.platform = Some(platform);
    }

    pub fn is_headless(&self) -> bool {
        self.platform.is_none()
    }

    pub(crate) fn platform(&self) -> Option<&dyn NodePlatform> {
        self.platform.as_deref()
    }

    pub fn classify_kind(&self, value: &Value) -> Kind {
        kind_of(value, self.platform())
    }

    pub fn classify(&self, value: &Value) -> Classification {
        classification_of(value, self.platform())
    }

    pub fn is_element(&self, value: &Value) -> bool {
        self.classify_kind(value) == Kind::ExternalNode
    }

    pub fn is_arguments(&self, value: &Value) -> bool {
        self.classify_kind(value) == Kind::ArrayLike
    }

    // Only reached for two element nodes that are not the same reference
    pub(crate) fn same_node(&self, a: &Value, b: &Value) -> bool {
        self.platform()
            .is_some_and(|platform| platform.same_node(a, b))
    }
}

impl Default for Comparator {
    fn default() -> Self {
        Self::new()
    }
}
