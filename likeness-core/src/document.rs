// Reference document platform for hosts without a real rendering tree
// Provides element and text nodes plus a NodePlatform that recognises them

use core::any::Any;
use core::fmt;
use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::platform::{HostObject, NodePlatform};
use crate::value::Value;

pub const ELEMENT_NODE: u16 = 1;
pub const TEXT_NODE: u16 = 3;

/// A document node. The node-kind discriminator alone does not make an
/// element: elements also carry attributes and children.
#[derive(Debug)]
pub struct Node {
    node_type: u16,
    node_name: String,
    data: Option<String>,
    element: Option<ElementParts>,
}

#[derive(Debug, Default)]
struct ElementParts {
    attributes: RefCell<IndexMap<String, String>>,
    children: RefCell<Vec<Value>>,
}

impl Node {
    pub fn element(tag_name: &str) -> Self {
        Node {
            node_type: ELEMENT_NODE,
            node_name: tag_name.to_ascii_uppercase(),
            data: None,
            element: Some(ElementParts::default()),
        }
    }

    pub fn text(data: &str) -> Self {
        Node {
            node_type: TEXT_NODE,
            node_name: "#text".to_string(),
            data: Some(data.to_string()),
            element: None,
        }
    }

    /// A node with only a discriminator and a name, as foreign hosts sometimes
    /// hand over. Never an element, whatever its type says.
    pub fn bare(node_type: u16, node_name: &str) -> Self {
        Node {
            node_type,
            node_name: node_name.to_string(),
            data: None,
            element: None,
        }
    }

    pub fn node_type(&self) -> u16 {
        self.node_type
    }

    pub fn node_name(&self) -> &str {
        &self.node_name
    }

    pub fn data(&self) -> Option<&str> {
        self.data.as_deref()
    }

    pub fn is_element(&self) -> bool {
        self.node_type == ELEMENT_NODE && self.element.is_some()
    }

    /// Returns false for nodes without attributes.
    pub fn set_attribute(&self, name: &str, value: &str) -> bool {
        match &self.element {
            Some(parts) => {
                parts
                    .attributes
                    .borrow_mut()
                    .insert(name.to_string(), value.to_string());
                true
            }
            None => false,
        }
    }

    pub fn attribute(&self, name: &str) -> Option<String> {
        self.element
            .as_ref()
            .and_then(|parts| parts.attributes.borrow().get(name).cloned())
    }

    /// Returns false for nodes that cannot have children.
    pub fn append_child(&self, child: Value) -> bool {
        match &self.element {
            Some(parts) => {
                parts.children.borrow_mut().push(child);
                true
            }
            None => false,
        }
    }

    pub fn children(&self) -> Vec<Value> {
        self.element
            .as_ref()
            .map(|parts| parts.children.borrow().clone())
            .unwrap_or_default()
    }
}

impl HostObject for Node {
    fn class_name(&self) -> &'static str {
        match self.node_type {
            ELEMENT_NODE => "Element",
            TEXT_NODE => "Text",
            _ => "Node",
        }
    }

    fn as_any(&self) -> &dyn Any {
        self
    }

    fn fmt_notation(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_element() {
            write!(f, "#element[{:?}]", self.node_name.to_ascii_lowercase())
        } else if let Some(data) = &self.data {
            write!(f, "#text[{:?}]", data)
        } else {
            write!(f, "#<node {} {}>", self.node_type, self.node_name)
        }
    }
}

pub fn element(tag_name: &str) -> Value {
    Value::host(Rc::new(Node::element(tag_name)))
}

pub fn text(data: &str) -> Value {
    Value::host(Rc::new(Node::text(data)))
}

/// Recognises [`Node`] elements. Elements are equal only to themselves.
#[derive(Debug, Default, Clone, Copy)]
pub struct DocumentPlatform;

impl DocumentPlatform {
    pub fn new() -> Self {
        DocumentPlatform
    }
}

impl NodePlatform for DocumentPlatform {
    fn is_element_node(&self, value: &Value) -> bool {
        value.as_host().is_some_and(|host| {
            host.as_any()
                .downcast_ref::<Node>()
                .is_some_and(Node::is_element)
        })
    }
}
