//! DOM Node
//!
//! Nodes live in the [`DomTree`](crate::DomTree) arena and refer to each
//! other by [`NodeId`].

use crate::{DOMTokenList, NodeId};

/// DOM Node - Core structure
#[derive(Debug)]
pub struct Node {
    /// Parent node (None for the document and for detached nodes)
    pub parent: Option<NodeId>,
    /// Children in document order
    pub children: Vec<NodeId>,
    /// Node-specific data
    pub data: NodeData,
}

impl Node {
    /// Create a new, detached element node
    pub fn element(tag: &str) -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Element(ElementData::new(tag)),
        }
    }

    /// Create the document node
    pub fn document() -> Self {
        Self {
            parent: None,
            children: Vec::new(),
            data: NodeData::Document,
        }
    }

    #[inline]
    pub fn is_element(&self) -> bool {
        matches!(self.data, NodeData::Element(_))
    }

    /// Get element data if this is an element
    #[inline]
    pub fn as_element(&self) -> Option<&ElementData> {
        match &self.data {
            NodeData::Element(e) => Some(e),
            NodeData::Document => None,
        }
    }

    /// Get mutable element data
    #[inline]
    pub fn as_element_mut(&mut self) -> Option<&mut ElementData> {
        match &mut self.data {
            NodeData::Element(e) => Some(e),
            NodeData::Document => None,
        }
    }
}

/// Node-specific data
#[derive(Debug)]
pub enum NodeData {
    /// Document root
    Document,
    /// Element
    Element(ElementData),
}

/// Element-specific data
#[derive(Debug)]
pub struct ElementData {
    /// Lowercase tag name
    pub tag: String,
    /// Attributes in insertion order
    pub attrs: Vec<Attribute>,
    /// Cached id attribute (very common lookup)
    pub id: Option<String>,
    /// classList
    pub classes: DOMTokenList,
    /// innerHTML, stored verbatim
    pub inner_html: String,
}

impl ElementData {
    pub fn new(tag: &str) -> Self {
        Self {
            tag: tag.to_ascii_lowercase(),
            attrs: Vec::new(),
            id: None,
            classes: DOMTokenList::new(),
            inner_html: String::new(),
        }
    }

    /// Get an attribute value
    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_str())
    }

    /// Set an attribute, keeping the id and class caches in sync
    pub fn set_attr(&mut self, name: &str, value: &str) {
        match name {
            "id" => self.id = Some(value.to_string()),
            "class" => self.classes = DOMTokenList::from_string(value),
            _ => {}
        }
        self.store_attr(name, value.to_string());
    }

    /// Add a class token and mirror it into the `class` attribute
    pub fn add_class(&mut self, token: &str) -> bool {
        let added = self.classes.add(token);
        if added {
            let value = self.classes.value();
            self.store_attr("class", value);
        }
        added
    }

    /// Toggle a class token, returns the new state
    pub fn toggle_class(&mut self, token: &str) -> bool {
        let state = self.classes.toggle(token);
        let value = self.classes.value();
        self.store_attr("class", value);
        state
    }

    fn store_attr(&mut self, name: &str, value: String) {
        if let Some(attr) = self.attrs.iter_mut().find(|a| a.name == name) {
            attr.value = value;
            return;
        }
        self.attrs.push(Attribute { name: name.to_string(), value });
    }
}

/// Attribute
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribute {
    pub name: String,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_id_cache_follows_attribute() {
        let mut elem = ElementData::new("DIV");
        assert_eq!(elem.tag, "div");

        elem.set_attr("id", "main");
        elem.set_attr("id", "other");
        assert_eq!(elem.id.as_deref(), Some("other"));
        assert_eq!(elem.attrs.len(), 1);
    }

    #[test]
    fn test_class_attribute_mirrors_token_list() {
        let mut elem = ElementData::new("span");
        elem.add_class("a");
        elem.add_class("b");
        assert_eq!(elem.get_attr("class"), Some("a b"));

        elem.set_attr("class", "c");
        assert!(elem.classes.contains("c"));
        assert!(!elem.classes.contains("a"));
    }
}
