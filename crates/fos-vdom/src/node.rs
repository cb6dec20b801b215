//! Node Record
//!
//! Shadow representation of one surface node. The parent is referenced by
//! path (a non-owning back-reference); the surface handle is owned by the
//! record once mirrored.

use std::fmt;
use std::sync::Arc;

use crate::events::{EventContext, Fulfillment};
use crate::surface::SurfaceHandle;
use crate::{VdomError, VdomResult};

#[derive(Clone)]
pub struct NodeRecord<H> {
    identifier: String,
    node_type: String,
    initial_text: String,
    parent_path: String,
    classes: Vec<String>,
    handle: Option<H>,
    fulfillment: Option<Fulfillment<H>>,
}

impl<H: fmt::Debug> fmt::Debug for NodeRecord<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NodeRecord")
            .field("identifier", &self.identifier)
            .field("node_type", &self.node_type)
            .field("initial_text", &self.initial_text)
            .field("parent_path", &self.parent_path)
            .field("classes", &self.classes)
            .field("handle", &self.handle)
            .field("fulfillment", &self.fulfillment.is_some())
            .finish()
    }
}

impl<H: SurfaceHandle> NodeRecord<H> {
    /// Candidate record for insertion under `parent_path`. Without
    /// [`with_id`](Self::with_id) the identifier is synthesized on insert.
    pub fn new(node_type: &str, parent_path: &str) -> Self {
        Self {
            identifier: String::new(),
            node_type: node_type.to_string(),
            initial_text: String::new(),
            parent_path: parent_path.to_string(),
            classes: Vec::new(),
            handle: None,
            fulfillment: None,
        }
    }

    /// Record for a node that already lives on the surface; it is
    /// committed without being created again.
    pub fn acquired(identifier: &str, node_type: &str, handle: H) -> Self {
        Self {
            identifier: identifier.to_string(),
            handle: Some(handle),
            ..Self::new(node_type, "")
        }
    }

    pub fn with_id(mut self, identifier: &str) -> Self {
        self.identifier = identifier.to_string();
        self
    }

    pub fn with_parent(mut self, parent_path: &str) -> Self {
        self.parent_path = parent_path.to_string();
        self
    }

    /// Content set once, at creation
    pub fn with_text(mut self, text: &str) -> Self {
        self.initial_text = text.to_string();
        self
    }

    /// Class applied when the node is mirrored
    pub fn with_class(mut self, class: &str) -> Self {
        self.classes.push(class.to_string());
        self
    }

    pub fn with_fulfillment<F>(mut self, fulfillment: F) -> Self
    where
        F: Fn(&EventContext<H>) -> Option<String> + Send + Sync + 'static,
    {
        self.fulfillment = Some(Arc::new(fulfillment));
        self
    }

    pub fn identifier(&self) -> &str {
        &self.identifier
    }

    pub fn node_type(&self) -> &str {
        &self.node_type
    }

    pub fn initial_text(&self) -> &str {
        &self.initial_text
    }

    pub fn parent_path(&self) -> &str {
        &self.parent_path
    }

    pub fn classes(&self) -> &[String] {
        &self.classes
    }

    pub fn is_root(&self) -> bool {
        self.parent_path.is_empty()
    }

    /// Whether the record has a live counterpart
    pub fn is_mirrored(&self) -> bool {
        self.handle.is_some()
    }

    /// Live handle, `PreconditionMissing` when not mirrored
    pub fn handle(&self) -> VdomResult<&H> {
        self.handle
            .as_ref()
            .ok_or_else(|| VdomError::PreconditionMissing(format!("{} has no live handle", self.describe())))
    }

    pub fn fulfillment(&self) -> Option<&Fulfillment<H>> {
        self.fulfillment.as_ref()
    }

    pub(crate) fn set_identifier(&mut self, identifier: String) {
        self.identifier = identifier;
    }

    pub(crate) fn attach(&mut self, handle: H) {
        self.handle = Some(handle);
    }

    pub(crate) fn set_fulfillment(&mut self, fulfillment: Fulfillment<H>) {
        self.fulfillment = Some(fulfillment);
    }

    fn describe(&self) -> String {
        if self.identifier.is_empty() {
            format!("<{}> under {:?}", self.node_type, self.parent_path)
        } else {
            format!("{:?}", self.identifier)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let record: NodeRecord<u32> = NodeRecord::new("div", "html/body")
            .with_id("card")
            .with_text("hello")
            .with_class("a")
            .with_class("b");

        assert_eq!(record.identifier(), "card");
        assert_eq!(record.parent_path(), "html/body");
        assert_eq!(record.initial_text(), "hello");
        assert_eq!(record.classes(), &["a".to_string(), "b".to_string()]);
        assert!(!record.is_mirrored());
        assert!(!record.is_root());
    }

    #[test]
    fn test_handle_requires_mirroring() {
        let record: NodeRecord<u32> = NodeRecord::new("div", "html");
        assert!(matches!(record.handle(), Err(VdomError::PreconditionMissing(_))));

        let acquired = NodeRecord::acquired("body", "body", 4u32).with_parent("html");
        assert_eq!(acquired.handle().unwrap(), &4);
        assert_eq!(acquired.parent_path(), "html");
    }

    #[test]
    fn test_fulfillment_is_callable() {
        let record: NodeRecord<u32> = NodeRecord::new("button", "html/body")
            .with_fulfillment(|ctx| Some(format!("{}!", ctx.event_name)));
        let ctx = EventContext { this: 1, event_name: "click".to_string(), args: Vec::new() };

        let f = record.fulfillment().unwrap();
        assert_eq!(f(&ctx), Some("click!".to_string()));
        assert!(format!("{:?}", record).contains("fulfillment: true"));
    }
}
