//! Document - High-level document API

use url::Url;

use crate::{DomError, DomEvent, DomResult, DomTree, Listener, ListenerTable, NodeData, NodeId};

/// HTML Document
///
/// Created with the `html > (head > title), body` skeleton already in
/// place; each of those elements carries its tag name as `id` so it can be
/// acquired through [`Document::get_element_by_id`].
#[derive(Debug)]
pub struct Document {
    /// The DOM tree
    pub tree: DomTree,
    /// Document URL
    url: String,
    /// Interaction listeners
    listeners: ListenerTable,
    html_element: NodeId,
    head_element: NodeId,
    body_element: NodeId,
    title_element: NodeId,
}

impl Document {
    /// Create a new document with the basic structure
    pub fn new(url: &str) -> Self {
        let mut tree = DomTree::new();
        let html = Self::skeleton_element(&mut tree, NodeId::ROOT, "html");
        let head = Self::skeleton_element(&mut tree, html, "head");
        let title = Self::skeleton_element(&mut tree, head, "title");
        let body = Self::skeleton_element(&mut tree, html, "body");

        Self {
            tree,
            url: url.to_string(),
            listeners: ListenerTable::new(),
            html_element: html,
            head_element: head,
            body_element: body,
            title_element: title,
        }
    }

    fn skeleton_element(tree: &mut DomTree, parent: NodeId, tag: &str) -> NodeId {
        let mut node = crate::Node::element(tag);
        if let Some(elem) = node.as_element_mut() {
            elem.set_attr("id", tag);
        }
        tree.push_child(parent, node)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    /// Path component of the document URL (`location.pathname`)
    pub fn location_path(&self) -> String {
        match Url::parse(&self.url) {
            Ok(url) if !url.cannot_be_a_base() => url.path().to_string(),
            _ => "/".to_string(),
        }
    }

    /// Text of the `<title>` element
    pub fn title(&self) -> String {
        self.tree
            .element(self.title_element)
            .map(|e| e.inner_html.clone())
            .unwrap_or_default()
    }

    /// Get `<html>` element
    pub fn document_element(&self) -> NodeId {
        self.html_element
    }

    pub fn head(&self) -> NodeId {
        self.head_element
    }

    pub fn body(&self) -> NodeId {
        self.body_element
    }

    /// Get element by ID
    pub fn get_element_by_id(&self, id: &str) -> Option<NodeId> {
        self.tree.find_by_id(id)
    }

    pub fn tree(&self) -> &DomTree {
        &self.tree
    }

    pub fn tree_mut(&mut self) -> &mut DomTree {
        &mut self.tree
    }

    /// Register an interaction listener on `target`
    pub fn add_event_listener(&mut self, target: NodeId, event_type: &str, listener: Listener) -> DomResult<()> {
        self.tree.get(target).ok_or(DomError::NotFound(target))?;
        self.listeners.add(target, event_type, listener);
        Ok(())
    }

    /// Listeners an event reaches, in dispatch order: the target first,
    /// then each ancestor when the event bubbles.
    ///
    /// The caller invokes them; keeping invocation outside the document
    /// lets listeners call back into it.
    pub fn dispatch_plan(&self, event: &DomEvent) -> Vec<(NodeId, Listener)> {
        let mut plan = Vec::new();
        let mut current = Some(event.target);
        while let Some(node) = current {
            for listener in self.listeners.get(node, &event.event_type) {
                plan.push((node, listener));
            }
            if !event.bubbles {
                break;
            }
            current = self.tree.parent(node);
        }
        plan
    }

    /// Number of registered interaction listeners
    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Serialize `id` and its subtree (`outerHTML`)
    pub fn outer_html(&self, id: NodeId) -> DomResult<String> {
        let mut out = String::new();
        self.write_html(id, &mut out)?;
        Ok(out)
    }

    fn write_html(&self, id: NodeId, out: &mut String) -> DomResult<()> {
        let node = self.tree.get(id).ok_or(DomError::NotFound(id))?;
        match &node.data {
            NodeData::Document => {
                for &child in &node.children {
                    self.write_html(child, out)?;
                }
            }
            NodeData::Element(elem) => {
                out.push('<');
                out.push_str(&elem.tag);
                for attr in &elem.attrs {
                    out.push_str(&format!(" {}=\"{}\"", attr.name, attr.value.replace('"', "&quot;")));
                }
                out.push('>');
                out.push_str(&elem.inner_html);
                for &child in &node.children {
                    self.write_html(child, out)?;
                }
                out.push_str(&format!("</{}>", elem.tag));
            }
        }
        Ok(())
    }
}

impl Default for Document {
    fn default() -> Self {
        Self::new("about:blank")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_skeleton_is_addressable() {
        let doc = Document::new("https://example.com/app/index.html?x=1#top");
        assert_eq!(doc.get_element_by_id("head"), Some(doc.head()));
        assert_eq!(doc.get_element_by_id("body"), Some(doc.body()));
        assert_eq!(doc.get_element_by_id("html"), Some(doc.document_element()));
        assert_eq!(doc.tree().child_element_count(doc.document_element()), 2);
        assert_eq!(doc.location_path(), "/app/index.html");
    }

    #[test]
    fn test_location_path_defaults() {
        assert_eq!(Document::default().location_path(), "/");
        assert_eq!(Document::new("https://example.com").location_path(), "/");
    }

    #[test]
    fn test_outer_html() {
        let mut doc = Document::new("about:blank");
        let p = doc.tree_mut().create_element("p").unwrap();
        doc.tree_mut().element_mut(p).unwrap().inner_html = "hi".to_string();
        let body = doc.body();
        doc.tree_mut().append_child(body, p).unwrap();

        assert_eq!(doc.outer_html(body).unwrap(), "<body id=\"body\"><p>hi</p></body>");
    }
}
