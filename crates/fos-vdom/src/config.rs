//! Engine Configuration

/// Engine configuration options
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Identifier (and path) of the root node
    pub root_id: String,

    /// Bootstrap nodes acquired from the surface under the root
    pub head_id: String,
    pub body_id: String,

    /// Identifier of the node holding the application title
    pub title_id: String,

    /// Joins parent path and child count before hashing
    pub id_separator: String,

    /// Apply a parent's initial text to each newly mirrored child as the
    /// `text_attribute` attribute.
    ///
    /// Compatibility risk: the value written is the parent's text, not the
    /// child's own text, although hosts built against the `AppendChild`
    /// behaviour write the child's text under this same condition. Disable
    /// this and set the attribute explicitly where the child's text is
    /// expected.
    pub inherit_parent_text: bool,
    pub text_attribute: String,

    /// Attribute carrying the identifier on the surface
    pub id_attribute: String,

    /// Reject node types and event names outside the vocabulary
    pub enforce_vocabulary: bool,

    /// Name of the event router thread
    pub router_thread_name: String,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            root_id: "html".to_string(),
            head_id: "head".to_string(),
            body_id: "body".to_string(),
            title_id: "title".to_string(),
            id_separator: "-".to_string(),
            inherit_parent_text: true,
            text_attribute: "text".to_string(),
            id_attribute: "id".to_string(),
            enforce_vocabulary: false,
            router_thread_name: "vdom-event-router".to_string(),
        }
    }
}

impl EngineConfig {
    pub fn head_path(&self) -> String {
        crate::path::join(&self.root_id, &self.head_id)
    }

    pub fn body_path(&self) -> String {
        crate::path::join(&self.root_id, &self.body_id)
    }
}
