//! fOS DOM - Host Document
//!
//! Arena-backed in-memory document that plays the part of the live
//! rendering surface: elements with attributes, class lists and inner
//! content, `getElementById` lookup and interaction listeners.

mod classlist;
mod document;
mod dom_events;
mod error;
mod node;
mod tree;

pub use classlist::DOMTokenList;
pub use document::Document;
pub use dom_events::{DomEvent, Listener, ListenerTable};
pub use error::{DomError, DomResult};
pub use node::{ElementData, Node, NodeData};
pub use tree::DomTree;

/// Node identifier (index into arena)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub(crate) u32);

impl NodeId {
    /// Document node ID
    pub const ROOT: NodeId = NodeId(0);

    /// Raw arena index
    pub fn index(self) -> usize {
        self.0 as usize
    }
}

impl std::fmt::Display for NodeId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}
