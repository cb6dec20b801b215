//! DOM operation errors

use crate::NodeId;

/// Result type for DOM operations
pub type DomResult<T> = Result<T, DomError>;

/// DOM operation errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DomError {
    /// Node not found in the arena
    #[error("node not found: {0}")]
    NotFound(NodeId),

    /// Hierarchy error (e.g. appending an ancestor to its descendant)
    #[error("hierarchy request error: cannot append {child} to {parent}")]
    HierarchyRequest { parent: NodeId, child: NodeId },

    /// Operation only valid on elements
    #[error("node {0} is not an element")]
    NotAnElement(NodeId),

    /// Tag name rejected at creation
    #[error("invalid tag name: {0:?}")]
    InvalidTagName(String),
}
