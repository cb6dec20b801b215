//! Rendering surface contract
//!
//! The shadow tree never touches a host document directly; every live-node
//! operation goes through [`Surface`]. [`DomSurface`] implements it over the
//! in-memory `fos-dom` document.

mod dom;

pub use dom::DomSurface;

use std::fmt;
use std::hash::Hash;

use crate::events::NativeCallback;

/// Result type for surface operations
pub type SurfaceResult<T> = Result<T, SurfaceError>;

/// Errors reported by a rendering surface
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SurfaceError {
    #[error("no live node for {0}")]
    NotFound(String),

    /// The surface returned a null/absent result
    #[error("unexpected null from {0}")]
    Unexpected(String),

    /// Handle does not refer to a live node
    #[error("handle {0} is not live")]
    PreconditionMissing(String),
}

/// Opaque reference to a live node
pub trait SurfaceHandle: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

impl<T> SurfaceHandle for T where T: Clone + Eq + Hash + fmt::Debug + Send + Sync + 'static {}

/// Live rendering surface
///
/// Implementations own their interior mutability; all operations take
/// `&self` so one surface can be shared between the engine and the host.
pub trait Surface: Send + Sync {
    type Handle: SurfaceHandle;

    /// Well-known root node. Acquired, never created.
    fn root(&self) -> SurfaceResult<Self::Handle>;

    /// Create a detached node of the given type
    fn create_node(&self, node_type: &str) -> SurfaceResult<Self::Handle>;

    fn append_child(&self, parent: &Self::Handle, child: &Self::Handle) -> SurfaceResult<()>;

    fn set_attribute(&self, handle: &Self::Handle, name: &str, value: &str) -> SurfaceResult<()>;

    /// Replace the node's inner content
    fn set_inner_content(&self, handle: &Self::Handle, content: &str) -> SurfaceResult<()>;

    fn add_class(&self, handle: &Self::Handle, name: &str) -> SurfaceResult<()>;

    /// Toggle a class, returning whether it is now present
    fn toggle_class(&self, handle: &Self::Handle, name: &str) -> SurfaceResult<bool>;

    fn class_list(&self, handle: &Self::Handle) -> SurfaceResult<Vec<String>>;

    fn scroll_into_view(&self, handle: &Self::Handle, align_to_top: bool) -> SurfaceResult<()>;

    /// Register `callback` for `event_name` interactions on `handle`
    fn add_event_listener(
        &self,
        handle: &Self::Handle,
        event_name: &str,
        callback: NativeCallback<Self::Handle>,
    ) -> SurfaceResult<()>;

    /// Find a live node by its surface-visible identifier
    fn lookup_by_id(&self, identifier: &str) -> SurfaceResult<Self::Handle>;

    /// Number of element children
    fn child_count(&self, handle: &Self::Handle) -> usize;

    fn parent(&self, handle: &Self::Handle) -> Option<Self::Handle>;

    /// Surface-visible identifier of the node, if it has one
    fn identifier(&self, handle: &Self::Handle) -> Option<String>;

    fn node_type(&self, handle: &Self::Handle) -> Option<String>;

    /// Serialized markup of the node and its subtree
    fn outer_html(&self, handle: &Self::Handle) -> SurfaceResult<String>;

    /// Current navigation path of the host
    fn location_path(&self) -> String;
}
