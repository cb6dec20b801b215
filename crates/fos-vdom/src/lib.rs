//! fOS VDOM - Shadow Tree Engine
//!
//! Keeps a path-addressed shadow copy of a live rendering surface and
//! routes user interactions back to per-node fulfillments.
//!
//! Nodes are addressed by slash-joined paths of identifiers rooted at
//! `html`. Every mutation goes through [`Vdom::add_element`], which
//! commits records to the shadow tree and mirrors them onto the
//! [`Surface`]. Interaction events land on a single router thread that
//! invokes subscribed fulfillments in arrival order.
//!
//! ```ignore
//! let surface = Arc::new(DomSurface::new(Document::new("https://app.local/")));
//! let vdom = Vdom::builder(surface).title("Counter").build()?;
//! let body = vdom.config().body_path();
//! let report = vdom.add_element([NodeRecord::new("button", &body).with_id("inc")]);
//! vdom.add_event_listener("html/body/inc", "click")?;
//! ```

mod allocator;
mod config;
mod diagnostics;
mod error;
mod events;
mod node;
mod store;
mod vdom;
mod vocabulary;

pub mod path;
pub mod surface;

pub use allocator::{fnv1a_32, Fnv1a32, IdentifierAllocator};
pub use config::EngineConfig;
pub use diagnostics::{DumpEntry, StyleTemplate};
pub use error::{VdomError, VdomResult};
pub use events::{
    EventContext, EventRouter, Fulfillment, NativeCallback, RouterState, RouterStats, SubscriptionId,
};
pub use node::NodeRecord;
pub use store::ShadowTree;
pub use surface::{DomSurface, Surface, SurfaceError, SurfaceHandle, SurfaceResult};
pub use vdom::{BatchReport, Vdom, VdomBuilder};
pub use vocabulary::{EventNames, MethodNames, TagNames, Vocabulary};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
