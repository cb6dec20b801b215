//! `Surface` over the in-memory fos-dom document

use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use fos_dom::{Document, DomError, DomEvent, Listener, NodeId};

use super::{Surface, SurfaceError, SurfaceResult};
use crate::events::{EventContext, NativeCallback};

/// Rendering surface backed by a shared [`Document`]
#[derive(Debug, Clone)]
pub struct DomSurface {
    document: Arc<Mutex<Document>>,
}

impl DomSurface {
    pub fn new(document: Document) -> Self {
        Self::from_shared(Arc::new(Mutex::new(document)))
    }

    pub fn from_shared(document: Arc<Mutex<Document>>) -> Self {
        Self { document }
    }

    /// Shared document handle
    pub fn document(&self) -> Arc<Mutex<Document>> {
        Arc::clone(&self.document)
    }

    /// Run `f` with the document locked
    pub fn with_document<R>(&self, f: impl FnOnce(&Document) -> R) -> R {
        f(&self.lock())
    }

    /// Deliver an interaction event to the listeners it reaches.
    ///
    /// Listeners run after the document lock is released. Returns the
    /// number of listeners invoked.
    pub fn dispatch(&self, event: DomEvent) -> usize {
        let plan = self.lock().dispatch_plan(&event);
        let count = plan.len();
        for (node, listener) in plan {
            let mut current = event.clone();
            current.current_target = Some(node);
            listener(&current);
        }
        tracing::trace!("dispatched {} on {} to {} listener(s)", event.event_type, event.target, count);
        count
    }

    /// Simulate an interaction on `target`
    pub fn fire(&self, target: NodeId, event_name: &str, args: &[&str]) -> usize {
        self.dispatch(DomEvent::new(event_name, target).with_args(args.iter().copied()))
    }

    fn lock(&self) -> MutexGuard<'_, Document> {
        self.document.lock().unwrap_or_else(|poisoned| {
            tracing::warn!("host document lock poisoned, recovering");
            PoisonError::into_inner(poisoned)
        })
    }
}

fn surface_error(operation: &str, err: DomError) -> SurfaceError {
    match err {
        DomError::NotFound(id) => SurfaceError::PreconditionMissing(format!("{} ({})", id, operation)),
        other => SurfaceError::Unexpected(format!("{}: {}", operation, other)),
    }
}

impl Surface for DomSurface {
    type Handle = NodeId;

    fn root(&self) -> SurfaceResult<NodeId> {
        Ok(self.lock().document_element())
    }

    fn create_node(&self, node_type: &str) -> SurfaceResult<NodeId> {
        self.lock()
            .tree_mut()
            .create_element(node_type)
            .map_err(|e| surface_error("createElement", e))
    }

    fn append_child(&self, parent: &NodeId, child: &NodeId) -> SurfaceResult<()> {
        self.lock()
            .tree_mut()
            .append_child(*parent, *child)
            .map_err(|e| surface_error("appendChild", e))
    }

    fn set_attribute(&self, handle: &NodeId, name: &str, value: &str) -> SurfaceResult<()> {
        let mut doc = self.lock();
        let elem = doc.tree_mut().element_mut(*handle).map_err(|e| surface_error("setAttribute", e))?;
        elem.set_attr(name, value);
        Ok(())
    }

    fn set_inner_content(&self, handle: &NodeId, content: &str) -> SurfaceResult<()> {
        let mut doc = self.lock();
        let elem = doc.tree_mut().element_mut(*handle).map_err(|e| surface_error("innerHTML", e))?;
        elem.inner_html = content.to_string();
        Ok(())
    }

    fn add_class(&self, handle: &NodeId, name: &str) -> SurfaceResult<()> {
        let mut doc = self.lock();
        let elem = doc.tree_mut().element_mut(*handle).map_err(|e| surface_error("classList.add", e))?;
        elem.add_class(name);
        Ok(())
    }

    fn toggle_class(&self, handle: &NodeId, name: &str) -> SurfaceResult<bool> {
        let mut doc = self.lock();
        let elem = doc.tree_mut().element_mut(*handle).map_err(|e| surface_error("classList.toggle", e))?;
        Ok(elem.toggle_class(name))
    }

    fn class_list(&self, handle: &NodeId) -> SurfaceResult<Vec<String>> {
        let doc = self.lock();
        let elem = doc.tree().element(*handle).map_err(|e| surface_error("classList", e))?;
        Ok(elem.classes.iter().map(str::to_string).collect())
    }

    fn scroll_into_view(&self, handle: &NodeId, align_to_top: bool) -> SurfaceResult<()> {
        let doc = self.lock();
        if !doc.tree().is_connected(*handle) {
            return Err(SurfaceError::PreconditionMissing(format!("{} (scrollIntoView)", handle)));
        }
        tracing::debug!("scrollIntoView {} alignToTop={}", handle, align_to_top);
        Ok(())
    }

    fn add_event_listener(
        &self,
        handle: &NodeId,
        event_name: &str,
        callback: NativeCallback<NodeId>,
    ) -> SurfaceResult<()> {
        let listener: Listener = Arc::new(move |event: &DomEvent| {
            callback(EventContext {
                this: event.current_target.unwrap_or(event.target),
                event_name: event.event_type.clone(),
                args: event.args.clone(),
            });
        });
        self.lock()
            .add_event_listener(*handle, event_name, listener)
            .map_err(|e| surface_error("addEventListener", e))
    }

    fn lookup_by_id(&self, identifier: &str) -> SurfaceResult<NodeId> {
        self.lock()
            .get_element_by_id(identifier)
            .ok_or_else(|| SurfaceError::NotFound(identifier.to_string()))
    }

    fn child_count(&self, handle: &NodeId) -> usize {
        self.lock().tree().child_element_count(*handle)
    }

    fn parent(&self, handle: &NodeId) -> Option<NodeId> {
        let doc = self.lock();
        doc.tree()
            .parent(*handle)
            .filter(|p| doc.tree().get(*p).is_some_and(|n| n.is_element()))
    }

    fn identifier(&self, handle: &NodeId) -> Option<String> {
        let doc = self.lock();
        doc.tree().element(*handle).ok().and_then(|e| e.id.clone())
    }

    fn node_type(&self, handle: &NodeId) -> Option<String> {
        let doc = self.lock();
        doc.tree().element(*handle).ok().map(|e| e.tag.clone())
    }

    fn outer_html(&self, handle: &NodeId) -> SurfaceResult<String> {
        self.lock()
            .outer_html(*handle)
            .map_err(|e| surface_error("outerHTML", e))
    }

    fn location_path(&self) -> String {
        self.lock().location_path()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_bootstrap_nodes_are_addressable() {
        let surface = DomSurface::new(Document::new("https://example.com/app"));
        let root = surface.root().unwrap();
        let body = surface.lookup_by_id("body").unwrap();

        assert_eq!(surface.parent(&body), Some(root));
        assert_eq!(surface.parent(&root), None);
        assert_eq!(surface.child_count(&root), 2);
        assert_eq!(surface.identifier(&body).as_deref(), Some("body"));
        assert_eq!(surface.location_path(), "/app");
        assert_eq!(surface.lookup_by_id("nope"), Err(SurfaceError::NotFound("nope".into())));
    }

    #[test]
    fn test_invalid_node_type_is_unexpected() {
        let surface = DomSurface::new(Document::default());
        assert!(matches!(surface.create_node("no spaces"), Err(SurfaceError::Unexpected(_))));
    }

    #[test]
    fn test_native_callback_receives_current_target() {
        let surface = DomSurface::new(Document::default());
        let body = surface.lookup_by_id("body").unwrap();
        let button = surface.create_node("button").unwrap();
        surface.append_child(&body, &button).unwrap();

        let seen = Arc::new(Mutex::new(Vec::new()));
        let log = seen.clone();
        let callback: NativeCallback<NodeId> = Arc::new(move |ctx| {
            log.lock().unwrap().push((ctx.this, ctx.args.clone()));
        });
        surface.add_event_listener(&body, "click", callback).unwrap();

        assert_eq!(surface.fire(button, "click", &["left"]), 1);
        assert_eq!(*seen.lock().unwrap(), vec![(body, vec!["left".to_string()])]);
    }

    #[test]
    fn test_listener_may_reenter_surface() {
        let surface = Arc::new(DomSurface::new(Document::default()));
        let body = surface.lookup_by_id("body").unwrap();
        let hits = Arc::new(AtomicUsize::new(0));

        let inner = surface.clone();
        let counter = hits.clone();
        let callback: NativeCallback<NodeId> = Arc::new(move |ctx| {
            inner.set_attribute(&ctx.this, "data-clicked", "yes").unwrap();
            counter.fetch_add(1, Ordering::SeqCst);
        });
        surface.add_event_listener(&body, "click", callback).unwrap();
        surface.fire(body, "click", &[]);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
        let clicked = surface.with_document(|doc| {
            doc.tree().element(body).unwrap().get_attr("data-clicked").map(str::to_string)
        });
        assert_eq!(clicked.as_deref(), Some("yes"));
    }
}
