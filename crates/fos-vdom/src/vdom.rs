//! VDOM engine
//!
//! Owns the shadow tree, the rendering surface and the event router, and
//! runs the mutation protocol that keeps the first two consistent.

use std::collections::HashMap;
use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};

use crate::allocator::IdentifierAllocator;
use crate::config::EngineConfig;
use crate::events::{lock, EventContext, EventRouter, Fulfillment, SubscriptionId};
use crate::node::NodeRecord;
use crate::store::ShadowTree;
use crate::surface::Surface;
use crate::vocabulary::Vocabulary;
use crate::{path, VdomError, VdomResult};

/// Per-record outcome of [`Vdom::add_element`], in input order
#[derive(Debug, Default)]
pub struct BatchReport {
    outcomes: Vec<VdomResult<String>>,
}

impl BatchReport {
    pub fn outcomes(&self) -> &[VdomResult<String>] {
        &self.outcomes
    }

    pub fn len(&self) -> usize {
        self.outcomes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.outcomes.is_empty()
    }

    /// Paths committed by the batch
    pub fn committed(&self) -> Vec<&str> {
        self.outcomes.iter().filter_map(|o| o.as_deref().ok()).collect()
    }

    /// `(input index, error)` for every rejected record
    pub fn failures(&self) -> Vec<(usize, &VdomError)> {
        self.outcomes
            .iter()
            .enumerate()
            .filter_map(|(i, o)| o.as_ref().err().map(|e| (i, e)))
            .collect()
    }

    pub fn is_complete(&self) -> bool {
        self.outcomes.iter().all(Result::is_ok)
    }

    /// All committed paths, or the first failure
    pub fn into_result(self) -> VdomResult<Vec<String>> {
        self.outcomes.into_iter().collect()
    }
}

/// Builder for [`Vdom`]
pub struct VdomBuilder<S: Surface> {
    surface: Arc<S>,
    config: EngineConfig,
    vocabulary: Vocabulary,
    title: Option<String>,
}

impl<S: Surface> VdomBuilder<S> {
    pub fn config(mut self, config: EngineConfig) -> Self {
        self.config = config;
        self
    }

    pub fn vocabulary(mut self, vocabulary: Vocabulary) -> Self {
        self.vocabulary = vocabulary;
        self
    }

    /// Application title written to the title node at startup
    pub fn title(mut self, title: &str) -> Self {
        self.title = Some(title.to_string());
        self
    }

    /// Bootstrap: commit the root, start the router, acquire head and body
    pub fn build(self) -> VdomResult<Vdom<S>> {
        let Self { surface, config, vocabulary, title } = self;

        let root_handle = surface.root()?;
        let root_type = surface.node_type(&root_handle).unwrap_or_else(|| config.root_id.clone());
        let tree = ShadowTree::new(NodeRecord::acquired(&config.root_id, &root_type, root_handle))?;
        let router = EventRouter::start(&config.router_thread_name)?;

        let vdom = Vdom {
            allocator: IdentifierAllocator::new(&config.id_separator),
            surface,
            tree: Arc::new(Mutex::new(tree)),
            router,
            record_bindings: Mutex::new(HashMap::new()),
            config,
            vocabulary,
        };

        if let Some(title) = title {
            vdom.set_title(&title)?;
        }

        let root_path = vdom.config.root_id.clone();
        let head = vdom.get_element_by_id(&vdom.config.head_id)?.with_parent(&root_path);
        let body = vdom.get_element_by_id(&vdom.config.body_id)?.with_parent(&root_path);
        vdom.add_element([head, body]).into_result()?;
        tracing::debug!("acquired {} and {}", vdom.config.head_path(), vdom.config.body_path());

        tracing::info!("vdom ready with root {:?}", root_path);
        Ok(vdom)
    }
}

/// Shadow tree engine bound to one rendering surface
pub struct Vdom<S: Surface> {
    surface: Arc<S>,
    tree: Arc<Mutex<ShadowTree<S::Handle>>>,
    router: EventRouter<S::Handle>,
    /// Subscriptions that follow a record's own fulfillment, per
    /// `(path, event)`
    record_bindings: Mutex<HashMap<(String, String), SubscriptionId>>,
    allocator: IdentifierAllocator,
    config: EngineConfig,
    vocabulary: Vocabulary,
}

impl<S: Surface> fmt::Debug for Vdom<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Vdom")
            .field("nodes", &self.len())
            .field("router", &self.router)
            .field("config", &self.config)
            .finish()
    }
}

impl<S: Surface> Vdom<S> {
    /// Bootstrap with the default configuration
    pub fn new(surface: Arc<S>) -> VdomResult<Self> {
        Self::builder(surface).build()
    }

    pub fn builder(surface: Arc<S>) -> VdomBuilder<S> {
        VdomBuilder {
            surface,
            config: EngineConfig::default(),
            vocabulary: Vocabulary::default(),
            title: None,
        }
    }

    pub fn surface(&self) -> &Arc<S> {
        &self.surface
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn vocabulary(&self) -> &Vocabulary {
        &self.vocabulary
    }

    pub fn router(&self) -> &EventRouter<S::Handle> {
        &self.router
    }

    pub(crate) fn lock_tree(&self) -> MutexGuard<'_, ShadowTree<S::Handle>> {
        lock(&self.tree)
    }

    /// Succeeds only for committed, mirrored paths
    pub fn exists(&self, path: &str) -> VdomResult<()> {
        self.lock_tree().exists(path).map(|_| ())
    }

    /// Copy of the committed record at `path`
    pub fn record(&self, path: &str) -> Option<NodeRecord<S::Handle>> {
        self.lock_tree().get(path).cloned()
    }

    /// Number of committed records, root included
    pub fn len(&self) -> usize {
        self.lock_tree().len()
    }

    pub fn is_empty(&self) -> bool {
        self.lock_tree().is_empty()
    }

    /// Ancestor paths of `path`, nearest first
    pub fn ancestors(&self, path: &str) -> VdomResult<Vec<String>> {
        self.lock_tree().ancestors(path)
    }

    /// Path rebuilt from identifiers through parent back-references
    pub fn derive_path(&self, path: &str) -> VdomResult<String> {
        self.lock_tree().derive_path(path)
    }

    /// Path of a live node, from the identifiers on its surface ancestor
    /// chain (root-most identified ancestor first)
    pub fn surface_path(&self, handle: &S::Handle) -> String {
        let mut identifiers = Vec::new();
        let mut current = Some(handle.clone());
        while let Some(node) = current {
            match self.surface.identifier(&node) {
                Some(id) if !id.is_empty() => identifiers.push(id),
                _ => break,
            }
            current = self.surface.parent(&node);
        }
        identifiers.reverse();
        identifiers.join("/")
    }

    /// Path of the record owning `handle`
    pub fn path_of(&self, handle: &S::Handle) -> Option<String> {
        self.lock_tree().find_by_handle(handle).map(str::to_string)
    }

    /// Mutation protocol. Records are processed in order under one lock
    /// acquisition; a failing record is reported and skipped.
    pub fn add_element<I>(&self, records: I) -> BatchReport
    where
        I: IntoIterator<Item = NodeRecord<S::Handle>>,
    {
        let mut tree = self.lock_tree();
        let mut report = BatchReport::default();
        for (index, record) in records.into_iter().enumerate() {
            let outcome = self.insert_one(&mut tree, record);
            match &outcome {
                Ok(path) => tracing::debug!("committed {}", path),
                Err(err) => tracing::warn!("element {} of batch rejected: {}", index, err),
            }
            report.outcomes.push(outcome);
        }
        report
    }

    fn insert_one(&self, tree: &mut ShadowTree<S::Handle>, mut record: NodeRecord<S::Handle>) -> VdomResult<String> {
        if self.config.enforce_vocabulary && !self.vocabulary.is_supported_tag(record.node_type()) {
            return Err(VdomError::Unsupported { kind: "node type", name: record.node_type().to_string() });
        }

        let parent = tree.exists(record.parent_path())?;
        let parent_handle = parent.handle()?.clone();
        let parent_text = parent.initial_text().to_string();

        if record.identifier().is_empty() {
            let count = self.surface.child_count(&parent_handle);
            let identifier = self.allocator.allocate(record.parent_path(), count);
            record.set_identifier(identifier);
        }

        let acquired = record.is_mirrored();
        let path = tree.commit(record)?;
        if !acquired {
            self.mirror(tree, &path, &parent_handle, &parent_text)
                .inspect_err(|err| tracing::error!("mirroring {} failed: {}", path, err))?;
        }
        Ok(path)
    }

    /// Create the live node for a committed record and tag it
    fn mirror(
        &self,
        tree: &mut ShadowTree<S::Handle>,
        path: &str,
        parent_handle: &S::Handle,
        parent_text: &str,
    ) -> VdomResult<()> {
        let record = tree.get(path).ok_or_else(|| VdomError::NotFound(path.to_string()))?;
        let node_type = record.node_type().to_string();
        let identifier = record.identifier().to_string();
        let text = record.initial_text().to_string();
        let classes = record.classes().to_vec();

        let handle = self.surface.create_node(&node_type)?;
        self.surface.append_child(parent_handle, &handle)?;
        tree.attach(path, handle.clone())?;

        self.surface.set_attribute(&handle, &self.config.id_attribute, &identifier)?;
        if !text.is_empty() {
            self.surface.set_inner_content(&handle, &text)?;
        }
        for class in &classes {
            self.surface.add_class(&handle, class)?;
        }
        if self.config.inherit_parent_text && !parent_text.is_empty() {
            self.surface.set_attribute(&handle, &self.config.text_attribute, parent_text)?;
        }
        Ok(())
    }

    fn live_handle(&self, path: &str) -> VdomResult<S::Handle> {
        let tree = self.lock_tree();
        Ok(tree.exists(path)?.handle()?.clone())
    }

    /// Set an attribute on the live node; the record is unchanged
    pub fn set_attribute(&self, path: &str, name: &str, value: &str) -> VdomResult<()> {
        let handle = self.live_handle(path)?;
        self.surface.set_attribute(&handle, name, value)?;
        Ok(())
    }

    pub fn add_class(&self, path: &str, class: &str) -> VdomResult<()> {
        let handle = self.live_handle(path)?;
        self.surface.add_class(&handle, class)?;
        Ok(())
    }

    /// Returns whether the class is present afterwards
    pub fn toggle_class(&self, path: &str, class: &str) -> VdomResult<bool> {
        let handle = self.live_handle(path)?;
        Ok(self.surface.toggle_class(&handle, class)?)
    }

    pub fn has_class(&self, path: &str, class: &str) -> VdomResult<bool> {
        let handle = self.live_handle(path)?;
        Ok(self.surface.class_list(&handle)?.iter().any(|c| c == class))
    }

    pub fn class_list(&self, path: &str) -> VdomResult<Vec<String>> {
        let handle = self.live_handle(path)?;
        Ok(self.surface.class_list(&handle)?)
    }

    pub fn set_inner_content(&self, path: &str, content: &str) -> VdomResult<()> {
        let handle = self.live_handle(path)?;
        self.surface.set_inner_content(&handle, content)?;
        Ok(())
    }

    pub fn scroll_into_view(&self, path: &str, align_to_top: bool) -> VdomResult<()> {
        let handle = self.live_handle(path)?;
        self.surface.scroll_into_view(&handle, align_to_top)?;
        Ok(())
    }

    /// Replace the fulfillment of a committed record
    pub fn set_fulfillment<F>(&self, path: &str, fulfillment: F) -> VdomResult<()>
    where
        F: Fn(&EventContext<S::Handle>) -> Option<String> + Send + Sync + 'static,
    {
        let mut tree = self.lock_tree();
        let record = tree.get_mut(path).ok_or_else(|| VdomError::NotFound(path.to_string()))?;
        record.set_fulfillment(Arc::new(fulfillment));
        Ok(())
    }

    /// Route `event_name` interactions on `path` to the record's own
    /// fulfillment. The fulfillment is looked up when each event arrives,
    /// so a later [`Vdom::set_fulfillment`] takes effect. Binding the same
    /// pair again returns the existing subscription.
    pub fn add_event_listener(&self, path: &str, event_name: &str) -> VdomResult<SubscriptionId> {
        let mut bindings = lock(&self.record_bindings);
        let key = (path.to_string(), event_name.to_string());
        if let Some(id) = bindings.get(&key) {
            return Ok(*id);
        }

        if self.lock_tree().exists(path)?.fulfillment().is_none() {
            return Err(VdomError::PreconditionMissing(format!("{} has no fulfillment", path)));
        }
        let id = self.subscribe(path, event_name, self.record_fulfillment(path))?;
        bindings.insert(key, id);
        Ok(id)
    }

    /// Fulfillment that forwards to whatever the record at `path` holds
    /// at dispatch time
    fn record_fulfillment(&self, path: &str) -> Fulfillment<S::Handle> {
        let tree = Arc::downgrade(&self.tree);
        let owner = path.to_string();
        Arc::new(move |ctx: &EventContext<S::Handle>| -> Option<String> {
            let tree = tree.upgrade()?;
            let current = lock(&tree).get(&owner).and_then(|r| r.fulfillment().cloned());
            match current {
                Some(fulfillment) => fulfillment(ctx),
                None => {
                    tracing::debug!("{} on {} has no fulfillment", ctx.event_name, owner);
                    None
                }
            }
        })
    }

    /// Route `event_name` interactions on `path` to `callback`
    pub fn on<F>(&self, path: &str, event_name: &str, callback: F) -> VdomResult<SubscriptionId>
    where
        F: Fn(&EventContext<S::Handle>) -> Option<String> + Send + Sync + 'static,
    {
        self.subscribe(path, event_name, Arc::new(callback))
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        lock(&self.record_bindings).retain(|_, bound| *bound != id);
        self.router.unsubscribe(id)
    }

    fn subscribe(
        &self,
        path: &str,
        event_name: &str,
        fulfillment: Fulfillment<S::Handle>,
    ) -> VdomResult<SubscriptionId> {
        if self.config.enforce_vocabulary && !self.vocabulary.is_supported_event(event_name) {
            return Err(VdomError::Unsupported { kind: "event", name: event_name.to_string() });
        }

        // Held across the surface call so one (node, event) pair is bound once.
        let tree = self.lock_tree();
        let handle = tree.exists(path)?.handle()?.clone();
        if !self.router.is_bound(&handle, event_name) {
            self.surface.add_event_listener(&handle, event_name, self.router.native_callback())?;
            self.router.mark_bound(handle.clone(), event_name);
        }
        Ok(self.router.subscribe(handle, event_name, fulfillment))
    }

    /// Acquire an existing surface node as a record (no parent set yet)
    pub fn get_element_by_id(&self, identifier: &str) -> VdomResult<NodeRecord<S::Handle>> {
        path::validate_identifier(identifier)?;
        let handle = self.surface.lookup_by_id(identifier)?;
        let node_type = self
            .surface
            .node_type(&handle)
            .ok_or_else(|| VdomError::Unexpected(format!("node type of {}", identifier)))?;
        Ok(NodeRecord::acquired(identifier, &node_type, handle))
    }

    /// Write the application title into the title node
    pub fn set_title(&self, title: &str) -> VdomResult<()> {
        let handle = self.surface.lookup_by_id(&self.config.title_id)?;
        self.surface.set_inner_content(&handle, title)?;
        Ok(())
    }

    /// Navigation path reported by the surface
    pub fn current_location(&self) -> String {
        self.surface.location_path()
    }

    /// Wait until every event delivered so far has been processed
    pub fn flush_events(&self) -> VdomResult<()> {
        self.router.flush()
    }

    /// Stop the event router after draining queued events
    pub fn shutdown(&self) {
        self.router.shutdown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_batch_report_accessors() {
        let report = BatchReport {
            outcomes: vec![
                Ok("html/a".to_string()),
                Err(VdomError::NotFound("html/x".to_string())),
                Ok("html/b".to_string()),
            ],
        };
        assert_eq!(report.len(), 3);
        assert_eq!(report.committed(), vec!["html/a", "html/b"]);
        assert_eq!(report.failures().len(), 1);
        assert_eq!(report.failures()[0].0, 1);
        assert!(!report.is_complete());
        assert!(matches!(report.into_result(), Err(VdomError::NotFound(_))));
    }
}
