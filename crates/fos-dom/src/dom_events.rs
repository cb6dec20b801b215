//! DOM Events
//!
//! Interaction events (click, input, keyup, ...) and the per-node listener
//! table that receives them.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::NodeId;

/// Event listener callback
pub type Listener = Arc<dyn Fn(&DomEvent) + Send + Sync>;

/// Interaction event delivered to listeners
#[derive(Debug, Clone, PartialEq)]
pub struct DomEvent {
    /// Event name, e.g. `click`
    pub event_type: String,
    /// Node the event originated on
    pub target: NodeId,
    /// Node whose listener is currently running
    pub current_target: Option<NodeId>,
    /// Positional payload (key names, input values, ...)
    pub args: Vec<String>,
    pub bubbles: bool,
}

impl DomEvent {
    /// Create an event; bubbling follows the DOM defaults for the type
    pub fn new(event_type: &str, target: NodeId) -> Self {
        Self {
            event_type: event_type.to_string(),
            target,
            current_target: None,
            args: Vec::new(),
            bubbles: Self::type_bubbles(event_type),
        }
    }

    pub fn with_args<I, S>(mut self, args: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.args = args.into_iter().map(Into::into).collect();
        self
    }

    fn type_bubbles(event_type: &str) -> bool {
        !matches!(
            event_type.to_ascii_lowercase().as_str(),
            "focus" | "blur" | "load" | "unload" | "mouseenter" | "mouseleave" | "scroll"
        )
    }
}

/// Listeners keyed by `(node, event type)`, in registration order
#[derive(Default)]
pub struct ListenerTable {
    listeners: HashMap<(NodeId, String), Vec<Listener>>,
}

impl fmt::Debug for ListenerTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ListenerTable")
            .field("keys", &self.listeners.len())
            .field("listeners", &self.len())
            .finish()
    }
}

impl ListenerTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, target: NodeId, event_type: &str, listener: Listener) {
        self.listeners
            .entry((target, event_type.to_string()))
            .or_default()
            .push(listener);
    }

    /// Listeners for one node and event type (cloned handles)
    pub fn get(&self, target: NodeId, event_type: &str) -> Vec<Listener> {
        self.listeners
            .get(&(target, event_type.to_string()))
            .cloned()
            .unwrap_or_default()
    }

    /// Total number of registered listeners
    pub fn len(&self) -> usize {
        self.listeners.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_bubbling_defaults() {
        assert!(DomEvent::new("click", NodeId(1)).bubbles);
        assert!(DomEvent::new("keyup", NodeId(1)).bubbles);
        assert!(!DomEvent::new("focus", NodeId(1)).bubbles);
    }

    #[test]
    fn test_listener_table_keys() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut table = ListenerTable::new();
        let h = hits.clone();
        table.add(NodeId(3), "click", Arc::new(move |_| {
            h.fetch_add(1, Ordering::SeqCst);
        }));

        assert_eq!(table.get(NodeId(3), "click").len(), 1);
        assert!(table.get(NodeId(3), "keyup").is_empty());
        assert!(table.get(NodeId(4), "click").is_empty());

        let event = DomEvent::new("click", NodeId(3)).with_args(["left"]);
        for listener in table.get(NodeId(3), "click") {
            listener(&event);
        }
        assert_eq!(hits.load(Ordering::SeqCst), 1);
        assert_eq!(event.args, vec!["left".to_string()]);
    }
}
