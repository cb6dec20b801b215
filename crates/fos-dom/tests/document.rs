//! Host document tests for fos-dom
//!
//! Listener dispatch order, bubbling and skeleton lookups.

use std::sync::{Arc, Mutex};

use fos_dom::{Document, DomError, DomEvent, Listener};

fn recorder(log: &Arc<Mutex<Vec<String>>>, tag: &'static str) -> Listener {
    let log = log.clone();
    Arc::new(move |event: &DomEvent| {
        log.lock().unwrap().push(format!("{}:{}", tag, event.event_type));
    })
}

#[test]
fn test_dispatch_plan_bubbles_to_ancestors() {
    let mut doc = Document::new("about:blank");
    let body = doc.body();
    let button = doc.tree_mut().create_element("button").unwrap();
    doc.tree_mut().append_child(body, button).unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    doc.add_event_listener(button, "click", recorder(&log, "button")).unwrap();
    doc.add_event_listener(body, "click", recorder(&log, "body")).unwrap();
    doc.add_event_listener(body, "keyup", recorder(&log, "body-key")).unwrap();

    let event = DomEvent::new("click", button);
    let plan = doc.dispatch_plan(&event);
    assert_eq!(plan.iter().map(|(n, _)| *n).collect::<Vec<_>>(), vec![button, body]);

    for (_, listener) in plan {
        listener(&event);
    }
    assert_eq!(*log.lock().unwrap(), vec!["button:click", "body:click"]);
}

#[test]
fn test_dispatch_plan_without_bubbling() {
    let mut doc = Document::new("about:blank");
    let body = doc.body();
    let input = doc.tree_mut().create_element("input").unwrap();
    doc.tree_mut().append_child(body, input).unwrap();

    let log = Arc::new(Mutex::new(Vec::new()));
    doc.add_event_listener(body, "focus", recorder(&log, "body")).unwrap();
    doc.add_event_listener(input, "focus", recorder(&log, "input")).unwrap();

    let plan = doc.dispatch_plan(&DomEvent::new("focus", input));
    assert_eq!(plan.len(), 1);
    assert_eq!(plan[0].0, input);
}

#[test]
fn test_listener_on_unknown_node() {
    let mut doc = Document::new("about:blank");
    let mut bigger = Document::new("about:blank");
    let mut foreign = bigger.body();
    for _ in 0..8 {
        foreign = bigger.tree_mut().create_element("div").unwrap();
    }
    assert!(doc.tree().get(foreign).is_none());

    let log = Arc::new(Mutex::new(Vec::new()));
    let result = doc.add_event_listener(foreign, "click", recorder(&log, "x"));
    assert_eq!(result, Err(DomError::NotFound(foreign)));
    assert_eq!(doc.listener_count(), 0);
}

#[test]
fn test_title_round_trip() {
    let mut doc = Document::new("about:blank");
    let title = doc.get_element_by_id("title").unwrap();
    doc.tree_mut().element_mut(title).unwrap().inner_html = "Counter".to_string();
    assert_eq!(doc.title(), "Counter");
}
