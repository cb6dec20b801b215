//! Edge case tests for fos-vdom

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use fos_dom::Document;
use fos_vdom::{DomSurface, EngineConfig, NodeRecord, Surface, Vdom, VdomError};

fn engine_with(config: EngineConfig) -> Vdom<DomSurface> {
    let surface = Arc::new(DomSurface::new(Document::default()));
    Vdom::builder(surface).config(config).build().unwrap()
}

fn engine() -> Vdom<DomSurface> {
    engine_with(EngineConfig::default())
}

#[test]
fn test_surface_rejection_leaves_record_detached() {
    let vdom = engine();
    let report = vdom.add_element([NodeRecord::new("bad tag", "html/body").with_id("broken")]);
    assert!(matches!(&report.outcomes()[0], Err(VdomError::Unexpected(_))));

    // Committed but never mirrored.
    assert!(vdom.record("html/body/broken").is_some());
    assert!(matches!(vdom.exists("html/body/broken"), Err(VdomError::DetachedFromSurface(_))));

    let child = vdom.add_element([NodeRecord::new("span", "html/body/broken").with_id("x")]);
    assert!(matches!(&child.outcomes()[0], Err(VdomError::DetachedFromSurface(_))));
}

#[test]
fn test_invalid_identifiers_are_rejected() {
    let vdom = engine();
    for id in ["a/b", ".", ".."] {
        let report = vdom.add_element([NodeRecord::new("div", "html/body").with_id(id)]);
        assert!(
            matches!(&report.outcomes()[0], Err(VdomError::InvalidIdentifier(_))),
            "identifier {:?} should be rejected",
            id
        );
    }
    assert_eq!(vdom.len(), 3);
}

#[test]
fn test_vocabulary_is_enforced_when_enabled() {
    let vdom = engine_with(EngineConfig { enforce_vocabulary: true, ..EngineConfig::default() });

    let report = vdom.add_element([
        NodeRecord::new("marquee", "html/body").with_id("old"),
        NodeRecord::new("button", "html/body").with_id("ok"),
    ]);
    assert!(matches!(
        &report.outcomes()[0],
        Err(VdomError::Unsupported { kind: "node type", name }) if name == "marquee"
    ));
    assert!(report.outcomes()[1].is_ok());

    assert!(matches!(
        vdom.on("html/body/ok", "dblclick", |_| None),
        Err(VdomError::Unsupported { kind: "event", .. })
    ));
    assert!(vdom.on("html/body/ok", "click", |_| None).is_ok());
}

#[test]
fn test_vocabulary_is_advisory_by_default() {
    let vdom = engine();
    let report = vdom.add_element([NodeRecord::new("marquee", "html/body").with_id("old")]);
    assert!(report.is_complete());
    assert!(vdom.on("html/body/old", "dblclick", |_| None).is_ok());
}

#[test]
fn test_parent_text_inheritance_can_be_disabled() {
    let vdom = engine_with(EngineConfig { inherit_parent_text: false, ..EngineConfig::default() });
    vdom.add_element([
        NodeRecord::new("ul", "html/body").with_id("list").with_text("items"),
        NodeRecord::new("li", "html/body/list").with_id("first"),
    ])
    .into_result()
    .unwrap();

    let handle = vdom.surface().lookup_by_id("first").unwrap();
    let inherited = vdom.surface().with_document(|doc| {
        doc.tree().element(handle).unwrap().get_attr("text").map(str::to_string)
    });
    assert_eq!(inherited, None);
}

#[test]
fn test_custom_separator_changes_allocation() {
    let dash = engine();
    let colon = engine_with(EngineConfig { id_separator: ":".to_string(), ..EngineConfig::default() });

    let a = dash.add_element([NodeRecord::new("div", "html/body")]).into_result().unwrap();
    let b = colon.add_element([NodeRecord::new("div", "html/body")]).into_result().unwrap();
    assert_ne!(a, b);
}

#[test]
fn test_siblings_get_distinct_allocated_identifiers() {
    let vdom = engine();
    let paths = vdom
        .add_element([
            NodeRecord::new("li", "html/body"),
            NodeRecord::new("li", "html/body"),
            NodeRecord::new("li", "html/body"),
        ])
        .into_result()
        .unwrap();
    assert_eq!(paths.len(), 3);
    assert_ne!(paths[0], paths[1]);
    assert_ne!(paths[1], paths[2]);
}

#[test]
fn test_get_element_by_id_errors() {
    let vdom = engine();
    assert!(matches!(vdom.get_element_by_id("missing"), Err(VdomError::NotFound(_))));
    assert!(matches!(vdom.get_element_by_id(""), Err(VdomError::InvalidIdentifier(_))));

    let title = vdom.get_element_by_id("title").unwrap();
    assert_eq!(title.node_type(), "title");
    assert!(title.is_mirrored());
}

#[test]
fn test_acquired_record_can_be_committed_once() {
    let vdom = engine();
    let title = vdom.get_element_by_id("title").unwrap().with_parent("html/head");
    assert_eq!(vdom.add_element([title]).into_result().unwrap(), vec!["html/head/title"]);
    // Acquisition does not re-append the live node.
    assert_eq!(vdom.surface().with_document(|doc| doc.tree().child_element_count(doc.head())), 1);

    let again = vdom.get_element_by_id("title").unwrap().with_parent("html/head");
    assert!(matches!(&vdom.add_element([again]).outcomes()[0], Err(VdomError::AlreadyExists(_))));
}

#[test]
fn test_panicking_fulfillment_does_not_stop_router() {
    let vdom = engine();
    vdom.add_element([NodeRecord::new("button", "html/body").with_id("b")]).into_result().unwrap();

    let hits = Arc::new(AtomicUsize::new(0));
    vdom.on("html/body/b", "click", |_| -> Option<String> { panic!("fulfillment failed") }).unwrap();
    let counter = hits.clone();
    vdom.on("html/body/b", "click", move |_| {
        counter.fetch_add(1, Ordering::SeqCst);
        None
    })
    .unwrap();

    let button = vdom.surface().lookup_by_id("b").unwrap();
    vdom.surface().fire(button, "click", &[]);
    vdom.surface().fire(button, "click", &[]);
    vdom.flush_events().unwrap();
    assert_eq!(hits.load(Ordering::SeqCst), 2);
}

#[test]
fn test_fulfillment_may_subscribe_from_router_thread() {
    let vdom = Arc::new(engine());
    vdom.add_element([NodeRecord::new("button", "html/body").with_id("b")]).into_result().unwrap();

    let inner = Arc::downgrade(&vdom);
    vdom.on("html/body/b", "click", move |_| {
        if let Some(vdom) = inner.upgrade() {
            // Flushing from inside the router must not deadlock.
            vdom.flush_events().unwrap();
            vdom.add_class("html/body/b", "clicked").unwrap();
        }
        None
    })
    .unwrap();

    let button = vdom.surface().lookup_by_id("b").unwrap();
    vdom.surface().fire(button, "click", &[]);
    vdom.flush_events().unwrap();
    assert!(vdom.has_class("html/body/b", "clicked").unwrap());
}

#[test]
fn test_events_without_subscribers_are_counted() {
    let vdom = engine();
    vdom.add_element([NodeRecord::new("button", "html/body").with_id("b")]).into_result().unwrap();
    let id = vdom.on("html/body/b", "click", |_| None).unwrap();
    assert!(vdom.unsubscribe(id));

    let button = vdom.surface().lookup_by_id("b").unwrap();
    vdom.surface().fire(button, "click", &[]);
    vdom.flush_events().unwrap();
    assert_eq!(vdom.router().stats().unattributed, 1);
}
