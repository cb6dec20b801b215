//! Concurrent mutation tests for fos-vdom

use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;

use fos_dom::Document;
use fos_vdom::{DomSurface, NodeRecord, Surface, Vdom};

#[test]
fn test_concurrent_batches_get_unique_paths() {
    let surface = Arc::new(DomSurface::new(Document::default()));
    let vdom = Arc::new(Vdom::new(surface).unwrap());

    let workers: Vec<_> = (0..8)
        .map(|_| {
            let vdom = Arc::clone(&vdom);
            thread::spawn(move || {
                let records = (0..25).map(|_| NodeRecord::new("li", "html/body"));
                vdom.add_element(records).into_result().unwrap()
            })
        })
        .collect();

    let mut paths = HashSet::new();
    for worker in workers {
        for path in worker.join().unwrap() {
            assert!(paths.insert(path), "duplicate path allocated");
        }
    }

    assert_eq!(paths.len(), 200);
    assert_eq!(vdom.len(), 203);
    let body = vdom.surface().lookup_by_id("body").unwrap();
    assert_eq!(vdom.surface().child_count(&body), 200);
}

#[test]
fn test_concurrent_readers_see_committed_records() {
    let surface = Arc::new(DomSurface::new(Document::default()));
    let vdom = Arc::new(Vdom::new(surface).unwrap());
    vdom.add_element([NodeRecord::new("div", "html/body").with_id("shared")]).into_result().unwrap();

    let readers: Vec<_> = (0..4)
        .map(|i| {
            let vdom = Arc::clone(&vdom);
            thread::spawn(move || {
                for j in 0..20 {
                    vdom.exists("html/body/shared").unwrap();
                    vdom.set_attribute("html/body/shared", &format!("data-r{}", i), &j.to_string()).unwrap();
                }
            })
        })
        .collect();
    for reader in readers {
        reader.join().unwrap();
    }

    assert_eq!(vdom.derive_path("html/body/shared").unwrap(), "html/body/shared");
}

#[test]
fn test_readers_never_observe_partial_batches() {
    const WRITERS: usize = 4;
    const BATCHES: usize = 20;
    const BATCH_LEN: usize = 4;

    let surface = Arc::new(DomSurface::new(Document::default()));
    let vdom = Arc::new(Vdom::new(surface).unwrap());
    let done = Arc::new(AtomicBool::new(false));

    let batch_paths = |writer: usize, batch: usize| -> Vec<String> {
        (0..BATCH_LEN).map(|n| format!("html/body/w{}-b{}-n{}", writer, batch, n)).collect()
    };

    let check = {
        let vdom = Arc::clone(&vdom);
        move || {
            let present: HashSet<String> = vdom.dump().into_iter().map(|e| e.path).collect();
            for writer in 0..WRITERS {
                for batch in 0..BATCHES {
                    let found = batch_paths(writer, batch).iter().filter(|p| present.contains(*p)).count();
                    assert!(
                        found == 0 || found == BATCH_LEN,
                        "batch w{}-b{} half visible: {} of {}",
                        writer,
                        batch,
                        found,
                        BATCH_LEN
                    );
                }
            }
            present.len()
        }
    };

    let reader = {
        let done = Arc::clone(&done);
        let check = check.clone();
        thread::spawn(move || {
            let mut snapshots = 0;
            loop {
                let finished = done.load(Ordering::SeqCst);
                check();
                snapshots += 1;
                if finished {
                    break snapshots;
                }
            }
        })
    };

    let writers: Vec<_> = (0..WRITERS)
        .map(|writer| {
            let vdom = Arc::clone(&vdom);
            thread::spawn(move || {
                for batch in 0..BATCHES {
                    let records = (0..BATCH_LEN).map(|n| {
                        NodeRecord::new("li", "html/body").with_id(&format!("w{}-b{}-n{}", writer, batch, n))
                    });
                    vdom.add_element(records).into_result().unwrap();
                }
            })
        })
        .collect();
    for writer in writers {
        writer.join().unwrap();
    }
    done.store(true, Ordering::SeqCst);

    assert!(reader.join().unwrap() > 0);
    assert_eq!(check(), 3 + WRITERS * BATCHES * BATCH_LEN);
}
