//! Example: click counter on the in-memory document
//!
//! Run with `RUST_LOG=fos_vdom=debug` to see the mutation protocol.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use fos_dom::Document;
use fos_vdom::{DomSurface, NodeRecord, Surface, Vdom};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let surface = Arc::new(DomSurface::new(Document::new("https://counter.local/")));
    let vdom = Vdom::builder(Arc::clone(&surface)).title("Counter").build()?;
    println!("fOS VDOM v{} ready at {}", fos_vdom::VERSION, vdom.current_location());

    let count = Arc::new(AtomicU64::new(0));
    let body = vdom.config().body_path();
    let clicks = Arc::clone(&count);
    let paths = vdom
        .add_element([
            NodeRecord::new("section", &body).with_id("panel").with_class("card"),
            NodeRecord::new("span", &format!("{}/panel", body)).with_id("value").with_text("0"),
            NodeRecord::new("button", &format!("{}/panel", body))
                .with_id("inc")
                .with_text("+1")
                .with_fulfillment(move |ctx| {
                    let n = clicks.fetch_add(1, Ordering::SeqCst) + 1;
                    tracing::info!("{} #{} on {:?}", ctx.event_name, n, ctx.this);
                    Some(n.to_string())
                }),
        ])
        .into_result()?;
    println!("committed {:?}", paths);

    vdom.add_event_listener("html/body/panel/inc", "click")?;

    let button = surface.lookup_by_id("inc")?;
    for _ in 0..3 {
        surface.fire(button, "click", &[]);
    }
    vdom.flush_events()?;

    let total = count.load(Ordering::SeqCst);
    vdom.set_inner_content("html/body/panel/value", &total.to_string())?;
    println!("clicked {} times", total);

    vdom.log_dump();
    vdom.log_style_template();

    vdom.shutdown();
    Ok(())
}
