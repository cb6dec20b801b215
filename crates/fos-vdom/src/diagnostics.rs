//! Diagnostics
//!
//! Tree dumps and a stylesheet skeleton built from the committed records.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use crate::surface::Surface;
use crate::Vdom;

/// One row of a shadow tree snapshot
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DumpEntry {
    pub path: String,
    pub parent_path: String,
    pub identifier: String,
    pub node_type: String,
    pub mirrored: bool,
}

impl fmt::Display for DumpEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} parent={:?} id={} type={} mirrored={}",
            self.path, self.parent_path, self.identifier, self.node_type, self.mirrored
        )
    }
}

/// Stylesheet skeleton: one empty rule per tag, class and identifier
#[derive(Debug, Clone, Default)]
pub struct StyleTemplate {
    tags: BTreeSet<String>,
    /// class -> paths carrying it
    classes: BTreeMap<String, BTreeSet<String>>,
    /// path -> identifier
    identifiers: BTreeMap<String, String>,
}

impl StyleTemplate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_tag(&mut self, tag: &str) {
        if !tag.is_empty() {
            self.tags.insert(tag.to_string());
        }
    }

    pub fn add_class(&mut self, class: &str, path: &str) {
        self.classes
            .entry(class.to_string())
            .or_default()
            .insert(path.to_string());
    }

    pub fn add_identifier(&mut self, path: &str, identifier: &str) {
        self.identifiers.insert(path.to_string(), identifier.to_string());
    }

    /// Tag blocks, then class blocks, then identifier blocks
    pub fn render(&self) -> String {
        let mut out = String::new();
        for tag in &self.tags {
            out.push_str(&tag_block(tag));
        }
        for (class, paths) in &self.classes {
            let paths: Vec<&str> = paths.iter().map(String::as_str).collect();
            out.push_str(&class_block(class, &paths));
        }
        for (path, identifier) in &self.identifiers {
            out.push_str(&id_block(identifier, path));
        }
        out
    }
}

pub fn tag_block(tag: &str) -> String {
    format!("{} {{\n\n}}\n\n", tag)
}

pub fn class_block(class: &str, paths: &[&str]) -> String {
    let mut out = String::new();
    for path in paths {
        out.push_str(&format!("/* {} */\n", path));
    }
    out.push_str(&format!(".{} {{\n\n}}\n\n", class));
    out
}

pub fn id_block(identifier: &str, path: &str) -> String {
    format!("/* {} */\n[id='{}'] {{\n\n}}\n\n", path, identifier)
}

impl<S: Surface> Vdom<S> {
    /// Snapshot of the store in path order
    pub fn dump(&self) -> Vec<DumpEntry> {
        self.lock_tree().dump()
    }

    /// Emit the snapshot through `tracing`
    pub fn log_dump(&self) {
        for entry in self.dump() {
            tracing::info!("{}", entry);
        }
    }

    /// Stylesheet skeleton from node types, live class lists and
    /// identifiers of every committed record
    pub fn style_template(&self) -> String {
        let tree = self.lock_tree();
        let mut template = StyleTemplate::new();
        for (path, record) in tree.records() {
            template.add_tag(record.node_type());
            template.add_identifier(path, record.identifier());
            let Ok(handle) = record.handle() else {
                continue;
            };
            match self.surface().class_list(handle) {
                Ok(classes) => {
                    for class in classes {
                        template.add_class(&class, path);
                    }
                }
                Err(err) => tracing::debug!("no class list for {}: {}", path, err),
            }
        }
        template.render()
    }

    /// Log the stylesheet skeleton and the root's markup
    pub fn log_style_template(&self) {
        tracing::info!("{}", self.style_template());
        let root = self.lock_tree().exists(self.config().root_id.as_str()).and_then(|r| r.handle().cloned());
        match root.map(|h| self.surface().outer_html(&h)) {
            Ok(Ok(html)) => tracing::info!("{}", html),
            Ok(Err(err)) => tracing::warn!("root markup unavailable: {}", err),
            Err(err) => tracing::warn!("root markup unavailable: {}", err),
        }
    }
}
