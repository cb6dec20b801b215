//! Shadow Tree Store
//!
//! Path -> record mapping. Invariants held here:
//! - the root is committed at construction and never removed;
//! - a record is committed only under a committed, mirrored parent;
//! - a path is committed at most once.

use std::collections::BTreeMap;

use crate::diagnostics::DumpEntry;
use crate::node::NodeRecord;
use crate::path;
use crate::surface::SurfaceHandle;
use crate::{VdomError, VdomResult};

#[derive(Debug)]
pub struct ShadowTree<H> {
    root_path: String,
    nodes: BTreeMap<String, NodeRecord<H>>,
}

impl<H: SurfaceHandle> ShadowTree<H> {
    /// Bootstrap with the root record, which must already be mirrored
    pub fn new(root: NodeRecord<H>) -> VdomResult<Self> {
        path::validate_identifier(root.identifier())?;
        root.handle()?;
        let root_path = root.identifier().to_string();
        let mut nodes = BTreeMap::new();
        nodes.insert(root_path.clone(), root);
        Ok(Self { root_path, nodes })
    }

    pub fn root_path(&self) -> &str {
        &self.root_path
    }

    /// Resolve a path that is both committed and mirrored
    pub fn exists(&self, path: &str) -> VdomResult<&NodeRecord<H>> {
        match self.nodes.get(path) {
            Some(record) if record.is_mirrored() => Ok(record),
            Some(_) => Err(VdomError::DetachedFromSurface(path.to_string())),
            None => Err(VdomError::NotFound(path.to_string())),
        }
    }

    /// Committed record, mirrored or not
    pub fn get(&self, path: &str) -> Option<&NodeRecord<H>> {
        self.nodes.get(path)
    }

    pub(crate) fn get_mut(&mut self, path: &str) -> Option<&mut NodeRecord<H>> {
        self.nodes.get_mut(path)
    }

    pub fn contains(&self, path: &str) -> bool {
        self.nodes.contains_key(path)
    }

    /// Commit a record under its declared parent and return its path.
    /// The identifier must already be set.
    pub fn commit(&mut self, record: NodeRecord<H>) -> VdomResult<String> {
        path::validate_identifier(record.identifier())?;
        self.exists(record.parent_path())?;

        let path = path::join(record.parent_path(), record.identifier());
        if self.nodes.contains_key(&path) {
            return Err(VdomError::AlreadyExists(path));
        }
        self.nodes.insert(path.clone(), record);
        Ok(path)
    }

    /// Store the live handle of a committed record
    pub(crate) fn attach(&mut self, path: &str, handle: H) -> VdomResult<()> {
        let record = self.nodes.get_mut(path).ok_or_else(|| VdomError::NotFound(path.to_string()))?;
        record.attach(handle);
        Ok(())
    }

    /// Number of committed records, root included
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Never true: the root is always present
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Committed paths in sorted order
    pub fn paths(&self) -> impl Iterator<Item = &str> {
        self.nodes.keys().map(String::as_str)
    }

    pub fn records(&self) -> impl Iterator<Item = (&str, &NodeRecord<H>)> {
        self.nodes.iter().map(|(p, r)| (p.as_str(), r))
    }

    /// Ancestor paths of `path`, nearest first, following the parent
    /// back-references
    pub fn ancestors(&self, path: &str) -> VdomResult<Vec<String>> {
        let mut record = self.get(path).ok_or_else(|| VdomError::NotFound(path.to_string()))?;
        let mut out = Vec::new();
        while !record.is_root() {
            let parent = record.parent_path().to_string();
            record = self.get(&parent).ok_or_else(|| VdomError::NotFound(parent.clone()))?;
            out.push(parent);
        }
        Ok(out)
    }

    /// Rebuild the path of `path` from identifiers alone, walking parent
    /// back-references in memory
    pub fn derive_path(&self, path: &str) -> VdomResult<String> {
        let record = self.get(path).ok_or_else(|| VdomError::NotFound(path.to_string()))?;
        let mut identifiers = vec![record.identifier().to_string()];
        for ancestor in self.ancestors(path)? {
            if let Some(r) = self.get(&ancestor) {
                identifiers.push(r.identifier().to_string());
            }
        }
        identifiers.reverse();
        Ok(identifiers.iter().fold(String::new(), |acc, id| path::join(&acc, id)))
    }

    /// Path of the record owning `handle`
    pub fn find_by_handle(&self, handle: &H) -> Option<&str> {
        self.records()
            .find(|(_, r)| r.handle().ok() == Some(handle))
            .map(|(p, _)| p)
    }

    /// Snapshot in path order
    pub fn dump(&self) -> Vec<DumpEntry> {
        self.records()
            .map(|(path, r)| DumpEntry {
                path: path.to_string(),
                parent_path: r.parent_path().to_string(),
                identifier: r.identifier().to_string(),
                node_type: r.node_type().to_string(),
                mirrored: r.is_mirrored(),
            })
            .collect()
    }
}
