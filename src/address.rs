// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Positional node addresses.
//!
//! An address is the list of child indices leading from a root to a node. It
//! carries no document identity, so an address computed against one tree
//! names the corresponding node in any clone that keeps child order and
//! counts.


use std::fmt;

use indextree::NodeId;

use crate::{dom::Document, error::TreeError};

#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct Address(Vec<usize>);

impl Address {
    /// The empty address, naming the root itself.
    pub fn root() -> Address {
        Address(Vec::new())
    }

    pub fn as_slice(&self) -> &[usize] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Adds a leading component: the addressed subtree became child `index`.
    pub fn nested_under(mut self, index: usize) -> Address {
        self.0.insert(0, index);
        self
    }

    /// Shifts the first component: the addressed siblings were spliced in
    /// after `offset` earlier siblings.
    pub fn shifted(mut self, offset: usize) -> Address {
        if let Some(first) = self.0.first_mut() {
            *first += offset;
        }
        self
    }
}

impl From<Vec<usize>> for Address {
    fn from(path: Vec<usize>) -> Self {
        Address(path)
    }
}

impl FromIterator<usize> for Address {
    fn from_iter<I: IntoIterator<Item = usize>>(iter: I) -> Self {
        Address(iter.into_iter().collect())
    }
}

impl fmt::Display for Address {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str("[")?;
        for (i, index) in self.0.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{}", index)?;
        }
        f.write_str("]")
    }
}

pub fn node_at_address(doc: &Document, root: NodeId, address: &Address) -> Result<NodeId, TreeError> {
    if !doc.contains(root) {
        return Err(TreeError::Removed(root));
    }

    let mut current = root;
    for (depth, &index) in address.as_slice().iter().enumerate() {
        current = doc.child_at(current, index).ok_or_else(|| TreeError::AddressOutOfRange {
            address: address.clone(),
            depth,
            index,
            child_count: doc.child_count(current),
        })?;
    }
    Ok(current)
}

/// Returns `None` when `node` is not `root` or one of its descendants.
pub fn find_node_address(doc: &Document, root: NodeId, node: NodeId) -> Option<Address> {
    let mut path = Vec::new();
    let mut current = node;
    while current != root {
        let parent = doc.parent(current)?;
        path.push(doc.position(current)?);
        current = parent;
    }
    path.reverse();
    Some(Address(path))
}
