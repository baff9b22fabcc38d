// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Arena-backed document tree.
//!
//! Uses `indextree` for node storage. A `Document` owns every node created
//! through it; `NodeId`s are plain handles and never keep nodes alive.

use hashlink::LinkedHashMap;
use indextree::{Arena, NodeId};

use crate::error::TreeError;

#[derive(Clone, Debug, PartialEq)]
pub enum NodeData {
    Element(ElementData),
    Text(String),
    Comment(String),
    Fragment,
}

#[derive(Clone, Debug, PartialEq)]
pub struct ElementData {
    pub tag: String,
    pub namespace: Option<String>,
    pub attributes: LinkedHashMap<String, String>,
}

#[derive(Debug, Default)]
pub struct Document {
    arena: Arena<NodeData>,
}

impl Document {
    pub fn new() -> Document {
        Document { arena: Arena::new() }
    }

    pub fn create_element(&mut self, tag: &str) -> NodeId {
        self.create_element_ns(None, tag)
    }

    pub fn create_element_ns(&mut self, namespace: Option<&str>, tag: &str) -> NodeId {
        let element = ElementData {
            tag: tag.to_string(),
            namespace: namespace.map(str::to_string),
            attributes: LinkedHashMap::new(),
        };
        self.arena.new_node(NodeData::Element(element))
    }

    pub fn create_text(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData::Text(text.to_string()))
    }

    pub fn create_comment(&mut self, text: &str) -> NodeId {
        self.arena.new_node(NodeData::Comment(text.to_string()))
    }

    pub fn create_fragment(&mut self) -> NodeId {
        self.arena.new_node(NodeData::Fragment)
    }

    /// Returns the node's data, or `None` if the handle was removed.
    pub fn get(&self, node: NodeId) -> Option<&NodeData> {
        if node.is_removed(&self.arena) {
            return None;
        }
        self.arena.get(node).map(|n| n.get())
    }

    fn get_mut(&mut self, node: NodeId) -> Option<&mut NodeData> {
        if node.is_removed(&self.arena) {
            return None;
        }
        self.arena.get_mut(node).map(|n| n.get_mut())
    }

    pub fn contains(&self, node: NodeId) -> bool {
        self.get(node).is_some()
    }

    pub fn parent(&self, node: NodeId) -> Option<NodeId> {
        if node.is_removed(&self.arena) {
            return None;
        }
        self.arena.get(node).and_then(|n| n.parent())
    }

    pub fn children(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.children(&self.arena)
    }

    pub fn child_count(&self, node: NodeId) -> usize {
        self.children(node).count()
    }

    pub fn child_at(&self, node: NodeId, index: usize) -> Option<NodeId> {
        self.children(node).nth(index)
    }

    /// Position of `node` among its parent's children.
    pub fn position(&self, node: NodeId) -> Option<usize> {
        let parent = self.parent(node)?;
        self.children(parent).position(|child| child == node)
    }

    /// The node and all of its descendants in document order.
    pub fn descendants(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        node.descendants(&self.arena)
    }

    /// Appends `child` to `parent`. Appending a fragment moves the fragment's
    /// children instead, leaving the fragment empty.
    pub fn append(&mut self, parent: NodeId, child: NodeId) -> Result<(), TreeError> {
        for node in [parent, child] {
            if !self.contains(node) {
                return Err(TreeError::Removed(node));
            }
        }

        if let Some(NodeData::Fragment) = self.get(child) {
            let spliced: Vec<NodeId> = self.children(child).collect();
            for node in spliced {
                node.detach(&mut self.arena);
                parent.checked_append(node, &mut self.arena)?;
            }
            return Ok(());
        }

        child.detach(&mut self.arena);
        parent.checked_append(child, &mut self.arena)?;
        Ok(())
    }

    /// Puts `replacement` where `old` is and removes `old` with its subtree.
    pub fn replace_child(&mut self, old: NodeId, replacement: NodeId) -> Result<(), TreeError> {
        for node in [old, replacement] {
            if !self.contains(node) {
                return Err(TreeError::Removed(node));
            }
        }
        replacement.detach(&mut self.arena);
        old.checked_insert_before(replacement, &mut self.arena)?;
        old.remove_subtree(&mut self.arena);
        Ok(())
    }

    pub fn clear_children(&mut self, node: NodeId) {
        let children: Vec<NodeId> = self.children(node).collect();
        for child in children {
            child.remove_subtree(&mut self.arena);
        }
    }

    /// Removes the node and its whole subtree from the document.
    pub fn remove(&mut self, node: NodeId) {
        if self.contains(node) {
            node.remove_subtree(&mut self.arena);
        }
    }

    pub fn attribute(&self, node: NodeId, name: &str) -> Option<&str> {
        match self.get(node)? {
            NodeData::Element(element) => element.attributes.get(name).map(String::as_str),
            _ => None,
        }
    }

    /// Returns `false` when the node is gone or is not an element.
    pub fn set_attribute(&mut self, node: NodeId, name: &str, value: &str) -> bool {
        match self.get_mut(node) {
            Some(NodeData::Element(element)) => {
                match element.attributes.get_mut(name) {
                    Some(current) => {
                        current.clear();
                        current.push_str(value);
                    }
                    None => {
                        element.attributes.insert(name.to_string(), value.to_string());
                    }
                }
                true
            }
            _ => false,
        }
    }

    /// Content of a text or comment node.
    pub fn text(&self, node: NodeId) -> Option<&str> {
        match self.get(node)? {
            NodeData::Text(text) | NodeData::Comment(text) => Some(text),
            _ => None,
        }
    }

    /// Returns `false` when the node is gone or holds no text.
    pub fn set_text(&mut self, node: NodeId, text: &str) -> bool {
        match self.get_mut(node) {
            Some(NodeData::Text(current)) | Some(NodeData::Comment(current)) => {
                current.clear();
                current.push_str(text);
                true
            }
            _ => false,
        }
    }

    /// Concatenated text of every text node under `node`.
    pub fn text_content(&self, node: NodeId) -> String {
        self.descendants(node)
            .filter_map(|n| match self.get(n) {
                Some(NodeData::Text(text)) => Some(text.as_str()),
                _ => None,
            })
            .collect()
    }

    pub fn clone_node(&mut self, node: NodeId, deep: bool) -> Option<NodeId> {
        let data = self.get(node)?.clone();
        let copy = self.arena.new_node(data);
        if deep {
            let children: Vec<NodeId> = self.children(node).collect();
            for child in children {
                if let Some(child_copy) = self.clone_node(child, true) {
                    copy.append(child_copy, &mut self.arena);
                }
            }
        }
        Some(copy)
    }

    /// Copies a node (and, if `deep`, its subtree) out of another document.
    pub fn import_node(&mut self, source: &Document, node: NodeId, deep: bool) -> Option<NodeId> {
        let data = source.get(node)?.clone();
        let copy = self.arena.new_node(data);
        if deep {
            for child in source.children(node) {
                if let Some(child_copy) = self.import_node(source, child, true) {
                    copy.append(child_copy, &mut self.arena);
                }
            }
        }
        Some(copy)
    }

    // Only for freshly created nodes that cannot form a cycle.
    pub(crate) fn push_child(&mut self, parent: NodeId, child: NodeId) {
        parent.append(child, &mut self.arena);
    }
}
