// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

use indextree::{NodeError, NodeId};
use thiserror::Error;

use crate::address::Address;

/// Structural errors raised by the tree and addressing layer.
///
/// These indicate a broken skeleton/clone contract or a misuse of node
/// handles, never a problem with template data.
#[derive(Error, Debug)]
pub enum TreeError {
    #[error("address {address} out of range: index {index} at depth {depth} but node has {child_count} children")]
    AddressOutOfRange {
        address: Address,
        depth: usize,
        index: usize,
        child_count: usize,
    },

    #[error("node {0:?} has been removed from its document")]
    Removed(NodeId),

    #[error("tree operation failed: {0}")]
    Node(#[from] NodeError),
}
