// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Compile-once, bind-many markup templates.
//!
//! A source tree with `{dotted.path}` placeholders is compiled into a
//! [`Template`]: a placeholder-free skeleton plus address-tagged updater
//! descriptors. Each instantiation clones the skeleton, binds the descriptors
//! to the clone and returns an updater that re-applies new data in place.

pub mod address;
pub mod dom;
pub mod error;
pub mod literal;
pub mod markup;
pub mod parser;
pub mod process_template;
pub mod template;
pub mod tokenizer;
pub mod updater;
pub mod value;

pub use address::{find_node_address, node_at_address, Address};
pub use dom::Document;
pub use error::TreeError;
pub use indextree::NodeId;
pub use literal::{CacheConfig, CallSite, Renderer, TemplateCache, TemplateResult};
pub use template::{Instance, Template};
pub use tokenizer::{tokenize_text, Token};
pub use updater::{Updater, UpdaterDescriptor};
pub use value::Value;
