// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! Updaters re-apply data to the nodes of one template instance.
//!
//! An `UpdaterDescriptor` is the dehydrated, data-independent form produced by
//! the parser. `create_updater` resolves its address once against an instance
//! root and yields an `Updater` that holds the node handle directly.

#[cfg(test)]
mod tests;

use std::fmt;

use indextree::NodeId;
use tracing::{trace, warn};

use crate::{
    address::{node_at_address, Address},
    dom::Document,
    error::TreeError,
    tokenizer::Token,
    value::Value,
};

#[derive(Clone, Debug, PartialEq)]
pub enum UpdaterKind {
    TextContent { expression: String },
    AttributeValue { name: String, tokens: Vec<Token> },
}

#[derive(Clone, Debug, PartialEq)]
pub struct UpdaterDescriptor {
    address: Address,
    kind: UpdaterKind,
}

impl UpdaterDescriptor {
    pub fn text_content(address: Address, expression: &str) -> UpdaterDescriptor {
        UpdaterDescriptor {
            address,
            kind: UpdaterKind::TextContent {
                expression: expression.to_string(),
            },
        }
    }

    pub fn attribute_value(address: Address, name: &str, tokens: Vec<Token>) -> UpdaterDescriptor {
        UpdaterDescriptor {
            address,
            kind: UpdaterKind::AttributeValue {
                name: name.to_string(),
                tokens,
            },
        }
    }

    pub fn address(&self) -> &Address {
        &self.address
    }

    pub fn kind(&self) -> &UpdaterKind {
        &self.kind
    }

    pub(crate) fn nested_under(self, index: usize) -> UpdaterDescriptor {
        UpdaterDescriptor {
            address: self.address.nested_under(index),
            ..self
        }
    }

    pub(crate) fn shifted(self, offset: usize) -> UpdaterDescriptor {
        UpdaterDescriptor {
            address: self.address.shifted(offset),
            ..self
        }
    }

    pub fn create_updater(&self, doc: &Document, root: NodeId) -> Result<Updater, TreeError> {
        let node = node_at_address(doc, root, &self.address)?;
        let updater = match &self.kind {
            UpdaterKind::TextContent { expression } => Updater::TextContent(TextContentUpdater {
                node,
                expression: expression.clone(),
            }),
            UpdaterKind::AttributeValue { name, tokens } => Updater::AttributeValue(AttributeValueUpdater {
                node,
                name: name.clone(),
                tokens: tokens.clone(),
            }),
        };
        Ok(updater)
    }
}

impl fmt::Display for UpdaterDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match &self.kind {
            UpdaterKind::TextContent { expression } => {
                write!(f, "{} text {{{}}}", self.address, expression)
            }
            UpdaterKind::AttributeValue { name, tokens } => {
                write!(f, "{} attribute {}=\"", self.address, name)?;
                for token in tokens {
                    match token {
                        Token::Static(text) => f.write_str(text)?,
                        Token::Expression(expression) => write!(f, "{{{}}}", expression)?,
                    }
                }
                f.write_str("\"")
            }
        }
    }
}

/// Resolves a dotted path against `data`. An empty expression is the data
/// itself; a missing member anywhere along the path is `None`.
pub fn evaluate<'a>(expression: &str, data: &'a Value) -> Option<&'a Value> {
    if expression.is_empty() {
        return Some(data);
    }
    expression
        .split('.')
        .try_fold(data, |current, segment| current.member(segment))
}

fn evaluate_to_string(expression: &str, data: &Value) -> String {
    evaluate(expression, data).map(Value::to_string).unwrap_or_default()
}

#[derive(Clone, Debug)]
pub struct TextContentUpdater {
    node: NodeId,
    expression: String,
}

impl TextContentUpdater {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn update(&self, doc: &mut Document, data: &Value) {
        let text = evaluate_to_string(&self.expression, data);
        trace!(node = ?self.node, expression = %self.expression, %text, "update text");
        if !doc.set_text(self.node, &text) {
            warn!(node = ?self.node, "text updater target is gone");
        }
    }
}

#[derive(Clone, Debug)]
pub struct AttributeValueUpdater {
    node: NodeId,
    name: String,
    tokens: Vec<Token>,
}

impl AttributeValueUpdater {
    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn update(&self, doc: &mut Document, data: &Value) {
        let value: String = self
            .tokens
            .iter()
            .map(|token| match token {
                Token::Static(text) => text.clone(),
                Token::Expression(expression) => evaluate_to_string(expression, data),
            })
            .collect();
        trace!(node = ?self.node, name = %self.name, %value, "update attribute");
        if !doc.set_attribute(self.node, &self.name, &value) {
            warn!(node = ?self.node, name = %self.name, "attribute updater target is gone");
        }
    }
}

#[derive(Clone, Debug, Default)]
pub struct UpdaterCollection {
    updaters: Vec<Updater>,
}

impl UpdaterCollection {
    pub fn new(updaters: Vec<Updater>) -> UpdaterCollection {
        UpdaterCollection { updaters }
    }

    pub fn updaters(&self) -> &[Updater] {
        &self.updaters
    }

    pub fn len(&self) -> usize {
        self.updaters.len()
    }

    pub fn is_empty(&self) -> bool {
        self.updaters.is_empty()
    }

    pub fn update(&self, doc: &mut Document, data: &Value) {
        for updater in &self.updaters {
            updater.update(doc, data);
        }
    }
}

#[derive(Clone, Debug)]
pub enum Updater {
    TextContent(TextContentUpdater),
    AttributeValue(AttributeValueUpdater),
    Collection(UpdaterCollection),
}

impl Updater {
    /// Re-applies `data` to every node this updater is bound to. Missing data
    /// renders as empty text; nothing here fails.
    pub fn update(&self, doc: &mut Document, data: &Value) {
        match self {
            Updater::TextContent(updater) => updater.update(doc, data),
            Updater::AttributeValue(updater) => updater.update(doc, data),
            Updater::Collection(updater) => updater.update(doc, data),
        }
    }
}
