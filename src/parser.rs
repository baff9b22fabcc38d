// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

#[cfg(test)]
mod tests;

use indextree::NodeId;

use crate::{
    address::Address,
    dom::{Document, ElementData, NodeData},
    tokenizer::{PlaceholderScanner, Token},
    updater::UpdaterDescriptor,
};

/// What parsing one source node produced in the skeleton.
#[derive(Clone, Debug, PartialEq)]
pub enum Parsed {
    /// A single node that becomes one child of its parent.
    Node(NodeId),
    /// Sibling nodes spliced directly into the parent (split text).
    Fragment(Vec<NodeId>),
}

impl Parsed {
    pub fn nodes(&self) -> &[NodeId] {
        match self {
            Parsed::Node(node) => std::slice::from_ref(node),
            Parsed::Fragment(nodes) => nodes,
        }
    }

    pub fn len(&self) -> usize {
        self.nodes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes().is_empty()
    }
}

/// Skeleton nodes plus descriptors addressed relative to them.
#[derive(Clone, Debug)]
pub struct ParsedTree {
    pub parsed: Parsed,
    pub descriptors: Vec<UpdaterDescriptor>,
}

pub struct TemplateParser {
    scanner: PlaceholderScanner,
}

impl Default for TemplateParser {
    fn default() -> Self {
        Self::new()
    }
}

impl TemplateParser {
    pub fn new() -> TemplateParser {
        TemplateParser {
            scanner: PlaceholderScanner::new(),
        }
    }

    /// Builds the placeholder-free copy of `node` into `skeleton`.
    pub fn parse(&self, source: &Document, node: NodeId, skeleton: &mut Document) -> ParsedTree {
        let mut run = ParserRun {
            scanner: &self.scanner,
            source,
            skeleton,
        };
        run.parse_node(node)
    }
}

struct ParserRun<'a> {
    scanner: &'a PlaceholderScanner,
    source: &'a Document,
    skeleton: &'a mut Document,
}

impl ParserRun<'_> {
    fn parse_node(&mut self, node: NodeId) -> ParsedTree {
        let source = self.source;
        match source.get(node) {
            Some(NodeData::Text(text)) => self.parse_text(text),
            Some(NodeData::Element(element)) => self.parse_element(node, element),
            Some(NodeData::Fragment) => {
                let fragment = self.skeleton.create_fragment();
                let descriptors = self.parse_children(node, fragment);
                ParsedTree {
                    parsed: Parsed::Node(fragment),
                    descriptors,
                }
            }
            Some(NodeData::Comment(text)) => ParsedTree {
                parsed: Parsed::Node(self.skeleton.create_comment(text)),
                descriptors: Vec::new(),
            },
            None => ParsedTree {
                parsed: Parsed::Fragment(Vec::new()),
                descriptors: Vec::new(),
            },
        }
    }

    fn parse_text(&mut self, text: &str) -> ParsedTree {
        let mut nodes = Vec::new();
        let mut descriptors = Vec::new();
        for (index, token) in self.scanner.tokenize(text).into_iter().enumerate() {
            let node = match token {
                Token::Static(text) => self.skeleton.create_text(&text),
                Token::Expression(expression) => {
                    let address = Address::from(vec![index]);
                    descriptors.push(UpdaterDescriptor::text_content(address, &expression));
                    self.skeleton.create_text("")
                }
            };
            nodes.push(node);
        }
        ParsedTree {
            parsed: Parsed::Fragment(nodes),
            descriptors,
        }
    }

    fn parse_element(&mut self, node: NodeId, element: &ElementData) -> ParsedTree {
        let clone = self
            .skeleton
            .create_element_ns(element.namespace.as_deref(), &element.tag);

        let mut descriptors = Vec::new();
        for (name, value) in &element.attributes {
            let tokens = self.scanner.tokenize(value);
            if tokens.iter().any(Token::is_expression) {
                // The updater writes the whole value; keep the slot present.
                self.skeleton.set_attribute(clone, name, "");
                descriptors.push(UpdaterDescriptor::attribute_value(Address::root(), name, tokens));
            } else {
                self.skeleton.set_attribute(clone, name, value);
            }
        }

        descriptors.extend(self.parse_children(node, clone));
        ParsedTree {
            parsed: Parsed::Node(clone),
            descriptors,
        }
    }

    /// Parses the children of `node` in order, appending their skeleton nodes
    /// to `parent` and rebasing their descriptors onto it.
    fn parse_children(&mut self, node: NodeId, parent: NodeId) -> Vec<UpdaterDescriptor> {
        let source = self.source;
        let (_, descriptors) = source
            .children(node)
            .fold((0, Vec::new()), |(offset, mut descriptors), child| {
                let ParsedTree {
                    parsed,
                    descriptors: child_descriptors,
                } = self.parse_node(child);

                match parsed {
                    Parsed::Fragment(_) => {
                        descriptors.extend(child_descriptors.into_iter().map(|d| d.shifted(offset)));
                    }
                    Parsed::Node(_) => {
                        descriptors.extend(child_descriptors.into_iter().map(|d| d.nested_under(offset)));
                    }
                }

                for &parsed_node in parsed.nodes() {
                    self.skeleton.push_child(parent, parsed_node);
                }
                (offset + parsed.len(), descriptors)
            });
        descriptors
    }
}
