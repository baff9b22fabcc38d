// Copyright (c) Chris Gunn.
// Licensed under the MIT license.

//! A small HTML-like markup reader and writer for building source trees.
//!
//! Supported: elements with quoted or bare attributes, self-closing tags
//! (`<br/>`), comments and text. There is no implicit tag closing, so void
//! elements must be written self-closed.


use anyhow::{anyhow, Error};
use chumsky::prelude::*;
use indextree::NodeId;

use crate::dom::{Document, NodeData};

#[derive(Clone, Debug, PartialEq)]
enum Markup {
    Element {
        tag: String,
        attributes: Vec<(String, String)>,
        children: Vec<Markup>,
    },
    Text(String),
    Comment(String),
}

/// Parses markup into a new document, rooted at a fragment.
pub fn parse_markup(input: &str) -> Result<(Document, NodeId), Error> {
    let mut doc = Document::new();
    let root = parse_markup_into(&mut doc, input)?;
    Ok((doc, root))
}

/// Parses markup into an existing document and returns a fragment holding
/// the result.
pub fn parse_markup_into(doc: &mut Document, input: &str) -> Result<NodeId, Error> {
    let nodes = gen_markup_parser().parse(input).map_err(|errs| {
        let messages: Vec<String> = errs.iter().map(|err| err.to_string()).collect();
        anyhow!("markup parse errors (count={}): {}", errs.len(), messages.join("; "))
    })?;

    let root = doc.create_fragment();
    build_nodes(doc, root, nodes);
    Ok(root)
}

fn build_nodes(doc: &mut Document, parent: NodeId, nodes: Vec<Markup>) {
    for node in nodes {
        let id = match node {
            Markup::Element {
                tag,
                attributes,
                children,
            } => {
                let element = doc.create_element(&tag);
                for (name, value) in attributes {
                    doc.set_attribute(element, &name, &value);
                }
                build_nodes(doc, element, children);
                element
            }
            Markup::Text(text) => doc.create_text(&text),
            Markup::Comment(text) => doc.create_comment(&text),
        };
        doc.push_child(parent, id);
    }
}

fn gen_markup_parser() -> impl Parser<char, Vec<Markup>, Error = Simple<char>> {
    let content = recursive(|content| {
        let whitespace = filter(|c: &char| c.is_whitespace()).repeated();

        let tag_name = filter(|c: &char| c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == ':')
            .repeated()
            .at_least(1)
            .collect::<String>()
            .labelled("tag name");

        let attribute_name = filter(|c: &char| {
            c.is_ascii_alphanumeric() || *c == '-' || *c == '_' || *c == ':' || *c == '.' || *c == '@'
        })
        .repeated()
        .at_least(1)
        .collect::<String>()
        .labelled("attribute name");

        let attribute_value = just('"')
            .ignore_then(none_of("\"").repeated())
            .then_ignore(just('"'))
            .or(just('\'').ignore_then(none_of("'").repeated()).then_ignore(just('\'')))
            .collect::<String>()
            .map(|value| decode_entities(&value))
            .labelled("attribute value");

        let attribute = filter(|c: &char| c.is_whitespace())
            .repeated()
            .at_least(1)
            .ignore_then(attribute_name)
            .then(
                whitespace
                    .clone()
                    .ignore_then(just('='))
                    .ignore_then(whitespace.clone())
                    .ignore_then(attribute_value)
                    .or_not(),
            )
            .map(|(name, value)| (name, value.unwrap_or_default()));

        let closing_tag = just("</")
            .ignore_then(tag_name.clone())
            .then_ignore(whitespace.clone())
            .then_ignore(just('>'));

        let element = just('<')
            .ignore_then(tag_name)
            .then(attribute.repeated())
            .then_ignore(whitespace)
            .then(
                just("/>")
                    .to(None)
                    .or(just('>').ignore_then(content).then(closing_tag).map(Some)),
            )
            .try_map(|((tag, attributes), body), span| match body {
                None => Ok(Markup::Element {
                    tag,
                    attributes,
                    children: Vec::new(),
                }),
                Some((children, closing)) if closing == tag => Ok(Markup::Element {
                    tag,
                    attributes,
                    children,
                }),
                Some((_, closing)) => Err(Simple::custom(
                    span,
                    format!("closing tag </{}> does not match <{}>", closing, tag),
                )),
            });

        let comment = just("<!--")
            .ignore_then(take_until(just("-->")))
            .map(|(body, _)| Markup::Comment(body.into_iter().collect()));

        let text = none_of("<")
            .repeated()
            .at_least(1)
            .collect::<String>()
            .map(|text| Markup::Text(decode_entities(&text)));

        comment.or(element).or(text).repeated()
    });

    content.then_ignore(end())
}

fn decode_entities(text: &str) -> String {
    if !text.contains('&') {
        return text.to_string();
    }

    const ENTITIES: [(&str, char); 6] = [
        ("&amp;", '&'),
        ("&lt;", '<'),
        ("&gt;", '>'),
        ("&quot;", '"'),
        ("&apos;", '\''),
        ("&#39;", '\''),
    ];

    let mut out = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(index) = rest.find('&') {
        out.push_str(&rest[..index]);
        rest = &rest[index..];
        match ENTITIES.iter().find(|(entity, _)| rest.starts_with(entity)) {
            Some((entity, decoded)) => {
                out.push(*decoded);
                rest = &rest[entity.len()..];
            }
            None => {
                out.push('&');
                rest = &rest[1..];
            }
        }
    }
    out.push_str(rest);
    out
}

/// Serializes a node and its subtree. Fragments write only their children.
pub fn to_markup(doc: &Document, node: NodeId) -> String {
    let mut out = String::new();
    write_node(doc, node, &mut out);
    out
}

fn write_node(doc: &Document, node: NodeId, out: &mut String) {
    match doc.get(node) {
        Some(NodeData::Element(element)) => {
            out.push('<');
            out.push_str(&element.tag);
            for (name, value) in &element.attributes {
                out.push(' ');
                out.push_str(name);
                out.push_str("=\"");
                escape_into(value, true, out);
                out.push('"');
            }
            if doc.child_count(node) == 0 {
                out.push_str("/>");
                return;
            }
            out.push('>');
            for child in doc.children(node) {
                write_node(doc, child, out);
            }
            out.push_str("</");
            out.push_str(&element.tag);
            out.push('>');
        }
        Some(NodeData::Text(text)) => escape_into(text, false, out),
        Some(NodeData::Comment(text)) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Some(NodeData::Fragment) => {
            for child in doc.children(node) {
                write_node(doc, child, out);
            }
        }
        None => {}
    }
}

fn escape_into(text: &str, attribute: bool, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' if !attribute => out.push_str("&lt;"),
            '>' if !attribute => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            _ => out.push(c),
        }
    }
}
