use std::collections::HashSet;

use super::*;
use crate::{address::node_at_address, markup::parse_markup, markup::to_markup, updater::UpdaterKind};

fn parse_str(input: &str) -> (Document, ParsedTree) {
    let (source, root) = parse_markup(input).unwrap();
    let mut skeleton = Document::new();
    let tree = TemplateParser::new().parse(&source, root, &mut skeleton);
    (skeleton, tree)
}

fn addresses(tree: &ParsedTree) -> Vec<Vec<usize>> {
    tree.descriptors
        .iter()
        .map(|d| d.address().as_slice().to_vec())
        .collect()
}

#[test]
fn text_node_splits_into_fragment() {
    let (source, root) = parse_markup("a {x} b {y.z} c").unwrap();
    let text = source.child_at(root, 0).unwrap();
    let mut skeleton = Document::new();
    let tree = TemplateParser::new().parse(&source, text, &mut skeleton);

    let Parsed::Fragment(nodes) = &tree.parsed else {
        panic!("expected fragment");
    };
    let texts: Vec<&str> = nodes.iter().map(|&n| skeleton.text(n).unwrap()).collect();
    assert_eq!(texts, vec!["a ", "", " b ", "", " c"]);
    assert_eq!(addresses(&tree), vec![vec![1], vec![3]]);
}

#[test]
fn addresses_are_rebased_through_parents() {
    let (skeleton, tree) = parse_str(r#"<div>a {x} b<p title="{t}">{y}</p>{z}</div>"#);
    assert_eq!(
        addresses(&tree),
        vec![vec![0, 1], vec![0, 3], vec![0, 3, 0], vec![0, 4]]
    );

    let Parsed::Node(root) = tree.parsed else {
        panic!("expected node");
    };
    assert_eq!(to_markup(&skeleton, root), r#"<div>a  b<p title=""></p></div>"#);
}

#[test]
fn descriptors_follow_document_order() {
    let (_, tree) = parse_str(r#"<p class="{a}">{b}<i>{c}</i>{d}</p>"#);
    let expressions: Vec<String> = tree
        .descriptors
        .iter()
        .map(|d| match d.kind() {
            UpdaterKind::TextContent { expression } => expression.clone(),
            UpdaterKind::AttributeValue { tokens, .. } => match &tokens[0] {
                Token::Expression(expression) => expression.clone(),
                Token::Static(text) => text.clone(),
            },
        })
        .collect();
    assert_eq!(expressions, vec!["a", "b", "c", "d"]);
}

#[test]
fn static_attributes_are_copied() {
    let (skeleton, tree) = parse_str(r#"<a href="/home" class="x {y}">go</a>"#);
    let Parsed::Node(root) = tree.parsed else {
        panic!("expected node");
    };
    let a = skeleton.child_at(root, 0).unwrap();
    assert_eq!(skeleton.attribute(a, "href"), Some("/home"));
    assert_eq!(skeleton.attribute(a, "class"), Some(""));
    assert_eq!(tree.descriptors.len(), 1);
    assert_eq!(
        tree.descriptors[0].kind(),
        &UpdaterKind::AttributeValue {
            name: "class".to_string(),
            tokens: vec![
                Token::Static("x ".to_string()),
                Token::Expression("y".to_string())
            ],
        }
    );
}

#[test]
fn comments_are_inert() {
    let (skeleton, tree) = parse_str("<!-- {not.bound} --><p>{x}</p>");
    assert_eq!(addresses(&tree), vec![vec![1, 0]]);
    let Parsed::Node(root) = tree.parsed else {
        panic!("expected node");
    };
    assert_eq!(to_markup(&skeleton, root), "<!-- {not.bound} --><p></p>");
}

#[test]
fn malformed_placeholders_are_static() {
    let (skeleton, tree) = parse_str("<p>{ oops</p>");
    assert!(tree.descriptors.is_empty());
    let Parsed::Node(root) = tree.parsed else {
        panic!("expected node");
    };
    assert_eq!(to_markup(&skeleton, root), "<p>{ oops</p>");
}

#[test]
fn addresses_resolve_to_distinct_slots_in_a_clone() {
    let (mut skeleton, tree) =
        parse_str("<ul><li>{a}</li><li>x {b} y {c}</li></ul><p>{d}<b>{e}</b></p>");
    let Parsed::Node(root) = tree.parsed else {
        panic!("expected node");
    };
    let clone = skeleton.clone_node(root, true).unwrap();

    let mut seen = HashSet::new();
    for descriptor in &tree.descriptors {
        let original = node_at_address(&skeleton, root, descriptor.address()).unwrap();
        let copy = node_at_address(&skeleton, clone, descriptor.address()).unwrap();
        assert_ne!(original, copy);
        assert_eq!(skeleton.text(copy), Some(""));
        assert!(seen.insert(copy));
    }
    assert_eq!(seen.len(), 5);
}
