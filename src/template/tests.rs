use std::collections::HashSet;

use super::*;
use crate::{markup::to_markup, value::parse_data_str};

fn data(yaml: &str) -> Value {
    parse_data_str(yaml).unwrap().remove(0)
}

fn render(doc: &Document, instance: &Instance) -> String {
    instance.nodes(doc).into_iter().map(|node| to_markup(doc, node)).collect()
}

#[test]
fn hello_then_update_in_place() {
    let template = Template::from_markup("<p>Hello, {user.name}!</p>").unwrap();
    let mut doc = Document::new();
    let instance = template
        .instantiate(&mut doc, Some(&data("user: {name: Ada}")))
        .unwrap();
    let p = instance.nodes(&doc)[0];
    assert_eq!(render(&doc, &instance), "<p>Hello, Ada!</p>");

    instance.update(&mut doc, &data("user: {name: Grace}"));
    assert_eq!(instance.nodes(&doc), vec![p]);
    assert_eq!(render(&doc, &instance), "<p>Hello, Grace!</p>");
}

#[test]
fn update_leaves_no_trace_and_is_idempotent() {
    let template = Template::from_markup(r#"<b title="{name}">{name}</b>"#).unwrap();
    let mut doc = Document::new();
    let instance = template.instantiate(&mut doc, Some(&data("name: A"))).unwrap();

    let b = data("name: B");
    instance.update(&mut doc, &b);
    let once = render(&doc, &instance);
    instance.update(&mut doc, &b);
    assert_eq!(render(&doc, &instance), once);
    assert_eq!(once, r#"<b title="B">B</b>"#);
}

#[test]
fn missing_field_renders_empty() {
    let template = Template::from_markup("<p>[{missing.field}]</p>").unwrap();
    let mut doc = Document::new();
    let instance = template.instantiate(&mut doc, Some(&data("{}"))).unwrap();
    assert_eq!(render(&doc, &instance), "<p>[]</p>");
}

#[test]
fn no_data_leaves_slots_empty() {
    let template = Template::from_markup("<p>{x}</p>").unwrap();
    let mut doc = Document::new();
    let instance = template.instantiate(&mut doc, None).unwrap();
    assert_eq!(render(&doc, &instance), "<p></p>");

    let instance = template.instantiate(&mut doc, Some(&Value::Null)).unwrap();
    assert_eq!(render(&doc, &instance), "<p></p>");
}

#[test]
fn instances_are_independent() {
    let template = Template::from_markup("<i>{v}</i>").unwrap();
    let mut doc = Document::new();
    let first = template.instantiate(&mut doc, Some(&data("v: 1"))).unwrap();
    let second = template.instantiate(&mut doc, Some(&data("v: 2"))).unwrap();
    first.update(&mut doc, &data("v: 3"));
    assert_eq!(render(&doc, &first), "<i>3</i>");
    assert_eq!(render(&doc, &second), "<i>2</i>");

    let (skeleton, root) = template.skeleton();
    assert_eq!(to_markup(skeleton, root), "<i></i>");
}

#[test]
fn slot_count_matches_placeholders() {
    let template = Template::from_markup(r#"<div>{a} and {b}<p title="{t}">{c.d}</p></div>{e}"#).unwrap();
    assert_eq!(template.descriptors().len(), 5);

    let mut doc = Document::new();
    let instance = template.instantiate(&mut doc, None).unwrap();
    let Updater::Collection(collection) = &instance.updater else {
        panic!("expected collection");
    };
    let nodes: HashSet<NodeId> = collection
        .updaters()
        .iter()
        .map(|updater| match updater {
            Updater::TextContent(updater) => updater.node(),
            Updater::AttributeValue(updater) => updater.node(),
            other => panic!("unexpected updater {:?}", other),
        })
        .collect();
    assert_eq!(nodes.len(), 5);
}

#[test]
fn element_root() {
    let (source, root) = parse_markup(r#"<a href="/u/{id}">{name}</a>"#).unwrap();
    let a = source.child_at(root, 0).unwrap();
    let template = Template::new(&source, a);
    let addresses: Vec<String> = template
        .descriptors()
        .iter()
        .map(|d| d.address().to_string())
        .collect();
    assert_eq!(addresses, vec!["[]", "[0]"]);

    let mut doc = Document::new();
    let instance = template
        .instantiate(&mut doc, Some(&data("{id: 7, name: Ada}")))
        .unwrap();
    assert_eq!(to_markup(&doc, instance.root), r#"<a href="/u/7">Ada</a>"#);
}

#[test]
fn text_root() {
    let (source, root) = parse_markup("x={x}").unwrap();
    let text = source.child_at(root, 0).unwrap();
    let template = Template::new(&source, text);
    let mut doc = Document::new();
    let instance = template.instantiate(&mut doc, Some(&data("x: 1"))).unwrap();
    assert_eq!(render(&doc, &instance), "x=1");
}

#[test]
fn empty_template() {
    let template = Template::default();
    assert!(template.descriptors().is_empty());
    let mut doc = Document::new();
    let instance = template.instantiate(&mut doc, Some(&data("a: 1"))).unwrap();
    assert!(instance.nodes(&doc).is_empty());
}

#[test]
fn mismatched_parts_fail_to_instantiate() {
    let mut skeleton = Document::new();
    let root = skeleton.create_fragment();
    let descriptors = vec![UpdaterDescriptor::text_content(
        crate::address::Address::from(vec![0, 0]),
        "x",
    )];
    let template = Template::from_parts(skeleton, root, descriptors);
    let mut doc = Document::new();
    assert!(template.instantiate(&mut doc, None).is_err());
}
