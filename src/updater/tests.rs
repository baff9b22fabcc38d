use super::*;
use crate::value::parse_data_str;

fn data(yaml: &str) -> Value {
    parse_data_str(yaml).unwrap().remove(0)
}

#[test]
fn evaluate_paths() {
    let record = data("user: {name: Ada, langs: [ml, rust]}");
    assert_eq!(evaluate("user.name", &record), Some(&Value::from("Ada")));
    assert_eq!(evaluate("user.langs.1", &record), Some(&Value::from("rust")));
    assert_eq!(evaluate("", &record), Some(&record));
    assert_eq!(evaluate("user.email", &record), None);
    assert_eq!(evaluate("missing.field", &record), None);
}

#[test]
fn text_updater_rewrites_its_node() {
    let mut doc = Document::new();
    let p = doc.create_element("p");
    let slot = doc.create_text("");
    doc.append(p, slot).unwrap();

    let descriptor = UpdaterDescriptor::text_content(Address::from(vec![0]), "name");
    let updater = descriptor.create_updater(&doc, p).unwrap();

    updater.update(&mut doc, &data("name: A"));
    assert_eq!(doc.text(slot), Some("A"));

    updater.update(&mut doc, &data("name: B"));
    assert_eq!(doc.text(slot), Some("B"));

    updater.update(&mut doc, &data("other: 1"));
    assert_eq!(doc.text(slot), Some(""));
}

#[test]
fn attribute_updater_joins_tokens() {
    let mut doc = Document::new();
    let button = doc.create_element("button");
    let tokens = vec![
        Token::Static("btn ".to_string()),
        Token::Expression("kind".to_string()),
        Token::Static("  ".to_string()),
        Token::Expression("size".to_string()),
    ];
    let descriptor = UpdaterDescriptor::attribute_value(Address::root(), "class", tokens);
    let updater = descriptor.create_updater(&doc, button).unwrap();

    updater.update(&mut doc, &data("{kind: primary, size: large}"));
    assert_eq!(doc.attribute(button, "class"), Some("btn primary  large"));

    updater.update(&mut doc, &data("{kind: flat}"));
    assert_eq!(doc.attribute(button, "class"), Some("btn flat  "));
}

#[test]
fn collection_updates_in_bind_order() {
    let mut doc = Document::new();
    let div = doc.create_element("div");
    let first = doc.create_text("");
    let second = doc.create_text("");
    doc.append(div, first).unwrap();
    doc.append(div, second).unwrap();

    let updaters = [
        UpdaterDescriptor::text_content(Address::from(vec![0]), "a"),
        UpdaterDescriptor::text_content(Address::from(vec![1]), "b"),
        UpdaterDescriptor::attribute_value(Address::root(), "title", vec![Token::Expression("a".to_string())]),
    ]
    .iter()
    .map(|d| d.create_updater(&doc, div))
    .collect::<Result<Vec<_>, _>>()
    .unwrap();
    let collection = Updater::Collection(UpdaterCollection::new(updaters));

    let record = data("{a: 1, b: 2}");
    collection.update(&mut doc, &record);
    collection.update(&mut doc, &record);
    assert_eq!(doc.text_content(div), "12");
    assert_eq!(doc.attribute(div, "title"), Some("1"));
}

#[test]
fn bad_address_fails_to_bind() {
    let mut doc = Document::new();
    let p = doc.create_element("p");
    let descriptor = UpdaterDescriptor::text_content(Address::from(vec![3]), "x");
    let err = descriptor.create_updater(&doc, p).unwrap_err();
    assert!(matches!(err, TreeError::AddressOutOfRange { index: 3, child_count: 0, .. }));
}

#[test]
fn updating_a_removed_node_is_harmless() {
    let mut doc = Document::new();
    let p = doc.create_element("p");
    let slot = doc.create_text("");
    doc.append(p, slot).unwrap();
    let updater = UpdaterDescriptor::text_content(Address::from(vec![0]), "")
        .create_updater(&doc, p)
        .unwrap();

    doc.remove(p);
    updater.update(&mut doc, &Value::from("x"));
    assert!(!doc.contains(slot));
}

#[test]
fn descriptor_display() {
    let text = UpdaterDescriptor::text_content(Address::from(vec![1, 0]), "user.name");
    assert_eq!(text.to_string(), "[1, 0] text {user.name}");

    let attr = UpdaterDescriptor::attribute_value(
        Address::root(),
        "href",
        vec![Token::Static("/u/".to_string()), Token::Expression("id".to_string())],
    );
    assert_eq!(attr.to_string(), "[] attribute href=\"/u/{id}\"");
}
