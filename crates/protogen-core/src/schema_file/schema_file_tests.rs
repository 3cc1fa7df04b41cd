#![allow(non_snake_case)]

use super::*;
use crate::document::DocumentationSource;

const SAMPLE: &str = r#"
[[messages]]
id = 100
name = "Player"
title = "A connected player"

[[messages.fields]]
name = "id"
type = "long"
doc = "Account id"

[[messages.fields]]
name = "friends"
type = "list<Player>"

[[messages.fields]]
name = "scores"
type = "map<string, list<int>>"
compatible = true

[[messages]]
id = 101
name = "Empty"
"#;

#[test]
fn SchemaFile___parse___reads_messages_in_order() {
    let file = SchemaFile::parse(SAMPLE).unwrap();

    assert_eq!(file.messages.len(), 2);
    assert_eq!(file.messages[0].name, "Player");
    assert_eq!(file.messages[0].fields.len(), 3);
    assert_eq!(file.messages[1].name, "Empty");
    assert!(file.messages[1].fields.is_empty());
}

#[test]
fn SchemaFile___resolve___resolves_kinds_and_names() {
    let resolved = SchemaFile::parse(SAMPLE).unwrap().resolve().unwrap();

    let player = resolved.schema.get(100).unwrap();

    assert_eq!(player.fields[0].kind, ValueKind::Long);
    assert_eq!(
        player.fields[1].kind,
        ValueKind::list(ValueKind::NestedMessage(100))
    );
    assert_eq!(
        player.fields[2].kind,
        ValueKind::map(ValueKind::String, ValueKind::list(ValueKind::Int))
    );
}

#[test]
fn SchemaFile___resolve___keeps_declared_type_text() {
    let resolved = SchemaFile::parse(SAMPLE).unwrap().resolve().unwrap();

    let player = resolved.schema.get(100).unwrap();

    assert_eq!(player.fields[1].type_description, "list<Player>");
}

#[test]
fn SchemaFile___resolve___carries_compatible_flag() {
    let resolved = SchemaFile::parse(SAMPLE).unwrap().resolve().unwrap();

    let flags: Vec<bool> = resolved.schema.get(100).unwrap().fields.iter().map(|f| f.compatible).collect();

    assert_eq!(flags, vec![false, false, true]);
}

#[test]
fn SchemaFile___resolve___collects_documentation() {
    let resolved = SchemaFile::parse(SAMPLE).unwrap().resolve().unwrap();

    let doc = resolved.documentation.document(100);

    assert_eq!(doc.title, "A connected player");
    assert_eq!(doc.field("id"), Some("Account id"));
    assert_eq!(doc.field("friends"), None);
    assert_eq!(resolved.documentation.document(101).title, "");
}

#[test]
fn SchemaFile___resolve_unknown_type___names_the_field() {
    let file = SchemaFile::parse(
        r#"
[[messages]]
id = 1
name = "Broken"

[[messages.fields]]
name = "thing"
type = "list<Missing>"
"#,
    )
    .unwrap();

    let err = file.resolve().unwrap_err();

    assert!(matches!(&err, GenerateError::InvalidValueKind(msg) if msg.contains("Broken.thing")));
}

#[test]
fn SchemaFile___parse_missing_type___returns_config_error() {
    let result = SchemaFile::parse(
        r#"
[[messages]]
id = 1
name = "NoType"

[[messages.fields]]
name = "thing"
"#,
    );

    assert!(matches!(result, Err(GenerateError::Config(_))));
}

#[test]
fn SchemaFile___from_file_missing___returns_io_error() {
    let result = SchemaFile::from_file("/definitely/not/here/schema.toml");

    assert!(matches!(result, Err(GenerateError::Io { .. })));
}

#[test]
fn SchemaFile___resolve_type_with_line_break___stores_single_line_description() {
    let file = SchemaFile::parse(
        r#"
[[messages]]
id = 1
name = "Wrapped"

[[messages.fields]]
name = "x"
type = "list<\nint>"
"#,
    )
    .unwrap();

    let resolved = file.resolve().unwrap();
    let field = &resolved.schema.get(1).unwrap().fields[0];

    assert_eq!(field.kind, ValueKind::list(ValueKind::Int));
    assert_eq!(field.type_description, "list< int>");
}
