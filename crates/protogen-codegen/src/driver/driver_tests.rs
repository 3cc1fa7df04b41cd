#![allow(non_snake_case)]

use super::*;
use protogen_core::{FieldDefinition, GroupingPolicy, NoDocumentation, ValueKind};
use tempfile::TempDir;

fn config_in(dir: &TempDir) -> GenerateConfig {
    GenerateConfig::with_protocol_path(dir.path())
}

fn schema() -> ProtocolSchema {
    ProtocolSchema::new(vec![
        MessageDefinition::new(1, "Ping").with_field(FieldDefinition::new("nonce", ValueKind::Long)),
        MessageDefinition::new(2, "Pong")
            .with_field(FieldDefinition::new("nonce", ValueKind::Long))
            .with_field(FieldDefinition::new("origin", ValueKind::NestedMessage(1))),
    ])
}

#[test]
fn message_path___blank_grouping___is_root_file() {
    assert_eq!(message_path("", "Ping"), "Ping.js");
    assert_eq!(message_path(" / ", "Ping"), "Ping.js");
}

#[test]
fn message_path___grouping___prefixes_directory() {
    assert_eq!(message_path("p100", "Ping"), "p100/Ping.js");
    assert_eq!(message_path("/a/b/", "Ping"), "a/b/Ping.js");
}

#[test]
fn plan_outputs___valid_schema___returns_paths_in_order() {
    let paths = plan_outputs(&schema(), &protogen_core::FlatPath, 32).unwrap();

    assert_eq!(paths, vec!["Ping.js", "Pong.js"]);
}

#[test]
fn plan_outputs___message_named_like_registry___collides() {
    let schema = ProtocolSchema::new(vec![MessageDefinition::new(1, "protocolManager")]);

    let result = plan_outputs(&schema, &protogen_core::FlatPath, 32);

    match result {
        Err(GenerateError::OutputPathCollision { path }) => assert_eq!(path, "protocolManager.js"),
        other => panic!("expected OutputPathCollision, got {other:?}"),
    }
}

#[test]
fn plan_outputs___names_differing_in_case___collide() {
    let schema = ProtocolSchema::new(vec![
        MessageDefinition::new(1, "Item"),
        MessageDefinition::new(2, "ITEM"),
    ]);

    assert!(matches!(
        plan_outputs(&schema, &protogen_core::FlatPath, 32),
        Err(GenerateError::OutputPathCollision { .. })
    ));
}

fn nested_lists(levels: usize) -> ValueKind {
    (0..levels).fold(ValueKind::Int, |kind, _| ValueKind::list(kind))
}

#[test]
fn plan_outputs___nesting_over_limit___returns_nesting_too_deep() {
    let schema = ProtocolSchema::new(vec![
        MessageDefinition::new(1, "Deep").with_field(FieldDefinition::new("x", nested_lists(33))),
    ]);

    match plan_outputs(&schema, &protogen_core::FlatPath, 32) {
        Err(GenerateError::NestingTooDeep { field, limit }) => {
            assert_eq!(field, "Deep.x");
            assert_eq!(limit, 32);
        }
        other => panic!("expected NestingTooDeep, got {other:?}"),
    }
}

#[test]
fn plan_outputs___nesting_at_limit___is_planned() {
    let schema = ProtocolSchema::new(vec![
        MessageDefinition::new(1, "Deep").with_field(FieldDefinition::new("x", nested_lists(32))),
    ]);

    assert_eq!(
        plan_outputs(&schema, &protogen_core::FlatPath, 32).unwrap(),
        vec!["Deep.js"]
    );
}

#[test]
fn GenerationDriver___operations_before_init___return_not_initialized() {
    let dir = TempDir::new().unwrap();
    let mut driver = GenerationDriver::new(config_in(&dir));

    assert!(!driver.is_initialized());
    assert!(matches!(
        driver.generate_registry(&schema()),
        Err(GenerateError::NotInitialized)
    ));
    assert!(matches!(
        driver.generate_message(&schema().messages()[0], &NoDocumentation),
        Err(GenerateError::NotInitialized)
    ));
    assert!(matches!(driver.finish(), Err(GenerateError::NotInitialized)));
}

#[test]
fn GenerationDriver___init___wipes_existing_output() {
    let dir = TempDir::new().unwrap();
    let config = config_in(&dir);
    let root = config.output_root();
    fs::create_dir_all(root.join("stale")).unwrap();
    fs::write(root.join("stale/Old.js"), "old").unwrap();

    let mut driver = GenerationDriver::new(config);
    driver.init().unwrap();

    assert!(root.is_dir());
    assert_eq!(fs::read_dir(&root).unwrap().count(), 0);
    assert_eq!(driver.output_root(), Some(root.as_path()));
}

#[test]
fn GenerationDriver___clear___drops_run_state() {
    let dir = TempDir::new().unwrap();
    let mut driver = GenerationDriver::new(config_in(&dir));
    driver.init().unwrap();

    driver.clear();

    assert!(!driver.is_initialized());
    assert!(driver.output_root().is_none());
    assert!(matches!(
        driver.generate_registry(&schema()),
        Err(GenerateError::NotInitialized)
    ));
}

#[test]
fn GenerationDriver___step_by_step___matches_generate() {
    let first_dir = TempDir::new().unwrap();
    let mut driver = GenerationDriver::new(config_in(&first_dir));
    driver.init().unwrap();
    driver.generate_registry(&schema()).unwrap();
    for message in schema().messages() {
        driver.generate_message(message, &NoDocumentation).unwrap();
    }
    let stepwise = driver.finish().unwrap();

    let second_dir = TempDir::new().unwrap();
    let whole = GenerationDriver::new(config_in(&second_dir))
        .generate(&schema(), &NoDocumentation)
        .unwrap();

    assert_eq!(stepwise.files, whole.files);
    assert_eq!(stepwise.digest, whole.digest);
    assert!(!driver.is_initialized());
}

#[test]
fn GenerationDriver___generate___writes_runtime_registry_then_messages() {
    let dir = TempDir::new().unwrap();

    let report = GenerationDriver::new(config_in(&dir))
        .generate(&schema(), &NoDocumentation)
        .unwrap();

    assert_eq!(
        report.files,
        vec![
            "buffer/ByteBuffer.js",
            "buffer/longbits.js",
            "ProtocolManager.js",
            "Ping.js",
            "Pong.js",
        ]
    );
    assert_eq!(report.digest.len(), 64);
    for file in &report.files {
        assert!(report.output_root.join(file).is_file(), "missing {file}");
    }
}

#[test]
fn GenerationDriver___bucket_grouping___places_messages_in_subdirectories() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.grouping = GroupingPolicy::Bucket(100);
    let schema = ProtocolSchema::new(vec![
        MessageDefinition::new(5, "Low"),
        MessageDefinition::new(250, "High"),
    ]);

    let report = GenerationDriver::new(config)
        .generate(&schema, &NoDocumentation)
        .unwrap();

    assert!(report.files.contains(&"p0/Low.js".to_string()));
    assert!(report.files.contains(&"p200/High.js".to_string()));
    let registry = fs::read_to_string(report.output_root.join(REGISTRY_FILE)).unwrap();
    assert!(registry.contains("import Low from './p0/Low.js';"));
    assert!(registry.contains("import High from './p200/High.js';"));
}

#[test]
fn GenerationDriver___failed_generate___clears_run() {
    let dir = TempDir::new().unwrap();
    let mut config = config_in(&dir);
    config.max_nesting_depth = 1;
    let schema = ProtocolSchema::new(vec![MessageDefinition::new(1, "Deep").with_field(
        FieldDefinition::new("grid", ValueKind::list(ValueKind::list(ValueKind::Int))),
    )]);
    let mut driver = GenerationDriver::new(config);

    let result = driver.generate(&schema, &NoDocumentation);

    assert!(matches!(result, Err(GenerateError::NestingTooDeep { .. })));
    assert!(!driver.is_initialized());
}
