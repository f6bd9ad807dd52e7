//! Integration tests for parsing application API data.
//!
//! These tests validate that the application models decode real panel responses,
//! including the empty-collection quirks some panel versions emit.

use pterodactyl_application::models::{Egg, Node};
use pterodactyl_core::envelope::{decode_collection, decode_item};
use pterodactyl_core::ids::{EggId, LocationId, NestId, NodeId};
use std::fs;
use std::path::PathBuf;

/// Get the path to the test fixtures directory.
fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests")
        .join("fixtures")
}

fn load_fixture(name: &str) -> Vec<u8> {
    let fixture_path = fixtures_dir().join(name);
    fs::read(&fixture_path).unwrap_or_else(|e| {
        panic!(
            "Failed to read fixture at {}: {}",
            fixture_path.display(),
            e
        )
    })
}

#[test]
fn test_deserialize_egg_with_variables() {
    let body = load_fixture("egg_with_variables.json");
    let egg: Egg = decode_item(&body).unwrap_or_else(|e| panic!("Failed to decode egg: {e}"));

    assert_eq!(egg.id, EggId::new(5));
    assert_eq!(egg.nest, NestId::new(1));
    assert_eq!(egg.name, "Vanilla Minecraft");
    assert_eq!(egg.config.stop, "stop");
    assert!(egg.config.extends.is_null());
    assert!(!egg.config.logs.custom);
}

#[test]
fn test_egg_user_interaction_empty_object() {
    let body = load_fixture("egg_with_variables.json");
    let egg: Egg = decode_item(&body).unwrap();

    assert_eq!(egg.config.startup.done, ")! For help, type ");
    assert!(egg.config.startup.user_interaction.is_empty());

    // string content that looks like the quirk is left alone
    assert!(egg.script.install.contains("\"userInteraction\":{}"));
}

#[test]
fn test_egg_config_files() {
    let body = load_fixture("egg_with_variables.json");
    let egg: Egg = decode_item(&body).unwrap();

    let properties = egg
        .config
        .files
        .get("server.properties")
        .expect("server.properties config");
    assert_eq!(properties.parser, "properties");
    assert_eq!(properties.find["server-ip"], "0.0.0.0");
}

#[test]
fn test_egg_variables_relationship() {
    let body = load_fixture("egg_with_variables.json");
    let egg: Egg = decode_item(&body).unwrap();

    let variables: Vec<_> = egg.variables().collect();
    assert_eq!(variables.len(), 2);

    assert_eq!(variables[0].env_variable, "SERVER_JARFILE");
    assert!(variables[0].user_editable);

    assert_eq!(variables[1].env_variable, "VANILLA_VERSION");
    assert!(variables[1].user_viewable);
    assert!(!variables[1].user_editable);
    assert_eq!(variables[1].egg_id, egg.id);
}

#[test]
fn test_deserialize_node_list() {
    let body = load_fixture("node_list.json");
    let page = decode_collection::<Node>(&body)
        .unwrap_or_else(|e| panic!("Failed to decode node list: {e}"));

    assert_eq!(page.items.len(), 2, "Expected 2 nodes in test data");
    assert_eq!(page.total_pages(), 1);

    let first = &page.items[0];
    assert_eq!(first.id, NodeId::new(1));
    assert_eq!(first.location_id, LocationId::new(1));
    assert_eq!(first.memory_overallocate, -1);
    assert_eq!(first.description.as_value().map(String::as_str), Some("Test"));

    let second = &page.items[1];
    assert!(second.description.is_null());
    assert!(second.behind_proxy);
    assert!(second.maintenance_mode);
    assert_eq!(second.daemon_sftp, 2222);
}
