//! Order store behaviour over the concrete key-value stores.

use std::sync::Arc;

use modelfleet::adapter::outbound::storage::{FileStore, MemoryStore};
use modelfleet::application::OrderStore;
use modelfleet::error::{Error, Result};
use modelfleet::port::KeyValueStore;
use modelfleet::testkit::domain::{host_id, ids};

/// Store whose every call fails.
struct BrokenStore;

impl KeyValueStore for BrokenStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Err(Error::Storage("disk on fire".into()))
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Err(Error::Storage("disk on fire".into()))
    }

    fn store_name(&self) -> &'static str {
        "broken"
    }
}

#[test]
fn failing_store_reads_as_empty_and_swallows_writes() {
    let orders = OrderStore::new(Arc::new(BrokenStore));
    orders.write_host_order(&ids(&["a"]));
    assert!(orders.read_host_order().is_empty());
    assert!(orders.read_instance_order(&host_id("h")).is_empty());
}

#[test]
fn unparsable_value_reads_as_empty() {
    let store = Arc::new(MemoryStore::new());
    store.set(&OrderStore::host_key(), "[1, 2").unwrap();
    store
        .set(&OrderStore::instance_key(&host_id("h")), r#"{"not":"a list"}"#)
        .unwrap();

    let orders = OrderStore::new(store);
    assert!(orders.read_host_order().is_empty());
    assert!(orders.read_instance_order(&host_id("h")).is_empty());
}

#[test]
fn instance_orders_do_not_collide_across_hosts() {
    let orders = OrderStore::new(Arc::new(MemoryStore::new()));
    orders.write_instance_order(&host_id("a"), &ids(&["x", "y"]));
    orders.write_instance_order(&host_id("b"), &ids(&["y", "x"]));
    orders.write_host_order(&ids(&["b", "a"]));

    assert_eq!(orders.read_instance_order(&host_id("a")), ids(&["x", "y"]));
    assert_eq!(orders.read_instance_order(&host_id("b")), ids(&["y", "x"]));
    assert_eq!(orders.read_host_order(), ids(&["b", "a"]));
}

#[test]
fn file_store_round_trips_through_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("order.json");

    {
        let orders = OrderStore::new(Arc::new(FileStore::open(&path).unwrap()));
        orders.write_host_order(&ids(&["h2", "h1"]));
        orders.write_instance_order(&host_id("h1"), &ids(&["i3"]));
    }

    let reopened = OrderStore::new(Arc::new(FileStore::open(&path).unwrap()));
    assert_eq!(reopened.read_host_order(), ids(&["h2", "h1"]));
    assert_eq!(reopened.read_instance_order(&host_id("h1")), ids(&["i3"]));
}

#[test]
fn file_store_write_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("order.json");
    let store = FileStore::open(&path).unwrap();
    store.set("k", "v").unwrap();

    let names: Vec<String> = std::fs::read_dir(dir.path())
        .unwrap()
        .map(|entry| entry.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec!["order.json".to_string()]);
}
