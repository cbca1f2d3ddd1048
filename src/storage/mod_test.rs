use super::*;
use serde::Deserialize;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Draft {
    title: String,
    count: u32,
}

struct BrokenStore;

impl KvStore for BrokenStore {
    fn get_item(&self, _key: &str) -> Result<Option<String>, StorageError> {
        Err(StorageError::Unavailable)
    }

    fn set_item(&self, _key: &str, _value: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }

    fn remove_item(&self, _key: &str) -> Result<(), StorageError> {
        Err(StorageError::Unavailable)
    }
}

#[test]
fn save_then_load_returns_same_value() {
    let store = MemoryStore::new();
    let draft = Draft { title: "notes".into(), count: 3 };
    save_json(&store, "draft", &draft);
    assert_eq!(load_json::<Draft>(&store, "draft"), Some(draft));
}

#[test]
fn load_missing_key_is_none() {
    let store = MemoryStore::new();
    assert_eq!(load_json::<Draft>(&store, "draft"), None);
}

#[test]
fn load_corrupt_document_is_none() {
    let store = MemoryStore::new();
    store.set_item("draft", "{\"title\":").unwrap();
    assert_eq!(load_json::<Draft>(&store, "draft"), None);
}

#[test]
fn unavailable_storage_degrades_silently() {
    let store = BrokenStore;
    save_json(&store, "draft", &Draft { title: "x".into(), count: 1 });
    remove_key(&store, "draft");
    assert_eq!(load_json::<Draft>(&store, "draft"), None);
}

#[test]
fn remove_key_deletes_value() {
    let store = MemoryStore::new();
    save_json(&store, "draft", &Draft { title: "x".into(), count: 1 });
    remove_key(&store, "draft");
    assert!(store.is_empty());
}

#[test]
fn shared_references_and_arcs_are_stores() {
    let store = std::sync::Arc::new(MemoryStore::new());
    let by_ref: &MemoryStore = &store;
    save_json(&by_ref, "k", &1_u8);
    assert_eq!(load_json::<u8>(&store, "k"), Some(1));
}
