use pretty_assertions::assert_eq;
use serde::{Deserialize, Serialize};
use sheetgate_properties::{now_millis, PropertyError, PropertyScope, PropertyStore};
use std::collections::BTreeMap;

#[derive(Debug, PartialEq, Serialize, Deserialize)]
struct Sample {
    names: Vec<String>,
}

// ── Basic get / set ──────────────────────────────────────────────

#[test]
fn get_missing_returns_none() {
    let store = PropertyStore::open_in_memory().unwrap();
    assert_eq!(store.script().get("SETUP_DATE").unwrap(), None);
}

#[test]
fn set_then_get() {
    let store = PropertyStore::open_in_memory().unwrap();
    let props = store.script();
    props.set("SETUP_DATE", "2024-01-01T00:00:00Z").unwrap();
    assert_eq!(
        props.get("SETUP_DATE").unwrap().as_deref(),
        Some("2024-01-01T00:00:00Z")
    );
}

#[test]
fn last_write_wins() {
    let store = PropertyStore::open_in_memory().unwrap();
    let props = store.script();
    props.set("k", "one").unwrap();
    props.set("k", "two").unwrap();
    assert_eq!(props.get("k").unwrap().as_deref(), Some("two"));
    assert_eq!(props.get_all().unwrap().len(), 1);
}

// ── Scopes ───────────────────────────────────────────────────────

#[test]
fn scopes_are_isolated() {
    let store = PropertyStore::open_in_memory().unwrap();
    store.script().set("0", "script-value").unwrap();
    store.user("a@x.com").set("0", "a-value").unwrap();

    assert_eq!(store.script().get("0").unwrap().as_deref(), Some("script-value"));
    assert_eq!(store.user("a@x.com").get("0").unwrap().as_deref(), Some("a-value"));
    assert_eq!(store.user("b@x.com").get("0").unwrap(), None);
}

#[test]
fn scope_display() {
    assert_eq!(PropertyScope::Script.to_string(), "script");
    assert_eq!(PropertyScope::User("a@x.com".into()).to_string(), "user:a@x.com");
}

// ── Bulk operations ──────────────────────────────────────────────

#[test]
fn get_all_lists_scope_only() {
    let store = PropertyStore::open_in_memory().unwrap();
    let props = store.script();
    props.set("A", "1").unwrap();
    props.set("B", "2").unwrap();
    store.user("someone@x.com").set("C", "3").unwrap();

    let expected: BTreeMap<String, String> =
        [("A".to_string(), "1".to_string()), ("B".to_string(), "2".to_string())]
            .into_iter()
            .collect();
    assert_eq!(props.get_all().unwrap(), expected);
}

#[test]
fn delete_and_delete_all() {
    let store = PropertyStore::open_in_memory().unwrap();
    let props = store.script();
    for key in ["A", "B", "C"] {
        props.set(key, "v").unwrap();
    }

    props.delete("A").unwrap();
    assert_eq!(props.get("A").unwrap(), None);

    props.delete_all(&["B", "C", "never-written"]).unwrap();
    assert!(props.get_all().unwrap().is_empty());
}

#[test]
fn delete_missing_is_ok() {
    let store = PropertyStore::open_in_memory().unwrap();
    store.script().delete("nope").unwrap();
}

// ── JSON helpers ─────────────────────────────────────────────────

#[test]
fn json_roundtrip() {
    let store = PropertyStore::open_in_memory().unwrap();
    let props = store.script();
    let value = Sample {
        names: vec!["a".into(), "b".into()],
    };
    props.set_json("LIST", &value).unwrap();
    assert_eq!(props.get_json::<Sample>("LIST").unwrap(), Some(value));
}

#[test]
fn json_missing_is_none() {
    let store = PropertyStore::open_in_memory().unwrap();
    assert_eq!(store.script().get_json::<Sample>("LIST").unwrap(), None);
}

#[test]
fn json_corrupt_is_distinguishable() {
    let store = PropertyStore::open_in_memory().unwrap();
    let props = store.script();
    props.set("LIST", "{not json").unwrap();

    match props.get_json::<Sample>("LIST") {
        Err(PropertyError::Corrupt { key, .. }) => assert_eq!(key, "LIST"),
        other => panic!("expected Corrupt, got {other:?}"),
    }
}

// ── Persistence ──────────────────────────────────────────────────

#[test]
fn values_survive_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("props.duckdb");

    {
        let store = PropertyStore::open(&path).unwrap();
        store.script().set("SETUP_DATE", "today").unwrap();
    }

    let store = PropertyStore::open(&path).unwrap();
    assert_eq!(store.script().get("SETUP_DATE").unwrap().as_deref(), Some("today"));
}

// ── Clock ────────────────────────────────────────────────────────

#[test]
fn now_millis_is_epoch_milliseconds() {
    let before = now_millis();
    let after = now_millis();
    // 2020-09-13 in milliseconds.
    assert!(before > 1_600_000_000_000);
    assert!(after >= before);
}
