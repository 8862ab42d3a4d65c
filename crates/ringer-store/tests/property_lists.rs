use chrono::{TimeZone, Utc};
use ringer_store::error::StoreError;
use ringer_store::{PropertyDictionary, PropertyListStorage, PropertyValue, Store};
use tempfile::TempDir;

fn sample() -> Vec<PropertyDictionary> {
    vec![
        PropertyDictionary::from([
            ("user".to_string(), PropertyValue::from("alice")),
            ("duration".to_string(), PropertyValue::Integer(-5)),
            ("incoming".to_string(), PropertyValue::Bool(true)),
            (
                "date".to_string(),
                PropertyValue::Date(Utc.with_ymd_and_hms(2016, 1, 2, 3, 4, 5).unwrap()),
            ),
        ]),
        PropertyDictionary::new(),
        PropertyDictionary::from([("user".to_string(), PropertyValue::from(""))]),
    ]
}

#[test]
fn property_list_roundtrip_keeps_order_and_empty_items() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let list = store.property_list("calls");
    assert!(!list.exists().expect("exists"));
    list.save(&sample()).expect("save");
    assert!(list.exists().expect("exists"));
    assert_eq!(list.load().expect("load"), sample());
}

#[test]
fn save_replaces_previous_contents() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let list = store.property_list("calls");
    list.save(&sample()).expect("save");
    list.save(&sample()[..1]).expect("save shorter");
    assert_eq!(list.load().expect("load"), sample()[..1].to_vec());
}

#[test]
fn lists_are_isolated_by_name() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    store.property_list("a").save(&sample()).expect("save a");
    store.property_list("b").save(&[]).expect("save b");
    assert_eq!(store.property_list("b").load().expect("load b"), Vec::new());
    store.property_list("b").delete().expect("delete b");
    assert_eq!(store.property_list("a").load().expect("load a"), sample());
}

#[test]
fn missing_list_is_not_found() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");

    let list = store.property_list("never-saved");
    assert!(matches!(list.load(), Err(StoreError::NotFound(_))));
    assert!(matches!(list.delete(), Err(StoreError::NotFound(_))));
}

#[test]
fn unknown_kind_is_corrupt() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store.property_list("calls").save(&sample()).expect("save");

    store
        .connection()
        .execute(
            "UPDATE property_list_values SET kind = 'float' WHERE key = 'duration';",
            [],
        )
        .expect("tamper");

    let err = store.property_list("calls").load().unwrap_err();
    assert!(matches!(err, StoreError::CorruptProperty(_)));
}

#[test]
fn invalid_date_is_corrupt() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store.property_list("calls").save(&sample()).expect("save");

    store
        .connection()
        .execute(
            "UPDATE property_list_values SET value = 'yesterday' WHERE key = 'date';",
            [],
        )
        .expect("tamper");

    let err = store.property_list("calls").load().unwrap_err();
    assert!(matches!(err, StoreError::CorruptProperty(_)));
}

#[test]
fn list_survives_reopen() {
    let temp = TempDir::new().expect("temp dir");
    let db_path = temp.path().join("ringer.sqlite3");
    {
        let store = Store::open(&db_path).expect("open store");
        store.migrate().expect("migrate");
        store.property_list("calls").save(&sample()).expect("save");
    }

    let store = Store::open(&db_path).expect("reopen store");
    store.migrate().expect("migrate again");
    assert_eq!(store.schema_version().expect("version"), 1);
    assert_eq!(store.property_list("calls").load().expect("load"), sample());
}

#[test]
fn out_of_range_item_position_is_corrupt() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store.property_list("calls").save(&[]).expect("save");

    store
        .connection()
        .execute(
            "INSERT INTO property_list_items (list_name, position)
             VALUES ('calls', 9223372036854775807);",
            [],
        )
        .expect("tamper");

    let err = store.property_list("calls").load().unwrap_err();
    assert!(matches!(err, StoreError::CorruptProperty(_)));
}

#[test]
fn gap_in_item_positions_is_corrupt() {
    let store = Store::open_in_memory().expect("open in memory");
    store.migrate().expect("migrate");
    store.property_list("calls").save(&sample()).expect("save");

    store
        .connection()
        .execute(
            "DELETE FROM property_list_items WHERE list_name = 'calls' AND position = 1;",
            [],
        )
        .expect("tamper");

    let err = store.property_list("calls").load().unwrap_err();
    assert!(matches!(err, StoreError::CorruptProperty(_)));
}
