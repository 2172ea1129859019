use std::fs;
use std::path::PathBuf;
use std::sync::mpsc;
use std::sync::{Arc, Mutex};

use nexus_terminal::links::{LinkGroup, LinkItem};
use nexus_terminal::settings::{SettingsPatch, SettingsRecord, SettingsStore};

fn temp_store(case: &str) -> (SettingsStore, PathBuf) {
    let dir = std::env::temp_dir()
        .join("nexus_terminal_tests")
        .join(format!("{}-{case}", std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).expect("temp dir should be creatable");
    let path = dir.join("settings.json");
    (SettingsStore::new(path.clone()), path)
}

fn one_group() -> Vec<LinkGroup> {
    vec![LinkGroup {
        title: "work".to_string(),
        items: vec![LinkItem {
            label: "tracker".to_string(),
            url: "https://example.com/tracker".to_string(),
            icon: "list".to_string(),
        }],
    }]
}

#[test]
fn read_without_a_blob_returns_defaults() {
    let (store, _path) = temp_store("missing");
    assert_eq!(store.read(), SettingsRecord::default());
}

#[test]
fn read_over_corrupt_blob_returns_defaults() {
    let (store, path) = temp_store("corrupt");
    fs::write(&path, "{ this is not json").expect("write should succeed");
    assert_eq!(store.read(), SettingsRecord::default());
}

#[test]
fn read_is_idempotent() {
    let (store, _path) = temp_store("idempotent");
    store.write(SettingsPatch {
        user_name: Some("ada".to_string()),
        ..Default::default()
    });
    assert_eq!(store.read(), store.read());
}

#[test]
fn partial_write_leaves_other_fields_untouched() {
    let (store, _path) = temp_store("partial");
    store.write(SettingsPatch {
        show_crypto: Some(false),
        ..Default::default()
    });
    store.write(SettingsPatch {
        user_name: Some("ada".to_string()),
        ..Default::default()
    });

    let record = store.read();
    assert_eq!(record.user_name, "ada");
    assert!(!record.show_crypto);
    assert_eq!(record.focus_minutes, SettingsRecord::default().focus_minutes);
    assert!(record.show_weather);
}

#[test]
fn stored_partial_blob_merges_over_defaults() {
    let (store, path) = temp_store("upgrade");
    // A blob written by an older build that knew fewer fields.
    fs::write(&path, r#"{"user_name":"old-timer","show_sports":false}"#)
        .expect("write should succeed");

    let record = store.read();
    assert_eq!(record.user_name, "old-timer");
    assert!(!record.show_sports);
    assert_eq!(record.wallpaper_rotation_hours, 3);
    assert!(record.custom_links.is_none());
}

#[test]
fn custom_links_replace_wholesale_and_reset_restores_defaults() {
    let (store, _path) = temp_store("links");
    store.write(SettingsPatch {
        custom_links: Some(Some(one_group())),
        ..Default::default()
    });
    assert_eq!(store.read().custom_links, Some(one_group()));

    store.write(SettingsPatch {
        custom_links: Some(None),
        ..Default::default()
    });
    assert!(store.read().custom_links.is_none());
}

#[test]
fn writes_survive_reopening_the_store() {
    let (store, path) = temp_store("reopen");
    store.write(SettingsPatch {
        wallpaper_grayscale: Some(false),
        focus_minutes: Some(40),
        ..Default::default()
    });

    let reopened = SettingsStore::new(path);
    let record = reopened.read();
    assert!(!record.wallpaper_grayscale);
    assert_eq!(record.focus_minutes, 40);
}

#[test]
fn each_subscriber_sees_every_write_in_order() {
    let (store, _path) = temp_store("notify");
    let seen: Arc<Mutex<Vec<String>>> = Arc::new(Mutex::new(Vec::new()));

    let seen_a = seen.clone();
    store.subscribe(move |record| {
        seen_a
            .lock()
            .unwrap()
            .push(format!("a:{}", record.user_name));
    });
    let seen_b = seen.clone();
    store.subscribe(move |record| {
        seen_b
            .lock()
            .unwrap()
            .push(format!("b:{}", record.user_name));
    });

    store.set_user_name("first".to_string());
    store.set_user_name("second".to_string());

    let seen = seen.lock().unwrap();
    assert_eq!(
        *seen,
        vec!["a:first", "b:first", "a:second", "b:second"]
    );
}

#[test]
fn notification_carries_the_full_merged_record() {
    let (store, _path) = temp_store("merged");
    let (tx, rx) = mpsc::channel();
    store.subscribe(move |record| {
        let _ = tx.send(record.clone());
    });

    store.write(SettingsPatch {
        show_notes: Some(false),
        ..Default::default()
    });
    store.write(SettingsPatch {
        user_name: Some("grace".to_string()),
        ..Default::default()
    });

    let first = rx.recv().expect("first notification");
    assert!(!first.show_notes);
    assert_eq!(first.user_name, "friend");

    let second = rx.recv().expect("second notification");
    assert_eq!(second.user_name, "grace");
    // The earlier write is still reflected in the merged record.
    assert!(!second.show_notes);
}

#[test]
fn unsubscribed_callbacks_stop_receiving() {
    let (store, _path) = temp_store("unsubscribe");
    let count = Arc::new(Mutex::new(0u32));

    let count_inner = count.clone();
    let id = store.subscribe(move |_| {
        *count_inner.lock().unwrap() += 1;
    });

    store.set_user_name("one".to_string());
    store.unsubscribe(id);
    store.set_user_name("two".to_string());

    assert_eq!(*count.lock().unwrap(), 1);
}

#[test]
fn numeric_preferences_are_clamped_by_the_typed_writers() {
    let (store, _path) = temp_store("clamp");
    store.set_focus_minutes(2);
    assert_eq!(store.read().focus_minutes, 5);
    store.set_focus_minutes(90);
    assert_eq!(store.read().focus_minutes, 60);

    store.set_wallpaper_rotation_hours(0);
    assert_eq!(store.read().wallpaper_rotation_hours, 1);
    store.set_wallpaper_rotation_hours(48);
    assert_eq!(store.read().wallpaper_rotation_hours, 24);
}
