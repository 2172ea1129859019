use std::fs;
use std::path::PathBuf;
use std::sync::Mutex;

use serde::{Deserialize, Serialize};

use crate::links::LinkGroup;

const CONFIG_DIR: &str = "nexus_terminal";
const SETTINGS_FILE: &str = "settings.json";

/// The complete, defaulted configuration record. Every read yields a value
/// for every field; stored blobs from older versions merge over these
/// defaults field by field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SettingsRecord {
    pub user_name: String,
    pub gemini_api_key: String,
    pub spotify_client_id: String,
    pub focus_minutes: u32,
    pub show_weather: bool,
    pub show_crypto: bool,
    pub show_sports: bool,
    pub show_notes: bool,
    pub show_focus: bool,
    pub custom_links: Option<Vec<LinkGroup>>,
    pub custom_wallpapers: Option<Vec<String>>,
    pub wallpaper_grayscale: bool,
    pub wallpaper_rotation_hours: u32,
}

impl Default for SettingsRecord {
    fn default() -> Self {
        Self {
            user_name: "friend".to_string(),
            gemini_api_key: String::new(),
            spotify_client_id: String::new(),
            focus_minutes: 25,
            show_weather: true,
            show_crypto: true,
            show_sports: true,
            show_notes: true,
            show_focus: true,
            custom_links: None,
            custom_wallpapers: None,
            wallpaper_grayscale: true,
            wallpaper_rotation_hours: 3,
        }
    }
}

/// Partial update: only the fields set here are written; everything else is
/// carried over from the last full record. The nested `Option` on the
/// collection overrides distinguishes "leave alone" from "reset to the
/// built-in defaults".
#[derive(Debug, Clone, Default)]
pub struct SettingsPatch {
    pub user_name: Option<String>,
    pub gemini_api_key: Option<String>,
    pub spotify_client_id: Option<String>,
    pub focus_minutes: Option<u32>,
    pub show_weather: Option<bool>,
    pub show_crypto: Option<bool>,
    pub show_sports: Option<bool>,
    pub show_notes: Option<bool>,
    pub show_focus: Option<bool>,
    pub custom_links: Option<Option<Vec<LinkGroup>>>,
    pub custom_wallpapers: Option<Option<Vec<String>>>,
    pub wallpaper_grayscale: Option<bool>,
    pub wallpaper_rotation_hours: Option<u32>,
}

// Whatever subset of fields the blob on disk carries.
#[derive(Debug, Default, Deserialize)]
struct StoredSettings {
    #[serde(default)]
    user_name: Option<String>,
    #[serde(default)]
    gemini_api_key: Option<String>,
    #[serde(default)]
    spotify_client_id: Option<String>,
    #[serde(default)]
    focus_minutes: Option<u32>,
    #[serde(default)]
    show_weather: Option<bool>,
    #[serde(default)]
    show_crypto: Option<bool>,
    #[serde(default)]
    show_sports: Option<bool>,
    #[serde(default)]
    show_notes: Option<bool>,
    #[serde(default)]
    show_focus: Option<bool>,
    #[serde(default)]
    custom_links: Option<Vec<LinkGroup>>,
    #[serde(default)]
    custom_wallpapers: Option<Vec<String>>,
    #[serde(default)]
    wallpaper_grayscale: Option<bool>,
    #[serde(default)]
    wallpaper_rotation_hours: Option<u32>,
}

impl StoredSettings {
    fn merge_over_defaults(self) -> SettingsRecord {
        let mut record = SettingsRecord::default();
        if let Some(v) = self.user_name {
            record.user_name = v;
        }
        if let Some(v) = self.gemini_api_key {
            record.gemini_api_key = v;
        }
        if let Some(v) = self.spotify_client_id {
            record.spotify_client_id = v;
        }
        if let Some(v) = self.focus_minutes {
            record.focus_minutes = v;
        }
        if let Some(v) = self.show_weather {
            record.show_weather = v;
        }
        if let Some(v) = self.show_crypto {
            record.show_crypto = v;
        }
        if let Some(v) = self.show_sports {
            record.show_sports = v;
        }
        if let Some(v) = self.show_notes {
            record.show_notes = v;
        }
        if let Some(v) = self.show_focus {
            record.show_focus = v;
        }
        if self.custom_links.is_some() {
            record.custom_links = self.custom_links;
        }
        if self.custom_wallpapers.is_some() {
            record.custom_wallpapers = self.custom_wallpapers;
        }
        if let Some(v) = self.wallpaper_grayscale {
            record.wallpaper_grayscale = v;
        }
        if let Some(v) = self.wallpaper_rotation_hours {
            record.wallpaper_rotation_hours = v;
        }
        record
    }
}

type Subscriber = Box<dyn Fn(&SettingsRecord) + Send>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubscriptionId(u64);

/// Single source of truth for user configuration. Owned by the application
/// root and shared behind an `Arc`; tests construct one against a temp path.
/// Subscribers are notified synchronously on every successful write and live
/// until unsubscribed.
pub struct SettingsStore {
    path: Option<PathBuf>,
    subscribers: Mutex<Vec<(u64, Subscriber)>>,
    next_id: Mutex<u64>,
    write_gate: Mutex<()>,
}

impl SettingsStore {
    pub fn new(path: PathBuf) -> Self {
        Self {
            path: Some(path),
            subscribers: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
            write_gate: Mutex::new(()),
        }
    }

    /// Store at the conventional config location, or an in-memory-defaults
    /// store when no home directory can be resolved.
    pub fn open_default() -> Self {
        Self {
            path: config_path(),
            subscribers: Mutex::new(Vec::new()),
            next_id: Mutex::new(0),
            write_gate: Mutex::new(()),
        }
    }

    /// Fails soft: a missing, corrupt, or unparsable blob yields the default
    /// record unmodified.
    pub fn read(&self) -> SettingsRecord {
        let Some(path) = self.path.as_ref() else {
            return SettingsRecord::default();
        };
        let Ok(raw) = fs::read_to_string(path) else {
            return SettingsRecord::default();
        };
        let Ok(stored) = serde_json::from_str::<StoredSettings>(&raw) else {
            return SettingsRecord::default();
        };
        stored.merge_over_defaults()
    }

    /// Merges the patch over the current full record, persists it, then
    /// notifies every subscriber with the merged record. A failed persist is
    /// logged and swallowed; subscribers are not notified in that case.
    pub fn write(&self, patch: SettingsPatch) {
        let _gate = self.write_gate.lock().expect("settings write gate poisoned");
        let mut record = self.read();
        apply_patch(&mut record, patch);
        if !self.persist(&record) {
            return;
        }
        let subscribers = self.subscribers.lock().expect("settings subscribers poisoned");
        for (_, callback) in subscribers.iter() {
            callback(&record);
        }
    }

    pub fn subscribe(&self, callback: impl Fn(&SettingsRecord) + Send + 'static) -> SubscriptionId {
        let mut next_id = self.next_id.lock().expect("settings id counter poisoned");
        let id = *next_id;
        *next_id += 1;
        self.subscribers
            .lock()
            .expect("settings subscribers poisoned")
            .push((id, Box::new(callback)));
        SubscriptionId(id)
    }

    pub fn gemini_api_key(&self) -> String {
        self.read().gemini_api_key
    }

    pub fn spotify_client_id(&self) -> String {
        self.read().spotify_client_id
    }

    pub fn set_user_name(&self, name: String) {
        self.write(SettingsPatch {
            user_name: Some(name),
            ..Default::default()
        });
    }

    /// Focus sessions run between 5 and 60 minutes.
    pub fn set_focus_minutes(&self, minutes: u32) {
        self.write(SettingsPatch {
            focus_minutes: Some(minutes.clamp(5, 60)),
            ..Default::default()
        });
    }

    /// Wallpapers rotate between every hour and every day.
    pub fn set_wallpaper_rotation_hours(&self, hours: u32) {
        self.write(SettingsPatch {
            wallpaper_rotation_hours: Some(hours.clamp(1, 24)),
            ..Default::default()
        });
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.subscribers
            .lock()
            .expect("settings subscribers poisoned")
            .retain(|(sub_id, _)| *sub_id != id.0);
    }

    fn persist(&self, record: &SettingsRecord) -> bool {
        let Some(path) = self.path.as_ref() else {
            // No storage location; treat the write as failed so subscribers
            // never observe state that would vanish on restart.
            return false;
        };
        let Some(dir) = path.parent() else {
            return false;
        };
        let _ = fs::create_dir_all(dir);
        let Ok(json) = serde_json::to_string_pretty(record) else {
            return false;
        };
        let tmp = path.with_extension("json.tmp");
        if fs::write(&tmp, json).is_err() {
            eprintln!("[WARN] settings write failed: {}", tmp.display());
            return false;
        }
        if fs::rename(&tmp, path).is_err() {
            eprintln!("[WARN] settings rename failed: {}", path.display());
            return false;
        }
        true
    }
}

fn apply_patch(record: &mut SettingsRecord, patch: SettingsPatch) {
    if let Some(v) = patch.user_name {
        record.user_name = v;
    }
    if let Some(v) = patch.gemini_api_key {
        record.gemini_api_key = v;
    }
    if let Some(v) = patch.spotify_client_id {
        record.spotify_client_id = v;
    }
    if let Some(v) = patch.focus_minutes {
        record.focus_minutes = v;
    }
    if let Some(v) = patch.show_weather {
        record.show_weather = v;
    }
    if let Some(v) = patch.show_crypto {
        record.show_crypto = v;
    }
    if let Some(v) = patch.show_sports {
        record.show_sports = v;
    }
    if let Some(v) = patch.show_notes {
        record.show_notes = v;
    }
    if let Some(v) = patch.show_focus {
        record.show_focus = v;
    }
    if let Some(v) = patch.custom_links {
        record.custom_links = v;
    }
    if let Some(v) = patch.custom_wallpapers {
        record.custom_wallpapers = v;
    }
    if let Some(v) = patch.wallpaper_grayscale {
        record.wallpaper_grayscale = v;
    }
    if let Some(v) = patch.wallpaper_rotation_hours {
        record.wallpaper_rotation_hours = v;
    }
}

fn config_path() -> Option<PathBuf> {
    if let Ok(base) = std::env::var("XDG_CONFIG_HOME") {
        if !base.trim().is_empty() {
            return Some(PathBuf::from(base).join(CONFIG_DIR).join(SETTINGS_FILE));
        }
    }
    let home = std::env::var("HOME").ok()?;
    if home.trim().is_empty() {
        return None;
    }
    Some(
        PathBuf::from(home)
            .join(".config")
            .join(CONFIG_DIR)
            .join(SETTINGS_FILE),
    )
}
