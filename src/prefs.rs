//! Local preference persistence: exactly two string flags survive a reload,
//! the theme choice and the login marker.
//!
//! Storage sits behind the [`KeyValueStore`] trait so the embedding shell can
//! supply whatever medium it has (browser storage, app-data file, nothing).
//! The crate ships an in-memory store and a JSON-file store.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use dashmap::DashMap;
use tracing::warn;

use crate::error::Result;

/// Persisted key for the theme choice. Values: `"dark"` or `"light"`.
pub const THEME_KEY: &str = "theme";

/// Persisted key for the login marker. Value `"true"` when a session should
/// be restored; the key is absent otherwise.
pub const LOGIN_FLAG_KEY: &str = "isLoggedIn";

/// A string key-value medium with localStorage semantics: infallible calls,
/// last write wins, absent keys read as `None`.
pub trait KeyValueStore: Send + Sync {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

// Lets an embedder hand the same store to `Preferences` and keep a handle.
impl<S: KeyValueStore + ?Sized> KeyValueStore for std::sync::Arc<S> {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) {
        (**self).remove(key)
    }
}

// --- In-Memory Store ---

/// A process-local store. State is lost when the process exits, which is
/// exactly what tests and headless embedders want.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: DashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
    }
}

// --- File Store ---

/// A store backed by a small JSON object on disk.
///
/// The whole map is rewritten on every change; with two keys that is cheaper
/// than being clever. Write failures are logged and swallowed so preference
/// persistence never takes the application down.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: DashMap<String, String>,
}

impl FileStore {
    /// Opens (or initializes) the store at `path`.
    ///
    /// # Errors
    ///
    /// Returns an error when an existing file cannot be read or is not a
    /// JSON string map. A missing file is not an error; it reads as empty.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();
        if path.exists() {
            let raw = std::fs::read_to_string(&path)?;
            let map: BTreeMap<String, String> = serde_json::from_str(&raw)?;
            for (k, v) in map {
                entries.insert(k, v);
            }
        }
        Ok(Self { path, entries })
    }

    fn flush(&self) -> Result<()> {
        // BTreeMap keeps the on-disk key order stable across writes.
        let map: BTreeMap<String, String> = self
            .entries
            .iter()
            .map(|e| (e.key().clone(), e.value().clone()))
            .collect();
        let json = serde_json::to_string_pretty(&map)?;
        std::fs::write(&self.path, json)?;
        Ok(())
    }

    fn flush_logged(&self) {
        if let Err(e) = self.flush() {
            warn!(path = %self.path.display(), error = %e, "preference flush failed");
        }
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).map(|e| e.value().clone())
    }

    fn set(&self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
        self.flush_logged();
    }

    fn remove(&self, key: &str) {
        self.entries.remove(key);
        self.flush_logged();
    }
}

// --- Typed Wrapper ---

/// The two theme values the platform knows.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    Dark,
    #[default]
    Light,
}

impl Theme {
    /// The persisted string form.
    pub fn as_str(&self) -> &'static str {
        match self {
            Theme::Dark => "dark",
            Theme::Light => "light",
        }
    }

    /// Interprets a stored value; anything but `"dark"` reads as light.
    pub fn from_stored(value: Option<&str>) -> Theme {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }
}

/// Typed access to the two persisted flags over any [`KeyValueStore`].
pub struct Preferences {
    store: Box<dyn KeyValueStore>,
}

impl Preferences {
    pub fn new(store: impl KeyValueStore + 'static) -> Self {
        Self {
            store: Box::new(store),
        }
    }

    /// An in-memory preference set, for tests and storage-less embedders.
    pub fn in_memory() -> Self {
        Self::new(MemoryStore::new())
    }

    pub fn theme(&self) -> Theme {
        Theme::from_stored(self.store.get(THEME_KEY).as_deref())
    }

    pub fn set_theme(&self, theme: Theme) {
        self.store.set(THEME_KEY, theme.as_str());
    }

    pub fn is_logged_in(&self) -> bool {
        self.store.get(LOGIN_FLAG_KEY).as_deref() == Some("true")
    }

    /// Records the login marker; logging out removes the key entirely so the
    /// stored domain stays `{"true", absent}`.
    pub fn set_logged_in(&self, logged_in: bool) {
        if logged_in {
            self.store.set(LOGIN_FLAG_KEY, "true");
        } else {
            self.store.remove(LOGIN_FLAG_KEY);
        }
    }
}

impl std::fmt::Debug for Preferences {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Preferences")
            .field("theme", &self.theme())
            .field("is_logged_in", &self.is_logged_in())
            .finish()
    }
}
