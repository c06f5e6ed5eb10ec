use log::{debug, info, warn};
use serde::{Deserialize, Serialize};
use std::io::Write;
use std::path::{Path, PathBuf};

#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("shortcut file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("cannot serialize shortcuts: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// One launcher shortcut. All three fields are non-empty once loaded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ShortcutEntry {
    pub name: String,
    pub icon: String,
    pub target: String,
}

impl ShortcutEntry {
    #[cfg(test)]
    pub fn new(
        name: impl Into<String>,
        icon: impl Into<String>,
        target: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            icon: icon.into(),
            target: target.into(),
        }
    }
}

// Lenient mirror of `ShortcutEntry`: a missing field deserializes to `None`
// and the entry is dropped later instead of failing the whole file.
#[derive(Deserialize)]
struct StoredEntry {
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    icon: Option<String>,
    #[serde(default)]
    target: Option<String>,
}

impl StoredEntry {
    fn into_entry(self) -> Option<ShortcutEntry> {
        let non_empty = |value: Option<String>| value.filter(|s| !s.is_empty());
        Some(ShortcutEntry {
            name: non_empty(self.name)?,
            icon: non_empty(self.icon)?,
            target: non_empty(self.target)?,
        })
    }
}

/// The persisted shortcut list.
#[derive(Debug, Clone)]
pub struct AppRegistry {
    path: PathBuf,
}

impl AppRegistry {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Reads the shortcut file. Never fails: an absent file is created empty,
    /// and an unreadable or malformed one reads as no shortcuts.
    pub fn load(&self) -> Vec<ShortcutEntry> {
        if !self.path.exists() {
            info!("creating empty shortcut file at {}", self.path.display());
            if let Err(err) = self.save(&[]) {
                warn!("{err}");
            }
            return Vec::new();
        }

        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) => {
                warn!("cannot read {}: {err}", self.path.display());
                return Vec::new();
            }
        };
        parse_entries(&raw).unwrap_or_else(|| {
            warn!(
                "{} is not a JSON list of shortcuts, showing none",
                self.path.display()
            );
            Vec::new()
        })
    }

    /// Replaces the shortcut file with `entries`. The data goes to a sibling
    /// file first and is renamed over the old one.
    pub fn save(&self, entries: &[ShortcutEntry]) -> Result<(), StorageError> {
        let io_err = |source| StorageError::Io {
            path: self.path.clone(),
            source,
        };

        if let Some(dir) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir).map_err(io_err)?;
        }

        let mut payload = serde_json::to_vec_pretty(entries)?;
        payload.push(b'\n');

        let staging = self.path.with_extension("json.tmp");
        let written = write_synced(&staging, &payload)
            .and_then(|()| std::fs::rename(&staging, &self.path));
        if written.is_err() {
            // The old file, if any, is still in place.
            let _ = std::fs::remove_file(&staging);
        }
        written.map_err(io_err)
    }
}

fn write_synced(path: &Path, payload: &[u8]) -> std::io::Result<()> {
    let mut file = std::fs::File::create(path)?;
    file.write_all(payload)?;
    file.sync_all()
}

fn parse_entries(raw: &str) -> Option<Vec<ShortcutEntry>> {
    let serde_json::Value::Array(items) = serde_json::from_str(raw).ok()? else {
        return None;
    };

    let entries = items
        .into_iter()
        .enumerate()
        .filter_map(|(index, item)| {
            let entry = serde_json::from_value::<StoredEntry>(item)
                .ok()
                .and_then(StoredEntry::into_entry);
            if entry.is_none() {
                debug!("dropping malformed shortcut at index {index}");
            }
            entry
        })
        .collect();
    Some(entries)
}
