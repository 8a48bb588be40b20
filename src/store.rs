use std::collections::HashMap;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use tracing::{debug, warn};

use crate::error::{StoreError, StoreResult};
use crate::shot::Player;

const RESOURCE_EXT: &str = "json";

/// Read-only access to the bundled `<id>.json` player resources.
#[derive(Debug)]
pub struct PlayerRecordStore {
    root: PathBuf,
    memo: Option<Mutex<HashMap<String, Arc<Player>>>>,
    loads: AtomicUsize,
}

impl PlayerRecordStore {
    /// Store with memoization on; resources never change for the process lifetime.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self::with_memo(root, true)
    }

    pub fn with_memo(root: impl Into<PathBuf>, memo: bool) -> Self {
        Self {
            root: root.into(),
            memo: memo.then(|| Mutex::new(HashMap::new())),
            loads: AtomicUsize::new(0),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn resource_path(&self, id: &str) -> PathBuf {
        self.root.join(format!("{id}.{RESOURCE_EXT}"))
    }

    pub fn load(&self, id: &str) -> StoreResult<Arc<Player>> {
        self.loads.fetch_add(1, Ordering::Relaxed);
        if !is_valid_id(id) {
            debug!(id, "rejecting malformed player id");
            return Err(StoreError::NotFound { id: id.to_string() });
        }
        if let Some(hit) = self.cached(id) {
            return Ok(hit);
        }

        let path = self.resource_path(id);
        let raw = match fs::read_to_string(&path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == ErrorKind::NotFound => {
                debug!(id, path = %path.display(), "player resource missing");
                return Err(StoreError::NotFound { id: id.to_string() });
            }
            Err(source) => return Err(StoreError::Io { path, source }),
        };
        let mut player = serde_json::from_str::<Player>(&raw).map_err(|source| {
            StoreError::Decode {
                id: id.to_string(),
                source,
            }
        })?;
        if player.id.is_empty() {
            player.id = id.to_string();
        } else if player.id != id {
            warn!(id, embedded = %player.id, "player resource id disagrees with file name");
            player.id = id.to_string();
        }
        debug!(id, shots = player.shots.len(), "loaded player resource");

        let player = Arc::new(player);
        if let Some(memo) = &self.memo {
            memo.lock()
                .expect("player cache lock poisoned")
                .insert(id.to_string(), Arc::clone(&player));
        }
        Ok(player)
    }

    fn cached(&self, id: &str) -> Option<Arc<Player>> {
        let memo = self.memo.as_ref()?;
        let guard = memo.lock().expect("player cache lock poisoned");
        guard.get(id).cloned()
    }

    /// Number of `load` calls so far, cache hits included.
    pub fn load_attempts(&self) -> usize {
        self.loads.load(Ordering::Relaxed)
    }

    pub fn cached_len(&self) -> usize {
        self.memo
            .as_ref()
            .map(|m| m.lock().expect("player cache lock poisoned").len())
            .unwrap_or(0)
    }

    /// Identifiers of every bundled resource, sorted.
    pub fn list_ids(&self) -> StoreResult<Vec<String>> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(err) if err.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(source) => {
                return Err(StoreError::Io {
                    path: self.root.clone(),
                    source,
                });
            }
        };
        let mut ids: Vec<String> = entries
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == RESOURCE_EXT))
            .filter_map(|path| path.file_stem()?.to_str().map(str::to_string))
            .filter(|id| is_valid_id(id))
            .collect();
        ids.sort();
        Ok(ids)
    }

    /// Writes a resource with canonical field names, replacing any previous file.
    pub fn save(&self, player: &Player) -> Result<PathBuf> {
        if !is_valid_id(&player.id) {
            anyhow::bail!("invalid player id {:?}", player.id);
        }
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create {}", self.root.display()))?;
        let path = self.resource_path(&player.id);
        let tmp = path.with_extension("json.tmp");
        let json = serde_json::to_string_pretty(player).context("serialize player")?;
        fs::write(&tmp, json).with_context(|| format!("write {}", tmp.display()))?;
        fs::rename(&tmp, &path).with_context(|| format!("swap {}", path.display()))?;
        if let Some(memo) = &self.memo {
            memo.lock()
                .expect("player cache lock poisoned")
                .remove(&player.id);
        }
        Ok(path)
    }
}

fn is_valid_id(id: &str) -> bool {
    !id.is_empty()
        && !id.starts_with('.')
        && !id.contains(['/', '\\'])
        && !id.contains("..")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shot::Shot;

    fn write(dir: &Path, name: &str, body: &str) {
        fs::write(dir.join(name), body).unwrap();
    }

    #[test]
    fn missing_resource_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlayerRecordStore::new(dir.path());
        let err = store.load("999").unwrap_err();
        assert!(err.is_not_found());
    }

    #[test]
    fn path_like_ids_are_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlayerRecordStore::new(dir.path());
        for id in ["", "../etc/passwd", "a/b", ".hidden", "a\\b"] {
            assert!(store.load(id).unwrap_err().is_not_found(), "{id}");
        }
    }

    #[test]
    fn schema_mismatch_is_decode_error() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "7.json", r#"{"name":"Bad","shots":[{"LOC_X":"left"}]}"#);
        let store = PlayerRecordStore::new(dir.path());
        assert!(store.load("7").unwrap_err().is_decode());
    }

    #[test]
    fn fills_missing_id_and_memoizes() {
        let dir = tempfile::tempdir().unwrap();
        write(
            dir.path(),
            "11.json",
            r#"{"name":"Memo","shots":[{"SHOT_MADE_FLAG":1,"LOC_X":0,"LOC_Y":0}]}"#,
        );
        let store = PlayerRecordStore::new(dir.path());
        let first = store.load("11").unwrap();
        assert_eq!(first.id, "11");
        assert_eq!(store.cached_len(), 1);
        let second = store.load("11").unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(store.load_attempts(), 2);
    }

    #[test]
    fn uncached_store_reloads() {
        let dir = tempfile::tempdir().unwrap();
        write(dir.path(), "5.json", r#"{"name":"Fresh","shots":[]}"#);
        let store = PlayerRecordStore::with_memo(dir.path(), false);
        let a = store.load("5").unwrap();
        let b = store.load("5").unwrap();
        assert!(!Arc::ptr_eq(&a, &b));
        assert_eq!(store.cached_len(), 0);
    }

    #[test]
    fn save_then_list() {
        let dir = tempfile::tempdir().unwrap();
        let store = PlayerRecordStore::new(dir.path().join("players"));
        assert!(store.list_ids().unwrap().is_empty());
        let player = Player {
            name: "Saved".to_string(),
            id: "77".to_string(),
            bio: None,
            shots: vec![Shot::new(true, 1.0, 2.0)],
        };
        store.save(&player).unwrap();
        write(store.root(), "notes.txt", "ignored");
        assert_eq!(store.list_ids().unwrap(), vec!["77".to_string()]);
        assert_eq!(*store.load("77").unwrap(), player);
    }
}
