use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

/// On-disk JSON cache, one directory per game:
///
/// ```text
/// data/game_<id>/summary.json
/// data/game_<id>/espn_plays.json
/// data/game_<id>/drives.json
/// data/game_<id>/cfbd_plays.json
/// data/game_<id>/cfbd_wp.json
/// ```
#[derive(Debug, Clone)]
pub struct CacheStore {
    root: PathBuf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheKind {
    Summary,
    EspnPlays,
    Drives,
    CfbdPlays,
    CfbdWp,
}

impl CacheKind {
    pub fn file_name(self) -> &'static str {
        match self {
            CacheKind::Summary => "summary.json",
            CacheKind::EspnPlays => "espn_plays.json",
            CacheKind::Drives => "drives.json",
            CacheKind::CfbdPlays => "cfbd_plays.json",
            CacheKind::CfbdWp => "cfbd_wp.json",
        }
    }
}

impl CacheStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    fn game_dir(&self, game_id: u64) -> PathBuf {
        self.root.join(format!("game_{}", game_id))
    }

    pub fn path(&self, game_id: u64, kind: CacheKind) -> PathBuf {
        self.game_dir(game_id).join(kind.file_name())
    }

    pub fn exists(&self, game_id: u64, kind: CacheKind) -> bool {
        self.path(game_id, kind).is_file()
    }

    pub fn save<T: Serialize>(&self, game_id: u64, kind: CacheKind, value: &T) -> Result<()> {
        let dir = self.game_dir(game_id);
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create cache dir {}", dir.display()))?;
        let path = self.path(game_id, kind);
        let json = serde_json::to_string_pretty(value)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write {}", path.display()))?;
        tracing::debug!(path = %path.display(), "cached");
        Ok(())
    }

    pub fn load<T: DeserializeOwned>(&self, game_id: u64, kind: CacheKind) -> Result<T> {
        let path = self.path(game_id, kind);
        let content = std::fs::read_to_string(&path)
            .with_context(|| format!("failed to read cache file {}", path.display()))?;
        serde_json::from_str(&content)
            .with_context(|| format!("failed to parse cache file {}", path.display()))
    }

    /// Enumerate cached game ids (directories named `game_<id>`).
    pub fn games(&self) -> Result<Vec<u64>> {
        let mut ids = Vec::new();
        let entries = match std::fs::read_dir(&self.root) {
            Ok(e) => e,
            Err(_) => return Ok(ids), // no cache dir yet
        };
        for entry in entries {
            let entry = entry?;
            if !entry.file_type()?.is_dir() {
                continue;
            }
            let name = entry.file_name();
            let Some(id) = name.to_str().and_then(|n| n.strip_prefix("game_")) else {
                continue;
            };
            if let Ok(id) = id.parse::<u64>() {
                ids.push(id);
            }
        }
        ids.sort_unstable();
        Ok(ids)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn temp_store(tag: &str) -> CacheStore {
        let dir = std::env::temp_dir().join(format!("cfb_review_cache_{}_{}", tag, std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        CacheStore::new(dir)
    }

    #[test]
    fn test_save_load_round_trip() {
        let store = temp_store("rt");
        let value = json!({"plays": [{"id": "1", "text": "kickoff"}]});
        store.save(401752873, CacheKind::EspnPlays, &value).unwrap();
        assert!(store.exists(401752873, CacheKind::EspnPlays));
        let loaded: serde_json::Value = store.load(401752873, CacheKind::EspnPlays).unwrap();
        assert_eq!(loaded, value);
        let _ = std::fs::remove_dir_all(store.root());
    }

    #[test]
    fn test_games_enumeration() {
        let store = temp_store("enum");
        store.save(2, CacheKind::Summary, &json!({})).unwrap();
        store.save(1, CacheKind::Summary, &json!({})).unwrap();
        assert_eq!(store.games().unwrap(), vec![1, 2]);
        let _ = std::fs::remove_dir_all(store.root());
    }

    #[test]
    fn test_missing_file_is_error_with_path() {
        let store = temp_store("miss");
        let err = store
            .load::<serde_json::Value>(99, CacheKind::Drives)
            .unwrap_err();
        assert!(format!("{:#}", err).contains("drives.json"));
    }
}
