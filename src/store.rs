//! 永続キーバリューストア
//!
//! ブラウザのローカルストレージ相当。文字列のキーと値をJSONファイルに保存する。
//! 読み込めないファイルは空として扱う。

use crate::config::Config;
use crate::error::Result;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tracing::warn;

const STORE_FILE_NAME: &str = "local-storage.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct StoreFile {
    entries: BTreeMap<String, String>,
}

#[derive(Debug, Clone)]
pub struct LocalStore {
    path: PathBuf,
    file: StoreFile,
}

impl LocalStore {
    /// 既定の場所（設定ディレクトリ）のストア
    pub fn open_default() -> Result<Self> {
        Ok(Self::load(&Config::config_dir()?.join(STORE_FILE_NAME)))
    }

    pub fn load(path: &Path) -> Self {
        let file = match std::fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "local store unreadable, starting empty");
                StoreFile::default()
            }),
            Err(_) => StoreFile::default(),
        };
        Self { path: path.to_path_buf(), file }
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.file.entries.get(key).map(String::as_str)
    }

    /// 値を設定して即座に保存する
    pub fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.file.entries.insert(key.to_string(), value.to_string());
        self.save()
    }

    pub fn remove(&mut self, key: &str) -> Result<bool> {
        let removed = self.file.entries.remove(key).is_some();
        if removed {
            self.save()?;
        }
        Ok(removed)
    }

    fn save(&self) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = serde_json::to_string_pretty(&self.file)?;
        std::fs::write(&self.path, content)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_set_persists() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(STORE_FILE_NAME);

        let mut store = LocalStore::load(&path);
        assert_eq!(store.get("sidebarCollapsed"), None);
        store.set("sidebarCollapsed", "true").unwrap();

        let reloaded = LocalStore::load(&path);
        assert_eq!(reloaded.get("sidebarCollapsed"), Some("true"));
    }

    #[test]
    fn test_corrupt_file_is_empty() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(STORE_FILE_NAME);
        std::fs::write(&path, "not json").unwrap();

        let store = LocalStore::load(&path);
        assert_eq!(store.get("anything"), None);
    }

    #[test]
    fn test_remove() {
        let dir = tempdir().expect("Failed to create temp dir");
        let path = dir.path().join(STORE_FILE_NAME);
        let mut store = LocalStore::load(&path);
        store.set("k", "v").unwrap();
        assert!(store.remove("k").unwrap());
        assert!(!store.remove("k").unwrap());
        assert_eq!(LocalStore::load(&path).get("k"), None);
    }
}
