use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use super::item::{self, Item};
use super::ItemStore;
use crate::error::OpError;

/// File-backed item store: one JSON document per item, a directory per user.
///
/// Fallback backend for running without a database; the layout is
/// `<base>/<user_name>/<storage key>.json`.
pub struct FileStorage {
    base_path: PathBuf,
}

impl FileStorage {
    pub fn new(base_path: impl Into<PathBuf>) -> Self {
        Self {
            base_path: base_path.into(),
        }
    }

    fn user_dir(&self, user: &str) -> PathBuf {
        self.base_path.join(user)
    }

    fn item_path(&self, user: &str, name: &str) -> PathBuf {
        self.user_dir(user)
            .join(format!("{}.json", item::storage_key(user, name)))
    }
}

impl ItemStore for FileStorage {
    async fn save(&self, item: &Item) -> Result<(), OpError> {
        let dir = self.user_dir(&item.user_name);
        fs::create_dir_all(&dir).map_err(|e| OpError::wrap("save item", e))?;

        let document =
            serde_json::to_string_pretty(item).map_err(|e| OpError::wrap("save item", e))?;
        fs::write(self.item_path(&item.user_name, &item.name), document)
            .map_err(|e| OpError::wrap("save item", e))
    }

    async fn get(&self, user: &str, name: &str) -> Result<Option<Item>, OpError> {
        match fs::read_to_string(self.item_path(user, name)) {
            Ok(document) => {
                let item = serde_json::from_str(&document)
                    .map_err(|e| OpError::wrap("decode item", e))?;
                Ok(Some(item))
            }
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(None),
            Err(e) => Err(OpError::wrap("get item", e)),
        }
    }

    async fn is_exists(&self, user: &str, name: &str) -> Result<bool, OpError> {
        self.item_path(user, name)
            .try_exists()
            .map_err(|e| OpError::wrap("check if item exists", e))
    }

    async fn remove(&self, user: &str, name: &str) -> Result<(), OpError> {
        fs::remove_file(self.item_path(user, name)).map_err(|e| OpError::wrap("remove item", e))
    }

    async fn list(&self, user: &str) -> Result<Vec<String>, OpError> {
        let entries = match fs::read_dir(self.user_dir(user)) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(OpError::wrap("list items", e)),
        };

        let mut names = Vec::new();
        for entry in entries {
            let entry = entry.map_err(|e| OpError::wrap("list items", e))?;
            if entry.path().extension().map_or(true, |ext| ext != "json") {
                continue;
            }
            let item = decode_item(&entry.path())?;
            names.push(item.name);
        }
        names.sort();
        Ok(names)
    }
}

fn decode_item(path: &Path) -> Result<Item, OpError> {
    let document = fs::read_to_string(path).map_err(|e| OpError::wrap("list items", e))?;
    serde_json::from_str(&document).map_err(|e| OpError::wrap("decode item", e))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store() -> (tempfile::TempDir, FileStorage) {
        let dir = tempfile::tempdir().unwrap();
        let storage = FileStorage::new(dir.path());
        (dir, storage)
    }

    #[tokio::test]
    async fn save_then_get_round_trips() {
        let (_dir, storage) = store();
        let item = Item::new("alice", "deck1", "q:x\na:y");

        storage.save(&item).await.unwrap();
        assert_eq!(storage.get("alice", "deck1").await.unwrap(), Some(item));
        assert!(storage.is_exists("alice", "deck1").await.unwrap());
    }

    #[tokio::test]
    async fn get_of_missing_item_is_none() {
        let (_dir, storage) = store();
        assert_eq!(storage.get("alice", "nope").await.unwrap(), None);
        assert!(!storage.is_exists("alice", "nope").await.unwrap());
    }

    #[tokio::test]
    async fn remove_deletes_only_the_named_item() {
        let (_dir, storage) = store();
        storage.save(&Item::new("alice", "a", "q:1\na:1")).await.unwrap();
        storage.save(&Item::new("alice", "b", "q:2\na:2")).await.unwrap();

        storage.remove("alice", "a").await.unwrap();
        assert!(!storage.is_exists("alice", "a").await.unwrap());
        assert_eq!(storage.list("alice").await.unwrap(), vec!["b"]);
    }

    #[tokio::test]
    async fn list_is_per_user_and_sorted() {
        let (_dir, storage) = store();
        storage.save(&Item::new("alice", "zebra", "q:1\na:1")).await.unwrap();
        storage.save(&Item::new("alice", "apple", "q:2\na:2")).await.unwrap();
        storage.save(&Item::new("bob", "other", "q:3\na:3")).await.unwrap();

        assert_eq!(storage.list("alice").await.unwrap(), vec!["apple", "zebra"]);
        assert_eq!(storage.list("bob").await.unwrap(), vec!["other"]);
        assert_eq!(storage.list("carol").await.unwrap(), Vec::<String>::new());
    }
}
