// Sled-backed key-value persistence for ledger records.
use crate::storage::KeyValueStore;
use anyhow::Context;
use sled::{
    Config,
    Db,
    Tree,
};
use std::path::Path;

const LEDGER_TREE: &str = "ledger";

#[derive(Clone)]
pub struct SledStore {
    tree: Tree,
}

impl SledStore {
    pub fn new(db: &Db) -> crate::Result<Self> {
        let tree = db.open_tree(LEDGER_TREE).context("open ledger tree")?;
        Ok(Self { tree })
    }

    pub fn open<P: AsRef<Path>>(path: P) -> crate::Result<Self> {
        let path = path.as_ref();
        let db = Config::default()
            .path(path)
            .open()
            .with_context(|| format!("open sled database at {}", path.display()))?;
        Self::new(&db)
    }
}

impl KeyValueStore for SledStore {
    fn get(&self, key: &str) -> crate::Result<Option<String>> {
        let Some(bytes) = self
            .tree
            .get(key.as_bytes())
            .with_context(|| format!("read ledger entry {key}"))?
        else {
            return Ok(None);
        };
        match String::from_utf8(bytes.to_vec()) {
            Ok(value) => Ok(Some(value)),
            Err(_) => {
                tracing::warn!(key, "ledger entry is not valid UTF-8; ignoring it");
                Ok(None)
            }
        }
    }

    fn put(&mut self, key: &str, value: &str) -> crate::Result<()> {
        self.tree
            .insert(key.as_bytes(), value.as_bytes())
            .with_context(|| format!("write ledger entry {key}"))?;
        self.tree.flush().context("flush ledger tree")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]
    use super::*;
    use tempdir::TempDir;

    fn sled_db(dir: &TempDir) -> Db {
        Config::default()
            .path(dir.path())
            .open()
            .expect("open sled db")
    }

    #[test]
    fn sut__when_writing_value_then_lookup_returns_it() {
        // given
        let temp_dir = TempDir::new("sled_ledger_store").unwrap();
        let db = sled_db(&temp_dir);
        let mut store = SledStore::new(&db).unwrap();
        assert!(store.get("craps-stats-0xabc").unwrap().is_none());

        // when
        store.put("craps-stats-0xabc", "{}").unwrap();

        // then
        assert_eq!(store.get("craps-stats-0xabc").unwrap().as_deref(), Some("{}"));
    }

    #[test]
    fn sut__values_survive_reopen() {
        // given
        let temp_dir = TempDir::new("sled_ledger_reopen").unwrap();
        {
            let mut store = SledStore::open(temp_dir.path()).unwrap();
            store.put("craps-leaderboard", "[]").unwrap();
        }

        // when
        let reopened = SledStore::open(temp_dir.path()).unwrap();

        // then
        assert_eq!(
            reopened.get("craps-leaderboard").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[test]
    fn sut__non_utf8_value_reads_as_absent() {
        // given
        let temp_dir = TempDir::new("sled_ledger_garbage").unwrap();
        let db = sled_db(&temp_dir);
        let tree = db.open_tree(LEDGER_TREE).unwrap();
        tree.insert(b"craps-leaderboard", vec![0xff, 0xfe]).unwrap();
        let store = SledStore::new(&db).unwrap();

        // when
        let value = store.get("craps-leaderboard").unwrap();

        // then
        assert!(value.is_none());
    }
}
