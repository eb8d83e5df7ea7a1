//! Root dictionary store.
//!
//! Readers get an `Arc<RootSnapshot>` and never hold a lock while they
//! segment. Writers are serialized through `writer`, build the next map
//! from the current one, persist it, and only then publish it.

use indexmap::IndexMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, RwLock};

use crate::config::{read_json_file, write_json_file};
use crate::error::AppError;
use crate::root::RootEntry;
use crate::services::segment::RootSnapshot;

/// 批量合并的结果统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct MergeSummary {
    pub added: usize,
    pub updated: usize,
    pub skipped: usize,
}

impl MergeSummary {
    pub fn total(&self) -> usize {
        self.added + self.updated
    }
}

/// 词根字典存储
#[derive(Debug)]
pub struct RootStore {
    path: Option<PathBuf>,
    current: RwLock<Arc<RootSnapshot>>,
    writer: Mutex<()>,
}

impl RootStore {
    /// Open the store backed by `path`, loading it when the file exists.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let snapshot = if path.exists() {
            let entries: Vec<RootEntry> = read_json_file(&path)?;
            let snapshot = RootSnapshot::from_entries(
                entries
                    .into_iter()
                    .filter_map(|e| RootEntry::normalized(&e.chinese, &e.english)),
            );
            log::info!("Loaded {} roots from {}", snapshot.len(), path.display());
            snapshot
        } else {
            log::debug!("No roots file at {}, starting empty", path.display());
            RootSnapshot::default()
        };

        Ok(Self {
            path: Some(path),
            current: RwLock::new(Arc::new(snapshot)),
            writer: Mutex::new(()),
        })
    }

    /// Store without a backing file.
    pub fn in_memory() -> Self {
        Self {
            path: None,
            current: RwLock::new(Arc::new(RootSnapshot::default())),
            writer: Mutex::new(()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 获取当前时刻的只读快照
    pub fn snapshot(&self) -> Result<Arc<RootSnapshot>, AppError> {
        Ok(Arc::clone(&*self.current.read()?))
    }

    pub fn get_all(&self) -> Result<IndexMap<String, String>, AppError> {
        Ok(self.snapshot()?.as_map().clone())
    }

    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.snapshot()?.len())
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.snapshot()?.is_empty())
    }

    /// 添加或覆盖词根。两侧去空白后任一为空则忽略并返回 `false`。
    pub fn add(&self, chinese: &str, english: &str) -> Result<bool, AppError> {
        let Some(entry) = RootEntry::normalized(chinese, english) else {
            log::debug!("Ignoring blank root pair ({chinese:?}, {english:?})");
            return Ok(false);
        };

        let _guard = self.writer.lock()?;
        let mut next = self.snapshot()?.as_map().clone();
        if next.get(&entry.chinese) == Some(&entry.english) {
            return Ok(true);
        }
        next.insert(entry.chinese, entry.english);
        self.commit(next)?;
        Ok(true)
    }

    /// 删除词根，不存在时返回 `false`
    pub fn delete(&self, chinese: &str) -> Result<bool, AppError> {
        let key = chinese.trim();
        let _guard = self.writer.lock()?;
        let mut next = self.snapshot()?.as_map().clone();
        if next.shift_remove(key).is_none() {
            return Ok(false);
        }
        self.commit(next)?;
        Ok(true)
    }

    /// 清空所有词根，返回被删除的数量
    pub fn clear(&self) -> Result<usize, AppError> {
        let _guard = self.writer.lock()?;
        let removed = self.snapshot()?.len();
        self.commit(IndexMap::new())?;
        Ok(removed)
    }

    /// Upsert every pair as one atomic commit.
    ///
    /// Readers observe either the state before the merge or after it.
    pub fn import_merge<I, K, V>(&self, roots: I) -> Result<MergeSummary, AppError>
    where
        I: IntoIterator<Item = (K, V)>,
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let _guard = self.writer.lock()?;
        let mut next = self.snapshot()?.as_map().clone();
        let mut summary = MergeSummary::default();

        for (chinese, english) in roots {
            let Some(entry) = RootEntry::normalized(chinese.as_ref(), english.as_ref()) else {
                summary.skipped += 1;
                continue;
            };
            match next.insert(entry.chinese, entry.english) {
                Some(_) => summary.updated += 1,
                None => summary.added += 1,
            }
        }

        if summary.total() > 0 {
            self.commit(next)?;
        }
        log::info!(
            "Merged roots: {} added, {} updated, {} skipped",
            summary.added,
            summary.updated,
            summary.skipped
        );
        Ok(summary)
    }

    /// 导出为 CSV 文本（含表头）
    pub fn export_all(&self) -> Result<String, AppError> {
        Ok(crate::services::import_export::to_csv(&*self.snapshot()?))
    }

    /// Write the current state to the backing file.
    pub fn flush(&self) -> Result<(), AppError> {
        let _guard = self.writer.lock()?;
        let snapshot = self.snapshot()?;
        self.persist(&snapshot)
    }

    fn commit(&self, next: IndexMap<String, String>) -> Result<(), AppError> {
        let snapshot = Arc::new(RootSnapshot::new(next));
        self.persist(&snapshot)?;
        *self.current.write()? = snapshot;
        Ok(())
    }

    fn persist(&self, snapshot: &RootSnapshot) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_json_file(path, &snapshot.entries())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn add_trims_and_upserts() {
        let store = RootStore::in_memory();
        assert!(store.add(" 交易 ", " transaction ").unwrap());
        assert!(store.add("交易", "trade").unwrap());

        let all = store.get_all().unwrap();
        assert_eq!(all.len(), 1);
        assert_eq!(all.get("交易").map(String::as_str), Some("trade"));
    }

    #[test]
    fn add_rejects_blank_sides_without_error() {
        let store = RootStore::in_memory();
        assert!(!store.add("  ", "x").unwrap());
        assert!(!store.add("交易", "").unwrap());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn add_then_delete_removes_root() {
        let store = RootStore::in_memory();
        store.add("证券", "securities").unwrap();
        assert!(store.delete("证券").unwrap());
        assert!(!store.get_all().unwrap().contains_key("证券"));
        assert!(!store.delete("证券").unwrap(), "absent key is a no-op");
    }

    #[test]
    fn import_merge_is_idempotent() {
        let store = RootStore::in_memory();
        store.add("日期", "dt").unwrap();
        let batch = vec![("交易", "transaction"), ("日期", "date")];

        let first = store.import_merge(batch.clone()).unwrap();
        assert_eq!(first.added, 1);
        assert_eq!(first.updated, 1);
        let after_first = store.get_all().unwrap();

        store.import_merge(batch).unwrap();
        assert_eq!(store.get_all().unwrap(), after_first);
    }

    #[test]
    fn import_merge_skips_blank_pairs() {
        let store = RootStore::in_memory();
        let summary = store
            .import_merge(vec![("", "x"), ("利率", "rate"), ("期限", " ")])
            .unwrap();
        assert_eq!(summary.added, 1);
        assert_eq!(summary.skipped, 2);
    }

    #[test]
    fn snapshot_is_unaffected_by_later_mutation() {
        let store = RootStore::in_memory();
        store.add("交易", "transaction").unwrap();
        let before = store.snapshot().unwrap();

        store.add("日期", "date").unwrap();
        store.delete("交易").unwrap();

        assert_eq!(before.len(), 1);
        assert_eq!(before.get("交易"), Some("transaction"));
        assert_eq!(store.snapshot().unwrap().get("日期"), Some("date"));
    }

    #[test]
    fn persisted_roots_reload_in_insertion_order() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roots.json");
        {
            let store = RootStore::open(&path).unwrap();
            store.add("客户", "customer").unwrap();
            store.add("编号", "id").unwrap();
            store.add("余额", "balance").unwrap();
            store.add("客户", "client").unwrap();
        }

        let reopened = RootStore::open(&path).unwrap();
        let keys: Vec<String> = reopened.get_all().unwrap().keys().cloned().collect();
        assert_eq!(keys, vec!["客户", "编号", "余额"]);
        assert_eq!(reopened.snapshot().unwrap().get("客户"), Some("client"));
    }

    #[test]
    fn clear_wipes_and_persists() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("roots.json");
        let store = RootStore::open(&path).unwrap();
        store.import_merge(vec![("交易", "transaction"), ("日期", "date")]).unwrap();

        assert_eq!(store.clear().unwrap(), 2);
        assert!(store.is_empty().unwrap());
        assert!(RootStore::open(&path).unwrap().is_empty().unwrap());
    }

    #[test]
    fn failed_persist_leaves_published_state_untouched() {
        let dir = TempDir::new().unwrap();
        // a directory where the file should be makes the rename fail
        let path = dir.path().join("roots.json");
        std::fs::create_dir_all(path.join("blocker")).unwrap();
        let store = RootStore {
            path: Some(path),
            current: RwLock::new(Arc::new(RootSnapshot::default())),
            writer: Mutex::new(()),
        };

        assert!(store.add("交易", "transaction").is_err());
        assert!(store.is_empty().unwrap());
    }

    #[test]
    fn concurrent_merges_do_not_lose_updates() {
        let store = Arc::new(RootStore::in_memory());
        let handles: Vec<_> = (0..8)
            .map(|t| {
                let store = Arc::clone(&store);
                std::thread::spawn(move || {
                    for i in 0..25 {
                        store
                            .import_merge(vec![(format!("词{t}_{i}"), format!("w{t}_{i}"))])
                            .unwrap();
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(store.len().unwrap(), 200);
    }
}
