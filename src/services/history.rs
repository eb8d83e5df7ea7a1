//! Append-only log of complete translations.
//!
//! Writes from the translate path go through [`HistoryRecorder`], a worker
//! thread with its own error sink, so a failing disk never reaches the
//! caller that produced the translation.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;

use crate::config::{read_json_file, write_json_file};
use crate::error::AppError;
use crate::services::translation::TranslationResult;

/// 翻译历史记录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: u64,
    pub chinese_text: String,
    pub english_text: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct HistoryFile {
    #[serde(default = "first_id")]
    next_id: u64,
    #[serde(default)]
    entries: Vec<HistoryEntry>,
}

fn first_id() -> u64 {
    1
}

impl Default for HistoryFile {
    fn default() -> Self {
        Self {
            next_id: first_id(),
            entries: Vec::new(),
        }
    }
}

#[derive(Debug)]
pub struct HistoryLog {
    path: Option<PathBuf>,
    state: Mutex<HistoryFile>,
}

impl HistoryLog {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, AppError> {
        let path = path.into();
        let mut file: HistoryFile = if path.exists() {
            read_json_file(&path)?
        } else {
            HistoryFile::default()
        };

        // ids must keep increasing even if nextId was edited by hand
        let max_id = file.entries.iter().map(|e| e.id).max().unwrap_or(0);
        file.next_id = file.next_id.max(max_id + 1);

        log::debug!(
            "Loaded {} history entries from {}",
            file.entries.len(),
            path.display()
        );
        Ok(Self {
            path: Some(path),
            state: Mutex::new(file),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            path: None,
            state: Mutex::new(HistoryFile::default()),
        }
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// 追加一条记录
    pub fn save(&self, chinese: &str, english: &str) -> Result<HistoryEntry, AppError> {
        let mut state = self.state.lock()?;
        let entry = HistoryEntry {
            id: state.next_id,
            chinese_text: chinese.to_string(),
            english_text: english.to_string(),
            created_at: Utc::now(),
        };

        let mut next = state.clone();
        next.entries.push(entry.clone());
        next.next_id += 1;
        self.persist(&next)?;
        *state = next;
        Ok(entry)
    }

    /// 最新的在前；`limit` 仅限制返回条数
    pub fn list(&self, limit: Option<usize>) -> Result<Vec<HistoryEntry>, AppError> {
        let state = self.state.lock()?;
        let mut entries = state.entries.clone();
        entries.sort_by(|a, b| b.id.cmp(&a.id));
        if let Some(limit) = limit {
            entries.truncate(limit);
        }
        Ok(entries)
    }

    pub fn len(&self) -> Result<usize, AppError> {
        Ok(self.state.lock()?.entries.len())
    }

    pub fn is_empty(&self) -> Result<bool, AppError> {
        Ok(self.len()? == 0)
    }

    /// 清空所有记录，返回删除数量；id 计数不回退
    pub fn clear(&self) -> Result<usize, AppError> {
        let mut state = self.state.lock()?;
        let removed = state.entries.len();
        let next = HistoryFile {
            next_id: state.next_id,
            entries: Vec::new(),
        };
        self.persist(&next)?;
        *state = next;
        Ok(removed)
    }

    fn persist(&self, file: &HistoryFile) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };
        write_json_file(path, file)
    }
}

struct HistoryRequest {
    chinese: String,
    english: String,
}

/// Fire-and-forget writer in front of a [`HistoryLog`].
pub struct HistoryRecorder {
    sender: Option<Sender<HistoryRequest>>,
    worker: Option<JoinHandle<()>>,
}

impl HistoryRecorder {
    pub fn spawn(history: Arc<HistoryLog>) -> Result<Self, AppError> {
        let (sender, receiver) = mpsc::channel::<HistoryRequest>();
        let worker = std::thread::Builder::new()
            .name("rootify-history".into())
            .spawn(move || {
                for request in receiver {
                    if let Err(e) = history.save(&request.chinese, &request.english) {
                        log::warn!("保存翻译历史失败 ({}): {}", request.chinese, e);
                    }
                }
            })
            .map_err(|e| AppError::Message(format!("启动历史记录线程失败: {e}")))?;

        Ok(Self {
            sender: Some(sender),
            worker: Some(worker),
        })
    }

    /// Queue a record. Never blocks and never fails.
    pub fn record(&self, chinese: &str, english: &str) {
        let Some(sender) = &self.sender else {
            return;
        };
        let request = HistoryRequest {
            chinese: chinese.to_string(),
            english: english.to_string(),
        };
        if sender.send(request).is_err() {
            log::warn!("历史记录线程已退出，丢弃记录: {chinese}");
        }
    }

    /// Queue `text` only when its translation is complete. Returns whether it was queued.
    pub fn record_if_complete(&self, text: &str, result: &TranslationResult) -> bool {
        let text = text.trim();
        if !result.complete || text.is_empty() {
            return false;
        }
        self.record(text, &result.joined_english);
        true
    }

    /// Drain queued records and stop the worker.
    pub fn shutdown(mut self) {
        self.stop();
    }

    fn stop(&mut self) {
        drop(self.sender.take());
        if let Some(worker) = self.worker.take() {
            if worker.join().is_err() {
                log::warn!("历史记录线程异常退出");
            }
        }
    }
}

impl Drop for HistoryRecorder {
    fn drop(&mut self) {
        self.stop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::segment::{segment, RootSnapshot};
    use crate::services::translation::resolve;
    use crate::root::RootEntry;
    use tempfile::TempDir;

    #[test]
    fn ids_increase_and_list_is_newest_first() {
        let log = HistoryLog::in_memory();
        log.save("交易日期", "transaction_date").unwrap();
        log.save("客户名称", "customer_name").unwrap();
        log.save("余额", "balance").unwrap();

        let entries = log.list(None).unwrap();
        let ids: Vec<u64> = entries.iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![3, 2, 1]);
        assert_eq!(entries[0].chinese_text, "余额");

        assert_eq!(log.list(Some(2)).unwrap().len(), 2);
    }

    #[test]
    fn clear_is_safe_on_empty_log_and_keeps_counting() {
        let log = HistoryLog::in_memory();
        assert_eq!(log.clear().unwrap(), 0);

        log.save("交易", "transaction").unwrap();
        assert_eq!(log.clear().unwrap(), 1);
        assert!(log.is_empty().unwrap());

        let entry = log.save("日期", "date").unwrap();
        assert_eq!(entry.id, 2);
    }

    #[test]
    fn persisted_history_survives_reopen() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        {
            let log = HistoryLog::open(&path).unwrap();
            log.save("交易", "transaction").unwrap();
        }
        let log = HistoryLog::open(&path).unwrap();
        assert_eq!(log.len().unwrap(), 1);
        assert_eq!(log.save("日期", "date").unwrap().id, 2);
    }

    #[test]
    fn recorder_drains_queue_on_shutdown() {
        let log = Arc::new(HistoryLog::in_memory());
        let recorder = HistoryRecorder::spawn(Arc::clone(&log)).unwrap();
        for i in 0..20 {
            recorder.record(&format!("词{i}"), &format!("w{i}"));
        }
        recorder.shutdown();
        assert_eq!(log.len().unwrap(), 20);
    }

    #[test]
    fn recorder_only_keeps_complete_translations() {
        let dict = RootSnapshot::from_entries(vec![RootEntry::new("交易", "transaction")]);
        let log = Arc::new(HistoryLog::in_memory());
        let recorder = HistoryRecorder::spawn(Arc::clone(&log)).unwrap();

        assert!(recorder.record_if_complete(" 交易 ", &resolve(segment("交易", &dict))));
        assert!(!recorder.record_if_complete("交易额", &resolve(segment("交易额", &dict))));
        recorder.shutdown();

        let entries = log.list(None).unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].chinese_text, "交易");
        assert_eq!(entries[0].english_text, "transaction");
    }

    #[test]
    fn recorder_swallows_write_failures() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("history.json");
        let log = Arc::new(HistoryLog::open(&path).unwrap());
        std::fs::create_dir_all(path.join("blocker")).unwrap();

        let recorder = HistoryRecorder::spawn(Arc::clone(&log)).unwrap();
        recorder.record("交易", "transaction");
        recorder.shutdown();

        assert!(log.is_empty().unwrap());
    }
}
