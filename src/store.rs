use std::path::Path;
use std::sync::Arc;

use crate::error::AppError;
use crate::services::{HistoryLog, HistoryRecorder, RootStore};

/// 全局应用状态：显式构造、显式关闭，不使用全局单例
pub struct AppState {
    pub roots: RootStore,
    pub history: Arc<HistoryLog>,
}

impl AppState {
    /// Open the stores under the configured data directory.
    pub fn open() -> Result<Self, AppError> {
        Self::open_at(&crate::config::get_app_config_dir())
    }

    pub fn open_at(dir: &Path) -> Result<Self, AppError> {
        log::debug!("Opening data directory {}", dir.display());
        Ok(Self {
            roots: RootStore::open(dir.join("roots.json"))?,
            history: Arc::new(HistoryLog::open(dir.join("history.json"))?),
        })
    }

    pub fn in_memory() -> Self {
        Self {
            roots: RootStore::in_memory(),
            history: Arc::new(HistoryLog::in_memory()),
        }
    }

    pub fn history_recorder(&self) -> Result<HistoryRecorder, AppError> {
        HistoryRecorder::spawn(Arc::clone(&self.history))
    }

    /// Flush the dictionary and release the state.
    pub fn close(self) -> Result<(), AppError> {
        self.roots.flush()
    }
}
