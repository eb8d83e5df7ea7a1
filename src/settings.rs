use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{OnceLock, RwLock};

use crate::error::AppError;

pub const DEFAULT_HISTORY_LIMIT: usize = 100;
pub const DEFAULT_BATCH_CONCURRENCY: usize = 8;

/// 应用设置结构，允许覆盖默认数据目录
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AppSettings {
    /// 词根与历史文件所在目录
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<String>,
    /// `history list` 默认展示条数，存储本身不设上限
    #[serde(default = "default_history_limit")]
    pub history_limit: usize,
    /// 完整翻译是否自动写入历史
    #[serde(default = "default_auto_save_history")]
    pub auto_save_history: bool,
    /// 批量翻译并发度
    #[serde(default = "default_batch_concurrency")]
    pub batch_concurrency: usize,
}

fn default_history_limit() -> usize {
    DEFAULT_HISTORY_LIMIT
}

fn default_auto_save_history() -> bool {
    true
}

fn default_batch_concurrency() -> usize {
    DEFAULT_BATCH_CONCURRENCY
}

impl Default for AppSettings {
    fn default() -> Self {
        Self {
            data_dir: None,
            history_limit: DEFAULT_HISTORY_LIMIT,
            auto_save_history: true,
            batch_concurrency: DEFAULT_BATCH_CONCURRENCY,
        }
    }
}

/// Keys accepted by `config set`.
pub const SETTING_KEYS: &[&str] = &[
    "dataDir",
    "historyLimit",
    "autoSaveHistory",
    "batchConcurrency",
];

impl AppSettings {
    fn settings_path() -> PathBuf {
        // settings.json 固定在主目录，不能被 dataDir 覆盖
        crate::config::get_settings_path()
    }

    fn normalize(&mut self) {
        self.data_dir = self
            .data_dir
            .as_ref()
            .map(|s| s.trim())
            .filter(|s| !s.is_empty())
            .map(|s| s.to_string());

        if self.batch_concurrency == 0 {
            self.batch_concurrency = 1;
        }
    }

    pub fn load() -> Self {
        Self::load_from(&Self::settings_path())
    }

    pub fn load_from(path: &Path) -> Self {
        if let Ok(content) = fs::read_to_string(path) {
            match serde_json::from_str::<AppSettings>(&content) {
                Ok(mut settings) => {
                    settings.normalize();
                    settings
                }
                Err(err) => {
                    log::warn!(
                        "解析设置文件失败，将使用默认设置。路径: {}, 错误: {}",
                        path.display(),
                        err
                    );
                    Self::default()
                }
            }
        } else {
            Self::default()
        }
    }

    pub fn save(&self) -> Result<(), AppError> {
        self.save_to(&Self::settings_path())
    }

    pub fn save_to(&self, path: &Path) -> Result<(), AppError> {
        let mut normalized = self.clone();
        normalized.normalize();
        crate::config::write_json_file(path, &normalized)
    }

    /// Apply a `config set KEY VALUE` pair.
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<(), AppError> {
        let value = value.trim();
        match key {
            "dataDir" => {
                self.data_dir = if value.is_empty() {
                    None
                } else {
                    Some(value.to_string())
                };
            }
            "historyLimit" => {
                self.history_limit = parse_number(key, value)?;
            }
            "autoSaveHistory" => {
                self.auto_save_history = match value.to_lowercase().as_str() {
                    "true" | "on" | "yes" | "1" => true,
                    "false" | "off" | "no" | "0" => false,
                    _ => {
                        return Err(AppError::InvalidInput(format!(
                            "{key} 需要布尔值，收到 '{value}'"
                        )))
                    }
                };
            }
            "batchConcurrency" => {
                let n = parse_number(key, value)?;
                if n == 0 {
                    return Err(AppError::InvalidInput(format!("{key} 必须大于 0")));
                }
                self.batch_concurrency = n;
            }
            other => {
                return Err(AppError::InvalidInput(format!(
                    "未知设置项 '{other}'，可用: {}",
                    SETTING_KEYS.join(", ")
                )))
            }
        }
        Ok(())
    }
}

fn parse_number(key: &str, value: &str) -> Result<usize, AppError> {
    value
        .parse::<usize>()
        .map_err(|_| AppError::InvalidInput(format!("{key} 需要非负整数，收到 '{value}'")))
}

fn settings_store() -> &'static RwLock<AppSettings> {
    static STORE: OnceLock<RwLock<AppSettings>> = OnceLock::new();
    STORE.get_or_init(|| RwLock::new(AppSettings::load()))
}

pub fn get_settings() -> AppSettings {
    settings_store()
        .read()
        .map(|s| s.clone())
        .unwrap_or_default()
}

pub fn update_settings(mut new_settings: AppSettings) -> Result<(), AppError> {
    new_settings.normalize();
    new_settings.save()?;

    let mut guard = settings_store().write()?;
    *guard = new_settings;
    Ok(())
}

pub fn get_data_dir_override() -> Option<PathBuf> {
    let settings = settings_store().read().ok()?;
    settings
        .data_dir
        .as_deref()
        .map(crate::config::resolve_user_path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn missing_fields_fall_back_to_defaults() {
        let parsed: AppSettings = serde_json::from_str(r#"{"historyLimit": 5}"#).unwrap();
        assert_eq!(parsed.history_limit, 5);
        assert!(parsed.auto_save_history);
        assert_eq!(parsed.batch_concurrency, DEFAULT_BATCH_CONCURRENCY);
        assert_eq!(parsed.data_dir, None);
    }

    #[test]
    fn unparsable_file_yields_defaults() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        fs::write(&path, "not json").unwrap();
        assert_eq!(AppSettings::load_from(&path), AppSettings::default());
    }

    #[test]
    fn save_and_load_normalizes_blank_data_dir() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("settings.json");
        let settings = AppSettings {
            data_dir: Some("   ".to_string()),
            batch_concurrency: 0,
            ..AppSettings::default()
        };
        settings.save_to(&path).unwrap();

        let loaded = AppSettings::load_from(&path);
        assert_eq!(loaded.data_dir, None);
        assert_eq!(loaded.batch_concurrency, 1);
    }

    #[test]
    fn set_value_parses_each_key() {
        let mut settings = AppSettings::default();
        settings.set_value("historyLimit", "20").unwrap();
        settings.set_value("autoSaveHistory", "off").unwrap();
        settings.set_value("batchConcurrency", "2").unwrap();
        settings.set_value("dataDir", "/srv/rootify").unwrap();

        assert_eq!(settings.history_limit, 20);
        assert!(!settings.auto_save_history);
        assert_eq!(settings.batch_concurrency, 2);
        assert_eq!(settings.data_dir.as_deref(), Some("/srv/rootify"));

        assert!(settings.set_value("batchConcurrency", "0").is_err());
        assert!(settings.set_value("historyLimit", "many").is_err());
        assert!(settings.set_value("colour", "red").is_err());
    }
}
