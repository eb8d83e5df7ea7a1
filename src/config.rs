use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::AppError;

/// 覆盖默认主目录的环境变量（测试与便携安装使用）
pub const HOME_ENV: &str = "ROOTIFY_HOME";

/// 设置与默认数据所在的固定目录：`$ROOTIFY_HOME` 或 `~/.rootify`
pub fn get_home_dir() -> PathBuf {
    if let Some(custom) = std::env::var_os(HOME_ENV).filter(|v| !v.is_empty()) {
        return PathBuf::from(custom);
    }

    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".rootify")
}

/// 词根与历史数据目录，可被设置中的 `dataDir` 覆盖
pub fn get_app_config_dir() -> PathBuf {
    crate::settings::get_data_dir_override().unwrap_or_else(get_home_dir)
}

pub fn get_roots_path() -> PathBuf {
    get_app_config_dir().join("roots.json")
}

pub fn get_history_path() -> PathBuf {
    get_app_config_dir().join("history.json")
}

pub fn get_settings_path() -> PathBuf {
    get_home_dir().join("settings.json")
}

/// 展开 `~` 前缀
pub fn resolve_user_path(raw: &str) -> PathBuf {
    if raw == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(stripped) = raw.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    } else if let Some(stripped) = raw.strip_prefix("~\\") {
        if let Some(home) = dirs::home_dir() {
            return home.join(stripped);
        }
    }

    PathBuf::from(raw)
}

pub fn read_json_file<T: DeserializeOwned>(path: &Path) -> Result<T, AppError> {
    let content = fs::read_to_string(path).map_err(|e| AppError::io(path, e))?;
    serde_json::from_str(&content).map_err(|e| AppError::json(path, e))
}

pub fn write_json_file<T: Serialize + ?Sized>(path: &Path, value: &T) -> Result<(), AppError> {
    let json =
        serde_json::to_string_pretty(value).map_err(|e| AppError::JsonSerialize { source: e })?;
    atomic_write(path, json.as_bytes())
}

pub fn write_text_file(path: &Path, text: &str) -> Result<(), AppError> {
    atomic_write(path, text.as_bytes())
}

/// 写入同目录临时文件后原子替换目标文件
pub fn atomic_write(path: &Path, data: &[u8]) -> Result<(), AppError> {
    let parent = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    fs::create_dir_all(parent).map_err(|e| AppError::io(parent, e))?;

    let mut tmp = tempfile::NamedTempFile::new_in(parent).map_err(|e| AppError::io(parent, e))?;
    tmp.write_all(data).map_err(|e| AppError::io(tmp.path(), e))?;
    tmp.as_file()
        .sync_all()
        .map_err(|e| AppError::io(tmp.path(), e))?;
    tmp.persist(path).map_err(|e| AppError::io(path, e.error))?;

    log::debug!("wrote {} bytes to {}", data.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use tempfile::TempDir;

    #[test]
    fn atomic_write_creates_parent_and_replaces_content() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("nested").join("data.json");

        write_json_file(&path, &json!({"a": 1})).expect("first write");
        write_json_file(&path, &json!({"a": 2})).expect("second write");

        let value: serde_json::Value = read_json_file(&path).expect("read back");
        assert_eq!(value["a"], json!(2));

        let leftovers: Vec<_> = fs::read_dir(path.parent().unwrap())
            .unwrap()
            .filter_map(|e| e.ok())
            .collect();
        assert_eq!(leftovers.len(), 1, "temp file should be renamed away");
    }

    #[test]
    fn read_json_file_reports_path_on_parse_error() {
        let dir = TempDir::new().expect("tempdir");
        let path = dir.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();

        let err = read_json_file::<serde_json::Value>(&path).unwrap_err();
        assert!(matches!(err, AppError::Json { .. }));
        assert!(err.to_string().contains("broken.json"));
    }

    #[test]
    fn resolve_user_path_leaves_plain_paths_alone() {
        assert_eq!(resolve_user_path("/var/data"), PathBuf::from("/var/data"));
    }
}
