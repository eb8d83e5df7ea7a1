use serde::{Deserialize, Serialize};

/// 词根：一个中文术语及其英文对应
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RootEntry {
    pub chinese: String,
    pub english: String,
}

impl RootEntry {
    pub fn new(chinese: impl Into<String>, english: impl Into<String>) -> Self {
        Self {
            chinese: chinese.into(),
            english: english.into(),
        }
    }

    /// Trimmed copy, or `None` when either side is blank.
    pub fn normalized(chinese: &str, english: &str) -> Option<Self> {
        let chinese = chinese.trim();
        let english = english.trim();
        if chinese.is_empty() || english.is_empty() {
            return None;
        }
        Some(Self::new(chinese, english))
    }
}

/// 导入预览中每行的处理方式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ImportAction {
    Add,
    Update,
}

impl ImportAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Update => "update",
        }
    }
}

impl std::fmt::Display for ImportAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImportPreviewItem {
    pub chinese: String,
    pub english: String,
    pub action: ImportAction,
}
