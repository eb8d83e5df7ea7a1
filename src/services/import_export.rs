//! CSV bridge for the root dictionary.
//!
//! Parsing is pure: it only reads a snapshot to classify rows as add or
//! update. The store is touched by [`ImportExportService::commit`] alone.

use indexmap::IndexMap;

use crate::error::AppError;
use crate::root::{ImportAction, ImportPreviewItem};
use crate::services::dictionary::{MergeSummary, RootStore};
use crate::services::segment::RootSnapshot;

pub const CSV_HEADER: &str = "中文词根,英文对应";

/// 词根导入导出相关业务逻辑
pub struct ImportExportService;

impl ImportExportService {
    /// 解析 CSV 文本生成导入预览；没有任何有效行时返回格式错误
    pub fn parse_preview(
        content: &str,
        snapshot: &RootSnapshot,
    ) -> Result<Vec<ImportPreviewItem>, AppError> {
        let preview = parse_csv(content, snapshot);
        if preview.is_empty() {
            return Err(AppError::CsvFormat(
                "没有找到有效的词根数据，请确认第一行为表头且每行至少包含中文和英文两列".into(),
            ));
        }
        Ok(preview)
    }

    /// 将预览结果合并进词根库
    pub fn commit(
        store: &RootStore,
        preview: &[ImportPreviewItem],
    ) -> Result<MergeSummary, AppError> {
        store.import_merge(preview_to_map(preview))
    }

    /// Export the store, or `None` when it holds no roots.
    pub fn export(store: &RootStore) -> Result<Option<String>, AppError> {
        let content = store.export_all()?;
        if is_header_only(&content) {
            return Ok(None);
        }
        Ok(Some(content))
    }
}

/// Later duplicates in the preview win, matching sequential upserts.
pub fn preview_to_map(preview: &[ImportPreviewItem]) -> IndexMap<String, String> {
    preview
        .iter()
        .map(|item| (item.chinese.clone(), item.english.clone()))
        .collect()
}

fn parse_csv(content: &str, snapshot: &RootSnapshot) -> Vec<ImportPreviewItem> {
    let content = content.trim_start_matches('\u{feff}').trim();

    content
        .lines()
        .skip(1)
        .filter(|line| !line.trim().is_empty())
        .filter_map(|line| {
            let columns = split_fields(line);
            if columns.len() < 2 {
                return None;
            }
            let chinese = clean_field(columns[0]);
            let english = clean_field(columns[1]);
            if chinese.is_empty() || english.is_empty() {
                return None;
            }
            let action = if snapshot.contains(&chinese) {
                ImportAction::Update
            } else {
                ImportAction::Add
            };
            Some(ImportPreviewItem {
                chinese,
                english,
                action,
            })
        })
        .collect()
}

/// Split a row on commas.
///
/// Commas inside a fully quoted field (as written by [`to_csv`]) are kept.
/// A row whose quotes do not wrap whole fields falls back to a plain
/// comma split, so a stray `"` never swallows a column.
fn split_fields(line: &str) -> Vec<&str> {
    let fields = split_outside_quotes(line);
    if fields.iter().all(|field| is_plain_or_wrapped(field)) {
        fields
    } else {
        line.split(',').collect()
    }
}

fn split_outside_quotes(line: &str) -> Vec<&str> {
    let mut fields = Vec::new();
    let mut in_quotes = false;
    let mut start = 0;

    for (idx, ch) in line.char_indices() {
        match ch {
            '"' => in_quotes = !in_quotes,
            ',' if !in_quotes => {
                fields.push(&line[start..idx]);
                start = idx + 1;
            }
            _ => {}
        }
    }
    fields.push(&line[start..]);
    fields
}

fn is_plain_or_wrapped(field: &str) -> bool {
    let trimmed = field.trim();
    if !trimmed.contains('"') {
        return true;
    }
    match trimmed
        .strip_prefix('"')
        .and_then(|rest| rest.strip_suffix('"'))
    {
        Some(inner) => !inner.replace("\"\"", "").contains('"'),
        None => false,
    }
}

/// Trim a field and strip its surrounding quotes.
///
/// Unlike a bare quote strip, `""` inside a fully quoted field is read back
/// as a single `"`, which is how [`to_csv`] escapes quotes.
fn clean_field(raw: &str) -> String {
    let trimmed = raw.trim();
    let (inner, quoted) = match trimmed.strip_prefix('"') {
        Some(rest) => match rest.strip_suffix('"') {
            Some(inner) => (inner, true),
            None => (rest, false),
        },
        None => (trimmed.strip_suffix('"').unwrap_or(trimmed), false),
    };

    let value = if quoted {
        inner.replace("\"\"", "\"")
    } else {
        inner.to_string()
    };
    value.trim().to_string()
}

fn quote_field(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// 生成导出的 CSV 文本：固定表头 + 每个词根一行，字段统一加引号
pub fn to_csv(snapshot: &RootSnapshot) -> String {
    let mut out = String::with_capacity(CSV_HEADER.len() + 1 + snapshot.len() * 24);
    out.push_str(CSV_HEADER);
    out.push('\n');
    for (chinese, english) in snapshot.iter() {
        out.push_str(&quote_field(chinese));
        out.push(',');
        out.push_str(&quote_field(english));
        out.push('\n');
    }
    out
}

pub fn is_header_only(content: &str) -> bool {
    content.trim() == CSV_HEADER
}
