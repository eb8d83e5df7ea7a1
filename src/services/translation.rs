use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tokio::sync::Semaphore;
use tokio::task::JoinSet;

use crate::error::AppError;
use crate::services::dictionary::RootStore;
use crate::services::segment::{segment, RootSnapshot, Segment};

/// 拼接译文时各段之间的分隔符
pub const JOIN_SEPARATOR: &str = "_";

/// 一次翻译的完整结果
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslationResult {
    pub segments: Vec<Segment>,
    pub joined_english: String,
    pub complete: bool,
}

impl TranslationResult {
    pub fn unknown_spans(&self) -> impl Iterator<Item = &str> {
        self.segments
            .iter()
            .filter(|s| s.is_unknown())
            .map(|s| s.chinese.as_str())
    }
}

/// One line of a batch, tagged with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TranslatedLine {
    pub index: usize,
    pub text: String,
    pub result: TranslationResult,
}

/// 将切分结果拼接为最终译文并判断是否完整。
///
/// Matched segments contribute their English, unknown ones their original
/// text, so a partial translation stays readable.
pub fn resolve(segments: Vec<Segment>) -> TranslationResult {
    let joined_english = segments
        .iter()
        .map(Segment::display_token)
        .collect::<Vec<_>>()
        .join(JOIN_SEPARATOR);
    let complete = segments.iter().all(|s| s.matched);

    TranslationResult {
        segments,
        joined_english,
        complete,
    }
}

pub fn translate(text: &str, snapshot: &RootSnapshot) -> String {
    resolve(segment(text, snapshot)).joined_english
}

pub fn is_complete(text: &str, snapshot: &RootSnapshot) -> bool {
    segment(text, snapshot).iter().all(|s| s.matched)
}

/// Split multi-line input into trimmed, non-empty lines.
pub fn split_lines(input: &str) -> Vec<String> {
    input
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

/// 文本切分与翻译相关业务逻辑
pub struct TranslationService;

impl TranslationService {
    pub fn segment_text(store: &RootStore, text: &str) -> Result<Vec<Segment>, AppError> {
        Ok(segment(text, &*store.snapshot()?))
    }

    pub fn translate_text(store: &RootStore, text: &str) -> Result<String, AppError> {
        Ok(translate(text, &*store.snapshot()?))
    }

    pub fn is_translation_complete(store: &RootStore, text: &str) -> Result<bool, AppError> {
        Ok(is_complete(text, &*store.snapshot()?))
    }

    pub fn resolve_text(store: &RootStore, text: &str) -> Result<TranslationResult, AppError> {
        Ok(resolve(segment(text, &*store.snapshot()?)))
    }

    /// Translate every line against a single snapshot, preserving input order.
    pub fn translate_lines(
        store: &RootStore,
        lines: Vec<String>,
        concurrency: usize,
    ) -> Result<Vec<TranslatedLine>, AppError> {
        let snapshot = store.snapshot()?;
        if lines.len() <= 1 {
            return Ok(lines
                .into_iter()
                .enumerate()
                .map(|(index, text)| TranslatedLine {
                    result: resolve(segment(&text, &snapshot)),
                    index,
                    text,
                })
                .collect());
        }

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .worker_threads(concurrency.clamp(1, 16))
            .enable_all()
            .build()
            .map_err(|e| AppError::Message(format!("创建异步运行时失败: {e}")))?;
        runtime.block_on(translate_lines_async(snapshot, lines, concurrency))
    }
}

/// Fan each line out to the blocking pool and reassemble by index.
///
/// Dropping the returned future aborts the outstanding tasks; nothing is
/// written anywhere, so an abandoned batch leaves no partial state.
pub async fn translate_lines_async(
    snapshot: Arc<RootSnapshot>,
    lines: Vec<String>,
    concurrency: usize,
) -> Result<Vec<TranslatedLine>, AppError> {
    let total = lines.len();
    let permits = Arc::new(Semaphore::new(concurrency.max(1)));
    let mut tasks = JoinSet::new();

    for (index, text) in lines.into_iter().enumerate() {
        let snapshot = Arc::clone(&snapshot);
        let permits = Arc::clone(&permits);
        tasks.spawn(async move {
            let _permit = permits
                .acquire_owned()
                .await
                .map_err(|e| AppError::Message(format!("获取并发许可失败: {e}")))?;
            tokio::task::spawn_blocking(move || TranslatedLine {
                result: resolve(segment(&text, &snapshot)),
                index,
                text,
            })
            .await
            .map_err(|e| AppError::Message(format!("翻译任务执行失败: {e}")))
        });
    }

    let mut slots: Vec<Option<TranslatedLine>> = (0..total).map(|_| None).collect();
    while let Some(joined) = tasks.join_next().await {
        let line = joined.map_err(|e| AppError::Message(format!("翻译任务执行失败: {e}")))??;
        let index = line.index;
        slots[index] = Some(line);
    }

    log::debug!("translated {total} lines");
    Ok(slots.into_iter().flatten().collect())
}
