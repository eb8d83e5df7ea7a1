//! Greedy longest-match segmentation over a root dictionary snapshot.
//!
//! Matching works on Unicode scalar values, never on bytes, so a root such
//! as `交易` is compared as two characters regardless of its UTF-8 length.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::root::RootEntry;

/// 输入文本中的一段：已知词根或单个未知字符
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Segment {
    pub chinese: String,
    pub english: String,
    pub matched: bool,
}

impl Segment {
    fn matched(chinese: &str, english: &str) -> Self {
        Self {
            chinese: chinese.to_string(),
            english: english.to_string(),
            matched: true,
        }
    }

    fn unknown(chinese: &str) -> Self {
        Self {
            chinese: chinese.to_string(),
            english: String::new(),
            matched: false,
        }
    }

    pub fn is_unknown(&self) -> bool {
        !self.matched
    }

    /// 拼接时使用的文本：已匹配取英文，未匹配保留原文
    pub fn display_token(&self) -> &str {
        if self.matched {
            &self.english
        } else {
            &self.chinese
        }
    }
}

/// Immutable, point-in-time view of the dictionary.
///
/// Roots keep their insertion order. The longest key (in characters) is
/// computed once so the match window never grows past it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RootSnapshot {
    roots: IndexMap<String, String>,
    max_key_chars: usize,
}

impl RootSnapshot {
    pub fn new(roots: IndexMap<String, String>) -> Self {
        let max_key_chars = roots.keys().map(|k| k.chars().count()).max().unwrap_or(0);
        Self {
            roots,
            max_key_chars,
        }
    }

    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = RootEntry>,
    {
        Self::new(
            entries
                .into_iter()
                .map(|entry| (entry.chinese, entry.english))
                .collect(),
        )
    }

    pub fn get(&self, chinese: &str) -> Option<&str> {
        self.roots.get(chinese).map(String::as_str)
    }

    pub fn contains(&self, chinese: &str) -> bool {
        self.roots.contains_key(chinese)
    }

    pub fn len(&self) -> usize {
        self.roots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.roots.is_empty()
    }

    pub fn max_key_chars(&self) -> usize {
        self.max_key_chars
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.roots.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    pub fn entries(&self) -> Vec<RootEntry> {
        self.iter()
            .map(|(chinese, english)| RootEntry::new(chinese, english))
            .collect()
    }

    pub fn as_map(&self) -> &IndexMap<String, String> {
        &self.roots
    }

    pub fn segment(&self, text: &str) -> Vec<Segment> {
        segment(text, self)
    }
}

/// 最长匹配切分。
///
/// Keys are unique, so at any position at most one root of a given length
/// can match; the longest candidate is therefore always unambiguous.
/// Empty or whitespace-only input yields no segments.
pub fn segment(text: &str, snapshot: &RootSnapshot) -> Vec<Segment> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    // bounds[k] is the byte offset of the k-th character; the last entry is text.len()
    let bounds: Vec<usize> = text
        .char_indices()
        .map(|(offset, _)| offset)
        .chain(std::iter::once(text.len()))
        .collect();
    let char_count = bounds.len() - 1;

    let mut segments = Vec::new();
    let mut i = 0;
    while i < char_count {
        let window = snapshot.max_key_chars().min(char_count - i);
        let hit = (1..=window).rev().find_map(|len| {
            let span = &text[bounds[i]..bounds[i + len]];
            snapshot.get(span).map(|english| (len, span, english))
        });

        match hit {
            Some((len, span, english)) => {
                segments.push(Segment::matched(span, english));
                i += len;
            }
            None => {
                segments.push(Segment::unknown(&text[bounds[i]..bounds[i + 1]]));
                i += 1;
            }
        }
    }

    segments
}
