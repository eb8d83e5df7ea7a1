mod colors;

pub use colors::{apply_inquire_theme, error, highlight, info, success, warning};

use comfy_table::presets::UTF8_FULL;
use comfy_table::{ContentArrangement, Table};
use serde::Serialize;
use unicode_width::UnicodeWidthChar;

pub fn create_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

pub fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(value)
}

/// Truncate to a display width, counting CJK characters as two columns.
pub fn truncate(s: &str, max_width: usize) -> String {
    let ellipsis = "...";
    let width: usize = s.chars().map(|c| c.width().unwrap_or(0)).sum();
    if width <= max_width {
        return s.to_string();
    }
    if max_width <= ellipsis.len() {
        return ellipsis.chars().take(max_width).collect();
    }

    let budget = max_width - ellipsis.len();
    let mut used = 0;
    let mut out = String::new();
    for c in s.chars() {
        let w = c.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(c);
    }
    out.push_str(ellipsis);
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_keeps_short_text() {
        assert_eq!(truncate("交易日期", 8), "交易日期");
    }

    #[test]
    fn truncate_counts_wide_characters() {
        assert_eq!(truncate("交易日期时间", 9), "交易日...");
        assert_eq!(truncate("transaction_date", 10), "transac...");
        assert_eq!(truncate("交易日期", 2), "..");
    }
}
