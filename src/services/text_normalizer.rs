//! 文本预处理 - 业务能力层
//!
//! 只负责把 OCR 原始文本整理成"干净的行"，不关心行的含义

use regex::Regex;
use std::sync::LazyLock;

/// 扫描仪插入的页码标注，例如 "Page Count: 12"
static PAGE_COUNT_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)page\s*count\s*:\s*\d{0,3}").expect("valid page count pattern"));

/// 统一括号与小数点
///
/// `{` `[` → `(`，`}` `]` → `)`，`,` → `.`
pub fn normalize_text(raw: &str) -> String {
    raw.chars()
        .map(|c| match c {
            '{' | '[' => '(',
            '}' | ']' => ')',
            ',' => '.',
            other => other,
        })
        .collect()
}

/// 删除所有 "Page Count: N" 标注
pub fn strip_page_count(text: &str) -> String {
    PAGE_COUNT_RE.replace_all(text, "").into_owned()
}

/// 完整预处理：字符替换 → 去除页码标注 → 按行切分、去空白、丢弃空行
pub fn clean_lines(raw: &str) -> Vec<String> {
    let normalized = strip_page_count(&normalize_text(raw));
    normalized
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_brackets_and_commas() {
        assert_eq!(normalize_text("CS-101{2021]"), "CS-101(2021)");
        assert_eq!(normalize_text("[A] 7,5"), "(A) 7.5");
    }

    #[test]
    fn test_strip_page_count_mid_line() {
        assert_eq!(strip_page_count("9 Page Count:12 Dr Rao"), "9  Dr Rao");
        assert_eq!(strip_page_count("PAGE COUNT : 3"), "");
        assert_eq!(strip_page_count("page count:"), "");
    }

    #[test]
    fn test_clean_lines_drops_blank_lines() {
        let lines = clean_lines("  first  \n\n   \r\nsecond\nPage Count: 2\n");
        assert_eq!(lines, vec!["first", "second"]);
    }
}
