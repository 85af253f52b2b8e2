//! 字段切分 - 业务能力层
//!
//! 负责两件事：
//! - 识别行首的课程代码（paper code）
//! - 把代码之后的剩余文本切分为 课程名 / 成绩字段 / 教师姓名开头
//!
//! CA 与 PCA 共用同一个 [`FieldLayout`]，只是字段个数、匹配模式和歧义处理规则不同。

use regex::{Captures, Regex};
use std::sync::LazyLock;

use crate::models::{Mark, Pipeline};
use crate::services::mark_sanitizer::sanitize_mark;

/// 课程代码，例如 `CS-101A(2021)`、`BBA(H)204(2020)`
static PAPER_CODE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Z]{2,3}-?(?:\([A-Z]{0,3}\))?\d{3}[A-Z]?\(\d{4}\)")
        .expect("valid paper code pattern")
});

/// CA：课程名（非贪婪）+ 最多四个成绩 + 行尾的教师姓名
static CA_FIELDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<subject>.*?)",
        r"(?:\s+(?P<m1>[A\d.]+))?",
        r"(?:\s+(?P<m2>[A\d.]+))?",
        r"(?:\s+(?P<m3>[A\d.]+))?",
        r"(?:\s+(?P<m4>[A\d.]+))?",
        r"\s+(?P<teacher>[A-Z][A-Za-z.']*(?:\s+[A-Za-z.']+)*)\s*$",
    ))
    .expect("valid CA field pattern")
});

/// PCA：课程名 + 恰好两个 1–2 位数字 + 教师姓名
static PCA_FIELDS_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(concat!(
        r"^(?P<subject>.*?)",
        r"\s+(?P<m1>\d{1,2})",
        r"\s+(?P<m2>\d{1,2})",
        r"\s+(?P<teacher>[A-Z][A-Za-z.']*(?:\s+[A-Za-z.']+)*)\s*$",
    ))
    .expect("valid PCA field pattern")
});

const MARK_GROUPS: [&str; 4] = ["m1", "m2", "m3", "m4"];

/// 匹配行首课程代码
///
/// # 返回
/// `(课程代码, 剩余文本)`；行首不是课程代码时返回 `None`
pub fn split_paper_code(line: &str) -> Option<(&str, &str)> {
    let m = PAPER_CODE_RE.find(line)?;
    Some((m.as_str(), &line[m.end()..]))
}

/// 一行剩余文本的切分结果
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedFields {
    pub subject: String,
    /// 长度等于所属类型的成绩字段个数
    pub marks: Vec<Option<Mark>>,
    /// 教师姓名的开头部分，后续行会继续追加
    pub teacher_start: String,
}

/// 按类型参数化的字段切分器
#[derive(Clone, Copy)]
pub struct FieldLayout {
    pipeline: Pipeline,
    pattern: &'static Regex,
    resolve: fn(&[Option<&str>]) -> Vec<Option<String>>,
}

impl FieldLayout {
    pub fn for_pipeline(pipeline: Pipeline) -> Self {
        match pipeline {
            Pipeline::Ca => Self {
                pipeline,
                pattern: &CA_FIELDS_RE,
                resolve: resolve_ca_tokens,
            },
            Pipeline::Pca => Self {
                pipeline,
                pattern: &PCA_FIELDS_RE,
                resolve: resolve_positional,
            },
        }
    }

    pub fn pipeline(&self) -> Pipeline {
        self.pipeline
    }

    /// 切分课程代码之后的剩余文本
    ///
    /// 不匹配时返回 `None`，这是正常结果：调用方仍然保留只有代码的记录。
    pub fn extract(&self, remaining: &str) -> Option<ExtractedFields> {
        let caps = self.pattern.captures(remaining.trim())?;
        let tokens = captured_tokens(&caps, self.pipeline.arity());

        let marks = (self.resolve)(&tokens)
            .iter()
            .map(|token| sanitize_mark(token.as_deref()))
            .collect();

        Some(ExtractedFields {
            subject: group_text(&caps, "subject"),
            marks,
            teacher_start: group_text(&caps, "teacher"),
        })
    }
}

fn captured_tokens<'h>(caps: &Captures<'h>, arity: usize) -> Vec<Option<&'h str>> {
    MARK_GROUPS
        .iter()
        .take(arity)
        .map(|name| caps.name(name).map(|m| m.as_str()))
        .collect()
}

fn group_text(caps: &Captures<'_>, name: &str) -> String {
    caps.name(name)
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// 按位置一一对应
fn resolve_positional(tokens: &[Option<&str>]) -> Vec<Option<String>> {
    tokens.iter().map(|t| t.map(str::to_string)).collect()
}

/// CA 第三、四个成绩的歧义处理
///
/// 四个片段都在时按位置对应。只有三个片段时，说明 CA3 列可能整列缺失：
/// 第三个片段带小数点时视为 CA3（CA4 为空），否则视为 CA4，CA3 置空。
fn resolve_ca_tokens(tokens: &[Option<&str>]) -> Vec<Option<String>> {
    let token = |idx: usize| tokens.get(idx).copied().flatten().map(str::to_string);

    if token(3).is_some() {
        return resolve_positional(tokens);
    }

    let third = token(2);
    let third_is_decimal = third.as_deref().is_some_and(|t| t.contains('.'));

    let (ca3, ca4) = if third_is_decimal {
        (third, None)
    } else {
        (None, third)
    };

    vec![token(0), token(1), ca3, ca4]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_paper_code() {
        assert_eq!(
            split_paper_code("CS-101A(2021) Data Structures"),
            Some(("CS-101A(2021)", " Data Structures"))
        );
        assert_eq!(
            split_paper_code("BBA(H)204(2020) Economics"),
            Some(("BBA(H)204(2020)", " Economics"))
        );
        assert_eq!(split_paper_code("MTH301(2019)"), Some(("MTH301(2019)", "")));
    }

    #[test]
    fn test_split_paper_code_rejects_non_prefix() {
        assert_eq!(split_paper_code("Dr John Smith"), None);
        assert_eq!(split_paper_code(" CS-101A(2021)"), None);
        assert_eq!(split_paper_code("CS-101A(21)"), None);
        assert_eq!(split_paper_code("cs-101A(2021)"), None);
    }

    #[test]
    fn test_ca_four_marks() {
        let layout = FieldLayout::for_pipeline(Pipeline::Ca);
        let fields = layout.extract(" Data Structures 8 9 8.5 9 Dr John").unwrap();
        assert_eq!(fields.subject, "Data Structures");
        assert_eq!(
            fields.marks,
            vec![
                Some(Mark::Integer(8)),
                Some(Mark::Integer(9)),
                Some(Mark::Decimal(8.5)),
                Some(Mark::Integer(9)),
            ]
        );
        assert_eq!(fields.teacher_start, "Dr John");
    }

    #[test]
    fn test_ca_three_marks_integer_third_becomes_ca4() {
        let layout = FieldLayout::for_pipeline(Pipeline::Ca);
        let fields = layout.extract("Operating Systems 7 A 9 Prof Das").unwrap();
        assert_eq!(fields.subject, "Operating Systems");
        assert_eq!(
            fields.marks,
            vec![
                Some(Mark::Integer(7)),
                Some(Mark::Absent),
                None,
                Some(Mark::Integer(9)),
            ]
        );
        assert_eq!(fields.teacher_start, "Prof Das");
    }

    #[test]
    fn test_ca_disambiguation_rule() {
        let resolved = resolve_ca_tokens(&[Some("8"), Some("9"), Some("8.5"), Some("9")]);
        assert_eq!(resolved[2].as_deref(), Some("8.5"));
        assert_eq!(resolved[3].as_deref(), Some("9"));

        let resolved = resolve_ca_tokens(&[Some("8"), Some("9"), Some("9"), None]);
        assert_eq!(resolved[2], None);
        assert_eq!(resolved[3].as_deref(), Some("9"));

        let resolved = resolve_ca_tokens(&[Some("8"), Some("9"), Some("7"), Some("6")]);
        assert_eq!(resolved[2].as_deref(), Some("7"));
        assert_eq!(resolved[3].as_deref(), Some("6"));

        let resolved = resolve_ca_tokens(&[Some("8"), Some("9"), Some("8.5"), None]);
        assert_eq!(resolved[2].as_deref(), Some("8.5"));
        assert_eq!(resolved[3], None);
    }

    #[test]
    fn test_ca_four_integer_marks_keep_positions() {
        let layout = FieldLayout::for_pipeline(Pipeline::Ca);
        let fields = layout.extract(" Data Structures 8 9 7 6 Dr John").unwrap();
        assert_eq!(
            fields.marks,
            vec![
                Some(Mark::Integer(8)),
                Some(Mark::Integer(9)),
                Some(Mark::Integer(7)),
                Some(Mark::Integer(6)),
            ]
        );
        assert_eq!(fields.teacher_start, "Dr John");
    }

    #[test]
    fn test_ca_three_marks_decimal_third_is_ca3() {
        let layout = FieldLayout::for_pipeline(Pipeline::Ca);
        let fields = layout.extract("Compilers 8 9 8.5 Dr Iyer").unwrap();
        assert_eq!(
            fields.marks,
            vec![
                Some(Mark::Integer(8)),
                Some(Mark::Integer(9)),
                Some(Mark::Decimal(8.5)),
                None,
            ]
        );
    }

    #[test]
    fn test_pca_fixed_arity() {
        let layout = FieldLayout::for_pipeline(Pipeline::Pca);
        let fields = layout.extract(" Physics Lab 18 20 Dr S. Rao").unwrap();
        assert_eq!(fields.subject, "Physics Lab");
        assert_eq!(fields.marks, vec![Some(Mark::Integer(18)), Some(Mark::Integer(20))]);
        assert_eq!(fields.teacher_start, "Dr S. Rao");
    }

    #[test]
    fn test_non_matching_remainder() {
        let pca = FieldLayout::for_pipeline(Pipeline::Pca);
        assert_eq!(pca.extract(" Physics Lab 180 Dr Rao"), None);

        let ca = FieldLayout::for_pipeline(Pipeline::Ca);
        assert_eq!(ca.extract(" 8 9 10"), None);
        assert_eq!(ca.extract(""), None);
    }
}
