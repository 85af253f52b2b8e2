//! 学期成绩汇总提取 - 业务能力层
//!
//! 只做"标签 + 分隔符 + 值"的查找和成绩表定位，不需要状态机。

use regex::Regex;
use std::sync::LazyLock;

use crate::models::{SemesterSummary, SubjectGrade};
use crate::services::table_parser::TableRow;

static SGPA_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*SGPA.*:").expect("valid SGPA prefix pattern"));
static RESULT_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r".*RESULT.*:").expect("valid RESULT prefix pattern"));

static SGPA_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bSGPA\b[^:\-\n]*[:\-]\s*(\d+(?:\.\d+)?)").expect("valid SGPA text pattern")
});
static RESULT_TEXT_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\bRESULT\b[^:\-\n]*[:\-]\s*([^\n]+)").expect("valid RESULT text pattern")
});
static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?im)^\s*(?:name\s+of\s+the\s+student|student(?:'s)?\s+name|name)\s*[:\-]\s*([^\n]+?)\s*$")
        .expect("valid name pattern")
});
static ROLL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\broll\s*(?:no\.?|number)\s*[:\-]\s*([A-Za-z0-9/\-]+)").expect("valid roll pattern")
});
static REGISTRATION_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\breg(?:istration|n|d)?\.?\s*(?:no\.?|number)\s*[:\-]\s*([A-Za-z0-9/\-]+)")
        .expect("valid registration pattern")
});
/// 行内两个以上空白视为列分隔
static COLUMN_GAP_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}|\t").expect("valid column gap pattern"));

const SUBJECT_CODE_HEADER: &str = "subject code";

/// 提取学期成绩汇总
///
/// # 参数
/// - `page_text`: 第一页的文本
/// - `rows`: 从该页提取出的表格行
pub fn extract_summary(page_text: &str, rows: &[TableRow]) -> SemesterSummary {
    let mut summary = SemesterSummary::default();

    for row in rows {
        let cells: Vec<&str> = row.iter().flatten().map(String::as_str).collect();
        if cells.iter().all(|c| c.trim().is_empty()) {
            continue;
        }

        let joined = cells.join(" ");
        let first = row.first().and_then(|c| c.as_deref()).unwrap_or_default();
        if joined.contains("SGPA") {
            summary.sgpa = Some(SGPA_PREFIX_RE.replace_all(first, "").trim().to_string());
        } else if joined.contains("RESULT") {
            summary.result = Some(RESULT_PREFIX_RE.replace_all(first, "").trim().to_string());
        }
    }

    if summary.sgpa.as_deref().map_or(true, str::is_empty) {
        summary.sgpa = capture(&SGPA_TEXT_RE, page_text);
    }
    if summary.result.as_deref().map_or(true, str::is_empty) {
        summary.result = capture(&RESULT_TEXT_RE, page_text);
    }

    summary.name = capture(&NAME_RE, page_text);
    summary.roll_no = capture(&ROLL_RE, page_text);
    summary.registration_no = capture(&REGISTRATION_RE, page_text);

    summary.subjects = extract_grade_table(rows);
    if !summary.subjects.is_empty() {
        summary.total_credit = Some(sum_column(&summary.subjects, |s| &s.credit));
        summary.total_credit_points = Some(sum_column(&summary.subjects, |s| &s.credit_points));
    }

    summary
}

/// 把 PDF 文本的每一行按空白间隔切成单元格
pub fn rows_from_text(text: &str) -> Vec<TableRow> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .map(|line| {
            COLUMN_GAP_RE
                .split(line.trim())
                .map(|cell| Some(cell.trim().to_string()))
                .collect()
        })
        .collect()
}

fn capture(re: &Regex, text: &str) -> Option<String> {
    re.captures(text)
        .and_then(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|v| !v.is_empty())
}

/// 成绩表各列的位置
#[derive(Debug, Default)]
struct GradeColumns {
    code: usize,
    name: Option<usize>,
    grade: Option<usize>,
    grade_points: Option<usize>,
    credit: Option<usize>,
    credit_points: Option<usize>,
}

impl GradeColumns {
    fn from_header(header: &[Option<String>]) -> Option<Self> {
        let titles: Vec<String> = header
            .iter()
            .map(|c| c.as_deref().unwrap_or_default().trim().to_lowercase())
            .collect();
        let find = |pred: &dyn Fn(&str) -> bool| titles.iter().position(|t| pred(t));

        Some(Self {
            code: find(&|t| t == SUBJECT_CODE_HEADER)?,
            name: find(&|t| t == "subject name" || t == "subject" || t == "subject title"),
            grade: find(&|t| t == "grade" || t == "grade obtained"),
            grade_points: find(&|t| t == "grade points" || t == "grade point" || t == "points"),
            credit: find(&|t| t == "credit" || t == "credits"),
            credit_points: find(&|t| t == "credit points" || t == "credit point"),
        })
    }
}

/// 找到 "Subject Code" 表头后，把后续行当作成绩数据
fn extract_grade_table(rows: &[TableRow]) -> Vec<SubjectGrade> {
    let Some(header_idx) = rows.iter().position(|row| GradeColumns::from_header(row).is_some())
    else {
        return Vec::new();
    };
    let Some(columns) = GradeColumns::from_header(&rows[header_idx]) else {
        return Vec::new();
    };

    let mut subjects = Vec::new();
    for row in &rows[header_idx + 1..] {
        let joined = row.iter().flatten().cloned().collect::<Vec<_>>().join(" ").to_uppercase();
        if joined.contains("SGPA") || joined.contains("RESULT") || joined.contains("TOTAL") {
            break;
        }

        let cell = |idx: Option<usize>| {
            idx.and_then(|i| row.get(i))
                .and_then(|c| c.as_deref())
                .map(|c| c.trim().to_string())
                .unwrap_or_default()
        };

        let subject_code = cell(Some(columns.code));
        if subject_code.is_empty() {
            continue;
        }

        subjects.push(SubjectGrade {
            subject_code,
            subject_name: cell(columns.name),
            grade: cell(columns.grade),
            grade_points: cell(columns.grade_points),
            credit: cell(columns.credit),
            credit_points: cell(columns.credit_points),
        });
    }

    subjects
}

fn sum_column(subjects: &[SubjectGrade], field: impl Fn(&SubjectGrade) -> &String) -> f64 {
    subjects
        .iter()
        .filter_map(|s| field(s).trim().parse::<f64>().ok())
        .sum()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> TableRow {
        cells.iter().map(|c| Some(c.to_string())).collect()
    }

    #[test]
    fn test_sgpa_and_result_from_rows() {
        let rows = vec![
            vec![None, None],
            row(&["SGPA (Semester I) : 8.25", ""]),
            row(&["RESULT : PASS", ""]),
        ];
        let summary = extract_summary("", &rows);
        assert_eq!(summary.sgpa.as_deref(), Some("8.25"));
        assert_eq!(summary.result.as_deref(), Some("PASS"));
        assert!(summary.subjects.is_empty());
        assert_eq!(summary.total_credit, None);
    }

    #[test]
    fn test_label_in_later_cell_keeps_first_cell() {
        let rows = vec![row(&["7.90", "SGPA"])];
        let summary = extract_summary("", &rows);
        assert_eq!(summary.sgpa.as_deref(), Some("7.90"));
    }

    #[test]
    fn test_identity_and_text_fallback() {
        let text = "Name of the Student : Priya Sharma\nRoll No. : 21CS045\nRegistration No: 2021-0045\nSGPA: 9.1\nResult - PASSED\n";
        let summary = extract_summary(text, &[]);
        assert_eq!(summary.name.as_deref(), Some("Priya Sharma"));
        assert_eq!(summary.roll_no.as_deref(), Some("21CS045"));
        assert_eq!(summary.registration_no.as_deref(), Some("2021-0045"));
        assert_eq!(summary.sgpa.as_deref(), Some("9.1"));
        assert_eq!(summary.result.as_deref(), Some("PASSED"));
    }

    #[test]
    fn test_grade_table_with_totals() {
        let text = "\
Subject Code   Subject Name        Grade   Grade Points   Credit   Credit Points
CS101          Data Structures     A       9              4        36
CS102          Networks            B+      8              3        24
Total                                                      7        60
SGPA : 8.57
";
        let rows = rows_from_text(text);
        let summary = extract_summary(text, &rows);

        assert_eq!(summary.subjects.len(), 2);
        assert_eq!(summary.subjects[0].subject_name, "Data Structures");
        assert_eq!(summary.subjects[1].grade, "B+");
        assert_eq!(summary.total_credit, Some(7.0));
        assert_eq!(summary.total_credit_points, Some(60.0));
        assert_eq!(summary.sgpa.as_deref(), Some("8.57"));
    }

    #[test]
    fn test_rows_from_text_splits_on_wide_gaps() {
        let rows = rows_from_text("CS101   Data Structures\tA\n\n");
        assert_eq!(rows, vec![row(&["CS101", "Data Structures", "A"])]);
    }
}
