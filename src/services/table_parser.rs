//! 表格解析 - 业务能力层
//!
//! 识别引擎已经给出 HTML 表格时使用：不需要逐行状态机，只做按列位置映射。
//!
//! 单元格用 `Option<String>` 表示，`None` 相当于数据框里的 NaN（空单元格、补齐的列）。

use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::collections::BTreeMap;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::{Pipeline, TableRecord};

static TABLE_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("table").expect("valid table selector"));
static ROW_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("tr").expect("valid row selector"));
static CELL_SELECTOR: LazyLock<Selector> =
    LazyLock::new(|| Selector::parse("td, th").expect("valid cell selector"));
static WHITESPACE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

/// 表头行第一列的文字
const HEADER_LABEL: &str = "Paper Code(Unique Code)";
/// 学期分节行的标记
const SECTION_MARKER: &str = "SEMESTER";
/// CA3 列中混入的页码标注
const PAGE_COUNT_MARKER: &str = "Page Count";
const TEACHER_COLUMN: usize = 6;

pub type TableRow = Vec<Option<String>>;

/// 按类型的列位置
struct TableLayout {
    mark_columns: &'static [usize],
    /// 需要去掉 "Page Count…" 后缀的列
    page_count_column: Option<usize>,
}

impl TableLayout {
    fn for_pipeline(pipeline: Pipeline) -> Self {
        match pipeline {
            Pipeline::Ca => Self {
                mark_columns: &[2, 3, 4, 5],
                page_count_column: Some(4),
            },
            Pipeline::Pca => Self {
                mark_columns: &[2, 3],
                page_count_column: None,
            },
        }
    }
}

/// 一张表格的映射结果
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableParseOutcome {
    pub records: Vec<TableRecord>,
    /// 表头、分节、空行
    pub filtered_rows: usize,
    /// 列数不足等无法映射的行
    pub skipped_rows: usize,
}

/// 解析 HTML 中的第一张表格
///
/// 没有表格或没有数据行时返回空列表，调用方据此判断"未找到数据"。
pub fn parse_table(html: &str, pipeline: Pipeline) -> Vec<TableRecord> {
    match html_table_rows(html) {
        Some(rows) => {
            let outcome = parse_table_rows(&rows, pipeline);
            debug!(
                "{} 表格: {} 行 → {} 条记录 (过滤 {}, 跳过 {})",
                pipeline,
                rows.len(),
                outcome.records.len(),
                outcome.filtered_rows,
                outcome.skipped_rows
            );
            outcome.records
        }
        None => {
            debug!("HTML 中没有找到表格");
            Vec::new()
        }
    }
}

/// 按列位置把数据行映射为记录
pub fn parse_table_rows(rows: &[TableRow], pipeline: Pipeline) -> TableParseOutcome {
    let layout = TableLayout::for_pipeline(pipeline);
    let mut outcome = TableParseOutcome::default();

    for row in rows {
        if is_noise_row(row) {
            outcome.filtered_rows += 1;
            continue;
        }
        match map_row(row, pipeline, &layout) {
            Some(record) => outcome.records.push(record),
            None => outcome.skipped_rows += 1,
        }
    }

    outcome
}

/// NaN 或 "nan" → 空字符串，其余去掉首尾空白
pub fn sanitize_cell(cell: Option<&str>) -> String {
    match cell {
        Some(value) if !value.trim().eq_ignore_ascii_case("nan") => value.trim().to_string(),
        _ => String::new(),
    }
}

fn is_noise_row(row: &[Option<String>]) -> bool {
    let first = sanitize_cell(row.first().and_then(|c| c.as_deref()));
    first.is_empty() || first == HEADER_LABEL || first.to_uppercase().contains(SECTION_MARKER)
}

fn map_row(row: &[Option<String>], pipeline: Pipeline, layout: &TableLayout) -> Option<TableRecord> {
    let cell = |idx: usize| row.get(idx).map(|c| sanitize_cell(c.as_deref()));

    let paper_code = cell(0)?;
    let paper_name = cell(1)?;

    let mut marks = Vec::with_capacity(layout.mark_columns.len());
    for &col in layout.mark_columns {
        let mut value = cell(col)?;
        if layout.page_count_column == Some(col) {
            if let Some((before, _)) = value.split_once(PAGE_COUNT_MARKER) {
                value = before.trim().to_string();
            }
        }
        marks.push(value);
    }

    let teacher = if row.len() > TEACHER_COLUMN {
        cell(TEACHER_COLUMN).unwrap_or_default()
    } else {
        String::new()
    };

    Some(TableRecord {
        pipeline,
        paper_code,
        paper_name,
        marks,
        teacher,
    })
}

/// 取出 HTML 中第一张表格的数据行
///
/// - 只由 `th` 组成的行、`thead` 中的行视为表头，不计入数据
/// - `colspan` / `rowspan` 的值会复制到被合并的格子
/// - 所有行补齐到同一宽度
pub fn html_table_rows(html: &str) -> Option<Vec<TableRow>> {
    let document = Html::parse_document(html);
    let table = document.select(&TABLE_SELECTOR).next()?;

    let mut rows: Vec<TableRow> = Vec::new();
    // 列号 → (剩余行数, 值)
    let mut row_spans: BTreeMap<usize, (usize, Option<String>)> = BTreeMap::new();

    for tr in table.select(&ROW_SELECTOR) {
        let cells: Vec<ElementRef> = tr.select(&CELL_SELECTOR).collect();
        let is_header = in_thead(&tr)
            || (!cells.is_empty() && cells.iter().all(|c| c.value().name() == "th"));

        let mut row: TableRow = Vec::new();
        for cell in cells {
            fill_row_spans(&mut row, &mut row_spans);

            let text = cell_text(&cell);
            let colspan = span_attr(&cell, "colspan");
            let rowspan = span_attr(&cell, "rowspan");
            for _ in 0..colspan {
                if rowspan > 1 {
                    row_spans.insert(row.len(), (rowspan - 1, text.clone()));
                }
                row.push(text.clone());
            }
        }
        fill_row_spans(&mut row, &mut row_spans);
        // 行尾之后仍被上方单元格覆盖的列
        let trailing: Vec<usize> = row_spans.keys().copied().filter(|&c| c >= row.len()).collect();
        for col in trailing {
            while row.len() < col {
                row.push(None);
            }
            fill_row_spans(&mut row, &mut row_spans);
        }

        if !is_header {
            rows.push(row);
        }
    }

    let width = rows.iter().map(Vec::len).max().unwrap_or(0);
    for row in &mut rows {
        row.resize(width, None);
    }

    Some(rows)
}

/// 当前列如果被上方的 rowspan 覆盖，就先填入该值
fn fill_row_spans(row: &mut TableRow, row_spans: &mut BTreeMap<usize, (usize, Option<String>)>) {
    while let Some((left, value)) = row_spans.get_mut(&row.len()) {
        let value = value.clone();
        *left -= 1;
        if *left == 0 {
            row_spans.remove(&row.len());
        }
        row.push(value);
    }
}

fn in_thead(tr: &ElementRef) -> bool {
    tr.parent()
        .and_then(|parent| parent.value().as_element().map(|e| e.name() == "thead"))
        .unwrap_or(false)
}

fn cell_text(cell: &ElementRef) -> Option<String> {
    let text = cell.text().collect::<String>();
    let text = WHITESPACE_RE.replace_all(text.trim(), " ").into_owned();
    if text.is_empty() {
        None
    } else {
        Some(text)
    }
}

fn span_attr(cell: &ElementRef, name: &str) -> usize {
    cell.value()
        .attr(name)
        .and_then(|v| v.trim().parse::<usize>().ok())
        .unwrap_or(1)
        .clamp(1, 1000)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> TableRow {
        cells
            .iter()
            .map(|c| if c.is_empty() { None } else { Some(c.to_string()) })
            .collect()
    }

    #[test]
    fn test_sanitize_cell() {
        assert_eq!(sanitize_cell(None), "");
        assert_eq!(sanitize_cell(Some("NaN")), "");
        assert_eq!(sanitize_cell(Some(" nan ")), "");
        assert_eq!(sanitize_cell(Some("  9 ")), "9");
    }

    #[test]
    fn test_filters_section_and_header_rows() {
        let rows = vec![
            row(&["SEMESTER I", "", "", "", "", "", ""]),
            row(&["Paper Code(Unique Code)", "Paper Name", "CA1", "CA2", "CA3", "CA4", "Teacher"]),
            row(&["CS-101(2021)", "Data Structures", "8", "9", "8.5 Page Count 3", "9", "Dr Rao"]),
            row(&["", "", "", "", "", "", ""]),
            row(&["CS-102(2021)", "Networks", "A", "7", "nan", "6", ""]),
        ];

        let outcome = parse_table_rows(&rows, Pipeline::Ca);
        assert_eq!(outcome.records.len(), 2);
        assert!(outcome.records.len() < rows.len());
        assert_eq!(outcome.filtered_rows, 3);

        let first = &outcome.records[0];
        assert_eq!(first.mark("ca3"), Some("8.5"));
        assert_eq!(first.teacher, "Dr Rao");

        let second = &outcome.records[1];
        assert_eq!(second.mark("ca1"), Some("A"));
        assert_eq!(second.mark("ca3"), Some(""));
        assert_eq!(second.teacher, "");
    }

    #[test]
    fn test_all_header_table_is_empty() {
        let rows = vec![
            row(&["Paper Code(Unique Code)", "Paper Name", "PCA1", "PCA2"]),
            row(&["SEMESTER II", "", "", ""]),
        ];
        let outcome = parse_table_rows(&rows, Pipeline::Pca);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.filtered_rows, 2);
    }

    #[test]
    fn test_narrow_table_rows_are_skipped() {
        let rows = vec![row(&["CS-101(2021)", "Data Structures", "8", "9"])];
        let outcome = parse_table_rows(&rows, Pipeline::Ca);
        assert!(outcome.records.is_empty());
        assert_eq!(outcome.skipped_rows, 1);

        let outcome = parse_table_rows(&rows, Pipeline::Pca);
        assert_eq!(outcome.records.len(), 1);
        assert_eq!(outcome.records[0].mark("pca2"), Some("9"));
        assert_eq!(outcome.records[0].teacher, "");
    }

    #[test]
    fn test_html_rows_with_header_and_spans() {
        let html = r#"
            <html><body><table>
              <tr><th>Paper Code(Unique Code)</th><th>Paper Name</th><th>PCA1</th><th>PCA2</th></tr>
              <tr><td colspan="4">SEMESTER III</td></tr>
              <tr><td>PH-201(2022)</td><td rowspan="2">Optics   Lab</td><td>18</td><td></td></tr>
              <tr><td>PH-202(2022)</td><td>15</td><td>16</td></tr>
            </table></body></html>
        "#;

        let rows = html_table_rows(html).unwrap();
        assert_eq!(rows.len(), 3);
        assert_eq!(rows[0], row(&["SEMESTER III", "SEMESTER III", "SEMESTER III", "SEMESTER III"]));
        assert_eq!(rows[1], row(&["PH-201(2022)", "Optics Lab", "18", ""]));
        assert_eq!(rows[2], row(&["PH-202(2022)", "Optics Lab", "15", "16"]));

        let records = parse_table(html, Pipeline::Pca);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].mark("pca2"), Some(""));
        assert_eq!(records[1].paper_name, "Optics Lab");
    }

    #[test]
    fn test_no_table_in_html() {
        assert_eq!(html_table_rows("<p>nothing here</p>"), None);
        assert!(parse_table("<p>nothing here</p>", Pipeline::Ca).is_empty());
    }
}
