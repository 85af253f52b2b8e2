//! 成绩文本解析 - 流程层
//!
//! 逐行扫描 OCR 文本，识别课程代码边界，组装 [`PaperRecord`]。
//!
//! 状态只有两种：没有打开的记录 / 有一条打开的记录。
//! - 课程代码行：关闭上一条（如果有），打开新的一条
//! - 其他行：追加到打开记录的教师姓名；没有打开的记录时丢弃

use tracing::debug;

use crate::models::{PaperRecord, Pipeline};
use crate::services::field_extractor::{split_paper_code, FieldLayout};
use crate::services::text_normalizer::clean_lines;

/// 一行文本的分类
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind<'a> {
    /// 以课程代码开头，开始新记录
    PaperStart { code: &'a str, remaining: &'a str },
    /// 续行（属于当前记录的教师姓名）
    Continuation(&'a str),
}

pub fn classify_line(line: &str) -> LineKind<'_> {
    match split_paper_code(line) {
        Some((code, remaining)) => LineKind::PaperStart { code, remaining },
        None => LineKind::Continuation(line),
    }
}

/// 解析整段 OCR 文本
///
/// # 参数
/// - `raw_text`: OCR 引擎输出的原始文本
/// - `pipeline`: CA 或 PCA
///
/// # 返回
/// 按文档顺序排列的记录；课程代码行的数量 == 记录数量
pub fn parse_marks(raw_text: &str, pipeline: Pipeline) -> Vec<PaperRecord> {
    let layout = FieldLayout::for_pipeline(pipeline);
    let mut records = Vec::new();
    let mut current: Option<PaperRecord> = None;
    let mut dropped_lines = 0usize;

    for line in clean_lines(raw_text) {
        match classify_line(&line) {
            LineKind::PaperStart { code, remaining } => {
                if let Some(done) = current.take() {
                    records.push(done);
                }
                current = Some(open_record(&layout, code, remaining));
            }
            LineKind::Continuation(text) => match current.as_mut() {
                Some(record) => record.append_teacher(text),
                None => dropped_lines += 1,
            },
        }
    }

    if let Some(done) = current.take() {
        records.push(done);
    }

    debug!(
        "{} 文本解析完成: {} 条记录, 丢弃首条记录前的 {} 行",
        pipeline,
        records.len(),
        dropped_lines
    );

    records
}

fn open_record(layout: &FieldLayout, code: &str, remaining: &str) -> PaperRecord {
    let mut record = PaperRecord::open(layout.pipeline(), code);

    match layout.extract(remaining) {
        Some(fields) => {
            record.paper_name = fields.subject;
            record.marks = fields.marks;
            record.append_teacher(&fields.teacher_start);
        }
        None => debug!("课程 {} 的字段无法切分，只保留课程代码", code),
    }

    record
}
