use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::models::{Mark, Pipeline};

/// 一门课程（paper）的成绩记录，来自 OCR 纯文本
///
/// 序列化时按类型展开成绩字段：`paper_code, paper_name, ca1..ca4 | pca1..pca2, teacher`。
#[derive(Debug, Clone, PartialEq)]
pub struct PaperRecord {
    pub pipeline: Pipeline,
    pub paper_code: String,
    pub paper_name: String,
    /// 长度恒等于 `pipeline.arity()`
    pub marks: Vec<Option<Mark>>,
    pub teacher: String,
}

impl PaperRecord {
    /// 打开一条只有课程代码的新记录
    pub fn open(pipeline: Pipeline, paper_code: impl Into<String>) -> Self {
        Self {
            pipeline,
            paper_code: paper_code.into(),
            paper_name: String::new(),
            marks: vec![None; pipeline.arity()],
            teacher: String::new(),
        }
    }

    /// 追加一段教师姓名文本（以空格连接）
    pub fn append_teacher(&mut self, fragment: &str) {
        let fragment = fragment.trim();
        if fragment.is_empty() {
            return;
        }
        if !self.teacher.is_empty() {
            self.teacher.push(' ');
        }
        self.teacher.push_str(fragment);
    }

    /// 按字段名取成绩，例如 `record.mark("ca3")`
    pub fn mark(&self, field: &str) -> Option<Mark> {
        self.pipeline
            .mark_fields()
            .iter()
            .position(|name| *name == field)
            .and_then(|idx| self.marks.get(idx).copied().flatten())
    }
}

impl Serialize for PaperRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = self.pipeline.mark_fields();
        let mut map = serializer.serialize_map(Some(fields.len() + 3))?;
        map.serialize_entry("paper_code", &self.paper_code)?;
        map.serialize_entry("paper_name", &self.paper_name)?;
        for (idx, name) in fields.iter().enumerate() {
            map.serialize_entry(name, &self.marks.get(idx).copied().flatten())?;
        }
        map.serialize_entry("teacher", &self.teacher)?;
        map.end()
    }
}

/// 来自 HTML 表格的一行记录，所有值均为字符串，空值为 `""`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableRecord {
    pub pipeline: Pipeline,
    pub paper_code: String,
    pub paper_name: String,
    pub marks: Vec<String>,
    pub teacher: String,
}

impl TableRecord {
    pub fn mark(&self, field: &str) -> Option<&str> {
        self.pipeline
            .mark_fields()
            .iter()
            .position(|name| *name == field)
            .and_then(|idx| self.marks.get(idx))
            .map(String::as_str)
    }
}

impl Serialize for TableRecord {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        let fields = self.pipeline.mark_fields();
        let mut map = serializer.serialize_map(Some(fields.len() + 3))?;
        map.serialize_entry("paper_code", &self.paper_code)?;
        map.serialize_entry("paper_name", &self.paper_name)?;
        for (idx, name) in fields.iter().enumerate() {
            let value = self.marks.get(idx).map(String::as_str).unwrap_or_default();
            map.serialize_entry(name, value)?;
        }
        map.serialize_entry("teacher", &self.teacher)?;
        map.end()
    }
}
