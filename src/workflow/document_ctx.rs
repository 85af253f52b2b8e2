//! 文档处理上下文
//!
//! 封装"我正在处理哪一类文档的哪一个文件"这一信息

use std::fmt::Display;
use std::path::{Path, PathBuf};

use crate::models::Pipeline;

/// 文档类型
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DocumentKind {
    /// CA / PCA 成绩单（OCR 文本、HTML 表格或引擎结果）
    Marks(Pipeline),
    /// 学期成绩汇总（PDF 或已提取的文本）
    Semester,
}

impl DocumentKind {
    /// 所有类型，按扫描顺序
    pub const ALL: [DocumentKind; 3] = [
        DocumentKind::Marks(Pipeline::Ca),
        DocumentKind::Marks(Pipeline::Pca),
        DocumentKind::Semester,
    ];

    /// 输入目录下对应的子目录名
    pub fn folder_name(self) -> &'static str {
        match self {
            DocumentKind::Marks(Pipeline::Ca) => "ca",
            DocumentKind::Marks(Pipeline::Pca) => "pca",
            DocumentKind::Semester => "semester",
        }
    }

    /// 从目录名解析类型
    pub fn from_folder_name(name: &str) -> Option<Self> {
        match name.trim().to_lowercase().as_str() {
            "semester" | "semester_marks" | "process_semester_marks" => Some(DocumentKind::Semester),
            other => Pipeline::find(other).map(DocumentKind::Marks),
        }
    }

    /// 允许的文件扩展名
    pub fn allowed_extensions(self) -> &'static [&'static str] {
        match self {
            DocumentKind::Marks(_) => &["txt", "html", "htm", "json"],
            DocumentKind::Semester => &["pdf", "txt"],
        }
    }

    pub fn allows(self, extension: &str) -> bool {
        let extension = extension.to_lowercase();
        self.allowed_extensions().iter().any(|e| *e == extension)
    }

    pub fn label(self) -> &'static str {
        match self {
            DocumentKind::Marks(pipeline) => pipeline.label(),
            DocumentKind::Semester => "SEMESTER",
        }
    }
}

impl Display for DocumentKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 文档处理上下文
#[derive(Debug, Clone)]
pub struct DocumentCtx {
    /// 文档索引（仅用于日志显示，从 1 开始）
    pub document_index: usize,

    /// 文档类型
    pub kind: DocumentKind,

    /// 输入文件路径
    pub path: PathBuf,
}

impl DocumentCtx {
    /// 创建新的文档上下文
    pub fn new(document_index: usize, kind: DocumentKind, path: impl Into<PathBuf>) -> Self {
        Self {
            document_index,
            kind,
            path: path.into(),
        }
    }

    pub fn file_name(&self) -> String {
        self.path
            .file_name()
            .unwrap_or_default()
            .to_string_lossy()
            .to_string()
    }

    /// 小写扩展名，没有扩展名时为空字符串
    pub fn extension(&self) -> String {
        extension_of(&self.path)
    }
}

pub(crate) fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|e| e.to_string_lossy().to_lowercase())
        .unwrap_or_default()
}

impl Display for DocumentCtx {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "[文档 #{} 类型#{} 文件#{}]",
            self.document_index,
            self.kind,
            self.file_name()
        )
    }
}
