use thiserror::Error;

use crate::models::Pipeline;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 文件操作错误
    #[error("文件错误: {0}")]
    File(#[from] FileError),
    /// 提取结果错误（无表格、无记录等）
    #[error("提取错误: {0}")]
    Extract(#[from] ExtractError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 其他错误（用于包装第三方库错误）
    #[error("错误: {0}")]
    Other(String),
}

/// 文件操作错误
#[derive(Debug, Error)]
pub enum FileError {
    /// 文件不存在
    #[error("文件不存在: {path}")]
    NotFound { path: String },
    /// 读取文件失败
    #[error("读取文件失败 ({path}): {source}")]
    ReadFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 写入文件失败
    #[error("写入文件失败 ({path}): {source}")]
    WriteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 删除文件失败
    #[error("删除文件失败 ({path}): {source}")]
    DeleteFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },
    /// 不支持的文件类型
    #[error("不支持的文件类型: {path} (允许: {allowed})")]
    UnsupportedType { path: String, allowed: String },
    /// 目录不存在
    #[error("目录不存在: {path}")]
    DirectoryNotFound { path: String },
}

/// 提取结果错误
///
/// 核心解析器本身从不返回错误，空结果由调用方在这里转换成面向用户的错误。
#[derive(Debug, Error)]
pub enum ExtractError {
    /// 输入中没有找到表格
    #[error("图像中没有找到表格数据")]
    NoTable,
    /// 没有提取到有效记录
    #[error("表格中没有找到有效的 {pipeline} 数据")]
    NoRecords { pipeline: Pipeline },
    /// 汇总文档中没有找到任何字段
    #[error("PDF 中没有找到成绩汇总数据")]
    NoSummary,
    /// PDF 文本提取失败
    #[error("PDF 文本提取失败: {0}")]
    Pdf(String),
    /// OCR 引擎结果 JSON 解析失败
    #[error("OCR 引擎结果解析失败: {source}")]
    EngineJson {
        #[source]
        source: serde_json::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// TOML 配置文件解析失败
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: String,
        #[source]
        source: toml::de::Error,
    },
}

// ========== 从常见错误类型转换 ==========

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::File(FileError::ReadFailed {
            path: String::new(),
            source: Box::new(err),
        })
    }
}

// ========== 便捷构造函数 ==========

impl AppError {
    /// 创建文件读取错误
    pub fn file_read_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::ReadFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件写入错误
    pub fn file_write_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::WriteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建文件删除错误
    pub fn file_delete_failed(
        path: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        AppError::File(FileError::DeleteFailed {
            path: path.into(),
            source: Box::new(source),
        })
    }

    /// 创建引擎结果解析错误（只用于读取 OCR 引擎 JSON）
    pub fn engine_json(source: serde_json::Error) -> Self {
        AppError::Extract(ExtractError::EngineJson { source })
    }

    /// 创建"没有有效记录"错误
    pub fn no_records(pipeline: Pipeline) -> Self {
        AppError::Extract(ExtractError::NoRecords { pipeline })
    }

    /// 是否属于"内容为空"类错误（而非 I/O 故障）
    pub fn is_empty_result(&self) -> bool {
        matches!(
            self,
            AppError::Extract(
                ExtractError::NoTable | ExtractError::NoRecords { .. } | ExtractError::NoSummary
            )
        )
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
