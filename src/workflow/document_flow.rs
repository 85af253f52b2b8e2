//! 文档处理流程 - 流程层
//!
//! 核心职责：定义"一个文档"的完整处理流程
//!
//! 流程顺序：
//! 1. 校验扩展名
//! 2. 读取（文本 / HTML / 引擎 JSON / PDF 第一页）
//! 3. 提取记录或汇总
//! 4. 空结果检查
//! 5. 写入带时间戳的 JSON

use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::Value as JsonValue;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{AppError, AppResult, ExtractError, FileError};
use crate::models::{EngineOutput, PaperRecord, Pipeline, SemesterSummary, TableRecord};
use crate::services::{extract_summary, parse_table, rows_from_text, JsonWriter};
use crate::workflow::document_ctx::{DocumentCtx, DocumentKind};
use crate::workflow::marks_parser::parse_marks;

/// PDF 文本中的分页符
const PAGE_BREAK: char = '\x0c';

/// 提取出的数据，按写入时的形状保存
///
/// 直接序列化这里的类型可以保留记录的键顺序。
#[derive(Debug, Serialize)]
#[serde(untagged)]
enum Extracted {
    Papers(Vec<PaperRecord>),
    Table(Vec<TableRecord>),
    Summary([SemesterSummary; 1]),
}

/// 单个文档的处理结果
#[derive(Debug, Clone, Serialize)]
pub struct ProcessOutcome {
    pub status: String,
    pub message: String,
    pub data: JsonValue,
    pub json_path: String,
    pub timestamp: String,
}

impl ProcessOutcome {
    fn success(message: String, data: JsonValue, json_path: PathBuf) -> Self {
        Self {
            status: "success".to_string(),
            message,
            data,
            json_path: json_path.display().to_string(),
            timestamp: chrono::Local::now().to_rfc3339(),
        }
    }

    /// 写出的记录条数
    pub fn record_count(&self) -> usize {
        self.data.as_array().map(Vec::len).unwrap_or(0)
    }
}

/// 文档处理流程
///
/// - 编排单个文档的读取、提取和持久化
/// - 不负责删除输入文件和写警告（由编排层处理）
pub struct DocumentFlow {
    json_writer: JsonWriter,
    verbose_logging: bool,
}

impl DocumentFlow {
    /// 创建新的文档处理流程
    pub fn new(config: &Config) -> Self {
        Self {
            json_writer: JsonWriter::new(&config.output_folder),
            verbose_logging: config.verbose_logging,
        }
    }

    pub async fn run(&self, ctx: &DocumentCtx) -> AppResult<ProcessOutcome> {
        let extension = ctx.extension();
        if !ctx.kind.allows(&extension) {
            return Err(FileError::UnsupportedType {
                path: ctx.path.display().to_string(),
                allowed: ctx.kind.allowed_extensions().join(", "),
            }
            .into());
        }

        info!("[文档 {}] 📄 开始处理 {}", ctx.document_index, ctx);

        let data = match ctx.kind {
            DocumentKind::Marks(pipeline) => {
                self.extract_marks(ctx, pipeline, &extension).await?
            }
            DocumentKind::Semester => self.extract_semester(ctx, &extension).await?,
        };

        let json_path = self.json_writer.write(&data, &ctx.file_name()).await?;
        let message = format!("{} 成绩处理成功", ctx.kind.label());

        let data = serde_json::to_value(&data)
            .map_err(|e| AppError::Other(format!("结果序列化失败: {}", e)))?;

        Ok(ProcessOutcome::success(message, data, json_path))
    }

    async fn extract_marks(
        &self,
        ctx: &DocumentCtx,
        pipeline: Pipeline,
        extension: &str,
    ) -> AppResult<Extracted> {
        let content = read_text(&ctx.path).await?;

        let data = match extension {
            "txt" => {
                let records = parse_marks(&content, pipeline);
                if records.is_empty() {
                    return Err(AppError::no_records(pipeline));
                }
                self.log_count(ctx, records.len());
                Extracted::Papers(records)
            }
            "json" => {
                let output: EngineOutput =
                    serde_json::from_str(&content).map_err(AppError::engine_json)?;
                let html = output.first_table_html().ok_or(ExtractError::NoTable)?;
                self.extract_table(ctx, html, pipeline)?
            }
            _ => self.extract_table(ctx, &content, pipeline)?,
        };

        Ok(data)
    }

    fn extract_table(&self, ctx: &DocumentCtx, html: &str, pipeline: Pipeline) -> AppResult<Extracted> {
        if !html.to_lowercase().contains("<table") {
            return Err(ExtractError::NoTable.into());
        }

        let records = parse_table(html, pipeline);
        if records.is_empty() {
            return Err(AppError::no_records(pipeline));
        }
        self.log_count(ctx, records.len());

        Ok(Extracted::Table(records))
    }

    async fn extract_semester(&self, ctx: &DocumentCtx, extension: &str) -> AppResult<Extracted> {
        let text = if extension == "pdf" {
            read_pdf_text(&ctx.path).await?
        } else {
            read_text(&ctx.path).await?
        };

        let page = first_page(&text);
        if self.verbose_logging {
            debug!(
                "[文档 {}] 第一页文本: {}",
                ctx.document_index,
                crate::utils::logging::truncate_text(page, 200)
            );
        }

        let summary = extract_summary(page, &rows_from_text(page));
        if summary.is_empty() {
            return Err(ExtractError::NoSummary.into());
        }
        info!(
            "[文档 {}] ✓ SGPA: {} | 结果: {} | 科目 {} 门",
            ctx.document_index,
            summary.sgpa.as_deref().unwrap_or("-"),
            summary.result.as_deref().unwrap_or("-"),
            summary.subjects.len()
        );

        Ok(Extracted::Summary([summary]))
    }

    fn log_count(&self, ctx: &DocumentCtx, count: usize) {
        info!("[文档 {}] ✓ 提取到 {} 条记录", ctx.document_index, count);
    }
}

/// 只取第一页
fn first_page(text: &str) -> &str {
    text.split(PAGE_BREAK).next().unwrap_or_default()
}

async fn read_text(path: &Path) -> AppResult<String> {
    let bytes = tokio::fs::read(path).await.map_err(|e| {
        if e.kind() == std::io::ErrorKind::NotFound {
            AppError::File(FileError::NotFound {
                path: path.display().to_string(),
            })
        } else {
            AppError::file_read_failed(path.display().to_string(), e)
        }
    })?;

    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

async fn read_pdf_text(path: &Path) -> AppResult<String> {
    if !path.exists() {
        return Err(FileError::NotFound {
            path: path.display().to_string(),
        }
        .into());
    }

    let owned = path.to_path_buf();
    tokio::task::spawn_blocking(move || pdf_extract::extract_text(&owned))
        .await
        .map_err(|e| AppError::Other(format!("PDF 提取任务失败: {}", e)))?
        .map_err(|e| ExtractError::Pdf(e.to_string()).into())
}
