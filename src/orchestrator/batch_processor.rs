//! 批量文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块是整个应用的入口，负责批量文档的扫描、调度和统计。
//!
//! ## 核心功能
//!
//! 1. **应用初始化**：初始化运行日志、输出启动信息
//! 2. **批量扫描**：扫描 `ca/`、`pca/`、`semester/` 三个子目录
//! 3. **并发控制**：使用 Semaphore 限制并发数量
//! 4. **分批处理**：将文档分批次处理，每批完成后再开始下一批
//! 5. **全局统计**：汇总所有文档的处理结果

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Semaphore;
use tracing::{debug, error, info, warn};

use crate::config::Config;
use crate::error::{AppError, AppResult, FileError};
use crate::orchestrator::document_processor;
use crate::services::WarnWriter;
use crate::utils::logging;
use crate::workflow::{DocumentCtx, DocumentFlow, DocumentKind};

/// 应用主结构
pub struct App {
    config: Arc<Config>,
    flow: Arc<DocumentFlow>,
    warn_writer: Arc<WarnWriter>,
}

impl App {
    /// 初始化应用
    pub async fn initialize(config: Config) -> Result<Self> {
        logging::init_log_file(&config.output_log_file)?;
        logging::log_startup(&config.input_folder, config.concurrency());

        let flow = DocumentFlow::new(&config);
        let warn_writer = WarnWriter::with_path(config.warn_file.clone());

        Ok(Self {
            config: Arc::new(config),
            flow: Arc::new(flow),
            warn_writer: Arc::new(warn_writer),
        })
    }

    /// 运行应用主逻辑，返回处理统计
    pub async fn run(&self) -> Result<ProcessingStats> {
        let documents = self.load_documents().await?;

        if documents.is_empty() {
            warn!("⚠️ 没有找到待处理的文档，程序结束");
            return Ok(ProcessingStats::default());
        }

        logging::log_documents_loaded(documents.len(), self.config.concurrency());

        let stats = self.process_all_documents(documents).await?;

        logging::print_final_stats(
            stats.success,
            stats.failed,
            stats.total,
            &self.config.output_log_file,
        );

        Ok(stats)
    }

    /// 扫描输入目录
    async fn load_documents(&self) -> Result<Vec<DocumentCtx>> {
        info!("\n📁 正在扫描待处理的文档...");
        Ok(scan_documents(Path::new(&self.config.input_folder)).await?)
    }

    /// 处理所有文档
    async fn process_all_documents(&self, documents: Vec<DocumentCtx>) -> Result<ProcessingStats> {
        let batch_size = self.config.concurrency();
        let semaphore = Arc::new(Semaphore::new(batch_size));
        let total = documents.len();
        let total_batches = total.div_ceil(batch_size);
        let mut stats = ProcessingStats {
            total,
            ..Default::default()
        };

        for (batch_idx, batch) in documents.chunks(batch_size).enumerate() {
            let batch_num = batch_idx + 1;
            let batch_start = batch_idx * batch_size;

            logging::log_batch_start(
                batch_num,
                total_batches,
                batch_start + 1,
                batch_start + batch.len(),
                total,
            );

            let batch_result = self.process_batch(batch, semaphore.clone()).await?;

            stats.success += batch_result.success;
            stats.failed += batch_result.failed;

            logging::log_batch_complete(
                batch_num,
                batch_result.success,
                batch_result.success + batch_result.failed,
            );
        }

        Ok(stats)
    }

    /// 处理单个批次
    async fn process_batch(
        &self,
        batch: &[DocumentCtx],
        semaphore: Arc<Semaphore>,
    ) -> Result<BatchResult> {
        let mut batch_handles = Vec::new();

        for ctx in batch {
            let permit = semaphore.clone().acquire_owned().await?;
            let ctx = ctx.clone();
            let flow = Arc::clone(&self.flow);
            let warn_writer = Arc::clone(&self.warn_writer);
            let config = Arc::clone(&self.config);
            let document_index = ctx.document_index;

            let handle = tokio::spawn(async move {
                let _permit = permit;
                document_processor::process_document(&flow, &warn_writer, &ctx, &config).await
            });
            batch_handles.push((document_index, handle));
        }

        let mut result = BatchResult::default();

        for (document_index, handle) in batch_handles {
            match handle.await {
                Ok(Ok(true)) => result.success += 1,
                Ok(Ok(false)) => result.failed += 1,
                Ok(Err(e)) => {
                    error!("[文档 {}] ❌ 处理过程中发生错误: {:#}", document_index, e);
                    result.failed += 1;
                }
                Err(e) => {
                    error!("[文档 {}] 任务执行失败: {}", document_index, e);
                    result.failed += 1;
                }
            }
        }

        Ok(result)
    }
}

/// 扫描 `<input_folder>` 下各类型子目录中的文件
///
/// 子目录名按 `ca` / `pca` / `semester`（及其别名，如 `ca_marks`）识别，其他目录跳过；
/// 输入根目录不存在时报错。文档按类型、再按文件名排序，索引从 1 开始。
pub async fn scan_documents(input_folder: &Path) -> AppResult<Vec<DocumentCtx>> {
    if !input_folder.is_dir() {
        return Err(FileError::DirectoryNotFound {
            path: input_folder.display().to_string(),
        }
        .into());
    }

    let mut folders: Vec<(usize, DocumentKind, PathBuf)> = Vec::new();
    let mut entries = tokio::fs::read_dir(input_folder)
        .await
        .map_err(|e| AppError::file_read_failed(input_folder.display().to_string(), e))?;
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if !path.is_dir() {
            continue;
        }
        let name = entry.file_name().to_string_lossy().to_string();
        match DocumentKind::from_folder_name(&name) {
            Some(kind) => {
                let order = DocumentKind::ALL.iter().position(|k| *k == kind).unwrap_or(usize::MAX);
                folders.push((order, kind, path));
            }
            None => debug!("跳过无法识别的目录: {}", path.display()),
        }
    }
    folders.sort_by(|a, b| (a.0, &a.2).cmp(&(b.0, &b.2)));

    let mut documents = Vec::new();
    for (_, kind, folder) in folders {
        let mut files = list_files(&folder).await?;
        files.sort();

        for path in files {
            let index = documents.len() + 1;
            documents.push(DocumentCtx::new(index, kind, path));
        }
    }

    Ok(documents)
}

async fn list_files(folder: &Path) -> AppResult<Vec<PathBuf>> {
    let mut entries = tokio::fs::read_dir(folder)
        .await
        .map_err(|e| AppError::file_read_failed(folder.display().to_string(), e))?;

    let mut files = Vec::new();
    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        let is_hidden = path
            .file_name()
            .map(|n| n.to_string_lossy().starts_with('.'))
            .unwrap_or(true);
        if path.is_file() && !is_hidden {
            files.push(path);
        }
    }

    Ok(files)
}

/// 处理统计
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ProcessingStats {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

/// 批次处理结果
#[derive(Debug, Default)]
struct BatchResult {
    success: usize,
    failed: usize,
}
