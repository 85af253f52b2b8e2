//! 单个文档处理器 - 编排层
//!
//! ## 职责
//!
//! 本模块负责处理单个文档，是文档级别的编排器。
//!
//! ## 核心功能
//!
//! 1. **流程调度**：委托 `DocumentFlow` 完成读取、提取、写入
//! 2. **失败兜底**：失败原因写入 warn.txt
//! 3. **文件清理**：无论成功失败都删除已处理的输入文件
//! 4. **日志记录**：把结果追加到运行日志

use std::path::Path;

use anyhow::{Context, Result};
use tracing::{error, info, warn};

use crate::config::Config;
use crate::error::AppError;
use crate::services::WarnWriter;
use crate::utils::logging;
use crate::workflow::{DocumentCtx, DocumentFlow};

/// 处理单个文档
///
/// # 参数
/// - `flow`: 文档处理流程
/// - `warn_writer`: 警告写入服务
/// - `ctx`: 文档上下文
/// - `config`: 配置
///
/// # 返回
/// 返回是否成功处理
pub async fn process_document(
    flow: &DocumentFlow,
    warn_writer: &WarnWriter,
    ctx: &DocumentCtx,
    config: &Config,
) -> Result<bool> {
    let index = ctx.document_index;

    let succeeded = match flow.run(ctx).await {
        Ok(outcome) => {
            info!(
                "[文档 {}] ✅ {}，共 {} 条，已写入: {}",
                index,
                outcome.message,
                outcome.record_count(),
                outcome.json_path
            );
            record_in_log(
                config,
                &format!("{} ✓ {} -> {}", ctx, outcome.message, outcome.json_path),
            );
            true
        }
        Err(e) => {
            report_failure(warn_writer, ctx, &e).await;
            record_in_log(config, &format!("{} ✗ {}", ctx, e));
            false
        }
    };

    // 删除失败只记录，不改变处理结果
    if config.delete_processed_inputs {
        if let Err(e) = cleanup_file(&ctx.path, index) {
            error!("[文档 {}] ❌ 清理文件失败: {:#}", index, e);
            write_warn(warn_writer, ctx, &format!("{:#}", e)).await;
        }
    }

    Ok(succeeded)
}

async fn report_failure(warn_writer: &WarnWriter, ctx: &DocumentCtx, err: &AppError) {
    if err.is_empty_result() {
        warn!("[文档 {}] ⚠️ {}", ctx.document_index, err);
    } else {
        error!("[文档 {}] ❌ 处理失败: {}", ctx.document_index, err);
    }

    write_warn(warn_writer, ctx, &err.to_string()).await;
}

async fn write_warn(warn_writer: &WarnWriter, ctx: &DocumentCtx, reason: &str) {
    if let Err(write_err) = warn_writer
        .write(&ctx.file_name(), ctx.kind.label(), reason)
        .await
    {
        error!(
            "[文档 {}] 写入警告文件失败: {}",
            ctx.document_index, write_err
        );
    }
}

fn record_in_log(config: &Config, line: &str) {
    if let Err(e) = logging::append_log_line(&config.output_log_file, line) {
        warn!("⚠️ 无法写入运行日志: {}", e);
    }
}

/// 清理已处理的文件
fn cleanup_file(file_path: &Path, document_index: usize) -> Result<()> {
    info!("[文档 {}] 🗑️ 清理已处理的文件...", document_index);

    if file_path.exists() {
        std::fs::remove_file(file_path)
            .map_err(|e| AppError::file_delete_failed(file_path.display().to_string(), e))
            .with_context(|| format!("无法删除文件: {}", file_path.display()))?;
        info!(
            "[文档 {}] ✓ 文件已删除: {}",
            document_index,
            file_path.file_name().unwrap_or_default().to_string_lossy()
        );
    } else {
        warn!(
            "[文档 {}] ⚠️ 文件不存在: {}",
            document_index,
            file_path.display()
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Pipeline;
    use crate::workflow::DocumentKind;

    #[tokio::test]
    async fn test_failed_document_is_warned_and_removed() {
        let dir = std::env::temp_dir().join(format!("marksheet-proc-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        std::fs::create_dir_all(&dir).unwrap();

        let input = dir.join("empty.txt");
        std::fs::write(&input, "no codes here").unwrap();
        let warn_path = dir.join("warn.txt");

        let config = Config {
            output_folder: dir.join("out").display().to_string(),
            output_log_file: dir.join("output.txt").display().to_string(),
            warn_file: warn_path.display().to_string(),
            ..Config::default()
        };
        let flow = DocumentFlow::new(&config);
        let warn_writer = WarnWriter::with_path(config.warn_file.clone());
        let ctx = DocumentCtx::new(1, DocumentKind::Marks(Pipeline::Ca), &input);

        let ok = process_document(&flow, &warn_writer, &ctx, &config).await.unwrap();

        assert!(!ok);
        assert!(!input.exists());
        let warned = std::fs::read_to_string(&warn_path).unwrap();
        assert!(warned.contains("empty.txt"));
        assert!(warned.contains("CA"));

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[tokio::test]
    async fn test_cleanup_failure_is_warned_not_propagated() {
        let dir = std::env::temp_dir().join(format!("marksheet-cleanup-{}", std::process::id()));
        let _ = std::fs::remove_dir_all(&dir);
        // 目录无法用 remove_file 删除
        let input = dir.join("folder.txt");
        std::fs::create_dir_all(&input).unwrap();
        let warn_path = dir.join("warn.txt");

        let config = Config {
            output_folder: dir.join("out").display().to_string(),
            output_log_file: dir.join("output.txt").display().to_string(),
            warn_file: warn_path.display().to_string(),
            ..Config::default()
        };
        let flow = DocumentFlow::new(&config);
        let warn_writer = WarnWriter::with_path(config.warn_file.clone());
        let ctx = DocumentCtx::new(4, DocumentKind::Marks(Pipeline::Pca), &input);

        let result = process_document(&flow, &warn_writer, &ctx, &config).await;

        assert!(matches!(result, Ok(false)));
        let warned = std::fs::read_to_string(&warn_path).unwrap();
        assert!(warned.contains("无法删除文件"));
        assert!(input.exists());

        let _ = std::fs::remove_dir_all(&dir);
    }

    #[test]
    fn test_cleanup_file_reports_delete_error() {
        let dir = std::env::temp_dir().join(format!("marksheet-cleanup-dir-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();

        let err = cleanup_file(&dir, 1).unwrap_err();
        assert!(format!("{:#}", err).contains("删除文件失败"));

        let _ = std::fs::remove_dir_all(&dir);
    }
}
