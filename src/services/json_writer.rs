//! 结果持久化服务 - 业务能力层
//!
//! 只负责"把记录数组写成带时间戳的 JSON 文件"能力

use serde::Serialize;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::debug;

use crate::error::{AppError, AppResult};

/// JSON 结果写入服务
pub struct JsonWriter {
    output_dir: PathBuf,
}

impl JsonWriter {
    /// 创建新的写入服务
    pub fn new(output_dir: impl Into<PathBuf>) -> Self {
        Self {
            output_dir: output_dir.into(),
        }
    }

    /// 写入 JSON 数组
    ///
    /// # 参数
    /// - `data`: 要写入的记录
    /// - `source_name`: 原始文件名（取其主干作为输出文件名前缀）
    ///
    /// # 返回
    /// 返回写入的文件路径：`<output_dir>/<stem>_<YYYYmmdd_HHMMSS>.json`
    pub async fn write<T: Serialize>(&self, data: &T, source_name: &str) -> AppResult<PathBuf> {
        fs::create_dir_all(&self.output_dir)
            .await
            .map_err(|e| AppError::file_write_failed(self.output_dir.display().to_string(), e))?;

        let output_path = self.output_dir.join(output_file_name(
            source_name,
            &chrono::Local::now().format("%Y%m%d_%H%M%S").to_string(),
        ));

        let json = serde_json::to_string_pretty(data)
            .map_err(|e| AppError::file_write_failed(output_path.display().to_string(), e))?;
        fs::write(&output_path, json)
            .await
            .map_err(|e| AppError::file_write_failed(output_path.display().to_string(), e))?;

        debug!("结果已写入: {}", output_path.display());
        Ok(output_path)
    }
}

fn output_file_name(source_name: &str, timestamp: &str) -> String {
    let stem = Path::new(source_name)
        .file_stem()
        .map(|s| s.to_string_lossy().to_string())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "output".to_string());
    format!("{}_{}.json", stem, timestamp)
}
