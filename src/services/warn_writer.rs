//! 警告写入服务 - 业务能力层
//!
//! 只负责"写 warn.txt"能力，不关心流程

use anyhow::Result;
use tokio::fs::OpenOptions;
use tokio::io::AsyncWriteExt;
use tracing::debug;

/// 警告写入服务
///
/// 职责：
/// - 将处理失败或没有提取出数据的文档写入 warn.txt
/// - 每次只写一个文档
pub struct WarnWriter {
    warn_file_path: String,
}

impl WarnWriter {
    /// 创建新的警告写入服务
    pub fn new() -> Self {
        Self {
            warn_file_path: "warn.txt".to_string(),
        }
    }

    /// 使用自定义文件路径创建
    pub fn with_path(path: impl Into<String>) -> Self {
        Self {
            warn_file_path: path.into(),
        }
    }

    /// 写入警告信息
    ///
    /// # 参数
    /// - `document`: 文档名
    /// - `kind`: 文档类型（CA / PCA / SEMESTER）
    /// - `reason`: 失败原因
    pub async fn write(&self, document: &str, kind: &str, reason: &str) -> Result<()> {
        debug!("写入警告: 文档 {} | 类型 {} | 原因: {}", document, kind, reason);

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.warn_file_path)
            .await?;

        let warn_msg = format!(
            "{} | 文档 {} | 类型 {} | 原因: {}\n",
            chrono::Local::now().format("%Y-%m-%d %H:%M:%S"),
            document,
            kind,
            reason
        );

        file.write_all(warn_msg.as_bytes()).await?;
        file.flush().await?;

        Ok(())
    }
}

impl Default for WarnWriter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_appends_lines() {
        let path = std::env::temp_dir().join(format!("marksheet-warn-{}.txt", std::process::id()));
        let _ = std::fs::remove_file(&path);
        let writer = WarnWriter::with_path(path.to_string_lossy().to_string());

        writer.write("a.txt", "CA", "没有记录").await.unwrap();
        writer.write("b.html", "PCA", "没有表格").await.unwrap();

        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 2);
        assert!(content.contains("文档 b.html | 类型 PCA"));

        let _ = std::fs::remove_file(&path);
    }
}
