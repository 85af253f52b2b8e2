use std::path::Path;
use std::str::FromStr;

use serde::Deserialize;
use tracing::warn;

use crate::error::{AppError, AppResult, ConfigError, FileError};

/// 程序配置文件
#[derive(Clone, Debug, Deserialize)]
#[serde(default)]
pub struct Config {
    /// 待处理文档目录（其下包含 ca/、pca/、semester/ 子目录）
    pub input_folder: String,
    /// JSON 结果输出目录
    pub output_folder: String,
    /// 同时处理的文档数量
    pub max_concurrent_documents: usize,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 输出日志文件
    pub output_log_file: String,
    /// 处理失败的文档记录文件
    pub warn_file: String,
    /// 处理完成（无论成功失败）后是否删除输入文件
    pub delete_processed_inputs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            input_folder: "uploads".to_string(),
            output_folder: "processed_data".to_string(),
            max_concurrent_documents: 4,
            verbose_logging: false,
            output_log_file: "output.txt".to_string(),
            warn_file: "warn.txt".to_string(),
            delete_processed_inputs: true,
        }
    }
}

impl Config {
    /// 从 TOML 文件加载配置，缺省的键使用默认值
    pub fn from_toml_file(path: &Path) -> AppResult<Self> {
        if !path.exists() {
            return Err(FileError::NotFound {
                path: path.display().to_string(),
            }
            .into());
        }

        let content = std::fs::read_to_string(path)
            .map_err(|e| AppError::file_read_failed(path.display().to_string(), e))?;

        let config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::TomlParseFailed {
                path: path.display().to_string(),
                source,
            })?;

        Ok(config)
    }

    /// 用环境变量覆盖当前配置
    pub fn with_env_overrides(self) -> Self {
        Self {
            input_folder: std::env::var("INPUT_FOLDER").unwrap_or(self.input_folder),
            output_folder: std::env::var("OUTPUT_FOLDER").unwrap_or(self.output_folder),
            max_concurrent_documents: env_parse("MAX_CONCURRENT_DOCUMENTS", "usize", self.max_concurrent_documents),
            verbose_logging: env_parse("VERBOSE_LOGGING", "bool", self.verbose_logging),
            output_log_file: std::env::var("OUTPUT_LOG_FILE").unwrap_or(self.output_log_file),
            warn_file: std::env::var("WARN_FILE").unwrap_or(self.warn_file),
            delete_processed_inputs: env_parse("DELETE_PROCESSED_INPUTS", "bool", self.delete_processed_inputs),
        }
    }

    /// 并发数至少为 1
    pub fn concurrency(&self) -> usize {
        self.max_concurrent_documents.max(1)
    }
}

/// 读取并解析环境变量，解析失败时保留原值并给出警告
fn env_parse<T: FromStr>(var_name: &str, expected_type: &str, current: T) -> T {
    let Ok(value) = std::env::var(var_name) else {
        return current;
    };
    match value.trim().parse() {
        Ok(parsed) => parsed,
        Err(_) => {
            let err = ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            };
            warn!("⚠️ {}，使用原值", err);
            current
        }
    }
}
