use std::path::PathBuf;

use anyhow::Result;
use marksheet_extract::utils::logging;
use marksheet_extract::{App, Config};

const DEFAULT_CONFIG_FILE: &str = "marksheet.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置：TOML 文件（如果存在）+ 环境变量覆盖
    let config = load_config()?;

    // 初始化日志
    logging::init(config.verbose_logging);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}

fn load_config() -> Result<Config> {
    let path = std::env::var("MARKSHEET_CONFIG")
        .map(PathBuf::from)
        .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

    let config = if path.exists() {
        Config::from_toml_file(&path)?
    } else {
        Config::default()
    };

    Ok(config.with_env_overrides())
}
