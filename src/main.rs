use academy_admin::utils::logging;
use academy_admin::{App, Config};
use anyhow::{Context, Result};
use std::path::PathBuf;

#[tokio::main]
async fn main() -> Result<()> {
    // 加载配置：ACADEMY_CONFIG 指定文件时读文件，否则只读环境变量
    let config = match std::env::var("ACADEMY_CONFIG") {
        Ok(path) => {
            let path = PathBuf::from(path);
            Config::load(&path).with_context(|| format!("无法加载配置: {}", path.display()))?
        }
        Err(_) => Config::from_env().context("无法读取环境变量配置")?,
    };

    // 初始化日志
    logging::init(&config);

    // 初始化并运行应用
    App::initialize(config).await?.run().await?;

    Ok(())
}
