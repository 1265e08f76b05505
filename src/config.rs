/// 程序配置
use crate::error::{AppResult, ConfigError, FileError};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Clone, Debug)]
pub struct Config {
    /// REST API 基础地址
    pub api_base_url: String,
    /// 每个请求的超时时间（秒）
    pub request_timeout_secs: u64,
    /// 列表每页条数
    pub items_per_page: usize,
    /// SIMULACRO 考试拉取"意向学员"时使用的页大小
    pub interested_pool_limit: usize,
    /// 草稿目录（替代浏览器 sessionStorage）
    pub draft_dir: PathBuf,
    /// 是否显示详细日志
    pub verbose_logging: bool,
    /// 日志过滤器
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_base_url: "http://localhost:3000".to_string(),
            request_timeout_secs: 10,
            items_per_page: 7,
            interested_pool_limit: 500,
            draft_dir: PathBuf::from(".academy_drafts"),
            verbose_logging: false,
            log_filter: "info".to_string(),
        }
    }
}

/// 配置文件中的字段全部可选，缺省时回退到默认值
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    api_base_url: Option<String>,
    request_timeout_secs: Option<u64>,
    items_per_page: Option<usize>,
    interested_pool_limit: Option<usize>,
    draft_dir: Option<PathBuf>,
    verbose_logging: Option<bool>,
    log_filter: Option<String>,
}

impl Config {
    /// 只从环境变量读取
    pub fn from_env() -> AppResult<Self> {
        Self::default().with_env_overrides()
    }

    /// 读取 TOML 配置文件，再叠加环境变量
    pub fn load(path: &Path) -> AppResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| FileError::ReadFailed {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content, &path.display().to_string())?.with_env_overrides()
    }

    fn from_toml_str(content: &str, origin: &str) -> AppResult<Self> {
        let file: ConfigFile = toml::from_str(content).map_err(|e| ConfigError::InvalidFile {
            path: origin.to_string(),
            reason: e.to_string(),
        })?;
        let default = Self::default();
        Ok(Self {
            api_base_url: file.api_base_url.unwrap_or(default.api_base_url),
            request_timeout_secs: file
                .request_timeout_secs
                .unwrap_or(default.request_timeout_secs),
            items_per_page: file.items_per_page.unwrap_or(default.items_per_page),
            interested_pool_limit: file
                .interested_pool_limit
                .unwrap_or(default.interested_pool_limit),
            draft_dir: file.draft_dir.unwrap_or(default.draft_dir),
            verbose_logging: file.verbose_logging.unwrap_or(default.verbose_logging),
            log_filter: file.log_filter.unwrap_or(default.log_filter),
        })
    }

    fn with_env_overrides(self) -> AppResult<Self> {
        Ok(Self {
            api_base_url: std::env::var("ACADEMY_API_URL").unwrap_or(self.api_base_url),
            request_timeout_secs: env_parse("ACADEMY_REQUEST_TIMEOUT_SECS", "u64")?
                .unwrap_or(self.request_timeout_secs),
            items_per_page: env_parse("ACADEMY_ITEMS_PER_PAGE", "usize")?
                .unwrap_or(self.items_per_page),
            interested_pool_limit: env_parse("ACADEMY_INTERESTED_POOL_LIMIT", "usize")?
                .unwrap_or(self.interested_pool_limit),
            draft_dir: std::env::var("ACADEMY_DRAFT_DIR")
                .map(PathBuf::from)
                .unwrap_or(self.draft_dir),
            verbose_logging: env_parse("ACADEMY_VERBOSE", "bool")?.unwrap_or(self.verbose_logging),
            log_filter: std::env::var("RUST_LOG").unwrap_or(self.log_filter),
        })
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn env_parse<T: std::str::FromStr>(var_name: &str, expected_type: &str) -> AppResult<Option<T>> {
    match std::env::var(var_name) {
        Ok(value) => value.trim().parse::<T>().map(Some).map_err(|_| {
            ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }
            .into()
        }),
        Err(_) => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_timeout_is_ten_seconds() {
        let config = Config::default();
        assert_eq!(config.request_timeout(), Duration::from_secs(10));
        assert_eq!(config.items_per_page, 7);
    }

    #[test]
    fn test_partial_toml_falls_back_to_defaults() {
        let config = Config::from_toml_str(
            r#"
            api_base_url = "https://api.academia.pe"
            items_per_page = 10
            "#,
            "inline",
        )
        .unwrap();

        assert_eq!(config.api_base_url, "https://api.academia.pe");
        assert_eq!(config.items_per_page, 10);
        assert_eq!(config.request_timeout_secs, 10);
        assert_eq!(config.interested_pool_limit, 500);
    }

    #[test]
    fn test_unknown_key_is_rejected() {
        let err = Config::from_toml_str("api_url = \"x\"", "inline").unwrap_err();
        assert!(matches!(
            err,
            crate::error::AppError::Config(ConfigError::InvalidFile { .. })
        ));
    }
}
