// src/config.rs

pub mod file;

use self::file::load_or_create_external_config;
use crate::{cli::Cli, constants, error::AppResult};
use serde::{Deserialize, Serialize};
use std::time::Duration;

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct NetworkConfig {
    pub user_agent: Option<String>,
    pub connect_timeout_secs: Option<u64>,
    pub timeout_secs: Option<u64>,
    /// 仅作用于页面抓取，媒体信息请求从不重试
    pub page_max_retries: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExternalConfig {
    #[serde(default)]
    pub network: NetworkConfig,
    #[serde(default)]
    pub max_workers: Option<usize>,
}

impl ExternalConfig {
    pub(crate) fn default_app_config() -> Self {
        // 为 NetworkConfig 提供一组稳健的默认值
        let network_config = NetworkConfig {
            user_agent: Some(constants::USER_AGENT.into()),
            connect_timeout_secs: Some(10),
            timeout_secs: Some(30),
            page_max_retries: Some(2),
        };

        Self {
            network: network_config,
            max_workers: Some(constants::DEFAULT_MAX_WORKERS),
        }
    }
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub max_workers: usize,
    pub user_agent: String,
    pub connect_timeout: Duration,
    pub timeout: Duration,
    pub page_max_retries: u32,
}

impl AppConfig {
    pub fn new(args: &Cli) -> AppResult<Self> {
        let external_config = load_or_create_external_config()?;
        Ok(Self::from_external(external_config, args.workers))
    }

    /// 合并配置文件与命令行参数，命令行参数优先
    pub fn from_external(external: ExternalConfig, cli_workers: Option<usize>) -> Self {
        let network = external.network;
        Self {
            max_workers: cli_workers
                .or(external.max_workers)
                .unwrap_or(constants::DEFAULT_MAX_WORKERS)
                .max(1),
            user_agent: network
                .user_agent
                .unwrap_or_else(|| constants::USER_AGENT.into()),
            connect_timeout: Duration::from_secs(network.connect_timeout_secs.unwrap_or(10)),
            timeout: Duration::from_secs(network.timeout_secs.unwrap_or(30)),
            page_max_retries: network.page_max_retries.unwrap_or(2),
        }
    }
}

#[cfg(any(test, feature = "testing"))]
impl Default for AppConfig {
    fn default() -> Self {
        Self {
            max_workers: 2,
            user_agent: "test-agent/1.0".to_string(),
            connect_timeout: Duration::from_secs(5),
            timeout: Duration::from_secs(15),
            page_max_retries: 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_workers_override_file() {
        let external = ExternalConfig::default_app_config();
        let config = AppConfig::from_external(external.clone(), Some(8));
        assert_eq!(config.max_workers, 8);

        let config = AppConfig::from_external(external, None);
        assert_eq!(config.max_workers, constants::DEFAULT_MAX_WORKERS);
    }

    #[test]
    fn test_partial_config_file_falls_back_to_defaults() {
        let external: ExternalConfig =
            serde_json::from_str(r#"{"network": {"timeout_secs": 5}}"#).unwrap();
        let config = AppConfig::from_external(external, Some(0));
        assert_eq!(config.timeout, Duration::from_secs(5));
        assert_eq!(config.connect_timeout, Duration::from_secs(10));
        assert_eq!(config.user_agent, constants::USER_AGENT);
        // 并发数至少为 1
        assert_eq!(config.max_workers, 1);
    }
}
