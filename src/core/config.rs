//! 配置管理系统 (Configuration Management)
//!
//! 负责 `config.toml` 与 `NOVEL_*` 环境变量的反序列化，缺省字段回退到默认值。

use std::path::Path;
use std::time::Duration;

use bon::Builder;
use config::{Config, Environment, File};
use serde::Deserialize;

use crate::core::error::{NovelError, Result};

/// 桌面版 Chromium (Windows) 的 User-Agent
pub const DEFAULT_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/97.0.4692.99 Safari/537.36";

/// 全局应用配置
#[derive(Debug, Deserialize, Builder, Clone)]
pub struct AppConfig {
    /// 请求头 User-Agent，两个站点都会拒绝默认客户端标识
    #[serde(default = "default_user_agent")]
    #[builder(default = default_user_agent())]
    pub user_agent: String,

    /// 章节与记录的输出根目录
    #[serde(default = "default_output_dir")]
    #[builder(default = default_output_dir())]
    pub output_dir: String,

    /// 建立连接超时 (秒)
    pub connect_timeout_secs: Option<u64>,

    /// 整体请求超时 (秒)
    pub timeout_secs: Option<u64>,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}
fn default_output_dir() -> String {
    "novels".to_string()
}

impl AppConfig {
    /// 从工作目录的 `config.toml` 与环境变量加载配置
    pub fn load() -> Result<Self> {
        Self::load_from(Path::new("config.toml"))
    }

    pub fn load_from(config_path: &Path) -> Result<Self> {
        let builder = Config::builder();

        let builder = if config_path.exists() {
            builder.add_source(File::from(config_path))
        } else {
            builder
        };

        let settings = builder
            .add_source(Environment::with_prefix("NOVEL"))
            .build()
            .map_err(NovelError::Config)?;
        settings.try_deserialize().map_err(NovelError::Config)
    }

    pub fn connect_timeout(&self) -> Option<Duration> {
        self.connect_timeout_secs.map(Duration::from_secs)
    }

    pub fn timeout(&self) -> Option<Duration> {
        self.timeout_secs.map(Duration::from_secs)
    }
}
