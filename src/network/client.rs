//! HTTP 页面获取器 (HTTP Page Fetcher)
//!
//! 固定浏览器 User-Agent 的 reqwest 客户端封装，附带状态码闸门。

use async_trait::async_trait;
use reqwest::StatusCode;
use reqwest::header::{HeaderMap, HeaderValue, USER_AGENT};
use tracing::debug;

use crate::core::config::AppConfig;
use crate::core::error::{NovelError, Result};
use crate::interfaces::PageFetcher;

/// 基于 reqwest 的页面获取器
#[derive(Clone)]
pub struct HttpFetcher {
    client: reqwest::Client,
}

impl HttpFetcher {
    /// 按配置构建底层客户端
    pub fn new(config: &AppConfig) -> Result<Self> {
        let ua = HeaderValue::from_str(&config.user_agent).map_err(|e| {
            NovelError::Config(config::ConfigError::Message(format!(
                "invalid user_agent: {}",
                e
            )))
        })?;

        let mut headers = HeaderMap::new();
        headers.insert(USER_AGENT, ua);

        let mut builder = reqwest::Client::builder().default_headers(headers);
        if let Some(timeout) = config.connect_timeout() {
            builder = builder.connect_timeout(timeout);
        }
        if let Some(timeout) = config.timeout() {
            builder = builder.timeout(timeout);
        }

        let client = builder.build().map_err(NovelError::Network)?;
        Ok(Self { client })
    }
}

#[async_trait]
impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        debug!("GET {}", url);
        let resp = self.client.get(url).send().await?;

        let status = resp.status();
        if status != StatusCode::OK {
            // 丢弃响应即关闭连接上的正文流
            drop(resp);
            return Err(NovelError::HttpStatus {
                url: url.to_string(),
                status: status.as_u16(),
            });
        }

        Ok(resp.text().await?)
    }
}
