//! 页面获取接口 (Page Fetcher)

use async_trait::async_trait;

use crate::core::error::Result;

/// 单次 HTTP GET，返回完整响应正文
///
/// 非 200 状态码一律视为失败，不重试、不限速。
#[async_trait]
pub trait PageFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String>;
}
