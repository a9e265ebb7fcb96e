//! 测试用的脚本化获取器

use std::collections::HashMap;

use async_trait::async_trait;
use parking_lot::Mutex;

use crate::core::error::{NovelError, Result};
use crate::interfaces::PageFetcher;

/// 按 URL 返回预置正文，未登记的 URL 返回 404
#[derive(Default)]
pub struct ScriptedFetcher {
    pages: HashMap<String, std::result::Result<String, u16>>,
    requested: Mutex<Vec<String>>,
}

impl ScriptedFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, body: &str) -> Self {
        self.pages.insert(url.to_string(), Ok(body.to_string()));
        self
    }

    pub fn status(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }

    /// 按请求顺序返回已请求的 URL
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

#[async_trait]
impl PageFetcher for ScriptedFetcher {
    async fn fetch(&self, url: &str) -> Result<String> {
        self.requested.lock().push(url.to_string());
        match self.pages.get(url) {
            Some(Ok(body)) => Ok(body.clone()),
            Some(Err(status)) => Err(NovelError::HttpStatus {
                url: url.to_string(),
                status: *status,
            }),
            None => Err(NovelError::HttpStatus {
                url: url.to_string(),
                status: 404,
            }),
        }
    }
}
