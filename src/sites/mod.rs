use std::collections::HashMap;
use std::sync::Arc;

use scraper::Html;
use strum::{EnumIter, IntoEnumIterator, IntoStaticStr};
use tracing::debug;
use url::Url;

use crate::core::error::{NovelError, Result};
use crate::interfaces::{NovelSite, PageFetcher};

pub mod kakuyomu;
pub mod syosetu;

/// 支持的站点，序列化为其主机名
#[derive(Debug, Clone, Copy, PartialEq, Eq, EnumIter, IntoStaticStr)]
pub enum SiteKind {
    #[strum(serialize = "ncode.syosetu.com")]
    Syosetu,
    #[strum(serialize = "kakuyomu.jp")]
    Kakuyomu,
}

impl SiteKind {
    pub fn host(self) -> &'static str {
        self.into()
    }

    fn build(
        self,
        link: &str,
        index: Html,
        fetcher: Arc<dyn PageFetcher>,
    ) -> Result<Box<dyn NovelSite>> {
        match self {
            SiteKind::Syosetu => Ok(Box::new(syosetu::Syosetu::new(link, index, fetcher))),
            SiteKind::Kakuyomu => Ok(Box::new(kakuyomu::Kakuyomu::new(link, &index)?)),
        }
    }
}

/// 已绑定目录页的站点实例
pub struct OpenedSite {
    /// 规范化后的作品地址
    pub link: String,
    pub site: Box<dyn NovelSite>,
}

// ============================================================================
// 站点注册表
// ============================================================================

type SiteFactory =
    Box<dyn Fn(&str, Html, Arc<dyn PageFetcher>) -> Result<Box<dyn NovelSite>> + Send + Sync>;

/// 按主机名分派的站点工厂表
pub struct SiteRegistry {
    factories: HashMap<String, SiteFactory>,
}

impl SiteRegistry {
    pub fn new() -> Self {
        let mut registry = Self {
            factories: HashMap::new(),
        };
        for kind in SiteKind::iter() {
            registry.register(kind.host(), move |link, index, fetcher| {
                kind.build(link, index, fetcher)
            });
        }
        registry
    }

    pub fn register<F>(&mut self, host: &str, factory: F)
    where
        F: Fn(&str, Html, Arc<dyn PageFetcher>) -> Result<Box<dyn NovelSite>>
            + Send
            + Sync
            + 'static,
    {
        self.factories.insert(host.to_string(), Box::new(factory));
    }

    pub fn list(&self) -> Vec<&str> {
        self.factories.keys().map(|s| s.as_str()).collect()
    }

    /// 解析地址、按主机选择站点、获取目录页并构造站点实例
    pub async fn open(&self, raw: &str, fetcher: Arc<dyn PageFetcher>) -> Result<OpenedSite> {
        let url = Url::parse(raw)?;
        let host = url.host_str().unwrap_or_default();
        let factory = self
            .factories
            .get(host)
            .ok_or_else(|| NovelError::UnsupportedHost(host.to_string()))?;

        let link = url.as_str().to_string();
        debug!("站点 {} 获取目录页 {}", host, link);
        let body = fetcher.fetch(&link).await?;
        let index = Html::parse_document(&body);

        let site = factory(&link, index, fetcher)?;
        Ok(OpenedSite { link, site })
    }
}

impl Default for SiteRegistry {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::error::ErrorKind;
    use crate::network::testing::ScriptedFetcher;

    async fn open_err(url: &str, fetcher: ScriptedFetcher) -> ErrorKind {
        match SiteRegistry::new().open(url, Arc::new(fetcher)).await {
            Ok(_) => panic!("expected {} to fail", url),
            Err(e) => e.kind(),
        }
    }

    #[test]
    fn registry_knows_both_hosts() {
        let registry = SiteRegistry::new();
        let mut hosts = registry.list();
        hosts.sort_unstable();
        assert_eq!(hosts, ["kakuyomu.jp", "ncode.syosetu.com"]);
    }

    #[tokio::test]
    async fn unknown_host_is_rejected_before_fetching() {
        let fetcher = Arc::new(ScriptedFetcher::new());
        let result = SiteRegistry::new()
            .open("https://example.com/n0001xy/", fetcher.clone())
            .await;
        assert_eq!(result.err().map(|e| e.kind()), Some(ErrorKind::UnsupportedHost));
        assert!(fetcher.requested().is_empty());
    }

    #[tokio::test]
    async fn malformed_url_is_input_error() {
        assert_eq!(open_err("http://%zz", ScriptedFetcher::new()).await, ErrorKind::Input);
    }

    #[tokio::test]
    async fn failed_index_fetch_is_reported() {
        let url = "https://ncode.syosetu.com/n0001xy/";
        let fetcher = ScriptedFetcher::new().status(url, 503);
        assert_eq!(open_err(url, fetcher).await, ErrorKind::HttpStatus);
    }

    #[tokio::test]
    async fn syosetu_is_bound_to_fetched_index() {
        let url = "https://ncode.syosetu.com/n0001xy/";
        let fetcher = ScriptedFetcher::new().page(url, r#"<p class="novel_title">Foo</p>"#);
        let opened = SiteRegistry::new().open(url, Arc::new(fetcher)).await.unwrap();
        assert_eq!(opened.link, url);
        assert_eq!(opened.site.id(), "syosetu");
        assert_eq!(opened.site.title().unwrap(), "Foo");
    }

    #[tokio::test]
    async fn kakuyomu_without_state_fails_construction() {
        let url = "https://kakuyomu.jp/works/1234567";
        let fetcher = ScriptedFetcher::new().page(url, "<html><body></body></html>");
        assert_eq!(open_err(url, fetcher).await, ErrorKind::Parse);
    }
}
