//! 小説家になろう (ncode.syosetu.com) 站点模块
//!
//! 服务端渲染的目录页，按 DOM 类名抓取；目录超过一页时带有分页器。

mod selectors;
mod toc;

use std::sync::Arc;

use async_trait::async_trait;
use scraper::Html;
use tracing::{info, warn};

use crate::core::error::{NovelError, Result};
use crate::core::model::Section;
use crate::interfaces::{NovelSite, PageFetcher};
use crate::utils::Sanitizer;

pub use self::selectors::SiteSelectors;
pub use self::toc::{IndexPager, TocAssembler, TocEntry, normalize_link, parse_index_page};

/// 作者栏中标签与作者名之间的全角冒号
const AUTHOR_SEPARATOR: char = '：';

/// 小説家になろう 站点实现
pub struct Syosetu {
    link: String,
    index: Html,
    fetcher: Arc<dyn PageFetcher>,
    sanitizer: Sanitizer,
}

impl Syosetu {
    /// 绑定到目录页文档与获取器
    pub fn new(link: impl Into<String>, index: Html, fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            link: link.into(),
            index,
            fetcher,
            sanitizer: Sanitizer::new()
                .strip_attrs("p")
                .drop_rp()
                .unwrap_class(".ruby-wrap"),
        }
    }

    fn is_paginated(&self) -> bool {
        self.index
            .select(&SiteSelectors::get().pager)
            .next()
            .is_some()
    }
}

#[async_trait(?Send)]
impl NovelSite for Syosetu {
    fn id(&self) -> &'static str {
        "syosetu"
    }

    fn title(&self) -> Result<String> {
        let s = SiteSelectors::get();
        self.index
            .select(&s.novel_title)
            .next()
            .map(|el| el.text().collect())
            .ok_or_else(|| NovelError::parse("novel_title element not found"))
    }

    fn author(&self) -> Result<String> {
        let s = SiteSelectors::get();
        let writer = self
            .index
            .select(&s.writer_name)
            .next()
            .ok_or_else(|| NovelError::parse("novel_writername element not found"))?;

        if let Some(anchor) = writer.select(&s.anchor).next() {
            return Ok(anchor.text().collect());
        }

        let text: String = writer.text().collect();
        let trimmed = text.trim_matches(|c| c == ' ' || c == '\n');
        match trimmed.split_once(AUTHOR_SEPARATOR) {
            Some((_, name)) => Ok(name.to_string()),
            None => {
                warn!("作者栏缺少分隔符，按原文返回: {}", trimmed);
                Ok(trimmed.to_string())
            }
        }
    }

    async fn toc(&self) -> Result<Vec<Section>> {
        let mut assembler = TocAssembler::default();
        let mut entries = parse_index_page(&self.index);

        if !self.is_paginated() {
            assembler.extend(entries);
            return Ok(assembler.finish());
        }

        let mut pager = IndexPager::new(&self.link, self.fetcher.as_ref());
        while !entries.is_empty() {
            assembler.extend(entries);
            entries = pager.next_page().await;
        }

        let sections = assembler.finish();
        info!("分页目录解析完成，共 {} 卷", sections.len());
        Ok(sections)
    }

    fn chapter_body(&self, doc: &Html) -> Result<String> {
        let s = SiteSelectors::get();
        let body = doc
            .select(&s.honbun)
            .next()
            .ok_or_else(|| NovelError::parse("novel_honbun element not found"))?;
        self.sanitizer.inner_markup(body)
    }
}
