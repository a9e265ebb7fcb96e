//! 小説家になろう 目录解析
//!
//! 目录页被拆成按文档顺序排列的条目流 (卷标题 / 章节)，跨页拼接后再折叠成卷列表。

use scraper::{ElementRef, Html};
use tracing::{debug, warn};

use crate::core::model::{Chapter, Section, Timestamp};
use crate::interfaces::PageFetcher;
use crate::utils::char_prefix;

use super::SiteSelectors;

/// 目录时间格式 `YYYY/MM/DD HH:MM`
const TIME_LAYOUT: &str = "%Y/%m/%d %H:%M";
/// 时间戳取前 17 个字符
const STAMP_CHARS: usize = 17;

/// 目录条目
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TocEntry {
    /// `.chapter_title`，开启新卷
    Section(String),
    Chapter(Chapter),
}

/// 解析单个目录页 `.index_box` 的直接子元素
///
/// 页面缺少 `.index_box` 或其为空时返回空列表。
pub fn parse_index_page(doc: &Html) -> Vec<TocEntry> {
    let s = SiteSelectors::get();
    let Some(index_box) = doc.select(&s.index_box).next() else {
        return Vec::new();
    };

    index_box
        .children()
        .filter_map(ElementRef::wrap)
        .filter_map(|child| {
            if s.chapter_title.matches(&child) {
                Some(TocEntry::Section(child.text().collect()))
            } else {
                parse_chapter(child).map(TocEntry::Chapter)
            }
        })
        .collect()
}

fn parse_chapter(item: ElementRef<'_>) -> Option<Chapter> {
    let s = SiteSelectors::get();

    let Some(anchor) = item.select(&s.subtitle_link).next() else {
        debug!("跳过无章节链接的目录节点: <{}>", item.value().name());
        return None;
    };

    let title: String = anchor.text().collect();
    let link = normalize_link(anchor.value().attr("href").unwrap_or_default());

    let (date_posted, date_updated) = match item.select(&s.long_update).next() {
        Some(update) => {
            let posted = parse_stamp(&update.text().collect::<String>());
            let updated = update
                .select(&s.span)
                .next()
                .and_then(|span| parse_stamp(span.value().attr("title").unwrap_or_default()));
            (posted, updated)
        }
        None => (None, None),
    };

    if date_posted.is_none() {
        warn!("章节发布时间无法解析: {}", title);
    }

    Some(Chapter {
        title,
        link,
        date_posted,
        date_updated,
    })
}

/// 保留链接的最后一个路径段 (含前导 `/` 与尾随 `/`)
pub fn normalize_link(href: &str) -> String {
    let body = href.strip_suffix('/').unwrap_or(href);
    match body.rfind('/') {
        Some(idx) => href[idx..].to_string(),
        None => format!("/{}", href),
    }
}

fn parse_stamp(raw: &str) -> Option<Timestamp> {
    let prefix = char_prefix(raw.trim(), STAMP_CHARS);
    Timestamp::parse_naive(prefix.trim(), TIME_LAYOUT)
}

/// 卷列表折叠器
///
/// 卷标题开启新卷；尚无卷时出现的章节落入合成的默认卷。
#[derive(Debug, Default)]
pub struct TocAssembler {
    sections: Vec<Section>,
}

impl TocAssembler {
    pub fn push(&mut self, entry: TocEntry) {
        match entry {
            TocEntry::Section(name) => self.sections.push(Section::new(name, 0)),
            TocEntry::Chapter(chapter) => {
                if self.sections.is_empty() {
                    self.sections.push(Section::synthesized());
                }
                if let Some(section) = self.sections.last_mut() {
                    section.chapters.push(chapter);
                }
            }
        }
    }

    pub fn extend(&mut self, entries: impl IntoIterator<Item = TocEntry>) {
        for entry in entries {
            self.push(entry);
        }
    }

    pub fn finish(self) -> Vec<Section> {
        self.sections
    }
}

/// 分页目录的后续页生产者，从第 2 页开始递增
pub struct IndexPager<'a> {
    link: &'a str,
    fetcher: &'a dyn PageFetcher,
    page: u32,
}

impl<'a> IndexPager<'a> {
    pub fn new(link: &'a str, fetcher: &'a dyn PageFetcher) -> Self {
        Self {
            link,
            fetcher,
            page: 2,
        }
    }

    /// 获取下一页条目
    ///
    /// 获取失败视为分页结束，返回空列表。
    pub async fn next_page(&mut self) -> Vec<TocEntry> {
        let url = format!("{}?p={}", self.link, self.page);
        self.page += 1;

        match self.fetcher.fetch(&url).await {
            Ok(body) => {
                let entries = parse_index_page(&Html::parse_document(&body));
                debug!("目录页 {} 解析到 {} 个条目", url, entries.len());
                entries
            }
            Err(e) => {
                warn!("目录分页在 {} 处中止: {}", url, e);
                Vec::new()
            }
        }
    }
}
