//! カクヨム (kakuyomu.jp) 站点模块
//!
//! 元数据与目录都来自页面内嵌的 Apollo 状态图，不解析可见 DOM。

mod selectors;
pub mod state;

use async_trait::async_trait;
use scraper::Html;
use tracing::{info, warn};
use url::Url;

use crate::core::error::{NovelError, Result};
use crate::core::model::{Chapter, Section, Timestamp};
use crate::interfaces::NovelSite;
use crate::utils::Sanitizer;

pub use self::selectors::SiteSelectors;
use self::state::{AuthorNode, EpisodeNode, Ref, SectionNode, StateMap, TocNode, WorkNode};

/// 话发布时间格式
const TIME_LAYOUT: &str = "%Y-%m-%dT%H:%M:%SZ";
/// 未分卷作品唯一目录条目的键前缀
const SECTIONLESS_PREFIX: &str = "TableOfContentsChapter:";

/// カクヨム 站点实现
pub struct Kakuyomu {
    work_key: String,
    state: StateMap,
    sanitizer: Sanitizer,
}

impl Kakuyomu {
    /// 从目录页文档中载入状态图
    pub fn new(link: &str, index: &Html) -> Result<Self> {
        let work_key = work_key(link)?;

        let payload: String = index
            .select(&SiteSelectors::get().payload)
            .next()
            .map(|el| el.text().collect())
            .ok_or_else(|| NovelError::parse("application/json payload not found"))?;
        let state = StateMap::from_payload(&payload)?;

        Ok(Self {
            work_key,
            state,
            sanitizer: Sanitizer::new()
                .strip_attrs("p")
                .drop_rp()
                .set_attr("em.emphasisDots", "class", "em-dot")
                .set_attr(".emphasisDots em", "class", "em-dot"),
        })
    }

    fn work(&self) -> Result<&WorkNode> {
        self.state.get(&self.work_key)
    }

    fn episode(&self, r: &Ref) -> Result<Chapter> {
        let node: &EpisodeNode = self.state.resolve(r)?;
        let date_posted = Timestamp::parse_utc(&node.published_at, TIME_LAYOUT);
        if date_posted.is_none() {
            warn!("话发布时间无法解析: {} ({})", node.title, node.published_at);
        }

        Ok(Chapter {
            title: node.title.clone(),
            link: format!("/episodes/{}", node.id),
            date_posted,
            date_updated: None,
        })
    }
}

/// 由作品地址推导状态图中的作品键
///
/// 取最后两个路径段 `works/1234567`，首个 `/` 换成 `:`，首字母大写，
/// 再删去第一个小写 `s`，得到 `Work:1234567`。
pub fn work_key(link: &str) -> Result<String> {
    let url = Url::parse(link)?;
    let segments: Vec<&str> = url.path().split('/').filter(|s| !s.is_empty()).collect();

    let [.., kind, id] = segments.as_slice() else {
        return Err(NovelError::parse(format!("work path too short: {}", link)));
    };

    let tail = format!("{}/{}", kind, id).replacen('/', ":", 1);
    let capitalized: String = tail
        .chars()
        .take(1)
        .flat_map(char::to_uppercase)
        .chain(tail.chars().skip(1))
        .collect();
    Ok(capitalized.replacen('s', "", 1))
}

#[async_trait(?Send)]
impl NovelSite for Kakuyomu {
    fn id(&self) -> &'static str {
        "kakuyomu"
    }

    fn title(&self) -> Result<String> {
        Ok(self.work()?.title.clone())
    }

    fn author(&self) -> Result<String> {
        let author_ref = self
            .work()?
            .author
            .as_ref()
            .ok_or_else(|| NovelError::parse("work has no author reference"))?;
        let author: &AuthorNode = self.state.resolve(author_ref)?;
        Ok(author.activity_name.clone())
    }

    async fn toc(&self) -> Result<Vec<Section>> {
        let toc = self
            .work()?
            .table_of_contents
            .as_deref()
            .ok_or_else(|| NovelError::parse("work has no tableOfContents"))?;

        let sectionless = matches!(toc, [only] if only.key.starts_with(SECTIONLESS_PREFIX));

        let mut sections = Vec::with_capacity(toc.len());
        for entry in toc {
            let node: &TocNode = self.state.resolve(entry)?;

            let mut section = if sectionless {
                Section::synthesized()
            } else {
                let info_ref = node
                    .chapter
                    .as_ref()
                    .ok_or_else(|| NovelError::parse(format!("{} has no chapter", entry.key)))?;
                let info: &SectionNode = self.state.resolve(info_ref)?;
                Section::new(info.title.clone(), info.level)
            };

            section.chapters = node
                .episode_unions
                .iter()
                .map(|r| self.episode(r))
                .collect::<Result<_>>()?;
            sections.push(section);
        }

        info!("目录解析完成，共 {} 卷", sections.len());
        Ok(sections)
    }

    fn chapter_body(&self, doc: &Html) -> Result<String> {
        let body = doc
            .select(&SiteSelectors::get().episode_body)
            .next()
            .ok_or_else(|| NovelError::parse("episode body not found"))?;
        self.sanitizer.inner_markup(body)
    }
}
