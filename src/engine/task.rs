//! 章节下载任务

use std::path::{Path, PathBuf};

use scraper::Html;
use tracing::debug;

use crate::core::error::Result;
use crate::core::model::{Chapter, Novel};
use crate::interfaces::{NovelSite, PageFetcher};
use crate::utils::save_file;

/// 单个章节的下载任务：获取、提取正文、落盘
#[derive(Debug, Clone)]
pub struct ChapterTask {
    pub title: String,
    pub url: String,
    pub path: PathBuf,
}

impl ChapterTask {
    /// 章节文件名即章节标题，不做转义
    pub fn new(novel: &Novel, chapter: &Chapter, dir: &Path) -> Self {
        Self {
            title: chapter.title.clone(),
            url: novel.chapter_url(chapter),
            path: dir.join(format!("{}.html", chapter.title)),
        }
    }

    pub async fn run(&self, fetcher: &dyn PageFetcher, site: &dyn NovelSite) -> Result<()> {
        let body = fetcher.fetch(&self.url).await?;
        let markup = {
            let doc = Html::parse_document(&body);
            site.chapter_body(&doc)?
        };

        save_file(&self.path, markup.as_bytes()).await?;
        debug!("章节已保存: {} -> {}", self.title, self.path.display());
        Ok(())
    }
}

impl std::fmt::Display for ChapterTask {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "下载章节 {} ({})", self.title, self.url)
    }
}
