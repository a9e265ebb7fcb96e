//! 小说抽取调度器
//!
//! 负责串起一次抽取流程：分派站点 -> 组装记录 -> 逐章下载

use std::path::Path;
use std::sync::Arc;

use tracing::{debug, info};

use crate::core::error::Result;
use crate::core::event::{EventSender, NovelEvent};
use crate::core::model::Novel;
use crate::interfaces::{NovelSite, PageFetcher};
use crate::sites::{OpenedSite, SiteRegistry};
use crate::utils::ensure_dir;

use super::task::ChapterTask;

/// 一次抽取的结果：记录与绑定到该小说的站点实例
pub struct Extraction {
    pub novel: Novel,
    pub site: Box<dyn NovelSite>,
}

/// 抽取引擎
pub struct NovelEngine {
    fetcher: Arc<dyn PageFetcher>,
    registry: SiteRegistry,
    events: Option<EventSender>,
}

impl NovelEngine {
    pub fn new(fetcher: Arc<dyn PageFetcher>) -> Self {
        Self {
            fetcher,
            registry: SiteRegistry::new(),
            events: None,
        }
    }

    pub fn with_events(mut self, events: EventSender) -> Self {
        self.events = Some(events);
        self
    }

    fn emit(&self, event: NovelEvent) {
        if let Some(ref sender) = self.events {
            sender.emit(event);
        }
    }

    /// 分派站点并读取标题、作者与目录
    pub async fn build_record(&self, url: &str) -> Result<Extraction> {
        let OpenedSite { link, site } = self.registry.open(url, self.fetcher.clone()).await?;

        debug!("正在获取元数据...");
        let title = site.title()?;
        let author = site.author()?;

        debug!("正在获取目录...");
        let sections = site.toc().await?;

        let novel = Novel {
            title,
            link,
            author,
            sections,
        };
        info!(
            "《{}》共 {} 卷 {} 章",
            novel.title,
            novel.sections.len(),
            novel.chapter_count()
        );

        Ok(Extraction { novel, site })
    }

    /// 按目录顺序下载全部章节到 `dir`
    ///
    /// 任一章节失败即中止，已写出的文件保留。
    pub async fn download_chapters(
        &self,
        novel: &Novel,
        site: &dyn NovelSite,
        dir: &Path,
    ) -> Result<()> {
        self.emit(NovelEvent::TaskStarted {
            title: novel.title.clone(),
        });

        match self.execute_loop(novel, site, dir).await {
            Ok(()) => {
                self.emit(NovelEvent::TaskCompleted {
                    title: novel.title.clone(),
                });
                Ok(())
            }
            Err(e) => {
                self.emit(NovelEvent::TaskFailed {
                    error: e.to_string(),
                });
                Err(e)
            }
        }
    }

    async fn execute_loop(&self, novel: &Novel, site: &dyn NovelSite, dir: &Path) -> Result<()> {
        ensure_dir(dir).await?;

        let total = novel.chapter_count();
        self.emit(NovelEvent::ChaptersDiscovered { total });
        info!("共发现 {} 个章节", total);

        for (i, chapter) in novel.chapters().enumerate() {
            let task = ChapterTask::new(novel, chapter, dir);
            debug!("{}", task);
            task.run(self.fetcher.as_ref(), site).await?;

            self.emit(NovelEvent::ChapterProgress {
                current: i + 1,
                total,
                title: chapter.title.clone(),
            });
        }

        info!("章节下载完成: {}", dir.display());
        Ok(())
    }
}
