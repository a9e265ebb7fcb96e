//! 站点定义
//!
//! 定义了站点适配器需要实现的核心接口：标题、作者、目录、正文。

use async_trait::async_trait;
use scraper::Html;

use crate::core::error::Result;
use crate::core::model::Section;

/// 站点适配器 Trait
///
/// 构造时绑定到一部小说的目录页文档，之后无需额外配置即可调用。
/// 适配器持有解析后的 DOM，仅在单个抽取流程内顺序使用。
#[async_trait(?Send)]
pub trait NovelSite {
    /// 站点唯一标识
    fn id(&self) -> &'static str;

    /// 小说标题
    fn title(&self) -> Result<String>;

    /// 作者名
    fn author(&self) -> Result<String>;

    /// 目录，卷与章节均保持站点顺序
    async fn toc(&self) -> Result<Vec<Section>>;

    /// 从章节页文档中提取清理后的正文标记
    fn chapter_body(&self, doc: &Html) -> Result<String>;
}
