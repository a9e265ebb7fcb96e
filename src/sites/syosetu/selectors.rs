//! 小説家になろう 选择器
//!
//! 预编译的 CSS 选择器

use std::sync::OnceLock;

use scraper::Selector;

/// 站点选择器集合
pub struct SiteSelectors {
    pub novel_title: Selector,
    pub writer_name: Selector,
    pub anchor: Selector,
    pub index_box: Selector,
    pub chapter_title: Selector,
    pub subtitle_link: Selector,
    pub long_update: Selector,
    pub span: Selector,
    pub pager: Selector,
    pub honbun: Selector,
}

static SELECTORS: OnceLock<SiteSelectors> = OnceLock::new();

impl SiteSelectors {
    /// 获取全局选择器实例
    pub fn get() -> &'static SiteSelectors {
        SELECTORS.get_or_init(|| SiteSelectors {
            novel_title: Selector::parse("p.novel_title").unwrap(),
            writer_name: Selector::parse(".novel_writername").unwrap(),
            anchor: Selector::parse("a").unwrap(),
            index_box: Selector::parse(".index_box").unwrap(),
            chapter_title: Selector::parse(".chapter_title").unwrap(),
            subtitle_link: Selector::parse(".subtitle a").unwrap(),
            long_update: Selector::parse(".long_update").unwrap(),
            span: Selector::parse("span").unwrap(),
            pager: Selector::parse(".novelview_pager").unwrap(),
            honbun: Selector::parse("#novel_honbun").unwrap(),
        })
    }
}
