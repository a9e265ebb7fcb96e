//! カクヨム 选择器

use std::sync::OnceLock;

use scraper::Selector;

pub struct SiteSelectors {
    /// 内嵌状态数据的 `<script type="application/json">`
    pub payload: Selector,
    pub episode_body: Selector,
}

static SELECTORS: OnceLock<SiteSelectors> = OnceLock::new();

impl SiteSelectors {
    pub fn get() -> &'static SiteSelectors {
        SELECTORS.get_or_init(|| SiteSelectors {
            payload: Selector::parse(r#"[type="application/json"]"#).unwrap(),
            episode_body: Selector::parse(
                "div.widget-episodeBody.js-episode-body[data-viewer-history-path]",
            )
            .unwrap(),
        })
    }
}
