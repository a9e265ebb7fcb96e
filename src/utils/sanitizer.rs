//! 正文清理器 (DOM Sanitizer)
//!
//! 两个站点共用的无状态清理规则，基于 `lol_html` 流式改写正文片段。

use lol_html::{RewriteStrSettings, element, rewrite_str};
use scraper::ElementRef;

use crate::core::error::Result;

/// 清理规则集合
///
/// 选择器均为编译期常量，由各站点在构造时给出。
#[derive(Debug, Clone, Default)]
pub struct Sanitizer {
    strip_attrs: Vec<&'static str>,
    drop_rp: bool,
    set_attrs: Vec<(&'static str, &'static str, &'static str)>,
    unwrap: Vec<&'static str>,
}

impl Sanitizer {
    pub fn new() -> Self {
        Self::default()
    }

    /// 移除所有匹配 `tag` 的元素上的全部属性
    pub fn strip_attrs(mut self, tag: &'static str) -> Self {
        self.strip_attrs.push(tag);
        self
    }

    /// 移除注音回退括号 `<rp>`
    pub fn drop_rp(mut self) -> Self {
        self.drop_rp = true;
        self
    }

    /// 在匹配节点上设置 `name=value`，覆盖原值
    pub fn set_attr(
        mut self,
        selector: &'static str,
        name: &'static str,
        value: &'static str,
    ) -> Self {
        self.set_attrs.push((selector, name, value));
        self
    }

    /// 用子节点原位替换匹配的包裹元素
    pub fn unwrap_class(mut self, selector: &'static str) -> Self {
        self.unwrap.push(selector);
        self
    }

    /// 对标记片段执行全部规则
    pub fn clean(&self, fragment: &str) -> Result<String> {
        let mut handlers = Vec::new();

        for &tag in &self.strip_attrs {
            handlers.push(element!(tag, |el| {
                // 先取属性名快照，再逐个删除
                let names: Vec<String> = el.attributes().iter().map(|a| a.name()).collect();
                for name in names {
                    el.remove_attribute(&name);
                }
                Ok(())
            }));
        }

        if self.drop_rp {
            handlers.push(element!("rp", |el| {
                el.remove();
                Ok(())
            }));
        }

        for &(selector, name, value) in &self.set_attrs {
            handlers.push(element!(selector, move |el| {
                el.set_attribute(name, value)?;
                Ok(())
            }));
        }

        for &selector in &self.unwrap {
            handlers.push(element!(selector, |el| {
                el.remove_and_keep_content();
                Ok(())
            }));
        }

        let output = rewrite_str(
            fragment,
            RewriteStrSettings {
                element_content_handlers: handlers,
                ..RewriteStrSettings::new()
            },
        )?;
        Ok(output)
    }

    /// 清理容器的内部标记，并去掉首尾换行
    pub fn inner_markup(&self, container: ElementRef<'_>) -> Result<String> {
        let cleaned = self.clean(&container.inner_html())?;
        Ok(cleaned.trim_matches('\n').to_string())
    }
}
