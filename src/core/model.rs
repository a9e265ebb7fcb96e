//! 小说记录模型 (Novel Record Model)
//!
//! 小说 → 分卷 → 章节 三层结构，序列化时省略空值与零值。

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Serialize};

/// 未分卷目录的合成卷名
pub const DEFAULT_SECTION: &str = "default";

/// 站点发布的时间戳
///
/// 小説家になろう 的时间不带时区，カクヨム 的以 `Z` 结尾。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Timestamp {
    Utc(DateTime<Utc>),
    Naive(NaiveDateTime),
}

impl Timestamp {
    /// 按给定格式解析无时区时间，忽略格式之后的尾随文本
    pub fn parse_naive(s: &str, layout: &str) -> Option<Self> {
        NaiveDateTime::parse_and_remainder(s, layout)
            .ok()
            .map(|(t, _)| Timestamp::Naive(t))
    }

    /// 按给定格式解析 UTC 时间
    pub fn parse_utc(s: &str, layout: &str) -> Option<Self> {
        NaiveDateTime::parse_from_str(s, layout)
            .ok()
            .map(|t| Timestamp::Utc(t.and_utc()))
    }
}

/// 章节信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Chapter {
    #[serde(rename = "name")]
    pub title: String,
    /// 相对于小说链接的路径片段
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_posted: Option<Timestamp>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date_updated: Option<Timestamp>,
}

/// 卷信息
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub name: String,
    #[serde(default, skip_serializing_if = "is_zero")]
    pub level: u8,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub chapters: Vec<Chapter>,
}

fn is_zero(level: &u8) -> bool {
    *level == 0
}

impl Section {
    pub fn new(name: impl Into<String>, level: u8) -> Self {
        Self {
            name: name.into(),
            level,
            chapters: Vec::new(),
        }
    }

    /// 站点未分卷时合成的默认卷
    pub fn synthesized() -> Self {
        Self::new(DEFAULT_SECTION, 1)
    }
}

/// 小说记录
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Novel {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub title: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub link: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub author: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sections: Vec<Section>,
}

impl Novel {
    /// 按阅读顺序展开全部章节
    pub fn chapters(&self) -> impl Iterator<Item = &Chapter> + '_ {
        self.sections.iter().flat_map(|s| s.chapters.iter())
    }

    pub fn chapter_count(&self) -> usize {
        self.sections.iter().map(|s| s.chapters.len()).sum()
    }

    /// 拼接章节的绝对地址
    ///
    /// 小说链接以 `/` 结尾且章节链接以 `/` 开头时只保留一个分隔符。
    pub fn chapter_url(&self, chapter: &Chapter) -> String {
        match (self.link.strip_suffix('/'), chapter.link.starts_with('/')) {
            (Some(base), true) => format!("{}{}", base, chapter.link),
            _ => format!("{}{}", self.link, chapter.link),
        }
    }
}
