//! カクヨム 内嵌状态图 (Apollo State)
//!
//! 状态表中的节点通过 `{"__ref": key}` 互相引用。加载时按 `__typename`
//! (缺省时按键名前缀) 将节点归类为带类型的变体，之后所有跳转都经
//! [`StateMap::resolve`] 这一处完成类型检查。

use std::collections::HashMap;

use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, warn};

use crate::core::error::{NovelError, Result};

/// 状态表中的引用
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct Ref {
    #[serde(rename = "__ref")]
    pub key: String,
}

/// 作品节点 `Work:*`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkNode {
    pub title: String,
    pub author: Option<Ref>,
    pub table_of_contents: Option<Vec<Ref>>,
}

/// 目录条目节点 `TableOfContentsChapter:*`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TocNode {
    pub chapter: Option<Ref>,
    #[serde(default)]
    pub episode_unions: Vec<Ref>,
}

/// 卷信息节点 `Chapter:*`
#[derive(Debug, Clone, Deserialize)]
pub struct SectionNode {
    pub title: String,
    pub level: u8,
}

/// 话节点 `Episode:*`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EpisodeNode {
    pub id: String,
    pub title: String,
    pub published_at: String,
}

/// 作者节点 `UserAccount:*`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorNode {
    pub activity_name: String,
}

/// 已归类的状态节点
#[derive(Debug, Clone)]
pub enum StateNode {
    Work(WorkNode),
    Toc(TocNode),
    Section(SectionNode),
    Episode(EpisodeNode),
    Author(AuthorNode),
    /// 未识别或不符合声明类型的节点
    Raw(Value),
}

impl StateNode {
    fn classify(key: &str, value: Value) -> Self {
        let kind = value
            .get("__typename")
            .and_then(Value::as_str)
            .map(str::to_owned)
            .unwrap_or_else(|| key.split(':').next().unwrap_or_default().to_owned());

        match kind.as_str() {
            "Work" => Self::typed(key, value, StateNode::Work),
            "TableOfContentsChapter" => Self::typed(key, value, StateNode::Toc),
            "Chapter" => Self::typed(key, value, StateNode::Section),
            "Episode" => Self::typed(key, value, StateNode::Episode),
            "UserAccount" => Self::typed(key, value, StateNode::Author),
            _ => StateNode::Raw(value),
        }
    }

    fn typed<T: DeserializeOwned>(key: &str, value: Value, wrap: fn(T) -> StateNode) -> Self {
        match T::deserialize(&value) {
            Ok(node) => wrap(node),
            Err(e) => {
                warn!("状态节点 {} 与其类型不符: {}", key, e);
                StateNode::Raw(value)
            }
        }
    }
}

/// 可从 [`StateNode`] 中取出的节点类型
pub trait NodeKind: Sized {
    const NAME: &'static str;

    fn from_node(node: &StateNode) -> Option<&Self>;
}

macro_rules! node_kind {
    ($ty:ty, $variant:ident, $name:literal) => {
        impl NodeKind for $ty {
            const NAME: &'static str = $name;

            fn from_node(node: &StateNode) -> Option<&Self> {
                match node {
                    StateNode::$variant(inner) => Some(inner),
                    _ => None,
                }
            }
        }
    };
}

node_kind!(WorkNode, Work, "Work");
node_kind!(TocNode, Toc, "TableOfContentsChapter");
node_kind!(SectionNode, Section, "Chapter");
node_kind!(EpisodeNode, Episode, "Episode");
node_kind!(AuthorNode, Author, "UserAccount");

/// 状态表
#[derive(Debug, Default)]
pub struct StateMap {
    nodes: HashMap<String, StateNode>,
}

impl StateMap {
    /// 从页面内嵌的 JSON 文本中取出 `props.pageProps.__APOLLO_STATE__`
    pub fn from_payload(payload: &str) -> Result<Self> {
        let mut root: Value = serde_json::from_str(payload)?;

        let state = root
            .get_mut("props")
            .and_then(|v| v.get_mut("pageProps"))
            .and_then(|v| v.get_mut("__APOLLO_STATE__"))
            .map(Value::take)
            .ok_or_else(|| NovelError::parse("props.pageProps.__APOLLO_STATE__ not found"))?;

        let Value::Object(entries) = state else {
            return Err(NovelError::parse("__APOLLO_STATE__ is not an object"));
        };

        let nodes: HashMap<_, _> = entries
            .into_iter()
            .map(|(key, value)| {
                let node = StateNode::classify(&key, value);
                (key, node)
            })
            .collect();
        debug!("状态表载入 {} 个节点", nodes.len());

        Ok(Self { nodes })
    }

    /// 按键取出指定类型的节点
    pub fn get<T: NodeKind>(&self, key: &str) -> Result<&T> {
        let node = self
            .nodes
            .get(key)
            .ok_or_else(|| NovelError::parse(format!("state key not found: {}", key)))?;
        T::from_node(node)
            .ok_or_else(|| NovelError::parse(format!("state node {} is not a {}", key, T::NAME)))
    }

    /// 跟随引用
    pub fn resolve<T: NodeKind>(&self, r: &Ref) -> Result<&T> {
        self.get(&r.key)
    }
}
