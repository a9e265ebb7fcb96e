//! 网络小说目录抽取与章节下载
//!
//! 支持 小説家になろう (ncode.syosetu.com) 与 カクヨム (kakuyomu.jp)。

pub mod core;
pub mod engine;
pub mod interfaces;
pub mod network;
pub mod sites;
pub mod ui;
pub mod utils;

pub use crate::core::error::{ErrorKind, NovelError, Result};
pub use crate::core::model::{Chapter, Novel, Section, Timestamp};
pub use crate::engine::{Extraction, NovelEngine};
