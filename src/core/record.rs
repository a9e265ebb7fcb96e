//! 记录持久化 (Record Persistence)
//!
//! 以 4 空格缩进的 JSON 写出小说记录，键顺序与结构体字段一致。

use std::path::Path;

use serde::Serialize;
use serde_json::ser::PrettyFormatter;

use crate::core::error::{NovelError, Result};
use crate::core::model::Novel;

/// 将记录序列化为带缩进的 JSON 文本
pub fn to_pretty_json(novel: &Novel) -> Result<String> {
    let mut buf = Vec::new();
    let formatter = PrettyFormatter::with_indent(b"    ");
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, formatter);
    novel.serialize(&mut ser)?;
    String::from_utf8(buf).map_err(|e| NovelError::parse(e.to_string()))
}

/// 写出记录文件，已存在则覆盖
pub async fn save_record(novel: &Novel, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let json = to_pretty_json(novel)?;
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, json).await?;
    Ok(())
}

pub async fn load_record(path: impl AsRef<Path>) -> Result<Novel> {
    let text = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&text)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::model::{Chapter, Section, Timestamp};

    fn sample() -> Novel {
        Novel {
            title: "Foo".into(),
            link: "https://ncode.syosetu.com/n0001xy/".into(),
            author: "Baz".into(),
            sections: vec![Section {
                name: "S1".into(),
                level: 0,
                chapters: vec![Chapter {
                    title: "c1".into(),
                    link: "/1/".into(),
                    date_posted: Timestamp::parse_naive("2023/01/02 03:04", "%Y/%m/%d %H:%M"),
                    date_updated: None,
                }],
            }],
        }
    }

    #[test]
    fn json_is_indented_with_four_spaces_in_key_order() {
        let json = to_pretty_json(&sample()).unwrap();
        let lines: Vec<&str> = json.lines().collect();
        assert_eq!(lines[0], "{");
        assert_eq!(lines[1], "    \"title\": \"Foo\",");
        assert_eq!(lines[2], "    \"link\": \"https://ncode.syosetu.com/n0001xy/\",");
        assert_eq!(lines[3], "    \"author\": \"Baz\",");
        assert!(json.contains("\"date_posted\": \"2023-01-02T03:04:00\""));
        assert!(!json.contains("date_updated"));
        assert!(!json.contains("level"));
    }

    #[tokio::test]
    async fn saved_record_loads_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("novel.json");
        save_record(&sample(), &path).await.unwrap();
        assert_eq!(load_record(&path).await.unwrap(), sample());
    }
}
