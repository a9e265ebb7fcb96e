//! 错误处理体系 (Error Handling System)
//!
//! 定义抓取流程中的领域错误、错误类别以及全局 Result 别名。

use strum::Display;
use thiserror::Error;

/// 错误类别 (Error Kinds)
///
/// 调用方据此区分失败原因，而无需匹配具体的错误变体。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
#[strum(serialize_all = "kebab-case")]
pub enum ErrorKind {
    /// 调用方提供的 URL 无法解析
    Input,
    /// URL 主机不在支持列表内
    UnsupportedHost,
    /// 传输层失败
    Network,
    /// 响应状态码不是 200
    HttpStatus,
    /// DOM 元素、JSON 路径或字段缺失/类型不符
    Parse,
    /// 文件系统操作失败
    Io,
    /// 配置加载失败
    Config,
}

/// 全局错误定义 (Novel Domain Errors)
#[derive(Error, Debug)]
pub enum NovelError {
    #[error("Invalid URL: {0}")]
    Input(#[from] url::ParseError),

    #[error("Unsupported host: {0}")]
    UnsupportedHost(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Unexpected status code {status} for {url}")]
    HttpStatus { url: String, status: u16 },

    #[error("Parsing error: {0}")]
    Parse(String),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Rewrite error: {0}")]
    Rewrite(#[from] lol_html::errors::RewritingError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Configuration error: {0}")]
    Config(#[from] config::ConfigError),
}

/// 全局 Result 别名
pub type Result<T> = std::result::Result<T, NovelError>;

impl NovelError {
    /// 构造解析错误
    pub fn parse(msg: impl Into<String>) -> Self {
        Self::Parse(msg.into())
    }

    /// 归类到错误类别
    pub fn kind(&self) -> ErrorKind {
        match self {
            NovelError::Input(_) => ErrorKind::Input,
            NovelError::UnsupportedHost(_) => ErrorKind::UnsupportedHost,
            NovelError::Network(_) => ErrorKind::Network,
            NovelError::HttpStatus { .. } => ErrorKind::HttpStatus,
            NovelError::Parse(_) | NovelError::Json(_) | NovelError::Rewrite(_) => {
                ErrorKind::Parse
            }
            NovelError::Io(_) => ErrorKind::Io,
            NovelError::Config(_) => ErrorKind::Config,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn kinds_render_in_kebab_case() {
        assert_eq!(ErrorKind::UnsupportedHost.to_string(), "unsupported-host");
        assert_eq!(ErrorKind::HttpStatus.to_string(), "http-status");
        assert_eq!(ErrorKind::Parse.to_string(), "parse");
    }

    #[test]
    fn json_and_parse_errors_share_a_kind() {
        let json = serde_json::from_str::<serde_json::Value>("{").unwrap_err();
        assert_eq!(NovelError::from(json).kind(), ErrorKind::Parse);
        assert_eq!(NovelError::parse("missing").kind(), ErrorKind::Parse);
    }

    #[test]
    fn status_error_names_the_url() {
        let err = NovelError::HttpStatus {
            url: "https://kakuyomu.jp/works/1".into(),
            status: 503,
        };
        assert_eq!(err.kind(), ErrorKind::HttpStatus);
        assert!(err.to_string().contains("503"));
    }
}
