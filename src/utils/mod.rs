use std::path::Path;

use tokio::fs;
use tokio::io::AsyncWriteExt;

pub mod sanitizer;

pub use sanitizer::Sanitizer;

pub async fn file_exists(path: impl AsRef<Path>) -> bool {
    fs::try_exists(path).await.unwrap_or(false)
}

/// 目录不存在时以 0755 权限创建
pub async fn ensure_dir(dir: impl AsRef<Path>) -> std::io::Result<()> {
    let dir = dir.as_ref();
    if file_exists(dir).await {
        return Ok(());
    }

    let mut builder = fs::DirBuilder::new();
    #[cfg(unix)]
    builder.mode(0o755);
    builder.create(dir).await
}

/// 创建或覆盖文件并写入全部内容，写入失败时保留已写部分
pub async fn save_file(path: impl AsRef<Path>, data: &[u8]) -> std::io::Result<()> {
    let mut file = fs::File::create(path).await?;
    file.write_all(data).await?;
    file.flush().await?;
    Ok(())
}

/// 按字符截取前缀
pub fn char_prefix(s: &str, n: usize) -> &str {
    match s.char_indices().nth(n) {
        Some((idx, _)) => &s[..idx],
        None => s,
    }
}
