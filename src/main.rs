//! 应用程序入口 (Application Entrypoint)
//!
//! 负责 CLI 指令解析、日志层初始化与抽取流程的装配。

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use tracing::{info, warn};
use tracing_subscriber::fmt::MakeWriter;

use novel_spider::core::config::AppConfig;
use novel_spider::core::event::create_event_channel;
use novel_spider::core::record::save_record;
use novel_spider::network::HttpFetcher;
use novel_spider::ui::{Ui, get_multi};
use novel_spider::{Extraction, NovelEngine};

/// 进度条感知的日志写入器
///
/// 日志经由全局进度容器输出，不会打断进度条的渲染。
struct IndicatifWriter;

impl io::Write for IndicatifWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let s = String::from_utf8_lossy(buf);
        let _ = get_multi().println(s.trim_end());
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for IndicatifWriter {
    type Writer = IndicatifWriter;

    fn make_writer(&self) -> Self::Writer {
        IndicatifWriter
    }
}

#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 抽取标题、作者与目录，写出小说记录
    Toc {
        /// 作品目录页地址
        #[arg(short, long)]
        url: String,
        /// 记录文件路径，缺省为 `<output_dir>/<标题>.json`
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// 抽取目录后逐章下载正文
    Download {
        /// 作品目录页地址
        #[arg(short, long)]
        url: String,
        /// 章节输出目录，缺省为 `<output_dir>/<标题>`
        #[arg(short, long)]
        dir: Option<PathBuf>,
        /// 记录文件路径，缺省为 `<output_dir>/<标题>.json`
        #[arg(short, long)]
        record: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(IndicatifWriter)
        .with_target(false)
        .with_ansi(true)
        .init();

    let cli = Cli::parse();
    let config = AppConfig::load().context("failed to load configuration")?;
    let fetcher = Arc::new(HttpFetcher::new(&config).context("failed to build HTTP client")?);

    match cli.command {
        Commands::Toc { url, out } => {
            let engine = NovelEngine::new(fetcher);
            let Extraction { novel, .. } = engine
                .build_record(&url)
                .await
                .with_context(|| format!("failed to extract {}", url))?;

            let out = out.unwrap_or_else(|| default_record_path(&config, &novel.title));
            save_record(&novel, &out)
                .await
                .with_context(|| format!("failed to write {}", out.display()))?;
            info!("记录已写出: {}", out.display());
        }
        Commands::Download { url, dir, record } => {
            let (event_sender, event_receiver) = create_event_channel();
            let ui_handle = Ui::run(event_receiver);

            // 引擎持有唯一的事件发送端，离开作用域后 UI 循环随之结束
            let result = {
                let engine = NovelEngine::new(fetcher).with_events(event_sender);
                until_interrupted(
                    download(&engine, &config, &url, dir, record),
                    tokio::signal::ctrl_c(),
                )
                .await
            };

            let _ = ui_handle.await;
            result?;
        }
    }

    Ok(())
}

/// 运行任务直到完成或收到中断信号，中断视为失败
async fn until_interrupted<S>(
    work: impl Future<Output = anyhow::Result<()>>,
    signal: impl Future<Output = S>,
) -> anyhow::Result<()> {
    tokio::select! {
        result = work => result,
        _ = signal => {
            warn!("收到中断信号，已写出的章节保留");
            anyhow::bail!("download interrupted")
        }
    }
}

async fn download(
    engine: &NovelEngine,
    config: &AppConfig,
    url: &str,
    dir: Option<PathBuf>,
    record: Option<PathBuf>,
) -> anyhow::Result<()> {
    let Extraction { novel, site } = engine
        .build_record(url)
        .await
        .with_context(|| format!("failed to extract {}", url))?;

    let record = record.unwrap_or_else(|| default_record_path(config, &novel.title));
    save_record(&novel, &record)
        .await
        .with_context(|| format!("failed to write {}", record.display()))?;

    let dir = dir.unwrap_or_else(|| PathBuf::from(&config.output_dir).join(&novel.title));
    if let Some(parent) = dir.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    engine
        .download_chapters(&novel, site.as_ref(), &dir)
        .await
        .with_context(|| format!("failed to download chapters into {}", dir.display()))?;

    info!("《{}》下载完成: {}", novel.title, dir.display());
    Ok(())
}

fn default_record_path(config: &AppConfig, title: &str) -> PathBuf {
    PathBuf::from(&config.output_dir).join(format!("{}.json", title))
}
