//! 终端进度渲染 (Terminal Progress)
//!
//! 消费抽取事件，以 `indicatif` 进度条展示章节下载状态。

use std::sync::OnceLock;
use std::time::Duration;

use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use tokio::task::JoinHandle;

use crate::core::event::{EventReceiver, NovelEvent};

/// 全局进度容器，日志写入器也经由它输出
static MULTI: OnceLock<MultiProgress> = OnceLock::new();

pub fn get_multi() -> &'static MultiProgress {
    MULTI.get_or_init(MultiProgress::new)
}

#[derive(Default)]
struct UiState {
    /// 任务状态条
    main_bar: Option<ProgressBar>,
    /// 章节进度条
    chapter_bar: Option<ProgressBar>,
}

/// 进度协调器
pub struct Ui;

impl Ui {
    /// 启动事件监听循环，发送端全部关闭后退出
    pub fn run(receiver: EventReceiver) -> JoinHandle<()> {
        tokio::spawn(async move {
            let mut state = UiState::default();
            while let Some(event) = receiver.recv_async().await {
                state.handle_event(event);
            }
        })
    }
}

impl UiState {
    fn handle_event(&mut self, event: NovelEvent) {
        let multi = get_multi();

        match event {
            NovelEvent::TaskStarted { title } => {
                let style = ProgressStyle::default_spinner()
                    .template("{spinner:.green} [{elapsed_precise}] {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_spinner())
                    .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏");

                let bar = multi.add(ProgressBar::new_spinner());
                bar.set_style(style);
                bar.set_message(format!("📚 {}", title));
                bar.enable_steady_tick(Duration::from_millis(100));
                self.main_bar = Some(bar);
            }
            NovelEvent::ChaptersDiscovered { total } => {
                let style = ProgressStyle::default_bar()
                    .template("{spinner:.cyan} [{bar:40.cyan/blue}] {pos}/{len} ({percent}%) {msg}")
                    .unwrap_or_else(|_| ProgressStyle::default_bar())
                    .progress_chars("█▉▊▋▌▍▎▏  ");

                let bar = multi.add(ProgressBar::new(total as u64));
                bar.set_style(style);
                self.chapter_bar = Some(bar);
            }
            NovelEvent::ChapterProgress { current, title, .. } => {
                if let Some(ref bar) = self.chapter_bar {
                    bar.set_position(current as u64);
                    bar.set_message(truncate_title(&title, 30));
                }
            }
            NovelEvent::TaskCompleted { title } => {
                if let Some(ref bar) = self.chapter_bar {
                    bar.finish_with_message("✅ DOWNLOADED");
                }
                if let Some(ref bar) = self.main_bar {
                    bar.finish_with_message(format!("✅ {}", title));
                }
            }
            NovelEvent::TaskFailed { error } => {
                if let Some(ref bar) = self.chapter_bar {
                    bar.abandon();
                }
                if let Some(ref bar) = self.main_bar {
                    bar.abandon_with_message(format!("❌ FAILED: {}", error));
                }
            }
        }
    }
}

/// 按字符数截断标题
fn truncate_title(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", truncated)
    }
}
