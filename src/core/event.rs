//! 事件系统定义
//!
//! 用于抓取流程与终端 UI 之间的解耦通信

use flume::{Receiver, Sender};

/// 抓取事件类型
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NovelEvent {
    /// 目录解析完成，开始下载
    TaskStarted { title: String },

    /// 发现章节总数
    ChaptersDiscovered { total: usize },

    /// 章节下载进度
    ChapterProgress {
        current: usize,
        total: usize,
        title: String,
    },

    /// 任务完成
    TaskCompleted { title: String },

    /// 任务失败
    TaskFailed { error: String },
}

/// 事件发送器
#[derive(Clone)]
pub struct EventSender {
    tx: Sender<NovelEvent>,
}

impl EventSender {
    pub fn new(tx: Sender<NovelEvent>) -> Self {
        Self { tx }
    }

    /// 发送事件，接收端关闭时静默丢弃
    pub fn emit(&self, event: NovelEvent) {
        let _ = self.tx.send(event);
    }
}

/// 事件接收器
pub struct EventReceiver {
    rx: Receiver<NovelEvent>,
}

impl EventReceiver {
    pub fn new(rx: Receiver<NovelEvent>) -> Self {
        Self { rx }
    }

    pub async fn recv_async(&self) -> Option<NovelEvent> {
        self.rx.recv_async().await.ok()
    }

    pub fn try_recv(&self) -> Option<NovelEvent> {
        self.rx.try_recv().ok()
    }
}

/// 创建事件通道
pub fn create_event_channel() -> (EventSender, EventReceiver) {
    let (tx, rx) = flume::unbounded();
    (EventSender::new(tx), EventReceiver::new(rx))
}
