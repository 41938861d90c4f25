// ==========================================
// 日志事件捕获 - 用于断言日志输出
// ==========================================
// 在当前线程临时安装订阅者，记录 ERROR 级事件
// ==========================================

use std::sync::{Arc, Mutex};
use tracing::{Event, Level, Subscriber};
use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

/// ERROR 事件计数层
#[derive(Debug, Clone, Default)]
pub struct ErrorEvents {
    /// 每个事件的来源 "file:line"
    events: Arc<Mutex<Vec<String>>>,
}

impl ErrorEvents {
    pub fn new() -> Self {
        Self::default()
    }

    /// 在捕获范围内执行 f
    pub fn capture<T>(&self, f: impl FnOnce() -> T) -> T {
        let subscriber = tracing_subscriber::registry().with(self.clone());
        tracing::subscriber::with_default(subscriber, f)
    }

    pub fn count(&self) -> usize {
        self.events.lock().map(|e| e.len()).unwrap_or(0)
    }

    pub fn sources(&self) -> Vec<String> {
        self.events.lock().map(|e| e.clone()).unwrap_or_default()
    }
}

impl<S: Subscriber> Layer<S> for ErrorEvents {
    fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
        let meta = event.metadata();
        if *meta.level() == Level::ERROR {
            let source = format!(
                "{}:{}",
                meta.file().unwrap_or("?"),
                meta.line().unwrap_or(0)
            );
            if let Ok(mut events) = self.events.lock() {
                events.push(source);
            }
        }
    }
}
