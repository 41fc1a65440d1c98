use crate::error::{GraphError, GraphResult};
use std::sync::{
    atomic::{AtomicBool, Ordering},
    Arc,
};
use std::time::{Duration, Instant};

/// 调用方持有的取消信号：共享的取消标记加可选截止时间。
/// 每次网络往返前都会检查；克隆后共享同一个标记。
#[derive(Clone, Debug, Default)]
pub struct CancelToken {
    flag: Arc<AtomicBool>,
    deadline: Option<Instant>,
}

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_deadline(deadline: Instant) -> Self {
        Self {
            flag: Arc::new(AtomicBool::new(false)),
            deadline: Some(deadline),
        }
    }

    pub fn with_timeout(timeout: Duration) -> Self {
        Self::with_deadline(Instant::now() + timeout)
    }

    /// 复用已有的取消标记（例如界面层为每个任务持有的标记）。
    pub fn from_flag(flag: Arc<AtomicBool>) -> Self {
        Self {
            flag,
            deadline: None,
        }
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    /// 距截止时间的剩余时长；已过期返回 `Duration::ZERO`。
    pub fn remaining(&self) -> Option<Duration> {
        self.deadline
            .map(|deadline| deadline.saturating_duration_since(Instant::now()))
    }

    /// 取消优先于截止时间。
    pub fn check(&self) -> GraphResult<()> {
        if self.is_cancelled() {
            return Err(GraphError::Cancelled);
        }
        if let Some(deadline) = self.deadline {
            if Instant::now() >= deadline {
                return Err(GraphError::DeadlineExceeded);
            }
        }
        Ok(())
    }

    /// 请求级超时不得超过剩余截止时间。
    pub(crate) fn cap_timeout(&self, timeout: Duration) -> Duration {
        match self.remaining() {
            Some(remaining) => timeout.min(remaining),
            None => timeout,
        }
    }
}
