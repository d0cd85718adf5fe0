use std::time::Duration;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

/// 周期性节拍源
///
/// 后台任务按固定周期向通道发送节拍，由调用方在自己的事件循环里接收，
/// 因此节拍与其他会话操作总是在同一个逻辑任务上顺序处理。
pub struct Ticker {
    period: Duration,
    rx: mpsc::Receiver<()>,
    task: JoinHandle<()>,
}

impl Ticker {
    /// 启动节拍任务，第一个节拍在一个完整周期之后到达
    pub fn spawn(period: Duration) -> Self {
        let (tx, rx) = mpsc::channel(4);
        let task = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                interval.tick().await;
                if tx.send(()).await.is_err() {
                    break;
                }
            }
        });
        Self { period, rx, task }
    }

    /// 等待下一个节拍
    pub async fn tick(&mut self) -> Option<()> {
        self.rx.recv().await
    }

    /// 重新计时，丢弃尚未消费的旧节拍
    pub fn restart(&mut self) {
        *self = Self::spawn(self.period);
    }

    pub fn period(&self) -> Duration {
        self.period
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.task.abort();
    }
}
