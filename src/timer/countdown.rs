use tracing::debug;

/// 倒计时句柄，每次 `start` 生成一个新值
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CountdownHandle(u64);

/// 倒计时事件
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownEvent {
    /// 经过一个时间单位，仍有剩余
    Tick {
        handle: CountdownHandle,
        remaining: u32,
    },
    /// 剩余归零，句柄随即失效
    Timeout { handle: CountdownHandle },
}

#[derive(Debug)]
struct LiveCountdown {
    handle: CountdownHandle,
    remaining: u32,
}

/// 可取消的倒计时
///
/// 不自带时钟：由外部的周期性节拍驱动，每调用一次 [`Countdown::tick`]
/// 代表经过一个时间单位。同一时刻最多只有一个倒计时处于活动状态。
#[derive(Debug, Default)]
pub struct Countdown {
    next_id: u64,
    live: Option<LiveCountdown>,
}

impl Countdown {
    pub fn new() -> Self {
        Self::default()
    }

    /// 开始新的倒计时，旧的倒计时（如果有）被作废
    pub fn start(&mut self, duration_secs: u32) -> CountdownHandle {
        if let Some(previous) = self.live.take() {
            debug!("倒计时 {:?} 被新的倒计时取代", previous.handle);
        }
        self.next_id += 1;
        let handle = CountdownHandle(self.next_id);
        self.live = Some(LiveCountdown {
            handle,
            remaining: duration_secs,
        });
        handle
    }

    /// 取消倒计时；对已取消或已超时的句柄无效果
    ///
    /// 返回是否真的取消了一个活动中的倒计时。
    pub fn cancel(&mut self, handle: CountdownHandle) -> bool {
        if self.is_live(handle) {
            self.live = None;
            true
        } else {
            false
        }
    }

    /// 推进一个时间单位
    ///
    /// 没有活动倒计时时返回 `None`；归零时恰好产生一次 `Timeout`。
    pub fn tick(&mut self) -> Option<CountdownEvent> {
        let live = self.live.as_mut()?;
        live.remaining = live.remaining.saturating_sub(1);

        if live.remaining == 0 {
            let handle = live.handle;
            self.live = None;
            Some(CountdownEvent::Timeout { handle })
        } else {
            Some(CountdownEvent::Tick {
                handle: live.handle,
                remaining: live.remaining,
            })
        }
    }

    pub fn is_live(&self, handle: CountdownHandle) -> bool {
        self.live.as_ref().is_some_and(|l| l.handle == handle)
    }

    /// 活动倒计时的剩余时间
    pub fn remaining(&self) -> Option<u32> {
        self.live.as_ref().map(|l| l.remaining)
    }
}
