//! 答题会话的状态与结果类型

use std::fmt::{self, Display};

use crate::error::PersistenceError;

/// 单题作答结果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// 回答正确
    Correct,
    /// 回答错误
    Incorrect,
    /// 超时未作答
    Timeout,
}

impl Outcome {
    /// 该结果是否需要记录错题
    pub fn is_mistake(self) -> bool {
        !matches!(self, Outcome::Correct)
    }
}

impl Display for Outcome {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Outcome::Correct => write!(f, "正确"),
            Outcome::Incorrect => write!(f, "错误"),
            Outcome::Timeout => write!(f, "超时"),
        }
    }
}

/// 会话状态
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum QuizState {
    /// 尚未出题
    Idle,
    /// 已出题，倒计时进行中
    AwaitingAnswer,
    /// 已揭晓答案
    Revealed(Outcome),
}

impl Display for QuizState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            QuizState::Idle => write!(f, "空闲"),
            QuizState::AwaitingAnswer => write!(f, "等待作答"),
            QuizState::Revealed(outcome) => write!(f, "已揭晓: {}", outcome),
        }
    }
}

/// 一次节拍对会话产生的效果
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionTick {
    /// 倒计时继续，附剩余秒数
    Remaining(u32),
    /// 倒计时归零，本题以超时结束
    TimedOut,
}

/// 进入下一题时错题的记录情况
#[derive(Debug)]
pub enum MistakeWrite {
    /// 无需记录（答对或已提交笔记）
    NotRequired,
    /// 已自动记录
    Written,
    /// 记录失败，会话照常继续
    Failed(PersistenceError),
}

/// 会话结束时的统计
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub score: u32,
    pub total_answered: u32,
}

impl SessionSummary {
    /// 正确率（百分比），未作答时为 0
    pub fn accuracy(&self) -> f64 {
        if self.total_answered == 0 {
            0.0
        } else {
            f64::from(self.score) * 100.0 / f64::from(self.total_answered)
        }
    }
}

impl Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "得分: {}/{}", self.score, self.total_answered)
    }
}
