//! # Quiz Drill
//!
//! 一个计时刷题程序：从松散格式的题库文本中解析选择题，
//! 逐题限时作答、计分，并把答错或超时的题目连同笔记记入错题本。
//!
//! ## 架构设计
//!
//! ### ① 数据层（Models / Parser）
//! - `models/` - `QuestionRecord`、`MistakeRecord` 以及文档读取
//! - `parser/` - 两阶段解析：按答案行分块 → 提取并校验字段
//!
//! ### ② 业务能力层（Services / Timer）
//! - `services/` - 描述"我能做什么"
//! - `QuestionBank` - 随机抽题（每题重新加载 / 只解析一次）
//! - `MistakeLog` - 追加写错题本
//! - `Encouragement` - 随机鼓励话语
//! - `timer/` - 可取消倒计时与节拍源
//!
//! ### ③ 流程层（Workflow）
//! - `workflow/` - `QuizSession` 状态机：出题 → 作答/超时 → 笔记 → 下一题
//!
//! ### ④ 编排层（Orchestration）
//! - `orchestrator/` - 终端界面，把输入和节拍交给会话并渲染结果
//!
//! ## 模块结构

pub mod config;
pub mod error;
pub mod logger;
pub mod models;
pub mod orchestrator;
pub mod parser;
pub mod services;
pub mod timer;
pub mod utils;
pub mod workflow;

// 重新导出常用类型
pub use config::Config;
pub use error::{AppError, AppResult, BankError, PersistenceError, SessionError};
pub use models::{MistakeRecord, QuestionOption, QuestionRecord};
pub use orchestrator::App;
pub use parser::{parse, parse_with_report, ParseReport};
pub use services::{DrawPolicy, Encouragement, FileSource, MistakeLog, QuestionBank, TextSource};
pub use timer::{Countdown, CountdownEvent, CountdownHandle, Ticker};
pub use workflow::{MistakeWrite, Outcome, QuizSession, QuizState, SessionSummary, SessionTick};
