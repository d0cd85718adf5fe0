//! 编排层（Orchestration Layer）
//!
//! ## 职责
//!
//! 本层是答题会话的"界面层"，负责把用户输入和计时节拍转交给会话，
//! 再把会话状态渲染到终端。
//!
//! ## 模块划分
//!
//! ### `terminal_app` - 终端答题程序
//! - 创建题库、错题本、鼓励话语和会话
//! - 在单个任务中用 `select!` 交替处理输入与节拍
//!
//! ### `presenter` - 展示文本
//! - 题目、结果、得分、错题本的文字渲染
//!
//! ## 层次关系
//!
//! ```text
//! orchestrator::App (输入 + 节拍)
//!     ↓
//! workflow::QuizSession (状态机)
//!     ↓
//! services (题库 / 错题本 / 鼓励话语)  +  timer (倒计时)
//!     ↓
//! parser + models
//! ```

pub mod presenter;
pub mod terminal_app;

pub use terminal_app::App;
