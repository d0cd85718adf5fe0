//! 终端答题程序 - 编排层
//!
//! ## 职责
//!
//! 1. **应用初始化**：创建题库、错题本、鼓励话语和答题会话
//! 2. **事件循环**：在同一个任务里交替处理键盘输入和倒计时节拍
//! 3. **展示**：每次调用会话后读取状态并输出到终端
//!
//! 本模块不包含任何答题规则，所有状态变化都委托给 [`QuizSession`]。

use anyhow::{Context, Result};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{info, warn};

use crate::config::Config;
use crate::error::{AppError, SessionError};
use crate::orchestrator::presenter;
use crate::services::{Encouragement, FileSource, MistakeLog, QuestionBank};
use crate::timer::Ticker;
use crate::utils::logging::{log_bank_loaded, log_startup, print_final_stats};
use crate::workflow::{MistakeWrite, Outcome, QuizSession, QuizState, SessionTick};

/// 输入处理后是否继续
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Flow {
    Continue,
    Quit,
}

/// 应用主结构
pub struct App {
    config: Config,
    session: QuizSession,
    encouragement: Encouragement,
}

impl App {
    /// 初始化应用
    pub fn initialize(config: Config) -> Result<Self> {
        log_startup(&config);

        if !config.questions_file.exists() {
            anyhow::bail!("题库文件不存在: {}", config.questions_file.display());
        }

        let bank = QuestionBank::new(
            FileSource::new(&config.questions_file),
            config.draw_policy,
        );
        let mistake_log = MistakeLog::new(&config.mistakes_file);
        let encouragement = Encouragement::load(&config.encouragement_file);
        let session = QuizSession::new(bank, mistake_log, config.time_limit_secs);

        Ok(Self {
            config,
            session,
            encouragement,
        })
    }

    /// 运行答题循环，直到用户退出或输入结束
    pub async fn run(mut self) -> Result<()> {
        self.session
            .start()
            .context("题库中没有题目，请检查题库文件是否正确")?;
        log_bank_loaded(self.session.bank().len(), self.encouragement.len());

        print_help();
        self.show_question();

        let mut ticker = Ticker::spawn(Duration::from_secs(1));
        let mut lines = BufReader::new(tokio::io::stdin()).lines();

        loop {
            tokio::select! {
                line = lines.next_line() => {
                    let Some(input) = line.context("读取输入失败")? else {
                        info!("输入结束，退出");
                        break;
                    };
                    if self.handle_input(input.trim(), &mut ticker) == Flow::Quit {
                        break;
                    }
                }
                Some(()) = ticker.tick() => self.handle_tick(),
            }
        }

        drop(ticker);
        let mistakes_path = self.config.mistakes_file.clone();
        let summary = self.session.finish();
        println!("\n{}", presenter::render_score(&summary));
        print_final_stats(&summary, &mistakes_path);
        Ok(())
    }

    fn handle_input(&mut self, input: &str, ticker: &mut Ticker) -> Flow {
        match input {
            "q" | "Q" => return Flow::Quit,
            "m" | "M" => {
                self.show_mistake_book();
                return Flow::Continue;
            }
            _ => {}
        }

        match self.session.state() {
            QuizState::AwaitingAnswer => self.handle_answer(input),
            QuizState::Revealed(_) if input.eq_ignore_ascii_case("n") => self.handle_advance(ticker),
            QuizState::Revealed(_) if input.is_empty() => {}
            QuizState::Revealed(_) if self.session.note_required() => self.handle_note(input),
            QuizState::Revealed(_) => println!("输入 n 进入下一题"),
            QuizState::Idle => println!("题库中没有题目，输入 q 退出"),
        }
        Flow::Continue
    }

    fn handle_answer(&mut self, input: &str) {
        let mut chars = input.chars();
        let letter = match (chars.next(), chars.next()) {
            (Some(c), None) => c.to_ascii_uppercase(),
            _ => {
                println!("请输入选项字母 (A-D)");
                return;
            }
        };

        match self.session.submit_answer(letter) {
            Ok(outcome) => self.show_outcome(outcome),
            Err(SessionError::UnknownOption { letter }) => {
                println!("{} 不是有效选项，请输入 A-D", letter)
            }
            Err(e) => warn!("{}", e),
        }
    }

    fn handle_note(&mut self, note: &str) {
        match self.session.submit_note(note) {
            Ok(()) => println!("✓ 笔记已记录到错题本，输入 n 进入下一题"),
            Err(AppError::Persistence(e)) => {
                println!("⚠️ {}\n笔记已保留，进入下一题时会再次尝试写入", e)
            }
            Err(e) => warn!("{}", e),
        }
    }

    fn handle_advance(&mut self, ticker: &mut Ticker) {
        match self.session.advance() {
            Ok(write) => {
                if let MistakeWrite::Failed(e) = write {
                    println!("⚠️ {}", e);
                }
                ticker.restart();
                self.show_question();
            }
            Err(e) if e.is_empty_bank() => {
                if let Some(failure) = e.persistence_failure() {
                    println!("⚠️ {}", failure);
                }
                println!("题库中没有题目，请检查题库文件是否正确（输入 q 退出）")
            }
            Err(e) => println!("⚠️ {}", e),
        }
    }

    fn handle_tick(&mut self) {
        match self.session.tick() {
            Some(SessionTick::Remaining(secs)) if presenter::should_announce(secs) => {
                println!("{}", presenter::render_remaining(secs))
            }
            Some(SessionTick::TimedOut) => self.show_outcome(Outcome::Timeout),
            _ => {}
        }
    }

    // ========== 展示辅助方法 ==========

    fn show_question(&self) {
        let Some(record) = self.session.current_question() else {
            return;
        };
        println!("\n{}", "─".repeat(40));
        println!("{}", presenter::render_remaining(self.session.remaining_seconds()));
        print!(
            "{}",
            presenter::render_question(record, self.config.shuffle_options, &mut rand::thread_rng())
        );
        println!("请输入答案字母：");
    }

    fn show_outcome(&self, outcome: Outcome) {
        let Some(record) = self.session.current_question() else {
            return;
        };
        let encouragement = if outcome == Outcome::Incorrect {
            self.encouragement.pick_random()
        } else {
            String::new()
        };

        println!("\n{}", presenter::render_outcome(outcome, record, &encouragement));
        println!("{}", presenter::render_score(&self.session.summary()));
        if outcome.is_mistake() {
            println!("长长记性: 输入笔记后回车提交，或直接输入 n 跳过并进入下一题");
        } else {
            println!("输入 n 进入下一题");
        }
    }

    fn show_mistake_book(&self) {
        println!("\n========== 错题本 ==========");
        match self.session.mistake_log().read_all() {
            Ok(content) => println!("{}", presenter::render_mistake_book(&content)),
            Err(e) => println!("⚠️ {}", e),
        }
        println!("============================");
    }
}

fn print_help() {
    println!("输入 A-D 作答 | n 下一题 | m 查看错题本 | q 退出");
}
