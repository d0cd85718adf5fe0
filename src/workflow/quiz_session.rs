//! 答题会话 - 流程层
//!
//! 核心职责：定义"一道题"从出题到记录错题的完整状态流转
//!
//! ```text
//! Idle ──present──▶ AwaitingAnswer ──submit_answer / 超时──▶ Revealed
//!   ▲                      ▲                                   │
//!   └── start              └───────────── advance ─────────────┘
//! ```
//!
//! 用户操作（作答、提交笔记、下一题）在不允许的状态下返回
//! [`SessionError::InvalidTransition`]；计时器事件（节拍、超时）
//! 在不允许的状态下静默忽略，先到达的事件生效。

use tracing::{debug, info, warn};

use crate::error::{AppError, BankError, PersistenceError, SessionError};
use crate::models::{is_option_letter, MistakeRecord, QuestionRecord};
use crate::services::{MistakeLog, QuestionBank};
use crate::timer::{Countdown, CountdownEvent, CountdownHandle};
use crate::utils::logging::truncate_text;
use crate::workflow::quiz_state::{
    MistakeWrite, Outcome, QuizState, SessionSummary, SessionTick,
};

/// 答题会话
///
/// - 单一所有者，所有操作都通过 `&mut self` 顺序执行
/// - 持有题库、错题本和倒计时
/// - 不负责任何展示，界面层在每次调用后读取状态自行渲染
pub struct QuizSession {
    bank: QuestionBank,
    mistake_log: MistakeLog,
    countdown: Countdown,
    countdown_handle: Option<CountdownHandle>,
    time_limit_secs: u32,
    state: QuizState,
    current_question: Option<QuestionRecord>,
    score: u32,
    total_answered: u32,
    remaining_seconds: u32,
    note_required: bool,
    pending_note: String,
}

impl QuizSession {
    /// 创建新的答题会话
    pub fn new(bank: QuestionBank, mistake_log: MistakeLog, time_limit_secs: u32) -> Self {
        Self {
            bank,
            mistake_log,
            countdown: Countdown::new(),
            countdown_handle: None,
            time_limit_secs,
            state: QuizState::Idle,
            current_question: None,
            score: 0,
            total_answered: 0,
            remaining_seconds: time_limit_secs,
            note_required: false,
            pending_note: String::new(),
        }
    }

    /// 抽取第一道题并开始作答
    pub fn start(&mut self) -> Result<&QuestionRecord, BankError> {
        let record = self.bank.draw()?;
        Ok(self.present_question(record))
    }

    /// 展示一道题，任何状态下都可调用
    pub fn present_question(&mut self, record: QuestionRecord) -> &QuestionRecord {
        self.cancel_countdown();
        self.remaining_seconds = self.time_limit_secs;
        self.note_required = false;
        self.pending_note.clear();

        info!(
            "📝 出题: {} ({} 个选项, 限时 {} 秒)",
            truncate_text(record.question(), 40),
            record.options().len(),
            self.time_limit_secs
        );

        self.countdown_handle = Some(self.countdown.start(self.time_limit_secs));
        self.state = QuizState::AwaitingAnswer;
        self.current_question.insert(record)
    }

    /// 提交答案
    ///
    /// A-D 以外的字母返回 [`SessionError::UnknownOption`]，状态不变。
    pub fn submit_answer(&mut self, letter: char) -> Result<Outcome, SessionError> {
        if self.state != QuizState::AwaitingAnswer {
            return Err(self.invalid_transition("提交答案"));
        }
        let question = self
            .current_question
            .as_ref()
            .ok_or_else(|| self.invalid_transition("提交答案"))?;
        if !is_option_letter(letter) {
            return Err(SessionError::UnknownOption { letter });
        }
        // A-D 中题目未列出的字母按答错处理
        let is_correct = letter == question.correct_letter();

        self.cancel_countdown();
        self.total_answered += 1;
        let outcome = if is_correct {
            self.score += 1;
            Outcome::Correct
        } else {
            self.note_required = true;
            Outcome::Incorrect
        };
        self.state = QuizState::Revealed(outcome);

        info!(
            "作答 {} → {} | 得分: {}/{}",
            letter, outcome, self.score, self.total_answered
        );
        Ok(outcome)
    }

    /// 投递一个外部节拍
    ///
    /// 没有活动倒计时时返回 `None`；倒计时归零时触发 [`QuizSession::on_timeout`]。
    pub fn tick(&mut self) -> Option<SessionTick> {
        let event = self.countdown.tick()?;
        match event {
            CountdownEvent::Tick { handle, remaining } if self.countdown_handle == Some(handle) => {
                self.remaining_seconds = remaining;
                Some(SessionTick::Remaining(remaining))
            }
            CountdownEvent::Timeout { handle } if self.countdown_handle == Some(handle) => {
                self.remaining_seconds = 0;
                self.on_timeout().map(|_| SessionTick::TimedOut)
            }
            stale => {
                debug!("忽略过期的倒计时事件: {:?}", stale);
                None
            }
        }
    }

    /// 超时处理，只在等待作答时生效
    pub fn on_timeout(&mut self) -> Option<Outcome> {
        if self.state != QuizState::AwaitingAnswer {
            debug!("超时事件到达时状态为 [{}]，忽略", self.state);
            return None;
        }

        self.cancel_countdown();
        self.remaining_seconds = 0;
        self.total_answered += 1;
        self.note_required = true;
        self.state = QuizState::Revealed(Outcome::Timeout);

        info!(
            "⏰ 时间到，未作答 | 得分: {}/{}",
            self.score, self.total_answered
        );
        Some(Outcome::Timeout)
    }

    /// 提交笔记并记录错题
    ///
    /// 写入失败时保留笔记，`advance` 会再次尝试写入。
    pub fn submit_note(&mut self, text: &str) -> Result<(), AppError> {
        if !matches!(self.state, QuizState::Revealed(_)) || !self.note_required {
            return Err(self.invalid_transition("提交笔记").into());
        }
        self.pending_note = text.trim().to_string();
        self.write_mistake()?;
        Ok(())
    }

    /// 进入下一题
    ///
    /// 尚未记录的错题先以当前笔记（可能为空）写入错题本；
    /// 写入失败不会阻止进入下一题。题库为空时保持当前状态并返回错误，
    /// 若此时写入也失败，两个错误一并返回（[`AppError::AdvanceBlocked`]）。
    pub fn advance(&mut self) -> Result<MistakeWrite, AppError> {
        if !matches!(self.state, QuizState::Revealed(_)) {
            return Err(self.invalid_transition("进入下一题").into());
        }

        let write = if self.note_required {
            match self.write_mistake() {
                Ok(()) => MistakeWrite::Written,
                Err(e) => MistakeWrite::Failed(e),
            }
        } else {
            MistakeWrite::NotRequired
        };

        let record = match self.bank.draw() {
            Ok(record) => record,
            Err(bank) => {
                return Err(match write {
                    MistakeWrite::Failed(mistake) => AppError::AdvanceBlocked { bank, mistake },
                    _ => bank.into(),
                })
            }
        };
        self.present_question(record);
        Ok(write)
    }

    /// 结束会话，取消倒计时并返回统计
    pub fn finish(mut self) -> SessionSummary {
        self.cancel_countdown();
        let summary = self.summary();
        info!("会话结束 | {}", summary);
        summary
    }

    pub fn summary(&self) -> SessionSummary {
        SessionSummary {
            score: self.score,
            total_answered: self.total_answered,
        }
    }

    // ========== 状态读取 ==========

    pub fn state(&self) -> QuizState {
        self.state
    }

    pub fn current_question(&self) -> Option<&QuestionRecord> {
        self.current_question.as_ref()
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    pub fn total_answered(&self) -> u32 {
        self.total_answered
    }

    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    pub fn note_required(&self) -> bool {
        self.note_required
    }

    pub fn pending_note(&self) -> &str {
        &self.pending_note
    }

    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    pub fn mistake_log(&self) -> &MistakeLog {
        &self.mistake_log
    }

    pub fn bank(&self) -> &QuestionBank {
        &self.bank
    }

    /// 界面层可借此重新加载题库
    pub fn bank_mut(&mut self) -> &mut QuestionBank {
        &mut self.bank
    }

    // ========== 内部方法 ==========

    fn cancel_countdown(&mut self) {
        if let Some(handle) = self.countdown_handle.take() {
            if self.countdown.cancel(handle) {
                debug!("已取消倒计时 {:?}", handle);
            }
        }
    }

    fn write_mistake(&mut self) -> Result<(), PersistenceError> {
        let Some(question) = self.current_question.as_ref() else {
            return Ok(());
        };
        let record = MistakeRecord::from_question(question, &self.pending_note);

        match self.mistake_log.append(&record) {
            Ok(()) => {
                self.note_required = false;
                info!(
                    "📒 已记录错题: {}{}",
                    truncate_text(question.question(), 30),
                    if record.note.is_some() { " (含笔记)" } else { "" }
                );
                Ok(())
            }
            Err(e) => {
                warn!("⚠️ 记录错题失败: {}", e);
                Err(e)
            }
        }
    }

    fn invalid_transition(&self, action: &'static str) -> SessionError {
        SessionError::InvalidTransition {
            action,
            state: self.state,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{DrawPolicy, TextSource};
    use tempfile::TempDir;

    const BANK: &str = "\
What is 2+2?
A.3
B.4
C.5
D.6
答案：B
解析：because 2+2 equals 4
";

    fn session_in(dir: &TempDir, raw: &str, time_limit: u32) -> QuizSession {
        let bank = QuestionBank::new(TextSource::new(raw), DrawPolicy::ParseOnce);
        let log = MistakeLog::new(dir.path().join("mistakes.txt"));
        QuizSession::new(bank, log, time_limit)
    }

    fn started(dir: &TempDir) -> QuizSession {
        let mut session = session_in(dir, BANK, 30);
        session.start().unwrap();
        session
    }

    #[test]
    fn test_start_presents_question() {
        let dir = TempDir::new().unwrap();
        let session = started(&dir);
        assert_eq!(session.state(), QuizState::AwaitingAnswer);
        assert_eq!(session.remaining_seconds(), 30);
        assert_eq!(session.current_question().unwrap().question(), "What is 2+2?");
    }

    #[test]
    fn test_start_on_empty_bank_stays_idle() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, "", 30);
        assert!(matches!(session.start(), Err(BankError::Empty)));
        assert_eq!(session.state(), QuizState::Idle);
    }

    #[test]
    fn test_correct_answer() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);

        assert_eq!(session.submit_answer('B').unwrap(), Outcome::Correct);
        assert_eq!(session.score(), 1);
        assert_eq!(session.total_answered(), 1);
        assert!(!session.note_required());
        assert_eq!(session.state(), QuizState::Revealed(Outcome::Correct));
    }

    #[test]
    fn test_incorrect_answer_requires_note() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);

        assert_eq!(session.submit_answer('D').unwrap(), Outcome::Incorrect);
        assert_eq!(session.score(), 0);
        assert_eq!(session.total_answered(), 1);
        assert!(session.note_required());
    }

    #[test]
    fn test_letter_outside_alphabet_is_rejected_without_state_change() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, "题\nA.1\nB.2\n答案：A\n", 30);
        session.start().unwrap();

        for letter in ['E', 'a', '1'] {
            assert!(matches!(
                session.submit_answer(letter),
                Err(SessionError::UnknownOption { .. })
            ));
        }
        assert_eq!(session.state(), QuizState::AwaitingAnswer);
        assert_eq!(session.total_answered(), 0);
    }

    #[test]
    fn test_unlisted_letter_counts_as_incorrect() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, "题\nA.1\nB.2\n答案：A\n", 30);
        session.start().unwrap();

        assert_eq!(session.submit_answer('C').unwrap(), Outcome::Incorrect);
        assert_eq!(session.score(), 0);
        assert_eq!(session.total_answered(), 1);
        assert!(session.note_required());
        assert_eq!(session.state(), QuizState::Revealed(Outcome::Incorrect));
    }

    #[test]
    fn test_second_answer_is_invalid_transition() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);
        session.submit_answer('B').unwrap();

        assert!(matches!(
            session.submit_answer('B'),
            Err(SessionError::InvalidTransition { .. })
        ));
        assert_eq!(session.score(), 1);
        assert_eq!(session.total_answered(), 1);
    }

    #[test]
    fn test_answer_before_start_is_invalid() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, BANK, 30);
        assert!(matches!(
            session.submit_answer('A'),
            Err(SessionError::InvalidTransition {
                state: QuizState::Idle,
                ..
            })
        ));
    }

    #[test]
    fn test_countdown_ticks_to_timeout() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, BANK, 3);
        session.start().unwrap();

        assert_eq!(session.tick(), Some(SessionTick::Remaining(2)));
        assert_eq!(session.remaining_seconds(), 2);
        assert_eq!(session.tick(), Some(SessionTick::Remaining(1)));
        assert_eq!(session.tick(), Some(SessionTick::TimedOut));

        assert_eq!(session.state(), QuizState::Revealed(Outcome::Timeout));
        assert_eq!(session.score(), 0);
        assert_eq!(session.total_answered(), 1);
        assert!(session.note_required());
        assert_eq!(session.tick(), None);
    }

    #[test]
    fn test_timeout_after_answer_has_no_effect() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);
        session.submit_answer('B').unwrap();

        assert_eq!(session.on_timeout(), None);
        assert_eq!(session.tick(), None);
        assert_eq!(session.state(), QuizState::Revealed(Outcome::Correct));
        assert_eq!(session.total_answered(), 1);
        assert!(!session.note_required());
    }

    #[test]
    fn test_answer_after_timeout_is_rejected() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);
        assert_eq!(session.on_timeout(), Some(Outcome::Timeout));

        assert!(session.submit_answer('B').is_err());
        assert_eq!(session.score(), 0);
        assert_eq!(session.total_answered(), 1);
    }

    #[test]
    fn test_submit_note_writes_once() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);
        session.submit_answer('A').unwrap();

        session.submit_note("  remember addition ").unwrap();
        assert!(!session.note_required());

        assert!(matches!(
            session.submit_note("again"),
            Err(AppError::Session(SessionError::InvalidTransition { .. }))
        ));
        assert!(matches!(session.advance(), Ok(MistakeWrite::NotRequired)));

        let log = session.mistake_log().read_all().unwrap();
        assert_eq!(log.matches("题目:").count(), 1);
        assert!(log.contains("用户笔记: remember addition\n"));
    }

    #[test]
    fn test_note_not_accepted_after_correct_answer() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);
        session.submit_answer('B').unwrap();
        assert!(session.submit_note("x").is_err());
        assert_eq!(session.mistake_log().read_all().unwrap(), "");
    }

    #[test]
    fn test_advance_logs_skipped_note_with_empty_note() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);
        session.on_timeout();

        assert!(matches!(session.advance(), Ok(MistakeWrite::Written)));
        assert_eq!(session.state(), QuizState::AwaitingAnswer);
        assert!(!session.note_required());

        let log = session.mistake_log().read_all().unwrap();
        assert_eq!(log.matches("题目: What is 2+2?").count(), 1);
        assert!(!log.contains("用户笔记"));
    }

    #[test]
    fn test_advance_requires_revealed_state() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);
        assert!(matches!(
            session.advance(),
            Err(AppError::Session(SessionError::InvalidTransition { .. }))
        ));
    }

    #[test]
    fn test_advance_resets_question_state() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, BANK, 5);
        session.start().unwrap();
        session.tick();
        session.submit_answer('C').unwrap();

        session.advance().unwrap();
        assert_eq!(session.state(), QuizState::AwaitingAnswer);
        assert_eq!(session.remaining_seconds(), 5);
        assert_eq!(session.pending_note(), "");
        assert_eq!(session.tick(), Some(SessionTick::Remaining(4)));
        assert_eq!(session.total_answered(), 1);
    }

    #[test]
    fn test_advance_on_emptied_bank_keeps_state() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);
        session.submit_answer('B').unwrap();

        assert!(session.bank_mut().reload("").is_err());
        let err = session.advance().unwrap_err();
        assert!(err.is_empty_bank());
        assert_eq!(session.state(), QuizState::Revealed(Outcome::Correct));
    }

    #[test]
    fn test_persistence_failure_does_not_roll_back() {
        let dir = TempDir::new().unwrap();
        let bank = QuestionBank::new(TextSource::new(BANK), DrawPolicy::ParseOnce);
        // 目录不能作为文件追加写入
        let mut session = QuizSession::new(bank, MistakeLog::new(dir.path()), 30);
        session.start().unwrap();
        session.submit_answer('A').unwrap();

        assert!(matches!(
            session.submit_note("keep me"),
            Err(AppError::Persistence(_))
        ));
        assert!(session.note_required());
        assert_eq!(session.pending_note(), "keep me");
        assert_eq!(session.total_answered(), 1);

        assert!(matches!(session.advance(), Ok(MistakeWrite::Failed(_))));
        assert_eq!(session.state(), QuizState::AwaitingAnswer);
        assert_eq!(session.total_answered(), 1);
    }

    #[test]
    fn test_empty_bank_and_failed_write_are_both_reported() {
        let dir = TempDir::new().unwrap();
        let bank = QuestionBank::new(TextSource::new(BANK), DrawPolicy::ParseOnce);
        let mut session = QuizSession::new(bank, MistakeLog::new(dir.path()), 30);
        session.start().unwrap();
        session.submit_answer('A').unwrap();

        assert!(session.bank_mut().reload("").is_err());
        let err = session.advance().unwrap_err();
        assert!(matches!(err, AppError::AdvanceBlocked { .. }));
        assert!(err.is_empty_bank());
        assert!(err.persistence_failure().is_some());
        assert!(session.note_required());
        assert_eq!(session.state(), QuizState::Revealed(Outcome::Incorrect));
    }

    #[test]
    fn test_present_question_cancels_live_countdown() {
        let dir = TempDir::new().unwrap();
        let mut session = session_in(&dir, BANK, 2);
        session.start().unwrap();
        session.tick();

        let record = session.current_question().cloned().unwrap();
        session.present_question(record);
        assert_eq!(session.tick(), Some(SessionTick::Remaining(1)));
        assert_eq!(session.tick(), Some(SessionTick::TimedOut));
    }

    #[test]
    fn test_finish_reports_summary() {
        let dir = TempDir::new().unwrap();
        let mut session = started(&dir);
        session.submit_answer('B').unwrap();
        session.advance().unwrap();
        session.submit_answer('A').unwrap();

        let summary = session.finish();
        assert_eq!(
            summary,
            SessionSummary {
                score: 1,
                total_answered: 2
            }
        );
        assert_eq!(summary.to_string(), "得分: 1/2");
        assert!((summary.accuracy() - 50.0).abs() < f64::EPSILON);
    }
}
