use quiz_drill::{
    parse_with_report, DrawPolicy, FileSource, MistakeLog, MistakeWrite, Outcome, QuestionBank,
    QuizSession, QuizState, SessionTick, Ticker,
};
use std::fs;
use std::time::Duration;
use tempfile::TempDir;
use tokio_test::{assert_err, assert_ok};

const SINGLE_QUESTION: &str = "\
What is 2+2?
A.3
B.4
C.5
D.6
答案：B
解析：because 2+2 equals 4
";

/// 在临时目录中准备题库文件和错题本
fn setup(bank_text: &str, policy: DrawPolicy, time_limit: u32) -> (TempDir, QuizSession) {
    let dir = TempDir::new().expect("创建临时目录失败");
    let questions = dir.path().join("questions.txt");
    fs::write(&questions, bank_text).expect("写入题库失败");

    let bank = QuestionBank::new(FileSource::new(&questions), policy);
    let log = MistakeLog::new(dir.path().join("mistakes.txt"));
    (dir, QuizSession::new(bank, log, time_limit))
}

#[test]
fn test_end_to_end_incorrect_answer_with_note() {
    let (dir, mut session) = setup(SINGLE_QUESTION, DrawPolicy::ReloadEachDraw, 30);

    assert_ok!(session.start());
    assert_eq!(session.submit_answer('D').unwrap(), Outcome::Incorrect);
    assert_eq!(session.score(), 0);
    assert_eq!(session.total_answered(), 1);
    assert!(session.note_required());

    assert_ok!(session.submit_note("remember addition"));
    let log = session.mistake_log().read_all().unwrap();
    assert_eq!(log.matches("题目: What is 2+2?").count(), 1);
    assert!(log.contains("选项: A.3, B.4, C.5, D.6\n"));
    assert!(log.contains("正确答案: B\n"));
    assert!(log.contains("解析: because 2+2 equals 4\n"));
    assert!(log.contains("用户笔记: remember addition\n"));

    // 题库没有补充新题
    fs::write(dir.path().join("questions.txt"), "").unwrap();
    let err = assert_err!(session.advance());
    assert!(err.is_empty_bank());
    assert_eq!(session.state(), QuizState::Revealed(Outcome::Incorrect));

    // 错题只记录一次
    let log = session.mistake_log().read_all().unwrap();
    assert_eq!(log.matches("题目:").count(), 1);
}

#[test]
fn test_skipped_note_is_logged_before_next_question() {
    let (dir, mut session) = setup(SINGLE_QUESTION, DrawPolicy::ParseOnce, 30);

    session.start().unwrap();
    session.submit_answer('A').unwrap();
    assert!(matches!(session.advance(), Ok(MistakeWrite::Written)));
    assert_eq!(session.state(), QuizState::AwaitingAnswer);

    let log = fs::read_to_string(dir.path().join("mistakes.txt")).unwrap();
    assert_eq!(log.matches("题目:").count(), 1);
    assert!(!log.contains("用户笔记"));
}

#[test]
fn test_missing_question_file_prevents_start() {
    let dir = TempDir::new().unwrap();
    let bank = QuestionBank::new(
        FileSource::new(dir.path().join("missing.txt")),
        DrawPolicy::ReloadEachDraw,
    );
    let mut session = QuizSession::new(bank, MistakeLog::new(dir.path().join("m.txt")), 30);

    assert_err!(session.start());
    assert_eq!(session.state(), QuizState::Idle);
}

#[test]
fn test_report_lists_dropped_blocks() {
    let raw = format!("{}坏题\nA.1\n答案：\n", SINGLE_QUESTION);
    let report = parse_with_report(&raw);
    assert_eq!(report.records.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].line, 8);
    assert_eq!(report.skipped[0].preview, "坏题");
}

#[tokio::test(start_paused = true)]
async fn test_ticker_drives_session_to_timeout() {
    let (_dir, mut session) = setup(SINGLE_QUESTION, DrawPolicy::ParseOnce, 3);
    session.start().unwrap();

    let mut ticker = Ticker::spawn(Duration::from_secs(1));
    let mut events = Vec::new();
    while session.state() == QuizState::AwaitingAnswer {
        ticker.tick().await.expect("节拍源意外关闭");
        events.extend(session.tick());
    }

    assert_eq!(
        events,
        vec![
            SessionTick::Remaining(2),
            SessionTick::Remaining(1),
            SessionTick::TimedOut
        ]
    );
    assert_eq!(session.state(), QuizState::Revealed(Outcome::Timeout));
    assert_eq!(session.total_answered(), 1);

    // 超时后到达的节拍没有任何效果
    ticker.tick().await.unwrap();
    assert_eq!(session.tick(), None);
    assert_eq!(session.total_answered(), 1);
}
