//! 终端展示文本
//!
//! 只把会话状态转换成文字，不修改任何状态。

use rand::Rng;

use crate::models::QuestionRecord;
use crate::workflow::{Outcome, SessionSummary};

/// 错题本为空时的提示
pub const EMPTY_MISTAKE_BOOK: &str = "错题本为空，继续努力！";

/// 渲染题干和选项
pub fn render_question<R: Rng + ?Sized>(
    record: &QuestionRecord,
    shuffle: bool,
    rng: &mut R,
) -> String {
    let options = if shuffle {
        record.shuffled_options(rng)
    } else {
        record.options().iter().collect()
    };

    let mut text = format!("【题目】{}\n", record.question());
    for option in options {
        text.push_str(&format!("  {}\n", option));
    }
    text
}

/// 渲染作答结果
///
/// `encouragement` 只在答错时展示，为空则省略。
pub fn render_outcome(outcome: Outcome, record: &QuestionRecord, encouragement: &str) -> String {
    match outcome {
        Outcome::Correct => format!("正确！\n\n解析：{}", record.explanation()),
        Outcome::Incorrect => {
            let mut text = format!(
                "错误！正确答案是：{}\n\n解析：{}",
                record.correct_letter(),
                record.explanation()
            );
            if !encouragement.is_empty() {
                text.push_str(&format!("\n\n鼓励：{}", encouragement));
            }
            text
        }
        Outcome::Timeout => format!(
            "时间到！未作答。正确答案是：{}\n\n解析：{}",
            record.correct_letter(),
            record.explanation()
        ),
    }
}

pub fn render_score(summary: &SessionSummary) -> String {
    summary.to_string()
}

pub fn render_remaining(secs: u32) -> String {
    format!("剩余时间: {}秒", secs)
}

/// 是否需要提示剩余时间：整十秒以及最后五秒
pub fn should_announce(remaining: u32) -> bool {
    remaining % 10 == 0 || remaining <= 5
}

/// 渲染错题本内容
pub fn render_mistake_book(content: &str) -> String {
    if content.trim().is_empty() {
        EMPTY_MISTAKE_BOOK.to_string()
    } else {
        content.to_string()
    }
}
