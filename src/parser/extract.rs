//! 第二阶段：字段提取
//!
//! 从单个题目块中取出题干、选项、答案和解析，并校验成 [`QuestionRecord`]。

use regex::Regex;
use std::sync::LazyLock;
use tracing::debug;

use crate::models::{QuestionOption, QuestionRecord, NO_EXPLANATION};
use crate::parser::segment::{after_answer_tag, RawBlock};
use crate::parser::BlockDefect;

static OPTION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^([A-D])\.(.*)$").expect("valid option regex"));

static EXPLANATION_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"解析[：:](.*)$").expect("valid explanation regex"));

/// 解析选项行，返回 (字母, 文本)
pub fn parse_option_line(text: &str) -> Option<QuestionOption> {
    let caps = OPTION_LINE.captures(text)?;
    let letter = caps.get(1)?.as_str().chars().next()?;
    Some(QuestionOption::new(letter, caps.get(2)?.as_str()))
}

/// 从答案行中提取唯一的答案字母
///
/// 标签后允许空白，之后必须是单个 ASCII 字母。
pub fn extract_answer_letter(answer_line: &str) -> Result<char, BlockDefect> {
    let rest = after_answer_tag(answer_line).ok_or(BlockDefect::MissingAnswerLetter)?;
    let mut chars = rest.trim_start().chars();

    let letter = match chars.next() {
        Some(c) if c.is_ascii_alphabetic() => c,
        _ => return Err(BlockDefect::MissingAnswerLetter),
    };
    if chars.next().is_some_and(|c| c.is_ascii_alphabetic()) {
        let answer: String = rest
            .trim_start()
            .chars()
            .take_while(char::is_ascii_alphabetic)
            .collect();
        return Err(BlockDefect::MultiLetterAnswer(answer));
    }

    Ok(letter)
}

/// 提取解析文本：先看答案行，再看紧随其后的解析行
pub fn extract_explanation(block: &RawBlock) -> String {
    let inline = after_answer_tag(&block.answer.text).and_then(capture_explanation);
    let following = block
        .explanation
        .as_ref()
        .and_then(|line| capture_explanation(&line.text));

    inline
        .or(following)
        .unwrap_or_else(|| NO_EXPLANATION.to_string())
}

fn capture_explanation(text: &str) -> Option<String> {
    let caps = EXPLANATION_TAG.captures(text)?;
    let explanation = caps.get(1)?.as_str().trim();
    (!explanation.is_empty()).then(|| explanation.to_string())
}

/// 将题目块转换为题目记录
pub fn extract(block: &RawBlock) -> Result<QuestionRecord, BlockDefect> {
    let (first, rest) = block
        .body
        .split_first()
        .ok_or(BlockDefect::MissingQuestionText)?;

    if parse_option_line(&first.text).is_some() {
        return Err(BlockDefect::MissingQuestionText);
    }

    let mut options: Vec<QuestionOption> = Vec::new();
    for line in rest {
        match parse_option_line(&line.text) {
            Some(option) if options.iter().any(|o| o.letter == option.letter) => {
                debug!(
                    "第 {} 行: 选项 {} 重复，保留第一次出现的内容",
                    line.number, option.letter
                );
            }
            Some(option) => options.push(option),
            None => debug!("第 {} 行: 非选项行，已忽略", line.number),
        }
    }

    let correct_letter = extract_answer_letter(&block.answer.text)?;
    let explanation = extract_explanation(block);

    Ok(QuestionRecord::new(
        first.text.clone(),
        options,
        correct_letter,
        explanation,
    )?)
}
