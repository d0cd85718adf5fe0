//! 第一阶段：分块
//!
//! 把原始文本切成非空行，再以"答案"行为界切成题目块。
//! 本阶段只看标签位置，不关心块内字段是否完整。

use regex::Regex;
use std::mem;
use std::sync::LazyLock;

use crate::parser::{BlockDefect, SkippedBlock};

static ANSWER_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"答案[：:]").expect("valid answer tag regex"));

/// 答案标签后必须紧跟（可隔空白）一个字母，题干里的"答案："不算
static ANSWER_MARKER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(答案[：:])\s*[A-Za-z]").expect("valid answer marker regex")
});

static EXPLANATION_LINE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^解析[：:]").expect("valid explanation line regex"));

/// 文档中的一个非空行
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Line {
    /// 原文中的行号（从1开始）
    pub number: usize,
    pub text: String,
}

/// 以答案行结尾的题目块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawBlock {
    /// 题干、选项以及其他未识别的行
    pub body: Vec<Line>,
    /// 答案行
    pub answer: Line,
    /// 紧跟在答案行后面的解析行
    pub explanation: Option<Line>,
}

impl RawBlock {
    /// 块在原文中的起始行号
    pub fn start_line(&self) -> usize {
        self.body.first().map_or(self.answer.number, |l| l.number)
    }
}

/// 分块结果
#[derive(Debug, Default)]
pub struct Segmentation {
    pub blocks: Vec<RawBlock>,
    pub skipped: Vec<SkippedBlock>,
}

/// 是否为答案行（行内出现答案标签且其后是一个字母）
pub fn is_answer_marker(text: &str) -> bool {
    ANSWER_MARKER.is_match(text)
}

/// 是否为独立的解析行
pub fn is_explanation_line(text: &str) -> bool {
    EXPLANATION_LINE.is_match(text)
}

/// 答案标签之后的文本
///
/// 优先取后面跟着字母的那个标签。
pub fn after_answer_tag(text: &str) -> Option<&str> {
    ANSWER_MARKER
        .captures(text)
        .and_then(|caps| caps.get(1))
        .or_else(|| ANSWER_TAG.find(text))
        .map(|m| &text[m.end()..])
}

/// 将原文折叠为去除首尾空白的非空行
pub fn collapse_lines(raw: &str) -> Vec<Line> {
    raw.lines()
        .enumerate()
        .filter_map(|(idx, line)| {
            let text = line.trim();
            (!text.is_empty()).then(|| Line {
                number: idx + 1,
                text: text.to_string(),
            })
        })
        .collect()
}

/// 按答案行切分题目块
pub fn segment(lines: Vec<Line>) -> Segmentation {
    let mut result = Segmentation::default();
    let mut body: Vec<Line> = Vec::new();
    let mut lines = lines.into_iter().peekable();

    while let Some(line) = lines.next() {
        if is_answer_marker(&line.text) {
            let explanation = lines
                .next_if(|next| is_explanation_line(&next.text) && !is_answer_marker(&next.text));
            result.blocks.push(RawBlock {
                body: mem::take(&mut body),
                answer: line,
                explanation,
            });
        } else if is_explanation_line(&line.text) {
            result
                .skipped
                .push(SkippedBlock::new(&line, BlockDefect::OrphanExplanation));
        } else {
            body.push(line);
        }
    }

    if let Some(first) = body.first() {
        result
            .skipped
            .push(SkippedBlock::new(first, BlockDefect::Unterminated));
    }

    result
}
