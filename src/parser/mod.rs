//! 题库文档解析器
//!
//! 题库来源是松散的段落文本，格式大致如下：
//!
//! ```text
//! 题干
//! A.选项一
//! B.选项二
//! 答案：B 解析：xxx
//! ```
//!
//! 解析分为两个可以单独测试的阶段：
//! 1. [`segment`] - 按"答案"行切分题目块
//! 2. [`extract`] - 从题目块中提取字段并校验
//!
//! 不完整的题目块会被跳过并记录原因，解析本身永远不会失败。

pub mod extract;
pub mod segment;

use thiserror::Error;
use tracing::{debug, warn};

use crate::models::{QuestionRecord, RecordDefect};
use crate::utils::logging::truncate_text;
use segment::Line;

/// 题目块被丢弃的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BlockDefect {
    #[error("缺少题干")]
    MissingQuestionText,
    #[error("答案行缺少答案字母")]
    MissingAnswerLetter,
    #[error("答案 {0} 不是单个字母")]
    MultiLetterAnswer(String),
    #[error("解析行没有对应的答案行")]
    OrphanExplanation,
    #[error("题目块缺少答案行")]
    Unterminated,
    #[error(transparent)]
    Invalid(#[from] RecordDefect),
}

/// 被跳过的题目块
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedBlock {
    /// 块的起始行号（从1开始）
    pub line: usize,
    /// 起始行的预览文本
    pub preview: String,
    pub defect: BlockDefect,
}

impl SkippedBlock {
    fn new(first: &Line, defect: BlockDefect) -> Self {
        Self {
            line: first.number,
            preview: truncate_text(&first.text, 30),
            defect,
        }
    }
}

/// 带诊断信息的解析结果
#[derive(Debug, Default)]
pub struct ParseReport {
    pub records: Vec<QuestionRecord>,
    /// 按行号排序的跳过记录
    pub skipped: Vec<SkippedBlock>,
}

/// 解析原始文本，只返回有效题目
pub fn parse(raw: &str) -> Vec<QuestionRecord> {
    parse_with_report(raw).records
}

/// 解析原始文本，同时返回被跳过的题目块
pub fn parse_with_report(raw: &str) -> ParseReport {
    let segmentation = segment::segment(segment::collapse_lines(raw));
    let mut report = ParseReport {
        records: Vec::with_capacity(segmentation.blocks.len()),
        skipped: segmentation.skipped,
    };

    for block in &segmentation.blocks {
        match extract::extract(block) {
            Ok(record) => report.records.push(record),
            Err(defect) => {
                let first = block.body.first().unwrap_or(&block.answer);
                report.skipped.push(SkippedBlock::new(first, defect));
            }
        }
    }

    report.skipped.sort_by_key(|s| s.line);
    for skipped in &report.skipped {
        warn!(
            "题目解析不完整 (第 {} 行): {} [{}]",
            skipped.line, skipped.preview, skipped.defect
        );
    }
    debug!(
        "解析完成: {} 道有效题目, 跳过 {} 块",
        report.records.len(),
        report.skipped.len()
    );

    report
}
