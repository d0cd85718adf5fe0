use rand::seq::SliceRandom;
use rand::Rng;
use std::fmt;
use thiserror::Error;

/// 选项字母表
pub const OPTION_LETTERS: [char; 4] = ['A', 'B', 'C', 'D'];

/// 题目缺少解析时使用的占位文本
pub const NO_EXPLANATION: &str = "无解析";

/// 判断字符是否属于选项字母表
pub fn is_option_letter(c: char) -> bool {
    OPTION_LETTERS.contains(&c)
}

/// 单个选项，例如 `A.3`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionOption {
    pub letter: char,
    pub text: String,
}

impl QuestionOption {
    pub fn new(letter: char, text: impl Into<String>) -> Self {
        Self {
            letter,
            text: text.into(),
        }
    }
}

impl fmt::Display for QuestionOption {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.letter, self.text)
    }
}

/// 题目记录校验失败的原因
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordDefect {
    #[error("缺少题干")]
    EmptyQuestionText,
    #[error("没有任何选项")]
    NoOptions,
    #[error("选项字母 {0} 不在 A-D 范围内")]
    OptionOutOfAlphabet(char),
    #[error("选项字母 {0} 重复")]
    DuplicateOption(char),
    #[error("答案 {0} 不在 A-D 范围内")]
    AnswerOutOfAlphabet(char),
    #[error("答案 {0} 不对应任何选项")]
    AnswerNotAmongOptions(char),
}

/// 一道完整的选择题
///
/// 构造后不可变：字段只能通过 [`QuestionRecord::new`] 一次性给出，
/// 校验不通过的题目不会被构造出来。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuestionRecord {
    question: String,
    options: Vec<QuestionOption>,
    correct_letter: char,
    explanation: String,
}

impl QuestionRecord {
    /// 校验并创建题目
    ///
    /// 空解析会被替换为 [`NO_EXPLANATION`]。
    pub fn new(
        question: impl Into<String>,
        options: Vec<QuestionOption>,
        correct_letter: char,
        explanation: impl Into<String>,
    ) -> Result<Self, RecordDefect> {
        let question = question.into();
        if question.trim().is_empty() {
            return Err(RecordDefect::EmptyQuestionText);
        }
        if options.is_empty() {
            return Err(RecordDefect::NoOptions);
        }

        let mut seen = Vec::with_capacity(options.len());
        for option in &options {
            if !is_option_letter(option.letter) {
                return Err(RecordDefect::OptionOutOfAlphabet(option.letter));
            }
            if seen.contains(&option.letter) {
                return Err(RecordDefect::DuplicateOption(option.letter));
            }
            seen.push(option.letter);
        }

        if !is_option_letter(correct_letter) {
            return Err(RecordDefect::AnswerOutOfAlphabet(correct_letter));
        }
        if !seen.contains(&correct_letter) {
            return Err(RecordDefect::AnswerNotAmongOptions(correct_letter));
        }

        let explanation = explanation.into();
        let explanation = if explanation.trim().is_empty() {
            NO_EXPLANATION.to_string()
        } else {
            explanation
        };

        Ok(Self {
            question,
            options,
            correct_letter,
            explanation,
        })
    }

    pub fn question(&self) -> &str {
        &self.question
    }

    pub fn options(&self) -> &[QuestionOption] {
        &self.options
    }

    pub fn correct_letter(&self) -> char {
        self.correct_letter
    }

    pub fn explanation(&self) -> &str {
        &self.explanation
    }

    /// 当前题目是否包含该字母的选项
    pub fn has_option(&self, letter: char) -> bool {
        self.options.iter().any(|o| o.letter == letter)
    }

    /// 选项的显示文本（`A.xxx` 形式），保持原始顺序
    pub fn option_labels(&self) -> Vec<String> {
        self.options.iter().map(ToString::to_string).collect()
    }

    /// 打乱顺序后的选项，用于展示
    pub fn shuffled_options<R: Rng + ?Sized>(&self, rng: &mut R) -> Vec<&QuestionOption> {
        let mut options: Vec<&QuestionOption> = self.options.iter().collect();
        options.shuffle(rng);
        options
    }
}
