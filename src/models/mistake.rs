use crate::models::question::QuestionRecord;

/// 错题块之间的分隔线宽度
pub const SEPARATOR_WIDTH: usize = 50;

/// 一条错题记录
///
/// 写入错题本后不再修改，顺序即写入顺序。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MistakeRecord {
    pub question: String,
    pub options: Vec<String>,
    pub correct_letter: char,
    pub explanation: String,
    pub note: Option<String>,
}

impl MistakeRecord {
    /// 从题目快照创建错题记录，空白笔记视为没有笔记
    pub fn from_question(record: &QuestionRecord, note: &str) -> Self {
        let note = note.trim();
        Self {
            question: record.question().to_string(),
            options: record.option_labels(),
            correct_letter: record.correct_letter(),
            explanation: record.explanation().to_string(),
            note: (!note.is_empty()).then(|| note.to_string()),
        }
    }

    /// 渲染为错题本中的一个文本块
    pub fn render(&self) -> String {
        let mut block = format!(
            "题目: {}\n选项: {}\n正确答案: {}\n解析: {}\n",
            self.question,
            self.options.join(", "),
            self.correct_letter,
            self.explanation
        );
        if let Some(note) = &self.note {
            block.push_str(&format!("用户笔记: {}\n", note));
        }
        block.push_str(&"-".repeat(SEPARATOR_WIDTH));
        block.push('\n');
        block
    }
}
