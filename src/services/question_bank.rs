//! 题库服务
//!
//! 持有解析后的题目并提供随机抽题能力，不保存任何与单题相关的状态。

use rand::seq::SliceRandom;
use rand::Rng;
use serde::Deserialize;
use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::{debug, info};

use crate::error::BankError;
use crate::models::{read_document, QuestionRecord};
use crate::parser;

/// 题库文本来源
pub trait QuestionSource: Send {
    /// 读取完整的题库文本
    fn read(&self) -> Result<String, BankError>;

    /// 来源描述，用于日志
    fn describe(&self) -> String;
}

/// 磁盘上的题库文件
#[derive(Debug, Clone)]
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl QuestionSource for FileSource {
    fn read(&self) -> Result<String, BankError> {
        read_document(&self.path)
            .map_err(|e| BankError::source_unavailable(self.path.display().to_string(), e))
    }

    fn describe(&self) -> String {
        self.path.display().to_string()
    }
}

/// 内存中的题库文本
#[derive(Debug, Clone, Default)]
pub struct TextSource {
    text: String,
}

impl TextSource {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

impl QuestionSource for TextSource {
    fn read(&self) -> Result<String, BankError> {
        Ok(self.text.clone())
    }

    fn describe(&self) -> String {
        format!("<内存文本 {} 字节>", self.text.len())
    }
}

/// 抽题策略
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DrawPolicy {
    /// 每次抽题前重新读取并解析题库，题库文件的修改在下一题生效
    #[default]
    ReloadEachDraw,
    /// 只解析一次，之后复用缓存，直到显式调用 `refresh`
    ParseOnce,
}

impl FromStr for DrawPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reload_each_draw" | "reload" => Ok(DrawPolicy::ReloadEachDraw),
            "parse_once" | "once" => Ok(DrawPolicy::ParseOnce),
            other => Err(format!("未知的抽题策略: {}", other)),
        }
    }
}

impl fmt::Display for DrawPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawPolicy::ReloadEachDraw => write!(f, "每题重新加载"),
            DrawPolicy::ParseOnce => write!(f, "解析一次"),
        }
    }
}

/// 题库
pub struct QuestionBank {
    source: Box<dyn QuestionSource>,
    policy: DrawPolicy,
    records: Vec<QuestionRecord>,
    loaded: bool,
}

impl QuestionBank {
    /// 创建题库，此时尚未读取来源
    pub fn new(source: impl QuestionSource + 'static, policy: DrawPolicy) -> Self {
        Self {
            source: Box::new(source),
            policy,
            records: Vec::new(),
            loaded: false,
        }
    }

    /// 用给定文本替换题库内容
    ///
    /// 没有任何有效题目时题库被清空，并返回 [`BankError::Empty`]。
    pub fn reload(&mut self, raw: &str) -> Result<usize, BankError> {
        self.records = parser::parse(raw);
        self.loaded = true;
        if self.records.is_empty() {
            return Err(BankError::Empty);
        }
        debug!("题库已重新加载: {} 道题目", self.records.len());
        Ok(self.records.len())
    }

    /// 从来源重新读取并解析
    pub fn refresh(&mut self) -> Result<usize, BankError> {
        let raw = self.source.read()?;
        let count = self.reload(&raw)?;
        info!("✓ 从 {} 加载了 {} 道题目", self.source.describe(), count);
        Ok(count)
    }

    /// 从当前内容中均匀随机抽取一道题
    pub fn pick_random(&self) -> Result<&QuestionRecord, BankError> {
        self.pick_random_with(&mut rand::thread_rng())
    }

    pub fn pick_random_with<R: Rng + ?Sized>(
        &self,
        rng: &mut R,
    ) -> Result<&QuestionRecord, BankError> {
        self.records.choose(rng).ok_or(BankError::Empty)
    }

    /// 按抽题策略准备题库后抽取一道题
    pub fn draw(&mut self) -> Result<QuestionRecord, BankError> {
        self.draw_with(&mut rand::thread_rng())
    }

    pub fn draw_with<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<QuestionRecord, BankError> {
        match self.policy {
            DrawPolicy::ReloadEachDraw => {
                let raw = self.source.read()?;
                self.reload(&raw)?;
            }
            DrawPolicy::ParseOnce if !self.loaded => {
                self.refresh()?;
            }
            DrawPolicy::ParseOnce => {}
        }
        self.pick_random_with(rng).cloned()
    }

    pub fn records(&self) -> &[QuestionRecord] {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    pub fn policy(&self) -> DrawPolicy {
        self.policy
    }

    pub fn source_name(&self) -> String {
        self.source.describe()
    }
}

impl fmt::Debug for QuestionBank {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("QuestionBank")
            .field("source", &self.source.describe())
            .field("policy", &self.policy)
            .field("records", &self.records.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::io::Write;

    const TWO_QUESTIONS: &str = "题一\nA.1\nB.2\n答案：A\n题二\nA.1\nB.2\n答案：B\n";

    #[test]
    fn test_pick_random_on_empty_bank() {
        let bank = QuestionBank::new(TextSource::default(), DrawPolicy::ParseOnce);
        assert!(matches!(bank.pick_random(), Err(BankError::Empty)));
    }

    #[test]
    fn test_pick_random_returns_member() {
        let mut bank = QuestionBank::new(TextSource::default(), DrawPolicy::ParseOnce);
        assert_eq!(bank.reload(TWO_QUESTIONS).unwrap(), 2);

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..20 {
            let picked = bank.pick_random_with(&mut rng).unwrap();
            assert!(bank.records().contains(picked));
        }
    }

    #[test]
    fn test_reload_without_valid_blocks_empties_bank() {
        let mut bank = QuestionBank::new(TextSource::default(), DrawPolicy::ParseOnce);
        bank.reload(TWO_QUESTIONS).unwrap();
        assert!(matches!(bank.reload("只有题干\n答案：Z\n"), Err(BankError::Empty)));
        assert!(bank.is_empty());
    }

    #[test]
    fn test_parse_once_caches_records() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_QUESTIONS.as_bytes()).unwrap();

        let mut bank = QuestionBank::new(FileSource::new(file.path()), DrawPolicy::ParseOnce);
        bank.draw().unwrap();
        assert_eq!(bank.len(), 2);

        std::fs::write(file.path(), "").unwrap();
        assert!(bank.draw().is_ok());
        assert!(matches!(bank.refresh(), Err(BankError::Empty)));
    }

    #[test]
    fn test_reload_each_draw_sees_source_changes() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(TWO_QUESTIONS.as_bytes()).unwrap();

        let mut bank = QuestionBank::new(FileSource::new(file.path()), DrawPolicy::ReloadEachDraw);
        bank.draw().unwrap();
        assert_eq!(bank.len(), 2);

        std::fs::write(file.path(), "新题\nC.x\n答案：C\n").unwrap();
        let record = bank.draw().unwrap();
        assert_eq!(record.question(), "新题");
        assert_eq!(bank.len(), 1);
    }

    #[test]
    fn test_missing_source_file() {
        let mut bank = QuestionBank::new(
            FileSource::new("/definitely/not/here/questions.txt"),
            DrawPolicy::ReloadEachDraw,
        );
        assert!(matches!(
            bank.draw(),
            Err(BankError::SourceUnavailable { .. })
        ));
    }

    #[test]
    fn test_draw_policy_from_str() {
        assert_eq!("parse_once".parse::<DrawPolicy>(), Ok(DrawPolicy::ParseOnce));
        assert_eq!(
            "Reload_Each_Draw".parse::<DrawPolicy>(),
            Ok(DrawPolicy::ReloadEachDraw)
        );
        assert!("sometimes".parse::<DrawPolicy>().is_err());
    }
}
