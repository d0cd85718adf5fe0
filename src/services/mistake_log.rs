//! 错题本写入服务 - 业务能力层
//!
//! 只负责"追加错题"和"读取错题本"，不关心答题流程

use std::fs::{self, OpenOptions};
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

use crate::error::PersistenceError;
use crate::models::MistakeRecord;

/// 错题本
///
/// 职责：
/// - 每条错题渲染成完整文本块后一次性追加
/// - 只追加，不修改、不删除
/// - 单进程单写者，不加锁
#[derive(Debug, Clone)]
pub struct MistakeLog {
    path: PathBuf,
}

impl MistakeLog {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// 追加一条错题
    pub fn append(&self, record: &MistakeRecord) -> Result<(), PersistenceError> {
        let block = record.render();
        debug!(
            "写入错题: {} | 笔记: {}",
            self.path.display(),
            record.note.is_some()
        );

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            fs::create_dir_all(dir).map_err(|e| PersistenceError::write_failed(&self.path, e))?;
        }

        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|e| PersistenceError::write_failed(&self.path, e))?;

        file.write_all(block.as_bytes())
            .map_err(|e| PersistenceError::write_failed(&self.path, e))
    }

    /// 读取错题本全部内容，文件不存在时返回空字符串
    pub fn read_all(&self) -> Result<String, PersistenceError> {
        match fs::read_to_string(&self.path) {
            Ok(content) => Ok(content),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(String::new()),
            Err(e) => Err(PersistenceError::read_failed(&self.path, e)),
        }
    }
}
