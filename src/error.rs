use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::workflow::QuizState;

/// 应用程序错误类型
#[derive(Debug, Error)]
pub enum AppError {
    /// 题库相关错误
    #[error("题库错误: {0}")]
    Bank(#[from] BankError),
    /// 答题会话状态错误
    #[error("会话错误: {0}")]
    Session(#[from] SessionError),
    /// 错题本读写错误
    #[error("错题本错误: {0}")]
    Persistence(#[from] PersistenceError),
    /// 配置错误
    #[error("配置错误: {0}")]
    Config(#[from] ConfigError),
    /// 进入下一题时抽题失败，且自动记录错题也失败了
    #[error("题库错误: {bank}；记录错题也失败: {mistake}")]
    AdvanceBlocked {
        #[source]
        bank: BankError,
        mistake: PersistenceError,
    },
}

/// 题库错误
#[derive(Debug, Error)]
pub enum BankError {
    /// 题库中没有任何有效题目
    #[error("题库中没有题目")]
    Empty,
    /// 无法读取题库来源
    #[error("无法读取题库 ({name}): {source}")]
    SourceUnavailable {
        name: String,
        #[source]
        source: io::Error,
    },
}

/// 答题会话错误
#[derive(Debug, Error)]
pub enum SessionError {
    /// 当前状态不允许该操作
    #[error("当前状态 [{state}] 下不能执行 {action}")]
    InvalidTransition {
        action: &'static str,
        state: QuizState,
    },
    /// 所选字母不在 A-D 范围内
    #[error("{letter} 不是有效的选项字母 (A-D)")]
    UnknownOption { letter: char },
}

/// 错题本持久化错误
#[derive(Debug, Error)]
pub enum PersistenceError {
    /// 没有写入权限
    #[error("无法写入错题本文件: {path}，请检查文件权限")]
    PermissionDenied { path: PathBuf },
    /// 写入失败
    #[error("写入错题本失败 ({path}): {source}")]
    WriteFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// 读取失败
    #[error("读取错题本失败 ({path}): {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// 配置错误
#[derive(Debug, Error)]
pub enum ConfigError {
    /// 配置文件读取失败
    #[error("读取配置文件失败 ({path}): {source}")]
    ReadFailed {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    /// 配置文件格式错误
    #[error("TOML解析失败 ({path}): {source}")]
    TomlParseFailed {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    /// 环境变量解析失败
    #[error("环境变量 {var_name} 解析失败: 值 '{value}' 无法转换为 {expected_type}")]
    EnvVarParseFailed {
        var_name: String,
        value: String,
        expected_type: String,
    },
    /// 配置项取值非法
    #[error("配置项 {field} 非法: {reason}")]
    InvalidValue { field: &'static str, reason: String },
}

// ========== 便捷构造函数 ==========

impl BankError {
    /// 创建题库来源读取错误
    pub fn source_unavailable(name: impl Into<String>, source: io::Error) -> Self {
        BankError::SourceUnavailable {
            name: name.into(),
            source,
        }
    }
}

impl PersistenceError {
    /// 根据 IO 错误类型创建写入错误，区分权限问题
    pub fn write_failed(path: &Path, source: io::Error) -> Self {
        if source.kind() == io::ErrorKind::PermissionDenied {
            PersistenceError::PermissionDenied {
                path: path.to_path_buf(),
            }
        } else {
            PersistenceError::WriteFailed {
                path: path.to_path_buf(),
                source,
            }
        }
    }

    /// 创建读取错误
    pub fn read_failed(path: &Path, source: io::Error) -> Self {
        PersistenceError::ReadFailed {
            path: path.to_path_buf(),
            source,
        }
    }
}

impl AppError {
    /// 是否为空题库错误
    pub fn is_empty_bank(&self) -> bool {
        matches!(
            self,
            AppError::Bank(BankError::Empty)
                | AppError::AdvanceBlocked {
                    bank: BankError::Empty,
                    ..
                }
        )
    }

    /// 随本错误一起发生的错题本写入失败
    pub fn persistence_failure(&self) -> Option<&PersistenceError> {
        match self {
            AppError::Persistence(e) | AppError::AdvanceBlocked { mistake: e, .. } => Some(e),
            _ => None,
        }
    }
}

// ========== Result 类型别名 ==========

/// 应用程序结果类型
pub type AppResult<T> = Result<T, AppError>;
