use serde::Deserialize;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use tracing::debug;

use crate::error::ConfigError;
use crate::services::DrawPolicy;

/// 默认配置文件路径
pub const DEFAULT_CONFIG_FILE: &str = "quiz.toml";

/// 程序配置
#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    /// 题库文件
    pub questions_file: PathBuf,
    /// 错题本文件
    pub mistakes_file: PathBuf,
    /// 鼓励话语文件
    pub encouragement_file: PathBuf,
    /// 每道题的作答时间（秒）
    pub time_limit_secs: u32,
    /// 抽题前是否重新解析题库
    pub draw_policy: DrawPolicy,
    /// 展示时是否打乱选项顺序
    pub shuffle_options: bool,
    /// 是否显示详细日志
    pub verbose_logging: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            questions_file: PathBuf::from("questions.txt"),
            mistakes_file: PathBuf::from("mistakes.txt"),
            encouragement_file: PathBuf::from("Encouraging words.txt"),
            time_limit_secs: 30,
            draw_policy: DrawPolicy::ReloadEachDraw,
            shuffle_options: true,
            verbose_logging: false,
        }
    }
}

impl Config {
    /// 加载配置：默认值 → 配置文件 → 环境变量
    ///
    /// 配置文件路径取自 `QUIZ_CONFIG`，未设置时若 `quiz.toml` 存在则使用它。
    pub fn load() -> Result<Self, ConfigError> {
        let explicit = std::env::var("QUIZ_CONFIG").ok().map(PathBuf::from);
        let base = match explicit {
            Some(path) => Self::from_file(&path)?,
            None if Path::new(DEFAULT_CONFIG_FILE).exists() => {
                Self::from_file(Path::new(DEFAULT_CONFIG_FILE))?
            }
            None => Self::default(),
        };
        let config = base.with_env_overrides()?;
        config.validate()?;
        Ok(config)
    }

    /// 从 TOML 文件读取配置，缺失的字段使用默认值
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::ReadFailed {
            path: path.to_path_buf(),
            source,
        })?;
        let config = Self::from_toml_str(&content).map_err(|source| {
            ConfigError::TomlParseFailed {
                path: path.to_path_buf(),
                source,
            }
        })?;
        debug!("已加载配置文件: {}", path.display());
        Ok(config)
    }

    pub fn from_toml_str(content: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(content)
    }

    /// 用环境变量覆盖配置
    pub fn with_env_overrides(self) -> Result<Self, ConfigError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    fn with_overrides(
        self,
        lookup: impl Fn(&str) -> Option<String>,
    ) -> Result<Self, ConfigError> {
        Ok(Self {
            questions_file: lookup("QUIZ_QUESTIONS_FILE")
                .map(PathBuf::from)
                .unwrap_or(self.questions_file),
            mistakes_file: lookup("QUIZ_MISTAKES_FILE")
                .map(PathBuf::from)
                .unwrap_or(self.mistakes_file),
            encouragement_file: lookup("QUIZ_ENCOURAGEMENT_FILE")
                .map(PathBuf::from)
                .unwrap_or(self.encouragement_file),
            time_limit_secs: parse_var(&lookup, "QUIZ_TIME_LIMIT_SECS", "u32")?
                .unwrap_or(self.time_limit_secs),
            draw_policy: parse_var(&lookup, "QUIZ_DRAW_POLICY", "draw policy")?
                .unwrap_or(self.draw_policy),
            shuffle_options: parse_var(&lookup, "QUIZ_SHUFFLE_OPTIONS", "bool")?
                .unwrap_or(self.shuffle_options),
            verbose_logging: parse_var(&lookup, "QUIZ_VERBOSE_LOGGING", "bool")?
                .unwrap_or(self.verbose_logging),
        })
    }

    /// 校验配置取值
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.time_limit_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "time_limit_secs",
                reason: "作答时间必须大于 0 秒".to_string(),
            });
        }
        Ok(())
    }
}

fn parse_var<T: FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    var_name: &str,
    expected_type: &str,
) -> Result<Option<T>, ConfigError> {
    match lookup(var_name) {
        None => Ok(None),
        Some(value) => value
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::EnvVarParseFailed {
                var_name: var_name.to_string(),
                value,
                expected_type: expected_type.to_string(),
            }),
    }
}
