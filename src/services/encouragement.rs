//! 鼓励话语服务
//!
//! 纯装饰性功能：答错时由界面层随机展示一句鼓励的话。

use rand::seq::SliceRandom;
use rand::Rng;
use std::path::Path;
use tracing::{debug, warn};

use crate::models::{loaders::collect_phrases, read_phrases};

#[derive(Debug, Clone, Default)]
pub struct Encouragement {
    phrases: Vec<String>,
}

impl Encouragement {
    /// 尽力加载鼓励话语，文件缺失或读取失败时得到空列表
    pub fn load(path: &Path) -> Self {
        if !path.exists() {
            warn!("鼓励话语文件不存在: {}", path.display());
            return Self::default();
        }
        match read_phrases(path) {
            Ok(phrases) => {
                debug!("加载了 {} 条鼓励话语", phrases.len());
                Self { phrases }
            }
            Err(e) => {
                warn!("加载鼓励话语失败 ({}): {}", path.display(), e);
                Self::default()
            }
        }
    }

    pub fn from_text(content: &str) -> Self {
        Self {
            phrases: collect_phrases(content),
        }
    }

    /// 随机一句鼓励话语，没有任何话语时返回空字符串
    pub fn pick_random(&self) -> String {
        self.pick_random_with(&mut rand::thread_rng())
    }

    pub fn pick_random_with<R: Rng + ?Sized>(&self, rng: &mut R) -> String {
        self.phrases.choose(rng).cloned().unwrap_or_default()
    }

    pub fn len(&self) -> usize {
        self.phrases.len()
    }

    pub fn is_empty(&self) -> bool {
        self.phrases.is_empty()
    }
}
