use std::fs;
use std::io;
use std::path::Path;
use tracing::debug;

/// 读取题库文档的全部文本
///
/// 不校验编码：无法解码的字节会被替换，而不是报错。
pub fn read_document(path: &Path) -> io::Result<String> {
    let bytes = fs::read(path)?;
    debug!("读取题库文档: {} ({} 字节)", path.display(), bytes.len());
    Ok(String::from_utf8_lossy(&bytes).into_owned())
}

/// 读取按行组织的短语文件，忽略空行
pub fn read_phrases(path: &Path) -> io::Result<Vec<String>> {
    let content = read_document(path)?;
    Ok(collect_phrases(&content))
}

/// 提取非空行并去除首尾空白
pub fn collect_phrases(content: &str) -> Vec<String> {
    content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
