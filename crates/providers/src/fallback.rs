//! 占位图回退
//!
//! 图像生成失败时替换为确定性的占位图 URL：
//! 同一提示词永远得到同一张占位图，预览不会因失败而闪动。

const PLACEHOLDER_BASE: &str = "https://picsum.photos/seed";
const SEED_CHARS: usize = 10;

/// 根据提示词派生占位图 URL
///
/// 种子取提示词前 10 个字符，按字符截断避免 UTF-8 边界问题。
pub fn placeholder_url(prompt: &str) -> String {
    let seed: String = prompt.chars().take(SEED_CHARS).collect();
    format!("{}/{}/800/600", PLACEHOLDER_BASE, urlencoding::encode(&seed))
}
