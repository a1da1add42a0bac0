//! 富文本剪贴板导出
//!
//! 将文章正文区域以 HTML + 纯文本双格式写入系统剪贴板，
//! 粘贴进公众号编辑器时保留排版。

use arboard::Clipboard;
use redgreen_core::errors::ExportError;
use redgreen_services::ArticleBuilderState;
use tracing::info;

use crate::preview::article_content_region;

/// 导出当前文章到剪贴板
///
/// 文章尚未生成时返回 NothingToExport，剪贴板不可用时带回系统错误。
pub fn export_article(state: &ArticleBuilderState) -> Result<(), ExportError> {
    let html = article_content_region(state).ok_or(ExportError::NothingToExport)?;
    let plain = strip_tags(&html);
    copy_html(&html, &plain)?;
    info!("文章已复制到剪贴板: {} 字符", html.chars().count());
    Ok(())
}

fn copy_html(html: &str, plain: &str) -> Result<(), ExportError> {
    let mut clipboard =
        Clipboard::new().map_err(|error| ExportError::Clipboard(error.to_string()))?;
    clipboard
        .set_html(html, Some(plain))
        .map_err(|error| ExportError::Clipboard(error.to_string()))
}

/// 去标签得到纯文本备选格式
fn strip_tags(html: &str) -> String {
    let mut text = String::with_capacity(html.len());
    let mut in_tag = false;
    for ch in html.chars() {
        match ch {
            '<' => in_tag = true,
            '>' => in_tag = false,
            _ if !in_tag => text.push(ch),
            _ => {}
        }
    }
    // `&amp;` 必须最后还原，否则 `&amp;lt;` 会被二次还原成 `<`
    text.replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&")
}
