//! 预览渲染 crate
//!
//! 将工作流状态快照渲染为实时预览 HTML（纯函数），
//! 并提供文章正文的富文本剪贴板导出。

pub mod clipboard;
pub mod preview;

pub use clipboard::export_article;
pub use preview::{render_article_preview, render_post_preview};
