//! 预览渲染
//!
//! 状态快照到 HTML 的纯函数。四种可见形态：空态 / 生成正文中 /
//! 结构可见且配图槽位逐个结算 / 终态（完成或错误）。
//!
//! 信任边界：heading / paragraph 的富文本与内联样式来自生成端，
//! 按原样注入；标题、图文正文、话题标签等纯文本一律转义。

use redgreen_core::types::{Article, ArticleSection, GeneratedImage, Post, RunPhase};
use redgreen_services::{ArticleBuilderState, PostBuilderState, SlotMap};

/// HTML 文本转义
pub fn escape_html(input: &str) -> String {
    let mut escaped = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(ch),
        }
    }
    escaped
}

fn empty_state(message: &str) -> String {
    format!(r#"<div class="empty-state">{}</div>"#, escape_html(message))
}

fn progress_state(message: &str) -> String {
    format!(
        r#"<div class="progress-state pulse">{}</div>"#,
        escape_html(message)
    )
}

fn error_state(message: &str) -> String {
    format!(r#"<div class="error-state">{}</div>"#, escape_html(message))
}

// ============================================================================
// 公众号文章预览
// ============================================================================

/// 渲染文章工作流预览
pub fn render_article_preview(state: &ArticleBuilderState) -> String {
    match state.phase {
        RunPhase::Idle => empty_state("Enter a topic to generate a WeChat article."),
        RunPhase::GeneratingText => progress_state("Writing article structure..."),
        RunPhase::Error => error_state("Generation failed. Please try again."),
        RunPhase::GeneratingImages | RunPhase::Complete => match &state.article {
            Some(article) => {
                let content = article_content_html(article, &state.images);
                format!(
                    concat!(
                        r#"<div class="wechat-preview">"#,
                        r#"<div class="preview-header">WeChat Preview</div>"#,
                        r#"<div class="preview-content" id="article-content">{}</div>"#,
                        r#"</div>"#
                    ),
                    content
                )
            }
            None => empty_state("Enter a topic to generate a WeChat article."),
        },
    }
}

/// 渲染文章正文区域（预览与剪贴板导出共用）
///
/// 文章尚未生成时返回 None。导出语义：已生成的配图以引用形式内嵌，
/// 未结算/失败的槽位渲染占位块。
pub fn article_content_region(state: &ArticleBuilderState) -> Option<String> {
    state
        .article
        .as_ref()
        .map(|article| article_content_html(article, &state.images))
}

fn article_content_html(article: &Article, images: &SlotMap) -> String {
    let mut html = format!("<h1>{}</h1>", escape_html(&article.title));
    for (index, section) in article.sections.iter().enumerate() {
        match section {
            ArticleSection::Heading { content, style } => {
                html.push_str(&format!(
                    r#"<h2{}>{}</h2>"#,
                    style_attr(style.as_deref()),
                    content
                ));
            }
            ArticleSection::Paragraph { content, style } => {
                html.push_str(&format!(
                    r#"<div class="paragraph"{}>{}</div>"#,
                    style_attr(style.as_deref()),
                    content
                ));
            }
            ArticleSection::ImagePrompt { .. } => {
                html.push_str(&image_slot_html(images.get(index)));
            }
        }
    }
    html
}

fn style_attr(style: Option<&str>) -> String {
    match style {
        Some(style) if !style.trim().is_empty() => {
            format!(r#" style="{}""#, escape_html(style))
        }
        _ => String::new(),
    }
}

fn image_slot_html(slot: Option<&GeneratedImage>) -> String {
    match slot {
        Some(slot) if slot.is_resolved() => format!(
            concat!(
                r#"<figure class="image-slot">"#,
                r#"<img src="{}" alt="AI Generated Illustration"/>"#,
                r#"<figcaption>AI Generated Illustration</figcaption>"#,
                r#"</figure>"#
            ),
            escape_html(slot.url.as_deref().unwrap_or_default())
        ),
        Some(slot) if slot.loading => {
            r#"<div class="image-slot image-slot-loading pulse">Generating Image...</div>"#
                .to_string()
        }
        Some(_) => {
            r#"<div class="image-slot image-slot-error">Image generation failed</div>"#.to_string()
        }
        None => r#"<div class="image-slot">Image Placeholder</div>"#.to_string(),
    }
}

// ============================================================================
// 小红书图文预览
// ============================================================================

/// 渲染图文工作流预览（手机样机 + 素材九宫格）
pub fn render_post_preview(state: &PostBuilderState) -> String {
    match state.phase {
        RunPhase::Idle => empty_state("Enter a topic to generate a Xiaohongshu post."),
        RunPhase::GeneratingText => progress_state("Thinking..."),
        RunPhase::Error => error_state("Generation failed. Please try again."),
        RunPhase::GeneratingImages | RunPhase::Complete => match &state.post {
            Some(post) => post_frame(post, &state.images),
            None => empty_state("Enter a topic to generate a Xiaohongshu post."),
        },
    }
}

fn post_frame(post: &Post, images: &SlotMap) -> String {
    let cover = cover_html(images);
    let dots: String = (0..images.len().max(1))
        .map(|i| {
            if i == 0 {
                r#"<span class="dot dot-active"></span>"#
            } else {
                r#"<span class="dot"></span>"#
            }
        })
        .collect();

    let content = escape_html(&post.content).replace('\n', "<br/>");
    let tags: String = post
        .tags
        .iter()
        .map(|tag| format!(r#"<span class="tag">{}</span>"#, escape_html(tag)))
        .collect();

    let assets: String = images
        .iter()
        .map(|(_, slot)| asset_tile_html(slot))
        .collect();

    format!(
        concat!(
            r#"<div class="redbook-preview">"#,
            r#"<div class="phone-frame">"#,
            r#"<div class="cover">{cover}</div>"#,
            r#"<div class="dots">{dots}</div>"#,
            r#"<div class="post-body">"#,
            r#"<h1>{title}</h1>"#,
            r#"<div class="post-content">{content}</div>"#,
            r#"<div class="tags">{tags}</div>"#,
            r#"</div>"#,
            r#"</div>"#,
            r#"<div class="assets-grid">{assets}</div>"#,
            r#"</div>"#
        ),
        cover = cover,
        dots = dots,
        title = escape_html(&post.title),
        content = content,
        tags = tags,
        assets = assets,
    )
}

fn cover_html(images: &SlotMap) -> String {
    match images.get(0) {
        Some(slot) if slot.is_resolved() => format!(
            r#"<img src="{}" alt="Cover"/>"#,
            escape_html(slot.url.as_deref().unwrap_or_default())
        ),
        Some(slot) if slot.loading => {
            r#"<div class="cover-loading pulse">Generating Images...</div>"#.to_string()
        }
        _ => r#"<div class="cover-blank"></div>"#.to_string(),
    }
}

fn asset_tile_html(slot: &GeneratedImage) -> String {
    if slot.is_resolved() {
        format!(
            r#"<div class="asset"><img src="{}" alt="Generated asset"/></div>"#,
            escape_html(slot.url.as_deref().unwrap_or_default())
        )
    } else if slot.loading {
        r#"<div class="asset asset-loading pulse"></div>"#.to_string()
    } else {
        r#"<div class="asset asset-error">Failed</div>"#.to_string()
    }
}

// ============================================================================
// 测试
// ============================================================================
